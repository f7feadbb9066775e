use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cooldown::CooldownLedger;

/// Spawns the periodic sweep that removes expired cooldown entries.
///
/// The task sweeps every `interval` until a message (or a closed channel)
/// arrives on `shutdown`.
pub fn spawn_reaper(
    ledger: Arc<dyn CooldownLedger>,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        info!(interval_secs = interval.as_secs(), "Cooldown reaper started");
        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("Cooldown reaper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = ledger.reap().await;
                    if removed > 0 {
                        debug!(removed, "Reaped expired cooldown entries");
                    }
                }
            }
        }
    })
}
