use async_trait::async_trait;
use campus_votes_shared::types::{ActionKind, UserId};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::time::Duration;
use tokio::time::Instant;

use crate::cooldown::{CooldownConfig, CooldownDecision, CooldownLedger};

/// Process-local cooldown ledger.
///
/// Stores only the instant of the last accepted action per
/// (actor, action kind); expiry is evaluated on read and swept by `reap`.
/// Entries are not shared between processes, so a multi-instance deployment
/// enforces cooldowns per instance only.
pub struct InMemoryCooldownLedger {
    entries: DashMap<(UserId, ActionKind), Instant>,
    config: CooldownConfig,
}

impl InMemoryCooldownLedger {
    pub fn new(config: CooldownConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whole seconds left in `window` after `elapsed`, rounded up.
fn remaining_secs(window: Duration, elapsed: Duration) -> u64 {
    let remaining_ns = window.saturating_sub(elapsed).as_nanos();
    remaining_ns.div_ceil(1_000_000_000) as u64
}

#[async_trait]
impl CooldownLedger for InMemoryCooldownLedger {
    async fn check(&self, actor_id: UserId, action: &ActionKind) -> CooldownDecision {
        let now = Instant::now();
        let window = self.config.window_for(action);

        // The entry guard holds the shard lock, so check and stamp are atomic per key.
        match self.entries.entry((actor_id, action.clone())) {
            Entry::Occupied(mut entry) => {
                let elapsed = now.saturating_duration_since(*entry.get());
                if elapsed < window {
                    return CooldownDecision::Deny {
                        remaining_secs: remaining_secs(window, elapsed),
                    };
                }
                entry.insert(now);
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
            }
        }
        CooldownDecision::Allow
    }

    async fn reap(&self) -> usize {
        let now = Instant::now();
        let retention = self.config.effective_retention();
        let mut removed = 0;
        self.entries.retain(|_, stamp| {
            let keep = now.saturating_duration_since(*stamp) < retention;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }
}
