//! Configuration types for the cooldown ledger.
use campus_votes_shared::types::ActionKind;
use std::collections::HashMap;
use std::time::Duration;

/// Configuration for cooldown windows and the sweep that expires entries.
///
/// Action kinds missing from `windows` use `default_window`.
#[derive(Debug, Clone)]
pub struct CooldownConfig {
    pub windows: HashMap<ActionKind, Duration>,
    pub default_window: Duration,
    /// How long an entry is kept after its last accepted action.
    pub retention: Duration,
    pub sweep_interval: Duration,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        let windows = HashMap::from([
            (ActionKind::Post, Duration::from_secs(30)),
            (ActionKind::Confession, Duration::from_secs(60)),
            (ActionKind::Comment, Duration::from_secs(20)),
            (ActionKind::Vote, Duration::from_secs(5)),
        ]);
        Self {
            windows,
            default_window: Duration::from_secs(30),
            retention: Duration::from_secs(5 * 60),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl CooldownConfig {
    /// Returns the config with the window for `action` replaced.
    pub fn with_window(mut self, action: ActionKind, window: Duration) -> Self {
        self.windows.insert(action, window);
        self
    }

    pub fn window_for(&self, action: &ActionKind) -> Duration {
        self.windows
            .get(action)
            .copied()
            .unwrap_or(self.default_window)
    }

    pub fn longest_window(&self) -> Duration {
        self.windows
            .values()
            .copied()
            .fold(self.default_window, Duration::max)
    }

    /// Retention actually applied by the sweep.
    ///
    /// Never shorter than the longest window, so an entry cannot be swept
    /// while its window is still running.
    pub fn effective_retention(&self) -> Duration {
        self.retention.max(self.longest_window())
    }
}
