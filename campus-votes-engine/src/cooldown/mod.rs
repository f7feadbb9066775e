//! Cooldown module for the voting engine.
//!
//! Provides the `CooldownLedger` trait gating every mutating action per
//! (actor, action kind), an in-process implementation and the periodic sweep
//! that bounds its memory. The ledger is injected into callers so a shared
//! store can replace the in-process one for multi-instance deployments.
mod config;
mod memory;
mod reaper;

pub use config::CooldownConfig;
pub use memory::InMemoryCooldownLedger;
pub use reaper::spawn_reaper;

use async_trait::async_trait;
use campus_votes_shared::types::{ActionKind, UserId};

/// Outcome of a cooldown check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownDecision {
    /// The action may proceed; the ledger has stamped it.
    Allow,
    /// The action must not proceed; nothing was recorded.
    Deny { remaining_secs: u64 },
}

impl CooldownDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, CooldownDecision::Allow)
    }
}

/// Trait for per-actor, per-action-kind cooldown tracking.
///
/// `check` is an accept-and-stamp operation: an allowed check records the
/// action, so callers must check exactly once per attempt.
#[async_trait]
pub trait CooldownLedger: Send + Sync {
    /// Checks whether `actor_id` may perform `action` now, stamping it if so.
    async fn check(&self, actor_id: UserId, action: &ActionKind) -> CooldownDecision;

    /// Removes entries older than the retention period, returning how many
    /// were removed.
    async fn reap(&self) -> usize;
}
