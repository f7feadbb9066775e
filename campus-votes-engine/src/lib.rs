//! # Campus Votes Engine
//! This crate implements the rate-limited voting and synchronized commentary
//! engine. It includes the cooldown ledger guarding every mutating action, the
//! vote ledger keeping entity tallies consistent with one vote per user, the
//! comment reconciler keeping one comment per (entity, user) pair, and the
//! `VotingService` that sequences them under per-pair locks.
pub mod cooldown;
pub mod errors;
pub mod ledger;
pub mod locks;
pub mod reconciler;
pub mod service;

pub use errors::EngineError;
pub use service::{VoteOutcome, VotingService};
