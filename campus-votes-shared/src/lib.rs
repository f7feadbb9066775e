//! # Campus Votes Shared
//! This crate defines the data structures shared across the campus votes services.
//! It includes identifiers, vote polarities and tallies, voteable entities,
//! per-user vote records, comments and cooldown action kinds.
pub mod types;
