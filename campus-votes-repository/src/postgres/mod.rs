//! PostgreSQL implementation of the campus votes repositories.
//!
//! Provides a production-ready PostgreSQL backend for every repository trait
//! with connection pooling, transaction safety and structural uniqueness.
//!
//! ## Database Tables
//!
//! - `voteable_entities`: campuses and communities with their three-way tally
//! - `user_votes`: one polarity per (user, entity)
//! - `comments`: comments per entity, one per author once migrated
//! - `users`, `sessions`: profiles and bearer tokens issued elsewhere
mod store;

pub use store::PostgresStore;
