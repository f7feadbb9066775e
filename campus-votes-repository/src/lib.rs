//! # Campus Votes Repository
//! This crate provides traits and implementations for the storage behind the
//! voting and commentary engine. It includes definitions for errors, interfaces,
//! an in-memory store and a PostgreSQL store.
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use errors::RepositoryError;
pub use interfaces::{
    CommentsRepository, EntitiesRepository, SessionsRepository, UsersRepository,
    VotesRepository,
};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
