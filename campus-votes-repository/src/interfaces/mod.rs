//! This module defines and re-exports the storage interfaces.
//! It serves as a central point for accessing traits related to data interaction.
mod comments;
mod entities;
mod sessions;
mod users;
mod votes;

pub use comments::CommentsRepository;
pub use entities::EntitiesRepository;
pub use sessions::SessionsRepository;
pub use users::UsersRepository;
pub use votes::VotesRepository;
