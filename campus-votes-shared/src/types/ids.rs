use uuid::Uuid;

/// Identifier of a platform user (the actor of every vote and comment).
pub type UserId = Uuid;

/// Identifier of a voteable entity (a campus or a community).
pub type EntityId = Uuid;

pub type CommentId = Uuid;
