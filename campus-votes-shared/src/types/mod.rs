mod action_kind;
mod comment;
mod entity;
mod ids;
mod polarity;
mod tally;
mod user;
mod user_vote;

pub use action_kind::ActionKind;
pub use comment::{Comment, CommentOrigin, CommentView, MAX_COMMENT_CHARS};
pub use entity::{EntityKind, VoteableEntity};
pub use ids::{CommentId, EntityId, UserId};
pub use polarity::{InvalidPolarity, Polarity};
pub use tally::{Tally, TallyDelta};
pub use user::{AuthorSummary, UserProfile};
pub use user_vote::{UserVote, VoteChange};
