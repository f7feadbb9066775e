use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of mutating action a cooldown applies to.
///
/// Together with the acting user it forms the cooldown key. Kinds without a
/// configured window fall back to the default one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Post,
    Confession,
    Comment,
    Vote,
    Other(String),
}

impl ActionKind {
    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::Post => "post",
            ActionKind::Confession => "confession",
            ActionKind::Comment => "comment",
            ActionKind::Vote => "vote",
            ActionKind::Other(kind) => kind,
        }
    }
}

impl From<&str> for ActionKind {
    fn from(kind: &str) -> Self {
        match kind {
            "post" => ActionKind::Post,
            "confession" => ActionKind::Confession,
            "comment" => ActionKind::Comment,
            "vote" => ActionKind::Vote,
            other => ActionKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
