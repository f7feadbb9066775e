use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Represents the opinion a user expresses with a vote.
///
/// Every user holds at most one polarity per voteable entity; a re-vote
/// replaces it and there is no way to clear it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Indicates a favourable opinion.
    Positive,
    /// Indicates an indifferent opinion.
    Neutral,
    /// Indicates an unfavourable opinion.
    Negative,
}

/// Returned when a polarity cannot be parsed from user input or storage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid polarity: {0}")]
pub struct InvalidPolarity(pub String);

impl Polarity {
    pub const ALL: [Polarity; 3] = [Polarity::Positive, Polarity::Neutral, Polarity::Negative];

    /// The text assigned to a comment that mirrors this polarity.
    ///
    /// Comments carrying one of these strings were written by the system on
    /// behalf of the voter and keep following the voter's polarity.
    pub fn system_template(self) -> &'static str {
        match self {
            Polarity::Positive => "I voted positive: I'd recommend it.",
            Polarity::Neutral => "I voted neutral: it's okay.",
            Polarity::Negative => "I voted negative: I wouldn't recommend it.",
        }
    }

    /// Whether `content` equals the template of any polarity.
    pub fn is_system_template(content: &str) -> bool {
        Polarity::ALL
            .iter()
            .any(|polarity| polarity.system_template() == content)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Polarity::Positive => "positive",
            Polarity::Neutral => "neutral",
            Polarity::Negative => "negative",
        }
    }

    /// Storage code used by the SQL backend.
    pub fn as_i16(self) -> i16 {
        match self {
            Polarity::Positive => 0,
            Polarity::Neutral => 1,
            Polarity::Negative => 2,
        }
    }
}

impl TryFrom<i16> for Polarity {
    type Error = InvalidPolarity;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Polarity::Positive),
            1 => Ok(Polarity::Neutral),
            2 => Ok(Polarity::Negative),
            other => Err(InvalidPolarity(other.to_string())),
        }
    }
}

impl FromStr for Polarity {
    type Err = InvalidPolarity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Polarity::Positive),
            "neutral" => Ok(Polarity::Neutral),
            "negative" => Ok(Polarity::Negative),
            _ => Err(InvalidPolarity(s.to_string())),
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
