use serde::{Deserialize, Serialize};
use crate::types::Polarity;

/// Represents the aggregated votes on a voteable entity.
///
/// Every user who ever voted on the entity contributes exactly one unit to
/// exactly one bucket, so `total()` equals the number of distinct voters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tally {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

impl Tally {
    pub fn total(&self) -> u64 {
        self.positive + self.neutral + self.negative
    }

    /// Applies a delta, returning `None` if any bucket would become negative.
    pub fn checked_apply(&self, delta: &TallyDelta) -> Option<Tally> {
        Some(Tally {
            positive: self.positive.checked_add_signed(delta.positive)?,
            neutral: self.neutral.checked_add_signed(delta.neutral)?,
            negative: self.negative.checked_add_signed(delta.negative)?,
        })
    }
}

/// Signed change to each bucket of a `Tally`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TallyDelta {
    pub positive: i64,
    pub neutral: i64,
    pub negative: i64,
}

impl TallyDelta {
    fn bucket_mut(&mut self, polarity: Polarity) -> &mut i64 {
        match polarity {
            Polarity::Positive => &mut self.positive,
            Polarity::Neutral => &mut self.neutral,
            Polarity::Negative => &mut self.negative,
        }
    }

    /// Delta produced when a user moves from `previous` (if any) to `current`.
    pub fn for_switch(previous: Option<Polarity>, current: Polarity) -> Self {
        let mut delta = TallyDelta::default();
        if let Some(previous) = previous {
            *delta.bucket_mut(previous) -= 1;
        }
        *delta.bucket_mut(current) += 1;
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_vote_adds_one_unit() {
        let delta = TallyDelta::for_switch(None, Polarity::Neutral);
        assert_eq!(delta, TallyDelta { positive: 0, neutral: 1, negative: 0 });
        let tally = Tally::default().checked_apply(&delta).unwrap();
        assert_eq!(tally.total(), 1);
    }

    #[test]
    fn test_switch_moves_the_unit() {
        let start = Tally { positive: 1, neutral: 0, negative: 0 };
        let delta = TallyDelta::for_switch(Some(Polarity::Positive), Polarity::Negative);
        let tally = start.checked_apply(&delta).unwrap();
        assert_eq!(tally, Tally { positive: 0, neutral: 0, negative: 1 });
    }

    #[test]
    fn test_same_polarity_is_zero_delta() {
        let delta = TallyDelta::for_switch(Some(Polarity::Positive), Polarity::Positive);
        assert_eq!(delta, TallyDelta::default());
    }

    #[test]
    fn test_underflow_is_rejected() {
        let delta = TallyDelta::for_switch(Some(Polarity::Negative), Polarity::Positive);
        assert_eq!(Tally::default().checked_apply(&delta), None);
    }
}
