//! Usual-effect criteria resolution.
//!
//! Each calendar event documents a "usual effect" phrase describing how an
//! actual-vs-forecast deviation relates to currency strength. The phrase
//! comes from an external per-event detail lookup and belongs to a small
//! closed set of template phrasings; anything outside that set degrades to
//! [`Criteria::Unknown`], never to an error.

use serde::{Deserialize, Serialize};

const GOOD_ABOVE: &str = "'Actual' greater than 'Forecast' is good for currency";
const GOOD_BELOW: &str = "'Actual' less than 'Forecast' is good for currency";

/// Sign convention relating an actual-vs-forecast deviation to currency
/// favorability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i8", into = "i8")]
pub enum Criteria {
    /// `actual > forecast` is good for the currency (+1).
    BetterWhenAbove,
    /// `actual < forecast` is good for the currency (-1).
    BetterWhenBelow,
    /// Effect direction unknown or inconclusive (0).
    #[default]
    Unknown,
}

impl Criteria {
    /// Map a usual-effect phrase to its sign convention.
    ///
    /// The match is exact after trimming (an optional trailing semicolon, as
    /// carried by the raw detail payload, is tolerated). Any deviation in
    /// wording or casing falls to [`Criteria::Unknown`].
    pub fn from_usual_effect(text: &str) -> Self {
        let trimmed = text.trim();
        let phrase = trimmed.strip_suffix(';').unwrap_or(trimmed);
        match phrase {
            GOOD_ABOVE => Self::BetterWhenAbove,
            GOOD_BELOW => Self::BetterWhenBelow,
            _ => Self::Unknown,
        }
    }

    pub const fn sign(self) -> i8 {
        match self {
            Self::BetterWhenAbove => 1,
            Self::BetterWhenBelow => -1,
            Self::Unknown => 0,
        }
    }

    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl From<i8> for Criteria {
    fn from(value: i8) -> Self {
        match value {
            1 => Self::BetterWhenAbove,
            -1 => Self::BetterWhenBelow,
            _ => Self::Unknown,
        }
    }
}

impl From<Criteria> for i8 {
    fn from(value: Criteria) -> Self {
        value.sign()
    }
}
