//! Surprise-direction classification.
//!
//! Combines a resolved [`Criteria`] sign with the numeric actual-vs-forecast
//! deviation to produce a ternary favorability label for the currency.

use serde::{Deserialize, Serialize};

use crate::criteria::Criteria;
use crate::domain::CalendarEvent;

/// Whether a realized deviation was good, bad or neutral for the currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i8", into = "i8")]
pub enum Favorability {
    /// Favorable for the currency (+1).
    Good,
    /// Unfavorable for the currency (-1).
    Bad,
    /// No call (0): zero deviation, unknown criteria, or missing numbers.
    #[default]
    Neutral,
}

impl Favorability {
    pub const fn sign(self) -> i8 {
        match self {
            Self::Good => 1,
            Self::Bad => -1,
            Self::Neutral => 0,
        }
    }
}

impl From<i8> for Favorability {
    fn from(value: i8) -> Self {
        match value {
            1 => Self::Good,
            -1 => Self::Bad,
            _ => Self::Neutral,
        }
    }
}

impl From<Favorability> for i8 {
    fn from(value: Favorability) -> Self {
        value.sign()
    }
}

/// Coerce a raw magnitude cell to a 4-decimal float.
///
/// Strips `%`, thousands separators, the `K`/`M`/`B` unit suffixes and the
/// `<` truncation marker. Suffixes are stripped, not scaled: the deviation
/// is compared against a forecast quoted in the same unit. Missing or
/// unparsable text yields `None`.
pub fn parse_magnitude(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, '%' | ',' | 'K' | 'M' | 'B' | '<'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(round4(value))
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// `actual - forecast`, when both magnitudes are present and parsable.
pub fn deviation(actual: Option<&str>, forecast: Option<&str>) -> Option<f64> {
    let actual = parse_magnitude(actual?)?;
    let forecast = parse_magnitude(forecast?)?;
    Some(round4(actual - forecast))
}

/// Classify a deviation under a criteria sign convention.
///
/// | criteria | diff | result |
/// |---|---|---|
/// | +1 | > 0 | Good |
/// | +1 | < 0 | Bad |
/// | -1 | < 0 | Good |
/// | -1 | > 0 | Bad |
/// | any | 0 or missing | Neutral |
/// | 0 | any | Neutral |
pub fn classify(criteria: Criteria, diff: Option<f64>) -> Favorability {
    let Some(diff) = diff else {
        return Favorability::Neutral;
    };

    match criteria {
        Criteria::BetterWhenAbove => {
            if diff > 0.0 {
                Favorability::Good
            } else if diff < 0.0 {
                Favorability::Bad
            } else {
                Favorability::Neutral
            }
        }
        Criteria::BetterWhenBelow => {
            if diff < 0.0 {
                Favorability::Good
            } else if diff > 0.0 {
                Favorability::Bad
            } else {
                Favorability::Neutral
            }
        }
        Criteria::Unknown => Favorability::Neutral,
    }
}

/// A calendar event with its computed deviation and favorability label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledEvent {
    pub event: CalendarEvent,
    pub diff: Option<f64>,
    pub favorability: Favorability,
}

/// Label one event from its own criteria and magnitude cells.
pub fn label(event: CalendarEvent) -> LabeledEvent {
    let diff = deviation(event.actual.as_deref(), event.forecast.as_deref());
    let favorability = classify(event.criteria, diff);
    LabeledEvent {
        event,
        diff,
        favorability,
    }
}
