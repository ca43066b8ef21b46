use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Fixed bar width of a price series.
///
/// Truncation is epoch-aligned, so H1 snaps to the top of the hour, H4 to
/// 00/04/08/... UTC and D1 to UTC midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    H1,
    H4,
    D1,
}

impl Period {
    pub fn duration(self) -> Duration {
        match self {
            Self::H1 => Duration::hours(1),
            Self::H4 => Duration::hours(4),
            Self::D1 => Duration::days(1),
        }
    }

    /// Truncate a timestamp down to the enclosing bar's start.
    pub fn truncate(self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let width = self.duration().num_seconds();
        let floored = ts.timestamp().div_euclid(width) * width;
        DateTime::from_timestamp(floored, 0).unwrap_or(ts)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::H1 => "H1",
            Self::H4 => "H4",
            Self::D1 => "D1",
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    /// Accepts `H1` as well as the `PERIOD_H1` identifiers used by price
    /// export file names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        let tail = normalized.strip_prefix("PERIOD_").unwrap_or(&normalized);
        match tail {
            "H1" => Ok(Self::H1),
            "H4" => Ok(Self::H4),
            "D1" => Ok(Self::D1),
            _ => Err(ValidationError::UnknownPeriod {
                value: s.to_owned(),
            }),
        }
    }
}
