use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Event impact severity, derived from the source table's impact icon.
///
/// The enumeration is closed: a cell that parses to none of these variants
/// marks the row as non-event noise and the reconstructor drops it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Impact {
    Low,
    Medium,
    High,
    Holiday,
}

impl Impact {
    pub const ALL: [Impact; 4] = [Impact::Low, Impact::Medium, Impact::High, Impact::Holiday];

    /// Parse an impact cell.
    ///
    /// Accepts both the short icon-color labels (`High`) and the long
    /// span-title form some page exports carry (`High Impact Expected`,
    /// `Non-Economic`).
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let impact = match trimmed {
            "Low" | "Low Impact Expected" => Self::Low,
            "Medium" | "Medium Impact Expected" => Self::Medium,
            "High" | "High Impact Expected" => Self::High,
            "Holiday" | "Non-Economic" => Self::Holiday,
            _ => {
                return Err(ValidationError::UnknownImpact {
                    value: input.to_owned(),
                })
            }
        };
        Ok(impact)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Holiday => "Holiday",
        }
    }
}

impl Display for Impact {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Impact {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
