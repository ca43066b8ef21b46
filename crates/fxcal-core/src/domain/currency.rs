use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Currency tag attached to a calendar row.
///
/// Either a normalized 3-letter ISO-style code, or the source table's `All`
/// marker used on cross-currency banner rows (bank holidays and the like).
/// Banner rows are never emitted as events, but the marker must survive
/// parsing so the reconstructor can recognize and drop them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Currency {
    Code(String),
    All,
}

impl Currency {
    /// Parse and normalize a currency cell.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        let normalized = trimmed.to_ascii_uppercase();
        let valid = normalized.len() == 3 && normalized.chars().all(|ch| ch.is_ascii_alphabetic());
        if !valid {
            return Err(ValidationError::InvalidCurrency {
                value: input.to_owned(),
            });
        }

        Ok(Self::Code(normalized))
    }

    /// True for the cross-currency `All` banner marker.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Code(code) => code,
            Self::All => "All",
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Currency {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Currency {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.as_str().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_code_to_uppercase() {
        assert_eq!(Currency::parse("usd").expect("must parse").as_str(), "USD");
    }

    #[test]
    fn recognizes_aggregate_marker() {
        assert!(Currency::parse("All").expect("must parse").is_aggregate());
        assert!(Currency::parse(" all ").expect("must parse").is_aggregate());
        assert!(!Currency::parse("EUR").expect("must parse").is_aggregate());
    }

    #[test]
    fn rejects_non_codes() {
        assert!(matches!(
            Currency::parse("EURO"),
            Err(ValidationError::InvalidCurrency { .. })
        ));
        assert!(matches!(
            Currency::parse(""),
            Err(ValidationError::InvalidCurrency { .. })
        ));
    }
}
