use thiserror::Error;

/// Validation failures raised when constructing domain values.
///
/// These indicate a contract violation by the calling layer (bad currency
/// code, unknown period identifier), not expected data noise. Noise in the
/// scraped table itself is handled by dropping rows, never by erroring.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("currency must be a 3-letter code or 'All', got '{value}'")]
    InvalidCurrency { value: String },

    #[error("unrecognized impact label '{value}'")]
    UnknownImpact { value: String },

    #[error("unrecognized bar period '{value}' (expected H1, H4, D1 or PERIOD_* form)")]
    UnknownPeriod { value: String },

    #[error("unrecognized group policy '{value}' (expected sum, majority or any)")]
    UnknownGroupPolicy { value: String },

    #[error("unknown timezone '{value}'")]
    UnknownTimezone { value: String },

    #[error("{field} must be a finite number")]
    NonFiniteValue { field: &'static str },

    #[error("bar high is below bar low")]
    InvalidBarRange,
}

/// Failures from the date/time resolver.
///
/// Reconstruction treats these as parse-skips (the row is dropped and
/// counted); callers handing in already-reconstructed events should treat
/// them as fatal, since by then date/time text is expected to be well formed.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("cannot parse '{text}' as a calendar timestamp")]
    Unparseable {
        text: String,
        #[source]
        source: chrono::format::ParseError,
    },

    #[error("time marker '{text}' is a date range with no single instant")]
    DateRange { text: String },

    #[error("local time '{text}' does not exist in zone {zone}")]
    NonexistentLocalTime { text: String, zone: String },
}
