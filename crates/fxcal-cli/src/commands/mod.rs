pub mod enrich;
pub mod merge;
pub mod reconstruct;

use std::fs;
use std::path::Path;

use chrono_tz::Tz;
use fxcal_core::{Impact, ValidationError};

use crate::error::CliError;

/// Parse the global `--timezone` flag.
pub fn parse_zone(name: &str) -> Result<Tz, CliError> {
    name.parse::<Tz>().map_err(|_| {
        CliError::from(ValidationError::UnknownTimezone {
            value: name.to_owned(),
        })
    })
}

/// Parse a comma-separated impact filter.
pub fn parse_impacts(labels: &[String]) -> Result<Vec<Impact>, CliError> {
    labels
        .iter()
        .map(|label| Impact::parse(label).map_err(CliError::from))
        .collect()
}

/// Create the parent directory of an output path if needed.
pub fn ensure_parent_dir(path: &Path) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
