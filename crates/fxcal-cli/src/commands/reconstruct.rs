//! Rebuild calendar events from a raw row dump.

use chrono_tz::Tz;
use fxcal_core::{reconstruct_with_stats, ReconstructOptions, DATASET_DATETIME_FORMAT};
use serde::Serialize;
use tracing::info;

use crate::cli::ReconstructArgs;
use crate::error::CliError;
use crate::load;

use super::{ensure_parent_dir, parse_impacts};

/// Per-month event CSV row (`datetime,currency,impact,event`).
#[derive(Debug, Serialize)]
struct EventRow {
    datetime: String,
    currency: String,
    impact: String,
    event: String,
}

pub fn run(args: &ReconstructArgs, zone: Tz) -> Result<(), CliError> {
    let rows = load::read_raw_rows(&args.input)?;
    let options = ReconstructOptions::new(args.year, zone)
        .with_allowed_impacts(parse_impacts(&args.impacts)?);

    let (events, stats) = reconstruct_with_stats(&rows, &options);
    info!(
        rows = stats.rows_seen,
        events = stats.events_emitted,
        dropped = stats.dropped_total(),
        "reconstructed calendar rows"
    );
    if stats.dropped_total() > 0 {
        info!(
            impact = stats.dropped_impact,
            missing_context = stats.dropped_missing_context,
            unresolved = stats.dropped_unresolved,
            banner = stats.dropped_banner,
            malformed = stats.dropped_malformed,
            "dropped row breakdown"
        );
    }

    ensure_parent_dir(&args.out)?;
    let mut writer = csv::Writer::from_path(&args.out)?;
    for event in &events {
        writer.serialize(EventRow {
            datetime: event
                .timestamp_utc
                .format(DATASET_DATETIME_FORMAT)
                .to_string(),
            currency: event.currency.as_str().to_owned(),
            impact: event.impact.as_str().to_owned(),
            event: event.event_name.clone(),
        })?;
    }
    writer.flush()?;

    info!(path = %args.out.display(), "wrote event file");
    Ok(())
}
