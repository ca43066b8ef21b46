//! Forward-fill a keyed calendar export and attach usual-effect criteria.

use std::time::Duration;

use fxcal_core::{Criteria, Impact};
use tracing::{info, warn};

use crate::cli::EnrichArgs;
use crate::details::DetailClient;
use crate::error::CliError;
use crate::load;

use super::{ensure_parent_dir, parse_impacts};

pub async fn run(args: &EnrichArgs) -> Result<(), CliError> {
    let mut rows = load::read_news_rows(&args.input)?;
    load::forward_fill(&mut rows);

    let impacts = parse_impacts(&args.impacts)?;
    rows.retain(|row| {
        Impact::parse(&row.impact).is_ok_and(|impact| impacts.contains(&impact))
    });
    info!(rows = rows.len(), "events selected for enrichment");

    let client = DetailClient::new(&args.details_url)?;
    let mut neutral = 0usize;
    for row in &mut rows {
        let phrase = if row.event_id.trim().is_empty() {
            String::new()
        } else {
            match client.usual_effect(&row.event_id).await {
                Ok(phrase) => phrase,
                Err(error) => {
                    warn!(event_id = %row.event_id, %error, "detail lookup failed; using neutral criteria");
                    String::new()
                }
            }
        };

        let criteria = Criteria::from_usual_effect(&phrase);
        if !criteria.is_known() {
            neutral += 1;
        }
        row.raw_criteria = phrase;
        row.criteria = criteria.sign();

        if args.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(args.delay_ms)).await;
        }
    }
    info!(total = rows.len(), neutral, "criteria attached");

    ensure_parent_dir(&args.out)?;
    let mut writer = csv::Writer::from_path(&args.out)?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(path = %args.out.display(), "wrote enriched file");
    Ok(())
}
