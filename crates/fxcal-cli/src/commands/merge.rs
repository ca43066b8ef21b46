//! Join enriched calendar events against a price bar series.

use chrono_tz::Tz;
use fxcal_core::{
    align, collapse_by_bar, label, resolve_event_time, CalendarEvent, Criteria, Currency,
    DatasetRow, GroupPolicy, Impact, LabeledEvent, Period, PriceSeries,
};
use tracing::{info, warn};

use crate::cli::MergeArgs;
use crate::error::CliError;
use crate::load::{self, NewsRow};

use super::ensure_parent_dir;

pub fn run(args: &MergeArgs, zone: Tz) -> Result<(), CliError> {
    let period: Period = args.period.parse().map_err(CliError::from)?;
    let policy = args
        .group_policy
        .as_deref()
        .map(|name| name.parse::<GroupPolicy>())
        .transpose()?;

    let files = load::collect_news_files(&args.news_dir, args.year)?;
    if files.is_empty() {
        return Err(CliError::Input(format!(
            "no news CSVs found under '{}'",
            args.news_dir.display()
        )));
    }

    let mut labeled: Vec<LabeledEvent> = Vec::new();
    let mut neutral = 0usize;
    let mut excluded = 0usize;
    let mut skipped = 0usize;
    for (path, year) in &files {
        let mut rows = load::read_news_rows(path)?;
        load::forward_fill(&mut rows);
        for row in rows {
            match labeled_event(&row, *year, zone, args) {
                Selection::Keep(event) => labeled.push(event),
                Selection::Neutral => neutral += 1,
                Selection::Excluded => excluded += 1,
                Selection::Skipped(reason) => {
                    skipped += 1;
                    warn!(path = %path.display(), reason, event = %row.event, "skipping news row");
                }
            }
        }
    }
    info!(
        files = files.len(),
        events = labeled.len(),
        neutral_criteria = neutral,
        excluded_currency = excluded,
        skipped,
        "collected labeled events"
    );

    let bars = load::read_price_bars(&args.price)?;
    if bars.is_empty() {
        return Err(CliError::Input(format!(
            "no usable price bars in '{}'",
            args.price.display()
        )));
    }
    let series = PriceSeries::new(bars);

    let records = align(labeled, &series, period);
    let unmatched = records.iter().filter(|record| !record.is_matched()).count();
    info!(
        bars = series.len(),
        records = records.len(),
        unmatched,
        "aligned events to price bars"
    );

    ensure_parent_dir(&args.out)?;
    let mut writer = csv::Writer::from_path(&args.out)?;
    for record in &records {
        writer.serialize(DatasetRow::from_record(record))?;
    }
    writer.flush()?;
    info!(path = %args.out.display(), "wrote aligned dataset");

    if let Some(policy) = policy {
        let grouped_out = args.grouped_out.as_ref().ok_or_else(|| {
            CliError::Input("--group-policy requires --grouped-out".to_owned())
        })?;
        let consensus = collapse_by_bar(&records, policy);
        ensure_parent_dir(grouped_out)?;
        let mut writer = csv::Writer::from_path(grouped_out)?;
        for row in &consensus {
            writer.serialize(row)?;
        }
        writer.flush()?;
        info!(path = %grouped_out.display(), bars = consensus.len(), "wrote collapsed consensus");
    }

    Ok(())
}

enum Selection {
    Keep(LabeledEvent),
    Neutral,
    Excluded,
    Skipped(&'static str),
}

/// Turn one enriched news row into a labeled event, or say why not.
fn labeled_event(row: &NewsRow, year: i32, zone: Tz, args: &MergeArgs) -> Selection {
    let criteria = Criteria::from(row.criteria);
    if !criteria.is_known() {
        return Selection::Neutral;
    }

    let Ok(currency) = Currency::parse(&row.currency) else {
        return Selection::Skipped("unparsable currency");
    };
    if currency.is_aggregate() {
        return Selection::Skipped("aggregate currency row");
    }
    if args
        .exclude_currencies
        .iter()
        .any(|code| code.eq_ignore_ascii_case(currency.as_str()))
    {
        return Selection::Excluded;
    }

    let Ok(impact) = Impact::parse(&row.impact) else {
        return Selection::Skipped("unknown impact");
    };

    let date_text = strip_weekday(&row.date);
    let Ok(timestamp_utc) = resolve_event_time(&date_text, &row.time, year, zone) else {
        return Selection::Skipped("unresolvable date/time");
    };

    Selection::Keep(label(CalendarEvent {
        date_text,
        time_text: row.time.trim().to_owned(),
        currency,
        impact,
        event_name: row.event.trim().to_owned(),
        actual: none_if_empty(&row.actual),
        forecast: none_if_empty(&row.forecast),
        previous: none_if_empty(&row.previous),
        event_id: row.event_id.clone(),
        criteria,
        timestamp_utc,
    }))
}

/// Drop a leading weekday token from a `Mon Jan 6` date label.
fn strip_weekday(date: &str) -> String {
    const WEEKDAYS: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];
    let mut tokens = date.split_whitespace().peekable();
    if let Some(first) = tokens.peek() {
        if WEEKDAYS.contains(&first.to_ascii_lowercase().as_str()) {
            tokens.next();
        }
    }
    tokens.collect::<Vec<_>>().join(" ")
}

fn none_if_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
