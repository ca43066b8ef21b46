//! Row reconstruction for the sparsely-rendered calendar table.
//!
//! The source table renders the date once per visual group and the time once
//! per time slot; every following row belongs to that date/time until a new
//! marker appears. Reconstruction folds over the raw rows with two explicit
//! carry-forward registers and emits fully-populated events.
//!
//! Cell-count shapes:
//!
//! | Cells | Role |
//! |-------|------|
//! | 1 | Date-group header (when it carries a weekday token) |
//! | 4 | Time marker in the first cell, then currency/impact/event |
//! | 5 | Date restated first, time marker second |
//!
//! Malformed rows are skipped silently and counted. The table's structure is
//! not a strict contract, so reconstruction is best-effort: shape mismatches
//! are data noise, never errors.

use std::sync::LazyLock;

use chrono_tz::Tz;
use regex::Regex;
use serde::Serialize;

use crate::domain::{CalendarEvent, Currency, Impact, RawRow};
use crate::resolve::resolve_event_time;

static WEEKDAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(Mon|Tue|Wed|Thu|Fri|Sat|Sun)\b").expect("weekday pattern"));

/// Settings for one reconstruction pass.
#[derive(Debug, Clone)]
pub struct ReconstructOptions {
    /// Nominal year of the source page. Supplied per page; never inferred.
    pub year: i32,
    /// Zone the source page displayed its times in.
    pub zone: Tz,
    /// Impacts to keep. Defaults to the full closed enumeration.
    pub allowed_impacts: Vec<Impact>,
}

impl ReconstructOptions {
    pub fn new(year: i32, zone: Tz) -> Self {
        Self {
            year,
            zone,
            allowed_impacts: Impact::ALL.to_vec(),
        }
    }

    pub fn with_allowed_impacts(mut self, impacts: impl IntoIterator<Item = Impact>) -> Self {
        self.allowed_impacts = impacts.into_iter().collect();
        if self.allowed_impacts.is_empty() {
            self.allowed_impacts = Impact::ALL.to_vec();
        }
        self
    }

    fn keeps(&self, impact: Impact) -> bool {
        self.allowed_impacts.contains(&impact)
    }
}

/// Per-pass drop counters for host-layer observability.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReconstructStats {
    pub rows_seen: usize,
    pub events_emitted: usize,
    /// Impact cell unknown or outside the allowed set.
    pub dropped_impact: usize,
    /// No date or time register carried forward yet.
    pub dropped_missing_context: usize,
    /// Date/time text did not resolve to an instant.
    pub dropped_unresolved: usize,
    /// Cross-currency `All` banner rows.
    pub dropped_banner: usize,
    /// Too few cells or unparsable currency.
    pub dropped_malformed: usize,
}

impl ReconstructStats {
    pub fn dropped_total(&self) -> usize {
        self.dropped_impact
            + self.dropped_missing_context
            + self.dropped_unresolved
            + self.dropped_banner
            + self.dropped_malformed
    }
}

/// Carry-forward registers, local to a single reconstruction call.
#[derive(Debug, Default)]
struct CarryState {
    date: String,
    time: String,
}

/// Reconstruct calendar events from raw table rows.
///
/// Output is sorted by `(timestamp, currency)`. The carry registers live on
/// the call stack, so independent pages can be reconstructed concurrently
/// and concatenated afterwards.
pub fn reconstruct(rows: &[RawRow], options: &ReconstructOptions) -> Vec<CalendarEvent> {
    reconstruct_with_stats(rows, options).0
}

/// [`reconstruct`] plus drop counters for data-quality logging.
pub fn reconstruct_with_stats(
    rows: &[RawRow],
    options: &ReconstructOptions,
) -> (Vec<CalendarEvent>, ReconstructStats) {
    let mut state = CarryState::default();
    let mut stats = ReconstructStats::default();
    let mut events = Vec::new();

    for row in rows {
        stats.rows_seen += 1;
        let cells = row.cells();

        // Date headers render alone; dense 5-cell rows restate the date.
        if cells.len() == 1 || cells.len() == 5 {
            if let Some(date) = date_header_remainder(&cells[0]) {
                state.date = date;
            }
        }
        if cells.len() == 4 {
            state.time = cells[0].trim().to_owned();
        } else if cells.len() == 5 {
            state.time = cells[1].trim().to_owned();
        }

        if cells.len() > 1 {
            if let Some(event) = emit(cells, &state, options, &mut stats) {
                stats.events_emitted += 1;
                events.push(event);
            }
        }
    }

    events.sort_by(|a, b| {
        a.timestamp_utc
            .cmp(&b.timestamp_utc)
            .then_with(|| a.currency.as_str().cmp(b.currency.as_str()))
    });

    (events, stats)
}

/// Extract the date remainder from a header cell.
///
/// Header cells carry a weekday token (`Mon Jan 6`, possibly with embedded
/// newlines). The weekday is stripped and the month/day remainder kept.
/// Cells without a weekday token are not headers.
fn date_header_remainder(text: &str) -> Option<String> {
    let matched = WEEKDAY_RE.find(text)?;
    let mut remainder = String::with_capacity(text.len());
    remainder.push_str(&text[..matched.start()]);
    remainder.push_str(&text[matched.end()..]);
    let remainder = remainder.replace('\n', " ");
    let remainder = remainder.split_whitespace().collect::<Vec<_>>().join(" ");
    Some(remainder)
}

fn emit(
    cells: &[String],
    state: &CarryState,
    options: &ReconstructOptions,
    stats: &mut ReconstructStats,
) -> Option<CalendarEvent> {
    // The trailing three cells are (currency, impact, event).
    if cells.len() < 3 {
        stats.dropped_malformed += 1;
        return None;
    }
    let event_name = cells[cells.len() - 1].trim();
    let impact_text = &cells[cells.len() - 2];
    let currency_text = &cells[cells.len() - 3];

    let Ok(impact) = Impact::parse(impact_text) else {
        stats.dropped_impact += 1;
        return None;
    };
    if !options.keeps(impact) {
        stats.dropped_impact += 1;
        return None;
    }
    if state.date.is_empty() || state.time.is_empty() {
        stats.dropped_missing_context += 1;
        return None;
    }

    let Ok(currency) = Currency::parse(currency_text) else {
        stats.dropped_malformed += 1;
        return None;
    };
    if currency.is_aggregate() {
        stats.dropped_banner += 1;
        return None;
    }

    let Ok(timestamp_utc) =
        resolve_event_time(&state.date, &state.time, options.year, options.zone)
    else {
        stats.dropped_unresolved += 1;
        return None;
    };

    Some(CalendarEvent {
        date_text: state.date.clone(),
        time_text: state.time.clone(),
        currency,
        impact,
        event_name: event_name.to_owned(),
        actual: None,
        forecast: None,
        previous: None,
        event_id: String::new(),
        criteria: Default::default(),
        timestamp_utc,
    })
}
