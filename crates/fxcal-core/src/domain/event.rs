use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::criteria::Criteria;
use crate::{Currency, Impact};

/// One raw table row as extracted by the page-scraping collaborator.
///
/// An ordered list of cell-text strings. Length is not fixed; the observed
/// cardinalities (0, 1, 4, 5) alone determine the row's semantic role. That
/// cell-count contract is the only thing the collaborator must honor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow(Vec<String>);

impl RawRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self(cells)
    }

    pub fn cells(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for RawRow {
    fn from(cells: Vec<String>) -> Self {
        Self(cells)
    }
}

impl From<Vec<&str>> for RawRow {
    fn from(cells: Vec<&str>) -> Self {
        Self(cells.into_iter().map(str::to_owned).collect())
    }
}

/// A fully reconstructed calendar event.
///
/// Built once during reconstruction and immutable afterwards, except for
/// [`Criteria`], which is attached in a second pass once the external
/// usual-effect lookup resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Carried-forward raw date label, weekday stripped (e.g. `Jan 6`).
    pub date_text: String,
    /// Carried-forward raw time label (e.g. `8:30am`, `Day 1`, `Tentative`).
    pub time_text: String,
    pub currency: Currency,
    pub impact: Impact,
    pub event_name: String,
    /// Raw magnitude text, possibly suffixed with `%`/`K`/`M`/`B`.
    pub actual: Option<String>,
    pub forecast: Option<String>,
    pub previous: Option<String>,
    /// External identifier used to fetch the usual-effect criteria.
    pub event_id: String,
    #[serde(default)]
    pub criteria: Criteria,
    pub timestamp_utc: DateTime<Utc>,
}

impl CalendarEvent {
    /// Attach the criteria resolved from the usual-effect lookup.
    pub fn with_criteria(mut self, criteria: Criteria) -> Self {
        self.criteria = criteria;
        self
    }
}
