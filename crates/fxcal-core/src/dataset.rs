//! Output dataset schema.
//!
//! The column names and datetime rendering match what the external
//! evaluator consumes. Building a row is a pure conversion; writing the
//! table is the host layer's job.

use serde::{Deserialize, Serialize};

use crate::align::AlignedRecord;

/// Datetime rendering used across dataset files.
pub const DATASET_DATETIME_FORMAT: &str = "%Y.%m.%d %H:%M:%S";

/// One row of the labeled, price-aligned output table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRow {
    #[serde(rename = "DateTime")]
    pub datetime: String,
    #[serde(rename = "Currency")]
    pub currency: String,
    #[serde(rename = "Impact")]
    pub impact: String,
    #[serde(rename = "Event")]
    pub event: String,
    #[serde(rename = "Actual")]
    pub actual: String,
    #[serde(rename = "Forecast")]
    pub forecast: String,
    #[serde(rename = "Diff")]
    pub diff: Option<f64>,
    #[serde(rename = "Good_for_Currency")]
    pub good_for_currency: i8,
    #[serde(rename = "pctChg")]
    pub pct_chg: Option<f64>,
}

impl DatasetRow {
    pub fn from_record(record: &AlignedRecord) -> Self {
        let event = &record.labeled.event;
        Self {
            datetime: record.bar_start.format(DATASET_DATETIME_FORMAT).to_string(),
            currency: event.currency.as_str().to_owned(),
            impact: event.impact.as_str().to_owned(),
            event: event.event_name.clone(),
            actual: event.actual.clone().unwrap_or_default(),
            forecast: event.forecast.clone().unwrap_or_default(),
            diff: record.labeled.diff,
            good_for_currency: record.labeled.favorability.sign(),
            pct_chg: record.pct_change,
        }
    }
}
