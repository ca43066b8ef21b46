//! CLI argument definitions for fxcal.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `reconstruct` | Rebuild calendar events from a raw row dump |
//! | `enrich` | Forward-fill a keyed calendar export and attach usual-effect criteria |
//! | `merge` | Join enriched events against a price bar series |
//!
//! # Examples
//!
//! ```bash
//! # Rebuild January's events from the scraper dump
//! fxcal reconstruct --input rows/2025/1.jsonl --year 2025 \
//!     --timezone America/New_York --out news/2025/1.csv
//!
//! # Attach usual-effect criteria to a keyed export
//! fxcal enrich --input raw_news/2025/1.csv --out high_impact_news/2025/1.csv
//!
//! # Merge the enriched news tree with hourly EURUSD bars
//! fxcal merge --news-dir high_impact_news --price price/EURUSD_PERIOD_H1.csv \
//!     --period H1 --timezone America/New_York --out merged/EURUSD_PERIOD_H1.csv
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Economic-calendar surprise pipeline.
///
/// Reconstructs calendar events from sparsely-rendered table rows, labels
/// actual-vs-forecast surprises per currency, and aligns them with price
/// bars for downstream evaluation.
#[derive(Debug, Parser)]
#[command(name = "fxcal", author, version, about = "Economic-calendar surprise pipeline")]
pub struct Cli {
    /// IANA timezone the source pages displayed their times in.
    #[arg(long, global = true, default_value = "UTC")]
    pub timezone: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rebuild calendar events from a raw row dump.
    Reconstruct(ReconstructArgs),
    /// Forward-fill a keyed calendar export and attach usual-effect criteria.
    Enrich(EnrichArgs),
    /// Join enriched calendar events against a price bar series.
    Merge(MergeArgs),
}

#[derive(Debug, Args)]
pub struct ReconstructArgs {
    /// Raw row dump: one JSON array of cell strings per line.
    #[arg(long)]
    pub input: PathBuf,

    /// Nominal year of the scraped page.
    #[arg(long)]
    pub year: i32,

    /// Impacts to keep (comma-separated).
    #[arg(long, value_delimiter = ',', default_values_t = ["High".to_string(), "Holiday".to_string()])]
    pub impacts: Vec<String>,

    /// Output CSV path.
    #[arg(long)]
    pub out: PathBuf,
}

#[derive(Debug, Args)]
pub struct EnrichArgs {
    /// Keyed calendar export CSV with sparse Date/Time columns.
    #[arg(long)]
    pub input: PathBuf,

    /// Output CSV path.
    #[arg(long)]
    pub out: PathBuf,

    /// Detail endpoint template; `{id}` is replaced with the event id.
    #[arg(
        long,
        default_value = "https://www.forexfactory.com/calendar/details/1-{id}"
    )]
    pub details_url: String,

    /// Impacts to keep (comma-separated).
    #[arg(long, value_delimiter = ',', default_values_t = ["High".to_string()])]
    pub impacts: Vec<String>,

    /// Delay between detail requests, in milliseconds.
    #[arg(long, default_value_t = 500)]
    pub delay_ms: u64,
}

#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Directory of enriched news CSVs, organized as `<dir>/<year>/<file>.csv`.
    #[arg(long)]
    pub news_dir: PathBuf,

    /// Price bar CSV (`time` column formatted `YYYY.MM.DD HH:MM`).
    #[arg(long)]
    pub price: PathBuf,

    /// Bar period of the price series.
    #[arg(long, default_value = "H1")]
    pub period: String,

    /// Currencies whose events are excluded from the merge.
    #[arg(long, value_delimiter = ',', default_values_t = ["CNY".to_string()])]
    pub exclude_currencies: Vec<String>,

    /// Fallback year for news files whose path carries no year directory.
    #[arg(long)]
    pub year: Option<i32>,

    /// Collapse same-bar events with this policy (sum, majority, any) and
    /// write the consensus rows next to the main output.
    #[arg(long)]
    pub group_policy: Option<String>,

    /// Output path for the collapsed consensus CSV.
    #[arg(long)]
    pub grouped_out: Option<PathBuf>,

    /// Output CSV path.
    #[arg(long)]
    pub out: PathBuf,
}
