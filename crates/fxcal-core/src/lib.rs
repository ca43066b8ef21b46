//! # fxcal Core
//!
//! Calendar-event reconstruction, surprise labeling, and price alignment.
//!
//! ## Overview
//!
//! The economic-calendar source renders its table sparsely: dates appear
//! once per visual group, times once per slot, and every other row inherits
//! them. This crate rebuilds the full event stream from that shape, resolves
//! the locale-dependent timestamps to UTC, labels each event's
//! actual-vs-forecast surprise with a per-currency favorability sign, and
//! joins the labeled stream against fixed-width price bars.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`domain`] | Domain models (RawRow, CalendarEvent, Currency, Impact, Period) |
//! | [`reconstruct`] | Carry-forward row reconstruction |
//! | [`resolve`] | Naive-to-local-to-UTC timestamp resolution |
//! | [`criteria`] | Usual-effect phrase mapping |
//! | [`surprise`] | Magnitude coercion and favorability classification |
//! | [`align`] | Price series lag features and event/bar joining |
//! | [`dataset`] | Output table schema |
//! | [`error`] | Core error types |
//!
//! ## Quick Start
//!
//! ```rust
//! use fxcal_core::{reconstruct, RawRow, ReconstructOptions};
//!
//! let rows = vec![
//!     RawRow::from(vec!["Mon\nJan 6"]),
//!     RawRow::from(vec!["8:30am", "USD", "High", "Non-Farm Payrolls"]),
//! ];
//! let events = reconstruct(&rows, &ReconstructOptions::new(2025, chrono_tz::UTC));
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].time_text, "8:30am");
//! ```
//!
//! ## Error Handling
//!
//! Table noise is never an error: rows that cannot be interpreted are
//! dropped and counted, unknown usual-effect phrases degrade to a neutral
//! criteria, and events without a matching price bar keep empty price
//! fields. Errors are reserved for contract violations by the calling layer
//! (invalid currency codes, unknown periods, unresolvable timestamps handed
//! in directly).
//!
//! ## Purity
//!
//! Every transform here is synchronous and free of I/O. Reconstruction
//! state is local to one call, so independent pages can be processed
//! concurrently and concatenated before alignment.

pub mod align;
pub mod criteria;
pub mod dataset;
pub mod domain;
pub mod error;
pub mod reconstruct;
pub mod resolve;
pub mod surprise;

// Re-export commonly used types at crate root for convenience

pub use align::{
    align, collapse_by_bar, AlignedRecord, BarConsensus, GroupPolicy, PriceBar, PricePoint,
    PriceSeries,
};
pub use criteria::Criteria;
pub use dataset::{DatasetRow, DATASET_DATETIME_FORMAT};
pub use domain::{CalendarEvent, Currency, Impact, Period, RawRow};
pub use error::{ResolveError, ValidationError};
pub use reconstruct::{reconstruct, reconstruct_with_stats, ReconstructOptions, ReconstructStats};
pub use resolve::{is_placeholder_time, resolve_event_time, TimeKind, EVENT_TIME_FORMAT};
pub use surprise::{classify, deviation, label, parse_magnitude, Favorability, LabeledEvent};
