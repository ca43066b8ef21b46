//! Canonical domain types for the calendar pipeline.
//!
//! All models are strongly typed and validated at construction:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`RawRow`] | One extracted table row (ordered cell-text list) |
//! | [`CalendarEvent`] | Fully reconstructed calendar event |
//! | [`Currency`] | Validated 3-letter code or the `All` banner marker |
//! | [`Impact`] | Closed impact enumeration (Low/Medium/High/Holiday) |
//! | [`Period`] | Fixed bar width with epoch-aligned truncation |
//!
//! Impact and criteria are closed tagged variants rather than open strings,
//! so a new label showing up in the source table fails parsing (and is
//! filtered) instead of silently flowing through.

mod currency;
mod event;
mod impact;
mod period;

pub use currency::Currency;
pub use event::{CalendarEvent, RawRow};
pub use impact::Impact;
pub use period::Period;
