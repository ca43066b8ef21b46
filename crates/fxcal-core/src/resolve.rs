//! Timestamp resolution for carried-forward date/time labels.
//!
//! The source table displays times in the operator's local timezone, so a
//! label like `Jan 6` / `8:30am` must be parsed naive, localized in an
//! injectable named zone, and only then converted to UTC. Placeholder
//! markers (`Day 1`, `Tentative`, `All Day`) have no fixed clock time; their
//! nominal local midnight stands in for "unscheduled".

use std::sync::LazyLock;

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;

use crate::error::ResolveError;

/// Parse format for a composed `{date_text} {year} {time_text}` label.
pub const EVENT_TIME_FORMAT: &str = "%b %d %Y %I:%M%p";

const PLACEHOLDER_TIME: &str = "12:00am";

static CLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d{1,2}:\d{2}(am|pm)").expect("clock pattern"));
static DAY_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Day\s+\d+").expect("day reference pattern"));
static DATE_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d{1,2}(st|nd|rd|th)\s*-\s*\d{1,2}(st|nd|rd|th)").expect("date range pattern")
});
static TENTATIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bTentative\b").expect("tentative pattern"));

/// Shape of a time-marker cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeKind {
    /// A 12-hour clock time, e.g. `8:30am`.
    Clock,
    /// A multi-day event's day counter, e.g. `Day 2`.
    DayReference,
    /// An ordinal date span, e.g. `21st - 25th`.
    DateRange,
    /// Explicitly unscheduled.
    Tentative,
}

impl TimeKind {
    /// Classify a time-marker cell; `None` when no known pattern matches.
    pub fn classify(text: &str) -> Option<Self> {
        if CLOCK_RE.is_match(text) {
            Some(Self::Clock)
        } else if DAY_REF_RE.is_match(text) {
            Some(Self::DayReference)
        } else if DATE_RANGE_RE.is_match(text) {
            Some(Self::DateRange)
        } else if TENTATIVE_RE.is_match(text) {
            Some(Self::Tentative)
        } else {
            None
        }
    }
}

/// True for markers that mean "no fixed clock time".
///
/// Case-sensitive substring check: `Day 1`, `All Day`, `Tentative`.
pub fn is_placeholder_time(time_text: &str) -> bool {
    time_text.contains("Day") || time_text.contains("Tentative")
}

/// Resolve a `(date_text, time_text, year)` triple to an absolute instant.
///
/// `date_text` is a `{Mon} {Day}` label (`Jan 6`); `time_text` a 12-hour
/// clock label or placeholder. The caller supplies `year` explicitly per
/// source page; year rollover is never inferred here, so a December page
/// scraped in January must be resolved with the page's own year.
///
/// Resolution is pure and idempotent: the same inputs always yield the same
/// instant, regardless of the environment's timezone.
pub fn resolve_event_time(
    date_text: &str,
    time_text: &str,
    year: i32,
    zone: Tz,
) -> Result<DateTime<Utc>, ResolveError> {
    let time_text = time_text.trim();
    let effective_time = if is_placeholder_time(time_text) {
        PLACEHOLDER_TIME
    } else if TimeKind::classify(time_text) == Some(TimeKind::DateRange) {
        return Err(ResolveError::DateRange {
            text: time_text.to_owned(),
        });
    } else {
        time_text
    };

    let composed = format!("{} {} {}", date_text.trim(), year, effective_time);
    let naive = NaiveDateTime::parse_from_str(&composed, EVENT_TIME_FORMAT).map_err(|source| {
        ResolveError::Unparseable {
            text: composed.clone(),
            source,
        }
    })?;

    localize(naive, zone, &composed)
}

/// Interpret a naive wall-clock time in `zone` and convert to UTC.
///
/// DST ambiguity (fall-back) picks the earliest offset. A DST gap
/// (spring-forward) skips the wall-clock minute entirely; the resolution
/// advances one hour, landing on the instant the clocks jumped to.
fn localize(naive: NaiveDateTime, zone: Tz, text: &str) -> Result<DateTime<Utc>, ResolveError> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => match zone.from_local_datetime(&(naive + Duration::hours(1))) {
            LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
            LocalResult::None => Err(ResolveError::NonexistentLocalTime {
                text: text.to_owned(),
                zone: zone.to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::Timelike;
    use chrono_tz::America::New_York;
    use chrono_tz::UTC;

    use super::*;

    #[test]
    fn resolves_clock_time_through_local_zone() {
        // 8:30am Eastern on Jan 6 2025 (EST, UTC-5) is 13:30 UTC.
        let ts = resolve_event_time("Jan 6", "8:30am", 2025, New_York).expect("must resolve");
        assert_eq!(ts.to_rfc3339(), "2025-01-06T13:30:00+00:00");
    }

    #[test]
    fn resolution_is_idempotent() {
        let a = resolve_event_time("Jul 4", "2:00pm", 2025, New_York).expect("must resolve");
        let b = resolve_event_time("Jul 4", "2:00pm", 2025, New_York).expect("must resolve");
        assert_eq!(a, b);
    }

    #[test]
    fn placeholder_times_resolve_to_local_midnight() {
        for marker in ["Day 1", "Day 2", "Tentative", "All Day"] {
            let ts = resolve_event_time("Mar 14", marker, 2025, New_York).expect("must resolve");
            let local = ts.with_timezone(&New_York);
            assert_eq!(local.hour(), 0, "marker {marker:?}");
            assert_eq!(local.minute(), 0, "marker {marker:?}");
        }
    }

    #[test]
    fn december_and_january_use_the_supplied_year() {
        let dec = resolve_event_time("Dec 31", "11:00pm", 2024, UTC).expect("must resolve");
        let jan = resolve_event_time("Jan 1", "12:15am", 2025, UTC).expect("must resolve");
        assert_eq!(dec.to_rfc3339(), "2024-12-31T23:00:00+00:00");
        assert_eq!(jan.to_rfc3339(), "2025-01-01T00:15:00+00:00");
        assert!(dec < jan);
    }

    #[test]
    fn dst_gap_advances_one_hour() {
        // 2:30am on Mar 9 2025 does not exist in New York; clocks jump
        // 2:00 -> 3:00, so the resolved wall clock is 3:30am EDT.
        let ts = resolve_event_time("Mar 9", "2:30am", 2025, New_York).expect("must resolve");
        let local = ts.with_timezone(&New_York);
        assert_eq!((local.hour(), local.minute()), (3, 30));
    }

    #[test]
    fn dst_ambiguity_picks_earliest_offset() {
        // 1:30am on Nov 2 2025 occurs twice in New York; earliest is EDT
        // (UTC-4), i.e. 05:30 UTC.
        let ts = resolve_event_time("Nov 2", "1:30am", 2025, New_York).expect("must resolve");
        assert_eq!(ts.to_rfc3339(), "2025-11-02T05:30:00+00:00");
    }

    #[test]
    fn date_ranges_are_not_resolvable() {
        let err = resolve_event_time("Apr 1", "21st - 25th", 2025, UTC).expect_err("must fail");
        assert!(matches!(err, ResolveError::DateRange { .. }));
    }

    #[test]
    fn garbage_input_is_an_explicit_error() {
        let err = resolve_event_time("not a date", "8:30am", 2025, UTC).expect_err("must fail");
        assert!(matches!(err, ResolveError::Unparseable { .. }));
    }

    #[test]
    fn classifies_time_marker_shapes() {
        assert_eq!(TimeKind::classify("8:30am"), Some(TimeKind::Clock));
        assert_eq!(TimeKind::classify("Day 2"), Some(TimeKind::DayReference));
        assert_eq!(TimeKind::classify("21st - 25th"), Some(TimeKind::DateRange));
        assert_eq!(TimeKind::classify("Tentative"), Some(TimeKind::Tentative));
        assert_eq!(TimeKind::classify(""), None);
    }
}
