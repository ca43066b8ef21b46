//! Price alignment.
//!
//! Joins labeled calendar events against a fixed-width price bar series.
//! The join key is the event timestamp truncated down to the bar boundary,
//! modeling "which trading bar was the news released into". Events with no
//! matching bar are retained with empty price fields so missing price data
//! stays visible in the output.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Period;
use crate::surprise::{Favorability, LabeledEvent};
use crate::ValidationError;

/// One OHLC bar of a price export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PriceBar {
    pub fn new(
        time: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    ) -> Result<Self, ValidationError> {
        for (field, value) in [("open", open), ("high", high), ("low", low), ("close", close)] {
            if !value.is_finite() {
                return Err(ValidationError::NonFiniteValue { field });
            }
        }
        if high < low {
            return Err(ValidationError::InvalidBarRange);
        }
        Ok(Self {
            time,
            open,
            high,
            low,
            close,
        })
    }
}

/// A bar with its one-step lag features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub bar: PriceBar,
    /// Previous bar's close in sorted order; the first bar has none.
    pub prev_close: Option<f64>,
    /// `(close - prev_close) / prev_close * 100`.
    pub pct_change: Option<f64>,
}

/// A price series sorted ascending by bar start, with lag features computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Sort the bars and compute each bar's percentage change from its
    /// immediate predecessor. The chronologically first bar never gets one.
    pub fn new(mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|bar| bar.time);

        let mut points = Vec::with_capacity(bars.len());
        let mut prev_close: Option<f64> = None;
        for bar in bars {
            let pct_change = prev_close
                .filter(|prev| *prev != 0.0)
                .map(|prev| (bar.close - prev) / prev * 100.0);
            points.push(PricePoint {
                bar,
                prev_close,
                pct_change,
            });
            prev_close = Some(bar.close);
        }

        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A labeled event joined to the bar it was released into.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedRecord {
    pub labeled: LabeledEvent,
    /// Event timestamp truncated to the bar boundary (the join key).
    pub bar_start: DateTime<Utc>,
    pub close: Option<f64>,
    pub prev_close: Option<f64>,
    pub pct_change: Option<f64>,
}

impl AlignedRecord {
    /// True when the event found a matching price bar.
    pub fn is_matched(&self) -> bool {
        self.close.is_some()
    }
}

/// Left-join labeled events to price bars.
///
/// Every event is retained; unmatched events carry empty price fields.
/// Output order is `(bar_start, currency)`, stable within ties, so any
/// downstream grouping is deterministic.
pub fn align(labeled: Vec<LabeledEvent>, series: &PriceSeries, period: Period) -> Vec<AlignedRecord> {
    let by_start: HashMap<DateTime<Utc>, &PricePoint> = series
        .points()
        .iter()
        .map(|point| (point.bar.time, point))
        .collect();

    let mut records: Vec<AlignedRecord> = labeled
        .into_iter()
        .map(|labeled| {
            let bar_start = period.truncate(labeled.event.timestamp_utc);
            let point = by_start.get(&bar_start);
            AlignedRecord {
                bar_start,
                close: point.map(|p| p.bar.close),
                prev_close: point.and_then(|p| p.prev_close),
                pct_change: point.and_then(|p| p.pct_change),
                labeled,
            }
        })
        .collect();

    records.sort_by(|a, b| {
        a.bar_start
            .cmp(&b.bar_start)
            .then_with(|| a.labeled.event.currency.as_str().cmp(b.labeled.event.currency.as_str()))
    });

    records
}

/// Rule for collapsing same-bar events into one consensus direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupPolicy {
    /// Sign of the summed favorability signs (plurality of the non-neutral
    /// labels).
    #[default]
    SumOfSigns,
    /// A label must win a strict majority of all events in the bar.
    MajorityVote,
    /// All non-neutral labels must agree; any conflict is neutral.
    AnyNonzero,
}

impl FromStr for GroupPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" | "sum_of_signs" => Ok(Self::SumOfSigns),
            "majority" | "majority_vote" => Ok(Self::MajorityVote),
            "any" | "any_nonzero" => Ok(Self::AnyNonzero),
            _ => Err(ValidationError::UnknownGroupPolicy {
                value: s.to_owned(),
            }),
        }
    }
}

/// One bar's collapsed prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BarConsensus {
    pub bar_start: DateTime<Utc>,
    pub events: usize,
    pub favorability: Favorability,
    pub pct_change: f64,
}

/// Collapse same-bar events into one consensus row per bar.
///
/// Only records with a computed `pct_change` participate; unmatched events
/// and first-bar joins have nothing to compare a direction against.
pub fn collapse_by_bar(records: &[AlignedRecord], policy: GroupPolicy) -> Vec<BarConsensus> {
    let mut by_bar: BTreeMap<DateTime<Utc>, Vec<&AlignedRecord>> = BTreeMap::new();
    for record in records {
        if record.pct_change.is_some() {
            by_bar.entry(record.bar_start).or_default().push(record);
        }
    }

    by_bar
        .into_iter()
        .map(|(bar_start, group)| {
            let pct_change = group[0].pct_change.unwrap_or_default();
            BarConsensus {
                bar_start,
                events: group.len(),
                favorability: consensus(&group, policy),
                pct_change,
            }
        })
        .collect()
}

fn consensus(group: &[&AlignedRecord], policy: GroupPolicy) -> Favorability {
    let good = count_sign(group, 1);
    let bad = count_sign(group, -1);

    match policy {
        GroupPolicy::SumOfSigns => {
            if good > bad {
                Favorability::Good
            } else if bad > good {
                Favorability::Bad
            } else {
                Favorability::Neutral
            }
        }
        GroupPolicy::MajorityVote => {
            let half = group.len() / 2;
            if good > half {
                Favorability::Good
            } else if bad > half {
                Favorability::Bad
            } else {
                Favorability::Neutral
            }
        }
        GroupPolicy::AnyNonzero => {
            if good > 0 && bad == 0 {
                Favorability::Good
            } else if bad > 0 && good == 0 {
                Favorability::Bad
            } else {
                Favorability::Neutral
            }
        }
    }
}

fn count_sign(group: &[&AlignedRecord], sign: i8) -> usize {
    group
        .iter()
        .filter(|record| record.labeled.favorability.sign() == sign)
        .count()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::criteria::Criteria;
    use crate::domain::{CalendarEvent, Currency, Impact};
    use crate::surprise::label;

    fn bar(hour: u32, close: f64) -> PriceBar {
        PriceBar::new(
            Utc.with_ymd_and_hms(2025, 1, 6, hour, 0, 0).unwrap(),
            close,
            close + 0.5,
            close - 0.5,
            close,
        )
        .expect("valid bar")
    }

    fn event(hour: u32, minute: u32, currency: &str, criteria: Criteria, actual: &str) -> LabeledEvent {
        label(CalendarEvent {
            date_text: "Jan 6".to_owned(),
            time_text: format!("{hour}:{minute:02}am"),
            currency: Currency::parse(currency).expect("currency"),
            impact: Impact::High,
            event_name: "Test Event".to_owned(),
            actual: Some(actual.to_owned()),
            forecast: Some("1.0".to_owned()),
            previous: None,
            event_id: String::new(),
            criteria,
            timestamp_utc: Utc.with_ymd_and_hms(2025, 1, 6, hour, minute, 0).unwrap(),
        })
    }

    #[test]
    fn first_bar_never_has_a_pct_change() {
        let series = PriceSeries::new(vec![bar(10, 102.0), bar(9, 100.0)]);
        assert_eq!(series.points()[0].pct_change, None);
        assert!(series.points()[1].pct_change.is_some());
    }

    #[test]
    fn pct_change_uses_the_immediate_predecessor() {
        let series = PriceSeries::new(vec![bar(9, 100.0), bar(10, 102.0)]);
        let pct = series.points()[1].pct_change.expect("pct present");
        assert!((pct - 2.0).abs() < 1e-9);
        assert_eq!(series.points()[1].prev_close, Some(100.0));
    }

    #[test]
    fn series_sorts_unordered_input() {
        let series = PriceSeries::new(vec![bar(11, 103.0), bar(9, 100.0), bar(10, 102.0)]);
        let times: Vec<_> = series.points().iter().map(|p| p.bar.time).collect();
        let mut sorted = times.clone();
        sorted.sort();
        assert_eq!(times, sorted);
    }

    #[test]
    fn rejects_inverted_bars() {
        let err = PriceBar::new(
            Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap(),
            100.0,
            99.0,
            101.0,
            100.0,
        )
        .expect_err("must fail");
        assert_eq!(err, ValidationError::InvalidBarRange);
    }

    #[test]
    fn aligns_by_truncated_timestamp() {
        let series = PriceSeries::new(vec![bar(9, 100.0), bar(10, 102.0)]);
        let records = align(
            vec![event(10, 30, "USD", Criteria::BetterWhenAbove, "1.3")],
            &series,
            Period::H1,
        );

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].bar_start,
            Utc.with_ymd_and_hms(2025, 1, 6, 10, 0, 0).unwrap()
        );
        assert!(records[0].is_matched());
        let pct = records[0].pct_change.expect("pct present");
        assert!((pct - 2.0).abs() < 1e-9);
    }

    #[test]
    fn unmatched_events_are_retained_with_empty_price_fields() {
        let series = PriceSeries::new(vec![bar(9, 100.0)]);
        let records = align(
            vec![event(11, 15, "USD", Criteria::BetterWhenAbove, "1.3")],
            &series,
            Period::H1,
        );

        assert_eq!(records.len(), 1);
        assert!(!records[0].is_matched());
        assert_eq!(records[0].pct_change, None);
        assert_eq!(records[0].labeled.favorability, Favorability::Good);
    }

    #[test]
    fn output_order_is_bar_start_then_currency() {
        let series = PriceSeries::new(vec![bar(9, 100.0), bar(10, 102.0)]);
        let records = align(
            vec![
                event(10, 30, "USD", Criteria::BetterWhenAbove, "1.3"),
                event(10, 0, "EUR", Criteria::BetterWhenAbove, "1.3"),
                event(9, 15, "GBP", Criteria::BetterWhenAbove, "1.3"),
            ],
            &series,
            Period::H1,
        );

        let order: Vec<_> = records
            .iter()
            .map(|r| (r.bar_start, r.labeled.event.currency.as_str()))
            .collect();
        assert_eq!(order[0].1, "GBP");
        assert_eq!(order[1].1, "EUR");
        assert_eq!(order[2].1, "USD");
    }

    #[test]
    fn collapse_policies_differ_on_split_bars() {
        let series = PriceSeries::new(vec![bar(9, 100.0), bar(10, 102.0)]);
        // Two Good, one Bad, one Neutral in the 10:00 bar.
        let records = align(
            vec![
                event(10, 0, "USD", Criteria::BetterWhenAbove, "1.3"),
                event(10, 15, "EUR", Criteria::BetterWhenAbove, "1.3"),
                event(10, 30, "GBP", Criteria::BetterWhenBelow, "1.3"),
                event(10, 45, "CAD", Criteria::Unknown, "1.3"),
            ],
            &series,
            Period::H1,
        );

        let sum = collapse_by_bar(&records, GroupPolicy::SumOfSigns);
        assert_eq!(sum.len(), 1);
        assert_eq!(sum[0].events, 4);
        assert_eq!(sum[0].favorability, Favorability::Good);

        // 2 of 4 is not a strict majority.
        let majority = collapse_by_bar(&records, GroupPolicy::MajorityVote);
        assert_eq!(majority[0].favorability, Favorability::Neutral);

        // Conflicting non-neutral labels.
        let any = collapse_by_bar(&records, GroupPolicy::AnyNonzero);
        assert_eq!(any[0].favorability, Favorability::Neutral);
    }

    #[test]
    fn collapse_skips_records_without_pct_change() {
        // The 9:00 bar is the first in the series, so its join has no
        // pct_change and must not produce a consensus row.
        let series = PriceSeries::new(vec![bar(9, 100.0), bar(10, 102.0)]);
        let records = align(
            vec![
                event(9, 30, "USD", Criteria::BetterWhenAbove, "1.3"),
                event(10, 30, "EUR", Criteria::BetterWhenAbove, "1.3"),
            ],
            &series,
            Period::H1,
        );

        let collapsed = collapse_by_bar(&records, GroupPolicy::SumOfSigns);
        assert_eq!(collapsed.len(), 1);
        assert_eq!(
            collapsed[0].bar_start,
            Utc.with_ymd_and_hms(2025, 1, 6, 10, 0, 0).unwrap()
        );
    }
}
