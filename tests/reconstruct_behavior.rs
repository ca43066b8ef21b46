//! Behavior-driven tests for row reconstruction.
//!
//! These tests verify HOW the carry-forward reconstruction recovers full
//! events from the sparsely-rendered table shape, focusing on register
//! propagation and best-effort filtering.

use chrono_tz::UTC;
use fxcal_core::{reconstruct, reconstruct_with_stats, Impact, ReconstructOptions};
use fxcal_tests::raw_rows;

// =============================================================================
// Carry-forward propagation
// =============================================================================

#[test]
fn when_a_date_header_appears_every_following_row_inherits_it() {
    // Given: one date header followed by event rows that omit the date
    let rows = raw_rows(&[
        &["Mon\nJan 6"],
        &["8:30am", "USD", "High", "Non-Farm Payrolls"],
        &["10:00am", "USD", "High", "ISM Services"],
    ]);

    // When: the rows are reconstructed for 2025
    let events = reconstruct(&rows, &ReconstructOptions::new(2025, UTC));

    // Then: both events carry the header's date and their own times
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.date_text == "Jan 6"));
    assert_eq!(events[0].time_text, "8:30am");
    assert_eq!(events[1].time_text, "10:00am");
    assert!(events.iter().all(|e| e.impact == Impact::High));
    assert_eq!(
        events[0].timestamp_utc.to_rfc3339(),
        "2025-01-06T08:30:00+00:00"
    );
    assert_eq!(
        events[1].timestamp_utc.to_rfc3339(),
        "2025-01-06T10:00:00+00:00"
    );
}

#[test]
fn when_rows_omit_the_time_they_inherit_the_previous_marker() {
    // Given: a five-cell row that states date and time, then bare rows
    let rows = raw_rows(&[
        &["Tue\nJan 7", "9:00am", "EUR", "High", "German Factory Orders"],
        &["EUR", "High", "French Trade Balance"],
        &["EUR", "High", "Italian Retail Sales"],
        &["10:30am", "GBP", "High", "Construction PMI"],
        &["GBP", "High", "Housing Starts"],
    ]);

    // When
    let events = reconstruct(&rows, &ReconstructOptions::new(2025, UTC));

    // Then: continuation rows reuse the registers until the next marker
    let times: Vec<_> = events.iter().map(|e| e.time_text.as_str()).collect();
    assert_eq!(times, ["9:00am", "9:00am", "9:00am", "10:30am", "10:30am"]);
    assert!(events.iter().all(|e| e.date_text == "Jan 7"));
}

#[test]
fn when_a_new_header_appears_the_date_register_switches() {
    let rows = raw_rows(&[
        &["Wed\nJan 8"],
        &["8:30am", "USD", "High", "CPI m/m"],
        &["Thu\nJan 9"],
        &["8:30am", "USD", "High", "PPI m/m"],
    ]);

    let events = reconstruct(&rows, &ReconstructOptions::new(2025, UTC));

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].date_text, "Jan 8");
    assert_eq!(events[1].date_text, "Jan 9");
}

// =============================================================================
// Best-effort filtering
// =============================================================================

#[test]
fn when_no_date_header_has_been_seen_event_rows_are_dropped_not_raised() {
    // Given: an event row arriving before any date header
    let rows = raw_rows(&[
        &["8:30am", "USD", "High", "Orphan Event"],
        &["Mon\nJan 6"],
        &["9:30am", "USD", "High", "Valid Event"],
    ]);

    // When
    let (events, stats) = reconstruct_with_stats(&rows, &ReconstructOptions::new(2025, UTC));

    // Then: the orphan is silently excluded and counted
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_name, "Valid Event");
    assert_eq!(stats.dropped_missing_context, 1);
}

#[test]
fn when_the_impact_cell_is_not_in_the_enumeration_the_row_is_filtered() {
    let rows = raw_rows(&[
        &["Mon\nJan 6"],
        &["8:30am", "USD", "impact", "Broken Icon Row"],
        &["9:00am", "USD", "High", "Real Event"],
    ]);

    let (events, stats) = reconstruct_with_stats(&rows, &ReconstructOptions::new(2025, UTC));

    assert_eq!(events.len(), 1);
    assert_eq!(stats.dropped_impact, 1);
}

#[test]
fn when_the_currency_is_all_the_banner_row_is_excluded() {
    let rows = raw_rows(&[
        &["Wed\nJan 1"],
        &["All Day", "All", "Holiday", "New Year's Day"],
        &["8:30am", "USD", "High", "Jobless Claims"],
    ]);

    let (events, stats) = reconstruct_with_stats(&rows, &ReconstructOptions::new(2025, UTC));

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].currency.as_str(), "USD");
    assert_eq!(stats.dropped_banner, 1);
}

#[test]
fn when_an_impact_filter_is_set_other_impacts_are_dropped() {
    let rows = raw_rows(&[
        &["Mon\nJan 6"],
        &["8:30am", "USD", "Low", "Minor Release"],
        &["9:00am", "USD", "Medium", "Medium Release"],
        &["10:00am", "USD", "High", "Major Release"],
    ]);
    let options =
        ReconstructOptions::new(2025, UTC).with_allowed_impacts([Impact::High, Impact::Holiday]);

    let events = reconstruct(&rows, &options);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_name, "Major Release");
}

// =============================================================================
// Isolation
// =============================================================================

#[test]
fn when_pages_are_reconstructed_separately_no_state_leaks_between_them() {
    let options = ReconstructOptions::new(2025, UTC);
    let january = raw_rows(&[
        &["Mon\nJan 6"],
        &["8:30am", "USD", "High", "Non-Farm Payrolls"],
    ]);
    let february = raw_rows(&[&["9:00am", "EUR", "High", "Leaked Register Event"]]);

    let first = reconstruct(&january, &options);
    let second = reconstruct(&february, &options);

    assert_eq!(first.len(), 1);
    assert!(second.is_empty(), "a fresh call must start with empty registers");
}
