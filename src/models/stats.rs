//! Challenge aggregates computed from snapshot items.
//!
//! The index and the recent-window summary are pure derived views: they are
//! rebuilt from the full persisted corpus every run, never patched in place.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::snapshot::{self, SnapshotItem, SCHEMA_VERSION};
use crate::time_utils;

/// Minimum distance for a run to count toward challenge totals (2 statute
/// miles). Earlier exports used 3.2; aggregates are rebuilt from scratch
/// every run, so totals always reflect the current value.
pub const QUALIFYING_DISTANCE_KM: f64 = 3.22;

/// Kilometers per statute mile.
pub const KM_PER_MILE: f64 = 1.60934;

/// Length of the rolling recent window, in days.
pub const RECENT_WINDOW_DAYS: i64 = 30;

/// Qualifying-day count and mileage for a set of items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub days: u32,
    pub miles: f64,
}

/// One month entry in the global index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Month key ("YYYY-MM")
    pub ym: String,
    /// Distinct local dates with at least one qualifying run
    pub days: u32,
    /// Total qualifying miles, rounded to 2 decimal places
    pub miles: f64,
}

/// Global index over all persisted months.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index {
    pub schema_version: u32,
    /// Challenge start date ("YYYY-MM-DD")
    pub start: String,
    /// One entry per persisted month, ascending by `ym`
    pub months: Vec<IndexEntry>,
    /// When this index was generated (ISO 8601)
    pub last_update: String,
}

/// Summary of the trailing 30-day window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentSummary {
    pub schema_version: u32,
    pub days: u32,
    pub miles: f64,
    /// When this summary was generated (ISO 8601)
    pub generated_at: String,
}

/// Compute qualifying totals over a set of items: miles and distinct local
/// dates, both restricted to runs at or above the qualification threshold.
pub fn qualifying_totals(items: &[SnapshotItem]) -> Totals {
    let mut days: HashSet<&str> = HashSet::new();
    let mut miles = 0.0;

    for item in items {
        if item.distance_km < QUALIFYING_DISTANCE_KM {
            continue;
        }
        days.insert(item.date.as_str());
        miles += item.distance_km / KM_PER_MILE;
    }

    Totals {
        days: days.len() as u32,
        miles: round2(miles),
    }
}

/// Build an index entry for one month's persisted items.
pub fn month_entry(ym: &str, items: &[SnapshotItem]) -> IndexEntry {
    let totals = qualifying_totals(items);
    IndexEntry {
        ym: ym.to_string(),
        days: totals.days,
        miles: totals.miles,
    }
}

/// Select the items whose local start time falls within the trailing window
/// ending at `now`, deduplicated by id and sorted ascending by `start_iso`.
///
/// `fresh` is merged after `persisted` so a freshly fetched revision of an
/// item wins; a fresh item for the current partial month may not yet be
/// reflected in its persisted monthly file at aggregation time.
pub fn recent_window(
    persisted: Vec<SnapshotItem>,
    fresh: Vec<SnapshotItem>,
    now: DateTime<Utc>,
) -> Vec<SnapshotItem> {
    let cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
    let in_window = |item: &SnapshotItem| {
        time_utils::parse_iso(&item.start_iso).is_some_and(|t| t >= cutoff)
    };

    let persisted: Vec<SnapshotItem> = persisted.into_iter().filter(|i| in_window(i)).collect();
    let fresh: Vec<SnapshotItem> = fresh.into_iter().filter(|i| in_window(i)).collect();

    snapshot::merge_by_id(persisted, fresh)
}

/// Summarize a recent window at generation time `now`.
pub fn recent_summary(window: &[SnapshotItem], now: DateTime<Utc>) -> RecentSummary {
    let totals = qualifying_totals(window);
    RecentSummary {
        schema_version: SCHEMA_VERSION,
        days: totals.days,
        miles: totals.miles,
        generated_at: time_utils::format_utc_millis(now),
    }
}

/// Round half away from zero to 2 decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
