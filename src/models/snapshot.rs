// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Normalized run records and the merge/bucketing operations on them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Current record layout version. Version 1 records predate offset-corrected
/// local time: their `date`/`time_hhmm` were derived from the raw UTC value.
pub const SCHEMA_VERSION: u32 = 2;

fn legacy_schema() -> u32 {
    1
}

/// One normalized running activity, as persisted in monthly snapshot files.
///
/// Field order is the on-disk order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotItem {
    /// Strava activity ID; primary key for deduplication
    pub id: u64,
    /// Local calendar date ("YYYY-MM-DD"), derived from `start_iso`
    pub date: String,
    /// Local start time: UTC shifted by `utc_offset`, fixed-width ISO 8601.
    /// Canonical sort key.
    pub start_iso: String,
    /// Original UTC timestamp from Strava, kept verbatim
    pub utc_start: String,
    /// Offset (seconds) applied to derive local time
    pub utc_offset: i64,
    /// Start coordinates, or null when not recorded
    pub start_latlng: Option<Vec<f64>>,
    /// Distance in kilometers
    pub distance_km: f64,
    /// Moving time in seconds
    pub moving_time_s: i64,
    /// Moving time in minutes
    pub moving_time_min: f64,
    /// Average heart rate, or null when not recorded
    pub avg_hr: Option<f64>,
    /// Local time of day ("HH:MM"), derived from `start_iso`
    pub time_hhmm: String,
    /// Record layout version; records written before the marker existed
    /// deserialize as version 1
    #[serde(default = "legacy_schema")]
    pub schema: u32,
}

/// Merge an existing ordered collection with a freshly fetched batch.
///
/// Keyed by `id`: a fresh item silently replaces an existing one with the
/// same id (last-write-wins by fetch order). The result is sorted ascending
/// by `start_iso` and contains no duplicate ids. Idempotent.
pub fn merge_by_id(existing: Vec<SnapshotItem>, fresh: Vec<SnapshotItem>) -> Vec<SnapshotItem> {
    let mut by_id: HashMap<u64, SnapshotItem> = HashMap::new();
    for item in existing.into_iter().chain(fresh) {
        by_id.insert(item.id, item);
    }

    let mut merged: Vec<SnapshotItem> = by_id.into_values().collect();
    merged.sort_by(|a, b| a.start_iso.cmp(&b.start_iso));
    merged
}

/// Partition a batch into per-month groups, keyed by the local year-month
/// ("YYYY-MM") of each item. Only months present in the batch appear.
pub fn bucket_by_month(items: Vec<SnapshotItem>) -> BTreeMap<String, Vec<SnapshotItem>> {
    let mut buckets: BTreeMap<String, Vec<SnapshotItem>> = BTreeMap::new();
    for item in items {
        let Some(key) = month_key(&item.start_iso) else {
            continue;
        };
        buckets.entry(key.to_string()).or_default().push(item);
    }
    buckets
}

/// Extract "YYYY-MM" from an ISO 8601 timestamp.
fn month_key(start_iso: &str) -> Option<&str> {
    start_iso.get(..7)
}
