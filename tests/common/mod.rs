// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use challenge_sync::models::snapshot::SCHEMA_VERSION;
use challenge_sync::models::SnapshotItem;

/// Build a snapshot item with the given id, local start time and distance.
#[allow(dead_code)]
pub fn make_item(id: u64, start_iso: &str, distance_km: f64) -> SnapshotItem {
    SnapshotItem {
        id,
        date: start_iso[..10].to_string(),
        start_iso: start_iso.to_string(),
        utc_start: start_iso.to_string(),
        utc_offset: 0,
        start_latlng: None,
        distance_km,
        moving_time_s: 1800,
        moving_time_min: 30.0,
        avg_hr: None,
        time_hhmm: start_iso[11..16].to_string(),
        schema: SCHEMA_VERSION,
    }
}
