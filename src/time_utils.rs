// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Format a UTC timestamp as ISO 8601 with millisecond precision and a `Z`
/// suffix. This is the fixed-width shape used throughout the snapshot files;
/// fixed width is what makes lexicographic ordering chronological.
pub fn format_utc_millis(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Shift a UTC instant by an offset and format it as local ISO 8601.
///
/// The offset is baked into the clock fields; the `Z` suffix stays so the
/// format keeps its fixed width.
pub fn to_local_iso(utc: DateTime<Utc>, utc_offset_secs: i64) -> String {
    format_utc_millis(utc + Duration::seconds(utc_offset_secs))
}

/// Parse an ISO 8601 / RFC 3339 timestamp.
pub fn parse_iso(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Epoch seconds for an ISO 8601 timestamp.
pub fn epoch_seconds(s: &str) -> Option<i64> {
    parse_iso(s).map(|dt| dt.timestamp())
}
