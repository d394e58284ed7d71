// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Offline pipeline tests: cursor computation and batch application.
//!
//! These exercise everything except the network fetch, through the same
//! `SyncRunner` the binary uses.

mod common;

use challenge_sync::config::{Config, CHALLENGE_START_ISO};
use challenge_sync::models::stats::Index;
use challenge_sync::models::SnapshotItem;
use challenge_sync::services::{StravaClient, SyncRunner};
use challenge_sync::store::SnapshotStore;
use challenge_sync::time_utils;
use common::make_item;
use tempfile::{tempdir, TempDir};

/// Epoch seconds of the default challenge start (2024-12-07T00:00:00Z).
const CHALLENGE_START_EPOCH: i64 = 1_733_529_600;

fn make_runner() -> (TempDir, SyncRunner, SnapshotStore) {
    let dir = tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    store.ensure_dir().unwrap();

    let config = Config::default();
    let strava = StravaClient::new(
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
    );
    let runner = SyncRunner::new(strava, store.clone(), config);
    (dir, runner, store)
}

fn read_index(dir: &TempDir) -> Index {
    let text = std::fs::read_to_string(dir.path().join("index.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn read_recent(dir: &TempDir) -> Vec<SnapshotItem> {
    let text = std::fs::read_to_string(dir.path().join("recent-30d.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_cursor_fallback_with_no_files() {
    let (_dir, runner, _store) = make_runner();

    assert_eq!(runner.fetch_cutoff().unwrap(), CHALLENGE_START_EPOCH);
    assert_eq!(
        time_utils::epoch_seconds(CHALLENGE_START_ISO),
        Some(CHALLENGE_START_EPOCH)
    );
}

#[test]
fn test_cursor_uses_last_item_of_newest_month() {
    let (_dir, runner, store) = make_runner();

    store
        .write_month(
            "2025-09",
            &[
                make_item(1, "2025-09-01T06:00:00.000Z", 5.0),
                make_item(2, "2025-09-14T06:00:00.000Z", 5.0),
            ],
        )
        .unwrap();

    assert_eq!(
        runner.fetch_cutoff().unwrap(),
        time_utils::epoch_seconds("2025-09-14T06:00:00.000Z").unwrap()
    );
}

#[test]
fn test_cursor_empty_newest_month_falls_back_to_start() {
    let (_dir, runner, store) = make_runner();

    store.write_month("2025-09", &[]).unwrap();

    assert_eq!(runner.fetch_cutoff().unwrap(), CHALLENGE_START_EPOCH);
}

#[test]
fn test_scenario_merge_and_index() {
    let (dir, runner, store) = make_runner();
    let now = time_utils::parse_iso("2025-09-10T00:00:00Z").unwrap();

    // Existing month with one item; the batch re-fetches it plus a new one
    store
        .write_month("2025-09", &[make_item(1, "2025-09-01T06:00:00.000Z", 5.0)])
        .unwrap();

    let batch = vec![
        make_item(1, "2025-09-01T06:00:00.000Z", 5.0),
        make_item(2, "2025-09-03T06:30:00.000Z", 4.0),
    ];
    let report = runner.apply_batch(batch, now).unwrap();

    assert_eq!(report.months_touched, vec!["2025-09"]);

    let merged = store.read_month("2025-09").unwrap().unwrap();
    let ids: Vec<u64> = merged.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![1, 2]);

    let index = read_index(&dir);
    assert_eq!(index.start, "2024-12-07");
    assert_eq!(index.months.len(), 1);
    assert_eq!(index.months[0].ym, "2025-09");
    assert_eq!(index.months[0].days, 2);
    // (5.0 + 4.0) / 1.60934 = 5.5924..., rounded to 2 places
    assert_eq!(index.months[0].miles, 5.59);
}

#[test]
fn test_apply_batch_twice_is_idempotent() {
    let (dir, runner, store) = make_runner();
    let now = time_utils::parse_iso("2025-09-10T00:00:00Z").unwrap();

    let batch = vec![
        make_item(1, "2025-09-01T06:00:00.000Z", 5.0),
        make_item(2, "2025-09-03T06:30:00.000Z", 4.0),
    ];
    runner.apply_batch(batch.clone(), now).unwrap();
    runner.apply_batch(batch, now).unwrap();

    let merged = store.read_month("2025-09").unwrap().unwrap();
    assert_eq!(merged.len(), 2);

    let index = read_index(&dir);
    assert_eq!(index.months[0].days, 2);
    assert_eq!(index.months[0].miles, 5.59);
}

#[test]
fn test_untouched_months_are_left_alone() {
    let (_dir, runner, store) = make_runner();
    let now = time_utils::parse_iso("2025-09-10T00:00:00Z").unwrap();

    store
        .write_month("2025-07", &[make_item(10, "2025-07-04T06:00:00.000Z", 6.0)])
        .unwrap();

    let report = runner
        .apply_batch(vec![make_item(1, "2025-09-01T06:00:00.000Z", 5.0)], now)
        .unwrap();

    assert_eq!(report.months_touched, vec!["2025-09"]);
    // The old month still has its original contents but appears in the
    // rebuilt index
    let july = store.read_month("2025-07").unwrap().unwrap();
    assert_eq!(july.len(), 1);
    assert_eq!(july[0].id, 10);
}

#[test]
fn test_batch_spanning_months_writes_each_month() {
    let (dir, runner, store) = make_runner();
    let now = time_utils::parse_iso("2025-09-02T00:00:00Z").unwrap();

    let report = runner
        .apply_batch(
            vec![
                make_item(1, "2025-08-31T23:50:00.000Z", 5.0),
                make_item(2, "2025-09-01T06:00:00.000Z", 4.0),
            ],
            now,
        )
        .unwrap();

    assert_eq!(report.months_touched, vec!["2025-08", "2025-09"]);
    assert_eq!(store.read_month("2025-08").unwrap().unwrap().len(), 1);
    assert_eq!(store.read_month("2025-09").unwrap().unwrap().len(), 1);

    let index = read_index(&dir);
    let yms: Vec<&str> = index.months.iter().map(|m| m.ym.as_str()).collect();
    assert_eq!(yms, vec!["2025-08", "2025-09"]);
}

#[test]
fn test_recent_window_spans_persisted_and_fresh() {
    let (dir, runner, store) = make_runner();
    let now = time_utils::parse_iso("2025-09-15T12:00:00Z").unwrap();

    // Persisted: one inside the window, one far outside
    store
        .write_month("2025-06", &[make_item(1, "2025-06-01T06:00:00.000Z", 5.0)])
        .unwrap();
    store
        .write_month("2025-09", &[make_item(2, "2025-09-01T06:00:00.000Z", 5.0)])
        .unwrap();

    let report = runner
        .apply_batch(vec![make_item(3, "2025-09-14T06:00:00.000Z", 4.0)], now)
        .unwrap();

    let recent = read_recent(&dir);
    let ids: Vec<u64> = recent.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![2, 3]);

    assert_eq!(report.recent.days, 2);
    // (5.0 + 4.0) / 1.60934, rounded
    assert_eq!(report.recent.miles, 5.59);
    assert_eq!(
        report.recent.generated_at,
        "2025-09-15T12:00:00.000Z"
    );
}

#[test]
fn test_empty_batch_still_rebuilds_views() {
    let (dir, runner, store) = make_runner();
    let now = time_utils::parse_iso("2025-09-15T12:00:00Z").unwrap();

    store
        .write_month("2025-09", &[make_item(1, "2025-09-01T06:00:00.000Z", 5.0)])
        .unwrap();

    let report = runner.apply_batch(vec![], now).unwrap();

    assert!(report.months_touched.is_empty());
    let index = read_index(&dir);
    assert_eq!(index.months.len(), 1);
    assert!(dir.path().join("recent-30d.json").exists());
    assert!(dir.path().join("recent-30d-summary.json").exists());
}

#[test]
fn test_sub_threshold_runs_persist_but_do_not_count() {
    let (dir, runner, store) = make_runner();
    let now = time_utils::parse_iso("2025-09-10T00:00:00Z").unwrap();

    runner
        .apply_batch(
            vec![
                make_item(1, "2025-09-01T06:00:00.000Z", 3.0),
                make_item(2, "2025-09-02T06:00:00.000Z", 3.22),
            ],
            now,
        )
        .unwrap();

    // Both are persisted; only the qualifying one is aggregated
    assert_eq!(store.read_month("2025-09").unwrap().unwrap().len(), 2);

    let index = read_index(&dir);
    assert_eq!(index.months[0].days, 1);
    assert_eq!(index.months[0].miles, 2.0);
}
