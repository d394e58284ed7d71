// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Snapshot sync workflow.
//!
//! One run:
//! 1. Derive the fetch cutoff from persisted monthly files
//! 2. Refresh the access token and fetch activities after the cutoff
//! 3. Normalize raw activities (runs only, offset-corrected local time)
//! 4. Merge each month's batch into its snapshot file
//! 5. Rebuild the index and recent-window views from scratch

use anyhow::anyhow;
use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::snapshot::{self, SnapshotItem, SCHEMA_VERSION};
use crate::models::stats::{self, Index, IndexEntry, RecentSummary};
use crate::services::strava::{StravaActivitySummary, StravaClient};
use crate::store::SnapshotStore;
use crate::time_utils;

/// Strava activity type retained by the sync.
const RUN_TYPE: &str = "Run";

/// Executes one full sync run against the snapshot store.
pub struct SyncRunner {
    strava: StravaClient,
    store: SnapshotStore,
    config: Config,
}

/// Outcome of a sync run, for operator logging.
#[derive(Debug)]
pub struct SyncReport {
    /// Normalized runs in this run's batch
    pub new_items: usize,
    /// Months whose snapshot file was rewritten
    pub months_touched: Vec<String>,
    /// Totals of the rebuilt recent window
    pub recent: RecentSummary,
}

impl SyncRunner {
    pub fn new(strava: StravaClient, store: SnapshotStore, config: Config) -> Self {
        Self {
            strava,
            store,
            config,
        }
    }

    /// Execute one full sync run.
    pub async fn run(&self) -> Result<SyncReport> {
        let after = self.fetch_cutoff()?;
        tracing::info!(after, "Fetch cutoff determined");

        let token = self
            .strava
            .refresh_token(&self.config.strava_refresh_token)
            .await?;
        let raw = self
            .strava
            .list_all_activities(&token.access_token, after)
            .await?;

        let items = normalize_batch(&raw)?;
        tracing::info!(fetched = raw.len(), runs = items.len(), "Normalized batch");

        self.apply_batch(items, Utc::now())
    }

    /// Epoch-seconds cutoff for the fetch: the latest persisted start time,
    /// or the challenge start when nothing is persisted yet (or the newest
    /// monthly file is empty).
    pub fn fetch_cutoff(&self) -> Result<i64> {
        let after_iso = match self.store.latest_start_iso()? {
            Some(iso) => iso,
            None => self.config.challenge_start.clone(),
        };

        time_utils::epoch_seconds(&after_iso)
            .ok_or_else(|| AppError::Store(format!("unparseable cutoff timestamp: {}", after_iso)))
    }

    /// Merge a normalized batch into monthly files and rebuild the derived
    /// views. Months absent from the batch are left untouched on disk.
    ///
    /// Split out from [`run`](Self::run) so the merge/aggregation path can be
    /// exercised without network access.
    pub fn apply_batch(&self, items: Vec<SnapshotItem>, now: DateTime<Utc>) -> Result<SyncReport> {
        self.store.ensure_dir()?;

        let buckets = snapshot::bucket_by_month(items.clone());
        let mut months_touched = Vec::new();

        for (ym, batch) in buckets {
            let existing = self.store.read_month(&ym)?.unwrap_or_default();
            let merged = snapshot::merge_by_id(existing, batch);
            tracing::info!(ym = %ym, count = merged.len(), "Writing monthly snapshot");
            self.store.write_month(&ym, &merged)?;
            months_touched.push(ym);
        }

        let index = self.build_index(now)?;
        self.store.write_index(&index)?;

        let (window, summary) = self.build_recent(&items, now)?;
        self.store.write_recent(&window)?;
        self.store.write_recent_summary(&summary)?;

        tracing::info!(
            months = index.months.len(),
            recent_items = window.len(),
            "Derived views rebuilt"
        );

        Ok(SyncReport {
            new_items: items.len(),
            months_touched,
            recent: summary,
        })
    }

    /// Rebuild the global index by scanning every persisted monthly file.
    fn build_index(&self, now: DateTime<Utc>) -> Result<Index> {
        let mut months: Vec<IndexEntry> = Vec::new();
        for ym in self.store.month_keys()? {
            let items = self.store.read_month(&ym)?.unwrap_or_default();
            months.push(stats::month_entry(&ym, &items));
        }

        let start = self.config.challenge_start.clone();
        let start = start.get(..10).unwrap_or(&start).to_string();

        Ok(Index {
            schema_version: SCHEMA_VERSION,
            start,
            months,
            last_update: time_utils::format_utc_millis(now),
        })
    }

    /// Rebuild the trailing-window view from all persisted items plus the
    /// current batch.
    fn build_recent(
        &self,
        fresh: &[SnapshotItem],
        now: DateTime<Utc>,
    ) -> Result<(Vec<SnapshotItem>, RecentSummary)> {
        let mut persisted = Vec::new();
        for ym in self.store.month_keys()? {
            persisted.extend(self.store.read_month(&ym)?.unwrap_or_default());
        }

        let window = stats::recent_window(persisted, fresh.to_vec(), now);
        let summary = stats::recent_summary(&window, now);
        Ok((window, summary))
    }
}

/// Convert one raw Strava activity into a snapshot item.
///
/// Non-run activities produce `None`. Local time is the UTC start shifted by
/// the activity's UTC offset; `date` and `time_hhmm` come from that local
/// time, never from the raw UTC value. A missing offset means UTC.
pub fn normalize(raw: &StravaActivitySummary) -> Result<Option<SnapshotItem>> {
    if raw.activity_type != RUN_TYPE {
        return Ok(None);
    }

    let utc = time_utils::parse_iso(&raw.start_date).ok_or_else(|| {
        AppError::Internal(anyhow!(
            "Invalid Strava start_date for activity {}: {:?}",
            raw.id,
            raw.start_date
        ))
    })?;

    let utc_offset = raw.utc_offset.unwrap_or(0.0) as i64;
    let start_iso = time_utils::to_local_iso(utc, utc_offset);
    let date = start_iso[..10].to_string();
    let time_hhmm = start_iso[11..16].to_string();

    Ok(Some(SnapshotItem {
        id: raw.id,
        date,
        start_iso,
        utc_start: raw.start_date.clone(),
        utc_offset,
        start_latlng: raw.start_latlng.clone().filter(|coords| coords.len() == 2),
        distance_km: raw.distance / 1000.0,
        moving_time_s: raw.moving_time,
        moving_time_min: raw.moving_time as f64 / 60.0,
        avg_hr: raw.average_heartrate,
        time_hhmm,
        schema: SCHEMA_VERSION,
    }))
}

/// Normalize a fetched batch, dropping non-run activities.
pub fn normalize_batch(raw: &[StravaActivitySummary]) -> Result<Vec<SnapshotItem>> {
    let mut items = Vec::new();
    for activity in raw {
        if let Some(item) = normalize(activity)? {
            items.push(item);
        }
    }
    Ok(items)
}
