// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON snapshot store under the output directory.
//!
//! All files are pretty-printed JSON with a trailing newline. Writes go to a
//! temp file first and are renamed into place, so a reader never observes a
//! partially written file.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::models::snapshot::SnapshotItem;
use crate::models::stats::{Index, RecentSummary};
use crate::store::filenames;

/// Snapshot file store rooted at the output directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the output directory if missing.
    pub fn ensure_dir(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| AppError::Store(format!("{}: {}", self.dir.display(), e)))
    }

    /// Month keys ("YYYY-MM") that have a persisted file, ascending.
    ///
    /// Ascending lexicographic order is chronological because the keys are
    /// zero-padded.
    pub fn month_keys(&self) -> Result<Vec<String>, AppError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir)
            .map_err(|e| AppError::Store(format!("{}: {}", self.dir.display(), e)))?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| AppError::Store(format!("{}: {}", self.dir.display(), e)))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(key) = month_key_from_file_name(&name) {
                keys.push(key.to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }

    /// Read one month's items. `None` when the file does not exist.
    pub fn read_month(&self, ym: &str) -> Result<Option<Vec<SnapshotItem>>, AppError> {
        let path = self.month_path(ym);
        if !path.exists() {
            return Ok(None);
        }

        let text = fs::read_to_string(&path)
            .map_err(|e| AppError::Store(format!("{}: {}", path.display(), e)))?;
        let items = serde_json::from_str(&text)
            .map_err(|e| AppError::Store(format!("{}: {}", path.display(), e)))?;
        Ok(Some(items))
    }

    /// Rewrite one month's file in full.
    pub fn write_month(&self, ym: &str, items: &[SnapshotItem]) -> Result<(), AppError> {
        self.write_json(&self.month_path(ym), &items)
    }

    pub fn write_index(&self, index: &Index) -> Result<(), AppError> {
        self.write_json(&self.dir.join(filenames::INDEX), index)
    }

    pub fn write_recent(&self, items: &[SnapshotItem]) -> Result<(), AppError> {
        self.write_json(&self.dir.join(filenames::RECENT), &items)
    }

    pub fn write_recent_summary(&self, summary: &RecentSummary) -> Result<(), AppError> {
        self.write_json(&self.dir.join(filenames::RECENT_SUMMARY), summary)
    }

    /// `start_iso` of the chronologically latest persisted item, if any.
    ///
    /// Only the newest monthly file is consulted; it is sorted ascending, so
    /// its last element is the maximum. `None` when no monthly files exist or
    /// the newest one is empty.
    pub fn latest_start_iso(&self) -> Result<Option<String>, AppError> {
        let Some(latest) = self.month_keys()?.pop() else {
            return Ok(None);
        };

        let items = self.read_month(&latest)?.unwrap_or_default();
        Ok(items.last().map(|item| item.start_iso.clone()))
    }

    fn month_path(&self, ym: &str) -> PathBuf {
        self.dir.join(format!("{}.json", ym))
    }

    /// Serialize as pretty JSON with a trailing newline, then rename into
    /// place.
    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), AppError> {
        let mut body = serde_json::to_string_pretty(value)
            .map_err(|e| AppError::Store(format!("{}: {}", path.display(), e)))?;
        body.push('\n');

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &body).map_err(|e| AppError::Store(format!("{}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, path)
            .map_err(|e| AppError::Store(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }
}

/// "2025-09.json" -> "2025-09". Anything else is not a monthly snapshot.
fn month_key_from_file_name(name: &str) -> Option<&str> {
    let key = name.strip_suffix(".json")?;
    let bytes = key.as_bytes();
    if bytes.len() != 7 {
        return None;
    }

    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| if i == 4 { *b == b'-' } else { b.is_ascii_digit() });
    digits_ok.then_some(key)
}
