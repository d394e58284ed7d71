// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for snapshot files and derived views.

pub mod snapshot;
pub mod stats;

pub use snapshot::SnapshotItem;
pub use stats::{Index, IndexEntry, RecentSummary};
