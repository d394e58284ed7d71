// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - Strava client and the sync workflow.

pub mod strava;
pub mod sync;

pub use strava::StravaClient;
pub use sync::{SyncReport, SyncRunner};
