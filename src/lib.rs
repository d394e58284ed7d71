// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Challenge-Sync: monthly JSON snapshots of Strava runs.
//!
//! This crate implements the sync job that fetches new running activities
//! from Strava and maintains the snapshot files consumed by the challenge
//! frontend: one file per calendar month, a global index, and a trailing
//! 30-day view.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod time_utils;
