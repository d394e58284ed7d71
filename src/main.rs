// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Challenge snapshot sync job.
//!
//! Fetches new runs from Strava and maintains monthly JSON snapshots plus
//! derived index and recent-window files under the output directory. Runs to
//! completion and exits; any error aborts the run with a non-zero status.
//!
//! Requires STRAVA_CLIENT_ID, STRAVA_CLIENT_SECRET and STRAVA_REFRESH_TOKEN
//! in the environment.

use challenge_sync::config::Config;
use challenge_sync::error::Result;
use challenge_sync::services::{StravaClient, SyncRunner};
use challenge_sync::store::SnapshotStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    init_logging();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Sync failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;
    tracing::info!(data_dir = %config.data_dir.display(), "Starting snapshot sync");

    let store = SnapshotStore::new(config.data_dir.clone());
    store.ensure_dir()?;

    let strava = StravaClient::new(
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
    );
    let runner = SyncRunner::new(strava, store, config);

    let report = runner.run().await?;
    tracing::info!(
        new_items = report.new_items,
        months = ?report.months_touched,
        recent_days = report.recent.days,
        recent_miles = report.recent.miles,
        "Sync complete"
    );
    Ok(())
}

/// Initialize logging to stderr; RUST_LOG controls verbosity.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("challenge_sync=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
