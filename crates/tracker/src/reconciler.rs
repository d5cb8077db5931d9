//! Staleness reconciler.
//!
//! An open shift whose start date has rolled past midnight no longer counts
//! as "working"; the reconciler demotes such entries from the active index.
//! The shift records themselves are left untouched, end time undefined, so
//! an administrator can close or delete them later.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use shift_store::ShiftStore;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::Tracker;

/// Default sweep interval: 1 minute
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

impl<S: ShiftStore> Tracker<S> {
    /// Drops active-index entries whose shift did not start on the local
    /// calendar date of `now`. Returns the demoted user ids.
    pub fn sweep_stale(&mut self, now: DateTime<Utc>) -> Vec<Uuid> {
        let demoted = self.active_mut().sweep_stale(now);
        if !demoted.is_empty() {
            tracing::info!(demoted = demoted.len(), "Stale active shifts demoted");
        }
        demoted
    }
}

/// Periodic background sweep over a shared tracker.
pub struct Reconciler<S> {
    tracker: Arc<RwLock<Tracker<S>>>,
    /// Sweep interval in seconds
    interval_secs: u64,
    /// Flag to stop the sweep loop
    stop_flag: Arc<RwLock<bool>>,
}

impl<S: ShiftStore + 'static> Reconciler<S> {
    /// Creates a reconciler with the default interval.
    pub fn new(tracker: Arc<RwLock<Tracker<S>>>) -> Self {
        Self {
            tracker,
            interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            stop_flag: Arc::new(RwLock::new(false)),
        }
    }

    /// Overrides the sweep interval.
    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    /// Starts the sweep loop. Spawns a background task that sweeps once
    /// immediately and then at the configured interval.
    pub fn start(&self) {
        let tracker = self.tracker.clone();
        let interval_secs = self.interval_secs;
        let stop_flag = self.stop_flag.clone();

        tokio::spawn(async move {
            tracing::info!(
                "Staleness reconciler started with interval: {} seconds",
                interval_secs
            );

            tracker.write().await.sweep_stale(Utc::now());

            loop {
                if *stop_flag.read().await {
                    tracing::info!("Staleness reconciler stopped");
                    break;
                }

                tokio::time::sleep(Duration::from_secs(interval_secs)).await;

                if *stop_flag.read().await {
                    tracing::info!("Staleness reconciler stopped");
                    break;
                }

                tracker.write().await.sweep_stale(Utc::now());
            }
        });
    }

    /// Stops the sweep loop.
    pub async fn stop(&self) {
        *self.stop_flag.write().await = true;
    }
}
