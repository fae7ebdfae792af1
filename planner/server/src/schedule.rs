//! Daily reset of the hydration counter.

use chrono::{DateTime, Local, NaiveTime, TimeDelta, TimeZone};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::hydration::{HydrationService, HydrationServiceError};

/// Returns the first instant strictly after `now` whose local wall-clock time is `at`.
///
/// When `at` falls into a DST gap the slot is moved one hour later. Returns `None` only when
/// the calendar runs out.
pub fn next_run_after<Tz: TimeZone>(now: &DateTime<Tz>, at: NaiveTime) -> Option<DateTime<Tz>> {
    let timezone = now.timezone();
    let mut date = now.date_naive();

    for _ in 0..3 {
        let local = date.and_time(at);
        let candidate = timezone
            .from_local_datetime(&local)
            .earliest()
            .or_else(|| {
                timezone
                    .from_local_datetime(&(local + TimeDelta::hours(1)))
                    .earliest()
            })
            .filter(|candidate| candidate > now);
        if candidate.is_some() {
            return candidate;
        }
        date = date.succ_opt()?;
    }

    None
}

/// Resets the hydration counter once. Failures are logged and never propagated.
#[tracing::instrument(skip(db))]
pub async fn reset_hydration(db: &DatabaseConnection) {
    match HydrationService::new(db).reset_liters().await {
        Ok(_) => tracing::info!("Liters value reset to 0"),
        Err(HydrationServiceError::RecordMissing) => {
            tracing::warn!("Skipped liters reset: no hydration record has been written yet")
        }
        Err(err) => tracing::error!("Error resetting liters value: {}", err),
    }
}

/// Spawns the background job that resets the hydration counter every day at `at`
/// (server-local time). Abort the returned handle to stop it.
pub fn spawn_daily_reset(db: Arc<DatabaseConnection>, at: NaiveTime) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let now = Local::now();
            let Some(next_run) = next_run_after(&now, at) else {
                tracing::error!("Could not compute the next hydration reset after {}", now);
                return;
            };
            tracing::info!("Next hydration reset scheduled at {}", next_run);

            let delay = (next_run - now).to_std().unwrap_or_default();
            tokio::time::sleep(delay).await;
            reset_hydration(&db).await;
        }
    })
}
