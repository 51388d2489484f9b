//! Cron-based scheduler for periodic screening runs

use chrono::{DateTime, Utc};
use cron::Schedule;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::{ScreenError, ScreenResult};

/// Runs a job on every tick of a cron schedule.
pub struct ScreenScheduler {
    expression: String,
    schedule: Schedule,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl ScreenScheduler {
    /// Create a scheduler from a six-field cron expression
    /// (`sec min hour day-of-month month day-of-week`).
    pub fn new(expression: &str) -> ScreenResult<Self> {
        let schedule = Schedule::from_str(expression).map_err(|e| {
            ScreenError::Config(format!("invalid cron expression '{}': {}", expression, e))
        })?;

        info!(cron = %expression, "ScreenScheduler: created");

        Ok(Self {
            expression: expression.to_string(),
            schedule,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// First tick strictly after `after`.
    pub fn next_tick(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&after).next()
    }

    /// Start running `job` on every tick. Runs never overlap: the next tick is
    /// computed after the previous run finished.
    pub async fn start<F, Fut>(&self, job: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let schedule = self.schedule.clone();

        let handle = tokio::spawn(async move {
            info!("ScreenScheduler: started, waiting for cron schedule...");

            loop {
                let Some(next_tick) = schedule.upcoming(Utc).next() else {
                    warn!("ScreenScheduler: schedule has no upcoming ticks, stopping");
                    break;
                };

                info!(next_run = %next_tick, "ScreenScheduler: next run scheduled");
                let wait = (next_tick - Utc::now()).to_std().unwrap_or_default();
                tokio::time::sleep(wait).await;

                info!("ScreenScheduler: cron tick, running screen");
                job().await;
            }
        });

        let mut slot = self.handle.write().await;
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }

    /// Stop the scheduler
    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("ScreenScheduler: stopped");
        }
    }

    /// Check if the scheduler is running
    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}
