//! Cron-driven scheduler for the link check job.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use datacat_cron::{CronExpression, SearchHorizon};
use datacat_store::ScheduleStore;

use crate::checker::LinkChecker;
use crate::error::LinkCheckError;

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;

/// A loaded schedule and its next fire time.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledJob {
    /// `link_check_<schedule id>`.
    pub job_id: String,
    pub expression: CronExpression,
    pub next_run: NaiveDateTime,
}

/// Runs [`LinkChecker::check_all`] whenever an active schedule is due.
pub struct LinkCheckScheduler {
    schedules: Arc<dyn ScheduleStore>,
    checker: Arc<LinkChecker>,
    horizon: SearchHorizon,
    jobs: RwLock<Vec<ScheduledJob>>,
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl LinkCheckScheduler {
    pub fn new(schedules: Arc<dyn ScheduleStore>, checker: Arc<LinkChecker>) -> Self {
        Self {
            schedules,
            checker,
            horizon: SearchHorizon::default(),
            jobs: RwLock::new(Vec::new()),
        }
    }

    /// Set the search horizon used for every next-run computation.
    pub fn with_horizon(mut self, horizon: SearchHorizon) -> Self {
        self.horizon = horizon;
        self
    }

    /// Snapshot of the loaded jobs, ordered by schedule id.
    pub fn jobs(&self) -> Vec<ScheduledJob> {
        self.jobs.read().clone()
    }

    /// Drop all jobs and load the active schedules again.
    ///
    /// Schedules with an invalid or never-matching expression are skipped.
    /// Returns the number of jobs loaded.
    pub async fn reload(&self) -> Result<usize, LinkCheckError> {
        self.reload_at(now()).await
    }

    async fn reload_at(&self, reference: NaiveDateTime) -> Result<usize, LinkCheckError> {
        let schedules = self.schedules.active_schedules().await?;

        let mut jobs = Vec::with_capacity(schedules.len());
        for schedule in schedules {
            let job_id = schedule.job_id();
            let expression = match CronExpression::parse(&schedule.cron_expression) {
                Ok(expression) => expression,
                Err(e) => {
                    warn!(job_id = %job_id, "Skipping schedule: {}", e);
                    continue;
                }
            };
            match expression.next_after(reference, self.horizon) {
                Ok(next_run) => {
                    info!(job_id = %job_id, expression = %expression, %next_run, "Link check job scheduled");
                    jobs.push(ScheduledJob {
                        job_id,
                        expression,
                        next_run,
                    });
                }
                Err(e) => warn!(job_id = %job_id, "Skipping schedule: {}", e),
            }
        }

        let count = jobs.len();
        *self.jobs.write() = jobs;
        info!("Loaded {} link check jobs", count);
        Ok(count)
    }

    fn earliest_run(&self) -> Option<NaiveDateTime> {
        self.jobs.read().iter().map(|job| job.next_run).min()
    }

    /// Advance every job due at `now` past it, dropping jobs with no further run.
    ///
    /// Returns the ids of the jobs that were due. Runs missed while a check
    /// was in progress are coalesced into one.
    fn advance_due(&self, now: NaiveDateTime) -> Vec<String> {
        let mut jobs = self.jobs.write();
        let mut due = Vec::new();

        jobs.retain_mut(|job| {
            if job.next_run > now {
                return true;
            }
            due.push(job.job_id.clone());
            match job.expression.next_after(now, self.horizon) {
                Ok(next_run) => {
                    debug!(job_id = %job.job_id, %next_run, "Link check job rescheduled");
                    job.next_run = next_run;
                    true
                }
                Err(e) => {
                    warn!(job_id = %job.job_id, "Removing job: {}", e);
                    false
                }
            }
        });

        due
    }

    async fn fire_due(&self) {
        let due = self.advance_due(now());
        if due.is_empty() {
            return;
        }

        info!("Running link check for {}", due.join(", "));
        if let Err(e) = self.checker.check_all().await {
            error!("Link check failed: {}", e);
        }
    }

    /// Load the schedules and run until `cancel` flips or its sender is dropped.
    pub async fn run(self: Arc<Self>, cancel: watch::Receiver<bool>) {
        let mut cancel = cancel;
        if *cancel.borrow() {
            return;
        }

        if let Err(e) = self.reload().await {
            error!("Failed to load link check schedules: {}", e);
        }
        info!("Link check scheduler started with {} jobs", self.jobs.read().len());

        loop {
            let wait = match self.earliest_run() {
                Some(next_run) => (next_run - now()).to_std().unwrap_or(Duration::ZERO),
                None => {
                    info!("No link check jobs scheduled, waiting for shutdown");
                    let _ = cancel.changed().await;
                    break;
                }
            };

            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    tokio::select! {
                        _ = self.fire_due() => {}
                        _ = cancel.changed() => {
                            info!("Link check interrupted by shutdown");
                            break;
                        }
                    }
                }
                _ = cancel.changed() => {
                    break;
                }
            }
        }

        info!("Link check scheduler shutting down");
    }
}
