use std::time::Duration;

use common::settings::SettingsStore;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum JobError {
    #[error("a run needs at least one shot.")]
    NoShots,
}

/// Per-run state: how many shots are left and how long to pause between them.
#[derive(Debug, Clone)]
pub struct Job {
    total: u32,
    remaining: u32,
    interval: Duration,
}

impl Job {
    pub fn new(count: u32, interval: Duration) -> Result<Job, JobError> {
        if count == 0 {
            return Err(JobError::NoShots);
        }
        Ok(Job { total: count, remaining: count, interval })
    }

    pub fn from_settings(store: &dyn SettingsStore) -> Result<Job, JobError> {
        Job::new(store.shot_count(), Duration::from_secs(store.shot_interval() as u64))
    }

    /// Records one successful capture.
    pub fn shoot(&mut self) {
        debug_assert!(self.remaining > 0, "shoot() called on a finished job");
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn taken(&self) -> u32 {
        self.total - self.remaining
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
