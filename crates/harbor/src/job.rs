//! Jobs and the task each one runs.
//!
//! A job is spawned as its own tokio task the moment it is loaded. The task
//! walks the job through its lifecycle:
//!
//! 1. wait until the owning ship holds a dock;
//! 2. ask the port for workers until granted, re-asking after every pool
//!    change, or give up if the port can never satisfy the requirement;
//! 3. advance progress one logical tick at a time, holding still while
//!    suspended;
//! 4. hand the job back to its ship, which returns the workers and departs
//!    when its last job is gone.
//!
//! Cancellation is a flag in a `watch` channel. Both waits race it with
//! `select!`; the tick loop checks it once per tick, never mid-tick.
//!
//! Progress, status, and the suspend flag are atomics so that monitors can
//! read them without touching any lock the task uses.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::Instrument;

use crate::port::RequestOutcome;
use crate::snapshot::JobSnapshot;
use crate::types::progress_percent;
use crate::{Berth, EngineConfig, JobDuration, JobId, JobStatus, Port, Ship, SkillName};

#[derive(Debug)]
pub struct Job {
    id: JobId,
    name: String,
    ship: Arc<Ship>,
    port: Arc<Port>,
    duration: JobDuration,
    requirements: Vec<SkillName>,
    progress: AtomicU8,
    status: AtomicU8,
    suspended: AtomicBool,
    cancel: watch::Sender<bool>,
}

impl Job {
    /// Creates a job for `ship`, negotiating for workers with `port`.
    ///
    /// The job does nothing until its task is spawned with [`Job::run`].
    pub(crate) fn new(
        id: JobId,
        name: impl Into<String>,
        ship: &Arc<Ship>,
        port: Arc<Port>,
        duration: JobDuration,
        requirements: Vec<SkillName>,
    ) -> Self {
        let (cancel, _) = watch::channel(false);
        Self {
            id,
            name: name.into(),
            ship: Arc::clone(ship),
            port,
            duration,
            requirements,
            progress: AtomicU8::new(0),
            status: AtomicU8::new(JobStatus::WaitingToDock as u8),
            suspended: AtomicBool::new(false),
            cancel,
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ship(&self) -> &Arc<Ship> {
        &self.ship
    }

    pub fn port(&self) -> &Arc<Port> {
        &self.port
    }

    pub fn duration(&self) -> JobDuration {
        self.duration
    }

    /// Required skills, one entry per worker needed.
    pub fn requirements(&self) -> &[SkillName] {
        &self.requirements
    }

    /// Percent complete, `0..=100`.
    pub fn progress(&self) -> u8 {
        self.progress.load(Ordering::Acquire)
    }

    pub fn status(&self) -> JobStatus {
        JobStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended.load(Ordering::Acquire)
    }

    pub fn is_cancel_requested(&self) -> bool {
        *self.cancel.borrow()
    }

    // -----------------------------------------------------------------------
    // Control
    // -----------------------------------------------------------------------

    /// Flips the suspend flag and returns the new value.
    ///
    /// Takes effect at the next tick; before the job is running it only
    /// decides whether the job starts out suspended.
    pub fn toggle_suspend(&self) -> bool {
        !self.suspended.fetch_xor(true, Ordering::AcqRel)
    }

    /// Asks the job to stop at its next checkpoint.
    pub fn cancel(&self) {
        if !self.cancel.send_replace(true) {
            tracing::debug!(job = %self.id, "cancel requested");
        }
    }

    /// Stops the job because its port can never staff it.
    pub(crate) fn fail_for_resources(&self) {
        self.set_status(JobStatus::LackOfResources);
        self.cancel.send_replace(true);
    }

    fn set_status(&self, status: JobStatus) {
        let previous = self.status.swap(status as u8, Ordering::AcqRel);
        if previous != status as u8 {
            tracing::debug!(job = %self.id, %status, "status changed");
        }
    }

    // -----------------------------------------------------------------------
    // Task
    // -----------------------------------------------------------------------

    /// The job's task body. Returns once the job is in an end state and its
    /// ship has released it.
    pub(crate) async fn run(self: Arc<Self>, config: EngineConfig) {
        let span = tracing::info_span!(
            "job",
            job = %self.id,
            ship = %self.ship.id(),
            port = %self.port.id()
        );
        async move {
            if self.wait_for_dock().await && self.acquire_workers().await {
                self.work(config.tick_delay()).await;
            }
            self.finish();
        }
        .instrument(span)
        .await;
    }

    /// Returns `false` if cancelled before the ship docked.
    async fn wait_for_dock(&self) -> bool {
        let mut berth = self.ship.subscribe_berth();
        let mut cancel = self.cancel.subscribe();
        tokio::select! {
            biased;
            _ = cancel.wait_for(|c| *c) => false,
            docked = berth.wait_for(Berth::is_docked) => docked.is_ok(),
        }
    }

    /// Returns `true` once workers are aboard; `false` if cancelled or the
    /// requirement turned out to be infeasible.
    async fn acquire_workers(&self) -> bool {
        let mut pool = self.port.subscribe_pool();
        let mut cancel = self.cancel.subscribe();
        loop {
            if self.is_cancel_requested() {
                return false;
            }
            // Mark the generation seen before looking at the pool so a return
            // landing after the check still completes `changed()` below.
            let _ = pool.borrow_and_update();
            match self.ship.initiate_job(self) {
                RequestOutcome::Granted => return true,
                RequestOutcome::Infeasible => return false,
                RequestOutcome::NotYet => {
                    self.set_status(JobStatus::WaitingForResources);
                    tokio::select! {
                        biased;
                        _ = cancel.wait_for(|c| *c) => return false,
                        changed = pool.changed() => {
                            if changed.is_err() {
                                return false;
                            }
                        }
                    }
                }
            }
        }
    }

    async fn work(&self, tick_delay: Duration) {
        let total = self.duration.total_ticks();
        let mut elapsed = 0;
        self.set_status(self.active_status());

        while elapsed < total && !self.is_cancel_requested() {
            tokio::time::sleep(tick_delay).await;
            if self.is_suspended() {
                self.set_status(JobStatus::Suspended);
            } else {
                elapsed += 1;
                self.set_status(JobStatus::Running);
                self.progress
                    .store(progress_percent(elapsed, total), Ordering::Release);
            }
        }
    }

    fn active_status(&self) -> JobStatus {
        if self.is_suspended() {
            JobStatus::Suspended
        } else {
            JobStatus::Running
        }
    }

    fn finish(&self) {
        if self.is_cancel_requested() {
            self.progress.store(0, Ordering::Release);
            if self.status() != JobStatus::LackOfResources {
                self.set_status(JobStatus::Cancelled);
            }
        } else {
            self.progress.store(100, Ordering::Release);
            self.set_status(JobStatus::Done);
        }
        tracing::info!(status = %self.status(), "job finished");
        self.ship.remove_job(self);
    }

    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            id: self.id,
            name: self.name.clone(),
            ship: self.ship.id(),
            port: self.port.id(),
            duration: self.duration,
            requirements: self.requirements.clone(),
            status: self.status(),
            progress: self.progress(),
            suspended: self.is_suspended(),
        }
    }
}
