//! Ships and their docking lifecycle.
//!
//! A ship's [`Berth`] lives in a `watch` channel so that job tasks waiting for
//! a dock can subscribe to it: `wait_for` checks the current value before
//! parking, which means a dock assigned just before a job starts waiting is
//! never missed.
//!
//! The job list and the set of workers aboard share one mutex (the ship's
//! crew lock). Completions of different jobs on the same ship serialize on it,
//! and exactly one of them observes the list becoming empty and departs.

use std::sync::{Arc, Mutex, Weak};

use tokio::sync::watch;

use crate::port::RequestOutcome;
use crate::snapshot::ShipSnapshot;
use crate::sync::lock;
use crate::{
    Berth, DockId, HarborError, Job, JobId, Person, PersonId, Port, PortId, ShipDimensions,
    ShipId, ShipKind,
};

#[derive(Debug, Default)]
struct Crew {
    jobs: Vec<JobId>,
    workers: Vec<Arc<Person>>,
}

#[derive(Debug)]
pub struct Ship {
    id: ShipId,
    name: String,
    home: PortId,
    kind: ShipKind,
    dimensions: ShipDimensions,
    port: Weak<Port>,
    berth: watch::Sender<Berth>,
    crew: Mutex<Crew>,
}

impl Ship {
    /// Creates a ship belonging to `port`, initially queued.
    ///
    /// The port decides whether it docks straight away or joins the queue.
    pub(crate) fn new(
        id: ShipId,
        name: impl Into<String>,
        kind: ShipKind,
        dimensions: ShipDimensions,
        port: &Arc<Port>,
    ) -> Self {
        let (berth, _) = watch::channel(Berth::Queued);
        Self {
            id,
            name: name.into(),
            home: port.id(),
            kind,
            dimensions,
            port: Arc::downgrade(port),
            berth,
            crew: Mutex::new(Crew::default()),
        }
    }

    pub fn id(&self) -> ShipId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ShipKind {
        &self.kind
    }

    pub fn dimensions(&self) -> &ShipDimensions {
        &self.dimensions
    }

    /// The port the ship arrived at, kept after departure for reporting.
    pub fn home(&self) -> PortId {
        self.home
    }

    pub fn berth(&self) -> Berth {
        *self.berth.borrow()
    }

    pub fn is_departed(&self) -> bool {
        self.berth() == Berth::Departed
    }

    /// The owning port, or `None` once the ship has departed.
    pub fn port(&self) -> Option<Arc<Port>> {
        if self.is_departed() {
            None
        } else {
            self.port.upgrade()
        }
    }

    pub fn job_ids(&self) -> Vec<JobId> {
        lock(&self.crew).jobs.clone()
    }

    pub fn has_jobs(&self) -> bool {
        !lock(&self.crew).jobs.is_empty()
    }

    /// Workers currently aboard, across all of this ship's jobs.
    pub fn workers(&self) -> Vec<PersonId> {
        lock(&self.crew).workers.iter().map(|p| p.id()).collect()
    }

    pub(crate) fn subscribe_berth(&self) -> watch::Receiver<Berth> {
        self.berth.subscribe()
    }

    pub(crate) fn add_job(&self, job: JobId) -> Result<(), HarborError> {
        let mut crew = lock(&self.crew);
        if self.is_departed() {
            return Err(HarborError::ShipDeparted { ship: self.id, job });
        }
        crew.jobs.push(job);
        Ok(())
    }

    pub(crate) fn add_workers(&self, workers: &[Arc<Person>]) {
        lock(&self.crew).workers.extend(workers.iter().cloned());
    }

    /// Tries to obtain the workers `job` needs.
    ///
    /// A job with no requirements is granted immediately without touching the
    /// port's pool.
    pub fn initiate_job(self: &Arc<Self>, job: &Job) -> RequestOutcome {
        if job.requirements().is_empty() {
            return RequestOutcome::Granted;
        }
        job.port().request_workers(self, job)
    }

    /// Releases a finished job: its workers go back to the pool and, if it was
    /// the ship's last job, the ship departs.
    pub(crate) fn remove_job(self: &Arc<Self>, job: &Job) {
        let previous = {
            let mut crew = lock(&self.crew);
            crew.jobs.retain(|id| *id != job.id());

            let (released, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut crew.workers)
                .into_iter()
                .partition(|p| p.current_job() == Some(job.id()));
            crew.workers = kept;
            for person in &released {
                job.port().return_worker(person);
            }

            if !crew.jobs.is_empty() {
                return;
            }
            self.berth.send_replace(Berth::Departed)
        };
        self.finish_departure(previous);
    }

    /// Leaves the port, handing the dock (if any) to the next queued ship.
    pub(crate) fn leave_port(self: &Arc<Self>) {
        let previous = {
            let _crew = lock(&self.crew);
            self.berth.send_replace(Berth::Departed)
        };
        self.finish_departure(previous);
    }

    fn finish_departure(self: &Arc<Self>, previous: Berth) {
        if previous == Berth::Departed {
            return;
        }
        tracing::info!(ship = %self.id, name = %self.name, "ship departing");
        let Some(port) = self.port.upgrade() else {
            return;
        };
        match previous {
            Berth::Docked { dock } => port.notify_of_departure(dock, self),
            Berth::Queued => port.withdraw(self),
            Berth::Departed => {}
        }
    }

    /// Marks a job-less queued ship as departed without involving the port.
    ///
    /// Used by the port's cascade, which already holds the harbor lock and
    /// removes the ship from its own lists.
    pub(crate) fn discard(&self) {
        let _crew = lock(&self.crew);
        if self.berth.send_replace(Berth::Departed) != Berth::Departed {
            tracing::info!(ship = %self.id, name = %self.name, "job-less ship turned away");
        }
    }

    /// Records the dock and wakes every job waiting for one.
    ///
    /// Used while loading, before the ship's jobs exist.
    pub(crate) fn dock(&self, dock: DockId) {
        tracing::debug!(ship = %self.id, %dock, "ship docked");
        self.berth.send_replace(Berth::Docked { dock });
    }

    /// Docks the ship only if it still has jobs, deciding under the crew lock
    /// so a concurrent last-job completion cannot slip in between.
    pub(crate) fn dock_if_busy(&self, dock: DockId) -> bool {
        let crew = lock(&self.crew);
        if crew.jobs.is_empty() || self.is_departed() {
            return false;
        }
        tracing::debug!(ship = %self.id, %dock, "queued ship docked");
        self.berth.send_replace(Berth::Docked { dock });
        true
    }

    pub fn snapshot(&self) -> ShipSnapshot {
        let crew = lock(&self.crew);
        ShipSnapshot {
            id: self.id,
            name: self.name.clone(),
            port: self.home,
            kind: self.kind,
            dimensions: self.dimensions,
            berth: self.berth(),
            jobs: crew.jobs.clone(),
            workers: crew.workers.iter().map(|p| p.id()).collect(),
        }
    }
}
