//! Ports: the worker pool and the docking cascade.
//!
//! A port guards two independent pieces of shared state:
//!
//! - the **harbor** (docks, arrival queue, attached ships), mutated by loading
//!   and by departures; the whole departure cascade runs under this lock.
//! - the **pool** (available workers per skill and fixed totals), mutated by
//!   job tasks reserving and returning workers.
//!
//! Waking waiters uses a generation counter in a `watch` channel rather than a
//! bare notification. A job marks the current generation as seen before it
//! checks the pool; any return after that bumps the generation and completes
//! the job's wait, even if the return landed between the check and the wait.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::pool::{Reservation, WorkerPool};
use crate::snapshot::{PortSnapshot, SkillCount};
use crate::sync::lock;
use crate::{Berth, Dock, DockId, HarborError, Job, Person, PortId, Ship, ShipId};

/// Result of [`Port::request_workers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Not satisfiable right now: the pool is not built yet, or too few
    /// workers of some skill are free. Wait for a return and retry.
    NotYet,
    /// The port can never satisfy the job. The job has already been failed
    /// with [`crate::JobStatus::LackOfResources`].
    Infeasible,
    /// Every required worker has been assigned to the job and is aboard.
    Granted,
}

impl RequestOutcome {
    /// `true` when the caller should stop waiting.
    pub fn is_resolved(self) -> bool {
        !matches!(self, Self::NotYet)
    }
}

#[derive(Debug, Default)]
struct Harbor {
    docks: Vec<Arc<Dock>>,
    queue: VecDeque<Arc<Ship>>,
    ships: Vec<Arc<Ship>>,
}

#[derive(Debug)]
pub struct Port {
    id: PortId,
    name: String,
    harbor: Mutex<Harbor>,
    pool: Mutex<WorkerPool>,
    generation: watch::Sender<u64>,
}

impl Port {
    pub fn new(id: PortId, name: impl Into<String>) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            id,
            name: name.into(),
            harbor: Mutex::new(Harbor::default()),
            pool: Mutex::new(WorkerPool::default()),
            generation,
        }
    }

    pub fn id(&self) -> PortId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // -----------------------------------------------------------------------
    // Harbor
    // -----------------------------------------------------------------------

    pub(crate) fn add_dock(&self, dock: Arc<Dock>) {
        lock(&self.harbor).docks.push(dock);
    }

    pub fn docks(&self) -> Vec<Arc<Dock>> {
        lock(&self.harbor).docks.clone()
    }

    /// Ships still attached to this port, docked or queued.
    pub fn ships(&self) -> Vec<Arc<Ship>> {
        lock(&self.harbor).ships.clone()
    }

    /// The arrival queue, head first.
    pub fn queue(&self) -> Vec<ShipId> {
        lock(&self.harbor).queue.iter().map(|s| s.id()).collect()
    }

    /// Attaches a newly loaded ship, docking it at `dock` if that dock is
    /// free and queueing it otherwise. Returns where the ship ended up.
    pub(crate) fn berth_ship(&self, ship: &Arc<Ship>, dock: Option<&Arc<Dock>>) -> Berth {
        let mut harbor = lock(&self.harbor);
        harbor.ships.push(Arc::clone(ship));
        match dock {
            Some(dock) if dock.is_free() => {
                dock.bind(ship);
                ship.dock(dock.id());
            }
            Some(dock) => {
                tracing::warn!(
                    port = %self.id,
                    dock = %dock.id(),
                    ship = %ship.id(),
                    "dock already occupied; queueing ship instead"
                );
                harbor.queue.push_back(Arc::clone(ship));
            }
            None => harbor.queue.push_back(Arc::clone(ship)),
        }
        ship.berth()
    }

    /// Frees `dock` after `ship` leaves it and hands it to the next queued
    /// ship that still has work.
    ///
    /// Job-less ships at the head of the queue are turned away without ever
    /// being docked. The whole cascade is one critical section, so two
    /// departures at this port never interleave their queue updates.
    pub(crate) fn notify_of_departure(&self, dock_id: DockId, ship: &Arc<Ship>) {
        let mut harbor = lock(&self.harbor);
        harbor.ships.retain(|s| !Arc::ptr_eq(s, ship));

        let Some(dock) = harbor.docks.iter().find(|d| d.id() == dock_id).cloned() else {
            tracing::warn!(port = %self.id, dock = %dock_id, "departure from unknown dock");
            return;
        };
        dock.release();

        while let Some(next) = harbor.queue.pop_front() {
            if next.dock_if_busy(dock.id()) {
                dock.bind(&next);
                tracing::info!(port = %self.id, dock = %dock.id(), ship = %next.id(), "dock reassigned");
                return;
            }
            harbor.ships.retain(|s| !Arc::ptr_eq(s, &next));
            next.discard();
        }
        tracing::debug!(port = %self.id, dock = %dock.id(), "dock idle; queue empty");
    }

    /// Detaches a queued ship that departed without ever docking.
    pub(crate) fn withdraw(&self, ship: &Arc<Ship>) {
        let mut harbor = lock(&self.harbor);
        harbor.queue.retain(|s| !Arc::ptr_eq(s, ship));
        harbor.ships.retain(|s| !Arc::ptr_eq(s, ship));
    }

    // -----------------------------------------------------------------------
    // Worker pool
    // -----------------------------------------------------------------------

    pub(crate) fn enroll(&self, person: Arc<Person>) -> Result<(), HarborError> {
        let id = person.id();
        if lock(&self.pool).enroll(person) {
            Ok(())
        } else {
            Err(HarborError::PoolClosed {
                port: self.id,
                person: id,
            })
        }
    }

    /// Every worker employed here, in load order.
    pub fn persons(&self) -> Vec<Arc<Person>> {
        lock(&self.pool).roster().to_vec()
    }

    /// Files every enrolled worker into the pool and fixes per-skill totals.
    ///
    /// Runs once, after loading; jobs asking for workers earlier are told to
    /// wait and are woken here.
    pub fn build_pool(&self) -> Result<(), HarborError> {
        if !lock(&self.pool).build() {
            return Err(HarborError::PoolAlreadyBuilt(self.id));
        }
        tracing::debug!(port = %self.id, "worker pool built");
        self.bump_generation();
        Ok(())
    }

    pub fn is_pool_built(&self) -> bool {
        lock(&self.pool).is_built()
    }

    /// A receiver that completes its `changed()` whenever the pool may have
    /// gained workers.
    pub(crate) fn subscribe_pool(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }

    /// Tries to give `job` one free worker per requirement, all or nothing.
    pub fn request_workers(&self, ship: &Arc<Ship>, job: &Job) -> RequestOutcome {
        let granted = {
            let mut pool = lock(&self.pool);
            let reservation = pool.reserve(job.requirements());
            match reservation {
                Reservation::Granted(workers) => {
                    for person in &workers {
                        person.assign(job.id(), ship.id());
                    }
                    workers
                }
                Reservation::NotBuilt => return RequestOutcome::NotYet,
                Reservation::Unavailable { skill } => {
                    tracing::debug!(port = %self.id, job = %job.id(), %skill, "waiting for workers");
                    return RequestOutcome::NotYet;
                }
                Reservation::Infeasible {
                    skill,
                    required,
                    total,
                } => {
                    drop(pool);
                    tracing::warn!(
                        port = %self.id,
                        job = %job.id(),
                        %skill,
                        required,
                        total,
                        "requirement can never be met at this port"
                    );
                    job.fail_for_resources();
                    return RequestOutcome::Infeasible;
                }
            }
        };
        ship.add_workers(&granted);
        RequestOutcome::Granted
    }

    /// Puts `person` back in the pool and wakes every job waiting for workers.
    ///
    /// Returns `false`, changing nothing, unless the person works at this
    /// port and is currently assigned to a job. Double returns and workers
    /// from other ports are refused.
    pub fn return_worker(&self, person: &Arc<Person>) -> bool {
        let restored = {
            let mut pool = lock(&self.pool);
            let restored = person.current_job().is_some() && pool.restore(person);
            if restored {
                person.clear_job_and_return();
            }
            restored
        };
        if restored {
            self.bump_generation();
        } else {
            tracing::warn!(
                port = %self.id,
                person = %person.id(),
                "worker is not out on a job from this port; return ignored"
            );
        }
        restored
    }

    fn bump_generation(&self) {
        self.generation.send_modify(|g| *g = g.wrapping_add(1));
    }

    pub fn pool_snapshot(&self) -> Vec<SkillCount> {
        lock(&self.pool).counts()
    }

    pub fn snapshot(&self) -> PortSnapshot {
        let (docks, queue, ships) = {
            let harbor = lock(&self.harbor);
            (
                harbor.docks.iter().map(|d| d.snapshot()).collect(),
                harbor.queue.iter().map(|s| s.id()).collect(),
                harbor.ships.iter().map(|s| s.id()).collect(),
            )
        };
        let (pool, persons) = {
            let pool = lock(&self.pool);
            (
                pool.counts(),
                pool.roster().iter().map(|p| p.snapshot()).collect(),
            )
        };
        PortSnapshot {
            id: self.id,
            name: self.name.clone(),
            docks,
            queue,
            ships,
            pool,
            persons,
        }
    }
}
