//! The world: read-only aggregate root over everything one load produced.
//!
//! A [`World`] keeps every ship and job it was built with, including ships
//! that have departed and jobs that have finished, so reports can still
//! describe them. Lookups that mirror the port graph (`find_by_name`,
//! `ships_below`, ...) only see ships still attached to a port.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinSet;

use crate::snapshot::WorldSnapshot;
use crate::{
    Dock, DockId, Job, JobId, Person, PersonId, Port, PortId, Ship, ShipDimension, ShipId,
    Timestamp, WorldId,
};

/// Objects whose name matched a [`World::find_by_name`] query, by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameMatches {
    pub ports: Vec<PortId>,
    pub docks: Vec<DockId>,
    pub ships: Vec<ShipId>,
    pub persons: Vec<PersonId>,
}

impl NameMatches {
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty() && self.docks.is_empty() && self.ships.is_empty() && self.persons.is_empty()
    }
}

#[derive(Debug)]
pub struct World {
    id: WorldId,
    name: String,
    ports: Vec<Arc<Port>>,
    docks: BTreeMap<DockId, Arc<Dock>>,
    ships: BTreeMap<ShipId, Arc<Ship>>,
    persons: BTreeMap<PersonId, Arc<Person>>,
    jobs: BTreeMap<JobId, Arc<Job>>,
    tasks: AsyncMutex<JoinSet<()>>,
}

impl World {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: WorldId,
        name: String,
        ports: Vec<Arc<Port>>,
        docks: BTreeMap<DockId, Arc<Dock>>,
        ships: BTreeMap<ShipId, Arc<Ship>>,
        persons: BTreeMap<PersonId, Arc<Person>>,
        jobs: BTreeMap<JobId, Arc<Job>>,
        tasks: JoinSet<()>,
    ) -> Self {
        Self {
            id,
            name,
            ports,
            docks,
            ships,
            persons,
            jobs,
            tasks: AsyncMutex::new(tasks),
        }
    }

    pub fn id(&self) -> WorldId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ports in load order.
    pub fn ports(&self) -> &[Arc<Port>] {
        &self.ports
    }

    pub fn port(&self, id: PortId) -> Option<&Arc<Port>> {
        self.ports.iter().find(|p| p.id() == id)
    }

    pub fn dock(&self, id: DockId) -> Option<&Arc<Dock>> {
        self.docks.get(&id)
    }

    /// Any ship ever loaded, departed or not.
    pub fn ship(&self, id: ShipId) -> Option<&Arc<Ship>> {
        self.ships.get(&id)
    }

    pub fn person(&self, id: PersonId) -> Option<&Arc<Person>> {
        self.persons.get(&id)
    }

    pub fn job(&self, id: JobId) -> Option<&Arc<Job>> {
        self.jobs.get(&id)
    }

    pub fn jobs(&self) -> impl Iterator<Item = &Arc<Job>> {
        self.jobs.values()
    }

    pub fn ships(&self) -> impl Iterator<Item = &Arc<Ship>> {
        self.ships.values()
    }

    pub fn persons(&self) -> impl Iterator<Item = &Arc<Person>> {
        self.persons.values()
    }

    // -----------------------------------------------------------------------
    // Shutdown
    // -----------------------------------------------------------------------

    /// Requests cancellation of every job that has not finished yet.
    ///
    /// Does not wait; use [`World::join`] to wait for the tasks to drain.
    pub fn stop_all(&self) {
        let mut stopped = 0usize;
        for job in self.jobs.values().filter(|j| !j.status().is_terminal()) {
            job.cancel();
            stopped += 1;
        }
        tracing::info!(world = %self.id, stopped, "stop requested for all live jobs");
    }

    /// Waits for every job task to return.
    pub async fn join(&self) {
        let mut tasks = self.tasks.lock().await;
        while let Some(result) = tasks.join_next().await {
            if let Err(err) = result {
                tracing::error!(world = %self.id, error = %err, "job task failed");
            }
        }
    }

    pub fn all_jobs_terminal(&self) -> bool {
        self.jobs.values().all(|j| j.status().is_terminal())
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Case-insensitive exact name match across ports, docks, attached ships,
    /// and persons.
    pub fn find_by_name(&self, name: &str) -> NameMatches {
        let wanted = name.to_lowercase();
        let hit = |candidate: &str| candidate.to_lowercase() == wanted;
        let mut matches = NameMatches::default();
        for port in &self.ports {
            if hit(port.name()) {
                matches.ports.push(port.id());
            }
            matches
                .docks
                .extend(port.docks().iter().filter(|d| hit(d.name())).map(|d| d.id()));
            matches
                .ships
                .extend(port.ships().iter().filter(|s| hit(s.name())).map(|s| s.id()));
            matches
                .persons
                .extend(port.persons().iter().filter(|p| hit(p.name())).map(|p| p.id()));
        }
        matches
    }

    /// Every person, at any port, whose skill matches case-insensitively.
    pub fn persons_with_skill(&self, skill: &str) -> Vec<Arc<Person>> {
        let wanted = skill.to_lowercase();
        self.ports
            .iter()
            .flat_map(|port| port.persons())
            .filter(|p| p.skill().as_str().to_lowercase() == wanted)
            .collect()
    }

    /// Attached ships whose `dimension` is strictly below `max`.
    pub fn ships_below(&self, dimension: ShipDimension, max: f64) -> Vec<Arc<Ship>> {
        self.attached_ships()
            .filter(|s| s.dimensions().get(dimension) < max)
            .collect()
    }

    /// Attached ships filtered by kind.
    pub fn ships_of_kind(&self, cargo: bool, passenger: bool) -> Vec<Arc<Ship>> {
        self.attached_ships()
            .filter(|s| (cargo && s.kind().is_cargo()) || (passenger && s.kind().is_passenger()))
            .collect()
    }

    fn attached_ships(&self) -> impl Iterator<Item = Arc<Ship>> + '_ {
        self.ports.iter().flat_map(|port| port.ships())
    }

    // -----------------------------------------------------------------------
    // Reporting
    // -----------------------------------------------------------------------

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            world: self.id,
            name: self.name.clone(),
            taken_at: Timestamp::now(),
            ports: self.ports.iter().map(|p| p.snapshot()).collect(),
            ships: self.ships.values().map(|s| s.snapshot()).collect(),
            jobs: self.jobs.values().map(|j| j.snapshot()).collect(),
        }
    }
}
