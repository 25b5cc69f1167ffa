//! The load interface.
//!
//! [`WorldBuilder`] takes construction calls in dependency order (ports, then
//! docks, ships, persons, jobs) and wires the object graph. Each call either
//! succeeds or returns a [`HarborError`] without touching the world, so a
//! loader can report the failure, skip the entry, and carry on.
//!
//! Jobs go live immediately: [`WorldBuilder::add_job`] spawns the job's task
//! on the runtime the builder was created in. Jobs that ask for workers before
//! [`WorldBuilder::finish`] builds the port pools simply wait.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinSet;

use crate::world::World;
use crate::{
    Berth, Dock, DockId, EngineConfig, HarborError, Job, JobDuration, JobId, Person, PersonId,
    Port, PortId, Ship, ShipDimensions, ShipId, ShipKind, SkillName, WorldId,
};

#[derive(Debug)]
pub struct WorldBuilder {
    id: WorldId,
    name: String,
    config: EngineConfig,
    runtime: Handle,
    ports: BTreeMap<PortId, Arc<Port>>,
    port_order: Vec<PortId>,
    docks: BTreeMap<DockId, Arc<Dock>>,
    ships: BTreeMap<ShipId, Arc<Ship>>,
    persons: BTreeMap<PersonId, Arc<Person>>,
    jobs: BTreeMap<JobId, Arc<Job>>,
    tasks: JoinSet<()>,
}

impl WorldBuilder {
    /// Starts an empty world. Must be called from within a tokio runtime.
    pub fn new(name: impl Into<String>, config: EngineConfig) -> Result<Self, HarborError> {
        let runtime = Handle::try_current().map_err(|_| HarborError::NoRuntime)?;
        let id = WorldId::new_random();
        let name = name.into();
        tracing::info!(world = %id, %name, timing = ?config.timing, "loading world");
        Ok(Self {
            id,
            name,
            config,
            runtime,
            ports: BTreeMap::new(),
            port_order: Vec::new(),
            docks: BTreeMap::new(),
            ships: BTreeMap::new(),
            persons: BTreeMap::new(),
            jobs: BTreeMap::new(),
            tasks: JoinSet::new(),
        })
    }

    pub fn world_id(&self) -> WorldId {
        self.id
    }

    pub fn add_port(&mut self, id: PortId, name: impl Into<String>) -> Result<Arc<Port>, HarborError> {
        if self.ports.contains_key(&id) {
            return Err(duplicate("port", id.as_u64()));
        }
        let port = Arc::new(Port::new(id, name));
        self.ports.insert(id, Arc::clone(&port));
        self.port_order.push(id);
        Ok(port)
    }

    pub fn add_dock(
        &mut self,
        id: DockId,
        name: impl Into<String>,
        port: PortId,
    ) -> Result<Arc<Dock>, HarborError> {
        if self.docks.contains_key(&id) {
            return Err(duplicate("dock", id.as_u64()));
        }
        let owner = self.port(port)?;
        let dock = Arc::new(Dock::new(id, name, port));
        owner.add_dock(Arc::clone(&dock));
        self.docks.insert(id, Arc::clone(&dock));
        Ok(dock)
    }

    /// Adds a ship under `parent`, which is either a dock index (the ship
    /// docks there) or a port index (the ship joins the arrival queue).
    ///
    /// Dock indices are tried first. A ship naming an occupied dock is queued
    /// at that dock's port.
    pub fn add_ship(
        &mut self,
        id: ShipId,
        name: impl Into<String>,
        parent: u64,
        kind: ShipKind,
        dimensions: ShipDimensions,
    ) -> Result<Arc<Ship>, HarborError> {
        if self.ships.contains_key(&id) {
            return Err(duplicate("ship", id.as_u64()));
        }
        let (port, dock) = self.mooring(parent)?;
        let ship = Arc::new(Ship::new(id, name, kind, dimensions, &port));
        let berth = port.berth_ship(&ship, dock.as_ref());
        tracing::debug!(ship = %id, port = %port.id(), ?berth, "ship arrived");
        self.ships.insert(id, Arc::clone(&ship));
        Ok(ship)
    }

    /// Resolves a ship's parent index to its port and, when the index names
    /// a dock, that dock. Dock indices win over port indices.
    pub fn mooring(&self, parent: u64) -> Result<(Arc<Port>, Option<Arc<Dock>>), HarborError> {
        match self.docks.get(&DockId::new(parent)) {
            Some(dock) => Ok((self.port(dock.port())?, Some(Arc::clone(dock)))),
            None => self
                .ports
                .get(&PortId::new(parent))
                .map(|port| (Arc::clone(port), None))
                .ok_or(HarborError::UnknownMooring(parent)),
        }
    }

    pub fn add_person(
        &mut self,
        id: PersonId,
        name: impl Into<String>,
        port: PortId,
        skill: SkillName,
    ) -> Result<Arc<Person>, HarborError> {
        if self.persons.contains_key(&id) {
            return Err(duplicate("person", id.as_u64()));
        }
        let owner = self.port(port)?;
        let person = Arc::new(Person::new(id, name, skill, port));
        owner.enroll(Arc::clone(&person))?;
        self.persons.insert(id, Arc::clone(&person));
        Ok(person)
    }

    /// Adds a job to `ship` and spawns its task.
    ///
    /// The task starts at once, so on a multi-thread runtime a docked ship
    /// whose jobs need no workers and no time can finish them and depart
    /// while loading is still in progress. Later jobs for that ship are then
    /// refused with [`HarborError::ShipDeparted`], and which ones are refused
    /// depends on task scheduling. Give such a ship all of its jobs before
    /// yielding to the runtime if the outcome must be repeatable.
    pub fn add_job(
        &mut self,
        id: JobId,
        name: impl Into<String>,
        ship: ShipId,
        duration: JobDuration,
        requirements: Vec<SkillName>,
    ) -> Result<Arc<Job>, HarborError> {
        if self.jobs.contains_key(&id) {
            return Err(duplicate("job", id.as_u64()));
        }
        let owner = self
            .ships
            .get(&ship)
            .cloned()
            .ok_or(HarborError::UnknownShip(ship))?;
        let port = owner
            .port()
            .ok_or(HarborError::ShipDeparted { ship, job: id })?;

        let job = Arc::new(Job::new(id, name, &owner, port, duration, requirements));
        owner.add_job(id)?;
        self.tasks
            .spawn_on(Arc::clone(&job).run(self.config.clone()), &self.runtime);
        self.jobs.insert(id, Arc::clone(&job));
        Ok(job)
    }

    fn port(&self, id: PortId) -> Result<Arc<Port>, HarborError> {
        self.ports.get(&id).cloned().ok_or(HarborError::UnknownPort(id))
    }

    /// Completes loading: builds every port's worker pool, then sends away
    /// docked ships that were given no jobs so their docks go to the queue.
    pub fn finish(self) -> World {
        for port in self.ports.values() {
            if let Err(err) = port.build_pool() {
                tracing::warn!(error = %err, "worker pool not rebuilt");
            }
        }
        for ship in self.ships.values() {
            if matches!(ship.berth(), Berth::Docked { .. }) && !ship.has_jobs() {
                ship.leave_port();
            }
        }

        let ports = self
            .port_order
            .iter()
            .filter_map(|id| self.ports.get(id).cloned())
            .collect();
        tracing::info!(
            world = %self.id,
            ports = self.ports.len(),
            ships = self.ships.len(),
            persons = self.persons.len(),
            jobs = self.jobs.len(),
            "world loaded"
        );
        World::new(
            self.id,
            self.name,
            ports,
            self.docks,
            self.ships,
            self.persons,
            self.jobs,
            self.tasks,
        )
    }
}

fn duplicate(kind: &'static str, index: u64) -> HarborError {
    HarborError::DuplicateIndex { kind, index }
}
