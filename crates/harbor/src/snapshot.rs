//! Read-only views of engine state.
//!
//! Snapshots are owned values copied out of the live objects. Taking one never
//! waits on a job task, only on the short critical sections that guard each
//! object, so monitors can poll them freely. A world snapshot is consistent per
//! object (a port's pool counts and its persons are read under the same lock)
//! but may be slightly stale across objects.

use serde::{Deserialize, Serialize};

use crate::{
    Berth, DockId, JobDuration, JobId, JobStatus, Location, PersonId, PortId, ShipDimensions,
    ShipId, ShipKind, SkillName, Timestamp, WorldId,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonSnapshot {
    pub id: PersonId,
    pub name: String,
    pub skill: SkillName,
    pub available: bool,
    pub location: Location,
    pub current_job: Option<JobId>,
}

/// Pool occupancy for one skill at one port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCount {
    pub skill: SkillName,
    /// Workers currently in the pool.
    pub available: usize,
    /// Workers with this skill employed at the port.
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockSnapshot {
    pub id: DockId,
    pub name: String,
    pub ship: Option<ShipId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipSnapshot {
    pub id: ShipId,
    pub name: String,
    /// The port the ship was loaded at. Kept after departure for reporting.
    pub port: PortId,
    pub kind: ShipKind,
    pub dimensions: ShipDimensions,
    pub berth: Berth,
    pub jobs: Vec<JobId>,
    pub workers: Vec<PersonId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub id: JobId,
    pub name: String,
    pub ship: ShipId,
    pub port: PortId,
    pub duration: JobDuration,
    pub requirements: Vec<SkillName>,
    pub status: JobStatus,
    pub progress: u8,
    pub suspended: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortSnapshot {
    pub id: PortId,
    pub name: String,
    pub docks: Vec<DockSnapshot>,
    /// Arrival queue, head first.
    pub queue: Vec<ShipId>,
    /// Ships still attached to the port (docked or queued).
    pub ships: Vec<ShipId>,
    pub pool: Vec<SkillCount>,
    pub persons: Vec<PersonSnapshot>,
}

/// Everything a monitor needs to render one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub world: WorldId,
    pub name: String,
    pub taken_at: Timestamp,
    pub ports: Vec<PortSnapshot>,
    /// Every ship ever loaded, departed ones included.
    pub ships: Vec<ShipSnapshot>,
    pub jobs: Vec<JobSnapshot>,
}

impl WorldSnapshot {
    /// Number of jobs in each status, in lifecycle order, zero counts included.
    pub fn status_counts(&self) -> Vec<(JobStatus, usize)> {
        JobStatus::ALL
            .into_iter()
            .map(|status| (status, self.jobs.iter().filter(|j| j.status == status).count()))
            .collect()
    }

    /// `true` once every job has reached an end state.
    pub fn all_jobs_terminal(&self) -> bool {
        self.jobs.iter().all(|j| j.status.is_terminal())
    }
}
