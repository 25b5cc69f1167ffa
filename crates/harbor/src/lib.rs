//! Seaport job-scheduling and resource-coordination engine.
//!
//! Ships dock at ports, run jobs that each need a set of skilled workers for a
//! while, and leave once their last job is over. Every job is its own tokio
//! task; docks and each port's worker pool are the resources those tasks
//! contend for.
//!
//! ## Architectural Layer
//!
//! **Domain + engine.** This crate performs no file or network I/O. The world
//! description is parsed elsewhere and fed in through [`WorldBuilder`].
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`PortId`, `ShipId`, `SkillName`, ...) |
//! | [`types`] | Value types (`JobStatus`, `JobDuration`, `Berth`, `ShipKind`, ...) |
//! | [`errors`] | [`HarborError`] for the load interface |
//! | [`config`] | [`EngineConfig`] tick pacing |
//! | [`person`], [`dock`], [`ship`], [`port`], [`job`] | The live object graph |
//! | [`builder`] | [`WorldBuilder`], the load interface |
//! | [`world`] | [`World`], the aggregate root: lookup, stop-all, snapshots |
//! | [`snapshot`] | Serializable read-only views |
//!
//! ## Locking
//!
//! There is no global lock. Each port has a harbor lock (docks, queue,
//! attached ships) and a pool lock (workers); each ship has a crew lock (its
//! jobs and the workers aboard). Locks are only ever taken in the order
//! harbor → dock → crew → pool → person, and none is held across an `.await`.

pub mod builder;
pub mod config;
pub mod dock;
pub mod errors;
pub mod identifiers;
pub mod job;
pub mod person;
mod pool;
pub mod port;
pub mod ship;
pub mod snapshot;
mod sync;
pub mod types;
pub mod world;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use builder::WorldBuilder;
pub use config::{EngineConfig, TimingMode};
pub use dock::Dock;
pub use errors::HarborError;
pub use identifiers::{DockId, JobId, PersonId, PortId, ShipId, SkillName, WorldId};
pub use job::Job;
pub use person::Person;
pub use port::{Port, RequestOutcome};
pub use ship::Ship;
pub use snapshot::{
    DockSnapshot, JobSnapshot, PersonSnapshot, PortSnapshot, ShipSnapshot, SkillCount,
    WorldSnapshot,
};
pub use types::{
    progress_percent, Berth, JobDuration, JobStatus, Location, ShipDimension, ShipDimensions,
    ShipKind, Timestamp, TICK_MILLIS,
};
pub use world::{NameMatches, World};
