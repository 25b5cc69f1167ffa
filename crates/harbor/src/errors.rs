//! Error types for the seaport engine.
//!
//! [`HarborError`] covers load-interface failures: references to objects that
//! do not exist, duplicate indices, and misuse of one-shot operations. None of
//! these stop a world that is already running; the loader reports the error,
//! skips the offending entry, and keeps going.
//!
//! An infeasible skill requirement is deliberately *not* an error. It resolves
//! inside the engine by failing the job with
//! [`crate::JobStatus::LackOfResources`].

use thiserror::Error;

use crate::{JobId, PersonId, PortId, ShipId};

/// Errors raised while building or mutating a world through the load interface.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HarborError {
    /// A dock, ship, or person named a port index that was never declared.
    #[error("Unknown port {0}")]
    UnknownPort(PortId),

    /// A ship named a parent index that is neither a known dock nor a known port.
    #[error("Unknown dock or port {0}")]
    UnknownMooring(u64),

    /// A job named a ship index that was never declared.
    #[error("Unknown ship {0}")]
    UnknownShip(ShipId),

    /// The same index was declared twice for one kind of object.
    #[error("Duplicate {kind} index {index}")]
    DuplicateIndex {
        /// Object kind (`"port"`, `"dock"`, ...).
        kind: &'static str,
        /// The repeated index.
        index: u64,
    },

    /// A job was added to a ship that has already left its port.
    #[error("Ship {ship} has departed; job {job} cannot be added")]
    ShipDeparted {
        /// The departed ship.
        ship: ShipId,
        /// The rejected job.
        job: JobId,
    },

    /// A port's worker pool was built a second time.
    #[error("Worker pool for port {0} is already built")]
    PoolAlreadyBuilt(PortId),

    /// A person was added to a port after its pool was built.
    #[error("Port {port} pool is already built; person {person} cannot join")]
    PoolClosed {
        /// The port whose pool is sealed.
        port: PortId,
        /// The rejected person.
        person: PersonId,
    },

    /// Jobs are tokio tasks; a world can only be built inside a runtime.
    #[error("No tokio runtime is available to run job tasks")]
    NoRuntime,
}
