//! Shared value types for the seaport engine.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! values with invariants (progress is a percentage, durations are finite and
//! non-negative) and take part in the engine's computations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DockId, PortId, ShipId};

/// Simulated milliseconds covered by one progress tick.
///
/// Fixed regardless of timing mode; only the real sleep per tick changes.
pub const TICK_MILLIS: u64 = 100;

// ---------------------------------------------------------------------------
// Job status
// ---------------------------------------------------------------------------

/// Lifecycle state of a [`crate::Job`].
///
/// ```text
/// WaitingToDock -> WaitingForResources <-> Running <-> Suspended
///                                      -> Done | Cancelled | LackOfResources
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum JobStatus {
    /// The owning ship has not been assigned a dock yet.
    WaitingToDock = 0,
    /// Docked, but the port cannot currently supply every required worker.
    WaitingForResources = 1,
    /// Workers acquired; progress advances once per tick.
    Running = 2,
    /// Workers acquired; progress is frozen until resumed.
    Suspended = 3,
    /// Ran to completion.
    Done = 4,
    /// Cancelled by an external request.
    Cancelled = 5,
    /// The port will never have enough workers of some required skill.
    LackOfResources = 6,
}

impl JobStatus {
    /// Returns `true` for the three end states.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Cancelled | Self::LackOfResources)
    }

    /// Every status in lifecycle order.
    pub const ALL: [JobStatus; 7] = [
        Self::WaitingToDock,
        Self::WaitingForResources,
        Self::Running,
        Self::Suspended,
        Self::Done,
        Self::Cancelled,
        Self::LackOfResources,
    ];

    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::WaitingToDock,
            1 => Self::WaitingForResources,
            2 => Self::Running,
            3 => Self::Suspended,
            4 => Self::Done,
            5 => Self::Cancelled,
            _ => Self::LackOfResources,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::WaitingToDock => "Waiting to dock",
            Self::WaitingForResources => "Waiting for resources",
            Self::Running => "Running",
            Self::Suspended => "Suspended",
            Self::Done => "Done",
            Self::Cancelled => "Cancelled",
            Self::LackOfResources => "Lack of resources",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Durations and ticks
// ---------------------------------------------------------------------------

/// How long a job runs, in simulated seconds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct JobDuration(f64);

impl JobDuration {
    /// Creates a [`JobDuration`] from seconds.
    ///
    /// Returns `None` if `seconds` is negative, infinite, or NaN.
    #[must_use]
    pub fn from_secs(seconds: f64) -> Option<Self> {
        if seconds.is_finite() && seconds >= 0.0 {
            Some(Self(seconds))
        } else {
            None
        }
    }

    /// Returns the duration in seconds.
    pub fn as_secs(self) -> f64 {
        self.0
    }

    /// Number of [`TICK_MILLIS`] ticks needed to cover this duration.
    ///
    /// Rounds up, so `1.0` yields exactly 10 ticks, `0.25` yields 3, and
    /// `0.1005` yields 2. The epsilon keeps float noise such as
    /// `0.7 * 1000.0 / 100.0 == 7.000000000000001` from adding a tick.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn total_ticks(self) -> u64 {
        let ticks = self.0 * 1000.0 / TICK_MILLIS as f64;
        (ticks - 1e-9).ceil().max(0.0) as u64
    }
}

impl std::fmt::Display for JobDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}s", self.0)
    }
}

/// Percentage of a job completed after `elapsed` of `total` ticks, floored.
///
/// A zero-tick job is complete by definition.
pub fn progress_percent(elapsed: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = elapsed.min(total) * 100 / total;
    u8::try_from(pct).unwrap_or(100)
}

// ---------------------------------------------------------------------------
// Ships
// ---------------------------------------------------------------------------

/// Physical dimensions shared by every ship.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShipDimensions {
    /// Displacement.
    pub weight: f64,
    /// Overall length.
    pub length: f64,
    /// Beam.
    pub width: f64,
    /// Depth below the waterline.
    pub draft: f64,
}

impl ShipDimensions {
    /// Returns the value of a single dimension.
    pub fn get(&self, dimension: ShipDimension) -> f64 {
        match dimension {
            ShipDimension::Weight => self.weight,
            ShipDimension::Length => self.length,
            ShipDimension::Width => self.width,
            ShipDimension::Draft => self.draft,
        }
    }
}

/// Selects one field of [`ShipDimensions`] for lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipDimension {
    Weight,
    Length,
    Width,
    Draft,
}

/// What a ship carries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShipKind {
    Cargo {
        cargo_weight: f64,
        cargo_volume: f64,
        cargo_value: f64,
    },
    Passenger {
        passengers: u32,
        rooms: u32,
        occupied_rooms: u32,
    },
}

impl ShipKind {
    /// Returns `true` for cargo ships.
    pub fn is_cargo(&self) -> bool {
        matches!(self, Self::Cargo { .. })
    }

    /// Returns `true` for passenger ships.
    pub fn is_passenger(&self) -> bool {
        matches!(self, Self::Passenger { .. })
    }
}

/// Where a ship is relative to its port.
///
/// A ship is in exactly one of these states; `Departed` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Berth {
    /// Bound to a dock at its port.
    Docked { dock: DockId },
    /// Waiting in its port's arrival queue.
    Queued,
    /// Left the port; no longer reachable from the port or any dock.
    Departed,
}

impl Berth {
    /// Returns `true` if the ship currently holds a dock.
    pub fn is_docked(&self) -> bool {
        matches!(self, Self::Docked { .. })
    }

    /// Returns the dock, if docked.
    pub fn dock(&self) -> Option<DockId> {
        match self {
            Self::Docked { dock } => Some(*dock),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Persons
// ---------------------------------------------------------------------------

/// Where a worker currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "at", content = "id", rename_all = "snake_case")]
pub enum Location {
    /// In the port's pool, available for assignment.
    Port(PortId),
    /// Aboard a ship, working a job.
    Ship(ShipId),
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
