//! Newtype domain identifiers.
//!
//! Every entity in a seaport world carries the integer index it was given in
//! the world description. Each kind of index is a distinct newtype so that a
//! [`DockId`] can never be passed where a [`PortId`] is expected, even though
//! both are `u64` under the hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for u64-wrapped newtypes (indices from the world description).
// Generates: struct (Copy), new(), as_u64(), Display.
// ---------------------------------------------------------------------------
macro_rules! u64_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(u64);

        impl $name {
            /// Creates a new identifier from a raw index.
            pub fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the underlying index.
            pub fn as_u64(self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

u64_id! {
    /// Identifies a sea port.
    PortId
}

u64_id! {
    /// Identifies a dock within a port.
    DockId
}

u64_id! {
    /// Identifies a ship (cargo or passenger).
    ShipId
}

u64_id! {
    /// Identifies a worker employed at a port.
    PersonId
}

u64_id! {
    /// Identifies a job belonging to a ship.
    JobId
}

// ---------------------------------------------------------------------------

/// Identifies one loaded world.
///
/// Generated fresh for every load so that log output from a world loaded over
/// an older one can be told apart while the old world's jobs drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldId(Uuid);

impl WorldId {
    /// Generates a new random world identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for WorldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------

/// A worker skill (e.g. `"electrician"`, `"crane_operator"`).
///
/// Skills are compared exactly; a job requiring `"cleaner"` twice needs two
/// distinct workers whose skill is `"cleaner"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SkillName(String);

impl SkillName {
    /// Creates a new skill name, returning `None` if the value is empty or
    /// contains whitespace.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if v.is_empty() || v.chars().any(char::is_whitespace) {
            None
        } else {
            Some(Self(v))
        }
    }

    /// Returns the skill as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SkillName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
