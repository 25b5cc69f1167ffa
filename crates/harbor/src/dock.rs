//! Docks.
//!
//! A dock is a passive binding between its port and at most one ship. Every
//! change to that binding happens inside the port's harbor critical section,
//! so a dock never needs to reach back to its port.

use std::sync::{Arc, Mutex};

use crate::snapshot::DockSnapshot;
use crate::sync::lock;
use crate::{DockId, PortId, Ship};

#[derive(Debug)]
pub struct Dock {
    id: DockId,
    name: String,
    port: PortId,
    ship: Mutex<Option<Arc<Ship>>>,
}

impl Dock {
    pub fn new(id: DockId, name: impl Into<String>, port: PortId) -> Self {
        Self {
            id,
            name: name.into(),
            port,
            ship: Mutex::new(None),
        }
    }

    pub fn id(&self) -> DockId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn port(&self) -> PortId {
        self.port
    }

    /// The ship currently docked here, if any.
    pub fn ship(&self) -> Option<Arc<Ship>> {
        lock(&self.ship).clone()
    }

    pub fn is_free(&self) -> bool {
        lock(&self.ship).is_none()
    }

    /// Records `ship` as the occupant. The port updates the ship's side.
    pub(crate) fn bind(&self, ship: &Arc<Ship>) {
        *lock(&self.ship) = Some(Arc::clone(ship));
    }

    /// Unbinds whatever ship is here.
    pub(crate) fn release(&self) -> Option<Arc<Ship>> {
        lock(&self.ship).take()
    }

    pub fn snapshot(&self) -> DockSnapshot {
        DockSnapshot {
            id: self.id,
            name: self.name.clone(),
            ship: lock(&self.ship).as_ref().map(|s| s.id()),
        }
    }
}
