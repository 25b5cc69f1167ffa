//! Workers.
//!
//! A [`Person`] is either sitting in its port's pool or working exactly one
//! job aboard a ship. The port moves it between the two; nothing else does.

use std::sync::Mutex;

use crate::snapshot::PersonSnapshot;
use crate::sync::lock;
use crate::{JobId, Location, PersonId, PortId, ShipId, SkillName};

#[derive(Debug, Clone, Copy)]
struct Assignment {
    location: Location,
    job: Option<JobId>,
}

/// A worker with a single skill, employed at one port.
#[derive(Debug)]
pub struct Person {
    id: PersonId,
    name: String,
    skill: SkillName,
    home: PortId,
    assignment: Mutex<Assignment>,
}

impl Person {
    /// Creates an unassigned worker located at `home`.
    pub fn new(id: PersonId, name: impl Into<String>, skill: SkillName, home: PortId) -> Self {
        Self {
            id,
            name: name.into(),
            skill,
            home,
            assignment: Mutex::new(Assignment {
                location: Location::Port(home),
                job: None,
            }),
        }
    }

    pub fn id(&self) -> PersonId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn skill(&self) -> &SkillName {
        &self.skill
    }

    /// The port whose pool this person belongs to.
    pub fn home(&self) -> PortId {
        self.home
    }

    /// `true` while the person is in the port pool rather than aboard a ship.
    pub fn is_available(&self) -> bool {
        matches!(lock(&self.assignment).location, Location::Port(_))
    }

    pub fn location(&self) -> Location {
        lock(&self.assignment).location
    }

    pub fn current_job(&self) -> Option<JobId> {
        lock(&self.assignment).job
    }

    /// Sends the person aboard `ship` to work `job`.
    ///
    /// Only called by the port while it holds its pool lock.
    pub(crate) fn assign(&self, job: JobId, ship: ShipId) {
        let mut a = lock(&self.assignment);
        a.location = Location::Ship(ship);
        a.job = Some(job);
    }

    /// Brings the person back to its home port with no job.
    ///
    /// Only called by the port while it holds its pool lock.
    pub(crate) fn clear_job_and_return(&self) {
        let mut a = lock(&self.assignment);
        a.location = Location::Port(self.home);
        a.job = None;
    }

    pub fn snapshot(&self) -> PersonSnapshot {
        let a = *lock(&self.assignment);
        PersonSnapshot {
            id: self.id,
            name: self.name.clone(),
            skill: self.skill.clone(),
            available: matches!(a.location, Location::Port(_)),
            location: a.location,
            current_job: a.job,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn welder() -> Person {
        Person::new(
            PersonId::new(50001),
            "Ana",
            SkillName::new("welder").unwrap(),
            PortId::new(10000),
        )
    }

    #[test]
    fn new_person_is_available_at_home() {
        let p = welder();
        assert!(p.is_available());
        assert_eq!(p.location(), Location::Port(PortId::new(10000)));
        assert_eq!(p.current_job(), None);
    }

    #[test]
    fn assignment_moves_person_aboard_and_back() {
        let p = welder();
        p.assign(JobId::new(60001), ShipId::new(40001));
        assert!(!p.is_available());
        assert_eq!(p.location(), Location::Ship(ShipId::new(40001)));
        assert_eq!(p.current_job(), Some(JobId::new(60001)));

        p.clear_job_and_return();
        let snap = p.snapshot();
        assert!(snap.available);
        assert_eq!(snap.current_job, None);
        assert_eq!(snap.location, Location::Port(PortId::new(10000)));
    }
}
