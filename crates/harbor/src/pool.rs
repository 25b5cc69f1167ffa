//! Per-port worker pool bookkeeping.
//!
//! [`WorkerPool`] is plain data with no locking of its own. The owning
//! [`crate::Port`] keeps it behind a single mutex so that the feasibility
//! check and the multi-skill reservation happen as one step.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use crate::snapshot::SkillCount;
use crate::{Person, SkillName};

/// Outcome of trying to reserve workers for one requirement list.
#[derive(Debug)]
pub(crate) enum Reservation {
    /// The pool has not been built yet; try again once it is.
    NotBuilt,
    /// Fewer workers with `skill` exist at the port than the job asks for.
    Infeasible {
        skill: SkillName,
        required: usize,
        total: usize,
    },
    /// Enough exist, but not enough are free right now.
    Unavailable { skill: SkillName },
    /// One worker per requirement entry, already removed from the pool.
    Granted(Vec<Arc<Person>>),
}

#[derive(Debug, Default)]
pub(crate) struct WorkerPool {
    built: bool,
    roster: Vec<Arc<Person>>,
    available: BTreeMap<SkillName, VecDeque<Arc<Person>>>,
    totals: BTreeMap<SkillName, usize>,
}

impl WorkerPool {
    pub(crate) fn is_built(&self) -> bool {
        self.built
    }

    /// Adds a worker to the roster. Returns `false` once the pool is built.
    pub(crate) fn enroll(&mut self, person: Arc<Person>) -> bool {
        if self.built {
            return false;
        }
        self.roster.push(person);
        true
    }

    /// Files every rostered worker under its skill and fixes the totals.
    ///
    /// Returns `false` if the pool was already built.
    pub(crate) fn build(&mut self) -> bool {
        if self.built {
            return false;
        }
        for person in &self.roster {
            self.available
                .entry(person.skill().clone())
                .or_default()
                .push_back(Arc::clone(person));
            *self.totals.entry(person.skill().clone()).or_insert(0) += 1;
        }
        self.built = true;
        true
    }

    /// Reserves one worker per entry of `requirements`, all or nothing.
    pub(crate) fn reserve(&mut self, requirements: &[SkillName]) -> Reservation {
        if !self.built {
            return Reservation::NotBuilt;
        }

        let mut demand: BTreeMap<&SkillName, usize> = BTreeMap::new();
        for skill in requirements {
            *demand.entry(skill).or_insert(0) += 1;
        }

        for (&skill, &required) in &demand {
            let total = self.totals.get(skill).copied().unwrap_or(0);
            if required > total {
                return Reservation::Infeasible {
                    skill: skill.clone(),
                    required,
                    total,
                };
            }
        }

        for (&skill, &required) in &demand {
            let free = self.available.get(skill).map_or(0, VecDeque::len);
            if free < required {
                return Reservation::Unavailable {
                    skill: skill.clone(),
                };
            }
        }

        let mut granted = Vec::with_capacity(requirements.len());
        for (skill, required) in demand {
            if let Some(queue) = self.available.get_mut(skill) {
                granted.extend(queue.drain(..required));
            }
        }
        Reservation::Granted(granted)
    }

    /// Puts a worker back under its skill.
    ///
    /// Returns `false` without changing anything if the worker is not on this
    /// pool's roster or is already in the pool, so neither a stray nor a
    /// double return can inflate the count.
    pub(crate) fn restore(&mut self, person: &Arc<Person>) -> bool {
        if !self.roster.iter().any(|p| Arc::ptr_eq(p, person)) {
            return false;
        }
        let queue = self.available.entry(person.skill().clone()).or_default();
        if queue.iter().any(|p| p.id() == person.id()) {
            return false;
        }
        queue.push_back(Arc::clone(person));
        true
    }

    pub(crate) fn roster(&self) -> &[Arc<Person>] {
        &self.roster
    }

    /// Available and total worker counts per skill, ordered by skill.
    pub(crate) fn counts(&self) -> Vec<SkillCount> {
        self.totals
            .iter()
            .map(|(skill, &total)| SkillCount {
                skill: skill.clone(),
                available: self.available.get(skill).map_or(0, VecDeque::len),
                total,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PersonId, PortId};

    fn skill(s: &str) -> SkillName {
        SkillName::new(s).unwrap()
    }

    fn pool_of(skills: &[&str]) -> WorkerPool {
        let mut pool = WorkerPool::default();
        for (i, s) in skills.iter().enumerate() {
            let person = Person::new(PersonId::new(i as u64), format!("p{i}"), skill(s), PortId::new(1));
            assert!(pool.enroll(Arc::new(person)));
        }
        pool
    }

    #[test]
    fn reserve_before_build_is_not_ready() {
        let mut pool = pool_of(&["cleaner"]);
        assert!(matches!(pool.reserve(&[skill("cleaner")]), Reservation::NotBuilt));
    }

    #[test]
    fn build_runs_once_and_seals_the_roster() {
        let mut pool = pool_of(&["cleaner", "cleaner", "mate"]);
        assert!(pool.build());
        assert!(!pool.build());

        let late = Person::new(PersonId::new(99), "late", skill("mate"), PortId::new(1));
        assert!(!pool.enroll(Arc::new(late)));

        let counts = pool.counts();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].skill, skill("cleaner"));
        assert_eq!((counts[0].available, counts[0].total), (2, 2));
        assert_eq!((counts[1].available, counts[1].total), (1, 1));
    }

    #[test]
    fn duplicate_requirements_need_distinct_workers() {
        let mut pool = pool_of(&["cleaner", "cleaner"]);
        pool.build();

        match pool.reserve(&[skill("cleaner"), skill("cleaner")]) {
            Reservation::Granted(workers) => {
                assert_eq!(workers.len(), 2);
                assert_ne!(workers[0].id(), workers[1].id());
            }
            other => panic!("expected grant, got {other:?}"),
        }
        assert_eq!(pool.counts()[0].available, 0);
    }

    #[test]
    fn demand_above_total_is_infeasible() {
        let mut pool = pool_of(&["cleaner"]);
        pool.build();

        match pool.reserve(&[skill("cleaner"), skill("cleaner")]) {
            Reservation::Infeasible { required, total, .. } => {
                assert_eq!((required, total), (2, 1));
            }
            other => panic!("expected infeasible, got {other:?}"),
        }
        assert!(matches!(
            pool.reserve(&[skill("painter")]),
            Reservation::Infeasible { total: 0, .. }
        ));
    }

    #[test]
    fn partial_availability_takes_nothing() {
        let mut pool = pool_of(&["cleaner", "mate"]);
        pool.build();
        let Reservation::Granted(first) = pool.reserve(&[skill("mate")]) else {
            panic!("mate should be free");
        };

        assert!(matches!(
            pool.reserve(&[skill("cleaner"), skill("mate")]),
            Reservation::Unavailable { .. }
        ));
        // The cleaner was not taken by the failed attempt.
        assert_eq!(pool.counts()[0].available, 1);

        assert!(pool.restore(&first[0]));
        assert!(matches!(
            pool.reserve(&[skill("cleaner"), skill("mate")]),
            Reservation::Granted(_)
        ));
    }

    #[test]
    fn restoring_twice_counts_once() {
        let mut pool = pool_of(&["mate"]);
        pool.build();
        let Reservation::Granted(workers) = pool.reserve(&[skill("mate")]) else {
            panic!("mate should be free");
        };

        assert!(pool.restore(&workers[0]));
        assert!(!pool.restore(&workers[0]));
        assert_eq!(pool.counts()[0].available, 1);
    }

    #[test]
    fn workers_from_another_roster_are_refused() {
        let mut pool = pool_of(&["mate"]);
        pool.build();
        let stranger = Arc::new(Person::new(PersonId::new(7), "stranger", skill("mate"), PortId::new(2)));

        assert!(!pool.restore(&stranger));
        let counts = pool.counts();
        assert_eq!((counts[0].available, counts[0].total), (1, 1));
    }

    #[test]
    fn empty_requirement_list_is_granted_nothing() {
        let mut pool = pool_of(&[]);
        pool.build();
        match pool.reserve(&[]) {
            Reservation::Granted(workers) => assert!(workers.is_empty()),
            other => panic!("expected empty grant, got {other:?}"),
        }
    }
}
