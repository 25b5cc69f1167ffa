//! Job task lifecycle: acquisition, ticking, suspend, cancel.

mod common;

use std::sync::Arc;

use common::{advance, cargo, dims, secs, settle, skill, skills};
use harbor::{
    DockId, EngineConfig, Job, JobId, JobStatus, PersonId, PortId, ShipId, World, WorldBuilder,
};

const PORT: u64 = 10_000;

/// One port with `docks` docks (indices 20000, 20001, ...) and one worker per
/// entry of `workers`.
fn port_with(config: EngineConfig, docks: u64, workers: &[&str]) -> WorldBuilder {
    let mut b = WorldBuilder::new("test world", config).unwrap();
    b.add_port(PortId::new(PORT), "Valletta").unwrap();
    for d in 0..docks {
        b.add_dock(DockId::new(20_000 + d), format!("Pier {d}"), PortId::new(PORT))
            .unwrap();
    }
    for (i, w) in workers.iter().enumerate() {
        b.add_person(
            PersonId::new(50_000 + i as u64),
            format!("worker{i}"),
            PortId::new(PORT),
            skill(w),
        )
        .unwrap();
    }
    b
}

/// Docks ship `index` at dock `dock` and gives it one job.
fn docked_job(
    b: &mut WorldBuilder,
    index: u64,
    dock: u64,
    duration: f64,
    needs: &[&str],
) -> Arc<Job> {
    b.add_ship(ShipId::new(index), format!("ship{index}"), 20_000 + dock, cargo(), dims(100.0, 20.0))
        .unwrap();
    b.add_job(JobId::new(index + 20_000), format!("job{index}"), ShipId::new(index), secs(duration), skills(needs))
        .unwrap()
}

fn pool_counts(world: &World, name: &str) -> (usize, usize) {
    let port = world.port(PortId::new(PORT)).unwrap();
    port.pool_snapshot()
        .into_iter()
        .find(|c| c.skill.as_str() == name)
        .map(|c| (c.available, c.total))
        .unwrap_or((0, 0))
}

#[tokio::test(start_paused = true)]
async fn job_without_requirements_runs_as_soon_as_docked() {
    let mut b = port_with(EngineConfig::default(), 1, &[]);
    let job = docked_job(&mut b, 40_000, 0, 1.0, &[]);
    let _world = b.finish();

    settle().await;
    assert_eq!(job.status(), JobStatus::Running);
    assert_eq!(job.progress(), 0);
}

#[tokio::test(start_paused = true)]
async fn infeasible_requirement_fails_before_running() {
    let mut b = port_with(EngineConfig::default(), 1, &["electrician"]);
    let job = docked_job(&mut b, 40_000, 0, 1.0, &["electrician", "electrician"]);
    let world = b.finish();

    settle().await;
    assert_eq!(job.status(), JobStatus::LackOfResources);
    assert_eq!(job.progress(), 0);
    // Nobody was taken from the pool.
    assert_eq!(pool_counts(&world, "electrician"), (1, 1));
    // The ship had no other work and has left.
    assert!(job.ship().is_departed());
}

#[tokio::test(start_paused = true)]
async fn missing_skill_is_infeasible() {
    let mut b = port_with(EngineConfig::default(), 1, &["cleaner"]);
    let job = docked_job(&mut b, 40_000, 0, 1.0, &["painter"]);
    let _world = b.finish();

    settle().await;
    assert_eq!(job.status(), JobStatus::LackOfResources);
}

#[tokio::test(start_paused = true)]
async fn jobs_wait_until_the_pool_is_built() {
    let mut b = port_with(EngineConfig::default(), 1, &["mate"]);
    let job = docked_job(&mut b, 40_000, 0, 1.0, &["mate"]);

    settle().await;
    assert_eq!(job.status(), JobStatus::WaitingForResources);

    let _world = b.finish();
    settle().await;
    assert_eq!(job.status(), JobStatus::Running);
    assert_eq!(job.ship().workers(), vec![PersonId::new(50_000)]);
}

#[tokio::test(start_paused = true)]
async fn one_second_job_makes_ten_ticks_in_either_mode() {
    for (config, tick) in [(EngineConfig::default(), 100), (EngineConfig::fast(), 10)] {
        let mut b = port_with(config, 1, &[]);
        let job = docked_job(&mut b, 40_000, 0, 1.0, &[]);
        let _world = b.finish();
        settle().await;

        let mut seen = Vec::new();
        for _ in 0..10 {
            advance(tick).await;
            seen.push(job.progress());
        }
        assert_eq!(seen, vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        assert_eq!(job.status(), JobStatus::Done);
    }
}

#[tokio::test(start_paused = true)]
async fn suspend_freezes_progress_until_resumed() {
    let mut b = port_with(EngineConfig::default(), 1, &[]);
    let job = docked_job(&mut b, 40_000, 0, 1.0, &[]);
    let _world = b.finish();
    settle().await;

    advance(300).await;
    assert_eq!(job.progress(), 30);

    assert!(job.toggle_suspend());
    advance(500).await;
    assert_eq!(job.status(), JobStatus::Suspended);
    assert_eq!(job.progress(), 30);

    assert!(!job.toggle_suspend());
    advance(100).await;
    assert_eq!(job.status(), JobStatus::Running);
    assert_eq!(job.progress(), 40);
}

#[tokio::test(start_paused = true)]
async fn cancel_while_suspended_resets_progress() {
    let mut b = port_with(EngineConfig::default(), 1, &["rigger"]);
    let job = docked_job(&mut b, 40_000, 0, 2.0, &["rigger"]);
    let world = b.finish();
    settle().await;

    advance(500).await;
    job.toggle_suspend();
    advance(200).await;
    assert_eq!(job.status(), JobStatus::Suspended);
    assert_eq!(job.progress(), 25);

    job.cancel();
    advance(100).await;
    assert_eq!(job.status(), JobStatus::Cancelled);
    assert_eq!(job.progress(), 0);
    // The rigger went back to the pool.
    assert_eq!(pool_counts(&world, "rigger"), (1, 1));
}

#[tokio::test(start_paused = true)]
async fn cancel_before_docking_ends_the_job() {
    let mut b = port_with(EngineConfig::default(), 0, &[]);
    b.add_ship(ShipId::new(40_000), "Drifter", PORT, cargo(), dims(90.0, 15.0))
        .unwrap();
    let job = b
        .add_job(JobId::new(60_000), "Wait", ShipId::new(40_000), secs(1.0), vec![])
        .unwrap();
    let world = b.finish();
    settle().await;
    assert_eq!(job.status(), JobStatus::WaitingToDock);

    job.cancel();
    settle().await;
    assert_eq!(job.status(), JobStatus::Cancelled);
    assert!(job.ship().is_departed());
    assert!(world.port(PortId::new(PORT)).unwrap().queue().is_empty());
}

#[tokio::test(start_paused = true)]
async fn single_worker_goes_to_exactly_one_job() {
    let mut b = port_with(EngineConfig::default(), 2, &["crane"]);
    let first = docked_job(&mut b, 40_000, 0, 0.5, &["crane"]);
    let second = docked_job(&mut b, 40_001, 1, 0.5, &["crane"]);
    let world = b.finish();
    settle().await;

    let statuses = [first.status(), second.status()];
    assert!(statuses.contains(&JobStatus::Running));
    assert!(statuses.contains(&JobStatus::WaitingForResources));
    let (runner, waiter) = if first.status() == JobStatus::Running {
        (&first, &second)
    } else {
        (&second, &first)
    };

    advance(300).await;
    assert_eq!(waiter.status(), JobStatus::WaitingForResources);
    assert_eq!(pool_counts(&world, "crane"), (0, 1));

    // The runner finishes at 500 ms and the waiter picks the worker up.
    advance(250).await;
    assert_eq!(runner.status(), JobStatus::Done);
    assert_eq!(waiter.status(), JobStatus::Running);

    advance(500).await;
    assert_eq!(waiter.status(), JobStatus::Done);
    assert_eq!(pool_counts(&world, "crane"), (1, 1));
}

#[tokio::test(start_paused = true)]
async fn pool_accounting_holds_under_contention() {
    let workers = ["welder", "welder", "diver"];
    let mut b = port_with(EngineConfig::fast(), 6, &workers);
    let needs: [&[&str]; 6] = [
        &["welder"],
        &["welder", "diver"],
        &["welder", "welder"],
        &["diver"],
        &[],
        &["welder", "welder", "diver"],
    ];
    for (i, need) in needs.iter().enumerate() {
        docked_job(&mut b, 40_000 + i as u64, i as u64, 0.3, need);
    }
    let world = b.finish();
    let port = Arc::clone(world.port(PortId::new(PORT)).unwrap());

    for _ in 0..200 {
        let snap = port.snapshot();
        for count in &snap.pool {
            assert!(count.available <= count.total);
            let assigned = snap
                .persons
                .iter()
                .filter(|p| p.skill == count.skill && p.current_job.is_some())
                .count();
            assert_eq!(count.available + assigned, count.total, "skill {}", count.skill);
        }
        if world.all_jobs_terminal() {
            break;
        }
        advance(5).await;
    }

    assert!(world.all_jobs_terminal());
    assert!(world.jobs().all(|j| j.status() == JobStatus::Done));
    assert_eq!(pool_counts(&world, "welder"), (2, 2));
    assert_eq!(pool_counts(&world, "diver"), (1, 1));
}

#[tokio::test(start_paused = true)]
async fn returning_a_worker_twice_counts_once() {
    let mut b = port_with(EngineConfig::fast(), 1, &["mate"]);
    let job = docked_job(&mut b, 40_000, 0, 0.1, &["mate"]);
    let world = b.finish();
    settle().await;
    advance(20).await;
    assert_eq!(job.status(), JobStatus::Done);

    let port = world.port(PortId::new(PORT)).unwrap();
    let mate = Arc::clone(world.person(PersonId::new(50_000)).unwrap());
    assert!(mate.is_available());
    assert!(!port.return_worker(&mate));
    assert_eq!(pool_counts(&world, "mate"), (1, 1));
}

#[tokio::test(start_paused = true)]
async fn stop_all_cancels_every_live_job() {
    let mut b = port_with(EngineConfig::default(), 2, &["mate"]);
    let running = docked_job(&mut b, 40_000, 0, 5.0, &["mate"]);
    let waiting = docked_job(&mut b, 40_001, 1, 5.0, &["mate"]);
    let world = b.finish();
    settle().await;
    advance(200).await;

    world.stop_all();
    world.join().await;

    assert!(world.all_jobs_terminal());
    for job in [&running, &waiting] {
        assert_eq!(job.status(), JobStatus::Cancelled);
        assert_eq!(job.progress(), 0);
    }
    assert_eq!(pool_counts(&world, "mate"), (1, 1));
}

#[tokio::test(start_paused = true)]
async fn zero_duration_job_completes_immediately() {
    let mut b = port_with(EngineConfig::default(), 1, &[]);
    let job = docked_job(&mut b, 40_000, 0, 0.0, &[]);
    let _world = b.finish();
    settle().await;

    assert_eq!(job.status(), JobStatus::Done);
    assert_eq!(job.progress(), 100);
}
