//! Docking, departure, and the queue cascade.

mod common;

use common::{advance, cargo, dims, passenger, secs, settle};
use harbor::{Berth, DockId, EngineConfig, JobId, JobStatus, PortId, ShipId, WorldBuilder};

const PORT: u64 = 10_000;
const DOCK: u64 = 20_000;

fn one_dock_port() -> WorldBuilder {
    let mut b = WorldBuilder::new("docking", EngineConfig::fast()).unwrap();
    b.add_port(PortId::new(PORT), "Piraeus").unwrap();
    b.add_dock(DockId::new(DOCK), "Berth A", PortId::new(PORT)).unwrap();
    b
}

#[tokio::test(start_paused = true)]
async fn departure_skips_jobless_ships_and_docks_the_next_busy_one() {
    let mut b = one_dock_port();
    let first = b
        .add_ship(ShipId::new(40_000), "First", DOCK, cargo(), dims(100.0, 20.0))
        .unwrap();
    let idle = b
        .add_ship(ShipId::new(40_001), "Idle", PORT, cargo(), dims(80.0, 18.0))
        .unwrap();
    let busy = b
        .add_ship(ShipId::new(40_002), "Busy", PORT, passenger(), dims(120.0, 25.0))
        .unwrap();
    b.add_job(JobId::new(60_000), "Refuel", first.id(), secs(0.2), vec![])
        .unwrap();
    let busy_job = b
        .add_job(JobId::new(60_001), "Board", busy.id(), secs(0.2), vec![])
        .unwrap();
    let world = b.finish();
    let port = world.port(PortId::new(PORT)).unwrap();

    assert_eq!(port.queue(), vec![idle.id(), busy.id()]);
    settle().await;
    assert_eq!(busy_job.status(), JobStatus::WaitingToDock);

    // First's job takes two 10 ms ticks.
    advance(25).await;
    assert!(first.is_departed());
    assert_eq!(idle.berth(), Berth::Departed);
    assert_eq!(busy.berth(), Berth::Docked { dock: DockId::new(DOCK) });
    assert!(port.queue().is_empty());
    assert_eq!(port.ships().iter().map(|s| s.id()).collect::<Vec<_>>(), vec![busy.id()]);
    assert_eq!(
        world.dock(DockId::new(DOCK)).unwrap().ship().map(|s| s.id()),
        Some(busy.id())
    );
    assert_eq!(busy_job.status(), JobStatus::Running);

    advance(25).await;
    assert_eq!(busy_job.status(), JobStatus::Done);
    assert!(busy.is_departed());
    assert!(world.dock(DockId::new(DOCK)).unwrap().is_free());
    assert!(port.ships().is_empty());
}

#[tokio::test(start_paused = true)]
async fn ship_stays_until_its_last_job_finishes() {
    let mut b = one_dock_port();
    let ship = b
        .add_ship(ShipId::new(40_000), "Twin", DOCK, cargo(), dims(100.0, 20.0))
        .unwrap();
    let short = b
        .add_job(JobId::new(60_000), "Short", ship.id(), secs(0.1), vec![])
        .unwrap();
    let long = b
        .add_job(JobId::new(60_001), "Long", ship.id(), secs(0.5), vec![])
        .unwrap();
    let _world = b.finish();
    settle().await;

    advance(20).await;
    assert_eq!(short.status(), JobStatus::Done);
    assert_eq!(ship.job_ids(), vec![long.id()]);
    assert!(ship.berth().is_docked());

    advance(50).await;
    assert_eq!(long.status(), JobStatus::Done);
    assert!(ship.is_departed());
    assert!(ship.port().is_none());
    assert!(ship.job_ids().is_empty());
}

#[tokio::test(start_paused = true)]
async fn idle_docked_ship_makes_way_once_loading_finishes() {
    let mut b = one_dock_port();
    let idle = b
        .add_ship(ShipId::new(40_000), "Idle", DOCK, cargo(), dims(100.0, 20.0))
        .unwrap();
    let waiting = b
        .add_ship(ShipId::new(40_001), "Waiting", PORT, cargo(), dims(100.0, 20.0))
        .unwrap();
    let job = b
        .add_job(JobId::new(60_000), "Lift", waiting.id(), secs(0.1), vec![])
        .unwrap();

    assert!(idle.berth().is_docked());
    let _world = b.finish();

    assert!(idle.is_departed());
    assert!(waiting.berth().is_docked());
    settle().await;
    assert_eq!(job.status(), JobStatus::Running);
}

#[tokio::test(start_paused = true)]
async fn occupied_dock_queues_the_late_arrival() {
    let mut b = one_dock_port();
    let first = b
        .add_ship(ShipId::new(40_000), "First", DOCK, cargo(), dims(100.0, 20.0))
        .unwrap();
    let second = b
        .add_ship(ShipId::new(40_001), "Second", DOCK, cargo(), dims(100.0, 20.0))
        .unwrap();
    b.add_job(JobId::new(60_000), "A", first.id(), secs(0.1), vec![])
        .unwrap();
    let job = b
        .add_job(JobId::new(60_001), "B", second.id(), secs(0.1), vec![])
        .unwrap();
    let world = b.finish();

    assert_eq!(second.berth(), Berth::Queued);
    assert_eq!(world.port(PortId::new(PORT)).unwrap().queue(), vec![second.id()]);

    settle().await;
    advance(30).await;
    assert_eq!(job.status(), JobStatus::Done);
    assert!(first.is_departed() && second.is_departed());
}

#[tokio::test(start_paused = true)]
async fn jobs_cannot_join_a_departed_ship() {
    let mut b = one_dock_port();
    let ship = b
        .add_ship(ShipId::new(40_000), "Gone", DOCK, cargo(), dims(100.0, 20.0))
        .unwrap();
    b.add_job(JobId::new(60_000), "Quick", ship.id(), secs(0.0), vec![])
        .unwrap();
    settle().await;
    assert!(ship.is_departed());

    let err = b
        .add_job(JobId::new(60_001), "Late", ship.id(), secs(1.0), vec![])
        .unwrap_err();
    assert_eq!(
        err,
        harbor::HarborError::ShipDeparted {
            ship: ship.id(),
            job: JobId::new(60_001)
        }
    );
}
