//! Headless monitor: periodic status summaries until the world winds down.

use std::future::Future;
use std::time::Duration;

use harbor::{PortSnapshot, World, WorldSnapshot};
use tokio::time::MissedTickBehavior;

use crate::config::MonitorConfig;

/// Logs a summary every `report_interval_ms` until every job has ended.
///
/// When `shutdown` resolves, every live job is cancelled and the monitor
/// keeps reporting until the cancellations have drained. Returns once all
/// job tasks have exited.
pub async fn run(world: &World, config: &MonitorConfig, shutdown: impl Future<Output = ()>) {
    let mut ticker = tokio::time::interval(Duration::from_millis(config.report_interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);
    let mut stopping = false;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let snapshot = world.snapshot();
                log_summary(&snapshot);
                if snapshot.all_jobs_terminal() {
                    break;
                }
            }
            () = &mut shutdown, if !stopping => {
                stopping = true;
                tracing::info!("interrupted; cancelling all jobs");
                world.stop_all();
            }
        }
    }
    world.join().await;
    tracing::info!(world = %world.id(), "all jobs ended");
}

fn log_summary(snapshot: &WorldSnapshot) {
    tracing::info!(world = %snapshot.world, jobs = %status_line(snapshot), "status");
    for port in &snapshot.ports {
        tracing::info!(port = %port.name, pool = %pool_line(port), queued = port.queue.len(), "pool");
    }
}

/// Non-zero job counts per status, e.g. `Running: 2, Done: 1`.
pub fn status_line(snapshot: &WorldSnapshot) -> String {
    let parts: Vec<String> = snapshot
        .status_counts()
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(status, count)| format!("{status}: {count}"))
        .collect();
    if parts.is_empty() {
        "no jobs".to_owned()
    } else {
        parts.join(", ")
    }
}

/// Available over total workers per skill, e.g. `cleaner 1/2, mate 0/1`.
pub fn pool_line(port: &PortSnapshot) -> String {
    if port.pool.is_empty() {
        return "empty".to_owned();
    }
    port.pool
        .iter()
        .map(|count| format!("{} {}/{}", count.skill, count.available, count.total))
        .collect::<Vec<_>>()
        .join(", ")
}
