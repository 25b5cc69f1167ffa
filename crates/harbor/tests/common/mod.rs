//! Shared fixtures for engine tests.

#![allow(dead_code)]

use std::time::Duration;

use harbor::{JobDuration, ShipDimensions, ShipKind, SkillName};

pub fn skills(names: &[&str]) -> Vec<SkillName> {
    names.iter().map(|s| SkillName::new(*s).unwrap()).collect()
}

pub fn skill(name: &str) -> SkillName {
    SkillName::new(name).unwrap()
}

pub fn secs(seconds: f64) -> JobDuration {
    JobDuration::from_secs(seconds).unwrap()
}

pub fn cargo() -> ShipKind {
    ShipKind::Cargo {
        cargo_weight: 120.0,
        cargo_volume: 300.0,
        cargo_value: 950.0,
    }
}

pub fn passenger() -> ShipKind {
    ShipKind::Passenger {
        passengers: 400,
        rooms: 220,
        occupied_rooms: 180,
    }
}

pub fn dims(length: f64, width: f64) -> ShipDimensions {
    ShipDimensions {
        weight: 200.0,
        length,
        width,
        draft: 12.0,
    }
}

/// Lets every runnable task reach its next await point without crossing a
/// tick boundary (ticks are at least 10 ms).
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

pub async fn advance(millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}
