//! Engine timing configuration.
//!
//! Timing only controls how long a job task really sleeps per tick. The
//! logical tick ([`crate::TICK_MILLIS`]) and the number of ticks a job runs
//! are the same in every mode, so a job's simulated duration never changes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Real-time pacing of job ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingMode {
    /// One logical tick per `normal_tick_delay_ms` of wall-clock time.
    #[default]
    Normal,
    /// Accelerated pacing for testing and demos.
    Fast,
}

/// Settings shared by every job task in a world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Which delay each tick sleeps for.
    pub timing: TimingMode,
    /// Real sleep per tick in [`TimingMode::Normal`].
    pub normal_tick_delay_ms: u64,
    /// Real sleep per tick in [`TimingMode::Fast`].
    pub fast_tick_delay_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timing: TimingMode::Normal,
            normal_tick_delay_ms: 100,
            fast_tick_delay_ms: 10,
        }
    }
}

impl EngineConfig {
    /// Default settings in accelerated mode.
    pub fn fast() -> Self {
        Self {
            timing: TimingMode::Fast,
            ..Self::default()
        }
    }

    /// Wall-clock time one tick sleeps for under the configured mode.
    pub fn tick_delay(&self) -> Duration {
        match self.timing {
            TimingMode::Normal => Duration::from_millis(self.normal_tick_delay_ms),
            TimingMode::Fast => Duration::from_millis(self.fast_tick_delay_ms),
        }
    }
}
