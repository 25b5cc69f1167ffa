//! CLI configuration.
//!
//! Read from the TOML file given with `--config`. Every section and key is
//! optional; a missing file argument means all defaults. Command-line flags
//! are applied on top before validation.
//!
//! ```toml
//! [engine]
//! timing = "fast"
//! fast_tick_delay_ms = 5
//!
//! [monitor]
//! report_interval_ms = 500
//!
//! [logging]
//! format = "json"
//! filter = "info,harbor=debug"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use harbor::{EngineConfig, TimingMode};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub engine: EngineConfig,
    pub monitor: MonitorConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// How often the status summary is logged.
    pub report_interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            report_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// `EnvFilter` directives. `RUST_LOG` takes precedence when set.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            filter: "info".to_owned(),
        }
    }
}

impl CliConfig {
    /// Loads the config file at `path`, or the defaults when there is none.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("invalid config at {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies `--fast` and `--json-logs`. Flags only ever switch a setting
    /// on; leaving one off keeps whatever the file says.
    pub fn apply_flags(&mut self, fast: bool, json_logs: bool) {
        if fast {
            self.engine.timing = TimingMode::Fast;
        }
        if json_logs {
            self.logging.format = LogFormat::Json;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.monitor.report_interval_ms == 0 {
            bail!("monitor.report_interval_ms must be greater than zero");
        }
        if self.engine.normal_tick_delay_ms == 0 || self.engine.fast_tick_delay_ms == 0 {
            bail!("engine tick delays must be greater than zero");
        }
        EnvFilter::try_new(&self.logging.filter)
            .with_context(|| format!("logging.filter `{}` is not a valid filter", self.logging.filter))?;
        Ok(())
    }
}
