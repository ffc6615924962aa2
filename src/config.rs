use crate::error::AppError;
use crate::intersection::{Intersection, RoadSpec};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";
pub const DEFAULT_REPORT_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_TIME_SCALE: f64 = 1.0;
/// Upper bound on real seconds per signal second.
pub const MAX_TIME_SCALE: f64 = 3600.0;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub app: AppSection,
    pub logging: LoggingSection,
    #[serde(default)]
    pub roads: Vec<RoadSection>,
    #[serde(default)]
    pub readings: Vec<ReadingSection>,
    #[serde(default)]
    pub cycle: Option<CycleSection>,
    #[serde(default)]
    pub clock: Option<ClockSection>,
    #[serde(default)]
    pub output: Option<OutputSection>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSection {
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSection {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RoadSection {
    pub name: String,
    /// Vehicles the downstream link can absorb before queues back up
    pub downstream_capacity: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReadingSection {
    pub road: String,
    pub vehicles: i64,
    pub emergency: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CycleSection {
    /// Serve emergency roads again in the normal cycle after their override (default: false)
    pub emergency_in_normal_cycle: Option<bool>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClockMode {
    #[default]
    Realtime,
    Simulated,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClockSection {
    pub mode: Option<ClockMode>,
    /// Real seconds slept per nominal signal second (default: 1.0)
    pub time_scale: Option<f64>,
    /// Seconds between progress notices during a phase (default: 5)
    pub report_interval_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputSection {
    pub chart_json: Option<bool>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

pub fn load_default() -> Result<Config, ConfigError> {
    load_from_path(DEFAULT_CONFIG_PATH)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    Ok(config)
}

impl Config {
    /// Build the intersection from `[[roads]]`, failing on any road without a capacity.
    pub fn intersection(&self) -> Result<Intersection, AppError> {
        let specs = self
            .roads
            .iter()
            .map(|road| RoadSpec {
                name: road.name.clone(),
                downstream_capacity: road.downstream_capacity,
            })
            .collect();
        Intersection::new(specs)
    }

    pub fn has_fixed_readings(&self) -> bool {
        !self.readings.is_empty()
    }

    pub fn emergency_in_normal_cycle(&self) -> bool {
        self.cycle
            .as_ref()
            .and_then(|c| c.emergency_in_normal_cycle)
            .unwrap_or(false)
    }

    pub fn clock_mode(&self) -> ClockMode {
        self.clock
            .as_ref()
            .and_then(|c| c.mode)
            .unwrap_or_default()
    }

    pub fn time_scale(&self) -> Result<f64, ConfigError> {
        let scale = self
            .clock
            .as_ref()
            .and_then(|c| c.time_scale)
            .unwrap_or(DEFAULT_TIME_SCALE);
        if !(0.0..=MAX_TIME_SCALE).contains(&scale) {
            return Err(ConfigError::Invalid(format!(
                "clock.time_scale must be between 0 and {MAX_TIME_SCALE}, got {scale}"
            )));
        }
        Ok(scale)
    }

    /// Returns the progress reporting interval (default: 5 seconds)
    pub fn report_interval(&self) -> Result<Duration, ConfigError> {
        let secs = self
            .clock
            .as_ref()
            .and_then(|c| c.report_interval_secs)
            .unwrap_or(DEFAULT_REPORT_INTERVAL_SECS);
        if secs == 0 {
            return Err(ConfigError::Invalid(
                "clock.report_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(Duration::from_secs(secs))
    }

    pub fn chart_json(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.chart_json)
            .unwrap_or(false)
    }
}
