//! Equalizer session configuration
//!
//! Startup settings only. EQ state itself is never persisted; every
//! session is rebuilt from these defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::{EqError, EqResult, ParamRange};

/// Default stage center frequencies (Hz)
pub const DEFAULT_STAGE_FREQUENCIES: [f64; 4] = [60.0, 1000.0, 3500.0, 10000.0];

/// Default number of points on the response grid
pub const DEFAULT_GRID_POINTS: usize = 1024;

/// When the displayed point list follows an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitPolicy {
    /// Points update only when a gesture ends
    #[default]
    OnRelease,
    /// Points follow every transient edit as well
    Continuous,
}

/// Response grid settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub points: usize,
    pub min_hz: f64,
    pub max_hz: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            points: DEFAULT_GRID_POINTS,
            min_hz: ParamRange::FREQUENCY.min,
            max_hz: ParamRange::FREQUENCY.max,
        }
    }
}

/// Equalizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EqConfig {
    /// Center frequency of each stage, in series order
    pub stage_frequencies: Vec<f64>,
    /// Initial gain of every stage (dB)
    pub default_gain_db: f64,
    /// Initial Q of every stage
    pub default_q: f64,
    pub grid: GridConfig,
    pub commit_policy: CommitPolicy,
    /// Capacity of the control → audio command queue
    pub queue_capacity: usize,
}

impl Default for EqConfig {
    fn default() -> Self {
        Self {
            stage_frequencies: DEFAULT_STAGE_FREQUENCIES.to_vec(),
            default_gain_db: 0.0,
            default_q: 0.1,
            grid: GridConfig::default(),
            commit_policy: CommitPolicy::OnRelease,
            queue_capacity: 256,
        }
    }
}

impl EqConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> EqResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> EqResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded EQ config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> EqResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings the core cannot run with.
    ///
    /// Stage values must already sit inside their ranges; clamping is an
    /// interactive-edit policy, not a config one.
    pub fn validate(&self) -> EqResult<()> {
        if self.stage_frequencies.is_empty() {
            return Err(EqError::Config("at least one stage is required".into()));
        }
        for &freq in &self.stage_frequencies {
            if !freq.is_finite() || !ParamRange::FREQUENCY.contains(freq) {
                return Err(EqError::Config(format!(
                    "stage frequency {freq} Hz outside [{}, {}]",
                    ParamRange::FREQUENCY.min,
                    ParamRange::FREQUENCY.max
                )));
            }
        }
        if !self.default_gain_db.is_finite() || !ParamRange::GAIN.contains(self.default_gain_db) {
            return Err(EqError::Config(format!(
                "default gain {} dB outside [{}, {}]",
                self.default_gain_db,
                ParamRange::GAIN.min,
                ParamRange::GAIN.max
            )));
        }
        if !self.default_q.is_finite() || !ParamRange::Q.contains(self.default_q) {
            return Err(EqError::Config(format!(
                "default Q {} outside [{}, {}]",
                self.default_q,
                ParamRange::Q.min,
                ParamRange::Q.max
            )));
        }
        let grid = &self.grid;
        if grid.points < 2 {
            return Err(EqError::Config("grid needs at least 2 points".into()));
        }
        if !(grid.min_hz.is_finite() && grid.max_hz.is_finite())
            || grid.min_hz <= 0.0
            || grid.min_hz >= grid.max_hz
        {
            return Err(EqError::Config(format!(
                "grid range {}..{} Hz is not a positive increasing range",
                grid.min_hz, grid.max_hz
            )));
        }
        if self.queue_capacity == 0 {
            return Err(EqError::Config("queue capacity must be non-zero".into()));
        }
        Ok(())
    }
}
