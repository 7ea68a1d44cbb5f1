//! Parameter ranges for equalizer stages

use serde::{Deserialize, Serialize};

/// Lowest audible frequency handled by a stage (Hz)
pub const FREQ_MIN_HZ: f64 = 20.0;
/// Highest audible frequency handled by a stage (Hz)
pub const FREQ_MAX_HZ: f64 = 20000.0;
/// Gain bound for a peaking stage (dB, symmetric)
pub const GAIN_LIMIT_DB: f64 = 12.0;
/// Q floor; keeps `sin(w0) / 2q` finite
pub const Q_MIN: f64 = 1e-4;
/// Q ceiling; beyond it alpha vanishes and the poles reach the unit circle
pub const Q_MAX: f64 = 50.0;

/// Value range of one stage parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub skew: ParamSkew,
}

impl ParamRange {
    /// Center frequency of a stage
    pub const FREQUENCY: Self = Self::logarithmic(FREQ_MIN_HZ, FREQ_MAX_HZ, 1000.0);
    /// Gain of a stage
    pub const GAIN: Self = Self::linear(-GAIN_LIMIT_DB, GAIN_LIMIT_DB, 0.0);
    /// Q of a stage
    pub const Q: Self = Self::linear(Q_MIN, Q_MAX, 1.0);

    pub const fn linear(min: f64, max: f64, default: f64) -> Self {
        Self {
            min,
            max,
            default,
            skew: ParamSkew::Linear,
        }
    }

    pub const fn logarithmic(min: f64, max: f64, default: f64) -> Self {
        Self {
            min,
            max,
            default,
            skew: ParamSkew::Logarithmic,
        }
    }

    /// Clamp a value into the range
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Denormalize a 0-1 value to actual value
    pub fn denormalize(&self, normalized: f64) -> f64 {
        match self.skew {
            ParamSkew::Linear => self.min + normalized * (self.max - self.min),
            ParamSkew::Logarithmic => {
                let log_min = self.min.log10();
                let log_max = self.max.log10();
                10.0_f64.powf(log_min + normalized * (log_max - log_min))
            }
        }
    }
}

/// Parameter skew type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamSkew {
    Linear,
    Logarithmic,
}
