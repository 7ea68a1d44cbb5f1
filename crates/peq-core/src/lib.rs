//! peq-core: Shared types for the parametric EQ
//!
//! Foundational types used across all peq crates: sample type, decibel
//! conversions, parameter ranges, the error taxonomy and session config.

mod config;
mod error;
mod params;

pub use config::*;
pub use error::*;
pub use params::*;

/// Type alias for audio samples (always f64 for maximum precision)
pub type Sample = f64;

/// Decibel value wrapper
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Decibels(pub f64);

impl Decibels {
    pub const ZERO: Self = Self(0.0);
    pub const NEG_INF: Self = Self(f64::NEG_INFINITY);

    #[inline]
    pub fn from_gain(gain: f64) -> Self {
        if gain <= 0.0 {
            Self::NEG_INF
        } else {
            Self(20.0 * gain.log10())
        }
    }
}

impl Default for Decibels {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Check that a host sample rate can carry every stage frequency.
///
/// The highest stage frequency must sit strictly below Nyquist, otherwise
/// peaking coefficients fold over.
pub fn validate_sample_rate(sample_rate: f64) -> EqResult<f64> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(EqError::InvalidParameter(format!(
            "sample rate must be positive and finite, got {sample_rate}"
        )));
    }
    if sample_rate / 2.0 <= FREQ_MAX_HZ {
        return Err(EqError::InvalidParameter(format!(
            "sample rate {sample_rate} Hz puts Nyquist at or below {FREQ_MAX_HZ} Hz"
        )));
    }
    Ok(sample_rate)
}
