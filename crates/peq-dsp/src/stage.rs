//! Single peaking EQ stage

use peq_core::ParamRange;
use serde::{Deserialize, Serialize};

use crate::biquad::{BiquadCoeffs, FilterKind};

/// One bell band: center frequency, gain and Q.
///
/// Values are kept inside [`ParamRange::FREQUENCY`], [`ParamRange::GAIN`]
/// and above the [`ParamRange::Q`] floor by every constructor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterStage {
    pub frequency_hz: f64,
    pub gain_db: f64,
    pub q: f64,
    pub kind: FilterKind,
}

impl FilterStage {
    /// Peaking stage, with each value clamped into its range
    pub fn peaking(frequency_hz: f64, gain_db: f64, q: f64) -> Self {
        Self {
            frequency_hz: ParamRange::FREQUENCY.clamp(frequency_hz),
            gain_db: ParamRange::GAIN.clamp(gain_db),
            q: ParamRange::Q.clamp(q),
            kind: FilterKind::Peaking,
        }
    }

    /// Normalized coefficients at `sample_rate`
    #[inline]
    pub fn coefficients(&self, sample_rate: f64) -> BiquadCoeffs {
        BiquadCoeffs::design(self.kind, self.frequency_hz, self.q, self.gain_db, sample_rate)
    }
}

impl Default for FilterStage {
    fn default() -> Self {
        Self::peaking(
            ParamRange::FREQUENCY.default,
            ParamRange::GAIN.default,
            ParamRange::Q.default,
        )
    }
}
