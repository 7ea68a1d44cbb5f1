//! Log-spaced frequency grid for response curves

use peq_core::{EqError, EqResult, GridConfig, ParamRange};

/// Ordered sample frequencies, evenly spaced in log-frequency.
///
/// The first point is exactly `min_hz` and the last exactly `max_hz`.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyGrid {
    frequencies: Box<[f64]>,
}

impl FrequencyGrid {
    pub fn new(count: usize, min_hz: f64, max_hz: f64) -> EqResult<Self> {
        if count < 2 {
            return Err(EqError::InvalidParameter(format!(
                "frequency grid needs at least 2 points, got {count}"
            )));
        }
        if !(min_hz.is_finite() && max_hz.is_finite()) || min_hz <= 0.0 || min_hz >= max_hz {
            return Err(EqError::InvalidParameter(format!(
                "frequency grid range {min_hz}..{max_hz} Hz is not positive and increasing"
            )));
        }

        Ok(Self {
            frequencies: log_spaced(count, min_hz, max_hz),
        })
    }

    pub fn from_config(config: &GridConfig) -> EqResult<Self> {
        Self::new(config.points, config.min_hz, config.max_hz)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    #[inline]
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn min_hz(&self) -> f64 {
        self.frequencies[0]
    }

    pub fn max_hz(&self) -> f64 {
        self.frequencies[self.frequencies.len() - 1]
    }
}

impl Default for FrequencyGrid {
    /// 1024 points over 20 Hz – 20 kHz
    fn default() -> Self {
        let config = GridConfig::default();
        Self {
            frequencies: log_spaced(config.points, config.min_hz, config.max_hz),
        }
    }
}

/// Endpoints are pinned so rounding in pow/log never shifts them
fn log_spaced(count: usize, min_hz: f64, max_hz: f64) -> Box<[f64]> {
    let range = ParamRange::logarithmic(min_hz, max_hz, min_hz);
    let last = count - 1;
    (0..count)
        .map(|i| match i {
            0 => min_hz,
            i if i == last => max_hz,
            i => range.denormalize(i as f64 / last as f64),
        })
        .collect()
}
