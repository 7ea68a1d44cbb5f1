//! Frequency response of a filter chain
//!
//! Stages are in series, so the chain's transfer function is the product
//! of the stage transfer functions and its magnitude in dB is the sum of
//! the per-stage dB magnitudes. Evaluation is O(stages × grid points).

use peq_core::{EqError, EqResult};
use serde::{Deserialize, Serialize};

use crate::chain::FilterChain;
use crate::grid::FrequencyGrid;
use crate::stage::FilterStage;

/// Aggregate magnitude response sampled on a frequency grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseCurve {
    pub frequencies: Vec<f64>,
    pub magnitude_db: Vec<f64>,
}

impl ResponseCurve {
    #[inline]
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// `(frequency_hz, magnitude_db)` pairs in grid order
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies
            .iter()
            .copied()
            .zip(self.magnitude_db.iter().copied())
    }

    /// Grid point with the largest magnitude
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.iter().fold(None, |best, point| match best {
            Some((_, db)) if db >= point.1 => best,
            _ => Some(point),
        })
    }

    /// Largest deviation from 0 dB anywhere on the curve
    pub fn max_abs_db(&self) -> f64 {
        self.magnitude_db.iter().fold(0.0, |acc, db| acc.max(db.abs()))
    }
}

/// Evaluates chain responses over a fixed grid
#[derive(Debug, Clone, Default)]
pub struct ResponseEvaluator {
    grid: FrequencyGrid,
}

impl ResponseEvaluator {
    pub fn new(grid: FrequencyGrid) -> Self {
        Self { grid }
    }

    #[inline]
    pub fn grid(&self) -> &FrequencyGrid {
        &self.grid
    }

    /// Aggregate response of `chain`.
    ///
    /// Fails with `NotReady` when no sample rate is bound; peaking geometry
    /// depends on it, so none is assumed.
    pub fn evaluate(&self, chain: &FilterChain, sample_rate: Option<f64>) -> EqResult<ResponseCurve> {
        let Some(sample_rate) = sample_rate else {
            log::debug!("Response requested before an audio graph was bound");
            return Err(EqError::NotReady(
                "no sample rate bound; audio graph not available".into(),
            ));
        };

        let frequencies = self.grid.frequencies();
        let mut magnitude_db = vec![0.0; frequencies.len()];

        for stage in chain.stages() {
            accumulate_stage(stage, sample_rate, frequencies, &mut magnitude_db);
        }

        Ok(ResponseCurve {
            frequencies: frequencies.to_vec(),
            magnitude_db,
        })
    }

    /// Response of a single stage on this grid
    pub fn evaluate_stage(&self, stage: &FilterStage, sample_rate: f64) -> ResponseCurve {
        let frequencies = self.grid.frequencies();
        let mut magnitude_db = vec![0.0; frequencies.len()];
        accumulate_stage(stage, sample_rate, frequencies, &mut magnitude_db);
        ResponseCurve {
            frequencies: frequencies.to_vec(),
            magnitude_db,
        }
    }
}

#[inline]
fn accumulate_stage(stage: &FilterStage, sample_rate: f64, frequencies: &[f64], out_db: &mut [f64]) {
    let coeffs = stage.coefficients(sample_rate);
    for (db, &freq) in out_db.iter_mut().zip(frequencies) {
        *db += coeffs.magnitude_db_at(freq, sample_rate);
    }
}
