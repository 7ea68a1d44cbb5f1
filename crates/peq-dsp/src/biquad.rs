//! Biquad coefficients and a Transposed Direct Form II filter
//!
//! Coefficients follow the RBJ audio-EQ cookbook and are stored
//! normalized (a0 = 1).

use num_complex::Complex64;
use peq_core::{Decibels, Sample};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::{MonoProcessor, Processor};

/// Biquad filter kinds a stage can take.
///
/// The equalizer only drives peaking stages today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    #[default]
    Peaking,
}

/// Normalized biquad coefficients
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoeffs {
    /// Calculate peaking EQ filter coefficients
    ///
    /// Requires `sample_rate > 0`, `0 < freq < sample_rate / 2` and `q > 0`.
    pub fn peaking(freq: f64, q: f64, gain_db: f64, sample_rate: f64) -> Self {
        debug_assert!(sample_rate > 0.0, "sample rate must be positive");
        debug_assert!(
            freq > 0.0 && freq < sample_rate / 2.0,
            "peaking frequency {freq} outside (0, Nyquist)"
        );
        debug_assert!(q > 0.0, "q must be positive");

        let a = 10.0_f64.powf(gain_db / 40.0);
        let omega = 2.0 * PI * freq / sample_rate;
        let cos_omega = omega.cos();
        let alpha = omega.sin() / (2.0 * q);

        let b0 = 1.0 + alpha * a;
        let b1 = -2.0 * cos_omega;
        let b2 = 1.0 - alpha * a;
        let a0 = 1.0 + alpha / a;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha / a;

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    /// Design coefficients for the given kind
    pub fn design(kind: FilterKind, freq: f64, q: f64, gain_db: f64, sample_rate: f64) -> Self {
        match kind {
            FilterKind::Peaking => Self::peaking(freq, q, gain_db, sample_rate),
        }
    }

    /// Bypass (unity gain, no filtering)
    pub fn bypass() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
        }
    }

    /// Complex transfer function H(e^jω) at `freq`
    ///
    /// Evaluates (b0 + b1·z⁻¹ + b2·z⁻²) / (1 + a1·z⁻¹ + a2·z⁻²)
    /// at z = e^(jω), ω = 2πf/fs.
    pub fn response_at(&self, freq: f64, sample_rate: f64) -> Complex64 {
        let (numerator, denominator) = self.polynomials_at(freq, sample_rate);
        numerator / denominator
    }

    /// Magnitude in dB at `freq`
    #[inline]
    pub fn magnitude_db_at(&self, freq: f64, sample_rate: f64) -> f64 {
        let (numerator, denominator) = self.polynomials_at(freq, sample_rate);
        Decibels::from_gain(numerator.norm() / denominator.norm()).0
    }

    /// Numerator and denominator polynomials evaluated on the unit circle
    fn polynomials_at(&self, freq: f64, sample_rate: f64) -> (Complex64, Complex64) {
        let omega = 2.0 * PI * freq / sample_rate;
        let z1 = Complex64::from_polar(1.0, -omega);
        let z2 = Complex64::from_polar(1.0, -2.0 * omega);

        (
            self.b0 + z1 * self.b1 + z2 * self.b2,
            1.0 + z1 * self.a1 + z2 * self.a2,
        )
    }
}

/// Transposed Direct Form II biquad filter
#[derive(Debug, Clone)]
pub struct BiquadTDF2 {
    coeffs: BiquadCoeffs,
    z1: f64,
    z2: f64,
}

impl BiquadTDF2 {
    pub fn new() -> Self {
        Self::with_coeffs(BiquadCoeffs::bypass())
    }

    pub fn with_coeffs(coeffs: BiquadCoeffs) -> Self {
        Self {
            coeffs,
            z1: 0.0,
            z2: 0.0,
        }
    }

    /// Swap coefficients without clearing state
    #[inline]
    pub fn set_coeffs(&mut self, coeffs: BiquadCoeffs) {
        self.coeffs = coeffs;
    }

    #[inline]
    pub fn coeffs(&self) -> &BiquadCoeffs {
        &self.coeffs
    }
}

impl Default for BiquadTDF2 {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for BiquadTDF2 {
    fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}

impl MonoProcessor for BiquadTDF2 {
    #[inline(always)]
    fn process_sample(&mut self, input: Sample) -> Sample {
        let output = self.coeffs.b0 * input + self.z1;
        self.z1 = self.coeffs.b1 * input - self.coeffs.a1 * output + self.z2;
        self.z2 = self.coeffs.b2 * input - self.coeffs.a2 * output;
        output
    }
}
