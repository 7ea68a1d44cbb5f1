//! peq-dsp: Filter design and response analysis for the parametric EQ
//!
//! ## Modules
//! - `biquad` - cookbook coefficients and a TDF-II biquad
//! - `stage` - one peaking EQ stage
//! - `chain` - series chain of stages with fixed length
//! - `grid` - log-spaced frequency grid
//! - `response` - aggregate magnitude response of a chain

pub mod biquad;
pub mod chain;
pub mod grid;
pub mod response;
pub mod stage;

pub use biquad::{BiquadCoeffs, BiquadTDF2, FilterKind};
pub use chain::FilterChain;
pub use grid::FrequencyGrid;
pub use response::{ResponseCurve, ResponseEvaluator};
pub use stage::FilterStage;

use peq_core::Sample;

/// Trait for all DSP processors
pub trait Processor: Send + Sync {
    /// Reset processor state
    fn reset(&mut self);
}

/// Mono processor trait
pub trait MonoProcessor: Processor {
    /// Process a single sample
    fn process_sample(&mut self, input: Sample) -> Sample;

    /// Process a block of samples
    fn process_block(&mut self, buffer: &mut [Sample]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }
}
