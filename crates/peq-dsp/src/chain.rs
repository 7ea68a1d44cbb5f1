//! Series filter chain
//!
//! Stage order is signal order: input → stage 0 → … → stage N-1.
//! The number of stages is fixed when the chain is built.

use peq_core::{EqConfig, EqError, EqResult};

use crate::biquad::BiquadCoeffs;
use crate::stage::FilterStage;

/// Ordered, fixed-length sequence of EQ stages
#[derive(Debug, Clone, PartialEq)]
pub struct FilterChain {
    stages: Box<[FilterStage]>,
}

impl FilterChain {
    pub fn new(stages: Vec<FilterStage>) -> EqResult<Self> {
        if stages.is_empty() {
            return Err(EqError::InvalidParameter(
                "filter chain needs at least one stage".into(),
            ));
        }
        Ok(Self {
            stages: stages.into_boxed_slice(),
        })
    }

    /// Build the default stage set described by `config`
    pub fn from_config(config: &EqConfig) -> EqResult<Self> {
        let stages = config
            .stage_frequencies
            .iter()
            .map(|&freq| FilterStage::peaking(freq, config.default_gain_db, config.default_q))
            .collect();
        Self::new(stages)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always false; a chain holds at least one stage
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    #[inline]
    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    pub fn check_index(&self, index: usize) -> EqResult<()> {
        if index < self.stages.len() {
            Ok(())
        } else {
            Err(EqError::OutOfRange {
                index,
                len: self.stages.len(),
            })
        }
    }

    pub fn stage(&self, index: usize) -> EqResult<&FilterStage> {
        self.check_index(index)?;
        Ok(&self.stages[index])
    }

    /// Store a whole stage value in one write, returning the previous one
    pub fn replace(&mut self, index: usize, stage: FilterStage) -> EqResult<FilterStage> {
        self.check_index(index)?;
        Ok(std::mem::replace(&mut self.stages[index], stage))
    }

    /// Coefficients of every stage at `sample_rate`, in series order
    pub fn coefficients(&self, sample_rate: f64) -> Vec<BiquadCoeffs> {
        self.stages
            .iter()
            .map(|stage| stage.coefficients(sample_rate))
            .collect()
    }
}
