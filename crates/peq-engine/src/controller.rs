//! Interactive parameter edits
//!
//! Every write to a stage goes through [`ParameterController::apply`]:
//! validate, clamp, then store the whole stage in one assignment. Drag
//! gestures issue transient edits; the gesture end issues a committed
//! edit, which is what updates the displayed point list.

use peq_core::{CommitPolicy, EqError, EqResult, ParamRange};
use peq_dsp::{FilterChain, FilterStage};
use serde::{Deserialize, Serialize};

/// Partial update of one stage; absent fields are left untouched
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StageEdit {
    pub frequency_hz: Option<f64>,
    pub gain_db: Option<f64>,
    pub q: Option<f64>,
}

impl StageEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frequency(mut self, hz: f64) -> Self {
        self.frequency_hz = Some(hz);
        self
    }

    pub fn gain(mut self, db: f64) -> Self {
        self.gain_db = Some(db);
        self
    }

    pub fn q(mut self, q: f64) -> Self {
        self.q = Some(q);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.frequency_hz.is_none() && self.gain_db.is_none() && self.q.is_none()
    }
}

/// How an edit is sequenced by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Drag in progress
    Transient,
    /// Gesture ended
    Committed,
}

impl EditKind {
    pub fn from_committed(committed: bool) -> Self {
        if committed {
            EditKind::Committed
        } else {
            EditKind::Transient
        }
    }
}

/// Editable point shown by the UI (x: Hz, y: dB)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EqPoint {
    pub x: f64,
    pub y: f64,
}

impl From<&FilterStage> for EqPoint {
    fn from(stage: &FilterStage) -> Self {
        Self {
            x: stage.frequency_hz,
            y: stage.gain_db,
        }
    }
}

/// Sole writer of stage parameters
#[derive(Debug, Clone)]
pub struct ParameterController {
    policy: CommitPolicy,
    points: Vec<EqPoint>,
}

impl ParameterController {
    /// Seed the point list from the chain's current stages
    pub fn new(chain: &FilterChain, policy: CommitPolicy) -> Self {
        Self {
            policy,
            points: chain.stages().iter().map(EqPoint::from).collect(),
        }
    }

    #[inline]
    pub fn policy(&self) -> CommitPolicy {
        self.policy
    }

    /// Last committed point per stage
    #[inline]
    pub fn points(&self) -> &[EqPoint] {
        &self.points
    }

    /// Stage value `edit` would produce, without writing it.
    ///
    /// Non-finite inputs are rejected before anything is clamped.
    pub fn resolve(current: &FilterStage, edit: &StageEdit) -> EqResult<FilterStage> {
        for (name, value) in [
            ("frequency", edit.frequency_hz),
            ("gain", edit.gain_db),
            ("q", edit.q),
        ] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(EqError::InvalidParameter(format!("{name} must be finite, got {v}")));
                }
            }
        }

        let mut next = *current;
        if let Some(hz) = edit.frequency_hz {
            next.frequency_hz = clamp_logged("frequency", ParamRange::FREQUENCY, hz);
        }
        if let Some(db) = edit.gain_db {
            next.gain_db = clamp_logged("gain", ParamRange::GAIN, db);
        }
        if let Some(q) = edit.q {
            next.q = clamp_logged("q", ParamRange::Q, q);
        }
        Ok(next)
    }

    /// Validate, clamp and store an edit; returns the stage as stored
    pub fn apply(
        &mut self,
        chain: &mut FilterChain,
        index: usize,
        edit: &StageEdit,
        kind: EditKind,
    ) -> EqResult<FilterStage> {
        let next = Self::resolve(chain.stage(index)?, edit)?;
        chain.replace(index, next)?;

        if kind == EditKind::Committed || self.policy == CommitPolicy::Continuous {
            self.points[index] = EqPoint::from(&next);
        }
        Ok(next)
    }
}

fn clamp_logged(name: &str, range: ParamRange, value: f64) -> f64 {
    let clamped = range.clamp(value);
    if clamped != value {
        log::debug!("Clamped {} {} to {}", name, value, clamped);
    }
    clamped
}
