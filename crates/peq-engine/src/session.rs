//! Equalizer session
//!
//! Ties the chain, the parameter controller, the response evaluator and
//! the (optional) audio graph together. The chain is authoritative; the
//! graph mirrors it while an audio source is bound.

use peq_core::{EqConfig, EqError, EqResult};
use peq_dsp::{FilterChain, FilterStage, FrequencyGrid, ResponseCurve, ResponseEvaluator};

use crate::controller::{EditKind, EqPoint, ParameterController, StageEdit};
use crate::graph::AudioGraph;
use crate::host::AudioEngine;

pub struct EqSession<E: AudioEngine> {
    chain: FilterChain,
    controller: ParameterController,
    evaluator: ResponseEvaluator,
    graph: Option<AudioGraph<E>>,
}

impl<E: AudioEngine> EqSession<E> {
    /// Create an unbound session with the configured default stages
    pub fn new(config: &EqConfig) -> EqResult<Self> {
        config.validate()?;
        let chain = FilterChain::from_config(config)?;
        let grid = FrequencyGrid::from_config(&config.grid)?;
        let controller = ParameterController::new(&chain, config.commit_policy);

        log::debug!(
            "EQ session created: {} stages, {} grid points",
            chain.len(),
            grid.len()
        );

        Ok(Self {
            chain,
            controller,
            evaluator: ResponseEvaluator::new(grid),
            graph: None,
        })
    }

    /// Bind an audio source. Any previous graph is released first.
    pub fn bind(&mut self, engine: E) -> EqResult<()> {
        self.unbind();
        self.graph = Some(AudioGraph::bind(engine, &self.chain)?);
        Ok(())
    }

    /// Release the audio graph; returns false if nothing was bound
    pub fn unbind(&mut self) -> bool {
        self.graph.take().is_some()
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.graph.is_some()
    }

    /// Sample rate of the bound graph, if any
    pub fn sample_rate(&self) -> Option<f64> {
        self.graph.as_ref().map(AudioGraph::sample_rate)
    }

    pub fn graph(&self) -> Option<&AudioGraph<E>> {
        self.graph.as_ref()
    }

    /// Pause playback of the bound graph
    pub fn suspend(&mut self) -> EqResult<()> {
        match self.graph.as_mut() {
            Some(graph) => graph.suspend(),
            None => Err(not_ready()),
        }
    }

    /// Restart playback after a user gesture
    pub fn resume(&mut self) -> EqResult<()> {
        match self.graph.as_mut() {
            Some(graph) => {
                graph.resume();
                Ok(())
            }
            None => Err(not_ready()),
        }
    }

    /// Combined magnitude response of the chain over the grid
    pub fn compute_response(&self) -> EqResult<ResponseCurve> {
        self.evaluator
            .evaluate(&self.chain, self.sample_rate())
            .map_err(|e| match e {
                EqError::NotReady(_) => not_ready(),
                other => other,
            })
    }

    /// Apply one edit to stage `index` and mirror it into the graph.
    ///
    /// Allowed while unbound; the chain keeps the value and the graph
    /// picks it up at the next bind.
    pub fn update_parameter(
        &mut self,
        index: usize,
        edit: StageEdit,
        committed: bool,
    ) -> EqResult<FilterStage> {
        let kind = EditKind::from_committed(committed);
        let stage = self.controller.apply(&mut self.chain, index, &edit, kind)?;
        if let Some(graph) = self.graph.as_mut() {
            graph.mirror(index, &stage)?;
        }
        Ok(stage)
    }

    /// `update_parameter` followed by `compute_response`
    pub fn update_and_evaluate(
        &mut self,
        index: usize,
        edit: StageEdit,
        committed: bool,
    ) -> EqResult<ResponseCurve> {
        self.update_parameter(index, edit, committed)?;
        self.compute_response()
    }

    pub fn stage(&self, index: usize) -> EqResult<&FilterStage> {
        self.chain.stage(index)
    }

    pub fn stages(&self) -> &[FilterStage] {
        self.chain.stages()
    }

    pub fn stage_count(&self) -> usize {
        self.chain.len()
    }

    pub fn chain(&self) -> &FilterChain {
        &self.chain
    }

    /// Committed points for display
    pub fn points(&self) -> &[EqPoint] {
        self.controller.points()
    }

    pub fn grid(&self) -> &FrequencyGrid {
        self.evaluator.grid()
    }
}

fn not_ready() -> EqError {
    EqError::NotReady("audio context is not ready".into())
}
