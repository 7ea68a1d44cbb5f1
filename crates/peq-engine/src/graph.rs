//! Audio graph lifecycle
//!
//! An [`AudioGraph`] exists exactly while an audio source is available.
//! Binding builds `source → stage 0 → … → stage N-1 → destination` with
//! one native handle per stage; dropping the graph releases every handle
//! and closes the engine, whichever path the drop comes from.

use peq_core::{EqError, EqResult, validate_sample_rate};
use peq_dsp::{FilterChain, FilterStage};

use crate::host::AudioEngine;

/// Live binding of a filter chain to a host engine
pub struct AudioGraph<E: AudioEngine> {
    engine: E,
    /// One handle per chain stage, in series order
    handles: Vec<E::Handle>,
    sample_rate: f64,
}

impl<E: AudioEngine> AudioGraph<E> {
    /// Build the engine graph for `chain` and start playback.
    ///
    /// On any failure the partially built graph is torn down before the
    /// error is returned. A refused start is logged, not returned.
    pub fn bind(engine: E, chain: &FilterChain) -> EqResult<Self> {
        let sample_rate = engine.sample_rate();
        let mut graph = Self {
            engine,
            handles: Vec::with_capacity(chain.len()),
            sample_rate,
        };
        validate_sample_rate(sample_rate)?;

        for stage in chain.stages() {
            let handle = graph.engine.create_peaking(stage)?;
            graph.handles.push(handle);
        }

        let (first, last) = match (graph.handles.first(), graph.handles.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return Err(EqError::InvalidParameter("cannot bind an empty chain".into())),
        };
        graph.engine.connect_source(first)?;
        for pair in graph.handles.windows(2) {
            graph.engine.connect(pair[0], pair[1])?;
        }
        graph.engine.connect_destination(last)?;

        if let Err(e) = graph.engine.start() {
            log::warn!("Playback did not start (resume on user gesture): {}", e);
        }

        log::info!(
            "Audio graph bound: {} stages at {} Hz",
            graph.handles.len(),
            sample_rate
        );
        Ok(graph)
    }

    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    #[inline]
    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    /// Read access to the engine; handles stay private to the graph
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Push a committed stage value into its native handle
    pub fn mirror(&mut self, index: usize, stage: &FilterStage) -> EqResult<()> {
        let handle = *self.handles.get(index).ok_or(EqError::OutOfRange {
            index,
            len: self.handles.len(),
        })?;
        self.engine.update(handle, stage)?;
        log::debug!(
            "Mirrored stage {}: {:.1} Hz, {:+.2} dB, Q {:.3}",
            index,
            stage.frequency_hz,
            stage.gain_db,
            stage.q
        );
        Ok(())
    }

    /// Pause playback; handles and parameters stay in place
    pub fn suspend(&mut self) -> EqResult<()> {
        self.engine.suspend()?;
        Ok(())
    }

    /// Restart a suspended engine. Failures are logged and swallowed.
    pub fn resume(&mut self) {
        if let Err(e) = self.engine.resume() {
            log::warn!("Audio engine resume failed: {}", e);
        }
    }
}

impl<E: AudioEngine> Drop for AudioGraph<E> {
    fn drop(&mut self) {
        let released = self.handles.len();
        while let Some(handle) = self.handles.pop() {
            self.engine.release(handle);
        }
        self.engine.close();
        log::info!("Audio graph released ({} handles)", released);
    }
}
