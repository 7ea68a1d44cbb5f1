//! Host audio engine seam
//!
//! The engine owns the real-time processing graph of one ready audio
//! source. Its filter handles are opaque; only [`AudioGraph`] creates,
//! connects, updates and releases them.
//!
//! [`AudioGraph`]: crate::AudioGraph

use std::fmt;

use peq_dsp::FilterStage;

use crate::error::EngineResult;

/// Processing graph of a host audio engine, bound to one audio source
pub trait AudioEngine {
    /// Native filter handle
    type Handle: Copy + fmt::Debug;

    /// Sample rate the engine renders at
    fn sample_rate(&self) -> f64;

    /// Create a peaking filter handle initialized with `stage`
    fn create_peaking(&mut self, stage: &FilterStage) -> EngineResult<Self::Handle>;

    /// Connect the audio source to `to`
    fn connect_source(&mut self, to: Self::Handle) -> EngineResult<()>;

    /// Connect `from`'s output to `to`'s input
    fn connect(&mut self, from: Self::Handle, to: Self::Handle) -> EngineResult<()>;

    /// Connect `from` to the engine destination (speakers)
    fn connect_destination(&mut self, from: Self::Handle) -> EngineResult<()>;

    /// Replace all parameters of `handle` in one step
    fn update(&mut self, handle: Self::Handle, stage: &FilterStage) -> EngineResult<()>;

    /// Disconnect and free `handle`
    fn release(&mut self, handle: Self::Handle);

    /// Begin playback of the source
    fn start(&mut self) -> EngineResult<()> {
        Ok(())
    }

    /// Pause rendering without releasing any handle
    fn suspend(&mut self) -> EngineResult<()> {
        Ok(())
    }

    /// Restart a suspended engine
    fn resume(&mut self) -> EngineResult<()> {
        Ok(())
    }

    /// Tear down the engine context after all handles are released
    fn close(&mut self) {}
}
