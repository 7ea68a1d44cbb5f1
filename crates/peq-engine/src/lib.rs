//! peq-engine: Interactive EQ session and audio graph
//!
//! ## Modules
//! - `controller` - clamped stage edits, transient vs committed
//! - `host` - the host audio engine trait
//! - `graph` - audio graph build, mirroring and teardown
//! - `biquad_engine` - in-process engine with lock-free coefficient handoff
//! - `session` - chain, controller, evaluator and graph in one place

mod biquad_engine;
mod controller;
mod error;
mod graph;
mod host;
mod session;

pub use biquad_engine::{BiquadEngine, BiquadRenderer, MAX_SLOTS, SlotId};
pub use controller::{EditKind, EqPoint, ParameterController, StageEdit};
pub use error::{EngineError, EngineResult};
pub use graph::AudioGraph;
pub use host::AudioEngine;
pub use session::EqSession;
