//! Recording engine shared by the engine integration tests

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use peq_dsp::FilterStage;
use peq_engine::{AudioEngine, EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    Create(usize, FilterStage),
    ConnectSource(usize),
    Connect(usize, usize),
    ConnectDestination(usize),
    Update(usize, FilterStage),
    Release(usize),
    Start,
    Suspend,
    Resume,
    Close,
}

pub type EventLog = Arc<Mutex<Vec<GraphEvent>>>;

/// Engine that records every graph operation, with failure injection
pub struct RecordingEngine {
    pub sample_rate: f64,
    pub events: EventLog,
    next_handle: usize,
    /// Fail the n-th `create_peaking` call (0-based)
    pub fail_create_at: Option<usize>,
    pub refuse_start: bool,
    pub refuse_resume: bool,
}

impl RecordingEngine {
    pub fn new(sample_rate: f64) -> (Self, EventLog) {
        let events: EventLog = Arc::new(Mutex::new(Vec::new()));
        let engine = Self {
            sample_rate,
            events: Arc::clone(&events),
            next_handle: 0,
            fail_create_at: None,
            refuse_start: false,
            refuse_resume: false,
        };
        (engine, events)
    }

    fn record(&self, event: GraphEvent) {
        self.events.lock().push(event);
    }
}

impl AudioEngine for RecordingEngine {
    type Handle = usize;

    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn create_peaking(&mut self, stage: &FilterStage) -> EngineResult<usize> {
        if self.fail_create_at == Some(self.next_handle) {
            return Err(EngineError::NoFreeSlot(self.next_handle));
        }
        let handle = self.next_handle;
        self.next_handle += 1;
        self.record(GraphEvent::Create(handle, *stage));
        Ok(handle)
    }

    fn connect_source(&mut self, to: usize) -> EngineResult<()> {
        self.record(GraphEvent::ConnectSource(to));
        Ok(())
    }

    fn connect(&mut self, from: usize, to: usize) -> EngineResult<()> {
        self.record(GraphEvent::Connect(from, to));
        Ok(())
    }

    fn connect_destination(&mut self, from: usize) -> EngineResult<()> {
        self.record(GraphEvent::ConnectDestination(from));
        Ok(())
    }

    fn update(&mut self, handle: usize, stage: &FilterStage) -> EngineResult<()> {
        self.record(GraphEvent::Update(handle, *stage));
        Ok(())
    }

    fn release(&mut self, handle: usize) {
        self.record(GraphEvent::Release(handle));
    }

    fn start(&mut self) -> EngineResult<()> {
        self.record(GraphEvent::Start);
        if self.refuse_start {
            return Err(EngineError::PlaybackRefused("no user gesture".into()));
        }
        Ok(())
    }

    fn suspend(&mut self) -> EngineResult<()> {
        self.record(GraphEvent::Suspend);
        Ok(())
    }

    fn resume(&mut self) -> EngineResult<()> {
        self.record(GraphEvent::Resume);
        if self.refuse_resume {
            return Err(EngineError::PlaybackRefused("no user gesture".into()));
        }
        Ok(())
    }

    fn close(&mut self) {
        self.record(GraphEvent::Close);
    }
}

pub fn events_of(log: &EventLog) -> Vec<GraphEvent> {
    log.lock().clone()
}

pub fn releases(log: &EventLog) -> Vec<usize> {
    log.lock()
        .iter()
        .filter_map(|e| match e {
            GraphEvent::Release(h) => Some(*h),
            _ => None,
        })
        .collect()
}
