//! In-process biquad engine
//!
//! Control side ([`BiquadEngine`]) and audio side ([`BiquadRenderer`])
//! share only an SPSC command queue and a running flag. Coefficients are
//! synthesized on the control thread and published as whole snapshots, so
//! the audio thread never observes a stage mixing fields of two edits.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use peq_core::Sample;
use peq_dsp::{BiquadCoeffs, BiquadTDF2, FilterStage, MonoProcessor, Processor};
use rtrb::{Consumer, Producer, PushError, RingBuffer};

use crate::error::{EngineError, EngineResult};
use crate::host::AudioEngine;

/// Maximum filter slots per engine (pre-allocated on the audio side)
pub const MAX_SLOTS: usize = 16;

/// Handle to a filter slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(u8);

impl SlotId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Source → slots → destination, in signal order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Route {
    slots: [u8; MAX_SLOTS],
    len: usize,
    to_destination: bool,
}

impl Route {
    #[inline]
    fn as_slice(&self) -> &[u8] {
        &self.slots[..self.len]
    }

    fn last(&self) -> Option<u8> {
        self.as_slice().last().copied()
    }

    fn contains(&self, slot: u8) -> bool {
        self.as_slice().contains(&slot)
    }

    fn push(&mut self, slot: u8) {
        debug_assert!(self.len < MAX_SLOTS);
        self.slots[self.len] = slot;
        self.len += 1;
    }
}

/// Control → audio message
#[derive(Debug, Clone, Copy)]
enum RenderCommand {
    SetCoeffs { slot: u8, coeffs: BiquadCoeffs },
    Release { slot: u8 },
    SetRoute(Route),
    Clear,
}

/// Control side of the in-process engine
pub struct BiquadEngine {
    sample_rate: f64,
    producer: Producer<RenderCommand>,
    /// Commands the queue had no room for, delivered on the next send/flush
    pending: VecDeque<RenderCommand>,
    allocated: [bool; MAX_SLOTS],
    route: Route,
    running: Arc<AtomicBool>,
    closed: bool,
}

impl BiquadEngine {
    /// Create an engine and the renderer to hand to the audio callback
    pub fn new(sample_rate: f64, queue_capacity: usize) -> (Self, BiquadRenderer) {
        let (producer, consumer) = RingBuffer::new(queue_capacity.max(1));
        let running = Arc::new(AtomicBool::new(false));

        let engine = Self {
            sample_rate,
            producer,
            pending: VecDeque::new(),
            allocated: [false; MAX_SLOTS],
            route: Route::default(),
            running: Arc::clone(&running),
            closed: false,
        };
        let renderer = BiquadRenderer {
            consumer,
            filters: std::array::from_fn(|_| BiquadTDF2::new()),
            route: Route::default(),
            running,
        };

        (engine, renderer)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Number of commands still waiting for queue space
    pub fn pending_commands(&self) -> usize {
        self.pending.len()
    }

    /// Push deferred commands; returns how many are still waiting
    pub fn flush(&mut self) -> usize {
        while let Some(command) = self.pending.pop_front() {
            if let Err(PushError::Full(command)) = self.producer.push(command) {
                self.pending.push_front(command);
                log::debug!("Render queue full, {} commands deferred", self.pending.len());
                break;
            }
        }
        self.pending.len()
    }

    fn send(&mut self, command: RenderCommand) {
        // A newer snapshot for the same slot supersedes an undelivered one
        if let RenderCommand::SetCoeffs { slot, .. } = command {
            if let Some(waiting) = self.waiting_coeffs(slot) {
                *waiting = command;
                self.flush();
                return;
            }
        }
        self.pending.push_back(command);
        self.flush();
    }

    /// Undelivered snapshot for `slot` that no later release or clear
    /// has invalidated. At most one per slot can exist.
    fn waiting_coeffs(&mut self, slot: u8) -> Option<&mut RenderCommand> {
        for command in self.pending.iter_mut().rev() {
            match *command {
                RenderCommand::SetCoeffs { slot: s, .. } if s == slot => return Some(command),
                RenderCommand::Release { slot: s } if s == slot => return None,
                RenderCommand::Clear => return None,
                _ => {}
            }
        }
        None
    }

    fn slot(&self, handle: SlotId) -> EngineResult<u8> {
        if self.closed {
            return Err(EngineError::Closed);
        }
        match self.allocated.get(handle.index()) {
            Some(true) => Ok(handle.0),
            _ => Err(EngineError::UnknownHandle(handle.index())),
        }
    }
}

impl AudioEngine for BiquadEngine {
    type Handle = SlotId;

    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn create_peaking(&mut self, stage: &FilterStage) -> EngineResult<SlotId> {
        if self.closed {
            return Err(EngineError::Closed);
        }
        let index = self
            .allocated
            .iter()
            .position(|used| !used)
            .ok_or(EngineError::NoFreeSlot(MAX_SLOTS))?;
        self.allocated[index] = true;

        let slot = index as u8;
        self.send(RenderCommand::SetCoeffs {
            slot,
            coeffs: stage.coefficients(self.sample_rate),
        });
        Ok(SlotId(slot))
    }

    fn connect_source(&mut self, to: SlotId) -> EngineResult<()> {
        let slot = self.slot(to)?;
        self.route = Route::default();
        self.route.push(slot);
        Ok(())
    }

    fn connect(&mut self, from: SlotId, to: SlotId) -> EngineResult<()> {
        let from = self.slot(from)?;
        let to = self.slot(to)?;
        if self.route.last() != Some(from) {
            return Err(EngineError::InvalidConnection(format!(
                "slot {from} is not the end of the source chain"
            )));
        }
        if self.route.contains(to) {
            return Err(EngineError::InvalidConnection(format!(
                "slot {to} is already in the chain"
            )));
        }
        self.route.push(to);
        Ok(())
    }

    fn connect_destination(&mut self, from: SlotId) -> EngineResult<()> {
        let from = self.slot(from)?;
        if self.route.last() != Some(from) {
            return Err(EngineError::InvalidConnection(format!(
                "slot {from} is not the end of the source chain"
            )));
        }
        self.route.to_destination = true;
        self.send(RenderCommand::SetRoute(self.route));
        Ok(())
    }

    fn update(&mut self, handle: SlotId, stage: &FilterStage) -> EngineResult<()> {
        let slot = self.slot(handle)?;
        self.send(RenderCommand::SetCoeffs {
            slot,
            coeffs: stage.coefficients(self.sample_rate),
        });
        Ok(())
    }

    fn release(&mut self, handle: SlotId) {
        let Ok(slot) = self.slot(handle) else {
            return;
        };
        self.allocated[slot as usize] = false;
        if self.route.contains(slot) {
            self.route = Route::default();
        }
        self.send(RenderCommand::Release { slot });
    }

    fn start(&mut self) -> EngineResult<()> {
        if self.closed {
            return Err(EngineError::Closed);
        }
        self.running.store(true, Ordering::Release);
        log::info!("Biquad engine started at {} Hz", self.sample_rate);
        Ok(())
    }

    fn suspend(&mut self) -> EngineResult<()> {
        if self.closed {
            return Err(EngineError::Closed);
        }
        if self.running.swap(false, Ordering::AcqRel) {
            log::info!("Biquad engine suspended");
        }
        Ok(())
    }

    fn resume(&mut self) -> EngineResult<()> {
        if self.closed {
            return Err(EngineError::Closed);
        }
        if !self.running.swap(true, Ordering::AcqRel) {
            log::info!("Biquad engine resumed");
        }
        Ok(())
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.running.store(false, Ordering::Release);
        self.allocated = [false; MAX_SLOTS];
        self.route = Route::default();
        self.send(RenderCommand::Clear);
        self.closed = true;
        log::info!("Biquad engine closed");
    }
}

/// Audio side of the in-process engine.
///
/// Owned by the audio callback. Never allocates.
pub struct BiquadRenderer {
    consumer: Consumer<RenderCommand>,
    filters: [BiquadTDF2; MAX_SLOTS],
    route: Route,
    running: Arc<AtomicBool>,
}

impl BiquadRenderer {
    /// Apply queued commands (call at start of audio callback)
    fn process_commands(&mut self) {
        while let Ok(command) = self.consumer.pop() {
            match command {
                RenderCommand::SetCoeffs { slot, coeffs } => {
                    self.filters[slot as usize].set_coeffs(coeffs);
                }
                RenderCommand::Release { slot } => {
                    let filter = &mut self.filters[slot as usize];
                    filter.set_coeffs(BiquadCoeffs::bypass());
                    filter.reset();
                    if self.route.contains(slot) {
                        self.route = Route::default();
                    }
                }
                RenderCommand::SetRoute(route) => {
                    self.route = route;
                }
                RenderCommand::Clear => {
                    self.route = Route::default();
                    for filter in &mut self.filters {
                        filter.set_coeffs(BiquadCoeffs::bypass());
                        filter.reset();
                    }
                }
            }
        }
    }

    /// Filter a mono block in place.
    ///
    /// Outputs silence while the engine is stopped or the chain is not
    /// connected through to the destination.
    pub fn process_block(&mut self, buffer: &mut [Sample]) {
        self.process_commands();

        if !self.running.load(Ordering::Acquire) || !self.route.to_destination {
            buffer.fill(0.0);
            return;
        }

        for sample in buffer.iter_mut() {
            let mut x = *sample;
            for &slot in self.route.as_slice() {
                x = self.filters[slot as usize].process_sample(x);
            }
            *sample = x;
        }
    }

    /// True once a complete source → destination chain is installed
    pub fn is_routed(&self) -> bool {
        self.route.to_destination
    }

    /// Coefficients currently active in `slot`
    pub fn slot_coeffs(&self, slot: SlotId) -> BiquadCoeffs {
        *self.filters[slot.index()].coeffs()
    }
}
