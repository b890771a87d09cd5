//! # Simulated Real-Time Counter
//!
//! Deterministic counter/compare peripheral for testing.
//!
//! ## Philosophy
//!
//! **Determinism enables thorough testing.**
//!
//! The counter only advances when a test calls `tick()` or `advance()`.
//! Every register access made through `RtcRegisters` is appended to an
//! operation log, so tests can assert on ordering as well as outcome.
//!
//! ## Modelled Behaviour
//!
//! - 24-bit counter, wrapping silently
//! - A compare event latches when the counter steps onto the compare value
//! - Events stay latched until `clear_event`
//! - Interrupt enables have set/clear semantics
//! - The prescaler is recorded but does not change the tick rate; one
//!   `tick()` is one counter increment

use hal::{counter_add, CompareChannel, IntenFlags, Prescaler, RtcRegisters, COUNTER_MASK};
use spin::Mutex;
use std::sync::Arc;

/// A register operation performed through `RtcRegisters`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtcOp {
    Start,
    Stop,
    Clear,
    SetPrescaler(u16),
    SetCompare(CompareChannel, u32),
    ClearEvent(CompareChannel),
    EnableInterrupts(IntenFlags),
    DisableInterrupts(IntenFlags),
}

#[derive(Debug, Default)]
struct RtcState {
    running: bool,
    counter: u32,
    prescaler: u16,
    compare: [u32; 2],
    events: [bool; 2],
    inten: IntenFlags,
    ops: Vec<RtcOp>,
}

/// Simulated counter/compare peripheral
///
/// Clones share the same peripheral.
///
/// # Examples
///
/// ```
/// use hal::{CompareChannel, RtcRegisters};
/// use sim_kernel::SimRtc;
///
/// let mut rtc = SimRtc::new();
/// rtc.set_compare(CompareChannel::Channel0, 3);
/// rtc.start();
///
/// rtc.advance(2);
/// assert!(!rtc.event_pending(CompareChannel::Channel0));
/// rtc.tick();
/// assert!(rtc.event_pending(CompareChannel::Channel0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimRtc {
    state: Arc<Mutex<RtcState>>,
}

impl SimRtc {
    /// Creates a stopped peripheral with the counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the counter by one tick, latching any compare match
    ///
    /// Does nothing while the counter is stopped.
    pub fn tick(&self) {
        let mut state = self.state.lock();
        if !state.running {
            return;
        }
        state.counter = counter_add(state.counter, 1);
        for channel in CompareChannel::ALL {
            if state.compare[channel.index()] == state.counter {
                state.events[channel.index()] = true;
            }
        }
    }

    /// Advances the counter by `ticks` without servicing interrupts
    pub fn advance(&self, ticks: u32) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Moves the counter to an arbitrary value without latching events
    ///
    /// Used to place the counter near its wrap point.
    pub fn set_counter(&self, value: u32) {
        self.state.lock().counter = value & COUNTER_MASK;
    }

    /// Latches a compare event without a match (spurious event injection)
    pub fn latch_event(&self, channel: CompareChannel) {
        self.state.lock().events[channel.index()] = true;
    }

    /// Returns true while any latched event has its interrupt enabled
    pub fn irq_asserted(&self) -> bool {
        let state = self.state.lock();
        CompareChannel::ALL.iter().any(|channel| {
            state.events[channel.index()] && state.inten.contains(channel.interrupt())
        })
    }

    /// Returns whether the counter is running
    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }

    /// Returns the last programmed prescaler
    pub fn prescaler(&self) -> u16 {
        self.state.lock().prescaler
    }

    /// Returns a copy of the operation log
    pub fn ops(&self) -> Vec<RtcOp> {
        self.state.lock().ops.clone()
    }

    /// Empties the operation log
    pub fn clear_ops(&self) {
        self.state.lock().ops.clear();
    }

    fn record(&self, op: RtcOp) {
        self.state.lock().ops.push(op);
    }
}

impl RtcRegisters for SimRtc {
    fn start(&mut self) {
        self.record(RtcOp::Start);
        self.state.lock().running = true;
    }

    fn stop(&mut self) {
        self.record(RtcOp::Stop);
        self.state.lock().running = false;
    }

    fn clear(&mut self) {
        self.record(RtcOp::Clear);
        self.state.lock().counter = 0;
    }

    fn set_prescaler(&mut self, prescaler: Prescaler) {
        self.record(RtcOp::SetPrescaler(prescaler.value()));
        self.state.lock().prescaler = prescaler.value();
    }

    fn counter(&self) -> u32 {
        self.state.lock().counter
    }

    fn compare(&self, channel: CompareChannel) -> u32 {
        self.state.lock().compare[channel.index()]
    }

    fn set_compare(&mut self, channel: CompareChannel, value: u32) {
        let value = value & COUNTER_MASK;
        self.record(RtcOp::SetCompare(channel, value));
        self.state.lock().compare[channel.index()] = value;
    }

    fn event_pending(&self, channel: CompareChannel) -> bool {
        self.state.lock().events[channel.index()]
    }

    fn clear_event(&mut self, channel: CompareChannel) {
        self.record(RtcOp::ClearEvent(channel));
        self.state.lock().events[channel.index()] = false;
    }

    fn enable_interrupts(&mut self, flags: IntenFlags) {
        self.record(RtcOp::EnableInterrupts(flags));
        self.state.lock().inten.insert(flags);
    }

    fn disable_interrupts(&mut self, flags: IntenFlags) {
        self.record(RtcOp::DisableInterrupts(flags));
        self.state.lock().inten.remove(flags);
    }

    fn enabled_interrupts(&self) -> IntenFlags {
        self.state.lock().inten
    }
}
