//! # Real-Time Counter
//!
//! Hardware abstraction for a narrow, free-running counter with
//! independent compare channels.
//!
//! ## Philosophy
//!
//! **The register contract is typed; raw words live in one place.**
//!
//! Counter width, interrupt-enable bit positions and prescaler limits are
//! described here once. Board crates translate these types into register
//! writes; kernel code only ever sees the types.
//!
//! ## Hardware Model
//!
//! - The counter is `COUNTER_BITS` wide and wraps to zero silently
//! - Each compare channel latches an event flag when the counter equals
//!   its compare value, whether or not its interrupt is enabled
//! - Event flags stay set until software writes zero to them
//! - The interrupt line is asserted while any latched event has its
//!   interrupt enabled
//!
//! ## Not For
//!
//! - Wall-clock time (see the kernel timer built on top of this)
//! - Delays longer than one counter period

use bitflags::bitflags;
use thiserror::Error;

/// Width of the hardware counter in bits.
pub const COUNTER_BITS: u32 = 24;

/// Mask selecting the valid counter bits.
pub const COUNTER_MASK: u32 = (1 << COUNTER_BITS) - 1;

/// Number of ticks in one full counter period.
pub const COUNTER_PERIOD: u32 = 1 << COUNTER_BITS;

/// Frequency of the low-frequency clock feeding the counter.
pub const LFCLK_HZ: u32 = 32_768;

/// Closest a compare value may be placed ahead of the counter.
///
/// With the counter at N, writing N or N + 1 to a compare register is not
/// guaranteed to raise an event; the match would come one full counter
/// period late.
pub const MIN_COMPARE_LEAD: u32 = 2;

/// Adds `delta` ticks to a counter value, wrapping at the counter width.
///
/// # Examples
///
/// ```
/// use hal::{counter_add, COUNTER_MASK};
///
/// assert_eq!(counter_add(10, 5), 15);
/// assert_eq!(counter_add(COUNTER_MASK, 1), 0);
/// ```
pub const fn counter_add(value: u32, delta: u32) -> u32 {
    value.wrapping_add(delta) & COUNTER_MASK
}

/// Returns the number of ticks from `from` forward to `to`, across the wrap.
pub const fn counter_distance(from: u32, to: u32) -> u32 {
    to.wrapping_sub(from) & COUNTER_MASK
}

/// Returns true if a compare value of `target` is far enough ahead of
/// `counter` to be guaranteed to match.
pub const fn compare_reachable(counter: u32, target: u32) -> bool {
    counter_distance(counter, target) >= MIN_COMPARE_LEAD
}

/// Errors from typed register configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RtcError {
    /// Prescaler does not fit the 12-bit prescaler register
    #[error("Prescaler out of range: {0} (max {max})", max = Prescaler::MAX)]
    PrescalerOutOfRange(u32),
}

bitflags! {
    /// Interrupt enable bits, in INTENSET/INTENCLR layout.
    #[derive(Default)]
    pub struct IntenFlags: u32 {
        const TICK = 1 << 0;
        const OVERFLOW = 1 << 1;
        const COMPARE0 = 1 << 16;
        const COMPARE1 = 1 << 17;
    }
}

/// A compare channel of the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareChannel {
    /// Channel 0, used for the periodic kernel tick
    Channel0,
    /// Channel 1, used for one-shot deferred wakes
    Channel1,
}

impl CompareChannel {
    /// All channels, in register order.
    pub const ALL: [CompareChannel; 2] = [CompareChannel::Channel0, CompareChannel::Channel1];

    /// Returns the register index of this channel.
    pub const fn index(self) -> usize {
        match self {
            CompareChannel::Channel0 => 0,
            CompareChannel::Channel1 => 1,
        }
    }

    /// Returns the interrupt enable bit for this channel.
    pub const fn interrupt(self) -> IntenFlags {
        match self {
            CompareChannel::Channel0 => IntenFlags::COMPARE0,
            CompareChannel::Channel1 => IntenFlags::COMPARE1,
        }
    }
}

/// Counter prescaler.
///
/// The counter advances at `LFCLK_HZ / (prescaler + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Prescaler(u16);

impl Prescaler {
    /// Largest value the 12-bit prescaler register accepts.
    pub const MAX: u16 = 0x0FFF;

    /// No division: the counter runs at the full clock rate.
    pub const NONE: Prescaler = Prescaler(0);

    /// Creates a prescaler, rejecting values the register cannot hold.
    pub fn new(value: u32) -> Result<Self, RtcError> {
        if value > Self::MAX as u32 {
            return Err(RtcError::PrescalerOutOfRange(value));
        }
        Ok(Self(value as u16))
    }

    /// Returns the raw prescaler value.
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Returns the counter rate produced from a `clock_hz` input clock.
    pub const fn counter_rate(self, clock_hz: u32) -> u32 {
        clock_hz / (self.0 as u32 + 1)
    }
}

/// Counter/compare peripheral register interface
///
/// One implementation drives real memory-mapped registers; another
/// simulates them for tests. Methods correspond one-to-one with the
/// peripheral's tasks, events and registers.
///
/// # Implementation Notes
///
/// - Compare values are truncated to `COUNTER_MASK`
/// - `enable_interrupts`/`disable_interrupts` have set/clear semantics:
///   bits not named are left unchanged
/// - `clear_event` is the only way an event flag goes back to zero
pub trait RtcRegisters {
    /// Starts the counter (START task)
    fn start(&mut self);

    /// Stops the counter (STOP task)
    fn stop(&mut self);

    /// Resets the counter to zero (CLEAR task)
    fn clear(&mut self);

    /// Programs the prescaler. Only valid while the counter is stopped.
    fn set_prescaler(&mut self, prescaler: Prescaler);

    /// Returns the current counter value
    fn counter(&self) -> u32;

    /// Returns the compare value of a channel
    fn compare(&self, channel: CompareChannel) -> u32;

    /// Programs the compare value of a channel
    fn set_compare(&mut self, channel: CompareChannel, value: u32);

    /// Returns whether the channel's compare event is latched
    fn event_pending(&self, channel: CompareChannel) -> bool;

    /// Acknowledges the channel's compare event
    fn clear_event(&mut self, channel: CompareChannel);

    /// Sets interrupt enable bits (INTENSET)
    fn enable_interrupts(&mut self, flags: IntenFlags);

    /// Clears interrupt enable bits (INTENCLR)
    fn disable_interrupts(&mut self, flags: IntenFlags);

    /// Returns the currently enabled interrupts
    fn enabled_interrupts(&self) -> IntenFlags;

    /// Returns whether the channel's interrupt is enabled
    fn interrupt_enabled(&self, channel: CompareChannel) -> bool {
        self.enabled_interrupts().contains(channel.interrupt())
    }
}
