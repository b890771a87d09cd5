//! # Tick Base
//!
//! The kernel's monotonic millisecond count.
//!
//! ## Concurrency
//!
//! The targets this runs on have no 64-bit atomics, so the count is kept
//! as two 32-bit halves. Only the timer interrupt writes it; any context
//! may read it, including an interrupt that preempts the writer halfway
//! through an update.
//!
//! There are two copies of the count and a sequence number whose low bit
//! names the published one. The writer fills the other copy and only then
//! bumps the sequence. A reader loads the sequence, reads the copy it
//! names, and keeps the value if the sequence has not moved in between.
//! A copy is only ever written while the sequence names its twin, so a
//! reader that sees the same sequence before and after cannot have read
//! a half-written copy. A reader that preempts the writer finds the old
//! copy still published and returns at once; nothing ever waits on the
//! writer.

use core::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug, Default)]
struct Slot {
    low: AtomicU32,
    high: AtomicU32,
}

impl Slot {
    const fn new(value: u64) -> Self {
        Self {
            low: AtomicU32::new(value as u32),
            high: AtomicU32::new((value >> 32) as u32),
        }
    }

    fn load(&self) -> u64 {
        let low = self.low.load(Ordering::SeqCst);
        let high = self.high.load(Ordering::SeqCst);
        (u64::from(high) << 32) | u64::from(low)
    }

    fn store(&self, value: u64) {
        self.low.store(value as u32, Ordering::SeqCst);
        self.high.store((value >> 32) as u32, Ordering::SeqCst);
    }
}

/// Wide tick counter with a single writer and lock-free readers
#[derive(Debug, Default)]
pub struct TickCounter {
    sequence: AtomicU32,
    slots: [Slot; 2],
}

impl TickCounter {
    /// Creates a counter at zero
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Creates a counter at an arbitrary value
    pub const fn starting_at(value: u64) -> Self {
        Self {
            sequence: AtomicU32::new(0),
            slots: [Slot::new(value), Slot::new(value)],
        }
    }

    /// Returns the current value, never a half-updated one
    pub fn read(&self) -> u64 {
        loop {
            let sequence = self.sequence.load(Ordering::SeqCst);
            let value = self.slot(sequence).load();
            if self.sequence.load(Ordering::SeqCst) == sequence {
                return value;
            }
        }
    }

    /// Adds `delta` to the counter
    ///
    /// There must be a single writer: the timer interrupt in the kernel.
    /// Two concurrent writers would lose updates.
    pub fn advance(&self, delta: u64) {
        let next = self.stage(delta);
        self.publish(next);
    }

    /// Writes the advanced value into the unpublished copy
    ///
    /// Returns the sequence number that publishes it.
    fn stage(&self, delta: u64) -> u32 {
        let sequence = self.sequence.load(Ordering::SeqCst);
        let value = self.slot(sequence).load().wrapping_add(delta);
        let next = sequence.wrapping_add(1);
        self.slot(next).store(value);
        next
    }

    fn publish(&self, sequence: u32) {
        self.sequence.store(sequence, Ordering::SeqCst);
    }

    fn slot(&self, sequence: u32) -> &Slot {
        &self.slots[(sequence & 1) as usize]
    }
}
