//! # Simulated Board
//!
//! Connects a simulated counter to a simulated interrupt controller.
//!
//! The board advances the counter one tick at a time. After each tick it
//! enters the supplied interrupt handler for as long as the counter's
//! interrupt line is asserted, the line is enabled and interrupts are not
//! masked, exactly like a level-triggered line on real hardware. A handler
//! that never acknowledges its event is reported as an interrupt storm
//! instead of hanging the test.

use crate::interrupts::SimInterrupts;
use crate::timer::SimRtc;
use hal::IrqNumber;

/// Handler entries per tick after which the line is considered stuck.
const STORM_LIMIT: usize = 16;

/// Simulated board: one counter wired to one interrupt line
#[derive(Debug, Clone)]
pub struct SimBoard {
    rtc: SimRtc,
    interrupts: SimInterrupts,
    irq: IrqNumber,
}

impl SimBoard {
    /// Wires `rtc` to line `irq` of `interrupts`
    pub fn new(rtc: SimRtc, interrupts: SimInterrupts, irq: IrqNumber) -> Self {
        Self {
            rtc,
            interrupts,
            irq,
        }
    }

    /// Returns the counter
    pub fn rtc(&self) -> &SimRtc {
        &self.rtc
    }

    /// Returns the interrupt controller
    pub fn interrupts(&self) -> &SimInterrupts {
        &self.interrupts
    }

    /// Returns true if the handler would be entered right now
    pub fn irq_pending(&self) -> bool {
        self.rtc.irq_asserted() && self.interrupts.would_take(self.irq)
    }

    /// Enters `isr` until the line deasserts
    ///
    /// Returns the number of handler entries.
    ///
    /// # Panics
    ///
    /// Panics if the line stays asserted after `STORM_LIMIT` entries.
    pub fn service<F: FnMut()>(&self, mut isr: F) -> usize {
        let mut entries = 0;
        while self.irq_pending() {
            assert!(
                entries < STORM_LIMIT,
                "interrupt storm: compare event never acknowledged"
            );
            isr();
            entries += 1;
        }
        entries
    }

    /// Advances the counter by `ticks`, servicing interrupts after each tick
    ///
    /// Returns the total number of handler entries.
    pub fn run_ticks<F: FnMut()>(&self, ticks: u32, mut isr: F) -> usize {
        let mut entries = 0;
        for _ in 0..ticks {
            self.rtc.tick();
            entries += self.service(&mut isr);
        }
        entries
    }
}
