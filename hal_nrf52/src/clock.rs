//! nRF52 CLOCK peripheral (low-frequency clock only)

use crate::mmio::Mmio;
use hal::{ClockControl, LfClockSource};

const TASKS_LFCLKSTART: usize = 0x008;
const LFCLKSRC: usize = 0x518;

/// nRF52 clock controller
#[derive(Debug)]
pub struct Nrf52Clock<M: Mmio> {
    regs: M,
}

impl<M: Mmio> Nrf52Clock<M> {
    /// Wraps the CLOCK register block
    pub fn new(regs: M) -> Self {
        Self { regs }
    }

    /// Returns the underlying register block
    pub fn registers(&self) -> &M {
        &self.regs
    }

    const fn source_word(source: LfClockSource) -> u32 {
        match source {
            LfClockSource::Rc => 0,
            LfClockSource::Xtal => 1,
            LfClockSource::Synth => 2,
        }
    }
}

impl<M: Mmio> ClockControl for Nrf52Clock<M> {
    fn start_low_frequency_clock(&mut self, source: LfClockSource) {
        self.regs.write32(LFCLKSRC, Self::source_word(source));
        self.regs.write32(TASKS_LFCLKSTART, 1);
    }

    fn low_frequency_source(&self) -> Option<LfClockSource> {
        match self.regs.read32(LFCLKSRC) & 0b11 {
            0 => Some(LfClockSource::Rc),
            1 => Some(LfClockSource::Xtal),
            2 => Some(LfClockSource::Synth),
            _ => None,
        }
    }
}
