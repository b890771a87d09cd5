//! # nRF52 RTC
//!
//! `RtcRegisters` for the nRF52 RTC peripheral.
//!
//! ## Register Map (offsets from the block base)
//!
//! | Register            | Offset        | Use                          |
//! |---------------------|---------------|------------------------------|
//! | TASKS_START         | 0x000         | write 1 to start             |
//! | TASKS_STOP          | 0x004         | write 1 to stop              |
//! | TASKS_CLEAR         | 0x008         | write 1 to zero the counter  |
//! | EVENTS_COMPARE[n]   | 0x140 + 4n    | 1 when latched, write 0 to ack |
//! | INTENSET            | 0x304         | write 1s to enable; reads mask |
//! | INTENCLR            | 0x308         | write 1s to disable          |
//! | COUNTER             | 0x504         | 24-bit counter               |
//! | PRESCALER           | 0x508         | 12-bit, only while stopped   |
//! | CC[n]               | 0x540 + 4n    | 24-bit compare value         |
//!
//! This is the only place the typed register model becomes raw words.
//!
//! ## Compare Lead
//!
//! With COUNTER at N, writing N or N + 1 to a CC register is not
//! guaranteed to raise EVENTS_COMPARE; the match then comes a full
//! counter period later. Callers keep compare values at least
//! [`hal::MIN_COMPARE_LEAD`] ticks ahead of the counter.

use crate::mmio::Mmio;
use hal::{CompareChannel, IntenFlags, Prescaler, RtcRegisters, COUNTER_MASK};

const TASKS_START: usize = 0x000;
const TASKS_STOP: usize = 0x004;
const TASKS_CLEAR: usize = 0x008;
const EVENTS_COMPARE: usize = 0x140;
const INTENSET: usize = 0x304;
const INTENCLR: usize = 0x308;
const COUNTER: usize = 0x504;
const PRESCALER: usize = 0x508;
const CC: usize = 0x540;

const TRIGGER: u32 = 1;

/// nRF52 RTC instance
#[derive(Debug)]
pub struct Nrf52Rtc<M: Mmio> {
    regs: M,
}

impl<M: Mmio> Nrf52Rtc<M> {
    /// Wraps an RTC register block
    pub fn new(regs: M) -> Self {
        Self { regs }
    }

    /// Returns the underlying register block
    pub fn registers(&self) -> &M {
        &self.regs
    }

    const fn event_offset(channel: CompareChannel) -> usize {
        EVENTS_COMPARE + 4 * channel.index()
    }

    const fn cc_offset(channel: CompareChannel) -> usize {
        CC + 4 * channel.index()
    }
}

impl<M: Mmio> RtcRegisters for Nrf52Rtc<M> {
    fn start(&mut self) {
        self.regs.write32(TASKS_START, TRIGGER);
    }

    fn stop(&mut self) {
        self.regs.write32(TASKS_STOP, TRIGGER);
    }

    fn clear(&mut self) {
        self.regs.write32(TASKS_CLEAR, TRIGGER);
    }

    fn set_prescaler(&mut self, prescaler: Prescaler) {
        self.regs.write32(PRESCALER, u32::from(prescaler.value()));
    }

    fn counter(&self) -> u32 {
        self.regs.read32(COUNTER) & COUNTER_MASK
    }

    fn compare(&self, channel: CompareChannel) -> u32 {
        self.regs.read32(Self::cc_offset(channel)) & COUNTER_MASK
    }

    fn set_compare(&mut self, channel: CompareChannel, value: u32) {
        self.regs
            .write32(Self::cc_offset(channel), value & COUNTER_MASK);
    }

    fn event_pending(&self, channel: CompareChannel) -> bool {
        self.regs.read32(Self::event_offset(channel)) != 0
    }

    fn clear_event(&mut self, channel: CompareChannel) {
        self.regs.write32(Self::event_offset(channel), 0);
    }

    fn enable_interrupts(&mut self, flags: IntenFlags) {
        self.regs.write32(INTENSET, flags.bits());
    }

    fn disable_interrupts(&mut self, flags: IntenFlags) {
        self.regs.write32(INTENCLR, flags.bits());
    }

    fn enabled_interrupts(&self) -> IntenFlags {
        IntenFlags::from_bits_truncate(self.regs.read32(INTENSET))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mmio::FakeMmio;

    #[test]
    fn test_tasks_write_one() {
        let mut rtc = Nrf52Rtc::new(FakeMmio::new());
        rtc.stop();
        rtc.clear();
        rtc.start();
        assert_eq!(
            rtc.registers().writes(),
            vec![(0x004, 1), (0x008, 1), (0x000, 1)]
        );
    }

    #[test]
    fn test_compare_and_event_offsets() {
        let mut rtc = Nrf52Rtc::new(FakeMmio::new());
        rtc.set_compare(CompareChannel::Channel0, 327);
        rtc.set_compare(CompareChannel::Channel1, 0x0100_0258);
        rtc.clear_event(CompareChannel::Channel1);

        assert_eq!(
            rtc.registers().writes(),
            vec![(0x540, 327), (0x544, 0x258), (0x144, 0)]
        );
    }

    #[test]
    fn test_interrupt_words() {
        let mut rtc = Nrf52Rtc::new(FakeMmio::new());
        rtc.enable_interrupts(IntenFlags::COMPARE0);
        rtc.disable_interrupts(IntenFlags::COMPARE1);
        assert_eq!(
            rtc.registers().writes(),
            vec![(0x304, 0x0001_0000), (0x308, 0x0002_0000)]
        );
    }

    #[test]
    fn test_reads_decode_registers() {
        let io = FakeMmio::new();
        io.preset(0x504, 0xFF12_3456);
        io.preset(0x140, 1);
        io.preset(0x304, 0x0003_0000 | 0x8000_0000);
        let rtc = Nrf52Rtc::new(io);

        assert_eq!(rtc.counter(), 0x12_3456);
        assert!(rtc.event_pending(CompareChannel::Channel0));
        assert!(!rtc.event_pending(CompareChannel::Channel1));
        assert_eq!(
            rtc.enabled_interrupts(),
            IntenFlags::COMPARE0 | IntenFlags::COMPARE1
        );
        assert!(rtc.interrupt_enabled(CompareChannel::Channel1));
    }

    #[test]
    fn test_prescaler_word() {
        let mut rtc = Nrf52Rtc::new(FakeMmio::new());
        rtc.set_prescaler(Prescaler::new(4095).unwrap());
        assert_eq!(rtc.registers().writes(), vec![(0x508, 4095)]);
    }
}
