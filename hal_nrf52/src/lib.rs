//! # nRF52 Hardware Abstraction Layer
//!
//! Implements the HAL traits for the nRF52 family.
//!
//! ## Scope
//!
//! Only the peripherals the kernel time base needs: RTC1, the
//! low-frequency half of CLOCK, and the Cortex-M interrupt controller.
//! Every driver is generic over [`Mmio`] so host tests can run it
//! against a memory-backed register block.

#![cfg_attr(not(test), no_std)]

pub mod clock;
pub mod mmio;
pub mod nvic;
pub mod rtc;

pub use clock::Nrf52Clock;
pub use mmio::{Mmio, RealMmio};
pub use nvic::Nrf52Interrupts;
pub use rtc::Nrf52Rtc;

use hal::IrqNumber;

/// RTC1 register block
pub const RTC1_BASE: usize = 0x4001_1000;

/// CLOCK register block
pub const CLOCK_BASE: usize = 0x4000_0000;

/// System control space, where the NVIC registers live
pub const NVIC_BASE: usize = 0xE000_E000;

/// RTC1 interrupt line
pub const RTC1_IRQ: IrqNumber = IrqNumber(17);

/// Peripherals for the kernel time base on real hardware
pub struct TimerPeripherals {
    pub rtc: Nrf52Rtc<RealMmio>,
    pub clock: Nrf52Clock<RealMmio>,
    pub interrupts: Nrf52Interrupts<RealMmio>,
}

impl TimerPeripherals {
    /// Claims RTC1, CLOCK and the NVIC
    ///
    /// # Safety
    ///
    /// Must run on an nRF52, at most once, and nothing else may drive
    /// these register blocks afterwards.
    pub unsafe fn take() -> Self {
        Self {
            rtc: Nrf52Rtc::new(RealMmio::new(RTC1_BASE)),
            clock: Nrf52Clock::new(RealMmio::new(CLOCK_BASE)),
            interrupts: Nrf52Interrupts::new(RealMmio::new(NVIC_BASE)),
        }
    }
}
