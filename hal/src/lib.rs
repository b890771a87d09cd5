//! # Hardware Abstraction Layer (HAL)
//!
//! This crate defines the hardware abstraction traits the kernel timer
//! is written against.
//!
//! ## Philosophy
//!
//! **Peripherals are narrow interfaces, not global registers.**
//!
//! Kernel code never pokes a register address directly. It talks to a
//! trait, and a board crate (or the simulator) implements that trait.
//!
//! ## Design Principles
//!
//! 1. **No board-specific assumptions**: Core logic must work on any part
//!    that has a counter with compare channels
//! 2. **Trait-based**: All hardware operations go through traits
//! 3. **Typed registers**: Bit positions and widths live in one place
//! 4. **Testable**: Every trait can be simulated deterministically

#![cfg_attr(not(test), no_std)]

pub mod clock;
pub mod interrupts;
pub mod rtc;

pub use clock::{ClockControl, LfClockSource};
pub use interrupts::{InterruptController, IrqNumber};
pub use rtc::{
    compare_reachable, counter_add, counter_distance, CompareChannel, IntenFlags, Prescaler,
    RtcError, RtcRegisters, COUNTER_BITS, COUNTER_MASK, COUNTER_PERIOD, LFCLK_HZ,
    MIN_COMPARE_LEAD,
};
