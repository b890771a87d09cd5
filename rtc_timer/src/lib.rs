//! # RTC Kernel Timer
//!
//! Software time base and deferred-wake facility for a small real-time
//! kernel, built on a narrow free-running counter with two compare
//! channels.
//!
//! ## What It Provides
//!
//! - **Tick base**: a 64-bit millisecond count, extended from the 24-bit
//!   hardware counter one period at a time
//! - **Periodic timer**: compare channel 0, re-armed every period, driving
//!   the scheduler tick
//! - **Deferred wake**: compare channel 1, a one-shot that signals a
//!   kernel event
//! - **Interrupt dispatcher**: services both channels and reports whether
//!   the scheduler should run
//!
//! ## Philosophy
//!
//! **Time is a service, not a global variable.**
//!
//! The kernel owns one [`TimerSubsystem`] and hands references to the
//! interrupt vector and to its consumers. Hardware sits behind the `hal`
//! traits, so the whole subsystem runs deterministically against
//! `sim_kernel` in tests.
//!
//! ## Not Supported
//!
//! - More than one outstanding deferred wake
//! - Delays of a full counter period or longer
//! - Sharing the counter between cores

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod critical;
pub mod deferred;
mod dispatcher;
pub mod error;
mod periodic;
mod subsystem;
pub mod tick_base;

#[cfg(test)]
mod testing;

pub use config::{RtcSettings, TimerConfig, DEFAULT_TIMER_IRQ};
pub use critical::CriticalSection;
pub use deferred::DeferredWake;
pub use error::{Result, TimerError};
pub use subsystem::TimerSubsystem;
pub use tick_base::TickCounter;
