//! # Kernel API
//!
//! This crate defines the interface between kernel subsystems and the
//! kernel core: the primitives a driver may call from interrupt context,
//! and the time types the scheduler consumes.
//!
//! ## Philosophy
//!
//! The kernel provides **mechanisms**, not policies:
//! - Event signalling (not ad hoc wakeup flags)
//! - An interrupt epilogue (not implicit rescheduling)
//! - Time as typed values (not bare integers)
//!
//! ## Design Goals
//!
//! 1. **Testability**: Every primitive can be simulated
//! 2. **Explicitness**: Reschedule requests are returned, never hidden
//! 3. **Type safety**: Milliseconds and microseconds do not mix

#![cfg_attr(not(test), no_std)]

pub mod event;
pub mod time;

pub use event::{HandlerReturn, IrqEpilogue, TickHandler, WaitEvent};
pub use time::{Micros, Millis};
