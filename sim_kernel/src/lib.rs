//! # Simulated Kernel
//!
//! This crate provides simulated implementations of the HAL traits and
//! kernel primitives the timer subsystem depends on.
//!
//! ## Purpose
//!
//! The simulation allows testing interrupt-driven code without hardware:
//! - Runs under `cargo test`
//! - Deterministic (time only moves when a test advances the counter)
//! - Inspectable (register writes, signals and epilogue calls are recorded)
//!
//! ## Philosophy
//!
//! **Testability is a first-class design constraint.**
//!
//! This is not a mock that replays expectations. `SimRtc` follows the
//! peripheral's rules: events latch on compare match, stay set until
//! acknowledged, and assert the interrupt line only while enabled.
//! `SimBoard` turns that line into handler invocations the way the
//! interrupt controller would.
//!
//! Every simulated device is a cheap handle onto shared state, so a test
//! can keep one clone while the code under test owns another.

pub mod board;
pub mod clock;
pub mod event;
pub mod interrupts;
pub mod timer;

pub use board::SimBoard;
pub use clock::SimClock;
pub use event::{SimEpilogue, SimEvent};
pub use interrupts::SimInterrupts;
pub use timer::{RtcOp, SimRtc};
