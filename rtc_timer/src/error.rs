//! Timer error types

use hal::RtcError;
use thiserror::Error;

/// Errors returned by the timer subsystem
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    /// Interval is zero or longer than one second
    #[error("Invalid periodic interval: {interval_ms} ms")]
    InvalidInterval { interval_ms: u32 },

    /// Derived compare increment is zero or exceeds the counter width
    #[error("Tick increment {increment} out of range for a {interval_ms} ms interval")]
    IncrementOutOfRange { interval_ms: u32, increment: u32 },

    /// Deferred wake requested before the periodic timer was started
    #[error("Periodic timer not configured")]
    NotConfigured,

    /// Delay is too short to be matched reliably, or not shorter than one
    /// counter period
    #[error("Delay of {delay_ticks} ticks out of range")]
    DelayOutOfRange { delay_ticks: u32 },

    /// Board settings rejected by the register model
    #[error(transparent)]
    Rtc(#[from] RtcError),
}

/// Result type for timer operations
pub type Result<T> = core::result::Result<T, TimerError>;
