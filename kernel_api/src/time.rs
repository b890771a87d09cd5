//! Time abstractions

use core::ops::{Add, Sub};
use serde::{Deserialize, Serialize};

/// Milliseconds since the kernel time base started
///
/// This is an opaque monotonic value, not wall-clock time.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Millis(u64);

impl Millis {
    /// Zero milliseconds
    pub const ZERO: Millis = Millis(0);

    /// Creates a value from milliseconds
    pub const fn new(millis: u64) -> Self {
        Self(millis)
    }

    /// Returns the value in milliseconds
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Converts to microseconds
    ///
    /// No precision is gained: the result is always a multiple of 1000.
    pub const fn to_micros(self) -> Micros {
        Micros(self.0.saturating_mul(1_000))
    }

    /// Returns the time elapsed since an earlier value
    pub const fn since(self, earlier: Millis) -> Millis {
        Millis(self.0.saturating_sub(earlier.0))
    }
}

impl Add for Millis {
    type Output = Millis;

    fn add(self, other: Millis) -> Self::Output {
        Millis(self.0 + other.0)
    }
}

impl Sub for Millis {
    type Output = Millis;

    fn sub(self, other: Millis) -> Self::Output {
        self.since(other)
    }
}

impl From<Millis> for u64 {
    fn from(value: Millis) -> Self {
        value.0
    }
}

/// Microseconds since the kernel time base started
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Micros(u64);

impl Micros {
    /// Creates a value from microseconds
    pub const fn new(micros: u64) -> Self {
        Self(micros)
    }

    /// Returns the value in microseconds
    pub const fn as_micros(self) -> u64 {
        self.0
    }

    /// Truncates to milliseconds
    pub const fn to_millis(self) -> Millis {
        Millis(self.0 / 1_000)
    }
}

impl From<Micros> for u64 {
    fn from(value: Micros) -> Self {
        value.0
    }
}
