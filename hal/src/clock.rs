//! Clock source abstraction
//!
//! The counter peripheral is fed by a low-frequency clock that must be
//! running before the counter is started.

use serde::{Deserialize, Serialize};

/// Source for the low-frequency clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LfClockSource {
    /// Internal RC oscillator
    Rc,
    /// External 32.768 kHz crystal
    #[default]
    Xtal,
    /// Synthesized from the high-frequency clock
    Synth,
}

/// Clock control trait
pub trait ClockControl {
    /// Selects `source` and starts the low-frequency clock
    ///
    /// Starting an already running clock is harmless.
    fn start_low_frequency_clock(&mut self, source: LfClockSource);

    /// Returns the source the low-frequency clock was last started from
    fn low_frequency_source(&self) -> Option<LfClockSource>;
}
