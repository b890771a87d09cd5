//! Simulated low-frequency clock

use hal::{ClockControl, LfClockSource};
use spin::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct ClockState {
    source: Option<LfClockSource>,
    starts: usize,
}

/// Simulated clock controller
///
/// Records the selected source and how many start requests were made.
/// Clones share the same controller.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    state: Arc<Mutex<ClockState>>,
}

impl SimClock {
    /// Creates a clock controller with the clock stopped
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of start requests
    pub fn starts(&self) -> usize {
        self.state.lock().starts
    }
}

impl ClockControl for SimClock {
    fn start_low_frequency_clock(&mut self, source: LfClockSource) {
        let mut state = self.state.lock();
        state.source = Some(source);
        state.starts += 1;
    }

    fn low_frequency_source(&self) -> Option<LfClockSource> {
        self.state.lock().source
    }
}
