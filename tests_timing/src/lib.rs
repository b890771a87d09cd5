//! Timing Test Utilities
//!
//! Shared helpers for the timer integration tests.
//!
//! ## Test Philosophy
//!
//! - **Deterministic time**: the counter only moves when a test ticks it
//! - **Hardware-shaped interrupts**: the handler is entered the way a
//!   level-triggered line would enter it, never called directly
//! - **Observable effects**: register writes, signals and reschedule
//!   requests are all recorded and asserted on

use kernel_api::{HandlerReturn, Millis, TickHandler};
use rtc_timer::{RtcSettings, TimerSubsystem};
use sim_kernel::{SimBoard, SimClock, SimEpilogue, SimInterrupts, SimRtc};
use spin::Mutex;

/// Timer subsystem over the simulated board
pub type SimTimer<'k> = TimerSubsystem<'k, SimRtc, SimClock, SimInterrupts, SimEpilogue>;

/// Test-side handles onto the simulated devices
pub struct Rig {
    pub board: SimBoard,
    pub clock: SimClock,
    pub epilogue: SimEpilogue,
}

impl Rig {
    /// Runs the counter for `ticks`, entering the timer's handler
    /// whenever its line asserts
    ///
    /// Returns the number of handler entries.
    pub fn run(&self, timer: &SimTimer<'_>, ticks: u32) -> usize {
        self.board.run_ticks(ticks, || {
            timer.handle_interrupt();
        })
    }
}

/// Bootstrap helper for tests
///
/// Creates an unconfigured timer wired to a fresh simulated board.
pub fn test_bootstrap<'k>(settings: RtcSettings) -> (SimTimer<'k>, Rig) {
    let rtc = SimRtc::new();
    let clock = SimClock::new();
    let interrupts = SimInterrupts::new();
    let epilogue = SimEpilogue::new();

    let timer = TimerSubsystem::new(
        settings,
        rtc.clone(),
        clock.clone(),
        interrupts.clone(),
        epilogue.clone(),
    );
    let rig = Rig {
        board: SimBoard::new(rtc, interrupts, settings.irq),
        clock,
        epilogue,
    };
    (timer, rig)
}

/// Periodic handler that records every time it is called with
#[derive(Debug, Default)]
pub struct TickLog {
    seen: Mutex<Vec<Millis>>,
    reschedule: bool,
}

impl TickLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log whose handler asks for a reschedule on every tick
    pub fn rescheduling() -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            reschedule: true,
        }
    }

    pub fn times(&self) -> Vec<Millis> {
        self.seen.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.seen.lock().len()
    }
}

impl TickHandler for TickLog {
    fn on_tick(&self, now: Millis) -> HandlerReturn {
        self.seen.lock().push(now);
        HandlerReturn::from(self.reschedule)
    }
}
