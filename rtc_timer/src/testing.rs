//! Simulated rig for unit tests

use crate::config::RtcSettings;
use crate::subsystem::TimerSubsystem;
use sim_kernel::{SimBoard, SimClock, SimEpilogue, SimInterrupts, SimRtc};

pub(crate) type SimTimer<'k> =
    TimerSubsystem<'k, SimRtc, SimClock, SimInterrupts, SimEpilogue>;

/// Test-side handles onto the devices the timer owns
pub(crate) struct Sim {
    pub board: SimBoard,
    pub clock: SimClock,
    pub epilogue: SimEpilogue,
}

pub(crate) fn rig<'k>() -> (SimTimer<'k>, Sim) {
    let settings = RtcSettings::default();
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
    let sim = Sim {
        board: SimBoard::new(rtc, interrupts, settings.irq),
        clock,
        epilogue,
    };
    (timer, sim)
}
