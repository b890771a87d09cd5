//! # Timer Subsystem
//!
//! The single owner of the counter peripheral and of all timer state.
//!
//! ## Contexts
//!
//! A `TimerSubsystem` is shared between thread context (the scheduler
//! reading the time, drivers arming timeouts) and the counter's interrupt
//! handler. State is split by who writes it:
//!
//! - The tick base is written only by the interrupt handler and read
//!   lock-free from anywhere
//! - Everything else (registers, configuration, periodic handler, pending
//!   wake) sits behind a spin lock. Thread-context code takes that lock
//!   only inside a [`CriticalSection`], so on a single core the interrupt
//!   handler always finds it free
//!
//! The lock is never held while calling out to the periodic handler or
//! signalling an event, so both may call back into the subsystem.

use crate::config::{RtcSettings, TimerConfig};
use crate::critical::CriticalSection;
use crate::deferred::DeferredWake;
use crate::tick_base::TickCounter;
use hal::{ClockControl, InterruptController, RtcRegisters};
use kernel_api::{IrqEpilogue, Micros, Millis, TickHandler};
use spin::{Mutex, MutexGuard};

/// State shared between thread context and the interrupt handler
pub(crate) struct TimerState<'k, R, C> {
    pub(crate) rtc: R,
    pub(crate) clock: C,
    pub(crate) config: Option<TimerConfig>,
    pub(crate) handler: Option<&'k dyn TickHandler>,
    pub(crate) wake: Option<DeferredWake<'k>>,
}

/// Kernel time base and deferred-wake facility over one counter peripheral
///
/// `'k` is the lifetime of the periodic handler and of any event armed
/// through [`TimerSubsystem::arm_timeout`]; the subsystem only borrows
/// them.
///
/// # Examples
///
/// ```
/// use kernel_api::Millis;
/// use rtc_timer::{RtcSettings, TimerSubsystem};
/// use sim_kernel::{SimClock, SimEpilogue, SimInterrupts, SimRtc};
///
/// let timer = TimerSubsystem::new(
///     RtcSettings::default(),
///     SimRtc::new(),
///     SimClock::new(),
///     SimInterrupts::new(),
///     SimEpilogue::new(),
/// );
///
/// let config = timer.set_periodic_timer(None, 10).unwrap();
/// assert_eq!(config.tick_increment, 327);
/// assert_eq!(timer.current_time(), Millis::ZERO);
/// ```
pub struct TimerSubsystem<'k, R, C, I, K>
where
    R: RtcRegisters,
    C: ClockControl,
    I: InterruptController,
    K: IrqEpilogue,
{
    pub(crate) settings: RtcSettings,
    pub(crate) ticks: TickCounter,
    pub(crate) interrupts: I,
    pub(crate) kernel: K,
    pub(crate) state: Mutex<TimerState<'k, R, C>>,
}

impl<'k, R, C, I, K> TimerSubsystem<'k, R, C, I, K>
where
    R: RtcRegisters,
    C: ClockControl,
    I: InterruptController,
    K: IrqEpilogue,
{
    /// Creates an unconfigured subsystem
    ///
    /// Nothing is written to the hardware until `set_periodic_timer`.
    pub fn new(settings: RtcSettings, rtc: R, clock: C, interrupts: I, kernel: K) -> Self {
        Self {
            settings,
            ticks: TickCounter::new(),
            interrupts,
            kernel,
            state: Mutex::new(TimerState {
                rtc,
                clock,
                config: None,
                handler: None,
                wake: None,
            }),
        }
    }

    /// Returns the board settings
    pub fn settings(&self) -> &RtcSettings {
        &self.settings
    }

    /// Returns the current time in milliseconds
    ///
    /// Safe to call from any context; never observes a half-updated value.
    pub fn current_time(&self) -> Millis {
        Millis::new(self.ticks.read())
    }

    /// Returns the current time in microseconds
    ///
    /// Resolution is still one periodic tick.
    pub fn current_time_hires(&self) -> Micros {
        self.current_time().to_micros()
    }

    /// Returns the active periodic configuration, if any
    pub fn config(&self) -> Option<TimerConfig> {
        let _cs = CriticalSection::enter(&self.interrupts);
        self.state.lock().config
    }

    /// Returns the counter value a pending deferred wake will fire at
    pub fn pending_wake(&self) -> Option<u32> {
        let _cs = CriticalSection::enter(&self.interrupts);
        self.state.lock().wake.map(|wake| wake.target())
    }

    /// Locks the shared state from the interrupt handler
    ///
    /// # Panics
    ///
    /// Panics if the lock is held, which means thread-context code took
    /// it without masking interrupts; spinning here would never end.
    pub(crate) fn lock_from_isr(&self) -> MutexGuard<'_, TimerState<'k, R, C>> {
        match self.state.try_lock() {
            Some(state) => state,
            None => panic!("timer state locked outside a critical section"),
        }
    }
}
