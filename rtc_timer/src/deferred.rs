//! # Deferred Wake Controller
//!
//! One-shot wakeups on compare channel 1.
//!
//! There is a single slot. Arming while a wake is pending replaces it;
//! the displaced registration is handed back to the caller, which is the
//! only notice its waiter gets. The interrupt handler disables channel 1
//! when it fires, so a wake never repeats.
//!
//! Delays are in counter ticks and must be shorter than one counter
//! period, since the compare target wraps with the counter.

use crate::critical::CriticalSection;
use crate::error::{Result, TimerError};
use crate::subsystem::{TimerState, TimerSubsystem};
use core::fmt;
use hal::{
    counter_add, ClockControl, CompareChannel, IntenFlags, InterruptController, RtcRegisters,
    COUNTER_MASK, MIN_COMPARE_LEAD,
};
use kernel_api::{IrqEpilogue, WaitEvent};

/// A pending one-shot wake
///
/// Borrows the event; the caller of `arm_timeout` keeps ownership and
/// must keep it alive until it fires or is displaced.
#[derive(Clone, Copy)]
pub struct DeferredWake<'k> {
    event: &'k dyn WaitEvent,
    target: u32,
}

impl<'k> DeferredWake<'k> {
    /// Returns the event this wake signals
    pub fn event(&self) -> &'k dyn WaitEvent {
        self.event
    }

    /// Returns the counter value the wake fires at
    pub fn target(&self) -> u32 {
        self.target
    }

    /// Returns true if this wake signals `event`
    pub fn is_for(&self, event: &dyn WaitEvent) -> bool {
        core::ptr::eq(
            self.event as *const dyn WaitEvent as *const (),
            event as *const dyn WaitEvent as *const (),
        )
    }
}

impl fmt::Debug for DeferredWake<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredWake")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl<'k, R, C, I, K> TimerSubsystem<'k, R, C, I, K>
where
    R: RtcRegisters,
    C: ClockControl,
    I: InterruptController,
    K: IrqEpilogue,
{
    /// Signals `event` once, `delay_ticks` counter ticks from now
    ///
    /// Returns the wake this call displaced, if one was still pending.
    /// The displaced event will not be signaled by the timer.
    ///
    /// # Errors
    ///
    /// - `DelayOutOfRange` if `delay_ticks` is below [`MIN_COMPARE_LEAD`]
    ///   or not shorter than one counter period
    /// - `NotConfigured` if the periodic timer has not been started (the
    ///   counter would never reach the target)
    pub fn arm_timeout(
        &self,
        event: &'k dyn WaitEvent,
        delay_ticks: u32,
    ) -> Result<Option<DeferredWake<'k>>> {
        if delay_ticks < MIN_COMPARE_LEAD || delay_ticks > COUNTER_MASK {
            return Err(TimerError::DelayOutOfRange { delay_ticks });
        }

        let _cs = CriticalSection::enter(&self.interrupts);
        let mut state = self.state.lock();
        let TimerState {
            rtc, config, wake, ..
        } = &mut *state;

        if config.is_none() {
            return Err(TimerError::NotConfigured);
        }

        let now = rtc.counter();
        let target = counter_add(now, delay_ticks);
        let displaced = wake.replace(DeferredWake { event, target });

        rtc.set_compare(CompareChannel::Channel1, target);
        rtc.clear_event(CompareChannel::Channel1);
        rtc.enable_interrupts(IntenFlags::COMPARE1);

        match displaced {
            Some(previous) => log::warn!(
                "deferred wake at {} displaced by new wake at {}",
                previous.target(),
                target
            ),
            None => log::debug!("deferred wake armed: counter {} -> {}", now, target),
        }

        Ok(displaced)
    }
}
