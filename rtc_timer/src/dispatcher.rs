//! # Interrupt Dispatcher
//!
//! The counter's interrupt handler. One entry services whichever compare
//! channels have latched events:
//!
//! 1. Channel 0: acknowledge, move the compare value on by whole periods
//!    until it is ahead of the counter, advance the tick base by the same
//!    number of periods, then run the periodic handler with the new time.
//!    The handler may ask for a reschedule.
//! 2. Channel 1, if its interrupt is enabled: acknowledge, disable the
//!    interrupt, signal the pending wake's event and ask for a reschedule.
//! 3. Leave through the kernel epilogue with the combined request.
//!
//! The channel-0 compare value is advanced from its previous value, not
//! from the current counter, so the tick rate holds even when an entry
//! is serviced late. An entry serviced more than a period late accounts
//! for every period that passed and places the next match ahead of the
//! counter; otherwise the next match would be a full counter wrap away.
//! Every latched event that raised the interrupt is acknowledged before
//! the epilogue runs.

use crate::subsystem::{TimerState, TimerSubsystem};
use hal::{
    compare_reachable, counter_add, counter_distance, ClockControl, CompareChannel, IntenFlags,
    InterruptController, RtcRegisters,
};
use kernel_api::{HandlerReturn, IrqEpilogue};

impl<'k, R, C, I, K> TimerSubsystem<'k, R, C, I, K>
where
    R: RtcRegisters,
    C: ClockControl,
    I: InterruptController,
    K: IrqEpilogue,
{
    /// Services the counter interrupt
    ///
    /// Called from the interrupt vector only. Returns the reschedule
    /// decision that was passed to `irq_exit`.
    ///
    /// # Panics
    ///
    /// Panics if channel 1 fires with no wake registered. `arm_timeout`
    /// and reconfiguration keep the slot and the channel-1 interrupt in
    /// step, so this is a broken invariant rather than a lost event.
    pub fn handle_interrupt(&self) -> HandlerReturn {
        self.kernel.irq_entry();
        let mut reschedule = false;

        let (tick_handler, wake) = {
            let mut state = self.lock_from_isr();
            let TimerState {
                rtc,
                config,
                handler,
                wake,
                ..
            } = &mut *state;

            let mut tick_handler = None;
            if rtc.event_pending(CompareChannel::Channel0) {
                rtc.clear_event(CompareChannel::Channel0);
                if let Some(config) = config {
                    let (next, periods) = next_period(
                        rtc.compare(CompareChannel::Channel0),
                        rtc.counter(),
                        config.tick_increment,
                    );
                    rtc.set_compare(CompareChannel::Channel0, next);
                    if periods > 1 {
                        log::trace!("periodic tick serviced {} periods late", periods - 1);
                    }
                    self.ticks
                        .advance(u64::from(periods) * u64::from(config.tick_interval_ms));
                    tick_handler = *handler;
                }
            }

            let mut fired = None;
            if rtc.event_pending(CompareChannel::Channel1)
                && rtc.interrupt_enabled(CompareChannel::Channel1)
            {
                rtc.clear_event(CompareChannel::Channel1);
                rtc.disable_interrupts(IntenFlags::COMPARE1);
                let Some(pending) = wake.take() else {
                    panic!("compare channel 1 fired with no deferred wake registered");
                };
                fired = Some(pending);
            }

            (tick_handler, fired)
        };

        if let Some(tick_handler) = tick_handler {
            let now = self.current_time();
            if tick_handler.on_tick(now).is_reschedule() {
                reschedule = true;
            }
        }

        if let Some(wake) = wake {
            log::trace!("deferred wake at {} fired", wake.target());
            wake.event().signal();
            reschedule = true;
        }

        self.kernel.irq_exit(reschedule);
        HandlerReturn::from(reschedule)
    }
}

/// Next channel-0 compare value after a match at `matched`, with the
/// counter now at `now`
///
/// Returns the value and the number of periods it lies past `matched`.
fn next_period(matched: u32, now: u32, increment: u32) -> (u32, u32) {
    let elapsed = counter_distance(matched, now);
    let mut periods = elapsed / increment + 1;
    let mut next = counter_add(matched, periods * increment);
    while !compare_reachable(now, next) {
        next = counter_add(next, increment);
        periods += 1;
    }
    (next, periods)
}

#[cfg(test)]
mod tests {
    use super::next_period;
    use crate::testing::rig;
    use hal::{CompareChannel, IntenFlags, InterruptController, RtcRegisters, COUNTER_MASK};
    use kernel_api::{HandlerReturn, Millis};
    use sim_kernel::{SimEvent, SimRtc};
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn test_tick_advances_time_and_rearms() {
        let (timer, sim) = rig();
        timer.set_periodic_timer(None, 10).unwrap();

        sim.board.run_ticks(327, || {
            timer.handle_interrupt();
        });

        assert_eq!(timer.current_time(), Millis::new(10));
        assert_eq!(sim.board.rtc().compare(CompareChannel::Channel0), 654);
        assert!(!sim.board.rtc().event_pending(CompareChannel::Channel0));
    }

    #[test]
    fn test_handler_sees_advanced_time() {
        let seen = AtomicU64::new(u64::MAX);
        let handler = |now: Millis| {
            seen.store(now.as_millis(), Ordering::SeqCst);
            HandlerReturn::NoReschedule
        };
        let (timer, sim) = rig();
        timer.set_periodic_timer(Some(&handler), 10).unwrap();

        sim.board.run_ticks(327, || {
            timer.handle_interrupt();
        });
        assert_eq!(seen.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_handler_reschedule_is_reported() {
        let handler = |_now: Millis| HandlerReturn::Reschedule;
        let (timer, sim) = rig();
        timer.set_periodic_timer(Some(&handler), 10).unwrap();

        sim.board.rtc().advance(327);
        assert_eq!(timer.handle_interrupt(), HandlerReturn::Reschedule);
        assert_eq!(sim.epilogue.exits(), vec![true]);
    }

    #[test]
    fn test_no_handler_no_reschedule() {
        let (timer, sim) = rig();
        timer.set_periodic_timer(None, 10).unwrap();

        sim.board.rtc().advance(327);
        assert_eq!(timer.handle_interrupt(), HandlerReturn::NoReschedule);
        assert_eq!(sim.epilogue.exits(), vec![false]);
        assert_eq!(sim.epilogue.entries(), 1);
    }

    #[test]
    fn test_late_service_keeps_period() {
        let (timer, sim) = rig();
        timer.set_periodic_timer(None, 10).unwrap();

        // Serviced 50 ticks late: next compare is still one period on.
        sim.board.rtc().advance(377);
        timer.handle_interrupt();
        assert_eq!(sim.board.rtc().compare(CompareChannel::Channel0), 654);
    }

    #[test]
    fn test_next_period_on_time() {
        assert_eq!(next_period(327, 327, 327), (654, 1));
        assert_eq!(next_period(327, 377, 327), (654, 1));
    }

    #[test]
    fn test_next_period_skips_missed_periods() {
        // Counter already past the following match
        assert_eq!(next_period(327, 700, 327), (981, 2));
        assert_eq!(next_period(327, 654, 327), (981, 2));
        assert_eq!(next_period(327, 327 * 10 + 5, 327), (327 * 11, 10));
    }

    #[test]
    fn test_next_period_keeps_compare_lead() {
        // One tick short of the next match: that match may not fire
        assert_eq!(next_period(327, 653, 327), (981, 2));
        assert_eq!(next_period(10, 11, 1), (13, 3));
    }

    #[test]
    fn test_next_period_across_wrap() {
        let matched = COUNTER_MASK - 100;
        assert_eq!(next_period(matched, 500, 327), (553, 2));
    }

    #[test]
    fn test_masked_past_several_periods_keeps_ticking() {
        let (timer, sim) = rig();
        timer.set_periodic_timer(None, 10).unwrap();

        let were_enabled = sim.board.interrupts().mask_all();
        sim.board.run_ticks(700, || {
            timer.handle_interrupt();
        });
        assert_eq!(timer.current_time(), Millis::ZERO);

        sim.board.interrupts().restore(were_enabled);
        sim.board.service(|| {
            timer.handle_interrupt();
        });
        assert_eq!(timer.current_time(), Millis::new(20));
        assert_eq!(sim.board.rtc().compare(CompareChannel::Channel0), 981);

        sim.board.run_ticks(327 * 10, || {
            timer.handle_interrupt();
        });
        assert_eq!(timer.current_time(), Millis::new(120));
    }

    #[test]
    fn test_deferred_wake_fires_once_and_disables() {
        let event = SimEvent::new();
        let (timer, sim) = rig();
        timer.set_periodic_timer(None, 100).unwrap();
        timer.arm_timeout(&event, 50).unwrap();

        sim.board.run_ticks(50, || {
            timer.handle_interrupt();
        });

        assert_eq!(event.signal_count(), 1);
        assert!(!sim
            .board
            .rtc()
            .enabled_interrupts()
            .contains(IntenFlags::COMPARE1));
        assert_eq!(sim.epilogue.exits(), vec![true]);
        assert_eq!(timer.pending_wake(), None);
    }

    #[test]
    fn test_both_channels_in_one_entry() {
        let event = SimEvent::new();
        let (timer, sim) = rig();
        timer.set_periodic_timer(None, 10).unwrap();
        timer.arm_timeout(&event, 327).unwrap();

        let entries = sim.board.run_ticks(327, || {
            timer.handle_interrupt();
        });

        assert_eq!(entries, 1);
        assert_eq!(event.signal_count(), 1);
        assert_eq!(timer.current_time(), Millis::new(10));
    }

    #[test]
    fn test_wake_entry_does_not_advance_time() {
        let event = SimEvent::new();
        let (timer, sim) = rig();
        timer.set_periodic_timer(None, 10).unwrap();
        timer.arm_timeout(&event, 100).unwrap();

        sim.board.run_ticks(100, || {
            timer.handle_interrupt();
        });
        assert!(event.is_signaled());
        assert_eq!(timer.current_time(), Millis::ZERO);
    }

    #[test]
    fn test_disabled_channel_one_event_is_ignored() {
        let (timer, sim) = rig();
        timer.set_periodic_timer(None, 10).unwrap();
        sim.board.rtc().latch_event(CompareChannel::Channel1);
        sim.board.rtc().advance(327);

        assert_eq!(timer.handle_interrupt(), HandlerReturn::NoReschedule);
        assert!(sim.board.rtc().event_pending(CompareChannel::Channel1));
    }

    #[test]
    #[should_panic(expected = "no deferred wake registered")]
    fn test_channel_one_without_registration_panics() {
        let (timer, sim) = rig();
        timer.set_periodic_timer(None, 10).unwrap();

        let mut rtc: SimRtc = sim.board.rtc().clone();
        rtc.enable_interrupts(IntenFlags::COMPARE1);
        rtc.latch_event(CompareChannel::Channel1);
        timer.handle_interrupt();
    }
}
