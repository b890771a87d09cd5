//! Periodic Tick Integration Tests
//!
//! These tests drive the periodic timer through the simulated board:
//! - Increment derivation from the board rate
//! - Time advancing one interval per compare match
//! - Handler invocation and reschedule propagation
//! - Reconfiguration without time going backwards

use hal::{CompareChannel, Prescaler, RtcRegisters};
use kernel_api::{Micros, Millis};
use rtc_timer::{RtcSettings, TimerError};
use tests_timing::{test_bootstrap, TickLog};

#[test]
fn test_ten_ms_tick_at_lfclk() {
    let (timer, rig) = test_bootstrap(RtcSettings::default());

    let config = timer.set_periodic_timer(None, 10).unwrap();
    assert_eq!(config.tick_rate, 32768);
    assert_eq!(config.tick_increment, 327);
    assert_eq!(config.tick_increment_us, 9979);
    assert_eq!(config.tick_interval_ms, 10);

    // 100 compare matches
    let entries = rig.run(&timer, 100 * 327);
    assert_eq!(entries, 100);
    assert_eq!(timer.current_time(), Millis::new(1000));
    assert_eq!(timer.current_time_hires(), Micros::new(1_000_000));
}

#[test]
fn test_time_only_moves_on_compare_match() {
    let (timer, rig) = test_bootstrap(RtcSettings::default());
    timer.set_periodic_timer(None, 10).unwrap();

    rig.run(&timer, 326);
    assert_eq!(timer.current_time(), Millis::ZERO);

    rig.run(&timer, 1);
    assert_eq!(timer.current_time(), Millis::new(10));

    rig.run(&timer, 326);
    assert_eq!(timer.current_time(), Millis::new(10));
}

#[test]
fn test_handler_called_with_each_new_time() {
    let log = TickLog::new();
    let (timer, rig) = test_bootstrap(RtcSettings::default());
    timer.set_periodic_timer(Some(&log), 10).unwrap();

    rig.run(&timer, 5 * 327);

    let expected: Vec<Millis> = (1..=5).map(|n| Millis::new(n * 10)).collect();
    assert_eq!(log.times(), expected);
    // No handler request and no wake: nothing to reschedule
    assert_eq!(rig.epilogue.reschedules(), 0);
    assert_eq!(rig.epilogue.entries(), 5);
}

#[test]
fn test_handler_reschedule_reaches_epilogue() {
    let log = TickLog::rescheduling();
    let (timer, rig) = test_bootstrap(RtcSettings::default());
    timer.set_periodic_timer(Some(&log), 10).unwrap();

    rig.run(&timer, 3 * 327);

    assert_eq!(log.count(), 3);
    assert_eq!(rig.epilogue.exits(), vec![true, true, true]);
}

#[test]
fn test_compare_advances_from_previous_match() {
    let (timer, rig) = test_bootstrap(RtcSettings::default());
    timer.set_periodic_timer(None, 10).unwrap();

    rig.run(&timer, 3 * 327);
    assert_eq!(rig.board.rtc().compare(CompareChannel::Channel0), 4 * 327);
}

#[test]
fn test_prescaled_counter_rate() {
    let settings = RtcSettings::default().with_prescaler(Prescaler::new(31).unwrap());
    let (timer, rig) = test_bootstrap(settings);

    let config = timer.set_periodic_timer(None, 100).unwrap();
    assert_eq!(config.tick_rate, 1024);
    assert_eq!(config.tick_increment, 102);
    assert_eq!(rig.board.rtc().prescaler(), 31);

    rig.run(&timer, 10 * 102);
    assert_eq!(timer.current_time(), Millis::new(1000));
}

#[test]
fn test_reconfigure_keeps_time_monotonic() {
    let log = TickLog::new();
    let (timer, rig) = test_bootstrap(RtcSettings::default());
    timer.set_periodic_timer(None, 10).unwrap();
    rig.run(&timer, 3 * 327);
    let before = timer.current_time();
    assert_eq!(before, Millis::new(30));

    timer.set_periodic_timer(Some(&log), 100).unwrap();
    assert_eq!(timer.current_time(), before);
    assert_eq!(rig.clock.starts(), 2);

    rig.run(&timer, 3276);
    assert_eq!(timer.current_time(), Millis::new(130));
    assert_eq!(log.times(), vec![Millis::new(130)]);
}

#[test]
fn test_rejected_intervals_leave_hardware_untouched() {
    let (timer, rig) = test_bootstrap(RtcSettings::default());

    assert_eq!(
        timer.set_periodic_timer(None, 0),
        Err(TimerError::InvalidInterval { interval_ms: 0 })
    );
    assert_eq!(
        timer.set_periodic_timer(None, 1001),
        Err(TimerError::InvalidInterval { interval_ms: 1001 })
    );
    assert!(rig.board.rtc().ops().is_empty());
    assert_eq!(rig.clock.starts(), 0);
    assert!(timer.config().is_none());
}

#[test]
fn test_slow_counter_cannot_resolve_interval() {
    let settings = RtcSettings::default().with_tick_rate(500);
    let (timer, _rig) = test_bootstrap(settings);

    assert_eq!(
        timer.set_periodic_timer(None, 1),
        Err(TimerError::IncrementOutOfRange {
            interval_ms: 1,
            increment: 0,
        })
    );
}
