//! Periodic timer controller
//!
//! Compare channel 0 is the kernel tick. Setting it up restarts the
//! counter from zero, so it also invalidates any deferred wake armed
//! against the old count.

use crate::config::TimerConfig;
use crate::critical::CriticalSection;
use crate::error::Result;
use crate::subsystem::{TimerState, TimerSubsystem};
use hal::{ClockControl, CompareChannel, IntenFlags, InterruptController, RtcRegisters};
use kernel_api::{IrqEpilogue, TickHandler};

impl<'k, R, C, I, K> TimerSubsystem<'k, R, C, I, K>
where
    R: RtcRegisters,
    C: ClockControl,
    I: InterruptController,
    K: IrqEpilogue,
{
    /// Starts (or restarts) the periodic kernel tick
    ///
    /// `handler` is called from interrupt context once per period with
    /// the already advanced time; `None` keeps only the time base running.
    /// Any pending deferred wake is discarded and will never fire.
    ///
    /// The tick base is not reset: time keeps counting up across
    /// reconfiguration.
    ///
    /// # Errors
    ///
    /// Fails without touching the hardware if `interval_ms` does not
    /// produce a usable compare increment, or if the board prescaler is
    /// out of range.
    pub fn set_periodic_timer(
        &self,
        handler: Option<&'k dyn TickHandler>,
        interval_ms: u32,
    ) -> Result<TimerConfig> {
        let config = TimerConfig::derive(&self.settings, interval_ms)?;
        let prescaler = self.settings.prescaler()?;

        let _cs = CriticalSection::enter(&self.interrupts);
        let mut state = self.state.lock();
        let TimerState {
            rtc,
            clock,
            config: active,
            handler: registered,
            wake,
        } = &mut *state;

        *registered = handler;
        if let Some(discarded) = wake.take() {
            log::warn!(
                "periodic timer reconfigured, dropping deferred wake at {}",
                discarded.target()
            );
        }

        clock.start_low_frequency_clock(self.settings.clock_source);

        rtc.stop();
        rtc.clear();
        rtc.set_prescaler(prescaler);
        rtc.set_compare(CompareChannel::Channel0, config.tick_increment);
        rtc.enable_interrupts(IntenFlags::COMPARE0);
        rtc.clear_event(CompareChannel::Channel0);
        rtc.disable_interrupts(IntenFlags::COMPARE1);
        rtc.clear_event(CompareChannel::Channel1);
        rtc.start();
        self.interrupts.enable_irq(self.settings.irq);

        *active = Some(config);

        log::info!(
            "periodic timer: {} ms at {} Hz, increment {} ticks ({} us)",
            config.tick_interval_ms,
            config.tick_rate,
            config.tick_increment,
            config.tick_increment_us
        );

        Ok(config)
    }
}
