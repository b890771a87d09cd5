//! # Timer Configuration
//!
//! Two layers of configuration:
//!
//! - [`RtcSettings`]: what the board provides (counter rate, prescaler,
//!   interrupt line, clock source). Fixed for the life of the system.
//! - [`TimerConfig`]: what one call to `set_periodic_timer` derived from
//!   those settings and the requested interval.
//!
//! All increments are computed from the configured counter rate; nothing
//! assumes a 32.768 kHz clock except the defaults.

use crate::error::{Result, TimerError};
use hal::{IrqNumber, LfClockSource, Prescaler, RtcError, COUNTER_MASK, LFCLK_HZ};
use serde::{Deserialize, Serialize};

/// Interrupt line of the counter used for the kernel tick (RTC1).
pub const DEFAULT_TIMER_IRQ: IrqNumber = IrqNumber(17);

/// Board-level timer settings
///
/// `tick_rate_hz` is the rate the counter actually advances at, after
/// prescaling. [`RtcSettings::with_prescaler`] keeps the two consistent.
///
/// # Examples
///
/// ```
/// use hal::Prescaler;
/// use rtc_timer::RtcSettings;
///
/// let settings = RtcSettings::default().with_prescaler(Prescaler::new(7).unwrap());
/// assert_eq!(settings.tick_rate_hz, 4096);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RtcSettings {
    /// Counter rate in Hz
    pub tick_rate_hz: u32,
    /// Raw prescaler register value
    pub prescaler: u16,
    /// Interrupt line of the counter
    pub irq: IrqNumber,
    /// Low-frequency clock source to start
    pub clock_source: LfClockSource,
}

impl Default for RtcSettings {
    fn default() -> Self {
        Self {
            tick_rate_hz: LFCLK_HZ,
            prescaler: 0,
            irq: DEFAULT_TIMER_IRQ,
            clock_source: LfClockSource::Xtal,
        }
    }
}

impl RtcSettings {
    /// Sets the prescaler and the resulting counter rate
    pub fn with_prescaler(mut self, prescaler: Prescaler) -> Self {
        self.prescaler = prescaler.value();
        self.tick_rate_hz = prescaler.counter_rate(LFCLK_HZ);
        self
    }

    /// Overrides the counter rate (for counters not fed by the LF clock)
    pub fn with_tick_rate(mut self, tick_rate_hz: u32) -> Self {
        self.tick_rate_hz = tick_rate_hz;
        self
    }

    /// Sets the interrupt line
    pub fn with_irq(mut self, irq: IrqNumber) -> Self {
        self.irq = irq;
        self
    }

    /// Sets the low-frequency clock source
    pub fn with_clock_source(mut self, clock_source: LfClockSource) -> Self {
        self.clock_source = clock_source;
        self
    }

    /// Returns the validated prescaler
    pub fn prescaler(&self) -> core::result::Result<Prescaler, RtcError> {
        Prescaler::new(u32::from(self.prescaler))
    }
}

/// Periodic timer configuration derived for one interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Counter rate in Hz
    pub tick_rate: u32,
    /// Compare-channel delta per period, in counter ticks
    pub tick_increment: u32,
    /// The same delta in microseconds
    pub tick_increment_us: u32,
    /// Nominal period requested by the caller
    pub tick_interval_ms: u32,
}

impl TimerConfig {
    /// Derives the compare increment for `interval_ms` at the board's rate
    ///
    /// The increment is `tick_rate / (1000 / interval_ms)`, so intervals
    /// that do not divide a second are rounded to the nearest whole
    /// number of periods per second first.
    ///
    /// # Errors
    ///
    /// - `InvalidInterval` if `interval_ms` is 0 or above 1000
    /// - `IncrementOutOfRange` if the increment is 0 or does not fit the
    ///   counter
    pub fn derive(settings: &RtcSettings, interval_ms: u32) -> Result<Self> {
        if interval_ms == 0 || interval_ms > 1000 {
            return Err(TimerError::InvalidInterval { interval_ms });
        }

        let periods_per_second = 1000 / interval_ms;
        let increment = settings.tick_rate_hz / periods_per_second;
        if increment == 0 || increment > COUNTER_MASK {
            return Err(TimerError::IncrementOutOfRange {
                interval_ms,
                increment,
            });
        }

        let increment_us = u64::from(increment) * 1_000_000 / u64::from(settings.tick_rate_hz);

        Ok(Self {
            tick_rate: settings.tick_rate_hz,
            tick_increment: increment,
            tick_increment_us: increment_us as u32,
            tick_interval_ms: interval_ms,
        })
    }
}
