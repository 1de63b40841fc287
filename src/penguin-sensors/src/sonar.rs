//! Provides the [`Sonar`] ultrasonic rangefinder.
//!
//! The rangefinder is wired to a single GPIO.
//! When configured with a trigger pulse, the GPIO is first driven as an output to start a
//! ranging cycle, then switched to an input to time the echo pulse.
//! Free-running rangefinders with a pulse-width output only need the second step.
//!
//! The echo is timed against a [`Clock`], which also bounds the whole measurement.

use embedded_hal::delay::DelayNs;
use fugit::MicrosDurationU32;

use crate::{
    data::{check_prefix, DataBuffer, SCALAR_DATA_LEN},
    hal::{Clock, DigitalIo, Instant, Level},
    sensor::{ReadingError, ReadingResult, Sensor},
};

/// Reading recorded when no echo was received in time.
///
/// A genuine reading is never zero, as rangefinders have a non-zero minimum range.
pub const NO_ECHO: u32 = 0;

/// Low time preceding the trigger pulse, so that it starts on a clean edge.
const TRIGGER_SETTLE: MicrosDurationU32 = MicrosDurationU32::micros(2);

/// Timing and scaling of a [`Sonar`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SonarConfig {
    /// Width of the trigger pulse, `None` for free-running rangefinders.
    pub trigger_pulse: Option<MicrosDurationU32>,
    /// Time budget of a whole measurement, from the end of the trigger pulse to the end of the
    /// echo.
    ///
    /// A measurement exceeding it records [`NO_ECHO`].
    pub timeout: MicrosDurationU32,
    /// Delay between two samples of the echo level, on top of the sampling time itself.
    pub poll_interval: MicrosDurationU32,
    /// Echo pulse width corresponding to one unit of distance.
    pub micros_per_unit: u32,
}

impl SonarConfig {
    /// Configuration of trigger/echo rangefinders (e.g., HC-SR04, PING))), distance in
    /// centimeters.
    #[must_use]
    pub const fn trigger_echo() -> Self {
        Self {
            trigger_pulse: Some(MicrosDurationU32::micros(10)),
            timeout: MicrosDurationU32::millis(25),
            poll_interval: MicrosDurationU32::micros(1),
            // Sound travels one centimeter and back in 58 µs.
            micros_per_unit: 58,
        }
    }

    /// Configuration of free-running rangefinders with a pulse-width output (e.g.,
    /// LV-MaxSonar-EZ1), distance in inches.
    ///
    /// The budget covers waiting for the end of a pulse already in progress, the next rising
    /// edge, and a full-range pulse.
    #[must_use]
    pub const fn pulse_width() -> Self {
        Self {
            trigger_pulse: None,
            timeout: MicrosDurationU32::millis(100),
            poll_interval: MicrosDurationU32::micros(1),
            micros_per_unit: 147,
        }
    }
}

impl Default for SonarConfig {
    fn default() -> Self {
        Self::trigger_echo()
    }
}

/// Ultrasonic rangefinder timed on a single GPIO.
///
/// The distance unit depends on [`SonarConfig::micros_per_unit`].
/// When no echo is received within [`SonarConfig::timeout`], the reading is [`NO_ECHO`].
///
/// `T` provides both the delays shaping the trigger pulse and the clock timing the echo.
pub struct Sonar<IO, T> {
    prefix: &'static str,
    pin: u8,
    io: IO,
    timer: T,
    config: SonarConfig,
    last_value: Option<u32>,
    buffer: DataBuffer<SCALAR_DATA_LEN>,
}

impl<IO: DigitalIo, T: DelayNs + Clock> Sonar<IO, T> {
    /// Creates a rangefinder wired to GPIO `pin` of `io`.
    ///
    /// The GPIO is not touched until the first [`read()`](Sensor::read).
    ///
    /// # Panics
    ///
    /// Panics if `prefix` is longer than [`MAX_PREFIX_LEN`](crate::data::MAX_PREFIX_LEN).
    pub const fn new(
        prefix: &'static str,
        pin: u8,
        io: IO,
        timer: T,
        config: SonarConfig,
    ) -> Self {
        Self {
            prefix: check_prefix(prefix),
            pin,
            io,
            timer,
            config,
            last_value: None,
            buffer: DataBuffer::new(),
        }
    }

    /// Returns the GPIO this rangefinder is bound to.
    #[must_use]
    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Returns the configuration of this rangefinder.
    #[must_use]
    pub fn config(&self) -> &SonarConfig {
        &self.config
    }

    /// Returns the latest distance, [`NO_ECHO`] if the echo timed out, or `None` before
    /// the first successful reading.
    #[must_use]
    pub fn value(&self) -> Option<u32> {
        self.last_value
    }

    fn trigger(&mut self, width: MicrosDurationU32) -> Result<(), IO::Error> {
        self.io.set_output(self.pin, Level::Low)?;
        self.timer.delay_us(TRIGGER_SETTLE.to_micros());
        self.io.set_output(self.pin, Level::High)?;
        self.timer.delay_us(width.to_micros());
        self.io.set_output(self.pin, Level::Low)
    }

    /// Returns the width of the next high pulse in microseconds, or `None` on timeout.
    fn measure_pulse(&mut self) -> Result<Option<u32>, IO::Error> {
        let start = self.timer.now();

        // A pulse already in progress cannot be timed.
        if !self.wait_while(Level::High, start)? {
            return Ok(None);
        }
        if !self.wait_while(Level::Low, start)? {
            return Ok(None);
        }

        let rising_edge = self.timer.now();
        if !self.wait_while(Level::High, start)? {
            return Ok(None);
        }
        let falling_edge = self.timer.now();

        Ok(Some(micros_between(rising_edge, falling_edge)))
    }

    /// Waits as long as the GPIO stays at `level`.
    ///
    /// Returns `false` if the measurement started at `start` ran out of time first.
    fn wait_while(&mut self, level: Level, start: Instant) -> Result<bool, IO::Error> {
        let timeout = self.config.timeout.to_micros();
        let step = self.config.poll_interval.to_micros();

        while self.io.level(self.pin)? == level {
            if micros_between(start, self.timer.now()) >= timeout {
                return Ok(false);
            }
            self.timer.delay_us(step);
        }

        Ok(true)
    }

    fn acquire(&mut self) -> Result<u32, IO::Error> {
        if let Some(width) = self.config.trigger_pulse {
            self.trigger(width)?;
        }
        self.io.set_input(self.pin)?;

        let Some(pulse) = self.measure_pulse()? else {
            penguin_log::debug!("{}: no echo", self.prefix);
            return Ok(NO_ECHO);
        };

        let unit = self.config.micros_per_unit.max(1);
        let distance = pulse.saturating_add(unit / 2) / unit;

        // Too close to be resolved, still an echo.
        Ok(distance.max(1))
    }
}

/// Returns the microseconds elapsed from `earlier` to `later`, saturating.
fn micros_between(earlier: Instant, later: Instant) -> u32 {
    later.checked_duration_since(earlier).map_or(0, |elapsed| {
        u32::try_from(elapsed.to_micros()).unwrap_or(u32::MAX)
    })
}

impl<IO: DigitalIo, T: DelayNs + Clock> Sensor for Sonar<IO, T> {
    fn prefix(&self) -> &'static str {
        self.prefix
    }

    fn read(&mut self) -> ReadingResult<()> {
        match self.acquire() {
            Ok(distance) => {
                self.last_value = Some(distance);
                Ok(())
            }
            Err(_) => {
                penguin_log::warn!("{}: GPIO {} access failed", self.prefix, self.pin);
                self.last_value = None;
                Err(ReadingError::Hardware)
            }
        }
    }

    fn get_data(&mut self) -> Option<&str> {
        let value = self.last_value?;
        self.buffer.format(self.prefix, format_args!("{value}"))
    }
}
