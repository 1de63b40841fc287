//! Provides the hardware access traits sensors are built upon.
//!
//! embedded-hal does not provide a trait for analog-to-digital conversion, nor for GPIOs
//! addressed by pin number whose direction can be switched at runtime, which the single-pin
//! sonar needs.
//! Board crates implement [`AnalogInput`] and [`DigitalIo`] on top of their HAL, and [`Clock`]
//! on top of their monotonic timer.
//!
//! Both traits are implemented for `&RefCell<T>`, so several sensors polled from the same
//! context can share one converter or GPIO port.

use core::cell::RefCell;

/// Digital level of an input or output.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Digital low level.
    Low,
    /// Digital high level.
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Instant read from a [`Clock`], with microsecond resolution.
pub type Instant = fugit::TimerInstantU64<1_000_000>;

/// Monotonic time source.
///
/// Sensors timing a signal read it around the sampling of that signal, so the time spent
/// accessing the hardware is accounted for.
/// On embassy-based boards, this maps to `embassy_time::Instant::now().as_micros()`.
pub trait Clock {
    /// Returns the current time.
    ///
    /// Consecutive calls must never go backwards.
    fn now(&mut self) -> Instant;
}

/// Analog-to-digital converter with numbered input channels.
pub trait AnalogInput {
    /// Error returned by the converter.
    type Error: core::fmt::Debug;

    /// Samples the given channel and returns the raw conversion result.
    ///
    /// # Errors
    ///
    /// Returns an error if the conversion failed.
    fn read_analog(&mut self, pin: u8) -> Result<u16, Self::Error>;
}

/// GPIO port whose pins are addressed by number and can switch direction at runtime.
pub trait DigitalIo {
    /// Error returned by the port.
    type Error: core::fmt::Debug;

    /// Configures the pin as an output driven at `level`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pin cannot be driven.
    fn set_output(&mut self, pin: u8, level: Level) -> Result<(), Self::Error>;

    /// Configures the pin as a floating input.
    ///
    /// # Errors
    ///
    /// Returns an error if the pin cannot be configured.
    fn set_input(&mut self, pin: u8) -> Result<(), Self::Error>;

    /// Returns the level currently present on the pin.
    ///
    /// # Errors
    ///
    /// Returns an error if the pin cannot be sampled.
    fn level(&mut self, pin: u8) -> Result<Level, Self::Error>;
}

impl<T: AnalogInput> AnalogInput for &mut T {
    type Error = T::Error;

    fn read_analog(&mut self, pin: u8) -> Result<u16, Self::Error> {
        T::read_analog(self, pin)
    }
}

impl<T: AnalogInput> AnalogInput for &RefCell<T> {
    type Error = T::Error;

    fn read_analog(&mut self, pin: u8) -> Result<u16, Self::Error> {
        self.borrow_mut().read_analog(pin)
    }
}

impl<T: Clock> Clock for &mut T {
    fn now(&mut self) -> Instant {
        T::now(self)
    }
}

impl<T: DigitalIo> DigitalIo for &mut T {
    type Error = T::Error;

    fn set_output(&mut self, pin: u8, level: Level) -> Result<(), Self::Error> {
        T::set_output(self, pin, level)
    }

    fn set_input(&mut self, pin: u8) -> Result<(), Self::Error> {
        T::set_input(self, pin)
    }

    fn level(&mut self, pin: u8) -> Result<Level, Self::Error> {
        T::level(self, pin)
    }
}

impl<T: DigitalIo> DigitalIo for &RefCell<T> {
    type Error = T::Error;

    fn set_output(&mut self, pin: u8, level: Level) -> Result<(), Self::Error> {
        self.borrow_mut().set_output(pin, level)
    }

    fn set_input(&mut self, pin: u8) -> Result<(), Self::Error> {
        self.borrow_mut().set_input(pin)
    }

    fn level(&mut self, pin: u8) -> Result<Level, Self::Error> {
        self.borrow_mut().level(pin)
    }
}
