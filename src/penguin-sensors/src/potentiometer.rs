//! Provides the [`Potentiometer`] sensor.

use crate::{
    data::{check_prefix, DataBuffer, SCALAR_DATA_LEN},
    hal::AnalogInput,
    sensor::{ReadingError, ReadingResult, Sensor},
};

/// Linear potentiometer (or any other analog source) wired to a converter channel.
///
/// The reading is the raw conversion result; on a 10-bit converter it ranges from `0` to
/// `1023`.
pub struct Potentiometer<A> {
    prefix: &'static str,
    pin: u8,
    adc: A,
    last_value: Option<u16>,
    buffer: DataBuffer<SCALAR_DATA_LEN>,
}

impl<A: AnalogInput> Potentiometer<A> {
    /// Creates a potentiometer sampled on channel `pin` of `adc`.
    ///
    /// The channel is not validated.
    ///
    /// # Panics
    ///
    /// Panics if `prefix` is longer than [`MAX_PREFIX_LEN`](crate::data::MAX_PREFIX_LEN).
    pub const fn new(prefix: &'static str, pin: u8, adc: A) -> Self {
        Self {
            prefix: check_prefix(prefix),
            pin,
            adc,
            last_value: None,
            buffer: DataBuffer::new(),
        }
    }

    /// Returns the converter channel this potentiometer is bound to.
    #[must_use]
    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Returns the latest raw reading, if any.
    #[must_use]
    pub fn value(&self) -> Option<u16> {
        self.last_value
    }
}

impl<A: AnalogInput> Sensor for Potentiometer<A> {
    fn prefix(&self) -> &'static str {
        self.prefix
    }

    fn read(&mut self) -> ReadingResult<()> {
        match self.adc.read_analog(self.pin) {
            Ok(value) => {
                self.last_value = Some(value);
                Ok(())
            }
            Err(_) => {
                penguin_log::warn!("{}: conversion failed on channel {}", self.prefix, self.pin);
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
