//! Provides the [`Sensor`] trait and its error types.

/// Represents a device providing sensor readings.
///
/// A polling loop holds sensors as `&mut dyn Sensor` and calls [`read()`](Sensor::read) once
/// per cycle, then [`get_data()`](Sensor::get_data) to obtain the reading formatted for
/// diagnostics.
///
/// # For sensor driver implementors
///
/// [`read()`](Sensor::read) must return within a bounded time, even when the hardware does not
/// respond.
/// [`get_data()`](Sensor::get_data) must return `None` rather than made-up data when there is no
/// valid reading.
pub trait Sensor {
    /// Returns the label printed in messages from this sensor.
    #[must_use]
    fn prefix(&self) -> &'static str;

    /// Acquires a new reading from the hardware and stores it.
    ///
    /// # Errors
    ///
    /// Returns [`ReadingError::NotInitialized`] when the sensor requires an initialization step
    /// that has not succeeded yet, and [`ReadingError::Hardware`] when the underlying hardware
    /// access failed.
    /// Sensor-specific conditions such as a missing ultrasonic echo are reported through the
    /// reading itself and are not errors.
    fn read(&mut self) -> ReadingResult<()>;

    /// Returns the latest reading, formatted as `<prefix>:<value>`.
    ///
    /// The returned text lives in a buffer owned by the sensor and is overwritten by the next
    /// call to this method or to [`read()`](Sensor::read).
    /// Returns `None` if no valid reading is available.
    fn get_data(&mut self) -> Option<&str>;
}

/// Error returned when a sensor could not provide a reading.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum ReadingError {
    /// The sensor was read before its initialization succeeded.
    NotInitialized,
    /// The hardware access failed.
    Hardware,
}

impl core::fmt::Display for ReadingError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "sensor read before initialization"),
            Self::Hardware => write!(f, "sensor hardware access failed"),
        }
    }
}

impl core::error::Error for ReadingError {}

/// Result of a sensor reading.
pub type ReadingResult<R> = Result<R, ReadingError>;
