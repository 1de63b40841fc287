//! Provides the text buffer backing [`Sensor::get_data()`](crate::Sensor::get_data).

use core::fmt::{self, Write};

use heapless::String;

/// Longest prefix accepted by the sensor constructors, in bytes.
///
/// Data buffers are sized so that any reading fits after a prefix of this length.
pub const MAX_PREFIX_LEN: usize = 24;

/// Capacity of the buffer used by sensors reporting a single scalar.
///
/// Fits the longest prefix followed by `:` and a `u32`.
pub const SCALAR_DATA_LEN: usize = MAX_PREFIX_LEN + 1 + "4294967295".len();

/// Returns `prefix`, after checking it fits in the data buffers.
///
/// # Panics
///
/// Panics if `prefix` is longer than [`MAX_PREFIX_LEN`], at compile time when evaluated in a
/// const context.
pub(crate) const fn check_prefix(prefix: &'static str) -> &'static str {
    assert!(prefix.len() <= MAX_PREFIX_LEN, "sensor prefix too long");
    prefix
}

/// Fixed-capacity text buffer holding the latest formatted reading of a sensor.
///
/// The buffer is reused across readings, so formatting never allocates.
///
/// # For sensor driver implementors
///
/// Call [`DataBuffer::format()`] from [`Sensor::get_data()`](crate::Sensor::get_data) with the
/// sensor prefix and the reading; the `<prefix>:` part is added by the buffer.
#[derive(Debug, Default)]
pub struct DataBuffer<const N: usize> {
    text: String<N>,
}

impl<const N: usize> DataBuffer<N> {
    /// Creates an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    /// Replaces the buffer contents with `<prefix>:<value>` and returns them.
    ///
    /// Returns `None`, leaving the buffer empty, if the text does not fit.
    pub fn format(&mut self, prefix: &str, value: fmt::Arguments<'_>) -> Option<&str> {
        self.text.clear();

        if write!(self.text, "{prefix}:{value}").is_err() {
            penguin_log::warn!("{}: reading does not fit in {} bytes", prefix, N);
            self.text.clear();
            return None;
        }

        Some(self.text.as_str())
    }

    /// Empties the buffer.
    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Returns the buffer capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }
}
