//! Provides the [`Amg`] accelerometer/magnetometer/gyroscope composite sensor.
//!
//! The composite matches the Adafruit 9-DOF breakout: an LSM303DLHC (accelerometer and
//! magnetometer, two I2C targets) and an L3GD20 gyroscope sharing one I2C bus.
//! Readings are raw counts; no unit conversion or fusion is performed.

mod accel;
mod gyro;
mod mag;

use embedded_hal::i2c::{ErrorKind, I2c};

use crate::{
    data::{check_prefix, DataBuffer, MAX_PREFIX_LEN},
    sensor::{ReadingError, ReadingResult, Sensor},
};

use self::{accel::Accelerometer, gyro::Gyroscope, mag::Magnetometer};

/// Register address bit enabling auto-increment on multi-byte reads.
const AUTO_INCREMENT: u8 = 0x80;

/// Longest text of a formatted [`ImuReading`], with every component at `i16::MIN`.
const IMU_READING_LEN: usize =
    "a=-32768,-32768,-32768;m=-32768,-32768,-32768;g=-32768,-32768,-32768".len();

/// Capacity of the [`Amg`] data buffer: the longest prefix, `:`, and the longest reading.
pub const IMU_DATA_LEN: usize = MAX_PREFIX_LEN + 1 + IMU_READING_LEN;

/// Sample along three axes, in raw sensor counts.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Vector3 {
    /// X axis.
    pub x: i32,
    /// Y axis.
    pub y: i32,
    /// Z axis.
    pub z: i32,
}

impl Vector3 {
    /// Creates a vector.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl core::fmt::Display for Vector3 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

/// One reading of the three sub-devices, acquired during the same [`read()`](Sensor::read).
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ImuReading {
    /// Acceleration.
    pub accel: Vector3,
    /// Magnetic field.
    pub mag: Vector3,
    /// Angular rate.
    pub gyro: Vector3,
}

/// Hardware sub-device of an [`Amg`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SubDevice {
    /// LSM303 accelerometer.
    Accelerometer,
    /// LSM303 magnetometer.
    Magnetometer,
    /// L3GD20 gyroscope.
    Gyroscope,
}

impl core::fmt::Display for SubDevice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Accelerometer => write!(f, "accelerometer"),
            Self::Magnetometer => write!(f, "magnetometer"),
            Self::Gyroscope => write!(f, "gyroscope"),
        }
    }
}

/// Error returned by [`Amg::init()`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// The sub-device could not be reached on the bus.
    Bus {
        /// Failing sub-device.
        device: SubDevice,
        /// Bus error.
        kind: ErrorKind,
    },
    /// The sub-device answered with an unexpected identification.
    UnexpectedDevice {
        /// Failing sub-device.
        device: SubDevice,
        /// Identification value read.
        id: u8,
    },
}

impl InitError {
    /// Returns the sub-device whose bring-up failed.
    #[must_use]
    pub fn device(&self) -> SubDevice {
        match self {
            Self::Bus { device, .. } | Self::UnexpectedDevice { device, .. } => *device,
        }
    }
}

impl core::fmt::Display for InitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus { device, kind } => write!(f, "{device} bus error: {kind}"),
            Self::UnexpectedDevice { device, id } => {
                write!(f, "unexpected {device} identification: {id:#04x}")
            }
        }
    }
}

impl core::error::Error for InitError {}

/// I2C addresses of the [`Amg`] sub-devices.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AmgConfig {
    /// Accelerometer address.
    pub accel_address: u8,
    /// Magnetometer address.
    pub mag_address: u8,
    /// Gyroscope address.
    pub gyro_address: u8,
}

impl Default for AmgConfig {
    fn default() -> Self {
        Self {
            accel_address: 0x19,
            mag_address: 0x1e,
            gyro_address: 0x6b,
        }
    }
}

/// Accelerometer, magnetometer and gyroscope exposed as a single [`Sensor`].
///
/// The bus must be set up before [`Amg::init()`] is called, which must succeed before the first
/// [`read()`](Sensor::read):
///
/// ```
/// # use embedded_hal::i2c::I2c;
/// # use penguin_sensors::{Amg, Sensor};
/// fn bring_up<I2C: I2c>(i2c: I2C) -> Option<Amg<I2C>> {
///     let mut imu = Amg::new("imu", i2c);
///     imu.init().ok()?;
///     imu.read().ok()?;
///     Some(imu)
/// }
/// ```
///
/// To share the bus with other devices, pass a bus-sharing handle such as the ones provided by
/// `embedded-hal-bus` or `embassy-embedded-hal`.
/// Each sub-device is read in a single write-read transaction, so the sub-devices' register
/// accesses are never interleaved.
pub struct Amg<I2C> {
    prefix: &'static str,
    i2c: I2C,
    accel: Accelerometer,
    mag: Magnetometer,
    gyro: Gyroscope,
    initialized: bool,
    reading: Option<ImuReading>,
    buffer: DataBuffer<IMU_DATA_LEN>,
}

impl<I2C: I2c> Amg<I2C> {
    /// Creates the composite sensor with the default sub-device addresses.
    ///
    /// The bus is not accessed until [`Amg::init()`].
    ///
    /// # Panics
    ///
    /// Panics if `prefix` is longer than [`MAX_PREFIX_LEN`].
    pub fn new(prefix: &'static str, i2c: I2C) -> Self {
        Self::with_config(prefix, i2c, AmgConfig::default())
    }

    /// Creates the composite sensor with custom sub-device addresses.
    ///
    /// # Panics
    ///
    /// Panics if `prefix` is longer than [`MAX_PREFIX_LEN`].
    pub fn with_config(prefix: &'static str, i2c: I2C, config: AmgConfig) -> Self {
        Self {
            prefix: check_prefix(prefix),
            i2c,
            accel: Accelerometer::new(config.accel_address),
            mag: Magnetometer::new(config.mag_address),
            gyro: Gyroscope::new(config.gyro_address),
            initialized: false,
            reading: None,
            buffer: DataBuffer::new(),
        }
    }

    /// Checks and configures the three sub-devices.
    ///
    /// Calling this again once it has succeeded does nothing and returns `Ok(())`.
    /// After a failure, it can be retried.
    ///
    /// # Errors
    ///
    /// Returns an [`InitError`] identifying the first sub-device that failed.
    pub fn init(&mut self) -> Result<(), InitError> {
        if self.initialized {
            penguin_log::debug!("{}: already initialized", self.prefix);
            return Ok(());
        }

        let res = self
            .accel
            .init(&mut self.i2c)
            .and_then(|()| self.mag.init(&mut self.i2c))
            .and_then(|()| self.gyro.init(&mut self.i2c));

        match res {
            Ok(()) => {
                self.initialized = true;
                penguin_log::info!("{}: initialized", self.prefix);
                Ok(())
            }
            Err(err) => {
                penguin_log::error!("{}: initialization failed: {}", self.prefix, err);
                Err(err)
            }
        }
    }

    /// Returns whether [`Amg::init()`] has succeeded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the latest reading, if any.
    #[must_use]
    pub fn reading(&self) -> Option<ImuReading> {
        self.reading
    }

    /// Returns the bus, consuming the sensor.
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn acquire(&mut self) -> Result<ImuReading, (SubDevice, ErrorKind)> {
        let accel = self
            .accel
            .read(&mut self.i2c)
            .map_err(|kind| (SubDevice::Accelerometer, kind))?;
        let mag = self
            .mag
            .read(&mut self.i2c)
            .map_err(|kind| (SubDevice::Magnetometer, kind))?;
        let gyro = self
            .gyro
            .read(&mut self.i2c)
            .map_err(|kind| (SubDevice::Gyroscope, kind))?;

        Ok(ImuReading { accel, mag, gyro })
    }
}

impl<I2C: I2c> Sensor for Amg<I2C> {
    fn prefix(&self) -> &'static str {
        self.prefix
    }

    fn read(&mut self) -> ReadingResult<()> {
        if !self.initialized {
            penguin_log::error!("{}: read before initialization", self.prefix);
            return Err(ReadingError::NotInitialized);
        }

        match self.acquire() {
            Ok(reading) => {
                self.reading = Some(reading);
                Ok(())
            }
            Err((device, kind)) => {
                penguin_log::warn!("{}: {} read failed: {}", self.prefix, device, kind);
                self.reading = None;
                Err(ReadingError::Hardware)
            }
        }
    }

    fn get_data(&mut self) -> Option<&str> {
        let ImuReading { accel, mag, gyro } = self.reading?;
        self.buffer
            .format(self.prefix, format_args!("a={accel};m={mag};g={gyro}"))
    }
}
