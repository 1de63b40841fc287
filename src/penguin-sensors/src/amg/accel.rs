//! LSM303DLHC accelerometer.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

use super::{InitError, SubDevice, Vector3, AUTO_INCREMENT};

const CTRL_REG1_A: u8 = 0x20;
const CTRL_REG4_A: u8 = 0x23;
const OUT_X_L_A: u8 = 0x28;

/// 100 Hz, normal power mode, X/Y/Z enabled.
const CTRL_REG1_A_VALUE: u8 = 0x57;
/// ±2 g full scale, high-resolution output.
const CTRL_REG4_A_VALUE: u8 = 0x08;

#[derive(Debug)]
pub(crate) struct Accelerometer {
    address: u8,
}

impl Accelerometer {
    pub(crate) const fn new(address: u8) -> Self {
        Self { address }
    }

    /// Enables the accelerometer.
    ///
    /// The device has no identification register: reading the control register back is the
    /// presence check.
    pub(crate) fn init<I2C: I2c>(&self, i2c: &mut I2C) -> Result<(), InitError> {
        let bus_error = |err: I2C::Error| InitError::Bus {
            device: SubDevice::Accelerometer,
            kind: err.kind(),
        };

        i2c.write(self.address, &[CTRL_REG1_A, CTRL_REG1_A_VALUE])
            .map_err(bus_error)?;

        let mut ctrl = [0];
        i2c.write_read(self.address, &[CTRL_REG1_A], &mut ctrl)
            .map_err(bus_error)?;
        let [ctrl] = ctrl;
        if ctrl != CTRL_REG1_A_VALUE {
            return Err(InitError::UnexpectedDevice {
                device: SubDevice::Accelerometer,
                id: ctrl,
            });
        }

        i2c.write(self.address, &[CTRL_REG4_A, CTRL_REG4_A_VALUE])
            .map_err(bus_error)
    }

    /// Reads one sample, in raw 12-bit counts.
    pub(crate) fn read<I2C: I2c>(&self, i2c: &mut I2C) -> Result<Vector3, ErrorKind> {
        let mut out = [0; 6];
        i2c.write_read(self.address, &[OUT_X_L_A | AUTO_INCREMENT], &mut out)
            .map_err(|err| err.kind())?;

        // Little-endian, left-justified 12-bit values.
        let [xl, xh, yl, yh, zl, zh] = out;
        Ok(Vector3::new(
            i32::from(i16::from_le_bytes([xl, xh]) >> 4),
            i32::from(i16::from_le_bytes([yl, yh]) >> 4),
            i32::from(i16::from_le_bytes([zl, zh]) >> 4),
        ))
    }
}
