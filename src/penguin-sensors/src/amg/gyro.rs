//! L3GD20 gyroscope.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

use super::{InitError, SubDevice, Vector3, AUTO_INCREMENT};

const WHO_AM_I: u8 = 0x0f;
const CTRL_REG1: u8 = 0x20;
const CTRL_REG4: u8 = 0x23;
const OUT_X_L: u8 = 0x28;

/// Identifiers of the L3GD20 and of its L3GD20H successor.
const WHO_AM_I_VALUES: [u8; 2] = [0xd4, 0xd7];
/// Normal mode, X/Y/Z enabled, 95 Hz.
const CTRL_REG1_VALUE: u8 = 0x0f;
/// 250 dps full scale.
const CTRL_REG4_VALUE: u8 = 0x00;

#[derive(Debug)]
pub(crate) struct Gyroscope {
    address: u8,
}

impl Gyroscope {
    pub(crate) const fn new(address: u8) -> Self {
        Self { address }
    }

    pub(crate) fn init<I2C: I2c>(&self, i2c: &mut I2C) -> Result<(), InitError> {
        let bus_error = |err: I2C::Error| InitError::Bus {
            device: SubDevice::Gyroscope,
            kind: err.kind(),
        };

        let mut id = [0];
        i2c.write_read(self.address, &[WHO_AM_I], &mut id)
            .map_err(bus_error)?;
        let [id] = id;
        if !WHO_AM_I_VALUES.contains(&id) {
            return Err(InitError::UnexpectedDevice {
                device: SubDevice::Gyroscope,
                id,
            });
        }

        i2c.write(self.address, &[CTRL_REG4, CTRL_REG4_VALUE])
            .map_err(bus_error)?;
        i2c.write(self.address, &[CTRL_REG1, CTRL_REG1_VALUE])
            .map_err(bus_error)
    }

    /// Reads one sample, in raw counts.
    pub(crate) fn read<I2C: I2c>(&self, i2c: &mut I2C) -> Result<Vector3, ErrorKind> {
        let mut out = [0; 6];
        i2c.write_read(self.address, &[OUT_X_L | AUTO_INCREMENT], &mut out)
            .map_err(|err| err.kind())?;

        let [xl, xh, yl, yh, zl, zh] = out;
        Ok(Vector3::new(
            i32::from(i16::from_le_bytes([xl, xh])),
            i32::from(i16::from_le_bytes([yl, yh])),
            i32::from(i16::from_le_bytes([zl, zh])),
        ))
    }
}
