//! LSM303DLHC magnetometer.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

use super::{InitError, SubDevice, Vector3};

const CRA_REG_M: u8 = 0x00;
const CRB_REG_M: u8 = 0x01;
const MR_REG_M: u8 = 0x02;
const OUT_X_H_M: u8 = 0x03;
const IRA_REG_M: u8 = 0x0a;

/// ASCII `H`, first byte of the identification registers.
const IRA_REG_M_VALUE: u8 = 0x48;
/// 15 Hz output data rate.
const CRA_REG_M_VALUE: u8 = 0x10;
/// ±1.3 gauss.
const CRB_REG_M_VALUE: u8 = 0x20;
/// Continuous conversion.
const MR_REG_M_CONTINUOUS: u8 = 0x00;

#[derive(Debug)]
pub(crate) struct Magnetometer {
    address: u8,
}

impl Magnetometer {
    pub(crate) const fn new(address: u8) -> Self {
        Self { address }
    }

    /// Checks the identification register, then starts continuous conversion.
    pub(crate) fn init<I2C: I2c>(&self, i2c: &mut I2C) -> Result<(), InitError> {
        let bus_error = |err: I2C::Error| InitError::Bus {
            device: SubDevice::Magnetometer,
            kind: err.kind(),
        };

        let mut id = [0];
        i2c.write_read(self.address, &[IRA_REG_M], &mut id)
            .map_err(bus_error)?;
        let [id] = id;
        if id != IRA_REG_M_VALUE {
            return Err(InitError::UnexpectedDevice {
                device: SubDevice::Magnetometer,
                id,
            });
        }

        i2c.write(self.address, &[CRA_REG_M, CRA_REG_M_VALUE])
            .map_err(bus_error)?;
        i2c.write(self.address, &[CRB_REG_M, CRB_REG_M_VALUE])
            .map_err(bus_error)?;
        i2c.write(self.address, &[MR_REG_M, MR_REG_M_CONTINUOUS])
            .map_err(bus_error)
    }

    /// Reads one sample, in raw counts.
    pub(crate) fn read<I2C: I2c>(&self, i2c: &mut I2C) -> Result<Vector3, ErrorKind> {
        let mut out = [0; 6];
        i2c.write_read(self.address, &[OUT_X_H_M], &mut out)
            .map_err(|err| err.kind())?;

        // Big-endian, in X, Z, Y order.
        let [xh, xl, zh, zl, yh, yl] = out;
        Ok(Vector3::new(
            i32::from(i16::from_be_bytes([xh, xl])),
            i32::from(i16::from_be_bytes([yh, yl])),
            i32::from(i16::from_be_bytes([zh, zl])),
        ))
    }
}
