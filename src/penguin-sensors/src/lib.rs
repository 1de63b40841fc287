//! Provides a sensor abstraction layer for the penguin robot controller.
//!
//! Sensors implement the [`Sensor`] trait, which lets a polling loop acquire and report readings
//! without knowing which kind of hardware sits behind each sensor:
//!
//! - [`Potentiometer`]: single analog channel.
//! - [`Sonar`]: ultrasonic rangefinder timed on a single digital channel.
//! - [`Amg`] (`amg` feature): accelerometer, magnetometer and gyroscope sharing an I2C bus.
//!
//! ```
//! # use penguin_sensors::Sensor;
//! fn poll(sensors: &mut [&mut dyn Sensor]) {
//!     for sensor in sensors.iter_mut() {
//!         if sensor.read().is_ok() {
//!             if let Some(data) = sensor.get_data() {
//!                 // Forward `data` to the server.
//!                 let _ = data;
//!             }
//!         }
//!     }
//! }
//! ```
//!
//! # Cargo features
#![doc = document_features::document_features!(feature_label = r#"<span class="stab portability"><code>{feature}</code></span>"#)]
#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
#![deny(clippy::pedantic)]

pub mod data;
pub mod hal;
pub mod potentiometer;
pub mod sensor;
pub mod sonar;

#[cfg(feature = "amg")]
pub mod amg;

#[cfg(test)]
mod mock;

#[cfg(feature = "amg")]
pub use amg::{Amg, AmgConfig, ImuReading, InitError, SubDevice, Vector3};
pub use data::{DataBuffer, MAX_PREFIX_LEN};
pub use hal::{AnalogInput, Clock, DigitalIo, Instant, Level};
pub use potentiometer::Potentiometer;
pub use sensor::{ReadingError, ReadingResult, Sensor};
pub use sonar::{Sonar, SonarConfig, NO_ECHO};
