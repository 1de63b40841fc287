//! Simulated hardware for host tests.

#![allow(clippy::indexing_slicing, clippy::unwrap_used)]

use std::{cell::Cell, collections::HashMap, rc::Rc};

use embedded_hal::delay::DelayNs;

use crate::hal::{AnalogInput, Clock, DigitalIo, Instant, Level};

/// Error returned by the simulated peripherals.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockError;

/// Analog converter returning preset values.
#[derive(Debug, Default)]
pub struct MockAdc {
    values: HashMap<u8, u16>,
    failing: Vec<u8>,
}

impl MockAdc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, pin: u8, value: u16) {
        self.values.insert(pin, value);
    }

    pub fn fail(&mut self, pin: u8) {
        self.failing.push(pin);
    }
}

impl AnalogInput for MockAdc {
    type Error = MockError;

    fn read_analog(&mut self, pin: u8) -> Result<u16, Self::Error> {
        if self.failing.contains(&pin) {
            return Err(MockError);
        }
        Ok(self.values.get(&pin).copied().unwrap_or(0))
    }
}

/// Timer whose delays advance a simulated clock instead of sleeping.
#[derive(Debug, Clone, Default)]
pub struct MockTimer {
    now_ns: Rc<Cell<u64>>,
}

impl MockTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle on the simulated clock.
    pub fn clock(&self) -> Rc<Cell<u64>> {
        Rc::clone(&self.now_ns)
    }

    pub fn elapsed_us(&self) -> u64 {
        self.now_ns.get() / 1000
    }
}

impl Clock for MockTimer {
    fn now(&mut self) -> Instant {
        Instant::from_ticks(self.now_ns.get() / 1000)
    }
}

impl DelayNs for MockTimer {
    fn delay_ns(&mut self, ns: u32) {
        self.now_ns.set(self.now_ns.get() + u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.delay_ns(us.saturating_mul(1000));
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GpioEvent {
    Output(u8, Level),
    Input(u8),
}

#[derive(Debug, Default)]
struct Echo {
    holdoff_us: u64,
    width_us: u64,
    period_us: Option<u64>,
}

#[derive(Debug, Default)]
struct SimPin {
    output: Option<Level>,
    input_since_ns: u64,
    echo: Option<Echo>,
}

/// GPIO port simulating rangefinder echoes against the clock of a [`MockTimer`].
///
/// An echo starts `holdoff_us` after the pin is switched to an input.
#[derive(Debug)]
pub struct MockGpio {
    clock: Rc<Cell<u64>>,
    sampling_cost_ns: u64,
    pins: HashMap<u8, SimPin>,
    events: Vec<GpioEvent>,
    failing: Vec<u8>,
}

impl MockGpio {
    pub fn new(clock: Rc<Cell<u64>>) -> Self {
        Self {
            clock,
            sampling_cost_ns: 0,
            pins: HashMap::new(),
            events: Vec::new(),
            failing: Vec::new(),
        }
    }

    pub fn echo(&mut self, pin: u8, holdoff_us: u32, width_us: u32) {
        self.pins.entry(pin).or_default().echo = Some(Echo {
            holdoff_us: u64::from(holdoff_us),
            width_us: u64::from(width_us),
            period_us: None,
        });
    }

    /// Repeats the echo of `pin` every `period_us`.
    pub fn echo_repeat(&mut self, pin: u8, period_us: u32) {
        if let Some(echo) = self.pins.entry(pin).or_default().echo.as_mut() {
            echo.period_us = Some(u64::from(period_us));
        }
    }

    pub fn fail(&mut self, pin: u8) {
        self.failing.push(pin);
    }

    /// Makes every level sample take `us` of simulated time.
    pub fn sampling_cost(&mut self, us: u32) {
        self.sampling_cost_ns = u64::from(us) * 1000;
    }

    pub fn events(&self) -> Vec<GpioEvent> {
        self.events.clone()
    }

    fn check(&self, pin: u8) -> Result<(), MockError> {
        if self.failing.contains(&pin) {
            Err(MockError)
        } else {
            Ok(())
        }
    }
}

impl DigitalIo for MockGpio {
    type Error = MockError;

    fn set_output(&mut self, pin: u8, level: Level) -> Result<(), Self::Error> {
        self.check(pin)?;
        self.pins.entry(pin).or_default().output = Some(level);
        self.events.push(GpioEvent::Output(pin, level));
        Ok(())
    }

    fn set_input(&mut self, pin: u8) -> Result<(), Self::Error> {
        self.check(pin)?;
        let now_ns = self.clock.get();
        let sim = self.pins.entry(pin).or_default();
        sim.output = None;
        sim.input_since_ns = now_ns;
        self.events.push(GpioEvent::Input(pin));
        Ok(())
    }

    fn level(&mut self, pin: u8) -> Result<Level, Self::Error> {
        self.check(pin)?;
        let now_ns = self.clock.get() + self.sampling_cost_ns;
        self.clock.set(now_ns);
        let Some(sim) = self.pins.get(&pin) else {
            return Ok(Level::Low);
        };
        if let Some(level) = sim.output {
            return Ok(level);
        }
        let Some(echo) = &sim.echo else {
            return Ok(Level::Low);
        };

        let since_us = (now_ns - sim.input_since_ns) / 1000;
        let Some(mut in_echo_us) = since_us.checked_sub(echo.holdoff_us) else {
            return Ok(Level::Low);
        };
        if let Some(period_us) = echo.period_us {
            in_echo_us %= period_us;
        }

        Ok(Level::from(in_echo_us < echo.width_us))
    }
}

#[cfg(feature = "amg")]
pub use self::i2c::MockI2c;

#[cfg(feature = "amg")]
mod i2c {
    use std::collections::HashMap;

    use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

    use crate::amg::{AmgConfig, Vector3};

    /// I2C bus with register-mapped targets.
    ///
    /// Register pointers always auto-increment; the auto-increment flag is ignored.
    #[derive(Debug, Default)]
    pub struct MockI2c {
        targets: HashMap<u8, [u8; 256]>,
        failing: Vec<u8>,
        transactions: Vec<(u8, usize)>,
    }

    impl MockI2c {
        /// Returns a bus populated with an LSM303DLHC and an L3GD20 at their default
        /// addresses, with all samples zeroed.
        pub fn adafruit_9dof() -> Self {
            let config = AmgConfig::default();
            let mut i2c = Self::default();
            i2c.set_register(config.accel_address, 0x00, 0x00);
            i2c.set_register(config.mag_address, 0x0a, 0x48);
            i2c.set_register(config.mag_address, 0x0b, 0x34);
            i2c.set_register(config.mag_address, 0x0c, 0x33);
            i2c.set_register(config.gyro_address, 0x0f, 0xd4);
            i2c
        }

        pub fn set_register(&mut self, address: u8, register: u8, value: u8) {
            let registers = self.targets.entry(address).or_insert([0; 256]);
            registers[usize::from(register)] = value;
        }

        fn set_registers(&mut self, address: u8, first: u8, values: &[u8]) {
            for (register, value) in (first..).zip(values) {
                self.set_register(address, register, *value);
            }
        }

        pub fn set_accel(&mut self, sample: Vector3) {
            let address = AmgConfig::default().accel_address;
            let bytes: Vec<u8> = [sample.x, sample.y, sample.z]
                .into_iter()
                .flat_map(|axis| (i16::try_from(axis).unwrap() << 4).to_le_bytes())
                .collect();
            self.set_registers(address, 0x28, &bytes);
        }

        pub fn set_mag(&mut self, sample: Vector3) {
            let address = AmgConfig::default().mag_address;
            let bytes: Vec<u8> = [sample.x, sample.z, sample.y]
                .into_iter()
                .flat_map(|axis| i16::try_from(axis).unwrap().to_be_bytes())
                .collect();
            self.set_registers(address, 0x03, &bytes);
        }

        pub fn set_gyro(&mut self, sample: Vector3) {
            let address = AmgConfig::default().gyro_address;
            let bytes: Vec<u8> = [sample.x, sample.y, sample.z]
                .into_iter()
                .flat_map(|axis| i16::try_from(axis).unwrap().to_le_bytes())
                .collect();
            self.set_registers(address, 0x28, &bytes);
        }

        /// Makes the target at `address` stop acknowledging.
        pub fn fail(&mut self, address: u8) {
            self.failing.push(address);
        }

        /// Moves the target at `from` to `to`.
        pub fn move_device(&mut self, from: u8, to: u8) {
            if let Some(registers) = self.targets.remove(&from) {
                self.targets.insert(to, registers);
            }
        }

        /// Returns the target address and operation count of every transaction so far.
        pub fn transactions(&self) -> Vec<(u8, usize)> {
            self.transactions.clone()
        }

        pub fn clear_transactions(&mut self) {
            self.transactions.clear();
        }
    }

    impl ErrorType for MockI2c {
        type Error = ErrorKind;
    }

    impl I2c for MockI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            self.transactions.push((address, operations.len()));

            if self.failing.contains(&address) {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
            let Some(registers) = self.targets.get_mut(&address) else {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            };

            let mut pointer = 0_u8;
            for operation in operations {
                match operation {
                    Operation::Write(bytes) => {
                        let Some((register, values)) = bytes.split_first() else {
                            continue;
                        };
                        pointer = register & 0x7f;
                        for value in values {
                            registers[usize::from(pointer)] = *value;
                            pointer = pointer.wrapping_add(1);
                        }
                    }
                    Operation::Read(buffer) => {
                        for byte in buffer.iter_mut() {
                            *byte = registers[usize::from(pointer)];
                            pointer = pointer.wrapping_add(1);
                        }
                    }
                }
            }

            Ok(())
        }
    }
}
