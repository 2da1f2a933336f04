//! Host-side collaborators
//!
//! The device is driven by an MCU transport and a sensor registry owned by the host runtime.
//! These traits describe the part of their interfaces the driver uses.
use core::fmt::{self, Write};

use serde::{Deserialize, Serialize};

use crate::{
    register::{Chip, DataRate, Input},
    Error,
};

/// Response message tag routed to [crate::Device::handle_response].
///
/// Earlier host drivers listened for `ads1118_result`; the firmware must send this name.
pub const RESPONSE: &str = "ads1x18_result";

/// Interval between firmware responses in milliseconds.
pub const RESPONSE_INTERVAL: u32 = 200;

/// MCU object identifier.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Oid(pub u8);

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The SPI bus object the device talks through. Owned by exactly one device.
#[derive(Debug, PartialEq, Eq)]
pub struct Spi {
    oid: Oid,
}

impl Spi {
    pub fn new(oid: Oid) -> Self {
        Self { oid }
    }

    pub fn oid(&self) -> Oid {
        self.oid
    }
}

/// The MCU transport.
pub trait Mcu {
    /// Allocate a new object identifier.
    fn create_oid(&mut self) -> Oid;

    /// Queue a command sent while the MCU is being configured.
    fn add_config_cmd(&mut self, cmd: &str);

    /// Route responses tagged `name` for `oid` to the device.
    fn register_response(&mut self, name: &'static str, oid: Oid);

    /// Request a `build_config()` call for `oid` once all objects are created.
    fn register_config_callback(&mut self, oid: Oid);

    /// Convert a duration to MCU clock ticks.
    fn seconds_to_clock(&self, seconds: f64) -> u64;

    /// Convert a host monotonic time to print time.
    fn estimated_print_time(&self, eventtime: f64) -> f64;
}

/// Host monotonic clock in seconds.
pub trait Clock {
    fn monotonic(&self) -> f64;
}

/// Which sensor kind a registered factory creates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Factory {
    Thermocouple,
    Internal,
}

/// The temperature sensor registry.
pub trait SensorFactories {
    /// Register a sensor type `name` created by `factory`.
    ///
    /// Fails with [crate::ConfigError::Duplicate] if `name` is taken.
    fn add_sensor_factory(
        &mut self,
        name: &str,
        factory: Factory,
    ) -> Result<(), Error>;
}

/// One `ads1x18_result` response.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Sensor index, 0 for the die temperature.
    pub sensor: u8,
    /// Conversion code of the sensor's input.
    pub value: u16,
    /// Latest die temperature code.
    pub temperature: u16,
}

pub type CommandString = heapless::String<96>;

/// Configuration commands.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    Config {
        oid: Oid,
        spi_oid: Oid,
        chip: Chip,
        data_rate: DataRate,
        response_interval: u32,
    },
    AddSensor {
        oid: Oid,
        input: Input,
    },
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config {
                oid,
                spi_oid,
                chip,
                data_rate,
                response_interval,
            } => write!(
                f,
                "config_ads1x18 oid={oid} spi_oid={spi_oid} chip_type={} data_rate={} response_interval={response_interval}",
                *chip as u8,
                data_rate.raw_value().value(),
            ),
            // Formerly sent as `ads_sensor_ads1x18`.
            Self::AddSensor { oid, input } => write!(
                f,
                "add_sensor_ads1x18 oid={oid} mux={} pga={} dr={}",
                input.mux.raw_value().value(),
                input.pga.raw_value().value(),
                input.data_rate.raw_value().value(),
            ),
        }
    }
}

impl Command {
    pub fn format(&self) -> Result<CommandString, Error> {
        let mut cmd = CommandString::new();
        write!(cmd, "{self}")?;
        Ok(cmd)
    }
}
