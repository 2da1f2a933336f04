#![cfg_attr(not(test), no_std)]
//! ADS1018/ADS1118 temperature front-end
//!
//! Decodes conversion results of the ADS1x18 delta-sigma ADC into internal die and Type K
//! thermocouple temperatures and routes them to the sensors configured on each channel.

pub mod config;
pub mod convert;
pub mod device;
pub mod driver;
mod error;
pub mod mcu;
pub mod register;
pub mod sensor;
mod sink;

pub use config::{ChannelConfig, ConfigSection, DeviceConfig};
pub use device::{Device, SensorId};
pub use error::{ConfigError, Error};
pub use sink::GlobalLogger;
pub use thermocouple;
