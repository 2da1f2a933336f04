//! ADS1x18 configuration register
//!
//! Both parts share one 16-bit configuration register which is shifted in on DIN while the
//! previous conversion result is shifted out on DOUT. The ADS1018 left-justifies its 12-bit
//! results in the same 16-bit word.
use arbitrary_int::{u3, Number};
use bitbybit::{bitenum, bitfield};
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Input multiplexer setting.
#[bitenum(u3, exhaustive = true)]
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub enum Mux {
    Ain0Ain1 = 0b000,
    Ain0Ain3 = 0b001,
    Ain1Ain3 = 0b010,
    Ain2Ain3 = 0b011,
    Ain0 = 0b100,
    Ain1 = 0b101,
    Ain2 = 0b110,
    Ain3 = 0b111,
}

/// Programmable gain amplifier full-scale range.
#[bitenum(u3, exhaustive = true)]
#[derive(Debug, PartialEq, Serialize, Deserialize, Default)]
pub enum Pga {
    Fs6v144 = 0b000,
    Fs4v096 = 0b001,
    #[default]
    Fs2v048 = 0b010,
    Fs1v024 = 0b011,
    Fs0v512 = 0b100,
    Fs0v256 = 0b101,
    Fs0v256Alt1 = 0b110,
    Fs0v256Alt2 = 0b111,
}

impl Pga {
    /// Full-scale input range in volts.
    pub const fn full_scale(self) -> f64 {
        match self {
            Self::Fs6v144 => 6.144,
            Self::Fs4v096 => 4.096,
            Self::Fs2v048 => 2.048,
            Self::Fs1v024 => 1.024,
            Self::Fs0v512 => 0.512,
            Self::Fs0v256 | Self::Fs0v256Alt1 | Self::Fs0v256Alt2 => 0.256,
        }
    }

    /// Millivolts per LSB of a 16-bit (or left-justified 12-bit) code.
    pub fn millivolt_per_lsb(self) -> f64 {
        self.full_scale() * 1e3 / (1u32 << 15) as f64
    }
}

/// Data rate setting. The sample rate depends on the [Chip].
#[bitenum(u3, exhaustive = true)]
#[derive(Debug, PartialEq, Serialize, Deserialize, Default)]
pub enum DataRate {
    Dr0 = 0b000,
    Dr1 = 0b001,
    Dr2 = 0b010,
    Dr3 = 0b011,
    #[default]
    Dr4 = 0b100,
    Dr5 = 0b101,
    Dr6 = 0b110,
    Dr7 = 0b111,
}

/// Only `Valid` updates the register, all other patterns discard the written word.
#[bitenum(u2, exhaustive = true)]
#[derive(Debug, PartialEq)]
pub enum Nop {
    Invalid0 = 0b00,
    Valid = 0b01,
    Invalid2 = 0b10,
    Invalid3 = 0b11,
}

#[bitfield(u16, default = 0x058b)]
#[derive(Debug, PartialEq)]
pub struct Config {
    #[bit(0, rw)]
    pub reserved: bool,
    #[bits(1..=2, rw)]
    pub nop: Nop,
    #[bit(3, rw)]
    pub pull_up: bool,
    /// Convert the internal temperature sensor instead of the MUX input.
    #[bit(4, rw)]
    pub temperature: bool,
    #[bits(5..=7, rw)]
    pub data_rate: DataRate,
    #[bit(8, rw)]
    pub single_shot: bool,
    #[bits(9..=11, rw)]
    pub pga: Pga,
    #[bits(12..=14, rw)]
    pub mux: Mux,
    #[bit(15, rw)]
    pub start: bool,
}

impl Config {
    /// Continuous conversion of the internal temperature sensor.
    pub fn temperature_sensor(data_rate: DataRate) -> Self {
        Self::default()
            .with_single_shot(false)
            .with_temperature(true)
            .with_data_rate(data_rate)
    }

    /// Continuous conversion of a differential or single-ended input.
    pub fn input(mux: Mux, pga: Pga, data_rate: DataRate) -> Self {
        Self::default()
            .with_single_shot(false)
            .with_temperature(false)
            .with_mux(mux)
            .with_pga(pga)
            .with_data_rate(data_rate)
    }
}

/// Analog input selection of one channel.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Input {
    pub mux: Mux,
    pub pga: Pga,
    pub data_rate: DataRate,
}

impl Input {
    pub fn config(&self) -> Config {
        Config::input(self.mux, self.pga, self.data_rate)
    }
}

/// Supported parts.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    TryFromPrimitive,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Chip {
    #[strum(serialize = "ADS1018")]
    Ads1018 = 0,
    #[default]
    #[strum(serialize = "ADS1118")]
    Ads1118 = 1,
}

impl Chip {
    /// ADC resolution in bits.
    pub const fn precision(self) -> u8 {
        match self {
            Self::Ads1018 => 12,
            Self::Ads1118 => 16,
        }
    }

    /// Samples per second for each [DataRate] setting, 0 where reserved.
    pub const fn sample_rates(self) -> [u16; 8] {
        match self {
            Self::Ads1018 => [128, 250, 490, 920, 1600, 2400, 3300, 0],
            Self::Ads1118 => [8, 16, 32, 64, 128, 250, 475, 860],
        }
    }

    /// Samples per second of the `data_rate` setting.
    pub fn samples_per_second(self, data_rate: DataRate) -> Option<u16> {
        match self.sample_rates()[data_rate.raw_value().value() as usize] {
            0 => None,
            sps => Some(sps),
        }
    }

    /// The [DataRate] converting at `sps` samples per second.
    pub fn data_rate(self, sps: u16) -> Option<DataRate> {
        self.sample_rates()
            .iter()
            .position(|&rate| rate != 0 && rate == sps)
            .map(|i| DataRate::new_with_raw_value(u3::new(i as u8)))
    }

    /// Validate a raw data rate field against this part.
    pub fn validate_data_rate(self, raw: u32) -> Result<DataRate, ConfigError> {
        let data_rate = DataRate::new_with_raw_value(field("dr", raw)?);
        self.samples_per_second(data_rate)
            .map(|_| data_rate)
            .ok_or(ConfigError::Range {
                field: "dr",
                value: raw,
            })
    }
}

/// Range check a raw 3-bit register field.
pub fn field(name: &'static str, raw: u32) -> Result<u3, ConfigError> {
    if raw > u3::MAX.value() as u32 {
        return Err(ConfigError::Range {
            field: name,
            value: raw,
        });
    }
    Ok(u3::new(raw as u8))
}
