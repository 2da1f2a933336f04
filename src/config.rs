//! Device and channel configuration
//!
//! Configuration arrives as sections of string options. A device section is named
//! `ads1x18 <name>` and may set `chip`, `data_rate` and `cold_junction`. Each thermocouple
//! section selects its input with `ads1x18_mux`, `ads1x18_pga` and `ads1x18_dr`; register
//! values may be written in any base (`0b011`, `0x3`, `3`).
use miniconf::{Leaf, Tree};
use serde::{Deserialize, Serialize};

use crate::{
    register::{field, Chip, DataRate, Input, Mux, Pga},
    sensor::ColdJunction,
    ConfigError,
};

/// A user configuration section.
pub trait ConfigSection {
    /// Full section name, e.g. `ads1x18 my_adc`.
    fn name(&self) -> &str;

    /// Raw value of `option`.
    fn get(&self, option: &str) -> Option<&str>;
}

/// Parse an unsigned integer literal with optional `0b`, `0o` or `0x` prefix.
///
/// Decimal literals may not have leading zeros. Single `_` separate digits.
pub fn parse_int(value: &str) -> Option<u32> {
    let value = value.trim();
    let (digits, radix) = match value.get(..2) {
        Some("0b" | "0B") => (&value[2..], 2),
        Some("0o" | "0O") => (&value[2..], 8),
        Some("0x" | "0X") => (&value[2..], 16),
        _ => (value, 10),
    };
    if digits.is_empty()
        || digits.ends_with('_')
        || digits.contains("__")
        || (radix == 10 && digits.starts_with('_'))
    {
        return None;
    }
    if radix == 10
        && digits.starts_with('0')
        && digits.bytes().any(|b| b != b'0' && b != b'_')
    {
        return None;
    }
    digits
        .chars()
        .filter(|&c| c != '_')
        .try_fold(0u32, |accu, c| {
            accu.checked_mul(radix)?.checked_add(c.to_digit(radix)?)
        })
}

fn option<'a>(
    section: &'a impl ConfigSection,
    names: &[&'static str],
) -> Option<&'a str> {
    names.iter().find_map(|name| section.get(name))
}

fn int(
    section: &impl ConfigSection,
    names: &[&'static str],
) -> Result<Option<u32>, ConfigError> {
    option(section, names)
        .map(|v| parse_int(v).ok_or(ConfigError::Invalid(names[0])))
        .transpose()
}

/// The device name: the second word of the section name.
pub fn device_name(section: &impl ConfigSection) -> Result<&str, ConfigError> {
    section
        .name()
        .split_whitespace()
        .nth(1)
        .ok_or(ConfigError::Name)
}

#[derive(Clone, Debug, PartialEq, Tree, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Part on the bus.
    pub chip: Leaf<Chip>,

    /// Data rate code (0-7) of the internal temperature conversions.
    pub data_rate: Leaf<u8>,

    /// Cold-junction reference of the thermocouple channels.
    pub cold_junction: Leaf<ColdJunction>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            chip: Leaf(Chip::Ads1118),
            data_rate: Leaf(0b100),
            cold_junction: Leaf(ColdJunction::default()),
        }
    }
}

impl DeviceConfig {
    pub fn from_section(
        section: &impl ConfigSection,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(chip) = section.get("chip") {
            *config.chip = chip
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("chip"))?;
        }
        if let Some(data_rate) = int(section, &["data_rate"])? {
            *config.data_rate = u8::try_from(data_rate).map_err(|_| {
                ConfigError::Range {
                    field: "data_rate",
                    value: data_rate,
                }
            })?;
        }
        if let Some(cold_junction) = section.get("cold_junction") {
            *config.cold_junction = cold_junction.parse()?;
        }
        config.data_rate()?;
        Ok(config)
    }

    /// The validated data rate setting.
    pub fn data_rate(&self) -> Result<DataRate, ConfigError> {
        self.chip.validate_data_rate(*self.data_rate as u32)
    }
}

/// Raw register fields of a thermocouple channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChannelConfig {
    pub mux: u32,
    pub pga: u32,
    pub dr: u32,
}

impl ChannelConfig {
    pub fn from_section(
        section: &impl ConfigSection,
    ) -> Result<Self, ConfigError> {
        let required = |names: &[&'static str]| {
            int(section, names)?.ok_or(ConfigError::Missing(names[0]))
        };
        Ok(Self {
            mux: required(&["ads1x18_mux", "ads1118_mux"])?,
            pga: required(&["ads1x18_pga", "ads1118_pga"])?,
            dr: required(&["ads1x18_dr", "ads1118_dr"])?,
        })
    }

    /// Check the fields against the register layout and the part's data rates.
    pub fn validate(&self, chip: Chip) -> Result<Input, ConfigError> {
        Ok(Input {
            mux: Mux::new_with_raw_value(field("mux", self.mux)?),
            pga: Pga::new_with_raw_value(field("pga", self.pga)?),
            data_rate: chip.validate_data_rate(self.dr)?,
        })
    }
}
