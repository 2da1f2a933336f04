use crate::register::Pga;

/// A raw conversion result as shifted out of DOUT (two's complement).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AdcCode(pub u16);

impl AdcCode {
    /// LSB size in the ±0.256 V ranges used for thermocouples.
    pub const MILLIVOLT_PER_LSB: f64 = 7.8125 / 1000.0;

    /// Signed code, subtracting 2^16 when the sign bit is set.
    pub const fn signed(self) -> i32 {
        let raw = self.0 as i32;
        if raw & 0x8000 != 0 {
            raw - (1 << 16)
        } else {
            raw
        }
    }

    /// Signed code, negating the inverted-and-incremented magnitude when the sign bit is set.
    pub const fn signed_complement(self) -> i32 {
        let raw = self.0 as i32;
        if raw & 0x8000 != 0 {
            -((!raw & 0xffff) + 1)
        } else {
            raw
        }
    }

    /// Input voltage in millivolts for the given amplifier setting.
    pub fn millivolt(self, pga: Pga) -> f64 {
        self.signed() as f64 * pga.millivolt_per_lsb()
    }
}

impl From<u16> for AdcCode {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<i16> for AdcCode {
    fn from(value: i16) -> Self {
        Self(value as u16)
    }
}

impl From<AdcCode> for i16 {
    fn from(code: AdcCode) -> i16 {
        code.0 as i16
    }
}

impl From<AdcCode> for u16 {
    fn from(code: AdcCode) -> u16 {
        code.0
    }
}

/// Internal temperature sensor code: 14 bit, left-justified.
///
/// The firmware forwards the code as is. It is scaled without sign extension.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TemperatureCode(pub u16);

impl TemperatureCode {
    pub const CELSIUS_PER_LSB: f64 = 0.03125;

    /// Die temperature in degrees Celsius.
    pub fn celsius(self) -> f64 {
        (self.0 >> 2) as f64 * Self::CELSIUS_PER_LSB
    }
}
