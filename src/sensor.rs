//! Logical temperature sensors
//!
//! A sensor turns the conversion results of its channel into temperatures and reports them to
//! the callback the heater registry installs. The internal sensor reports the die temperature,
//! a Type K sensor the cold-junction compensated thermocouple temperature.
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thermocouple::{Thermocouple, TypeK};

use crate::{
    convert::{AdcCode, TemperatureCode},
    register::Pga,
    ConfigError,
};

/// Minimum reporting interval of the internal sensor in seconds.
pub const REPORT_TIME: f64 = 0.600;

/// Minimum reporting interval of a thermocouple sensor in seconds.
pub const THERMOCOUPLE_REPORT_TIME: f64 = 1.0;

/// Cold-junction temperature assumed by default in degrees Celsius.
pub const AMBIENT: f64 = 25.0;

/// Receives `(print_time, celsius)` readings.
pub trait Report {
    fn report(&mut self, time: f64, celsius: f64);
}

impl<F: FnMut(f64, f64)> Report for F {
    fn report(&mut self, time: f64, celsius: f64) {
        self(time, celsius)
    }
}

/// Reference temperature for cold-junction compensation.
///
/// The die sits next to the lead junctions but often runs warmer than them, which is why a fixed
/// ambient is the default.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ColdJunction {
    /// Fixed temperature in degrees Celsius.
    Fixed(f64),
    /// Die temperature reported with the conversion.
    Internal,
}

impl Default for ColdJunction {
    fn default() -> Self {
        Self::Fixed(AMBIENT)
    }
}

impl ColdJunction {
    /// Reference temperature given the current die temperature.
    pub fn celsius(&self, die: f64) -> f64 {
        match self {
            Self::Fixed(t) => *t,
            Self::Internal => die,
        }
    }
}

impl FromStr for ColdJunction {
    type Err = ConfigError;

    /// `internal` or a temperature in degrees Celsius.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("internal") {
            return Ok(Self::Internal);
        }
        s.parse()
            .map(Self::Fixed)
            .map_err(|_| ConfigError::Invalid("cold_junction"))
    }
}

/// One conversion result as routed to the sensors of a channel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Reading {
    /// Print time of the response.
    pub time: f64,
    /// Conversion code of the channel input.
    pub code: AdcCode,
    /// Amplifier setting the code was taken with.
    pub pga: Pga,
    /// Die temperature in degrees Celsius.
    pub die: f64,
}

impl Reading {
    pub fn new(time: f64, code: AdcCode, pga: Pga, die: TemperatureCode) -> Self {
        Self {
            time,
            code,
            pga,
            die: die.celsius(),
        }
    }
}

pub struct Internal<R> {
    callback: Option<R>,
}

impl<R> Default for Internal<R> {
    fn default() -> Self {
        Self { callback: None }
    }
}

pub struct ThermocoupleK<R> {
    callback: Option<R>,
    range: Option<(f64, f64)>,
    cold_junction: ColdJunction,
}

impl<R> ThermocoupleK<R> {
    pub fn new(cold_junction: ColdJunction) -> Self {
        Self {
            callback: None,
            range: None,
            cold_junction,
        }
    }

    pub fn cold_junction(&self) -> ColdJunction {
        self.cold_junction
    }

    /// Compensated hot junction temperature in degrees Celsius.
    pub fn temperature(&self, reading: &Reading) -> f64 {
        TypeK.compensate(
            reading.code.millivolt(reading.pga),
            self.cold_junction.celsius(reading.die),
        )
    }
}

pub enum Sensor<R> {
    Internal(Internal<R>),
    ThermocoupleK(ThermocoupleK<R>),
}

impl<R> Sensor<R> {
    /// Set the valid temperature range. The internal sensor has its own.
    pub fn set_reporting_range(&mut self, min: f64, max: f64) {
        if let Self::ThermocoupleK(tc) = self {
            tc.range = Some((min, max));
        }
    }

    pub fn range(&self) -> Option<(f64, f64)> {
        match self {
            Self::Internal(_) => None,
            Self::ThermocoupleK(tc) => tc.range,
        }
    }

    pub fn set_reporting_callback(&mut self, callback: R) {
        match self {
            Self::Internal(s) => s.callback = Some(callback),
            Self::ThermocoupleK(s) => s.callback = Some(callback),
        }
    }

    /// Minimum interval between reports in seconds.
    pub fn report_time_delta(&self) -> f64 {
        match self {
            Self::Internal(_) => REPORT_TIME,
            Self::ThermocoupleK(_) => THERMOCOUPLE_REPORT_TIME,
        }
    }

    /// Temperature in degrees Celsius for `reading`.
    pub fn temperature(&self, reading: &Reading) -> f64 {
        match self {
            Self::Internal(_) => reading.die,
            Self::ThermocoupleK(tc) => tc.temperature(reading),
        }
    }

    /// Whether `celsius` lies outside the reporting range.
    pub fn out_of_range(&self, celsius: f64) -> bool {
        self.range()
            .is_some_and(|(min, max)| !(min..=max).contains(&celsius))
    }
}

impl<R: Report> Sensor<R> {
    /// Convert `reading` and report it to the callback, if one is set.
    ///
    /// Returns the temperature.
    pub fn update(&mut self, reading: &Reading) -> f64 {
        let celsius = self.temperature(reading);
        let callback = match self {
            Self::Internal(s) => s.callback.as_mut(),
            Self::ThermocoupleK(s) => s.callback.as_mut(),
        };
        if let Some(callback) = callback {
            callback.report(reading.time, celsius);
        }
        celsius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    type Log = Vec<(f64, f64)>;

    fn reading(value: u16, die: f64) -> Reading {
        Reading {
            time: 12.5,
            code: AdcCode(value),
            pga: Pga::Fs0v256,
            die,
        }
    }

    #[test]
    fn internal_reports_die() {
        let mut log = Log::new();
        {
            let mut sensor = Sensor::Internal(Internal::default());
            sensor.set_reporting_range(0.0, 10.0);
            assert_eq!(sensor.range(), None);
            sensor.set_reporting_callback(|t: f64, c: f64| log.push((t, c)));
            assert_eq!(sensor.update(&reading(0xffff, 31.25)), 31.25);
            assert_eq!(sensor.report_time_delta(), REPORT_TIME);
        }
        assert_eq!(log, [(12.5, 31.25)]);
    }

    #[test]
    fn thermocouple_fixed_reference() {
        let mut log = Log::new();
        {
            let mut sensor =
                Sensor::ThermocoupleK(ThermocoupleK::new(ColdJunction::default()));
            sensor.set_reporting_callback(|t: f64, c: f64| log.push((t, c)));
            // The die temperature does not enter with a fixed reference.
            let a = sensor.update(&reading(100, 33.0));
            let b = sensor.update(&reading(100, 20.0));
            assert_eq!(a, b);
            assert_eq!(sensor.report_time_delta(), THERMOCOUPLE_REPORT_TIME);
        }
        let want = TypeK::millivolt_to_celsius(
            100.0 * 7.8125 / 1000.0 + TypeK::celsius_to_millivolt(25.0),
        );
        assert_eq!(log.len(), 2);
        assert!((log[0].1 - want).abs() < 1e-9);
    }

    #[test]
    fn thermocouple_internal_reference() {
        let sensor: Sensor<fn(f64, f64)> =
            Sensor::ThermocoupleK(ThermocoupleK::new(ColdJunction::Internal));
        // Zero differential voltage: the hot junction is at the die temperature.
        let t = sensor.temperature(&reading(0, 33.0));
        assert!((t - 33.0).abs() < 0.1, "{t}");
    }

    #[test]
    fn without_callback() {
        let mut sensor: Sensor<fn(f64, f64)> =
            Sensor::ThermocoupleK(ThermocoupleK::new(ColdJunction::default()));
        let t = sensor.update(&reading(0, 0.0));
        assert!((t - 25.0).abs() < 0.1);
    }

    #[test]
    fn range() {
        let mut sensor: Sensor<fn(f64, f64)> =
            Sensor::ThermocoupleK(ThermocoupleK::new(ColdJunction::default()));
        assert!(!sensor.out_of_range(1e6));
        sensor.set_reporting_range(0.0, 300.0);
        assert_eq!(sensor.range(), Some((0.0, 300.0)));
        assert!(!sensor.out_of_range(300.0));
        assert!(sensor.out_of_range(-0.5));
    }

    #[test]
    fn cold_junction_parse() {
        assert_eq!(
            "internal".parse::<ColdJunction>(),
            Ok(ColdJunction::Internal)
        );
        assert_eq!(
            " 30.5 ".parse::<ColdJunction>(),
            Ok(ColdJunction::Fixed(30.5))
        );
        assert_eq!(
            "warm".parse::<ColdJunction>(),
            Err(ConfigError::Invalid("cold_junction"))
        );
    }
}
