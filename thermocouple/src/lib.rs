#![cfg_attr(not(test), no_std)]

mod polynomial;
pub use polynomial::*;
mod type_k;
pub use type_k::*;

#[cfg(test)]
pub mod testing;

/// Conversion between thermocouple EMF and temperature.
///
/// EMF is in millivolts and referenced to a 0 °C junction, temperatures are in degrees Celsius.
pub trait Thermocouple {
    /// Thermoelectric voltage of a junction at `celsius`.
    fn millivolt(&self, celsius: f64) -> f64;

    /// Junction temperature producing `millivolt`.
    fn celsius(&self, millivolt: f64) -> f64;

    /// Cold-junction compensation.
    ///
    /// # Args
    /// * `measured` - Differential voltage across the thermocouple leads in millivolts.
    /// * `cold_junction` - Temperature of the lead/copper junction in degrees Celsius.
    ///
    /// # Returns
    /// Temperature of the hot junction in degrees Celsius.
    fn compensate(&self, measured: f64, cold_junction: f64) -> f64 {
        self.celsius(measured + self.millivolt(cold_junction))
    }
}
