//! Type K (chromel/alumel) reference functions, NIST ITS-90.
use super::{polynomial, Thermocouple};
use num_traits::float::Float;

/// EMF polynomial for -270 °C to 0 °C, coefficient `i` multiplies `t^i`.
pub const EMF_SUB_ZERO: [f64; 11] = [
    0.0,
    0.394501280250e-1,
    0.236223735980e-4,
    -0.328589067840e-6,
    -0.499048287770e-8,
    -0.675090591730e-10,
    -0.574103274280e-12,
    -0.310888728940e-14,
    -0.104516093650e-16,
    -0.198892668780e-19,
    -0.163226974860e-22,
];

/// EMF polynomial for 0 °C to 1372 °C.
pub const EMF_ABOVE_ZERO: [f64; 10] = [
    -0.176004136860e-1,
    0.389212049750e-1,
    0.185587700320e-4,
    -0.994575928740e-7,
    0.318409457190e-9,
    -0.560728448890e-12,
    0.560750590590e-15,
    -0.320207200030e-18,
    0.971511471520e-22,
    -0.121047212750e-25,
];

/// Gaussian term `a0 * exp(a1 * (t - a2)^2)` added above 0 °C.
pub const EMF_EXPONENTIAL: [f64; 3] =
    [0.1185976, -0.118343200000e-3, 0.126968600000e3];

/// Inverse polynomial for -5.891 mV to 0 mV (-200 °C to 0 °C).
pub const TEMPERATURE_SUB_ZERO: [f64; 9] = [
    0.0,
    2.5173462e1,
    -1.1662878,
    -1.0833638,
    -8.9773540e-1,
    -3.7342377e-1,
    -8.6632643e-2,
    -1.0450598e-2,
    -5.1920577e-4,
];

/// Inverse polynomial for 0 mV to 20.644 mV (0 °C to 500 °C).
pub const TEMPERATURE_SUB_500: [f64; 10] = [
    0.0,
    2.508355e1,
    7.860106e-2,
    -2.503131e-1,
    8.315270e-2,
    -1.228034e-2,
    9.804036e-4,
    -4.413030e-5,
    1.057734e-6,
    -1.052755e-8,
];

/// Inverse polynomial for 20.644 mV to 54.886 mV (500 °C to 1372 °C).
pub const TEMPERATURE_ABOVE_500: [f64; 7] = [
    -1.318058e2,
    4.830222e1,
    -1.646031,
    5.464731e-2,
    -9.650715e-4,
    8.802193e-6,
    -3.110810e-8,
];

/// EMF at 500 °C where the two upper inverse polynomials meet.
pub const BREAKPOINT_500: f64 = 20.644;

/// Type K thermocouple.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeK;

impl TypeK {
    /// EMF in millivolts of a junction at `celsius`.
    pub fn celsius_to_millivolt(celsius: f64) -> f64 {
        if celsius <= 0.0 {
            polynomial(&EMF_SUB_ZERO, celsius)
        } else {
            let [a0, a1, a2] = EMF_EXPONENTIAL;
            let d = celsius - a2;
            polynomial(&EMF_ABOVE_ZERO, celsius) + a0 * (a1 * d * d).exp()
        }
    }

    /// Temperature in degrees Celsius of a junction producing `millivolt`.
    ///
    /// Outside -5.891 mV..54.886 mV the result is an extrapolation.
    pub fn millivolt_to_celsius(millivolt: f64) -> f64 {
        let coefficients: &[f64] = if millivolt < 0.0 {
            &TEMPERATURE_SUB_ZERO
        } else if millivolt < BREAKPOINT_500 {
            &TEMPERATURE_SUB_500
        } else {
            &TEMPERATURE_ABOVE_500
        };
        polynomial(coefficients, millivolt)
    }
}

impl Thermocouple for TypeK {
    fn millivolt(&self, celsius: f64) -> f64 {
        Self::celsius_to_millivolt(celsius)
    }

    fn celsius(&self, millivolt: f64) -> f64 {
        Self::millivolt_to_celsius(millivolt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::isclose;

    #[test]
    fn zero() {
        assert_eq!(TypeK::celsius_to_millivolt(0.0), 0.0);
        assert_eq!(TypeK::millivolt_to_celsius(0.0), 0.0);
    }

    #[test]
    fn reference_table() {
        // NIST ITS-90 Type K table values, 1 µV resolution.
        for (t, mv) in [
            (-200.0, -5.891),
            (-100.0, -3.554),
            (25.0, 1.000),
            (100.0, 4.096),
            (300.0, 12.209),
            (500.0, 20.644),
            (1000.0, 41.276),
        ] {
            let have = TypeK::celsius_to_millivolt(t);
            assert!(isclose(have, mv, 0.0, 1e-3), "{t} °C: {have} mV");
            let have = TypeK::millivolt_to_celsius(mv);
            assert!(isclose(have, t, 0.0, 0.1), "{mv} mV: {have} °C");
        }
    }

    #[test]
    fn forward_continuous_at_zero() {
        let below = TypeK::celsius_to_millivolt(-1e-9);
        let above = TypeK::celsius_to_millivolt(1e-9);
        assert!(isclose(below, above, 0.0, 1e-6));
    }

    #[test]
    fn inverse_continuous_at_breakpoints() {
        for v in [0.0, BREAKPOINT_500] {
            let below = TypeK::millivolt_to_celsius(v - 1e-9);
            let above = TypeK::millivolt_to_celsius(v);
            assert!(isclose(below, above, 0.0, 0.05), "{v}: {below} {above}");
        }
    }

    #[test]
    fn compensate() {
        let tc = TypeK;
        // No differential voltage: the hot junction sits at the cold junction temperature.
        assert!(isclose(tc.compensate(0.0, 25.0), 25.0, 0.0, 0.1));
        let want = TypeK::millivolt_to_celsius(
            0.78125 + TypeK::celsius_to_millivolt(25.0),
        );
        assert_eq!(tc.compensate(0.78125, 25.0), want);
    }
}
