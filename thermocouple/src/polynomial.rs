/// Evaluate the power series `sum(coefficients[i] * x^i)`.
///
/// Horner's scheme, highest order first.
pub fn polynomial(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |accu, c| accu * x + c)
}
