//! Unit conversions between acoustic quantities.

use std::f64::consts::PI;

/// Convert a power-law absorption coefficient from dB/(MHz^y cm) to
/// Np/((rad/s)^y m).
pub fn db_to_neper(alpha: f64, y: f64) -> f64 {
    100.0 * alpha * (1e-6 / (2.0 * PI)).powf(y) / (20.0 * std::f64::consts::E.log10())
}

/// Recover pressure from the split acoustic density components of a
/// first-order solver: `p = c² · Σ ρ_axis`.
///
/// `components` holds one slice per axis, each the same length as
/// `sound_speed_sq`.
pub fn pressure_from_density(components: &[&[f64]], sound_speed_sq: impl Fn(usize) -> f64) -> Vec<f64> {
    let n = components.first().map_or(0, |c| c.len());
    (0..n)
        .map(|i| sound_speed_sq(i) * components.iter().map(|c| c[i]).sum::<f64>())
        .collect()
}
