//! Band-limiting of initial conditions.
//!
//! A sharp initial pressure (a single voxel, say) excites every spatial
//! frequency up to Nyquist, which a pseudospectral solver renders with
//! Gibbs ringing. Smoothing multiplies the spectrum by a radially symmetric
//! Blackman window and rescales the result to the input's peak magnitude.

use std::f64::consts::PI;

use sonus_core::{Field3, FieldError, GridSpec};

use crate::spectral::Spectral3;

/// Centred Blackman window, `1` at `r = 0` and `0` for `r >= 1`.
pub fn blackman(r: f64) -> f64 {
    if r >= 1.0 {
        0.0
    } else {
        0.42 + 0.5 * (PI * r).cos() + 0.08 * (2.0 * PI * r).cos()
    }
}

/// The window value at every grid point, in FFT order.
///
/// The radial coordinate is `sqrt(Σ (m_a / (N_a / 2))²)` over active axes,
/// with `m_a` the signed frequency index.
pub fn radial_window(grid: &GridSpec) -> Vec<f64> {
    let shape = grid.shape();
    (0..grid.cell_count())
        .map(|idx| {
            let c = grid.coords(idx);
            let r2: f64 = (0..3)
                .filter(|&a| grid.is_active(a))
                .map(|a| {
                    let n = shape[a];
                    let m = if c[a] < n.div_ceil(2) {
                        c[a] as f64
                    } else {
                        c[a] as f64 - n as f64
                    };
                    (m / (n as f64 / 2.0)).powi(2)
                })
                .sum();
            blackman(r2.sqrt())
        })
        .collect()
}

/// Smooth `field` with a Blackman window in k-space.
///
/// With `restore_max` the result is rescaled so its largest magnitude
/// equals the input's. A zero field is returned unchanged.
///
/// # Errors
///
/// Returns [`FieldError::ShapeMismatch`] if `field` is not shaped like the
/// grid `fft` was planned for.
pub fn smooth(field: &Field3, fft: &Spectral3, restore_max: bool) -> Result<Field3, FieldError> {
    field.check_shape(fft.grid().shape())?;
    let window = radial_window(fft.grid());
    let mut spectrum = fft.forward(field.as_slice());
    for (s, w) in spectrum.iter_mut().zip(&window) {
        *s *= *w;
    }
    let mut data = fft.inverse_real(spectrum);
    if restore_max {
        let before = field.max_abs();
        let after = data.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        if after > 0.0 {
            let scale = before / after;
            data.iter_mut().for_each(|v| *v *= scale);
        }
    }
    Field3::from_vec(field.shape(), data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blackman_endpoints() {
        assert!((blackman(0.0) - 1.0).abs() < 1e-15);
        assert_eq!(blackman(1.0), 0.0);
        assert!(blackman(0.5) > 0.0 && blackman(0.5) < 1.0);
    }

    #[test]
    fn window_keeps_dc() {
        let grid = GridSpec::new([8, 8, 8], [1.0; 3]).unwrap();
        let w = radial_window(&grid);
        assert!((w[0] - 1.0).abs() < 1e-15);
        // The Nyquist corner is fully suppressed.
        assert_eq!(w[grid.index(4, 4, 4)], 0.0);
    }

    #[test]
    fn smoothing_constant_is_identity() {
        let grid = GridSpec::new([6, 6, 1], [1.0; 3]).unwrap();
        let fft = Spectral3::new(&grid);
        let f = Field3::filled([6, 6, 1], 3.0);
        let s = smooth(&f, &fft, false).unwrap();
        for v in s.as_slice() {
            assert!((v - 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn smoothing_impulse_spreads_and_restores_peak() {
        let grid = GridSpec::new([8, 8, 8], [1.0; 3]).unwrap();
        let fft = Spectral3::new(&grid);
        let mut f = Field3::zeros([8, 8, 8]);
        f.set(4, 4, 4, 1.0);
        let s = smooth(&f, &fft, true).unwrap();
        assert!((s.max_abs() - 1.0).abs() < 1e-12);
        assert!(s.get(4, 4, 5).abs() > 0.0);
        assert!(s.energy() > 1.0);
    }

    #[test]
    fn smoothing_zero_field_stays_zero() {
        let grid = GridSpec::new([4, 4, 4], [1.0; 3]).unwrap();
        let fft = Spectral3::new(&grid);
        let s = smooth(&Field3::zeros([4, 4, 4]), &fft, true).unwrap();
        assert!(s.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn field_from_another_grid_is_rejected() {
        let grid = GridSpec::new([4, 4, 4], [1.0; 3]).unwrap();
        let fft = Spectral3::new(&grid);
        let f = Field3::filled([4, 4, 2], 1.0);
        assert_eq!(
            smooth(&f, &fft, true),
            Err(FieldError::ShapeMismatch {
                expected: [4, 4, 4],
                actual: [4, 4, 2]
            })
        );
    }
}
