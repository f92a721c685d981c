//! Separable 3-D FFTs and staggered spectral derivatives.
//!
//! Transforms are done axis by axis with `rustfft`: each line along the
//! axis is gathered into a contiguous buffer, transformed, and scattered
//! back. Degenerate axes (one point) are skipped, which makes the 1-D and
//! 2-D cases free.

use std::f64::consts::PI;
use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use sonus_core::GridSpec;

/// Wavenumbers for an axis of `n` points with spacing `dx`, in FFT order.
///
/// Index `m` maps to `2π m / (n dx)`; indices at or past `ceil(n / 2)`
/// wrap to `m - n`, so for even `n` the Nyquist term is negative.
pub fn wavenumbers(n: usize, dx: f64) -> Vec<f64> {
    let dk = 2.0 * PI / (n as f64 * dx);
    let half = n.div_ceil(2);
    (0..n)
        .map(|m| {
            let signed = if m < half { m as i64 } else { m as i64 - n as i64 };
            signed as f64 * dk
        })
        .collect()
}

/// Wavenumbers for every axis of `grid`; degenerate axes get `[0.0]`.
fn axis_wavenumbers(grid: &GridSpec) -> [Vec<f64>; 3] {
    let shape = grid.shape();
    let spacing = grid.spacing();
    std::array::from_fn(|a| {
        if grid.is_active(a) {
            wavenumbers(shape[a], spacing[a])
        } else {
            vec![0.0]
        }
    })
}

/// `|k|` at every grid point, in FFT order.
pub fn wavenumber_magnitude(grid: &GridSpec) -> Vec<f64> {
    let k = axis_wavenumbers(grid);
    (0..grid.cell_count())
        .map(|idx| {
            let c = grid.coords(idx);
            (0..3).map(|a| k[a][c[a]].powi(2)).sum::<f64>().sqrt()
        })
        .collect()
}

/// Unnormalised sinc, `sin(x) / x` with `sinc(0) = 1`.
#[inline]
pub fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        x.sin() / x
    }
}

/// Planned forward and inverse FFTs over a grid.
pub struct Spectral3 {
    grid: GridSpec,
    strides: [usize; 3],
    forward: [Option<Arc<dyn Fft<f64>>>; 3],
    inverse: [Option<Arc<dyn Fft<f64>>>; 3],
    line_starts: [Vec<usize>; 3],
}

impl std::fmt::Debug for Spectral3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spectral3")
            .field("shape", &self.grid.shape())
            .finish_non_exhaustive()
    }
}

impl Spectral3 {
    /// Plan transforms for every active axis of `grid`.
    pub fn new(grid: &GridSpec) -> Self {
        let [nx, ny, nz] = grid.shape();
        let strides = [ny * nz, nz, 1];
        let mut planner = FftPlanner::<f64>::new();
        let mut forward: [Option<Arc<dyn Fft<f64>>>; 3] = [None, None, None];
        let mut inverse: [Option<Arc<dyn Fft<f64>>>; 3] = [None, None, None];
        let mut line_starts: [Vec<usize>; 3] = Default::default();
        for axis in 0..3 {
            if !grid.is_active(axis) {
                continue;
            }
            let n = grid.shape()[axis];
            forward[axis] = Some(planner.plan_fft_forward(n));
            inverse[axis] = Some(planner.plan_fft_inverse(n));
            line_starts[axis] = (0..grid.cell_count())
                .filter(|&idx| grid.coords(idx)[axis] == 0)
                .collect();
        }
        Self {
            grid: *grid,
            strides,
            forward,
            inverse,
            line_starts,
        }
    }

    /// The grid these transforms were planned for.
    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    fn transform(&self, data: &mut [Complex<f64>], plans: &[Option<Arc<dyn Fft<f64>>>; 3]) {
        for axis in 0..3 {
            let Some(fft) = &plans[axis] else {
                continue;
            };
            let n = self.grid.shape()[axis];
            let stride = self.strides[axis];
            let mut line = vec![Complex::new(0.0, 0.0); n];
            for &start in &self.line_starts[axis] {
                for (m, slot) in line.iter_mut().enumerate() {
                    *slot = data[start + m * stride];
                }
                fft.process(&mut line);
                for (m, v) in line.iter().enumerate() {
                    data[start + m * stride] = *v;
                }
            }
        }
    }

    /// Forward transform of a real field.
    pub fn forward(&self, real: &[f64]) -> Vec<Complex<f64>> {
        let mut data: Vec<Complex<f64>> = real.iter().map(|&v| Complex::new(v, 0.0)).collect();
        self.transform(&mut data, &self.forward);
        data
    }

    /// Inverse transform, normalised, keeping only the real part.
    pub fn inverse_real(&self, mut spectrum: Vec<Complex<f64>>) -> Vec<f64> {
        self.transform(&mut spectrum, &self.inverse);
        let scale = 1.0 / self.grid.cell_count() as f64;
        spectrum.into_iter().map(|c| c.re * scale).collect()
    }
}

/// Direction of the half-cell shift applied by a staggered derivative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shift {
    /// Derivative evaluated at `x + dx/2` (pressure → velocity points).
    Positive,
    /// Derivative evaluated at `x - dx/2` (velocity → pressure points).
    Negative,
}

/// k-space corrected staggered derivative operators for every active axis.
///
/// The operator along axis `a` is `i k_a e^{±i k_a dx_a / 2} κ`, where
/// `κ = sinc(c_ref |k| dt / 2)` is the k-space correction that makes the
/// time stepping exact for a homogeneous medium.
#[derive(Debug)]
pub struct StaggeredDerivative {
    grid: GridSpec,
    kappa: Vec<f64>,
    shift_pos: [Vec<Complex<f64>>; 3],
    shift_neg: [Vec<Complex<f64>>; 3],
}

impl StaggeredDerivative {
    /// Precompute operators for `grid` at reference sound speed `c_ref`
    /// and step `dt`.
    pub fn new(grid: &GridSpec, c_ref: f64, dt: f64) -> Self {
        let spacing = grid.spacing();
        let k = axis_wavenumbers(grid);
        let kappa = wavenumber_magnitude(grid)
            .into_iter()
            .map(|kmag| sinc(c_ref * kmag * dt / 2.0))
            .collect();
        let shift = |sign: f64| -> [Vec<Complex<f64>>; 3] {
            std::array::from_fn(|a| {
                k[a].iter()
                    .map(|&ka| {
                        let i = Complex::new(0.0, 1.0);
                        i * ka * Complex::from_polar(1.0, sign * ka * spacing[a] / 2.0)
                    })
                    .collect()
            })
        };
        Self {
            grid: *grid,
            kappa,
            shift_pos: shift(1.0),
            shift_neg: shift(-1.0),
        }
    }

    /// The k-space correction, one value per grid point.
    pub fn kappa(&self) -> &[f64] {
        &self.kappa
    }

    /// Apply the derivative along `axis` to a spectrum and return the real
    /// result in physical space.
    pub fn apply(
        &self,
        fft: &Spectral3,
        spectrum: &[Complex<f64>],
        axis: usize,
        shift: Shift,
    ) -> Vec<f64> {
        let ops = match shift {
            Shift::Positive => &self.shift_pos[axis],
            Shift::Negative => &self.shift_neg[axis],
        };
        let shaped: Vec<Complex<f64>> = spectrum
            .iter()
            .enumerate()
            .map(|(idx, &s)| {
                let m = self.grid.coords(idx)[axis];
                s * ops[m] * self.kappa[idx]
            })
            .collect();
        fft.inverse_real(shaped)
    }
}
