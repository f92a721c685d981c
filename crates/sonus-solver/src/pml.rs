//! Perfectly matched layer absorption profiles.
//!
//! The PML sits inside the computational grid: the outer `size` points on
//! each side of an axis are damped by a quartic absorption profile. Each
//! profile is stored as the per-half-step multiplier `exp(-σ dt / 2)`,
//! applied twice per update (before and after the flux term).

use crate::error::SolverError;

/// Multipliers for one axis of `n` points.
///
/// `staggered` evaluates the profile half a cell to the right, for
/// quantities that live on the staggered (velocity) grid. An empty layer
/// (`size == 0`) or a degenerate axis gives all ones.
pub fn pml_profile(
    n: usize,
    dx: f64,
    dt: f64,
    c_ref: f64,
    size: usize,
    alpha: f64,
    staggered: bool,
) -> Vec<f64> {
    let mut out = vec![1.0; n];
    if size == 0 || n <= 1 {
        return out;
    }
    let s = size as f64;
    let shift = if staggered { 0.5 } else { 0.0 };
    for m in 1..=size {
        let x = m as f64 + shift;
        let left = alpha * (c_ref / dx) * ((x - s - 1.0) / -s).powi(4);
        let right = alpha * (c_ref / dx) * (x / s).powi(4);
        out[m - 1] = (-left * dt / 2.0).exp();
        out[n - size + m - 1] = (-right * dt / 2.0).exp();
    }
    out
}

/// Check that a PML of `size` fits on every active axis of `shape`.
///
/// # Errors
///
/// Returns [`SolverError::InvalidBoundary`] if the two layers on an axis
/// would cover the whole axis.
pub fn validate_pml(shape: [usize; 3], size: [usize; 3]) -> Result<(), SolverError> {
    for axis in 0..3 {
        let n = shape[axis];
        if n > 1 && 2 * size[axis] >= n {
            return Err(SolverError::InvalidBoundary {
                reason: format!(
                    "PML of {} points on each side does not fit axis {axis} of {n} points",
                    size[axis]
                ),
            });
        }
    }
    Ok(())
}

/// PML multipliers for all three axes, regular and staggered.
#[derive(Clone, Debug)]
pub struct Pml {
    regular: [Vec<f64>; 3],
    staggered: [Vec<f64>; 3],
}

impl Pml {
    /// Build profiles for a grid.
    pub fn new(
        shape: [usize; 3],
        spacing: [f64; 3],
        dt: f64,
        c_ref: f64,
        size: [usize; 3],
        alpha: f64,
    ) -> Self {
        let build = |stag: bool| -> [Vec<f64>; 3] {
            std::array::from_fn(|a| {
                pml_profile(shape[a], spacing[a], dt, c_ref, size[a], alpha, stag)
            })
        };
        Self {
            regular: build(false),
            staggered: build(true),
        }
    }

    /// Multiplier at axis coordinate `m` on the pressure grid.
    #[inline]
    pub fn regular(&self, axis: usize, m: usize) -> f64 {
        self.regular[axis][m]
    }

    /// Multiplier at axis coordinate `m` on the staggered grid.
    #[inline]
    pub fn staggered(&self, axis: usize, m: usize) -> f64 {
        self.staggered[axis][m]
    }
}
