//! Time discretisation.

use crate::grid::GridSpec;
use crate::medium::Medium;

/// A fixed number of steps of a fixed size. This is what solvers consume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeSpec {
    /// Number of time steps (recorded time points).
    pub steps: usize,
    /// Step size in seconds.
    pub dt: f64,
}

impl TimeSpec {
    /// A time specification of `steps` steps of size `dt`.
    pub fn new(steps: usize, dt: f64) -> Self {
        Self { steps, dt }
    }

    /// The same step size with `extra` additional steps, or `None` if the
    /// step count would overflow.
    pub fn extended(self, extra: usize) -> Option<Self> {
        Some(Self {
            steps: self.steps.checked_add(extra)?,
            dt: self.dt,
        })
    }

    /// Time of the last recorded point, `(steps - 1) * dt`.
    pub fn t_end(&self) -> f64 {
        self.steps.saturating_sub(1) as f64 * self.dt
    }

    /// Whether `dt` is finite and > 0.
    pub fn has_valid_dt(&self) -> bool {
        self.dt.is_finite() && self.dt > 0.0
    }
}

/// A time axis given by step size and end time.
///
/// The step count is `ceil(t_end / dt)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeAxis {
    /// Step size in seconds.
    pub dt: f64,
    /// Simulation end time in seconds.
    pub t_end: f64,
}

/// Default CFL number for [`TimeAxis::from_medium`].
pub const DEFAULT_CFL: f64 = 0.3;

impl TimeAxis {
    /// A time axis from step size and end time.
    pub fn new(dt: f64, t_end: f64) -> Self {
        Self { dt, t_end }
    }

    /// Number of time steps.
    pub fn steps(&self) -> usize {
        (self.t_end / self.dt).ceil().max(0.0) as usize
    }

    /// The sample times `0, dt, 2dt, ...` (one per step).
    pub fn to_array(&self) -> Vec<f64> {
        (0..self.steps()).map(|n| n as f64 * self.dt).collect()
    }

    /// Convert to the step-count form consumed by solvers.
    pub fn to_spec(&self) -> TimeSpec {
        TimeSpec::new(self.steps(), self.dt)
    }

    /// Pick a stable time axis for `medium` on `grid`.
    ///
    /// `dt = cfl * min(dx) / max(c)`. Without an explicit `t_end` the axis
    /// runs for as long as the slowest wave needs to cross the grid
    /// diagonal.
    pub fn from_medium(grid: &GridSpec, medium: &Medium, cfl: f64, t_end: Option<f64>) -> Self {
        let dt = cfl * grid.min_spacing() / medium.sound_speed.max();
        let t_end = t_end.unwrap_or_else(|| {
            let diag = grid.extent().iter().map(|e| e * e).sum::<f64>().sqrt();
            diag / medium.sound_speed.min()
        });
        Self { dt, t_end }
    }
}
