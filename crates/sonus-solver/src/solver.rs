//! The reference-solver interface.
//!
//! A [`ReferenceSolver`] takes a grid with its time axis, a medium, an
//! initial pressure, optional time-varying sources, a sensor and named
//! options, and returns the recorded [`SensorData`]. The harness only talks
//! to this trait, so tests can swap in a recording mock.

use indexmap::IndexMap;
use sonus_core::{Field3, GridSpec, Medium, TimeSpec};
use sonus_geometry::{Sensor, SensorMask, SensorQuantity, TimeVaryingSource};

use crate::error::SolverError;

/// Spatial grid plus time axis, as consumed by a solver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KGridSpec {
    /// Spatial discretisation.
    pub grid: GridSpec,
    /// Time discretisation.
    pub time: TimeSpec,
}

/// Named solver options.
///
/// Constructed via the builder pattern: [`SimulationOptions::builder`].
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationOptions {
    pml_size: [usize; 3],
    pml_alpha: f64,
    plot_sim: bool,
    smooth_p0: bool,
}

/// Builder for [`SimulationOptions`].
pub struct SimulationOptionsBuilder {
    pml_size: [usize; 3],
    pml_alpha: f64,
    plot_sim: bool,
    smooth_p0: bool,
}

/// Default PML thickness in grid points, per axis.
pub const DEFAULT_PML_SIZE: usize = 20;
/// Default PML absorption in nepers per grid point.
pub const DEFAULT_PML_ALPHA: f64 = 2.0;

impl SimulationOptions {
    /// Create a new builder with the default options.
    pub fn builder() -> SimulationOptionsBuilder {
        SimulationOptionsBuilder {
            pml_size: [DEFAULT_PML_SIZE; 3],
            pml_alpha: DEFAULT_PML_ALPHA,
            plot_sim: false,
            smooth_p0: true,
        }
    }

    /// PML thickness per axis, in grid points, inside the domain.
    pub fn pml_size(&self) -> [usize; 3] {
        self.pml_size
    }

    /// PML absorption coefficient.
    pub fn pml_alpha(&self) -> f64 {
        self.pml_alpha
    }

    /// Whether the solver collects per-step diagnostics for plotting.
    pub fn plot_sim(&self) -> bool {
        self.plot_sim
    }

    /// Whether the initial pressure is smoothed before injection.
    pub fn smooth_p0(&self) -> bool {
        self.smooth_p0
    }
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            pml_size: [DEFAULT_PML_SIZE; 3],
            pml_alpha: DEFAULT_PML_ALPHA,
            plot_sim: false,
            smooth_p0: true,
        }
    }
}

impl SimulationOptionsBuilder {
    /// Set the same PML thickness on every axis.
    pub fn pml_size(mut self, size: usize) -> Self {
        self.pml_size = [size; 3];
        self
    }

    /// Set the PML thickness per axis.
    pub fn pml_size_per_axis(mut self, size: [usize; 3]) -> Self {
        self.pml_size = size;
        self
    }

    /// Set the PML absorption (default: 2.0). Must be >= 0.
    pub fn pml_alpha(mut self, alpha: f64) -> Self {
        self.pml_alpha = alpha;
        self
    }

    /// Collect per-step diagnostics (default: false).
    pub fn plot_sim(mut self, on: bool) -> Self {
        self.plot_sim = on;
        self
    }

    /// Smooth the initial pressure (default: true).
    pub fn smooth_p0(mut self, on: bool) -> Self {
        self.smooth_p0 = on;
        self
    }

    /// Build the options.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `pml_alpha` is negative or not finite. PML size is
    /// checked against the grid by the solver.
    pub fn build(self) -> Result<SimulationOptions, String> {
        if !(self.pml_alpha.is_finite() && self.pml_alpha >= 0.0) {
            return Err(format!(
                "pml_alpha must be finite and >= 0, got {}",
                self.pml_alpha
            ));
        }
        Ok(SimulationOptions {
            pml_size: self.pml_size,
            pml_alpha: self.pml_alpha,
            plot_sim: self.plot_sim,
            smooth_p0: self.smooth_p0,
        })
    }
}

/// Everything a solver needs for one run.
#[derive(Clone, Copy, Debug)]
pub struct SolverInput<'a> {
    /// Grid and time axis.
    pub kgrid: &'a KGridSpec,
    /// Sound speed and density.
    pub medium: &'a Medium,
    /// Initial pressure distribution.
    pub source: &'a Field3,
    /// Pressure injected during the run, if any.
    pub sources: Option<&'a dyn TimeVaryingSource>,
    /// What to record, and where.
    pub sensor: &'a Sensor,
    /// Named options.
    pub options: &'a SimulationOptions,
}

/// One recorded quantity.
#[derive(Clone, Debug, PartialEq)]
pub enum SensorRecord {
    /// One value per sensor point.
    Snapshot(Vec<f64>),
    /// One vector of sensor values per time step.
    History(Vec<Vec<f64>>),
}

/// The result of a solver run.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorData {
    /// Grid shape the run used.
    pub shape: [usize; 3],
    /// Whether the sensor covered the whole grid.
    pub full_grid: bool,
    /// Number of time steps taken.
    pub steps: usize,
    /// Recorded quantities, in the order the sensor asked for them.
    pub records: IndexMap<SensorQuantity, SensorRecord>,
    /// Per-step maximum absolute pressure, collected when `plot_sim` is set.
    pub diagnostics: Option<Vec<f64>>,
}

impl SensorData {
    /// An empty result for `sensor` on a grid of `shape`.
    pub fn new(shape: [usize; 3], sensor: &Sensor, steps: usize) -> Self {
        Self {
            shape,
            full_grid: matches!(sensor.mask, SensorMask::Full),
            steps,
            records: IndexMap::new(),
            diagnostics: None,
        }
    }

    /// The recorded final pressure, as sampled.
    pub fn p_final(&self) -> Option<&[f64]> {
        match self.records.get(&SensorQuantity::PressureFinal)? {
            SensorRecord::Snapshot(v) => Some(v),
            SensorRecord::History(_) => None,
        }
    }

    /// The final pressure as a field, when the sensor covered the grid.
    pub fn p_final_field(&self) -> Option<Field3> {
        if !self.full_grid {
            return None;
        }
        Field3::from_vec(self.shape, self.p_final()?.to_vec()).ok()
    }

    /// The recorded pressure time history, if any.
    pub fn pressure_history(&self) -> Option<&[Vec<f64>]> {
        match self.records.get(&SensorQuantity::Pressure)? {
            SensorRecord::History(h) => Some(h),
            SensorRecord::Snapshot(_) => None,
        }
    }
}

/// A solver that can produce reference results for a simulation setup.
pub trait ReferenceSolver {
    /// Human-readable solver name, used in logs.
    fn name(&self) -> &str;

    /// Run the simulation described by `input`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError`] for invalid input or numerical divergence.
    fn solve(&self, input: &SolverInput<'_>) -> Result<SensorData, SolverError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let o = SimulationOptions::builder().build().unwrap();
        assert_eq!(o, SimulationOptions::default());
        assert_eq!(o.pml_size(), [20; 3]);
        assert_eq!(o.pml_alpha(), 2.0);
        assert!(o.smooth_p0());
        assert!(!o.plot_sim());
    }

    #[test]
    fn builder_rejects_negative_alpha() {
        let err = SimulationOptions::builder().pml_alpha(-1.0).build().unwrap_err();
        assert!(err.contains("pml_alpha"));
    }

    #[test]
    fn builder_rejects_nan_alpha() {
        assert!(SimulationOptions::builder()
            .pml_alpha(f64::NAN)
            .build()
            .is_err());
    }

    #[test]
    fn p_final_field_requires_full_grid() {
        let sensor = Sensor::at_points(vec![[0, 0, 0]], [SensorQuantity::PressureFinal]);
        let mut data = SensorData::new([2, 1, 1], &sensor, 3);
        data.records
            .insert(SensorQuantity::PressureFinal, SensorRecord::Snapshot(vec![1.0]));
        assert_eq!(data.p_final(), Some(&[1.0][..]));
        assert!(data.p_final_field().is_none());
    }

    #[test]
    fn p_final_field_wraps_full_grid_snapshot() {
        let sensor = Sensor::final_pressure();
        let mut data = SensorData::new([2, 1, 1], &sensor, 3);
        data.records.insert(
            SensorQuantity::PressureFinal,
            SensorRecord::Snapshot(vec![1.0, 2.0]),
        );
        let f = data.p_final_field().unwrap();
        assert_eq!(f.shape(), [2, 1, 1]);
        assert_eq!(f.as_slice(), &[1.0, 2.0]);
        assert!(data.pressure_history().is_none());
    }
}
