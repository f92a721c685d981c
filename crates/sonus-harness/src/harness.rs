//! The validation run: load a setup, run the reference solver, save
//! `p_final`.
//!
//! The reference solver places the initial pressure at the first recorded
//! time index, so a setup asking for `Nt` steps is run for `Nt + 1` to
//! reach the same final time as a solver that starts from `t = 0`.

use std::path::{Path, PathBuf};

use sonus_core::{Field3, Medium};
use sonus_geometry::Sensor;
use sonus_solver::{
    KGridSpec, ReferenceSolver, SimulationOptions, SolverError, SolverInput,
};
use tracing::info;

use crate::error::{HarnessError, WriteError};
use crate::output::{output_path, save_output};
use crate::plot::write_plots;
use crate::setup::{load_setup, Setup};

/// Extra steps added to the setup's `Nt`.
pub const INITIAL_CONDITION_OFFSET: usize = 1;

/// A fully planned reference solver invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceRun {
    /// Grid and (offset) time axis.
    pub kgrid: KGridSpec,
    /// Medium.
    pub medium: Medium,
    /// Initial pressure.
    pub source: Field3,
    /// Full-grid sensor recording only the final pressure.
    pub sensor: Sensor,
    /// Named solver options.
    pub options: SimulationOptions,
}

impl ReferenceRun {
    /// Borrow the run as solver input.
    pub fn input(&self) -> SolverInput<'_> {
        SolverInput {
            kgrid: &self.kgrid,
            medium: &self.medium,
            source: &self.source,
            sources: None,
            sensor: &self.sensor,
            options: &self.options,
        }
    }
}

/// Plan the reference run for `setup`.
///
/// `PMLSize`, `PMLAlpha` and `smooth_initial` pass through unchanged, and
/// `plot` becomes the solver's `plot_sim` option.
///
/// # Errors
///
/// Returns [`HarnessError::Solver`] with
/// [`SolverError::InvalidBoundary`] if the PML options are rejected, or
/// [`SolverError::InvalidTime`] if `Nt` plus the offset overflows.
pub fn plan_reference_run(setup: &Setup, plot: bool) -> Result<ReferenceRun, HarnessError> {
    let options = SimulationOptions::builder()
        .pml_size_per_axis(setup.pml_size)
        .pml_alpha(setup.pml_alpha)
        .smooth_p0(setup.smooth_initial)
        .plot_sim(plot)
        .build()
        .map_err(|reason| SolverError::InvalidBoundary { reason })?;
    let time = setup
        .time
        .extended(INITIAL_CONDITION_OFFSET)
        .ok_or(SolverError::InvalidTime {
            steps: setup.time.steps,
            dt: setup.time.dt,
        })?;
    Ok(ReferenceRun {
        kgrid: KGridSpec {
            grid: setup.grid,
            time,
        },
        medium: setup.medium.clone(),
        source: setup.p0.clone(),
        sensor: Sensor::final_pressure(),
        options,
    })
}

/// What a successful validation run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationReport {
    /// Name of the solver that ran.
    pub solver: String,
    /// The setup file.
    pub setup_path: PathBuf,
    /// The output file written.
    pub output_path: PathBuf,
    /// Plot files written, empty unless plotting was requested.
    pub plot_paths: Vec<PathBuf>,
    /// Time steps the solver took.
    pub steps: usize,
    /// Final pressure field shape.
    pub shape: [usize; 3],
    /// Largest magnitude in the final pressure.
    pub max_abs: f64,
    /// Sum of squares of the final pressure.
    pub energy: f64,
}

/// Run `solver` on the setup at `setup_path` and save `p_final` next to it.
///
/// # Errors
///
/// - [`HarnessError::Load`] if the setup is missing or malformed
/// - [`HarnessError::Solver`] if the solver rejects the input or diverges
/// - [`HarnessError::MissingFinalPressure`] if it returns no final field
/// - [`HarnessError::Write`] if the output or a plot cannot be written, or
///   if the setup name has no `setup_` prefix so the output would replace
///   the setup itself (checked before the solver runs)
pub fn run_validation(
    setup_path: &Path,
    plot: bool,
    solver: &dyn ReferenceSolver,
) -> Result<ValidationReport, HarnessError> {
    let setup = load_setup(setup_path)?;
    let run = plan_reference_run(&setup, plot)?;
    let out = output_path(setup_path);
    if out.as_path() == setup_path {
        return Err(HarnessError::write(
            out.clone(),
            WriteError::OverwritesSetup {
                setup: setup_path.to_path_buf(),
            },
        ));
    }
    info!(
        setup = %setup_path.display(),
        solver = solver.name(),
        shape = ?run.kgrid.grid.shape(),
        steps = run.kgrid.time.steps,
        "running reference simulation"
    );

    let data = solver.solve(&run.input())?;
    let p_final = data
        .p_final_field()
        .ok_or_else(|| HarnessError::MissingFinalPressure {
            solver: solver.name().to_string(),
        })?;

    save_output(&out, &p_final)?;

    let plot_paths = if plot {
        write_plots(&out, &p_final, data.diagnostics.as_deref())?
    } else {
        Vec::new()
    };

    info!(output = %out.display(), max_abs = p_final.max_abs(), "validation run complete");
    Ok(ValidationReport {
        solver: solver.name().to_string(),
        setup_path: setup_path.to_path_buf(),
        output_path: out,
        plot_paths,
        steps: data.steps,
        shape: p_final.shape(),
        max_abs: p_final.max_abs(),
        energy: p_final.energy(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sonus_core::{GridSpec, TimeSpec};
    use sonus_geometry::SensorQuantity;

    fn setup() -> Setup {
        Setup {
            grid: GridSpec::new([4, 4, 4], [1e-4; 3]).unwrap(),
            time: TimeSpec::new(10, 2e-8),
            medium: Medium::new(1500.0, 1000.0),
            p0: Field3::zeros([4, 4, 4]),
            pml_size: [1, 1, 0],
            pml_alpha: 2.0,
            smooth_initial: false,
        }
    }

    #[test]
    fn plan_adds_one_step() {
        let run = plan_reference_run(&setup(), false).unwrap();
        assert_eq!(run.kgrid.time.steps, 11);
        assert_eq!(run.kgrid.time.dt, 2e-8);
    }

    #[test]
    fn plan_records_only_final_pressure() {
        let run = plan_reference_run(&setup(), false).unwrap();
        assert_eq!(run.sensor.record.as_slice(), &[SensorQuantity::PressureFinal]);
        assert!(!run.sensor.records_time_history());
    }

    #[test]
    fn plan_passes_options_through() {
        let run = plan_reference_run(&setup(), true).unwrap();
        assert_eq!(run.options.pml_size(), [1, 1, 0]);
        assert!(!run.options.smooth_p0());
        assert!(run.options.plot_sim());
        let run = plan_reference_run(&setup(), false).unwrap();
        assert!(!run.options.plot_sim());
    }

    #[test]
    fn plan_keeps_attenuation() {
        let mut s = setup();
        s.medium = s
            .medium
            .with_attenuation(sonus_core::Attenuation::new(0.5, 1.5));
        let run = plan_reference_run(&s, false).unwrap();
        assert!(run.medium.is_lossy());
        assert!(run.input().sources.is_none());
    }

    #[test]
    fn plan_rejects_negative_alpha() {
        let mut s = setup();
        s.pml_alpha = -1.0;
        assert!(matches!(
            plan_reference_run(&s, false),
            Err(HarnessError::Solver(SolverError::InvalidBoundary { .. }))
        ));
    }

    #[test]
    fn plan_rejects_step_count_that_overflows() {
        let mut s = setup();
        s.time = TimeSpec::new(usize::MAX, 2e-8);
        match plan_reference_run(&s, false) {
            Err(HarnessError::Solver(SolverError::InvalidTime { steps, .. })) => {
                assert_eq!(steps, usize::MAX);
            }
            other => panic!("expected InvalidTime, got {other:?}"),
        }
    }
}
