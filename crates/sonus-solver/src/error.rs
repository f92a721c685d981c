//! Error types for reference solver runs.

use std::error::Error;
use std::fmt;

use sonus_core::{FieldError, MediumError};
use sonus_geometry::GeometryError;

/// Errors from [`ReferenceSolver::solve`](crate::ReferenceSolver::solve).
///
/// Configuration errors are reported before any time stepping starts;
/// [`Diverged`](Self::Diverged) is the only error raised mid-run.
#[derive(Clone, Debug, PartialEq)]
pub enum SolverError {
    /// Step count is zero or `dt` is not finite and > 0.
    InvalidTime {
        /// Requested step count.
        steps: usize,
        /// Requested step size.
        dt: f64,
    },
    /// PML configuration cannot be applied to this grid.
    InvalidBoundary {
        /// Description of the problem.
        reason: String,
    },
    /// An input field does not match the grid.
    ShapeMismatch {
        /// Which input (`"p0"`, ...).
        input: &'static str,
        /// The underlying shape error.
        source: FieldError,
    },
    /// The medium is invalid for this grid.
    Medium(MediumError),
    /// The sensor or a source is invalid for this grid.
    Geometry(GeometryError),
    /// Source signals are sampled at a different step than the run.
    SourceTiming {
        /// The sources' sampling interval.
        source_dt: f64,
        /// The run's step.
        dt: f64,
    },
    /// The sensor records nothing.
    EmptySensor,
    /// A non-finite pressure appeared during time stepping.
    Diverged {
        /// The 1-based time step at which it was detected.
        step: usize,
        /// Flat index of the first non-finite point.
        index: usize,
    },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTime { steps, dt } => {
                write!(f, "invalid time axis: {steps} steps of dt={dt}")
            }
            Self::InvalidBoundary { reason } => write!(f, "invalid PML: {reason}"),
            Self::ShapeMismatch { input, source } => write!(f, "{input}: {source}"),
            Self::Medium(e) => write!(f, "invalid medium: {e}"),
            Self::Geometry(e) => write!(f, "invalid geometry: {e}"),
            Self::SourceTiming { source_dt, dt } => {
                write!(f, "source signals sampled every {source_dt} s, run steps by {dt} s")
            }
            Self::EmptySensor => write!(f, "sensor records no quantities"),
            Self::Diverged { step, index } => {
                write!(f, "simulation diverged at step {step} (non-finite pressure at cell {index})")
            }
        }
    }
}

impl Error for SolverError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ShapeMismatch { source, .. } => Some(source),
            Self::Medium(e) => Some(e),
            Self::Geometry(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MediumError> for SolverError {
    fn from(e: MediumError) -> Self {
        Self::Medium(e)
    }
}

impl From<GeometryError> for SolverError {
    fn from(e: GeometryError) -> Self {
        Self::Geometry(e)
    }
}
