//! Error types for the validation harness.
//!
//! Failures fall into three classes, mirrored by [`HarnessError`]:
//! loading the setup, running the solver, and writing results. Comparison
//! adds two more for shape and tolerance failures. Nothing is retried.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use sonus_core::{FieldError, GridError, MediumError};
use sonus_solver::SolverError;

/// Why a setup or output file could not be loaded.
#[derive(Debug)]
pub enum LoadError {
    /// The file could not be read.
    Io(io::Error),
    /// The file is not valid JSON or does not match the expected layout.
    Parse(serde_json::Error),
    /// The grid described by `Nx`/`dx` is invalid.
    Grid(GridError),
    /// The medium is invalid for the grid.
    Medium(MediumError),
    /// An input field does not match the grid.
    Shape {
        /// Which input (`"p0"`, ...).
        input: &'static str,
        /// The underlying shape error.
        source: FieldError,
    },
    /// A required key is absent.
    MissingKey {
        /// The key name.
        key: &'static str,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Parse(e) => write!(f, "malformed file: {e}"),
            Self::Grid(e) => write!(f, "invalid grid: {e}"),
            Self::Medium(e) => write!(f, "invalid medium: {e}"),
            Self::Shape { input, source } => write!(f, "{input}: {source}"),
            Self::MissingKey { key } => write!(f, "missing key `{key}`"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Grid(e) => Some(e),
            Self::Medium(e) => Some(e),
            Self::Shape { source, .. } => Some(source),
            Self::MissingKey { .. } => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<GridError> for LoadError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<MediumError> for LoadError {
    fn from(e: MediumError) -> Self {
        Self::Medium(e)
    }
}

/// Why results could not be written.
#[derive(Debug)]
pub enum WriteError {
    /// A filesystem operation failed.
    Io(io::Error),
    /// The output could not be serialised.
    Encode(serde_json::Error),
    /// The diagnostic plot could not be rendered.
    Plot {
        /// Backend error message.
        detail: String,
    },
    /// The output name derived from the setup name is the setup itself.
    OverwritesSetup {
        /// The setup file that would have been replaced.
        setup: PathBuf,
    },
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Encode(e) => write!(f, "encoding failed: {e}"),
            Self::Plot { detail } => write!(f, "plotting failed: {detail}"),
            Self::OverwritesSetup { setup } => write!(
                f,
                "output would overwrite the setup {}; prefix its name with `setup_`",
                setup.display()
            ),
        }
    }
}

impl Error for WriteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Encode(e) => Some(e),
            Self::Plot { .. } | Self::OverwritesSetup { .. } => None,
        }
    }
}

impl From<io::Error> for WriteError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for WriteError {
    fn from(e: serde_json::Error) -> Self {
        Self::Encode(e)
    }
}

/// Errors from a validation run or comparison.
#[derive(Debug)]
pub enum HarnessError {
    /// A setup or output file could not be loaded.
    Load {
        /// The file being loaded.
        path: PathBuf,
        /// What went wrong.
        source: LoadError,
    },
    /// The reference solver failed. The solver's error is passed through
    /// unchanged.
    Solver(SolverError),
    /// The solver finished but produced no full-grid final pressure.
    MissingFinalPressure {
        /// Name of the solver.
        solver: String,
    },
    /// An output file could not be written.
    Write {
        /// The file being written.
        path: PathBuf,
        /// What went wrong.
        source: WriteError,
    },
    /// Two outputs have different shapes.
    Compare(FieldError),
    /// Two outputs differ by more than the tolerance.
    ToleranceExceeded {
        /// Measured relative L2 error.
        relative_l2: f64,
        /// The tolerance it was checked against.
        tolerance: f64,
        /// Largest absolute pointwise difference.
        max_abs_error: f64,
    },
}

impl HarnessError {
    pub(crate) fn load(path: impl Into<PathBuf>, source: impl Into<LoadError>) -> Self {
        Self::Load {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: impl Into<WriteError>) -> Self {
        Self::Write {
            path: path.into(),
            source: source.into(),
        }
    }
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { path, source } => {
                write!(f, "failed to load {}: {source}", path.display())
            }
            Self::Solver(e) => write!(f, "reference solver failed: {e}"),
            Self::MissingFinalPressure { solver } => {
                write!(f, "solver {solver} returned no full-grid p_final")
            }
            Self::Write { path, source } => {
                write!(f, "failed to write {}: {source}", path.display())
            }
            Self::Compare(e) => write!(f, "outputs are not comparable: {e}"),
            Self::ToleranceExceeded {
                relative_l2,
                tolerance,
                max_abs_error,
            } => write!(
                f,
                "relative L2 error {relative_l2:e} exceeds tolerance {tolerance:e} \
                 (max abs error {max_abs_error:e})"
            ),
        }
    }
}

impl Error for HarnessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load { source, .. } => Some(source),
            Self::Solver(e) => Some(e),
            Self::Write { source, .. } => Some(source),
            Self::Compare(e) => Some(e),
            Self::MissingFinalPressure { .. } | Self::ToleranceExceeded { .. } => None,
        }
    }
}

impl From<SolverError> for HarnessError {
    fn from(e: SolverError) -> Self {
        Self::Solver(e)
    }
}
