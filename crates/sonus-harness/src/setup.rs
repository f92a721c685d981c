//! Simulation setup files.
//!
//! A setup is a JSON document with the keys below. Fields are written as a
//! bare number (homogeneous) or as `{"shape": [nx, ny, nz], "data": [...]}`
//! in row-major order. Unknown keys are ignored.
//!
//! | key              | type                 | required |
//! |------------------|----------------------|----------|
//! | `Nx`             | `[usize; 3]`         | yes      |
//! | `dx`             | `[f64; 3]`           | yes      |
//! | `Nt`             | `usize`              | yes      |
//! | `dt`             | `f64`                | yes      |
//! | `sound_speed`    | number or field      | yes      |
//! | `density`        | number or field      | yes      |
//! | `p0`             | field                | yes      |
//! | `PMLSize`        | `usize` or `[usize; 3]` | no (20) |
//! | `PMLAlpha`       | `f64`                | no (2.0) |
//! | `smooth_initial` | `bool`               | no (true) |
//! | `attenuation`    | number or field      | no (lossless) |
//! | `alpha_power`    | `f64`                | with `attenuation` |
//!
//! `attenuation` is the power-law coefficient in dB/(MHz^y cm) and
//! `alpha_power` its exponent `y`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sonus_core::{Attenuation, Field3, GridSpec, Medium, Property, TimeSpec};
use sonus_solver::{DEFAULT_PML_ALPHA, DEFAULT_PML_SIZE};
use tracing::debug;

use crate::error::{HarnessError, LoadError};

/// PML thickness as written in a setup file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PmlSize {
    /// The same thickness on every axis.
    Uniform(usize),
    /// One thickness per axis.
    PerAxis([usize; 3]),
}

impl PmlSize {
    /// Thickness per axis.
    pub fn per_axis(self) -> [usize; 3] {
        match self {
            Self::Uniform(n) => [n; 3],
            Self::PerAxis(a) => a,
        }
    }
}

impl Default for PmlSize {
    fn default() -> Self {
        Self::Uniform(DEFAULT_PML_SIZE)
    }
}

fn default_pml_alpha() -> f64 {
    DEFAULT_PML_ALPHA
}

fn default_true() -> bool {
    true
}

/// The raw document, as deserialised.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SetupFile {
    /// Grid points per axis.
    #[serde(rename = "Nx")]
    pub nx: [usize; 3],
    /// Grid spacing per axis, in metres.
    pub dx: [f64; 3],
    /// Number of time steps requested.
    #[serde(rename = "Nt")]
    pub nt: usize,
    /// Time step in seconds.
    pub dt: f64,
    /// Sound speed in m/s.
    pub sound_speed: Property,
    /// Ambient density in kg/m³.
    pub density: Property,
    /// Initial pressure distribution.
    pub p0: Field3,
    /// PML thickness in grid points.
    #[serde(rename = "PMLSize", default)]
    pub pml_size: PmlSize,
    /// PML absorption coefficient.
    #[serde(rename = "PMLAlpha", default = "default_pml_alpha")]
    pub pml_alpha: f64,
    /// Whether the initial pressure is smoothed before injection.
    #[serde(default = "default_true")]
    pub smooth_initial: bool,
    /// Power-law absorption coefficient in dB/(MHz^y cm).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attenuation: Option<Property>,
    /// Power-law exponent `y`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha_power: Option<f64>,
}

/// A validated simulation setup.
#[derive(Clone, Debug, PartialEq)]
pub struct Setup {
    /// Spatial grid.
    pub grid: GridSpec,
    /// Time axis as written in the file (`Nt` steps of `dt`).
    pub time: TimeSpec,
    /// Acoustic medium.
    pub medium: Medium,
    /// Initial pressure.
    pub p0: Field3,
    /// PML thickness per axis.
    pub pml_size: [usize; 3],
    /// PML absorption coefficient.
    pub pml_alpha: f64,
    /// Whether the initial pressure is smoothed.
    pub smooth_initial: bool,
}

impl TryFrom<SetupFile> for Setup {
    type Error = LoadError;

    fn try_from(raw: SetupFile) -> Result<Self, LoadError> {
        let grid = GridSpec::new(raw.nx, raw.dx)?;
        let mut medium = Medium::new(raw.sound_speed, raw.density);
        if let Some(coefficient) = raw.attenuation {
            let power = raw
                .alpha_power
                .ok_or(LoadError::MissingKey { key: "alpha_power" })?;
            medium = medium.with_attenuation(Attenuation::new(coefficient, power));
        }
        medium.validate(&grid)?;
        raw.p0
            .check_shape(grid.shape())
            .map_err(|source| LoadError::Shape { input: "p0", source })?;
        Ok(Self {
            grid,
            time: TimeSpec::new(raw.nt, raw.dt),
            medium,
            p0: raw.p0,
            pml_size: raw.pml_size.per_axis(),
            pml_alpha: raw.pml_alpha,
            smooth_initial: raw.smooth_initial,
        })
    }
}

impl Setup {
    /// Parse and validate a setup document.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the text is not a valid setup or the grid,
    /// medium or `p0` are inconsistent.
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        let raw: SetupFile = serde_json::from_str(text)?;
        Self::try_from(raw)
    }
}

/// Read and validate the setup file at `path`.
///
/// # Errors
///
/// Every failure surfaces as [`HarnessError::Load`] naming `path`.
pub fn load_setup(path: &Path) -> Result<Setup, HarnessError> {
    let text = fs::read_to_string(path).map_err(|e| HarnessError::load(path, e))?;
    let setup = Setup::from_json_str(&text).map_err(|e| HarnessError::load(path, e))?;
    debug!(
        path = %path.display(),
        shape = ?setup.grid.shape(),
        nt = setup.time.steps,
        dt = setup.time.dt,
        "loaded setup"
    );
    Ok(setup)
}
