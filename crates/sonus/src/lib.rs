//! Sonus: acoustic initial value problems on regular grids, solved with a
//! k-space pseudospectral method, plus a harness for validating other
//! solvers against it.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all sonus sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use sonus::prelude::*;
//!
//! // A 32×32 slab with a single-voxel initial pressure.
//! let grid = GridSpec::new([32, 32, 1], [1e-4, 1e-4, 1e-4]).unwrap();
//! let kgrid = KGridSpec { grid, time: TimeSpec::new(20, 2e-8) };
//! let medium = Medium::new(1500.0, 1000.0);
//! let mut p0 = Field3::zeros(grid.shape());
//! p0.set(16, 16, 0, 1.0);
//!
//! let sensor = Sensor::final_pressure();
//! let options = SimulationOptions::builder().pml_size(4).build().unwrap();
//! let data = KspaceFirstOrder::new()
//!     .solve(&SolverInput {
//!         kgrid: &kgrid,
//!         medium: &medium,
//!         source: &p0,
//!         sources: None,
//!         sensor: &sensor,
//!         options: &options,
//!     })
//!     .unwrap();
//! assert_eq!(data.p_final().unwrap().len(), 32 * 32);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `sonus-core` | Grids, fields, media and absorption, time axes, unit conversions |
//! | [`geometry`] | `sonus-geometry` | Masks, point sets, sensors, sources, band-limited interpolation |
//! | [`solver`] | `sonus-solver` | `ReferenceSolver` trait and the k-space solver |
//! | [`harness`] | `sonus-harness` | Setup files, validation runs, output comparison |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Grids, fields, media and time axes (`sonus-core`).
pub use sonus_core as types;

/// Masks, point sets and sensors (`sonus-geometry`).
///
/// [`geometry::Sensor`] chooses where a solver samples and which
/// [`geometry::SensorQuantity`] values it records.
pub use sonus_geometry as geometry;

/// Reference solvers (`sonus-solver`).
///
/// The [`solver::ReferenceSolver`] trait is the seam the harness drives;
/// [`solver::KspaceFirstOrder`] is the shipped implementation.
pub use sonus_solver as solver;

/// Validation harness (`sonus-harness`).
///
/// [`harness::run_validation`] turns a setup file into an output file;
/// [`harness::compare_outputs`] checks two outputs against each other.
pub use sonus_harness as harness;

/// Common imports for typical sonus usage.
pub mod prelude {
    // Core types
    pub use sonus_core::{Attenuation, Field3, GridSpec, Medium, Property, TimeAxis, TimeSpec};

    // Sensors and sources
    pub use sonus_geometry::{
        DistributedTransducer, Sensor, SensorMask, SensorQuantity, Sources, TimeVaryingSource,
    };

    // Solver
    pub use sonus_solver::{
        KGridSpec, KspaceFirstOrder, ReferenceSolver, SensorData, SensorRecord,
        SimulationOptions, SolverInput,
    };

    // Errors
    pub use sonus_core::{FieldError, GridError, MediumError};
    pub use sonus_geometry::GeometryError;
    pub use sonus_harness::HarnessError;
    pub use sonus_solver::SolverError;

    // Harness
    pub use sonus_harness::{compare_outputs, run_validation, ComparisonReport, ValidationReport};
}
