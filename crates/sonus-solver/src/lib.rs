//! Reference solvers for acoustic initial value problems.
//!
//! The harness drives solvers through the [`ReferenceSolver`] trait. The
//! shipped implementation is [`KspaceFirstOrder`], a first-order k-space
//! pseudospectral solver for heterogeneous fluids, optionally with
//! power-law absorption and time-varying sources, with a perfectly matched
//! layer inside the grid.
//!
//! # Modules
//!
//! - [`solver`]: the trait, its inputs, options and [`SensorData`] output
//! - [`kspace`]: the time-stepping solver
//! - [`spectral`]: planned FFTs and staggered derivative operators
//! - [`pml`]: absorbing boundary profiles
//! - [`absorption`]: power-law absorption operators
//! - [`smooth`]: Blackman band-limiting of initial conditions

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod absorption;
pub mod error;
pub mod kspace;
pub mod pml;
pub mod smooth;
pub mod solver;
pub mod spectral;

pub use absorption::PowerLawAbsorption;
pub use error::SolverError;
pub use kspace::KspaceFirstOrder;
pub use pml::Pml;
pub use solver::{
    KGridSpec, ReferenceSolver, SensorData, SensorRecord, SimulationOptions,
    SimulationOptionsBuilder, SolverInput, DEFAULT_PML_ALPHA, DEFAULT_PML_SIZE,
};
pub use spectral::{wavenumber_magnitude, Shift, Spectral3, StaggeredDerivative};
