//! Validation harness for the sonus solvers.
//!
//! Reads a simulation setup file, runs a [`ReferenceSolver`] on it, and
//! writes the final pressure next to the setup so other solvers can be
//! checked against it.
//!
//! ```text
//! setup_case.json ──load──▶ Setup ──plan──▶ ReferenceRun (Nt + 1 steps)
//!                                              │ solve
//!                                              ▼
//!                 case.json ◀──save── p_final (+ optional PNG plots)
//! ```
//!
//! [`ReferenceSolver`]: sonus_solver::ReferenceSolver

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod compare;
pub mod error;
pub mod harness;
pub mod output;
pub mod plot;
pub mod setup;

pub use compare::{compare_fields, compare_outputs, ComparisonReport};
pub use error::{HarnessError, LoadError, WriteError};
pub use harness::{plan_reference_run, run_validation, ReferenceRun, ValidationReport};
pub use output::{derive_output_name, load_output, output_path, save_output, P_FINAL_KEY};
pub use setup::{load_setup, PmlSize, Setup, SetupFile};
