//! Core types for the sonus acoustic solvers.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! discretised domain ([`GridSpec`]), dense real fields ([`Field3`]), the
//! acoustic [`Medium`], the time axis, unit conversions, and the error types
//! shared by the solver and harness crates.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod conversion;
pub mod error;
pub mod field;
pub mod grid;
pub mod medium;
pub mod time;

pub use error::{FieldError, GridError, MediumError};
pub use field::Field3;
pub use grid::GridSpec;
pub use medium::{Attenuation, Medium, Property};
pub use time::{TimeAxis, TimeSpec};
