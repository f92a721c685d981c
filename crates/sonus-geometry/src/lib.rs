//! Geometry helpers for the sonus acoustic solvers.
//!
//! - [`masks`]: binary circle and sphere masks
//! - [`points`]: point sets on circles and (Fibonacci) spheres
//! - [`sensor`]: on-grid sensors and the quantities they record
//! - [`sources`]: time-varying point and distributed sources
//! - [`bli`]: band-limited-interpolant sensors for off-grid positions

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bli;
pub mod error;
pub mod masks;
pub mod points;
pub mod sensor;
pub mod sources;

pub use bli::{bli_weights, BliSensors};
pub use error::GeometryError;
pub use masks::{circ_mask, sphere_mask};
pub use points::{fibonacci_sphere, points_on_circle, unit_fibonacci_sphere};
pub use sensor::{Sensor, SensorMask, SensorQuantity};
pub use sources::{DistributedTransducer, Sources, TimeVaryingSource};
