//! Error types for geometry and sensor operations.

use std::fmt;

/// Errors arising from sensor or source construction and sampling.
#[derive(Clone, Debug, PartialEq)]
pub enum GeometryError {
    /// A sensor point lies outside the grid.
    PointOutOfBounds {
        /// The offending point.
        point: [usize; 3],
        /// The grid shape.
        shape: [usize; 3],
    },
    /// An off-grid position lies outside `[0, N - 1]` on some axis.
    PositionOutOfRange {
        /// Index of the sensor.
        sensor: usize,
        /// The offending coordinate.
        value: f64,
    },
    /// A field passed for sampling does not have the expected shape.
    DimensionMismatch {
        /// The shape the sensor was built for.
        expected: [usize; 3],
        /// The shape found.
        actual: [usize; 3],
    },
    /// Point sources need exactly one signal per position.
    SignalCount {
        /// Number of positions.
        positions: usize,
        /// Number of signals.
        signals: usize,
    },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PointOutOfBounds { point, shape } => {
                write!(f, "sensor point {point:?} outside grid of shape {shape:?}")
            }
            Self::PositionOutOfRange { sensor, value } => {
                write!(f, "off-grid sensor {sensor} has coordinate {value} outside the grid")
            }
            Self::DimensionMismatch { expected, actual } => {
                write!(f, "sensor built for shape {expected:?}, sampled on {actual:?}")
            }
            Self::SignalCount { positions, signals } => {
                write!(f, "{positions} source positions but {signals} signals")
            }
        }
    }
}

impl std::error::Error for GeometryError {}
