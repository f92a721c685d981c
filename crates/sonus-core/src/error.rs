//! Error types for grid, field, and medium construction.
//!
//! Each subsystem gets its own enum so callers can match on the failure
//! that actually concerns them. Wrapping errors expose the inner cause via
//! [`Error::source`].

use std::error::Error;
use std::fmt;

/// Errors from [`GridSpec`](crate::GridSpec) validation.
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// An axis has zero points.
    EmptyAxis {
        /// Index of the offending axis (0 = x).
        axis: usize,
    },
    /// A grid spacing is zero, negative, or not finite.
    InvalidSpacing {
        /// Index of the offending axis.
        axis: usize,
        /// The rejected spacing.
        value: f64,
    },
    /// The total point count does not fit in `usize`.
    TooManyPoints {
        /// The requested counts.
        shape: [usize; 3],
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyAxis { axis } => write!(f, "grid axis {axis} has no points"),
            Self::InvalidSpacing { axis, value } => {
                write!(f, "grid spacing on axis {axis} must be finite and > 0, got {value}")
            }
            Self::TooManyPoints { shape } => {
                write!(f, "grid {shape:?} has more points than fit in memory")
            }
        }
    }
}

impl Error for GridError {}

/// Errors from [`Field3`](crate::Field3) construction and shape checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldError {
    /// The backing buffer length does not match the product of the shape.
    LengthMismatch {
        /// Number of elements implied by the shape.
        expected: usize,
        /// Number of elements supplied.
        actual: usize,
    },
    /// A field's shape does not match the shape it is used with.
    ShapeMismatch {
        /// The required shape.
        expected: [usize; 3],
        /// The shape found.
        actual: [usize; 3],
    },
    /// The product of the shape overflows `usize`.
    ShapeOverflow {
        /// The rejected shape.
        shape: [usize; 3],
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { expected, actual } => {
                write!(f, "field data has {actual} elements, shape requires {expected}")
            }
            Self::ShapeMismatch { expected, actual } => {
                write!(f, "field shape {actual:?} does not match {expected:?}")
            }
            Self::ShapeOverflow { shape } => {
                write!(f, "field shape {shape:?} has too many points")
            }
        }
    }
}

impl Error for FieldError {}

/// Errors from [`Medium`](crate::Medium) validation.
#[derive(Clone, Debug, PartialEq)]
pub enum MediumError {
    /// A property holds a value that is zero, negative, or not finite.
    NonPositive {
        /// Name of the property (`"sound_speed"` or `"density"`).
        property: &'static str,
        /// The first offending value.
        value: f64,
    },
    /// An absorption coefficient is negative or not finite.
    Negative {
        /// Name of the property.
        property: &'static str,
        /// The first offending value.
        value: f64,
    },
    /// The power-law exponent is outside `(0, 3)` or exactly 1.
    InvalidPowerLaw {
        /// The rejected exponent.
        power: f64,
    },
    /// A field-valued property does not match the grid shape.
    Shape {
        /// Name of the property.
        property: &'static str,
        /// The underlying shape error.
        source: FieldError,
    },
}

impl fmt::Display for MediumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositive { property, value } => {
                write!(f, "{property} must be finite and > 0 everywhere, found {value}")
            }
            Self::Negative { property, value } => {
                write!(f, "{property} must be finite and >= 0 everywhere, found {value}")
            }
            Self::InvalidPowerLaw { power } => {
                write!(f, "absorption power must be in (0, 3) and not 1, got {power}")
            }
            Self::Shape { property, source } => write!(f, "{property}: {source}"),
        }
    }
}

impl Error for MediumError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Shape { source, .. } => Some(source),
            Self::NonPositive { .. } | Self::Negative { .. } | Self::InvalidPowerLaw { .. } => {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medium_shape_error_chains_source() {
        let err = MediumError::Shape {
            property: "density",
            source: FieldError::ShapeMismatch {
                expected: [4, 4, 4],
                actual: [4, 4, 2],
            },
        };
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("density:"));
    }

    #[test]
    fn grid_error_messages_name_the_axis() {
        let msg = GridError::InvalidSpacing {
            axis: 2,
            value: -1.0,
        }
        .to_string();
        assert!(msg.contains("axis 2"));
        assert!(msg.contains("-1"));
    }
}
