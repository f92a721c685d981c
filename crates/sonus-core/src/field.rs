//! Dense real-valued 3-D fields.

use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::grid::point_count;

/// A dense real field over a 3-D grid, stored row-major (last axis fastest).
///
/// Serialises as `{"shape": [nx, ny, nz], "data": [...]}`. Deserialisation
/// rejects buffers whose length disagrees with the shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawField")]
pub struct Field3 {
    shape: [usize; 3],
    data: Vec<f64>,
}

#[derive(Deserialize)]
struct RawField {
    shape: [usize; 3],
    data: Vec<f64>,
}

impl TryFrom<RawField> for Field3 {
    type Error = FieldError;

    fn try_from(raw: RawField) -> Result<Self, Self::Error> {
        Field3::from_vec(raw.shape, raw.data)
    }
}

impl Field3 {
    /// A field of zeros.
    pub fn zeros(shape: [usize; 3]) -> Self {
        Self::filled(shape, 0.0)
    }

    /// A field with every point set to `value`.
    ///
    /// Panics if the point count overflows `usize`, like `vec!`.
    pub fn filled(shape: [usize; 3], value: f64) -> Self {
        Self {
            shape,
            data: vec![value; shape.iter().product()],
        }
    }

    /// Wrap an existing row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::LengthMismatch`] if `data.len()` is not the
    /// product of `shape`, and [`FieldError::ShapeOverflow`] if that
    /// product does not fit in `usize`.
    pub fn from_vec(shape: [usize; 3], data: Vec<f64>) -> Result<Self, FieldError> {
        let expected = point_count(shape).ok_or(FieldError::ShapeOverflow { shape })?;
        if data.len() != expected {
            return Err(FieldError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Shape `[nx, ny, nz]`.
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the field has no points.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat index of `(i, j, k)`.
    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.shape[1] + j) * self.shape[2] + k
    }

    /// Value at `(i, j, k)`. Panics if out of bounds, like slice indexing.
    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> f64 {
        self.data[self.index(i, j, k)]
    }

    /// Set the value at `(i, j, k)`.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, k: usize, value: f64) {
        let idx = self.index(i, j, k);
        self.data[idx] = value;
    }

    /// Backing buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable backing buffer.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consume the field, returning its buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Check this field against a required shape.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::ShapeMismatch`] on disagreement.
    pub fn check_shape(&self, expected: [usize; 3]) -> Result<(), FieldError> {
        if self.shape != expected {
            return Err(FieldError::ShapeMismatch {
                expected,
                actual: self.shape,
            });
        }
        Ok(())
    }

    /// Sum of squared values.
    pub fn energy(&self) -> f64 {
        self.data.iter().map(|v| v * v).sum()
    }

    /// Largest absolute value (0 for an empty field).
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0_f64, |m, v| m.max(v.abs()))
    }

    /// Whether every value is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Index of the first non-finite value, if any.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.data.iter().position(|v| !v.is_finite())
    }

    /// The 2-D slice through the centre of the grid, normal to `axis`.
    ///
    /// Returns `(rows, cols, values)` with values row-major. For `axis = 2`
    /// rows run along x and columns along y.
    pub fn central_slice(&self, axis: usize) -> (usize, usize, Vec<f64>) {
        let [nx, ny, nz] = self.shape;
        let mid = self.shape[axis] / 2;
        match axis {
            0 => {
                let vals = (0..ny)
                    .flat_map(|j| (0..nz).map(move |k| (j, k)))
                    .map(|(j, k)| self.get(mid, j, k))
                    .collect();
                (ny, nz, vals)
            }
            1 => {
                let vals = (0..nx)
                    .flat_map(|i| (0..nz).map(move |k| (i, k)))
                    .map(|(i, k)| self.get(i, mid, k))
                    .collect();
                (nx, nz, vals)
            }
            _ => {
                let vals = (0..nx)
                    .flat_map(|i| (0..ny).map(move |j| (i, j)))
                    .map(|(i, j)| self.get(i, j, mid))
                    .collect();
                (nx, ny, vals)
            }
        }
    }
}
