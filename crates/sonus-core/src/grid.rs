//! Discretised spatial domain.

use crate::error::GridError;

/// Product of `shape`, or `None` on overflow.
pub fn point_count(shape: [usize; 3]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n))
}

/// A regular 3-D grid: point counts and spacings per axis.
///
/// Axes of length 1 are degenerate. A `[Nx, Ny, 1]` grid is a 2-D problem
/// and `[Nx, 1, 1]` a 1-D one; solvers skip degenerate axes entirely.
///
/// Storage order everywhere in sonus is row-major with the last axis
/// fastest: `index = (i * ny + j) * nz + k`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
    n: [usize; 3],
    spacing: [f64; 3],
}

impl GridSpec {
    /// Create a grid, validating counts and spacings.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptyAxis`] if any count is zero,
    /// [`GridError::InvalidSpacing`] if any spacing is not finite and > 0,
    /// and [`GridError::TooManyPoints`] if the point count overflows.
    pub fn new(n: [usize; 3], spacing: [f64; 3]) -> Result<Self, GridError> {
        for axis in 0..3 {
            if n[axis] == 0 {
                return Err(GridError::EmptyAxis { axis });
            }
            let dx = spacing[axis];
            if !(dx.is_finite() && dx > 0.0) {
                return Err(GridError::InvalidSpacing { axis, value: dx });
            }
        }
        if point_count(n).is_none() {
            return Err(GridError::TooManyPoints { shape: n });
        }
        Ok(Self { n, spacing })
    }

    /// Point counts per axis.
    pub fn shape(&self) -> [usize; 3] {
        self.n
    }

    /// Grid spacing per axis, in metres.
    pub fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    /// Total number of grid points.
    pub fn cell_count(&self) -> usize {
        self.n.iter().product()
    }

    /// Whether `axis` carries more than one point.
    pub fn is_active(&self, axis: usize) -> bool {
        self.n[axis] > 1
    }

    /// Number of non-degenerate axes (the problem dimensionality).
    pub fn active_dims(&self) -> usize {
        (0..3).filter(|&a| self.is_active(a)).count()
    }

    /// Smallest spacing over the active axes (all axes if none are active).
    pub fn min_spacing(&self) -> f64 {
        let active = (0..3)
            .filter(|&a| self.is_active(a))
            .map(|a| self.spacing[a]);
        let min = active.fold(f64::INFINITY, f64::min);
        if min.is_finite() {
            min
        } else {
            self.spacing.iter().copied().fold(f64::INFINITY, f64::min)
        }
    }

    /// Flat index of point `(i, j, k)`.
    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.n[1] + j) * self.n[2] + k
    }

    /// Inverse of [`index`](Self::index).
    #[inline]
    pub fn coords(&self, index: usize) -> [usize; 3] {
        let k = index % self.n[2];
        let j = (index / self.n[2]) % self.n[1];
        let i = index / (self.n[1] * self.n[2]);
        [i, j, k]
    }

    /// The central grid point, `N / 2` on each axis.
    pub fn center(&self) -> [usize; 3] {
        [self.n[0] / 2, self.n[1] / 2, self.n[2] / 2]
    }

    /// Point positions along `axis`, centred on zero.
    ///
    /// For `N` points the positions are `(m - (N - 1) / 2) * dx` for
    /// `m = 0..N`, so the axis is symmetric about the origin.
    pub fn spatial_axis(&self, axis: usize) -> Vec<f64> {
        let n = self.n[axis];
        let dx = self.spacing[axis];
        let offset = (n as f64 - 1.0) / 2.0;
        (0..n).map(|m| (m as f64 - offset) * dx).collect()
    }

    /// Physical extent along each axis, `(N - 1) * dx`.
    pub fn extent(&self) -> [f64; 3] {
        let mut out = [0.0; 3];
        for (axis, e) in out.iter_mut().enumerate() {
            *e = (self.n[axis] as f64 - 1.0) * self.spacing[axis];
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ── Construction ────────────────────────────────────────────

    #[test]
    fn rejects_empty_axis() {
        let err = GridSpec::new([4, 0, 4], [1.0; 3]).unwrap_err();
        assert_eq!(err, GridError::EmptyAxis { axis: 1 });
    }

    #[test]
    fn rejects_bad_spacing() {
        assert!(GridSpec::new([4, 4, 4], [1.0, 0.0, 1.0]).is_err());
        assert!(GridSpec::new([4, 4, 4], [1.0, 1.0, f64::NAN]).is_err());
        assert!(GridSpec::new([4, 4, 4], [-1e-4, 1.0, 1.0]).is_err());
    }

    #[test]
    fn rejects_point_count_overflow() {
        let shape = [1 << 32, 1 << 32, 2];
        let err = GridSpec::new(shape, [1e-4; 3]).unwrap_err();
        assert_eq!(err, GridError::TooManyPoints { shape });
        assert_eq!(point_count(shape), None);
        assert_eq!(point_count([4, 5, 6]), Some(120));
    }

    #[test]
    fn degenerate_axes_reduce_dimensionality() {
        let g = GridSpec::new([16, 8, 1], [1e-4; 3]).unwrap();
        assert_eq!(g.active_dims(), 2);
        assert!(!g.is_active(2));
        assert_eq!(g.cell_count(), 128);
    }

    // ── Geometry ────────────────────────────────────────────────

    #[test]
    fn spatial_axis_is_centred() {
        let g = GridSpec::new([5, 4, 1], [0.5, 1.0, 1.0]).unwrap();
        assert_eq!(g.spatial_axis(0), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(g.spatial_axis(1), vec![-1.5, -0.5, 0.5, 1.5]);
        assert_eq!(g.extent(), [2.0, 3.0, 0.0]);
    }

    #[test]
    fn min_spacing_ignores_degenerate_axes() {
        let g = GridSpec::new([8, 8, 1], [2.0, 3.0, 0.1]).unwrap();
        assert_eq!(g.min_spacing(), 2.0);
    }

    proptest! {
        #[test]
        fn index_coords_roundtrip(
            nx in 1usize..9, ny in 1usize..9, nz in 1usize..9, seed in 0usize..10_000,
        ) {
            let g = GridSpec::new([nx, ny, nz], [1.0; 3]).unwrap();
            let idx = seed % g.cell_count();
            let [i, j, k] = g.coords(idx);
            prop_assert!(i < nx && j < ny && k < nz);
            prop_assert_eq!(g.index(i, j, k), idx);
        }
    }
}
