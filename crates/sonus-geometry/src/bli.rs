//! Band-limited-interpolant (off-grid) sensors.
//!
//! A field on a pseudospectral grid is band limited, so it can be evaluated
//! exactly between grid points by a periodic sinc (Dirichlet kernel)
//! sum. The kernel is separable, so a 3-D sample is three successive 1-D
//! contractions.

use std::f64::consts::PI;

use sonus_core::Field3;

use crate::error::GeometryError;

/// Interpolation weights for a sample at position `x0` (in grid-index
/// units) on an axis of `n` points.
///
/// When `x0` lands exactly on a grid point the weights collapse to a
/// Kronecker delta there.
pub fn bli_weights(x0: f64, n: usize) -> Vec<f64> {
    if let Some(hit) = (0..n).position(|x| x as f64 - x0 == 0.0) {
        let mut w = vec![0.0; n];
        w[hit] = 1.0;
        return w;
    }
    let nf = n as f64;
    (0..n)
        .map(|x| {
            let xf = x as f64;
            let dx = xf - x0;
            if n % 2 == 0 {
                (PI * dx).sin() / (PI * dx / nf).tan() / nf
                    - (PI * x0).sin() * (PI * xf).sin() / nf
            } else {
                (PI * dx).sin() / (PI * dx / nf).sin() / nf
            }
        })
        .collect()
}

/// A set of off-grid sensors with precomputed interpolation weights.
#[derive(Clone, Debug)]
pub struct BliSensors {
    shape: [usize; 3],
    weights: Vec<[Vec<f64>; 3]>,
}

impl BliSensors {
    /// Precompute weights for `positions` (grid-index units) on a grid of
    /// `shape`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::PositionOutOfRange`] if a coordinate lies
    /// outside `[0, N - 1]` or is not finite.
    pub fn new(positions: &[[f64; 3]], shape: [usize; 3]) -> Result<Self, GeometryError> {
        let mut weights = Vec::with_capacity(positions.len());
        for (sensor, pos) in positions.iter().enumerate() {
            for a in 0..3 {
                let v = pos[a];
                if !(v.is_finite() && v >= 0.0 && v <= (shape[a] - 1) as f64) {
                    return Err(GeometryError::PositionOutOfRange { sensor, value: v });
                }
            }
            weights.push([
                bli_weights(pos[0], shape[0]),
                bli_weights(pos[1], shape[1]),
                bli_weights(pos[2], shape[2]),
            ]);
        }
        Ok(Self { shape, weights })
    }

    /// Number of sensors.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether there are no sensors.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Interpolate `field` at every sensor position.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DimensionMismatch`] if `field` is not the
    /// shape the sensors were built for.
    pub fn sample(&self, field: &Field3) -> Result<Vec<f64>, GeometryError> {
        if field.shape() != self.shape {
            return Err(GeometryError::DimensionMismatch {
                expected: self.shape,
                actual: field.shape(),
            });
        }
        let [nx, ny, nz] = self.shape;
        let data = field.as_slice();
        let out = self
            .weights
            .iter()
            .map(|[wx, wy, wz]| {
                let mut acc = 0.0;
                for i in 0..nx {
                    if wx[i] == 0.0 {
                        continue;
                    }
                    let mut plane = 0.0;
                    for j in 0..ny {
                        if wy[j] == 0.0 {
                            continue;
                        }
                        let row = &data[(i * ny + j) * nz..(i * ny + j + 1) * nz];
                        let line: f64 = row.iter().zip(wz).map(|(v, w)| v * w).sum();
                        plane += wy[j] * line;
                    }
                    acc += wx[i] * plane;
                }
                acc
            })
            .collect();
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn on_grid_weights_are_delta() {
        assert_eq!(bli_weights(2.0, 5), vec![0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn weights_sum_to_one_for_odd_n() {
        // The Dirichlet kernel reproduces constants exactly.
        let w = bli_weights(1.37, 9);
        let s: f64 = w.iter().sum();
        assert!((s - 1.0).abs() < 1e-12, "sum = {s}");
    }

    #[test]
    fn interpolates_band_limited_cosine() {
        // One full period over the odd-length axis is within the band.
        let n = 9;
        let f = |x: f64| (2.0 * PI * x / n as f64).cos();
        let field = Field3::from_vec([n, 1, 1], (0..n).map(|x| f(x as f64)).collect()).unwrap();
        let s = BliSensors::new(&[[2.5, 0.0, 0.0], [6.25, 0.0, 0.0]], [n, 1, 1]).unwrap();
        let got = s.sample(&field).unwrap();
        assert!((got[0] - f(2.5)).abs() < 1e-10);
        assert!((got[1] - f(6.25)).abs() < 1e-10);
    }

    #[test]
    fn on_grid_sample_matches_field() {
        let mut field = Field3::zeros([4, 4, 4]);
        field.set(1, 2, 3, 9.0);
        let s = BliSensors::new(&[[1.0, 2.0, 3.0]], [4, 4, 4]).unwrap();
        assert_eq!(s.sample(&field).unwrap(), vec![9.0]);
    }

    #[test]
    fn rejects_positions_outside_grid() {
        let err = BliSensors::new(&[[0.0, 4.5, 0.0]], [4, 4, 4]).unwrap_err();
        assert_eq!(
            err,
            GeometryError::PositionOutOfRange {
                sensor: 0,
                value: 4.5
            }
        );
    }

    #[test]
    fn rejects_wrong_field_shape() {
        let s = BliSensors::new(&[[0.5, 0.0, 0.0]], [4, 1, 1]).unwrap();
        assert!(s.sample(&Field3::zeros([4, 2, 1])).is_err());
    }

    proptest! {
        #[test]
        fn odd_axis_reproduces_constants(half in 1usize..8, x0 in 0.0f64..1.0) {
            let n = 2 * half + 1;
            let x = x0 * (n - 1) as f64;
            let s: f64 = bli_weights(x, n).iter().sum();
            prop_assert!((s - 1.0).abs() < 1e-9, "n={} x={} sum={}", n, x, s);
        }
    }
}
