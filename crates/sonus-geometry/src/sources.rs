//! Time-varying pressure sources.
//!
//! A source supplies one amplitude per grid point per time index. Sample
//! `n` of a signal belongs to time index `n` (`t = n dt`); once a signal
//! runs out the source is silent.
//!
//! - [`Sources`]: grid points, each with its own signal
//! - [`DistributedTransducer`]: one signal spread over a weighted mask

use std::fmt;

use sonus_core::Field3;

use crate::error::GeometryError;

/// Anything a solver can inject at each time step.
pub trait TimeVaryingSource: fmt::Debug {
    /// Sampling interval of the signals, in seconds.
    fn dt(&self) -> f64;

    /// Check the source against a grid of `shape`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] if the source does not fit the grid.
    fn validate(&self, shape: [usize; 3]) -> Result<(), GeometryError>;

    /// Add the amplitudes at time index `n` into `out`, a row-major buffer
    /// over a grid of `shape`. Returns whether anything non-zero was added.
    fn add_on_grid(&self, n: usize, shape: [usize; 3], out: &mut [f64]) -> bool;

    /// The amplitudes at time index `n` as a field.
    fn on_grid(&self, n: usize, shape: [usize; 3]) -> Field3 {
        let mut field = Field3::zeros(shape);
        self.add_on_grid(n, shape, field.as_mut_slice());
        field
    }
}

/// Point sources on grid positions.
///
/// Two sources at the same position add.
#[derive(Clone, Debug, PartialEq)]
pub struct Sources {
    positions: Vec<[usize; 3]>,
    signals: Vec<Vec<f64>>,
    dt: f64,
}

impl Sources {
    /// Point sources at `positions`, driven by `signals` sampled every `dt`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::SignalCount`] unless there is exactly one
    /// signal per position.
    pub fn new(
        positions: Vec<[usize; 3]>,
        signals: Vec<Vec<f64>>,
        dt: f64,
    ) -> Result<Self, GeometryError> {
        if positions.len() != signals.len() {
            return Err(GeometryError::SignalCount {
                positions: positions.len(),
                signals: signals.len(),
            });
        }
        Ok(Self {
            positions,
            signals,
            dt,
        })
    }

    /// No sources at all.
    pub fn none(dt: f64) -> Self {
        Self {
            positions: Vec::new(),
            signals: Vec::new(),
            dt,
        }
    }

    /// Source positions, in order.
    pub fn positions(&self) -> &[[usize; 3]] {
        &self.positions
    }

    /// One signal per position.
    pub fn signals(&self) -> &[Vec<f64>] {
        &self.signals
    }

    /// Whether there are no sources.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// `true` at every source position on a grid of `shape`.
    ///
    /// Positions must already have been checked with
    /// [`validate`](TimeVaryingSource::validate).
    pub fn to_binary_mask(&self, shape: [usize; 3]) -> Vec<bool> {
        let mut mask = vec![false; shape.iter().product()];
        for p in &self.positions {
            mask[(p[0] * shape[1] + p[1]) * shape[2] + p[2]] = true;
        }
        mask
    }
}

impl TimeVaryingSource for Sources {
    fn dt(&self) -> f64 {
        self.dt
    }

    fn validate(&self, shape: [usize; 3]) -> Result<(), GeometryError> {
        match self
            .positions
            .iter()
            .find(|p| (0..3).any(|a| p[a] >= shape[a]))
        {
            Some(point) => Err(GeometryError::PointOutOfBounds {
                point: *point,
                shape,
            }),
            None => Ok(()),
        }
    }

    fn add_on_grid(&self, n: usize, shape: [usize; 3], out: &mut [f64]) -> bool {
        let mut any = false;
        for (p, signal) in self.positions.iter().zip(&self.signals) {
            if let Some(&v) = signal.get(n).filter(|v| **v != 0.0) {
                out[(p[0] * shape[1] + p[1]) * shape[2] + p[2]] += v;
                any = true;
            }
        }
        any
    }
}

/// A weighted aperture driven by a single signal.
///
/// Transmitting, the field at time index `n` is `signal[n] · mask`.
/// Receiving, [`response`](Self::response) is the mask-weighted sum of a
/// field.
#[derive(Clone, Debug, PartialEq)]
pub struct DistributedTransducer {
    mask: Field3,
    signal: Vec<f64>,
    dt: f64,
}

impl DistributedTransducer {
    /// A transducer with aperture weights `mask`.
    pub fn new(mask: Field3, signal: Vec<f64>, dt: f64) -> Self {
        Self { mask, signal, dt }
    }

    /// A unit-weight line of `width` points along the second axis, centred,
    /// at index `position` on the first axis and in the central plane of
    /// the third.
    pub fn line(shape: [usize; 3], position: usize, width: usize) -> Self {
        let mut mask = Field3::zeros(shape);
        let start = shape[1].saturating_sub(width) / 2;
        let end = ((shape[1] + width) / 2).min(shape[1]);
        if position < shape[0] {
            for j in start..end {
                mask.set(position, j, shape[2] / 2, 1.0);
            }
        }
        Self::new(mask, Vec::new(), 0.0)
    }

    /// The same aperture with a new signal.
    pub fn with_signal(self, signal: Vec<f64>, dt: f64) -> Self {
        Self { signal, dt, ..self }
    }

    /// The same signal with a new aperture.
    pub fn with_mask(self, mask: Field3) -> Self {
        Self { mask, ..self }
    }

    /// Aperture weights.
    pub fn mask(&self) -> &Field3 {
        &self.mask
    }

    /// Drive signal.
    pub fn signal(&self) -> &[f64] {
        &self.signal
    }

    /// Mask-weighted sum of `field`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DimensionMismatch`] if `field` is not shaped
    /// like the mask.
    pub fn response(&self, field: &Field3) -> Result<f64, GeometryError> {
        if field.shape() != self.mask.shape() {
            return Err(GeometryError::DimensionMismatch {
                expected: self.mask.shape(),
                actual: field.shape(),
            });
        }
        Ok(self
            .mask
            .as_slice()
            .iter()
            .zip(field.as_slice())
            .map(|(w, v)| w * v)
            .sum())
    }
}

impl TimeVaryingSource for DistributedTransducer {
    fn dt(&self) -> f64 {
        self.dt
    }

    fn validate(&self, shape: [usize; 3]) -> Result<(), GeometryError> {
        if self.mask.shape() != shape {
            return Err(GeometryError::DimensionMismatch {
                expected: shape,
                actual: self.mask.shape(),
            });
        }
        Ok(())
    }

    fn add_on_grid(&self, n: usize, _shape: [usize; 3], out: &mut [f64]) -> bool {
        let Some(&s) = self.signal.get(n).filter(|s| **s != 0.0) else {
            return false;
        };
        for (o, w) in out.iter_mut().zip(self.mask.as_slice()) {
            *o += s * w;
        }
        true
    }
}
