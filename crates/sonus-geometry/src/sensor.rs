//! On-grid sensors.
//!
//! A [`Sensor`] says *where* to sample (the whole grid or a list of grid
//! points) and *what* to record. Recording only [`SensorQuantity::PressureFinal`]
//! keeps memory flat in the step count; any time-history quantity costs one
//! sample vector per step.

use smallvec::{smallvec, SmallVec};
use sonus_core::Field3;

use crate::error::GeometryError;

/// A quantity a sensor can record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SensorQuantity {
    /// Pressure at every time step (time history).
    Pressure,
    /// Pressure at the final time step only.
    PressureFinal,
    /// Running maximum of pressure over all steps.
    PressureMax,
    /// Running minimum of pressure over all steps.
    PressureMin,
    /// Root-mean-square pressure over all steps.
    PressureRms,
}

impl SensorQuantity {
    /// Short name as used in result files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pressure => "p",
            Self::PressureFinal => "p_final",
            Self::PressureMax => "p_max",
            Self::PressureMin => "p_min",
            Self::PressureRms => "p_rms",
        }
    }

    /// Whether the quantity keeps one record per time step.
    pub fn is_time_history(&self) -> bool {
        matches!(self, Self::Pressure)
    }
}

/// Where a sensor samples.
#[derive(Clone, Debug, PartialEq)]
pub enum SensorMask {
    /// Every grid point.
    Full,
    /// The listed grid points, in order.
    Points(Vec<[usize; 3]>),
}

/// A sampling location set plus the quantities to record there.
#[derive(Clone, Debug, PartialEq)]
pub struct Sensor {
    /// Where to sample.
    pub mask: SensorMask,
    /// What to record, in output order.
    pub record: SmallVec<[SensorQuantity; 4]>,
}

impl Sensor {
    /// Records only the final pressure over the whole grid.
    pub fn final_pressure() -> Self {
        Self {
            mask: SensorMask::Full,
            record: smallvec![SensorQuantity::PressureFinal],
        }
    }

    /// Records `record` at the listed grid points.
    pub fn at_points(
        points: Vec<[usize; 3]>,
        record: impl IntoIterator<Item = SensorQuantity>,
    ) -> Self {
        Self {
            mask: SensorMask::Points(points),
            record: record.into_iter().collect(),
        }
    }

    /// Whether `quantity` is recorded.
    pub fn records(&self, quantity: SensorQuantity) -> bool {
        self.record.contains(&quantity)
    }

    /// Whether any recorded quantity keeps a per-step history.
    pub fn records_time_history(&self) -> bool {
        self.record.iter().any(SensorQuantity::is_time_history)
    }

    /// Number of sampled values for a grid of `shape`.
    pub fn sample_count(&self, shape: [usize; 3]) -> usize {
        match &self.mask {
            SensorMask::Full => shape.iter().product(),
            SensorMask::Points(p) => p.len(),
        }
    }

    /// Check every sensor point against `shape`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::PointOutOfBounds`] for the first bad point.
    pub fn validate(&self, shape: [usize; 3]) -> Result<(), GeometryError> {
        if let SensorMask::Points(points) = &self.mask {
            if let Some(point) = points
                .iter()
                .find(|p| (0..3).any(|a| p[a] >= shape[a]))
            {
                return Err(GeometryError::PointOutOfBounds {
                    point: *point,
                    shape,
                });
            }
        }
        Ok(())
    }

    /// Sample `field` at the sensor locations.
    ///
    /// Points must already have been checked with [`validate`](Self::validate).
    pub fn sample(&self, field: &Field3) -> Vec<f64> {
        match &self.mask {
            SensorMask::Full => field.as_slice().to_vec(),
            SensorMask::Points(points) => points
                .iter()
                .map(|p| field.get(p[0], p[1], p[2]))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_pressure_sensor_has_no_history() {
        let s = Sensor::final_pressure();
        assert_eq!(s.record.as_slice(), &[SensorQuantity::PressureFinal]);
        assert!(s.records(SensorQuantity::PressureFinal));
        assert!(!s.records(SensorQuantity::Pressure));
        assert!(!s.records_time_history());
        assert_eq!(s.sample_count([4, 4, 2]), 32);
    }

    #[test]
    fn point_sensor_samples_in_order() {
        let mut f = Field3::zeros([3, 3, 3]);
        f.set(0, 1, 2, 4.0);
        f.set(2, 2, 2, -1.0);
        let s = Sensor::at_points(
            vec![[2, 2, 2], [0, 1, 2]],
            [SensorQuantity::Pressure, SensorQuantity::PressureMax],
        );
        assert!(s.validate([3, 3, 3]).is_ok());
        assert!(s.records_time_history());
        assert_eq!(s.sample(&f), vec![-1.0, 4.0]);
    }

    #[test]
    fn out_of_bounds_point_is_rejected() {
        let s = Sensor::at_points(vec![[0, 0, 0], [0, 3, 0]], [SensorQuantity::Pressure]);
        assert_eq!(
            s.validate([3, 3, 3]),
            Err(GeometryError::PointOutOfBounds {
                point: [0, 3, 0],
                shape: [3, 3, 3]
            })
        );
    }

    #[test]
    fn quantity_names_match_result_keys() {
        assert_eq!(SensorQuantity::PressureFinal.name(), "p_final");
        assert_eq!(SensorQuantity::PressureRms.name(), "p_rms");
    }
}
