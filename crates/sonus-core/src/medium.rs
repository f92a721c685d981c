//! Acoustic medium description.

use serde::{Deserialize, Serialize};

use crate::conversion::db_to_neper;
use crate::error::MediumError;
use crate::field::Field3;
use crate::grid::GridSpec;

/// A material property that is either homogeneous or varies per point.
///
/// In a setup file a property is written as a bare number or as a field
/// object (`{"shape": ..., "data": ...}`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Property {
    /// The same value at every point.
    Scalar(f64),
    /// One value per grid point.
    Field(Field3),
}

impl Property {
    /// Value at flat index `index`.
    #[inline]
    pub fn value_at(&self, index: usize) -> f64 {
        match self {
            Self::Scalar(v) => *v,
            Self::Field(f) => f.as_slice()[index],
        }
    }

    /// Largest value.
    pub fn max(&self) -> f64 {
        match self {
            Self::Scalar(v) => *v,
            Self::Field(f) => f.as_slice().iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }

    /// Smallest value.
    pub fn min(&self) -> f64 {
        match self {
            Self::Scalar(v) => *v,
            Self::Field(f) => f.as_slice().iter().copied().fold(f64::INFINITY, f64::min),
        }
    }

    /// Expand to a full field over `shape`.
    pub fn to_field(&self, shape: [usize; 3]) -> Field3 {
        match self {
            Self::Scalar(v) => Field3::filled(shape, *v),
            Self::Field(f) => f.clone(),
        }
    }

    fn validate(&self, property: &'static str, shape: [usize; 3]) -> Result<(), MediumError> {
        match self.find_value(shape, property, |v| v.is_finite() && v > 0.0)? {
            Some(value) => Err(MediumError::NonPositive { property, value }),
            None => Ok(()),
        }
    }

    fn validate_non_negative(
        &self,
        property: &'static str,
        shape: [usize; 3],
    ) -> Result<(), MediumError> {
        match self.find_value(shape, property, |v| v.is_finite() && v >= 0.0)? {
            Some(value) => Err(MediumError::Negative { property, value }),
            None => Ok(()),
        }
    }

    /// Shape-check, then return the first value failing `ok`.
    fn find_value(
        &self,
        shape: [usize; 3],
        property: &'static str,
        ok: impl Fn(f64) -> bool,
    ) -> Result<Option<f64>, MediumError> {
        match self {
            Self::Scalar(v) => Ok(Some(*v).filter(|v| !ok(*v))),
            Self::Field(f) => {
                f.check_shape(shape)
                    .map_err(|source| MediumError::Shape { property, source })?;
                Ok(f.as_slice().iter().copied().find(|v| !ok(*v)))
            }
        }
    }
}

impl From<f64> for Property {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

impl From<Field3> for Property {
    fn from(f: Field3) -> Self {
        Self::Field(f)
    }
}

/// Power-law absorption `α(ω) = α0 ω^y`.
#[derive(Clone, Debug, PartialEq)]
pub struct Attenuation {
    /// `α0` in dB/(MHz^y cm), scalar or per point.
    pub coefficient: Property,
    /// The exponent `y`.
    pub power: f64,
}

impl Attenuation {
    /// Absorption with coefficient `coefficient` (dB/(MHz^y cm)) and
    /// exponent `power`.
    pub fn new(coefficient: impl Into<Property>, power: f64) -> Self {
        Self {
            coefficient: coefficient.into(),
            power,
        }
    }

    /// The coefficient at flat index `index` in Np/((rad/s)^y m).
    pub fn nepers_at(&self, index: usize) -> f64 {
        db_to_neper(self.coefficient.value_at(index), self.power)
    }

    /// Whether the coefficient is zero everywhere.
    pub fn is_zero(&self) -> bool {
        match &self.coefficient {
            Property::Scalar(v) => *v == 0.0,
            Property::Field(f) => f.as_slice().iter().all(|&v| v == 0.0),
        }
    }

    fn validate(&self, shape: [usize; 3]) -> Result<(), MediumError> {
        let y = self.power;
        if !(y.is_finite() && y > 0.0 && y < 3.0) || y == 1.0 {
            return Err(MediumError::InvalidPowerLaw { power: y });
        }
        self.coefficient.validate_non_negative("attenuation", shape)
    }
}

/// Sound speed, ambient density and optional absorption of a fluid.
#[derive(Clone, Debug, PartialEq)]
pub struct Medium {
    /// Sound speed in m/s.
    pub sound_speed: Property,
    /// Ambient density in kg/m³.
    pub density: Property,
    /// Power-law absorption; `None` is lossless.
    pub attenuation: Option<Attenuation>,
}

impl Medium {
    /// A lossless medium with the given properties.
    pub fn new(sound_speed: impl Into<Property>, density: impl Into<Property>) -> Self {
        Self {
            sound_speed: sound_speed.into(),
            density: density.into(),
            attenuation: None,
        }
    }

    /// The same medium with power-law absorption.
    pub fn with_attenuation(mut self, attenuation: Attenuation) -> Self {
        self.attenuation = Some(attenuation);
        self
    }

    /// Check every property is finite and shaped like `grid`, with sound
    /// speed and density positive and absorption non-negative.
    ///
    /// # Errors
    ///
    /// Returns the first [`MediumError`] found, sound speed first.
    pub fn validate(&self, grid: &GridSpec) -> Result<(), MediumError> {
        self.sound_speed.validate("sound_speed", grid.shape())?;
        self.density.validate("density", grid.shape())?;
        if let Some(a) = &self.attenuation {
            a.validate(grid.shape())?;
        }
        Ok(())
    }

    /// The reference sound speed used for the k-space correction and the
    /// PML: the maximum sound speed in the medium.
    pub fn reference_sound_speed(&self) -> f64 {
        self.sound_speed.max()
    }

    /// Whether sound speed and density are both homogeneous.
    pub fn is_homogeneous(&self) -> bool {
        matches!(
            (&self.sound_speed, &self.density),
            (Property::Scalar(_), Property::Scalar(_))
        )
    }

    /// Whether the medium absorbs anywhere.
    pub fn is_lossy(&self) -> bool {
        self.attenuation.as_ref().is_some_and(|a| !a.is_zero())
    }
}
