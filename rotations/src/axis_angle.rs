use crate::prelude::UnitQuaternion;
use crate::vector::{is_unit, UNIT_TOLERANCE};
use nalgebra::Vector3;
use thiserror::Error;

use crate::RotationTrait;

#[derive(Debug, Error, Copy, Clone, PartialEq)]
pub enum AxisAngleErrors {
    #[error("rotation axis must be unit length, got magnitude {0}")]
    InvalidAxis(f64),
}

/// A rotation of `angle` radians about a unit `axis`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAngle {
    pub angle: f64,
    pub axis: Vector3<f64>,
}

impl AxisAngle {
    const IDENTITY: Self = Self { angle: 0.0, axis: Vector3::new(1.0, 0.0, 0.0) };

    /// The axis is checked, not corrected: anything outside the unit
    /// tolerance is rejected.
    pub fn new(angle: f64, axis: Vector3<f64>) -> Result<Self, AxisAngleErrors> {
        if !is_unit(&axis, UNIT_TOLERANCE) {
            return Err(AxisAngleErrors::InvalidAxis(axis.norm()));
        }
        Ok(Self { angle, axis })
    }
}

impl RotationTrait for AxisAngle {
    fn rotate(&self, v: &Vector3<f64>) -> Vector3<f64> {
        let quaternion = UnitQuaternion::from(self);
        quaternion.rotate(v)
    }

    fn transform(&self, v: &Vector3<f64>) -> Vector3<f64> {
        let quaternion = UnitQuaternion::from(self);
        quaternion.transform(v)
    }

    fn inv(&self) -> Self {
        Self { angle: -self.angle, axis: self.axis }
    }

    fn identity() -> Self {
        Self::IDENTITY
    }
}
