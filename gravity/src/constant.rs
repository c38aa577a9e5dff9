use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{GravityErrors, GravityModel, Units};

/// Uniform gravity field, e.g. for a flat earth near the launch site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConstantGravity {
    pub g: Vector3<f64>,
}

impl ConstantGravity {
    pub fn new(g: Vector3<f64>) -> Self {
        Self { g }
    }

    /// Standard surface gravity pointing down the world -Z axis.
    pub fn surface(units: Units) -> Self {
        Self::new(Vector3::new(0.0, 0.0, -units.standard_gravity()))
    }
}

impl GravityModel for ConstantGravity {
    fn calculate(&self, _position: &Vector3<f64>) -> Result<Vector3<f64>, GravityErrors> {
        Ok(self.g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_constant_gravity() {
        let g = ConstantGravity::surface(Units::Metric);
        let a = g.calculate(&Vector3::new(1e3, -2e3, 5e4)).unwrap();
        assert_abs_diff_eq!(a[2], -9.80665, epsilon = 1e-12);
        assert_eq!(a, g.calculate(&Vector3::zeros()).unwrap());
    }
}
