use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{GravityErrors, GravityModel, Units};

/// Point mass gravity, `a = -mu r / |r|^3`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewtonianGravity {
    pub mu: f64,
}

impl NewtonianGravity {
    pub fn new(mu: f64) -> Self {
        Self { mu }
    }

    /// Earth as a point mass, with `mu` expressed in `units`.
    pub fn earth(units: Units) -> Self {
        Self::new(units.earth_mu())
    }

    /// Magnitude of the acceleration at `distance` from the center.
    pub fn magnitude_at(&self, distance: f64) -> Result<f64, GravityErrors> {
        if distance == 0.0 {
            return Err(GravityErrors::ZeroRadius);
        }
        Ok(self.mu / distance.powi(2))
    }
}

impl GravityModel for NewtonianGravity {
    fn calculate(&self, position: &Vector3<f64>) -> Result<Vector3<f64>, GravityErrors> {
        let position_mag = position.magnitude();
        if position_mag == 0.0 {
            return Err(GravityErrors::ZeroRadius);
        }
        Ok(-position * self.mu / position_mag.powi(3))
    }
}
