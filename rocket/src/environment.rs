use gravity::{
    Gravity, GravityErrors, GravityModel, Units, constant::ConstantGravity,
    newtonian::NewtonianGravity,
};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Atmospheric lookups by altitude above the surface, in the caller's unit
/// system.
pub trait AtmosphereModel: Debug {
    fn pressure(&self, altitude: f64) -> f64;
    fn temperature(&self, altitude: f64) -> f64;
    fn density(&self, altitude: f64) -> f64;
}

/// The same air at every altitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantAtmosphere {
    pub pressure: f64,
    pub temperature: f64,
    pub density: f64,
}

impl ConstantAtmosphere {
    /// Standard sea level air. Pa, K, kg/m^3 for metric; lbf/ft^2, °R,
    /// slug/ft^3 for english.
    pub fn sea_level(units: Units) -> Self {
        match units {
            Units::Metric => Self {
                pressure: 101_325.0,
                temperature: 288.15,
                density: 1.225,
            },
            Units::English => Self {
                pressure: 2116.22,
                temperature: 518.67,
                density: 0.0023769,
            },
        }
    }
}

impl AtmosphereModel for ConstantAtmosphere {
    fn pressure(&self, _altitude: f64) -> f64 {
        self.pressure
    }

    fn temperature(&self, _altitude: f64) -> f64 {
        self.temperature
    }

    fn density(&self, _altitude: f64) -> f64 {
        self.density
    }
}

/// Everything outside the rockets: gravity, the ground and the air.
///
/// World coordinates have their origin at the launch site with +Z up. On a
/// round planet the center sits one radius below the origin.
#[derive(Debug)]
pub struct Environment {
    pub units: Units,
    pub gravity: Gravity,
    // None for a flat ground at z = 0
    pub center: Option<Vector3<f64>>,
    pub radius: f64,
    pub atmosphere: Box<dyn AtmosphereModel>,
}

impl Environment {
    /// Round Earth with inverse square gravity and sea level air.
    pub fn earth(units: Units) -> Self {
        let radius = units.earth_radius();
        Self {
            units,
            gravity: Gravity::Newtonian(NewtonianGravity::earth(units)),
            center: Some(Vector3::new(0.0, 0.0, -radius)),
            radius,
            atmosphere: Box::new(ConstantAtmosphere::sea_level(units)),
        }
    }

    /// Flat ground with standard gravity along -Z and sea level air.
    pub fn flat(units: Units) -> Self {
        Self {
            units,
            gravity: Gravity::Constant(ConstantGravity::surface(units)),
            center: None,
            radius: 0.0,
            atmosphere: Box::new(ConstantAtmosphere::sea_level(units)),
        }
    }

    pub fn with_atmosphere(mut self, atmosphere: impl AtmosphereModel + 'static) -> Self {
        self.atmosphere = Box::new(atmosphere);
        self
    }

    pub fn with_gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    /// Gravitational acceleration at world position `position`.
    pub fn gravity_at(&self, position: &Vector3<f64>) -> Result<Vector3<f64>, GravityErrors> {
        match &self.center {
            Some(center) => self.gravity.calculate(&(position - center)),
            None => self.gravity.calculate(position),
        }
    }

    /// Height above the surface.
    pub fn altitude(&self, position: &Vector3<f64>) -> f64 {
        match &self.center {
            Some(center) => (position - center).norm() - self.radius,
            None => position[2],
        }
    }

    pub fn pressure(&self, position: &Vector3<f64>) -> f64 {
        self.atmosphere.pressure(self.altitude(position))
    }

    pub fn temperature(&self, position: &Vector3<f64>) -> f64 {
        self.atmosphere.temperature(self.altitude(position))
    }

    pub fn density(&self, position: &Vector3<f64>) -> f64 {
        self.atmosphere.density(self.altitude(position))
    }
}
