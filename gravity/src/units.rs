use serde::{Deserialize, Serialize};

pub const GRAVITATIONAL_CONSTANT: f64 = 6.67408e-11; // m^3 / (kg s^2)
pub const EARTH_MASS_KG: f64 = 5.972e24;
pub const EARTH_MASS_SLUG: f64 = 4.0948607276025e23;
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
pub const EARTH_RADIUS_FT: f64 = 20_902_000.0;
pub const EARTH_RADIUS_MI: f64 = 3958.8;
pub const METERS_PER_FOOT: f64 = 0.3048;
pub const STANDARD_GRAVITY: f64 = 9.80665; // m/s^2

/// Unit system chosen by the caller. Values are converted once, when a model
/// is built; nothing converts per step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Units {
    /// feet, slugs, seconds
    English,
    /// meters, kilograms, seconds
    #[default]
    Metric,
}

impl Units {
    /// Length of one meter in this unit system.
    pub fn per_meter(&self) -> f64 {
        match self {
            Units::English => 1.0 / METERS_PER_FOOT,
            Units::Metric => 1.0,
        }
    }

    pub fn earth_radius(&self) -> f64 {
        match self {
            Units::English => EARTH_RADIUS_FT,
            Units::Metric => EARTH_RADIUS_M,
        }
    }

    /// Earth's gravitational parameter, length^3 / s^2.
    pub fn earth_mu(&self) -> f64 {
        GRAVITATIONAL_CONSTANT * EARTH_MASS_KG * self.per_meter().powi(3)
    }

    pub fn standard_gravity(&self) -> f64 {
        STANDARD_GRAVITY * self.per_meter()
    }
}
