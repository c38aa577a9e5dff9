use constant::ConstantGravity;
use nalgebra::Vector3;
use newtonian::NewtonianGravity;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod constant;
pub mod newtonian;
pub mod units;

pub use units::Units;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GravityErrors {
    #[error("gravity is undefined at zero distance from the attracting body's center")]
    ZeroRadius,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Gravity {
    Constant(ConstantGravity),
    Newtonian(NewtonianGravity),
}

impl Default for Gravity {
    fn default() -> Self {
        Gravity::Newtonian(NewtonianGravity::earth(Units::default()))
    }
}

impl GravityModel for Gravity {
    fn calculate(&self, r: &Vector3<f64>) -> Result<Vector3<f64>, GravityErrors> {
        match self {
            Gravity::Constant(g) => g.calculate(r),
            Gravity::Newtonian(g) => g.calculate(r),
        }
    }
}

pub trait GravityModel {
    // input r is position relative to the attracting body's center, in the
    // caller's length unit
    // returns gravitational acceleration in the same unit system
    fn calculate(&self, r: &Vector3<f64>) -> Result<Vector3<f64>, GravityErrors>;
}
