//! Rigid body rocket driven by the quaternion rotation engine and the
//! Adams-Bashforth integrator.
//!
//! A `Rocket` owns its attitude, orientation vectors and one derivative
//! history per integrated quantity. Forces, torques and disturbance rotations
//! come from capability traits in `models`, so nothing here decides why the
//! body moves. `Simulation` drives any number of independent bodies.

pub mod body;
pub mod config;
pub mod environment;
pub mod models;
pub mod simulation;

use gravity::GravityErrors;
use multistep::MultistepErrors;
use rotations::prelude::{QuaternionErrors, VectorErrors};
use thiserror::Error;

pub use body::{Rocket, Snapshot};
pub use config::{ConfigErrors, SimulationConfig};
pub use environment::{AtmosphereModel, ConstantAtmosphere, Environment};
pub use models::{
    AngularAccelerationModel, ConstantAngularAcceleration, ConstantRotation, GravityAcceleration,
    LinearAccelerationModel, ModelContext, RandomGust, RotationSource, Thrust,
};
pub use simulation::{Simulation, SimulationObject};

#[derive(Debug, Error)]
pub enum RocketErrors {
    #[error("{0}")]
    Config(#[from] ConfigErrors),
    #[error("name cannot be empty for rocket")]
    EmptyName,
    #[error("{0}")]
    Gravity(#[from] GravityErrors),
    #[error("{0}")]
    Multistep(#[from] MultistepErrors),
    #[error("{0}")]
    Quaternion(#[from] QuaternionErrors),
    #[error("rocket {0} uses different multistep settings than the simulation")]
    SettingsMismatch(String),
    #[error("could not parse configuration: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("{0}")]
    Vector(#[from] VectorErrors),
}
