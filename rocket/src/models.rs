//! What moves a rocket. Each model is asked once per step with the state at
//! the start of that step.

use nalgebra::Vector3;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use rotations::prelude::{UnitQuaternion, normalize};
use std::fmt::Debug;

use crate::{Environment, Rocket, RocketErrors, SimulationConfig};

/// Read-only view of the world handed to models.
#[derive(Clone, Copy, Debug)]
pub struct ModelContext<'a> {
    pub t: f64,
    pub rocket: &'a Rocket,
    pub environment: &'a Environment,
}

/// Contributes an angular acceleration, world frame, rad/s^2.
pub trait AngularAccelerationModel: Debug {
    fn angular_acceleration(&mut self, ctx: &ModelContext) -> Result<Vector3<f64>, RocketErrors>;
}

/// Contributes a linear acceleration, world frame.
pub trait LinearAccelerationModel: Debug {
    fn acceleration(&mut self, ctx: &ModelContext) -> Result<Vector3<f64>, RocketErrors>;
}

/// Produces a rotation applied directly to the attitude after integration,
/// e.g. from gusts, drag or thrust vectoring. `None` means no rotation this
/// step.
pub trait RotationSource: Debug {
    fn rotation(&mut self, ctx: &ModelContext) -> Result<Option<UnitQuaternion>, RocketErrors>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantAngularAcceleration(pub Vector3<f64>);

impl AngularAccelerationModel for ConstantAngularAcceleration {
    fn angular_acceleration(&mut self, _ctx: &ModelContext) -> Result<Vector3<f64>, RocketErrors> {
        Ok(self.0)
    }
}

/// Gravity of the environment at the rocket's position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GravityAcceleration;

impl LinearAccelerationModel for GravityAcceleration {
    fn acceleration(&mut self, ctx: &ModelContext) -> Result<Vector3<f64>, RocketErrors> {
        Ok(ctx.environment.gravity_at(ctx.rocket.position())?)
    }
}

/// Constant acceleration along the nose until `burnout`, simulation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thrust {
    pub acceleration: f64,
    pub burnout: f64,
}

impl Thrust {
    pub fn new(acceleration: f64, burnout: f64) -> Self {
        Self { acceleration, burnout }
    }
}

impl LinearAccelerationModel for Thrust {
    fn acceleration(&mut self, ctx: &ModelContext) -> Result<Vector3<f64>, RocketErrors> {
        if ctx.t >= self.burnout {
            return Ok(Vector3::zeros());
        }
        Ok(ctx.rocket.abs_orientation() * self.acceleration)
    }
}

/// The same rotation every step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantRotation(pub UnitQuaternion);

impl RotationSource for ConstantRotation {
    fn rotation(&mut self, _ctx: &ModelContext) -> Result<Option<UnitQuaternion>, RocketErrors> {
        Ok(Some(self.0))
    }
}

/// Small random knocks about a random axis, at most `max_angle` radians per
/// step. Reproducible for a given seed.
#[derive(Debug, Clone)]
pub struct RandomGust {
    pub max_angle: f64,
    rng: SmallRng,
}

impl RandomGust {
    pub fn new(max_angle: f64, seed: u64) -> Self {
        Self {
            max_angle,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seeds from the run's seed. Distinct `stream`s give independent gusts
    /// for different objects of the same run.
    pub fn from_config(max_angle: f64, config: &SimulationConfig, stream: u64) -> Self {
        Self::new(max_angle, config.seed.wrapping_add(stream))
    }
}

impl RotationSource for RandomGust {
    fn rotation(&mut self, _ctx: &ModelContext) -> Result<Option<UnitQuaternion>, RocketErrors> {
        if self.max_angle <= 0.0 {
            return Ok(None);
        }
        let axis = loop {
            let v = Vector3::new(
                self.rng.random_range(-1.0..1.0),
                self.rng.random_range(-1.0..1.0),
                self.rng.random_range(-1.0..1.0),
            );
            if let Ok(axis) = normalize(&v) {
                break axis;
            }
        };
        let angle = self.rng.random_range(0.0..self.max_angle);
        Ok(Some(UnitQuaternion::from_axis_angle(&axis, angle)?))
    }
}
