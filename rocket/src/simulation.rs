use nalgebra::Vector3;
use rotations::prelude::UNIT_TOLERANCE;
use tracing::{debug, info, warn};

use crate::{
    AngularAccelerationModel, Environment, LinearAccelerationModel, ModelContext, Rocket,
    RocketErrors, RotationSource, SimulationConfig, Snapshot,
};

/// One independently simulated body with the models acting on it, e.g. a
/// single stage. Objects never see each other's state.
#[derive(Debug)]
pub struct SimulationObject {
    pub rocket: Rocket,
    pub angular_models: Vec<Box<dyn AngularAccelerationModel>>,
    pub linear_models: Vec<Box<dyn LinearAccelerationModel>>,
    pub rotation_sources: Vec<Box<dyn RotationSource>>,
}

impl SimulationObject {
    pub fn new(rocket: Rocket) -> Self {
        Self {
            rocket,
            angular_models: Vec::new(),
            linear_models: Vec::new(),
            rotation_sources: Vec::new(),
        }
    }

    pub fn with_angular_model(mut self, model: impl AngularAccelerationModel + 'static) -> Self {
        self.angular_models.push(Box::new(model));
        self
    }

    pub fn with_linear_model(mut self, model: impl LinearAccelerationModel + 'static) -> Self {
        self.linear_models.push(Box::new(model));
        self
    }

    /// Sources are applied in the order they are added.
    pub fn with_rotation_source(mut self, source: impl RotationSource + 'static) -> Self {
        self.rotation_sources.push(Box::new(source));
        self
    }

    /// Advances the body from `t` to `t + h`.
    ///
    /// Every model is evaluated against the start-of-step state first. Then:
    /// angular velocity and attitude, rotation sources in order, optional
    /// renormalization, and finally velocity and position.
    pub fn step(
        &mut self,
        t: f64,
        h: f64,
        environment: &Environment,
        renormalize_attitude: bool,
    ) -> Result<(), RocketErrors> {
        let SimulationObject {
            rocket,
            angular_models,
            linear_models,
            rotation_sources,
        } = self;

        let ctx = ModelContext {
            t,
            rocket: &*rocket,
            environment,
        };
        let mut angular_acceleration = Vector3::zeros();
        for model in angular_models.iter_mut() {
            angular_acceleration += model.angular_acceleration(&ctx)?;
        }
        let mut acceleration = Vector3::zeros();
        for model in linear_models.iter_mut() {
            acceleration += model.acceleration(&ctx)?;
        }
        let mut rotations = Vec::with_capacity(rotation_sources.len());
        for source in rotation_sources.iter_mut() {
            if let Some(rotation) = source.rotation(&ctx)? {
                rotations.push(rotation);
            }
        }

        rocket.integrate_rotation(&angular_acceleration, h)?;
        for rotation in &rotations {
            rocket.apply_rotation(rotation);
        }

        let drift = rocket.attitude().drift();
        if drift > UNIT_TOLERANCE {
            warn!(
                rocket = rocket.name(),
                t,
                drift,
                "attitude quaternion drifted from unit length"
            );
        }
        if renormalize_attitude {
            rocket.renormalize_attitude()?;
        }

        rocket.integrate_translation(&acceleration, h)?;

        debug!(
            rocket = rocket.name(),
            t = t + h,
            altitude = environment.altitude(rocket.position()),
            speed = rocket.velocity().norm(),
            "stepped"
        );
        Ok(())
    }
}

/// Fixed step driver for any number of independent objects sharing one
/// environment.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    environment: Environment,
    objects: Vec<SimulationObject>,
    steps_taken: usize,
    t: f64,
}

impl Simulation {
    pub fn new(config: SimulationConfig, environment: Environment) -> Result<Self, RocketErrors> {
        config.validate()?;
        if config.units != environment.units {
            warn!(
                config = ?config.units,
                environment = ?environment.units,
                "simulation and environment unit systems differ"
            );
        }
        let t = config.tstart;
        Ok(Self {
            config,
            environment,
            objects: Vec::new(),
            steps_taken: 0,
            t,
        })
    }

    /// Round Earth in the configured units.
    pub fn earth(config: SimulationConfig) -> Result<Self, RocketErrors> {
        let environment = Environment::earth(config.units);
        Self::new(config, environment)
    }

    /// Flat ground in the configured units.
    pub fn flat(config: SimulationConfig) -> Result<Self, RocketErrors> {
        let environment = Environment::flat(config.units);
        Self::new(config, environment)
    }

    /// A rocket at rest whose integrator follows the configured multistep
    /// settings.
    pub fn new_rocket(&self, name: &str) -> Result<Rocket, RocketErrors> {
        Rocket::new(name, &self.config.multistep)
    }

    /// Objects can be added at any time, e.g. when a stage separates.
    ///
    /// # Errors
    ///
    /// `RocketErrors::SettingsMismatch` if the rocket was built with
    /// multistep settings other than the configured ones.
    pub fn add_object(&mut self, object: SimulationObject) -> Result<(), RocketErrors> {
        if *object.rocket.settings() != self.config.multistep {
            return Err(RocketErrors::SettingsMismatch(
                object.rocket.name().to_string(),
            ));
        }
        info!(rocket = object.rocket.name(), t = self.t, "object added");
        self.objects.push(object);
        Ok(())
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn objects(&self) -> &[SimulationObject] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut [SimulationObject] {
        &mut self.objects
    }

    pub fn rocket(&self, name: &str) -> Option<&Rocket> {
        self.objects
            .iter()
            .map(|object| &object.rocket)
            .find(|rocket| rocket.name() == name)
    }

    pub fn t(&self) -> f64 {
        self.t
    }

    pub fn is_finished(&self) -> bool {
        self.steps_taken >= self.config.steps()
    }

    /// Advances every object by one `dt`.
    pub fn step(&mut self) -> Result<(), RocketErrors> {
        let dt = self.config.dt;
        for object in &mut self.objects {
            object.step(
                self.t,
                dt,
                &self.environment,
                self.config.renormalize_attitude,
            )?;
        }
        self.steps_taken += 1;
        // recomputed from the step count so time does not accumulate rounding
        self.t = self.config.tstart + self.steps_taken as f64 * dt;
        Ok(())
    }

    pub fn snapshots(&self) -> Result<Vec<Snapshot>, RocketErrors> {
        self.objects
            .iter()
            .map(|object| object.rocket.snapshot(self.t))
            .collect()
    }

    /// Steps until `tstop` and returns the state of every object at the
    /// current time and after each step.
    pub fn run(&mut self) -> Result<Vec<Snapshot>, RocketErrors> {
        let steps = self.config.steps().saturating_sub(self.steps_taken);
        info!(
            name = %self.config.name,
            objects = self.objects.len(),
            steps,
            dt = self.config.dt,
            "simulation started"
        );

        let mut snapshots = Vec::with_capacity((steps + 1) * self.objects.len());
        snapshots.extend(self.snapshots()?);
        for _ in 0..steps {
            self.step()?;
            snapshots.extend(self.snapshots()?);
        }

        info!(name = %self.config.name, t = self.t, "simulation finished");
        Ok(snapshots)
    }
}
