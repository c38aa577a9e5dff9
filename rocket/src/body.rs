use multistep::{
    DerivativeHistory, IntegratedQuantity, MultistepSettings, advance, check_step, select_order,
};
use nalgebra::Vector3;
use rotations::{
    RotationTrait,
    prelude::{UnitQuaternion, angle_between, normalize},
};
use serde::{Deserialize, Serialize};

use crate::RocketErrors;

/// A rigid body flying through an `Environment`.
///
/// Angular velocity is expressed in the world frame, so the attitude
/// increment of each step is composed after the current attitude. The body
/// axis is the body-fixed direction the nose points along; its image under
/// the attitude is the absolute orientation.
#[derive(Clone, Debug)]
pub struct Rocket {
    name: String,
    attitude: UnitQuaternion,
    body_axis: Vector3<f64>,
    abs_orientation: Vector3<f64>,
    rel_orientation: Vector3<f64>,
    angular_velocity: IntegratedQuantity<Vector3<f64>>,
    // angular velocity samples that drive the attitude itself
    attitude_rates: DerivativeHistory<Vector3<f64>>,
    velocity: IntegratedQuantity<Vector3<f64>>,
    position: IntegratedQuantity<Vector3<f64>>,
    settings: MultistepSettings,
    rotation_locked: bool,
}

impl Rocket {
    /// Creates a rocket at rest at the origin, nose along +Z.
    ///
    /// # Errors
    ///
    /// `RocketErrors::EmptyName` if `name` is empty.
    pub fn new(name: &str, settings: &MultistepSettings) -> Result<Self, RocketErrors> {
        if name.is_empty() {
            return Err(RocketErrors::EmptyName);
        }
        let body_axis = Vector3::z();
        Ok(Self {
            name: name.to_string(),
            attitude: UnitQuaternion::IDENTITY,
            body_axis,
            abs_orientation: body_axis,
            rel_orientation: body_axis,
            angular_velocity: IntegratedQuantity::new(Vector3::zeros(), settings),
            attitude_rates: settings.history(),
            velocity: IntegratedQuantity::new(Vector3::zeros(), settings),
            position: IntegratedQuantity::new(Vector3::zeros(), settings),
            settings: *settings,
            rotation_locked: false,
        })
    }

    pub fn with_attitude(mut self, attitude: UnitQuaternion) -> Self {
        self.attitude = attitude;
        self.attitude_rates.clear();
        self.update_orientation();
        self
    }

    /// Sets the body-fixed nose direction. The axis is normalized.
    pub fn with_body_axis(mut self, axis: Vector3<f64>) -> Result<Self, RocketErrors> {
        self.body_axis = normalize(&axis)?;
        self.update_orientation();
        Ok(self)
    }

    pub fn with_position(mut self, position: Vector3<f64>) -> Self {
        self.position.reset(position);
        self
    }

    pub fn with_velocity(mut self, velocity: Vector3<f64>) -> Self {
        self.velocity.reset(velocity);
        self.update_orientation();
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: Vector3<f64>) -> Self {
        self.angular_velocity.reset(angular_velocity);
        self.attitude_rates.clear();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attitude(&self) -> &UnitQuaternion {
        &self.attitude
    }

    pub fn body_axis(&self) -> &Vector3<f64> {
        &self.body_axis
    }

    /// Orientation relative to the launch (world) axes.
    pub fn abs_orientation(&self) -> &Vector3<f64> {
        &self.abs_orientation
    }

    /// Orientation in a frame whose +Z is the direction of travel. Equal to
    /// the absolute orientation while at rest.
    pub fn rel_orientation(&self) -> &Vector3<f64> {
        &self.rel_orientation
    }

    pub fn angular_velocity(&self) -> &Vector3<f64> {
        self.angular_velocity.value()
    }

    pub fn velocity(&self) -> &Vector3<f64> {
        self.velocity.value()
    }

    pub fn position(&self) -> &Vector3<f64> {
        self.position.value()
    }

    /// Integrator settings every history of this rocket was built with.
    pub fn settings(&self) -> &MultistepSettings {
        &self.settings
    }

    pub fn is_rotation_locked(&self) -> bool {
        self.rotation_locked
    }

    /// Holds the attitude fixed regardless of the torques acting on the
    /// body, e.g. while it sits on a launch rail. Angular velocity is zeroed
    /// and its history dropped.
    pub fn lock_rotation(&mut self) {
        self.rotation_locked = true;
        self.angular_velocity.reset(Vector3::zeros());
        self.attitude_rates.clear();
    }

    pub fn unlock_rotation(&mut self) {
        self.rotation_locked = false;
    }

    /// Angle between the absolute orientation and the velocity, in radians.
    /// Zero at rest.
    pub fn angle_of_attack(&self) -> Result<f64, RocketErrors> {
        if self.velocity().norm() < f64::EPSILON {
            return Ok(0.0);
        }
        Ok(angle_between(&self.abs_orientation, self.velocity())?)
    }

    /// Advances angular velocity and attitude by one step of `h` under
    /// `angular_acceleration`. Both are driven by start-of-step samples: the
    /// current angular velocity feeds the attitude history and the attitude
    /// increment is the Adams-Bashforth estimate of `∫ω dt` over the step.
    ///
    /// Does nothing while rotation is locked. A rejected step leaves every
    /// history untouched.
    pub fn integrate_rotation(
        &mut self,
        angular_acceleration: &Vector3<f64>,
        h: f64,
    ) -> Result<(), RocketErrors> {
        if self.rotation_locked {
            return Ok(());
        }
        check_step(h)?;
        select_order(self.attitude_rates.len() + 1, self.settings.max_order)?;
        self.attitude_rates.push(*self.angular_velocity.value());
        let phi = advance(
            &Vector3::zeros(),
            &self.attitude_rates,
            h,
            self.settings.max_order,
        )?;
        self.angular_velocity.step(*angular_acceleration, h)?;
        self.attitude = self
            .attitude
            .compose(&UnitQuaternion::from_rotation_vector(&phi));
        self.update_orientation();
        Ok(())
    }

    /// Advances position and velocity by one step of `h` under
    /// `acceleration`. Position uses the start-of-step velocity as its
    /// derivative sample. A rejected step leaves every history untouched.
    pub fn integrate_translation(
        &mut self,
        acceleration: &Vector3<f64>,
        h: f64,
    ) -> Result<(), RocketErrors> {
        check_step(h)?;
        let velocity = *self.velocity.value();
        self.position.step(velocity, h)?;
        self.velocity.step(*acceleration, h)?;
        self.update_orientation();
        Ok(())
    }

    /// Composes `rotation` after the current attitude. Ignored while rotation
    /// is locked.
    pub fn apply_rotation(&mut self, rotation: &UnitQuaternion) {
        if self.rotation_locked {
            return;
        }
        self.attitude = self.attitude.compose(rotation);
        self.update_orientation();
    }

    /// Scales the attitude back to unit length and returns how far it had
    /// drifted.
    pub fn renormalize_attitude(&mut self) -> Result<f64, RocketErrors> {
        let drift = self.attitude.drift();
        self.attitude = self.attitude.renormalize()?;
        self.update_orientation();
        Ok(drift)
    }

    fn update_orientation(&mut self) {
        self.abs_orientation = self.attitude.rotate(&self.body_axis);
        self.rel_orientation = relative_to_velocity(&self.abs_orientation, self.velocity.value());
    }

    pub fn snapshot(&self, t: f64) -> Result<Snapshot, RocketErrors> {
        Ok(Snapshot {
            t,
            name: self.name.clone(),
            position: *self.position(),
            velocity: *self.velocity(),
            angular_velocity: *self.angular_velocity(),
            attitude: self.attitude,
            abs_orientation: self.abs_orientation,
            rel_orientation: self.rel_orientation,
            angle_of_attack: self.angle_of_attack()?,
        })
    }
}

/// Expresses `orientation` in the frame obtained by turning `velocity` onto
/// +Z along the shortest arc. A zero velocity leaves it unchanged.
pub fn relative_to_velocity(orientation: &Vector3<f64>, velocity: &Vector3<f64>) -> Vector3<f64> {
    let speed = velocity.norm();
    if speed < f64::EPSILON {
        return *orientation;
    }
    let direction = velocity / speed;
    let axis = direction.cross(&Vector3::z());
    let sin = axis.norm();
    let cos = direction[2];
    if sin < f64::EPSILON {
        if cos > 0.0 {
            return *orientation;
        }
        // flying straight down, half turn about x
        return Vector3::new(orientation[0], -orientation[1], -orientation[2]);
    }
    let phi = axis / sin * sin.atan2(cos);
    UnitQuaternion::from_rotation_vector(&phi).rotate(orientation)
}

/// State of one rocket at time `t`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub t: f64,
    pub name: String,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub angular_velocity: Vector3<f64>,
    pub attitude: UnitQuaternion,
    pub abs_orientation: Vector3<f64>,
    pub rel_orientation: Vector3<f64>,
    pub angle_of_attack: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use multistep::MultistepErrors;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};
    const TOL: f64 = 1e-12;

    fn rocket() -> Rocket {
        Rocket::new("alpha", &MultistepSettings::default()).unwrap()
    }

    #[test]
    fn test_empty_name() {
        assert!(matches!(
            Rocket::new("", &MultistepSettings::default()),
            Err(RocketErrors::EmptyName)
        ));
    }

    #[test]
    fn test_initial_state() {
        let r = rocket();
        assert_eq!(r.name(), "alpha");
        assert_eq!(*r.abs_orientation(), Vector3::z());
        assert_eq!(*r.rel_orientation(), Vector3::z());
        assert_eq!(*r.velocity(), Vector3::zeros());
        assert_eq!(r.angle_of_attack().unwrap(), 0.0);
        assert!(!r.is_rotation_locked());
    }

    #[test]
    fn test_attitude_sets_orientation() {
        // frame turned +90 about x, so the nose turns -90 about x
        let q = UnitQuaternion::from_axis_angle(&Vector3::x(), FRAC_PI_2).unwrap();
        let r = rocket().with_attitude(q);
        assert_abs_diff_eq!(*r.abs_orientation(), Vector3::y(), epsilon = TOL);
    }

    #[test]
    fn test_body_axis_normalized() {
        let r = rocket().with_body_axis(Vector3::new(2.0, 0.0, 0.0)).unwrap();
        assert_abs_diff_eq!(*r.body_axis(), Vector3::x(), epsilon = TOL);
        assert_abs_diff_eq!(*r.abs_orientation(), Vector3::x(), epsilon = TOL);
        assert!(rocket().with_body_axis(Vector3::zeros()).is_err());
    }

    #[test]
    fn test_relative_orientation() {
        let nose = Vector3::z();
        // at rest and along +z nothing changes
        assert_eq!(relative_to_velocity(&nose, &Vector3::zeros()), nose);
        assert_eq!(relative_to_velocity(&nose, &Vector3::new(0.0, 0.0, 3.0)), nose);

        // flying along +x, the nose is 90 degrees off the velocity, tipped back
        let rel = relative_to_velocity(&nose, &Vector3::new(5.0, 0.0, 0.0));
        assert_abs_diff_eq!(rel, -Vector3::x(), epsilon = TOL);
        let rel = relative_to_velocity(&Vector3::x(), &Vector3::new(5.0, 0.0, 0.0));
        assert_abs_diff_eq!(rel, Vector3::z(), epsilon = TOL);

        // straight down
        let rel = relative_to_velocity(&nose, &Vector3::new(0.0, 0.0, -1.0));
        assert_abs_diff_eq!(rel, -Vector3::z(), epsilon = TOL);
    }

    #[test]
    fn test_angle_of_attack() {
        let r = rocket().with_velocity(Vector3::new(10.0, 0.0, 0.0));
        assert_abs_diff_eq!(r.angle_of_attack().unwrap(), FRAC_PI_2, epsilon = TOL);

        let r = rocket().with_velocity(Vector3::new(1.0, 0.0, 1.0));
        assert_abs_diff_eq!(r.angle_of_attack().unwrap(), FRAC_PI_4, epsilon = TOL);
        assert_abs_diff_eq!(r.rel_orientation()[2], FRAC_PI_4.cos(), epsilon = TOL);

        let r = rocket().with_velocity(Vector3::new(0.0, 0.0, -2.0));
        assert_abs_diff_eq!(r.angle_of_attack().unwrap(), PI, epsilon = TOL);
    }

    #[test]
    fn test_lock_rotation() {
        let mut r = rocket().with_angular_velocity(Vector3::new(1.0, 0.0, 0.0));
        r.lock_rotation();
        assert_eq!(*r.angular_velocity(), Vector3::zeros());

        let alpha = Vector3::new(0.0, 2.0, 0.0);
        for _ in 0..10 {
            r.integrate_rotation(&alpha, 0.1).unwrap();
        }
        let gust = UnitQuaternion::from_axis_angle(&Vector3::y(), 0.3).unwrap();
        r.apply_rotation(&gust);
        assert_eq!(*r.attitude(), UnitQuaternion::IDENTITY);
        assert_eq!(*r.angular_velocity(), Vector3::zeros());

        r.unlock_rotation();
        r.integrate_rotation(&alpha, 0.1).unwrap();
        assert_abs_diff_eq!(*r.angular_velocity(), alpha * 0.1, epsilon = TOL);
    }

    #[test]
    fn test_constant_spin() {
        // a constant rate about z turns the x body axis right-handedly
        let mut r = rocket()
            .with_body_axis(Vector3::x())
            .unwrap()
            .with_angular_velocity(Vector3::new(0.0, 0.0, FRAC_PI_2));
        for _ in 0..10 {
            r.integrate_rotation(&Vector3::zeros(), 0.1).unwrap();
        }
        assert_abs_diff_eq!(*r.abs_orientation(), Vector3::y(), epsilon = 1e-9);
    }

    #[test]
    fn test_translation_uses_start_of_step_velocity() {
        let mut r = rocket().with_velocity(Vector3::new(1.0, 0.0, 0.0));
        r.integrate_translation(&Vector3::new(2.0, 0.0, 0.0), 0.5).unwrap();
        assert_abs_diff_eq!(*r.position(), Vector3::new(0.5, 0.0, 0.0), epsilon = TOL);
        assert_abs_diff_eq!(*r.velocity(), Vector3::new(2.0, 0.0, 0.0), epsilon = TOL);
    }

    #[test]
    fn test_rejected_translation_step_leaves_no_trace() {
        let a = Vector3::new(0.0, 0.0, -9.8);
        let mut clean = rocket().with_velocity(Vector3::new(1.0, 0.0, 20.0));
        let mut retried = clean.clone();
        assert!(matches!(
            retried.integrate_translation(&a, 0.0),
            Err(RocketErrors::Multistep(MultistepErrors::InvalidStepSize(_)))
        ));
        assert!(retried.integrate_translation(&a, f64::NAN).is_err());
        for _ in 0..5 {
            clean.integrate_translation(&a, 0.1).unwrap();
            retried.integrate_translation(&a, 0.1).unwrap();
        }
        assert_eq!(clean.position(), retried.position());
        assert_eq!(clean.velocity(), retried.velocity());
    }

    #[test]
    fn test_rejected_rotation_step_leaves_no_trace() {
        let alpha = Vector3::new(0.3, -0.1, 0.2);
        let mut clean = rocket().with_angular_velocity(Vector3::new(0.0, 0.0, 1.0));
        let mut retried = clean.clone();
        assert!(retried.integrate_rotation(&alpha, -0.1).is_err());
        assert_eq!(*retried.attitude(), UnitQuaternion::IDENTITY);
        for _ in 0..5 {
            clean.integrate_rotation(&alpha, 0.1).unwrap();
            retried.integrate_rotation(&alpha, 0.1).unwrap();
        }
        assert_eq!(clean.attitude(), retried.attitude());
        assert_eq!(clean.angular_velocity(), retried.angular_velocity());
    }

    #[test]
    fn test_settings_kept() {
        let settings = MultistepSettings::default().with_max_order(2);
        let r = Rocket::new("beta", &settings).unwrap();
        assert_eq!(*r.settings(), settings);
    }

    #[test]
    fn test_renormalize_attitude() {
        let drifted = UnitQuaternion::new(0.0, 0.0, 0.0, 1.004).unwrap();
        let mut r = rocket().with_attitude(drifted);
        let drift = r.renormalize_attitude().unwrap();
        assert_abs_diff_eq!(drift, 0.004, epsilon = 1e-12);
        assert_abs_diff_eq!(r.attitude().drift(), 0.0, epsilon = TOL);
    }

    #[test]
    fn test_snapshot() {
        let r = rocket().with_position(Vector3::new(1.0, 2.0, 3.0));
        let snapshot = r.snapshot(4.5).unwrap();
        assert_eq!(snapshot.t, 4.5);
        assert_eq!(snapshot.name, "alpha");
        assert_eq!(snapshot.position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(snapshot.angle_of_attack, 0.0);
    }
}
