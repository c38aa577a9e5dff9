use crate::axis_angle::{AxisAngle, AxisAngleErrors};
use crate::vector::{is_unit, UNIT_TOLERANCE};

use super::*;
use nalgebra::{Vector3, Vector4};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Mul, Neg};
use thiserror::Error;

/// A struct representing a quaternion for 3D rotations.
///
/// `w` is the scalar part and `x, y, z` the vector part.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

/// Errors that can occur when creating a `Quaternion`.
#[derive(Debug, Clone, Error, Copy, PartialEq)]
pub enum QuaternionErrors {
    #[error("{0}")]
    AxisAngleErrors(#[from] AxisAngleErrors),
    #[error("got zero magnitude quaternion")]
    ZeroMagnitude,
    #[error("quaternion must be unit length to rotate, got magnitude {0}")]
    NotUnit(f64),
}

impl Quaternion {
    /// Creates an identity quaternion.
    ///
    /// # Returns
    ///
    /// A `Quaternion` representing no rotation.
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    /// Creates a new `Quaternion`. Nothing is normalized.
    ///
    /// # Arguments
    ///
    /// * `x` - The x component of the quaternion.
    /// * `y` - The y component of the quaternion.
    /// * `z` - The z component of the quaternion.
    /// * `w` - The scalar component of the quaternion.
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Lifts a 3-vector to a quaternion with a zero scalar part so it can
    /// take part in quaternion products.
    pub fn pure(v: &Vector3<f64>) -> Self {
        Self::new(v[0], v[1], v[2], 0.0)
    }

    /// The vector part.
    pub fn vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Forms the rotation quaternion for a rotation of `theta` radians about
    /// a unit `axis`:
    ///
    /// `q = (cos θ/2, -sin θ/2 · axis)`
    ///
    /// The negated vector part is the sign convention of this crate. Rotating
    /// with the result turns vectors by `-theta` about `axis` (equivalently,
    /// turns the frame by `+theta`). Every other operation here assumes it.
    ///
    /// # Errors
    ///
    /// `AxisAngleErrors::InvalidAxis` if `axis` is not unit length within
    /// `UNIT_TOLERANCE`.
    pub fn from_axis_angle(axis: &Vector3<f64>, theta: f64) -> Result<Self, QuaternionErrors> {
        if !is_unit(axis, UNIT_TOLERANCE) {
            return Err(AxisAngleErrors::InvalidAxis(axis.norm()).into());
        }
        Ok(Self::from_unit_axis_angle(axis, theta))
    }

    // axis must already be unit length
    fn from_unit_axis_angle(axis: &Vector3<f64>, theta: f64) -> Self {
        let half_angle = theta / 2.0;
        let s = half_angle.sin();
        Self::new(-s * axis[0], -s * axis[1], -s * axis[2], half_angle.cos())
    }

    /// Four component dot product.
    pub fn dot(&self, other: &Quaternion) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Euclidean norm of the four components.
    pub fn mag(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Whether the magnitude is within `tolerance` of one.
    pub fn is_unit(&self, tolerance: f64) -> bool {
        (self.mag() - 1.0).abs() < tolerance
    }

    /// The conjugate. Only the inverse when the quaternion is unit length.
    pub fn inv(&self) -> Quaternion {
        Quaternion::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Scales the components to unit length.
    ///
    /// # Errors
    ///
    /// `QuaternionErrors::ZeroMagnitude` if every component is zero.
    pub fn normalize(&self) -> Result<Self, QuaternionErrors> {
        let mag = self.mag();
        if mag < f64::EPSILON {
            return Err(QuaternionErrors::ZeroMagnitude);
        }
        Ok(Quaternion::new(
            self.x / mag,
            self.y / mag,
            self.z / mag,
            self.w / mag,
        ))
    }

    /// Hamilton product `self * rhs`. Order matters; the result is not
    /// normalized.
    ///
    /// For `self = (a1, b1, c1, d1)` and `rhs = (a2, b2, c2, d2)` in
    /// `(w, x, y, z)` order:
    ///
    /// ```text
    /// w = a1a2 - b1b2 - c1c2 - d1d2
    /// x = a1b2 + b1a2 + c1d2 - d1c2
    /// y = a1c2 - b1d2 + c1a2 + d1b2
    /// z = a1d2 + b1c2 - c1b2 + d1a2
    /// ```
    pub fn hamilton(&self, rhs: &Quaternion) -> Quaternion {
        let (a1, b1, c1, d1) = (self.w, self.x, self.y, self.z);
        let (a2, b2, c2, d2) = (rhs.w, rhs.x, rhs.y, rhs.z);
        Quaternion::new(
            a1 * b2 + b1 * a2 + c1 * d2 - d1 * c2,
            a1 * c2 - b1 * d2 + c1 * a2 + d1 * b2,
            a1 * d2 + b1 * c2 - c1 * b2 + d1 * a2,
            a1 * a2 - b1 * b2 - c1 * c2 - d1 * d2,
        )
    }

    /// Composes two rotations: `self` is applied first, then `then`.
    ///
    /// `q' = then * self`, evaluated with the scalar/vector split
    /// `(s, v)(t, w) = (st - v·w, sw + tv + v×w)`. Not normalized.
    pub fn compose(&self, then: &Quaternion) -> Quaternion {
        let (s, v) = (then.w, then.vector());
        let (t, w) = (self.w, self.vector());
        let scalar = s * t - v.dot(&w);
        let vector = s * w + t * v + v.cross(&w);
        Quaternion::new(vector[0], vector[1], vector[2], scalar)
    }

    /// Computes `q · (0, v) · q⁻¹` using the conjugate as the inverse. No
    /// norm check is made; the scalar part of the product is dropped.
    pub fn rotate_vector(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.hamilton(&Quaternion::pure(v))
            .hamilton(&self.inv())
            .vector()
    }

    /// Creates a random quaternion.
    ///
    /// # Returns
    ///
    /// A random `Quaternion`.
    pub fn rand<R: Rng>(rng: &mut R) -> Quaternion {
        let x = rng.random_range(-1.0..1.0);
        let y = rng.random_range(-1.0..1.0);
        let z = rng.random_range(-1.0..1.0);
        let s = rng.random_range(-1.0..1.0);

        Quaternion::new(x, y, z, s)
    }
}

/// A quaternion that has been checked to be unit length, and so can be used
/// to rotate vectors.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct UnitQuaternion(pub Quaternion);

impl UnitQuaternion {
    pub const IDENTITY: Self = Self(Quaternion::IDENTITY);

    /// Accepts the components as given if their norm is within
    /// `UNIT_TOLERANCE` of 1.
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Result<Self, QuaternionErrors> {
        Self::try_from(&Quaternion::new(x, y, z, w))
    }

    /// Scales the components to unit length.
    pub fn normalized(x: f64, y: f64, z: f64, w: f64) -> Result<Self, QuaternionErrors> {
        Ok(Self(
            Quaternion::new(x, y, z, w).normalize()?,
        ))
    }

    /// See `Quaternion::from_axis_angle`.
    pub fn from_axis_angle(axis: &Vector3<f64>, theta: f64) -> Result<Self, QuaternionErrors> {
        Ok(Self(Quaternion::from_axis_angle(axis, theta)?))
    }

    /// Rotation that turns vectors right-handedly by `‖phi‖` radians about
    /// `phi`. A zero vector gives the identity.
    ///
    /// This is how an angular velocity `ω` integrated over `h` becomes an
    /// attitude increment: `from_rotation_vector(&(ω * h))`.
    pub fn from_rotation_vector(phi: &Vector3<f64>) -> Self {
        let angle = phi.norm();
        if angle < f64::EPSILON {
            return Self::IDENTITY;
        }
        // the crate convention negates the vector part, so a right-handed
        // turn of +angle is the same as forming with -angle
        let half_angle = angle / 2.0;
        let axis = phi / angle;
        let s = half_angle.sin();
        Self(Quaternion::new(
            s * axis[0],
            s * axis[1],
            s * axis[2],
            half_angle.cos(),
        ))
    }

    pub fn rand<R: Rng>(rng: &mut R) -> Result<Self, QuaternionErrors> {
        Ok(Self(
            Quaternion::rand(rng).normalize()?,
        ))
    }

    /// Applies `self` then `then`. The product is not renormalized, so
    /// repeated composition can drift off unit length; see `renormalize`.
    pub fn compose(&self, then: &UnitQuaternion) -> Self {
        Self(self.0.compose(&then.0))
    }

    pub fn renormalize(&self) -> Result<Self, QuaternionErrors> {
        Ok(Self(self.0.normalize()?))
    }

    /// How far the norm has drifted from 1.
    pub fn drift(&self) -> f64 {
        (self.0.mag() - 1.0).abs()
    }
}

impl TryFrom<&Quaternion> for UnitQuaternion {
    type Error = QuaternionErrors;
    fn try_from(value: &Quaternion) -> Result<Self, QuaternionErrors> {
        if !value.is_unit(UNIT_TOLERANCE) {
            return Err(QuaternionErrors::NotUnit(value.mag()));
        }
        Ok(Self(*value))
    }
}

impl From<&UnitQuaternion> for Quaternion {
    fn from(value: &UnitQuaternion) -> Self {
        value.0
    }
}

impl RotationTrait for UnitQuaternion {
    /// Rotates a vector by the quaternion, `q v q⁻¹`.
    ///
    /// # Arguments
    ///
    /// * `v` - The vector to be rotated.
    ///
    /// # Returns
    ///
    /// The rotated vector.
    fn rotate(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.0
            .rotate_vector(v)
    }

    /// Transforms a vector by the quaternion, `q⁻¹ v q`.
    ///
    /// # Arguments
    ///
    /// * `v` - The vector to be transformed.
    ///
    /// # Returns
    ///
    /// The transformed vector.
    fn transform(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.0
            .inv()
            .rotate_vector(v)
    }

    fn identity() -> Self {
        Self::IDENTITY
    }

    fn inv(&self) -> Self {
        UnitQuaternion(
            self.0
                .inv(),
        ) // the conjugate of a unit quaternion is still unit length
    }
}

impl Default for Quaternion {
    /// Provides the default value for a quaternion.
    ///
    /// # Returns
    ///
    /// The identity quaternion.
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Quaternion> for Quaternion {
    type Output = Self;

    /// Hamilton product, see `Quaternion::hamilton`.
    fn mul(self, rhs: Self) -> Self {
        self.hamilton(&rhs)
    }
}

impl Mul<UnitQuaternion> for UnitQuaternion {
    type Output = Self;
    fn mul(self, rhs: UnitQuaternion) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl Mul<f64> for Quaternion {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(
            self.x * rhs,
            self.y * rhs,
            self.z * rhs,
            self.w * rhs,
        )
    }
}

impl Neg for Quaternion {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(
            -self.x, -self.y, -self.z, -self.w,
        )
    }
}

impl Neg for UnitQuaternion {
    type Output = Self;

    // -q is the same rotation as q and has the same norm
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl From<Vector4<f64>> for Quaternion {
    fn from(q: Vector4<f64>) -> Self {
        Self { x: q[0], y: q[1], z: q[2], w: q[3] }
    }
}

impl From<&AxisAngle> for UnitQuaternion {
    fn from(axis_angle: &AxisAngle) -> Self {
        Self(Quaternion::from_unit_axis_angle(
            &axis_angle.axis,
            axis_angle.angle,
        ))
    }
}

impl fmt::Debug for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Quaternion ")?;
        writeln!(f, "   x: {: >10.6}", self.x)?;
        writeln!(f, "   y: {: >10.6}", self.y)?;
        writeln!(f, "   z: {: >10.6}", self.z)?;
        writeln!(f, "   w: {: >10.6}", self.w)
    }
}
