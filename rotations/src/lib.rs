pub mod axis_angle;
pub mod quaternion;
pub mod vector;

use nalgebra::Vector3;

pub mod prelude {
    pub use crate::axis_angle::*;
    pub use crate::quaternion::*;
    pub use crate::vector::*;
    pub use crate::RotationTrait;
}

/// Trait defining rotation and transformation operations.
pub trait RotationTrait {
    /// Rotates a vector by the rotation.
    /// The vector is moved while the frame stays fixed (active rotation).
    ///
    /// # Arguments
    ///
    /// * `v` - The vector to be rotated.
    ///
    /// # Returns
    ///
    /// The rotated vector.
    fn rotate(&self, v: &Vector3<f64>) -> Vector3<f64>;

    /// Transforms a vector by the rotation.
    /// The frame is moved while the vector stays fixed (passive rotation),
    /// so `transform` undoes `rotate`.
    ///
    /// # Arguments
    ///
    /// * `v` - The vector to be transformed.
    ///
    /// # Returns
    ///
    /// The transformed vector.
    fn transform(&self, v: &Vector3<f64>) -> Vector3<f64>;

    fn inv(&self) -> Self;

    fn identity() -> Self;
}
