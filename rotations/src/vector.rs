use nalgebra::Vector3;
use thiserror::Error;

/// How far the norm of a vector (or quaternion) may stray from 1.0 and still
/// be accepted as unit length.
pub const UNIT_TOLERANCE: f64 = 0.01;

#[derive(Debug, Error, Copy, Clone, PartialEq)]
pub enum VectorErrors {
    #[error("cannot normalize a zero magnitude vector")]
    DegenerateVector,
}

/// Returns true if `|‖v‖ - 1| < tolerance`.
pub fn is_unit(v: &Vector3<f64>, tolerance: f64) -> bool {
    (v.norm() - 1.0).abs() < tolerance
}

/// Scales `v` to unit length.
///
/// # Errors
///
/// `VectorErrors::DegenerateVector` if `v` has zero magnitude. No fallback
/// direction is substituted.
pub fn normalize(v: &Vector3<f64>) -> Result<Vector3<f64>, VectorErrors> {
    let mag = v.norm();
    if mag == 0.0 {
        return Err(VectorErrors::DegenerateVector);
    }
    Ok(v / mag)
}

/// Angle in radians between two vectors, in [0, π].
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> Result<f64, VectorErrors> {
    let a = normalize(a)?;
    let b = normalize(b)?;
    // rounding can push the dot product just outside [-1, 1]
    Ok(a.dot(&b).clamp(-1.0, 1.0).acos())
}
