use crate::core::models::operation::SymmetryOperation;
use nalgebra::{Matrix3, Matrix4, Point3, Rotation3, Unit, Vector3};

/// The exact orthogonal 3×3 matrix of an operation about the origin.
pub fn operation_matrix(operation: &SymmetryOperation) -> Matrix3<f64> {
    linear_part(operation, 1.0)
}

/// Homogeneous transform that moves a structure part of the way through an operation.
///
/// `t` is clamped to `[0, 1]`; `t = 0` is the identity and `t = 1` is the full operation,
/// both applied about `center`. In between, rotations sweep their angle linearly, mirror
/// planes and the inversion center scale the structure from `1` through `0` to `-1`, and
/// improper rotations do both at once. The intermediate frames of reflections are a visual
/// flattening rather than a physical motion.
pub fn transform(operation: &SymmetryOperation, center: &Point3<f64>, t: f64) -> Matrix4<f64> {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let linear = linear_part(operation, t).to_homogeneous();
    Matrix4::new_translation(&center.coords) * linear * Matrix4::new_translation(&-center.coords)
}

fn linear_part(operation: &SymmetryOperation, t: f64) -> Matrix3<f64> {
    let scale = 1.0 - 2.0 * t;
    match operation {
        SymmetryOperation::Identity => Matrix3::identity(),
        SymmetryOperation::Rotation { axis, .. } => {
            rotation(axis, t * operation.angle().unwrap_or(0.0))
        }
        SymmetryOperation::Reflection { normal } => axial_scale(normal, scale),
        SymmetryOperation::ImproperRotation { axis, .. } => {
            axial_scale(axis, scale) * rotation(axis, t * operation.angle().unwrap_or(0.0))
        }
        SymmetryOperation::Inversion => Matrix3::identity() * scale,
    }
}

fn rotation(axis: &Unit<Vector3<f64>>, angle: f64) -> Matrix3<f64> {
    Rotation3::from_axis_angle(axis, angle).into_inner()
}

/// Scales the component along `direction` by `scale`, leaving the perpendicular plane fixed.
fn axial_scale(direction: &Unit<Vector3<f64>>, scale: f64) -> Matrix3<f64> {
    let n = direction.into_inner();
    Matrix3::identity() + n * n.transpose() * (scale - 1.0)
}
