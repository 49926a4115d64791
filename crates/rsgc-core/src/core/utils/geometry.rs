use nalgebra::{Point3, Rotation3, Unit, Vector3};

const DEGENERATE_NORM: f64 = 1e-8;

/// Returns the unit vector along `v`, or `None` if `v` is (numerically) zero.
pub fn unit_vector(v: &Vector3<f64>) -> Option<Vector3<f64>> {
    Unit::try_new(*v, DEGENERATE_NORM).map(|u| u.into_inner())
}

pub fn rotation_from_axis_angle(axis: &Vector3<f64>, angle_degrees: f64) -> Option<Rotation3<f64>> {
    Unit::try_new(*axis, DEGENERATE_NORM)
        .map(|axis| Rotation3::from_axis_angle(&axis, angle_degrees.to_radians()))
}

/// Rotates `v` by `angle_degrees` about `axis` (right-hand rule).
pub fn rotate_about_axis(
    v: &Vector3<f64>,
    axis: &Vector3<f64>,
    angle_degrees: f64,
) -> Option<Vector3<f64>> {
    rotation_from_axis_angle(axis, angle_degrees).map(|rot| rot * v)
}

/// Angle between two vectors in degrees, in `[0, 180]`.
pub fn angle_between_degrees(v1: &Vector3<f64>, v2: &Vector3<f64>) -> f64 {
    let denom = v1.norm() * v2.norm();
    if denom < DEGENERATE_NORM {
        return 0.0;
    }
    (v1.dot(v2) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}

/// The point `length` away from `anchor` in the direction of `toward`.
pub fn place_along(
    anchor: &Point3<f64>,
    toward: &Point3<f64>,
    length: f64,
) -> Option<Point3<f64>> {
    unit_vector(&(toward - anchor)).map(|dir| anchor + dir * length)
}

/// Direction opposite the normalized sum of the given bond directions.
///
/// For three bonds of a tetrahedral center this is the fourth tetrahedral
/// direction. Returns `None` when the bond directions cancel out.
pub fn tetrahedral_completion(bond_directions: &[Vector3<f64>]) -> Option<Vector3<f64>> {
    let sum: Vector3<f64> = bond_directions
        .iter()
        .filter_map(unit_vector)
        .fold(Vector3::zeros(), |acc, v| acc + v);
    unit_vector(&sum).map(|dir| -dir)
}
