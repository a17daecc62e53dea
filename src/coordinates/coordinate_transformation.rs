use super::spherical::{Coordinates, Direction};
use crate::constants::*;
use nalgebra as na;

/// Convert a spherical location (phi from the north pole, theta east longitude)
/// to a unit vector in the Mars-fixed frame.
pub fn spherical_to_cartesian(phi: f64, theta: f64) -> na::Vector3<f64> {
    let sin_phi = phi.sin();
    na::Vector3::new(sin_phi * theta.cos(), sin_phi * theta.sin(), phi.cos())
}

/// Central angle between two locations (rad).
pub fn great_circle_angle(a: &Coordinates, b: &Coordinates) -> f64 {
    let va = a.to_unit_vector();
    let vb = b.to_unit_vector();
    // atan2 keeps precision for both tiny and near-antipodal separations
    va.cross(&vb).magnitude().atan2(va.dot(&vb))
}

/// Initial bearing of the great circle from `from` to `to`.
pub fn initial_bearing(from: &Coordinates, to: &Coordinates) -> Direction {
    let lat1 = from.latitude_radians();
    let lat2 = to.latitude_radians();
    let d_lon = to.theta() - from.theta();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    Direction::new(y.atan2(x))
}

/// Location reached by travelling `angular_distance` radians along `bearing`.
pub fn destination(from: &Coordinates, bearing: Direction, angular_distance: f64) -> Coordinates {
    let lat1 = from.latitude_radians();
    let lon1 = from.theta();
    let brg = bearing.radians();

    let sin_lat2 =
        lat1.sin() * angular_distance.cos() + lat1.cos() * angular_distance.sin() * brg.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();
    let lon2 = lon1
        + (brg.sin() * angular_distance.sin() * lat1.cos())
            .atan2(angular_distance.cos() - lat1.sin() * sin_lat2);

    Coordinates::new(PI / 2.0 - lat2, lon2)
}
