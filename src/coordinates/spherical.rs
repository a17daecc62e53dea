use super::coordinate_errors::CoordinatesError;
use super::coordinate_transformation::{
    destination, great_circle_angle, initial_bearing, spherical_to_cartesian,
};
use crate::constants::*;
use nalgebra as na;
use rand::Rng;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Resolution of stored angles (rad). Values are snapped to this grid so that
/// bitwise equality matches value equality.
const ANGLE_RESOLUTION: f64 = 1e-9;

fn snap(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let snapped = (value / ANGLE_RESOLUTION).round() * ANGLE_RESOLUTION;
    // Fold -0.0 into 0.0
    if snapped == 0.0 {
        0.0
    } else {
        snapped
    }
}

/// A location on the Martian surface.
///
/// `phi` is the polar angle measured from the north pole in `[0, PI]`,
/// `theta` the east longitude in `[0, 2 PI)`.
#[derive(Debug, Clone, Copy)]
pub struct Coordinates {
    phi: f64,
    theta: f64,
}

impl Coordinates {
    pub fn new(phi: f64, theta: f64) -> Self {
        let phi = snap(if phi.is_finite() { phi.clamp(0.0, PI) } else { 0.0 });
        let mut theta = snap(if theta.is_finite() { theta.rem_euclid(TAU) } else { 0.0 });
        if theta >= TAU {
            theta = 0.0;
        }
        // Longitude is degenerate at the poles
        if phi == 0.0 || phi >= snap(PI) {
            theta = 0.0;
        }
        Self { phi, theta }
    }

    /// Build from planetocentric latitude (+N) and east longitude, in degrees.
    pub fn from_lat_lon_degrees(latitude: f64, longitude: f64) -> Self {
        Self::new((90.0 - latitude).to_radians(), longitude.to_radians())
    }

    pub fn phi(&self) -> f64 {
        self.phi
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn latitude_radians(&self) -> f64 {
        PI / 2.0 - self.phi
    }

    pub fn latitude_degrees(&self) -> f64 {
        self.latitude_radians().to_degrees()
    }

    /// East longitude in `[0, 360)`.
    pub fn longitude_degrees(&self) -> f64 {
        self.theta.to_degrees()
    }

    /// East longitude in `(-180, 180]`.
    pub fn signed_longitude_degrees(&self) -> f64 {
        let lon = self.longitude_degrees();
        if lon > 180.0 {
            lon - 360.0
        } else {
            lon
        }
    }

    pub fn is_northern(&self) -> bool {
        self.phi < PI / 2.0
    }

    pub fn to_unit_vector(&self) -> na::Vector3<f64> {
        spherical_to_cartesian(self.phi, self.theta)
    }

    /// Central angle to another location (rad).
    pub fn angle_to(&self, other: &Coordinates) -> f64 {
        great_circle_angle(self, other)
    }

    /// Surface distance to another location (km).
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        self.angle_to(other) * MARS_RADIUS_KM
    }

    pub fn direction_to(&self, other: &Coordinates) -> Direction {
        initial_bearing(self, other)
    }

    /// Location `distance_km` away along `direction`.
    pub fn new_location(&self, direction: Direction, distance_km: f64) -> Coordinates {
        destination(self, direction, distance_km / MARS_RADIUS_KM)
    }

    /// Uniformly distributed location inside a disc of radius `max_km`.
    pub fn random_location_within<R: Rng + ?Sized>(&self, rng: &mut R, max_km: f64) -> Coordinates {
        let direction = Direction::new(rng.gen::<f64>() * TAU);
        let distance = max_km.max(0.0) * rng.gen::<f64>().sqrt();
        self.new_location(direction, distance)
    }

    /// Uniformly distributed location over the whole sphere.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Coordinates {
        let z: f64 = rng.gen_range(-1.0..=1.0);
        Coordinates::new(z.acos(), rng.gen::<f64>() * TAU)
    }
}

impl PartialEq for Coordinates {
    fn eq(&self, other: &Self) -> bool {
        self.phi.to_bits() == other.phi.to_bits() && self.theta.to_bits() == other.theta.to_bits()
    }
}

impl Eq for Coordinates {}

impl Hash for Coordinates {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.phi.to_bits().hash(state);
        self.theta.to_bits().hash(state);
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lat = self.latitude_degrees();
        let lon = self.signed_longitude_degrees();
        let ns = if lat < 0.0 { 'S' } else { 'N' };
        let ew = if lon < 0.0 { 'W' } else { 'E' };
        write!(f, "{:.2} {} {:.2} {}", lat.abs(), ns, lon.abs(), ew)
    }
}

/// Split "12.5N" or "12.5 N" style tokens into number and hemisphere letter.
fn split_component(token: &str) -> Result<(f64, char), CoordinatesError> {
    let token = token.trim();
    let marker = token
        .chars()
        .last()
        .ok_or_else(|| CoordinatesError::Malformed(token.to_string()))?;
    let number = token[..token.len() - marker.len_utf8()].trim();
    Ok((number.parse::<f64>()?, marker.to_ascii_uppercase()))
}

impl FromStr for Coordinates {
    type Err = CoordinatesError;

    /// Parses "12.50 N 45.00 E", "12.5N 45E" and similar forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let joined: Vec<String> = match tokens.len() {
            2 => tokens.iter().map(|t| t.to_string()).collect(),
            4 => vec![
                format!("{}{}", tokens[0], tokens[1]),
                format!("{}{}", tokens[2], tokens[3]),
            ],
            _ => return Err(CoordinatesError::Malformed(s.to_string())),
        };

        let (lat, ns) = split_component(&joined[0])?;
        let (lon, ew) = split_component(&joined[1])?;

        let lat = match ns {
            'N' => lat,
            'S' => -lat,
            other => return Err(CoordinatesError::UnknownHemisphere(other.to_string())),
        };
        let lon = match ew {
            'E' => lon,
            'W' => -lon,
            other => return Err(CoordinatesError::UnknownHemisphere(other.to_string())),
        };

        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinatesError::LatitudeOutOfRange(lat));
        }

        Ok(Coordinates::from_lat_lon_degrees(lat, lon))
    }
}

/// Compass bearing, clockwise from north, in `[0, 2 PI)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction(f64);

impl Direction {
    pub fn new(radians: f64) -> Self {
        Direction(radians.rem_euclid(TAU))
    }

    pub fn from_degrees(degrees: f64) -> Self {
        Self::new(degrees.to_radians())
    }

    pub fn radians(&self) -> f64 {
        self.0
    }

    pub fn degrees(&self) -> f64 {
        self.0.to_degrees()
    }
}
