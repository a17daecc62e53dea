use crate::constants::*;
use crate::coordinates::Coordinates;
use crate::physics::orbital::OrbitalMechanics;
use crate::physics::solar::top_of_atmosphere_irradiance;
use crate::time::{ClockPulse, MarsTime, Temporal};
use hifitime::Epoch;
use std::fmt;

const KEPLER_TOLERANCE: f64 = 1e-12;
const KEPLER_MAX_ITERATIONS: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Season of the northern hemisphere for an areocentric longitude (deg).
    fn northern(l_s: f64) -> Season {
        match l_s {
            l if l < 90.0 => Season::Spring,
            l if l < 180.0 => Season::Summer,
            l if l < 270.0 => Season::Autumn,
            _ => Season::Winter,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Season::Spring => write!(f, "Spring"),
            Season::Summer => write!(f, "Summer"),
            Season::Autumn => write!(f, "Autumn"),
            Season::Winter => write!(f, "Winter"),
        }
    }
}

/// Position of Mars on its orbit and of the Sun in the Martian sky.
///
/// Everything is derived from two accumulated quantities: the time since
/// perihelion and the time of day at the prime meridian.
#[derive(Debug, Clone)]
pub struct OrbitInfo {
    orbit_time: f64,
    millisol: f64,
    true_anomaly: f64,
    distance: f64,
    l_s: f64,
    declination: f64,
    sun_direction: Coordinates,
}

impl OrbitInfo {
    /// Start at areocentric longitude `l_s` (deg) and prime-meridian time `millisol`.
    pub fn from_areocentric_longitude(l_s: f64, millisol: f64) -> Self {
        let e = ECCENTRICITY;
        let nu = (l_s - PERIHELION_LS).to_radians().rem_euclid(TAU);
        let eccentric = OrbitalMechanics::true_to_eccentric_anomaly(nu, e);
        let mean = OrbitalMechanics::eccentric_to_mean_anomaly(eccentric, e);
        Self::from_orbit_time(mean / TAU * ORBIT_PERIOD, millisol)
    }

    /// Orbit state at an Earth epoch.
    pub fn from_epoch(epoch: &Epoch) -> Self {
        let l_s = OrbitalMechanics::mars_areocentric_longitude(epoch.to_jde_tt_days());
        Self::from_areocentric_longitude(l_s, MarsTime::from_epoch(epoch).millisol())
    }

    fn from_orbit_time(orbit_time: f64, millisol: f64) -> Self {
        let mut info = OrbitInfo {
            orbit_time: orbit_time.rem_euclid(ORBIT_PERIOD),
            millisol: millisol.rem_euclid(MILLISOLS_PER_SOL),
            true_anomaly: 0.0,
            distance: SEMI_MAJOR_AXIS,
            l_s: 0.0,
            declination: 0.0,
            sun_direction: Coordinates::new(PI / 2.0, 0.0),
        };
        info.update();
        info
    }

    /// Advance the orbit by `millisols`.
    pub fn add_time(&mut self, millisols: f64) {
        if !millisols.is_finite() {
            return;
        }
        self.orbit_time = (self.orbit_time + millisols * SECONDS_PER_MILLISOL).rem_euclid(ORBIT_PERIOD);
        self.millisol = (self.millisol + millisols).rem_euclid(MILLISOLS_PER_SOL);
        self.update();
    }

    fn update(&mut self) {
        let e = ECCENTRICITY;

        // Area swept since perihelion is proportional to time (Kepler's second law)
        let mean = TAU * self.orbit_time / ORBIT_PERIOD;
        let eccentric =
            OrbitalMechanics::mean_to_eccentric_anomaly(mean, e, KEPLER_TOLERANCE, KEPLER_MAX_ITERATIONS);
        self.true_anomaly = OrbitalMechanics::eccentric_to_true_anomaly(eccentric, e);
        self.distance = OrbitalMechanics::radius(SEMI_MAJOR_AXIS, e, self.true_anomaly);

        let mut l_s = (self.true_anomaly.to_degrees() + PERIHELION_LS).rem_euclid(360.0);
        if l_s >= 360.0 {
            l_s = 0.0;
        }
        self.l_s = l_s;
        self.declination = (AXIAL_TILT.sin() * l_s.to_radians().sin()).asin();

        let subsolar_longitude = PI - TAU * self.millisol / MILLISOLS_PER_SOL;
        self.sun_direction = Coordinates::new(PI / 2.0 - self.declination, subsolar_longitude);
    }

    /// Seconds since perihelion.
    pub fn orbit_time(&self) -> f64 {
        self.orbit_time
    }

    pub fn true_anomaly(&self) -> f64 {
        self.true_anomaly
    }

    /// Sun-Mars distance (AU).
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Areocentric longitude L_s (deg), in `[0, 360)`.
    pub fn areocentric_longitude(&self) -> f64 {
        self.l_s
    }

    /// Solar declination (rad), positive in northern summer.
    pub fn solar_declination(&self) -> f64 {
        self.declination
    }

    /// Subsolar point.
    pub fn sun_direction(&self) -> Coordinates {
        self.sun_direction
    }

    /// Time of day at the prime meridian.
    pub fn millisol(&self) -> f64 {
        self.millisol
    }

    /// Local mean solar time at `location`; noon is 500.
    pub fn local_millisol(&self, location: &Coordinates) -> f64 {
        (self.millisol + location.theta() / TAU * MILLISOLS_PER_SOL).rem_euclid(MILLISOLS_PER_SOL)
    }

    pub fn cos_solar_zenith(&self, location: &Coordinates) -> f64 {
        location
            .to_unit_vector()
            .dot(&self.sun_direction.to_unit_vector())
            .clamp(-1.0, 1.0)
    }

    pub fn solar_zenith_angle(&self, location: &Coordinates) -> f64 {
        self.cos_solar_zenith(location).acos()
    }

    pub fn is_sunlit(&self, location: &Coordinates) -> bool {
        self.cos_solar_zenith(location) > 0.0
    }

    /// Irradiance above the atmosphere at the current distance (W/m^2).
    pub fn top_of_atmosphere_irradiance(&self) -> f64 {
        top_of_atmosphere_irradiance(self.distance)
    }

    pub fn season(&self, location: &Coordinates) -> Season {
        if location.is_northern() {
            Season::northern(self.l_s)
        } else {
            Season::northern((self.l_s + 180.0).rem_euclid(360.0))
        }
    }
}

impl Temporal for OrbitInfo {
    fn time_passing(&mut self, pulse: &ClockPulse) -> bool {
        self.add_time(pulse.elapsed());
        true
    }
}
