// Time
pub const SECONDS_PER_MILLISOL: f64 = 88.775244; // Length of a millisol (s)
pub const MILLISOLS_PER_SOL: f64 = 1000.0;
pub const SOLS_PER_ORBIT: f64 = 668.5991; // Mean sols per Martian year
pub const ORBIT_PERIOD: f64 = 59_355_072.0; // Orbital period (s)

// Orbit
pub const ECCENTRICITY: f64 = 0.0934;
pub const SEMI_MAJOR_AXIS: f64 = 1.523_691_5; // (AU)
pub const AXIAL_TILT: f64 = 0.439_648_2; // Obliquity, 25.19 deg (rad)
pub const PERIHELION_LS: f64 = 251.0; // Areocentric longitude of perihelion (deg)

// Mars Sol Date (Allison & McEwen 2000)
pub const MSD_EPOCH_JD_TT: f64 = 2_405_522.002_877_9;
pub const SOL_TO_DAY_RATIO: f64 = 1.027_491_251_7;
pub const J2000_JD: f64 = 2_451_545.0;

// Body
pub const MARS_RADIUS_KM: f64 = 3389.5;
pub const MARS_CIRCUMFERENCE_KM: f64 = 2.0 * PI * MARS_RADIUS_KM;

// Radiation
pub const SOLAR_CONSTANT: f64 = 1361.0; // Solar constant at 1 AU (W/m^2)
pub const MAX_SOLAR_IRRADIANCE: f64 = 717.0; // Upper bound at the surface (W/m^2)
pub const OPTICAL_DEPTH_MIN: f64 = 0.1;
pub const OPTICAL_DEPTH_MAX: f64 = 6.0;

// Atmosphere
pub const DATUM_PRESSURE: f64 = 0.61; // Mean surface pressure at datum (kPa)
pub const SCALE_HEIGHT_KM: f64 = 11.1;
pub const R_CO2: f64 = 188.92; // Specific gas constant of CO2 (J/kg/K)
pub const MEAN_SURFACE_TEMPERATURE: f64 = -63.0; // (deg C)
pub const LAPSE_RATE: f64 = 2.5; // (K/km)
pub const KELVIN_OFFSET: f64 = 273.15;

// Surface
pub const POLAR_REGION_LATITUDE: f64 = 64.8; // (deg)
pub const MIN_ELEVATION_KM: f64 = -8.2;
pub const MAX_ELEVATION_KM: f64 = 21.2;

// Math
pub const PI: f64 = std::f64::consts::PI;
pub const TAU: f64 = std::f64::consts::TAU;
