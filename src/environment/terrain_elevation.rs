use crate::config::Locale;
use crate::constants::*;
use crate::coordinates::{Coordinates, Direction};
use nalgebra as na;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

const WAVE_COUNT: usize = 32;
const TERRAIN_SEED_SALT: u64 = 0x7465_7272_6169_6e00;
// Half the baseline for finite-difference slopes (km)
const SLOPE_STEP_KM: f64 = 10.0;

const CRATER_BELOW_KM: f64 = -2.0;
const VOLCANIC_ABOVE_KM: f64 = 3.0;

const REGOLITH_BASE_RATE: f64 = 10.0; // kg per millisol
const ICE_BASE_RATE: f64 = 6.0; // kg per millisol

struct Wave {
    direction: na::Vector3<f64>,
    frequency: f64,
    amplitude: f64,
    phase: f64,
}

struct Feature {
    center: Coordinates,
    radius_km: f64,
    height_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainProfile {
    /// km above datum
    pub elevation: f64,
    /// deg
    pub steepness: f64,
}

/// Resource yield of a surface site, in kg per millisol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectionSite {
    pub regolith_rate: f64,
    pub ice_rate: f64,
}

/// Procedural topography: random spherical waves on top of a few named
/// large-scale features and the north/south dichotomy.
pub struct TerrainElevation {
    waves: Vec<Wave>,
    features: Vec<Feature>,
    collection_sites: Mutex<HashMap<Coordinates, CollectionSite>>,
}

impl TerrainElevation {
    pub fn new(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed ^ TERRAIN_SEED_SALT);

        let waves = (0..WAVE_COUNT)
            .map(|_| {
                let frequency = rng.gen_range(1.0..12.0);
                Wave {
                    direction: Coordinates::random(&mut rng).to_unit_vector(),
                    frequency,
                    amplitude: 2.5 / frequency,
                    phase: rng.gen_range(0.0..TAU),
                }
            })
            .collect();

        let feature = |lat: f64, lon: f64, radius_km: f64, height_km: f64| Feature {
            center: Coordinates::from_lat_lon_degrees(lat, lon),
            radius_km,
            height_km,
        };
        let features = vec![
            feature(0.0, 247.0, 2500.0, 8.0),   // Tharsis rise
            feature(18.65, 226.2, 300.0, 14.0), // Olympus Mons
            feature(-42.4, 70.5, 1100.0, -7.0), // Hellas Planitia
            feature(-13.9, 300.0, 600.0, -3.0), // Valles Marineris
        ];

        Self {
            waves,
            features,
            collection_sites: Mutex::new(HashMap::new()),
        }
    }

    /// Elevation above datum (km), within `[MIN_ELEVATION_KM, MAX_ELEVATION_KM]`.
    pub fn elevation_km(&self, location: &Coordinates) -> f64 {
        let v = location.to_unit_vector();

        let waves: f64 = self
            .waves
            .iter()
            .map(|w| w.amplitude * (w.frequency * v.dot(&w.direction) + w.phase).sin())
            .sum();

        let features: f64 = self
            .features
            .iter()
            .map(|f| {
                let d = location.distance_km(&f.center) / f.radius_km;
                f.height_km * (-d * d).exp()
            })
            .sum();

        // Northern lowlands sit a few km below the southern highlands
        let dichotomy = -2.5 * location.latitude_radians().sin();

        (waves + features + dichotomy).clamp(MIN_ELEVATION_KM, MAX_ELEVATION_KM)
    }

    pub fn terrain_profile(&self, location: &Coordinates) -> TerrainProfile {
        let sample = |bearing: f64| {
            self.elevation_km(&location.new_location(Direction::from_degrees(bearing), SLOPE_STEP_KM))
        };
        let d_north = (sample(0.0) - sample(180.0)) / (2.0 * SLOPE_STEP_KM);
        let d_east = (sample(90.0) - sample(270.0)) / (2.0 * SLOPE_STEP_KM);
        let gradient = (d_north * d_north + d_east * d_east).sqrt();

        TerrainProfile {
            elevation: self.elevation_km(location),
            steepness: gradient.atan().to_degrees(),
        }
    }

    pub fn locale(&self, location: &Coordinates) -> Locale {
        let elevation = self.elevation_km(location);
        if elevation < CRATER_BELOW_KM {
            Locale::Crater
        } else if elevation > VOLCANIC_ABOVE_KM {
            Locale::Volcanic
        } else {
            Locale::Sedimentary
        }
    }

    fn compute_collection_site(&self, location: &Coordinates) -> CollectionSite {
        let profile = self.terrain_profile(location);
        let latitude = location.latitude_degrees().abs() / 90.0;

        let regolith = REGOLITH_BASE_RATE
            * (1.0 + profile.steepness / 45.0)
            * (1.0 + profile.elevation.max(0.0) / MAX_ELEVATION_KM);
        let ice = ICE_BASE_RATE
            * latitude
            * latitude
            * (1.0 + (-profile.elevation).max(0.0) / -MIN_ELEVATION_KM);

        CollectionSite {
            regolith_rate: regolith.clamp(1.0, 4.0 * REGOLITH_BASE_RATE),
            ice_rate: ice.clamp(0.0, 2.0 * ICE_BASE_RATE),
        }
    }

    /// Collection rates for a site, computed once and cached.
    pub fn collection_site(&self, location: &Coordinates) -> CollectionSite {
        let mut sites = self
            .collection_sites
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *sites
            .entry(*location)
            .or_insert_with(|| self.compute_collection_site(location))
    }

    pub fn regolith_collection_rate(&self, location: &Coordinates) -> f64 {
        self.collection_site(location).regolith_rate
    }

    pub fn ice_collection_rate(&self, location: &Coordinates) -> f64 {
        self.collection_site(location).ice_rate
    }

    pub fn collection_site_count(&self) -> usize {
        self.collection_sites
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn clear_collection_sites(&self) {
        self.collection_sites
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn elevation_is_bounded() {
        let terrain = TerrainElevation::new(1);
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..2000 {
            let e = terrain.elevation_km(&Coordinates::random(&mut rng));
            assert!((MIN_ELEVATION_KM..=MAX_ELEVATION_KM).contains(&e));
        }
    }

    #[test]
    fn same_seed_same_terrain() {
        let a = TerrainElevation::new(5);
        let b = TerrainElevation::new(5);
        let c = TerrainElevation::new(6);
        let loc = Coordinates::from_lat_lon_degrees(12.0, 34.0);
        assert_eq!(a.elevation_km(&loc), b.elevation_km(&loc));
        assert_ne!(a.elevation_km(&loc), c.elevation_km(&loc));
    }

    #[test]
    fn olympus_towers_over_hellas() {
        let terrain = TerrainElevation::new(3);
        let olympus = Coordinates::from_lat_lon_degrees(18.65, 226.2);
        let hellas = Coordinates::from_lat_lon_degrees(-42.4, 70.5);
        assert!(terrain.elevation_km(&olympus) > terrain.elevation_km(&hellas) + 10.0);
        assert_eq!(terrain.locale(&olympus), Locale::Volcanic);
    }

    #[test]
    fn steepness_is_non_negative() {
        let terrain = TerrainElevation::new(3);
        let profile = terrain.terrain_profile(&Coordinates::from_lat_lon_degrees(18.0, 220.0));
        assert!(profile.steepness >= 0.0 && profile.steepness < 90.0);
    }

    #[test]
    fn polar_sites_yield_more_ice() {
        let terrain = TerrainElevation::new(3);
        let polar = Coordinates::from_lat_lon_degrees(80.0, 10.0);
        let equatorial = Coordinates::from_lat_lon_degrees(0.5, 10.0);
        assert!(terrain.ice_collection_rate(&polar) > terrain.ice_collection_rate(&equatorial));
        assert!(terrain.regolith_collection_rate(&polar) >= 1.0);
    }

    #[test]
    fn collection_sites_are_cached() {
        let terrain = TerrainElevation::new(3);
        let loc = Coordinates::from_lat_lon_degrees(-20.0, 100.0);
        let first = terrain.collection_site(&loc);
        let second = terrain.collection_site(&loc);
        assert_eq!(first, second);
        assert_eq!(terrain.collection_site_count(), 1);

        terrain.clear_collection_sites();
        assert_eq!(terrain.collection_site_count(), 0);
    }

    #[test]
    fn shared_readers_on_other_threads() {
        let terrain = Arc::new(TerrainElevation::new(8));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let terrain = Arc::clone(&terrain);
                thread::spawn(move || {
                    let loc = Coordinates::from_lat_lon_degrees(10.0 * i as f64, 20.0);
                    terrain.regolith_collection_rate(&loc)
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap() > 0.0);
        }
        assert_eq!(terrain.collection_site_count(), 4);
    }
}
