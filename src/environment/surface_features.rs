use super::explored_location::ExploredLocation;
use super::mineral_map::{MineralMap, RandomMineralMap};
use super::orbit_info::OrbitInfo;
use super::terrain_elevation::TerrainElevation;
use super::weather::Weather;
use crate::config::MineralType;
use crate::constants::*;
use crate::coordinates::Coordinates;
use crate::physics::solar::surface_irradiance;
use crate::time::ClockPulse;
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

const SURFACE_SEED_SALT: u64 = 0x7375_7266_6163_6500;

// Clear-sky optical depth and its swing over the dusty season
const BACKGROUND_OPTICAL_DEPTH: f64 = 0.25;
const SEASONAL_OPTICAL_DEPTH: f64 = 0.15;
const DUSTIEST_LS: f64 = 250.0;
const PRESSURE_VARIANCE_WEIGHT: f64 = 12.0;

/// Sunlight, dust and polar geometry at the surface, plus the mineral
/// survey registry.
pub struct SurfaceFeatures {
    mineral_map: RandomMineralMap,
    explored_locations: HashMap<Coordinates, ExploredLocation>,
    optical_depth_cache: HashMap<Coordinates, f64>,
    rng: ChaCha8Rng,
    update_interval: u32,
}

impl SurfaceFeatures {
    pub fn new(minerals: &[MineralType], terrain: &TerrainElevation, seed: u64, update_interval: u32) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed ^ SURFACE_SEED_SALT);
        let mineral_map = RandomMineralMap::generate(minerals, terrain, &mut rng);
        info!("Generated mineral map with {} mineral types", minerals.len());
        Self {
            mineral_map,
            explored_locations: HashMap::new(),
            optical_depth_cache: HashMap::new(),
            rng,
            update_interval,
        }
    }

    pub fn mineral_map(&self) -> &RandomMineralMap {
        &self.mineral_map
    }

    /// Dust optical depth, cached per location and smoothed on each refresh.
    /// A query also counts as a query of the weather at `location`.
    pub fn optical_depth(&mut self, location: &Coordinates, orbit: &OrbitInfo, weather: &mut Weather) -> f64 {
        let variance = weather.daily_pressure_variance(location);
        if let Some(tau) = self.optical_depth_cache.get(location) {
            return *tau;
        }
        let tau = Self::compute_optical_depth(location, orbit, weather, variance);
        self.optical_depth_cache.insert(*location, tau);
        tau
    }

    fn compute_optical_depth(location: &Coordinates, orbit: &OrbitInfo, weather: &Weather, variance: f64) -> f64 {
        let season = 0.5 * (1.0 + (orbit.areocentric_longitude() - DUSTIEST_LS).to_radians().cos());
        let tau = BACKGROUND_OPTICAL_DEPTH
            + SEASONAL_OPTICAL_DEPTH * season
            + PRESSURE_VARIANCE_WEIGHT * variance
            + weather.dust_storm_optical_depth(location);
        tau.clamp(OPTICAL_DEPTH_MIN, OPTICAL_DEPTH_MAX)
    }

    pub fn optical_depth_cache_len(&self) -> usize {
        self.optical_depth_cache.len()
    }

    /// Global irradiance on level ground (W/m^2); zero at night.
    pub fn solar_irradiance(&mut self, location: &Coordinates, orbit: &OrbitInfo, weather: &mut Weather) -> f64 {
        let cos_zenith = orbit.cos_solar_zenith(location);
        if cos_zenith <= 0.0 {
            return 0.0;
        }
        let tau = self.optical_depth(location, orbit, weather);
        surface_irradiance(orbit.top_of_atmosphere_irradiance(), cos_zenith, tau)
    }

    /// Irradiance as a fraction of the brightest possible surface sunlight.
    pub fn sunlight_ratio(&mut self, location: &Coordinates, orbit: &OrbitInfo, weather: &mut Weather) -> f64 {
        self.solar_irradiance(location, orbit, weather) / MAX_SOLAR_IRRADIANCE
    }

    pub fn in_polar_region(location: &Coordinates) -> bool {
        location.latitude_degrees().abs() >= POLAR_REGION_LATITUDE
    }

    /// Polar region currently in polar night.
    pub fn in_dark_polar_region(location: &Coordinates, orbit: &OrbitInfo) -> bool {
        if !Self::in_polar_region(location) {
            return false;
        }
        let latitude = location.latitude_radians();
        let declination = orbit.solar_declination();
        let winter_hemisphere = latitude * declination < 0.0;
        winter_hemisphere && latitude.abs() > PI / 2.0 - declination.abs()
    }

    pub fn time_passing(&mut self, pulse: &ClockPulse, orbit: &OrbitInfo, weather: &Weather) -> bool {
        if pulse.is_new_sol() {
            // Follow the weather cache so both stay bounded
            self.optical_depth_cache
                .retain(|location, _| weather.cached_sample(location).is_some());
        }

        if pulse.is_new_millisol() && pulse.crossed_interval(self.update_interval) {
            let mut locations: Vec<Coordinates> = self.optical_depth_cache.keys().copied().collect();
            locations.sort_by(|a, b| a.phi().total_cmp(&b.phi()).then(a.theta().total_cmp(&b.theta())));
            for location in locations {
                // Refreshing must not keep the weather entry alive
                let Some(variance) = weather.cached_daily_pressure_variance(&location) else {
                    continue;
                };
                let fresh = Self::compute_optical_depth(&location, orbit, weather, variance);
                if let Some(tau) = self.optical_depth_cache.get_mut(&location) {
                    *tau = ((*tau + fresh) / 2.0).clamp(OPTICAL_DEPTH_MIN, OPTICAL_DEPTH_MAX);
                }
            }
            debug!("Refreshed optical depth at {} locations", self.optical_depth_cache.len());
        }
        true
    }

    /// Survey `location` for `settlement`. Estimates start within
    /// `0.5 / (1 + estimation_improvement)` of the truth, relative.
    pub fn add_explored_location(
        &mut self,
        location: Coordinates,
        estimation_improvement: u32,
        settlement: &str,
    ) -> &ExploredLocation {
        let mineral_map = &self.mineral_map;
        let rng = &mut self.rng;
        self.explored_locations.entry(location).or_insert_with(|| {
            let spread = 0.5 / (1.0 + estimation_improvement as f64);
            let estimates = mineral_map
                .all_mineral_concentrations(&location)
                .into_iter()
                .map(|(name, truth)| {
                    let error = truth.max(1.0) * rng.gen_range(-spread..=spread);
                    (name, (truth + error).clamp(0.0, 100.0))
                })
                .collect();
            debug!("Explored {} for {}", location, settlement);
            ExploredLocation::new(location, estimates, estimation_improvement, settlement)
        })
    }

    /// Narrow every estimate at `location` towards the truth. Returns false
    /// if the site was never explored.
    pub fn improve_mineral_estimates(&mut self, location: &Coordinates) -> bool {
        let Some(site) = self.explored_locations.get_mut(location) else {
            return false;
        };
        for (name, estimate) in site.estimated_concentrations_mut().iter_mut() {
            let truth = self.mineral_map.mineral_concentration(name, location);
            let shrink: f64 = self.rng.gen_range(0.0..1.0);
            *estimate = (truth + (*estimate - truth) * shrink).clamp(0.0, 100.0);
        }
        site.increment_estimation_improvement();
        true
    }

    pub fn explored_location(&self, location: &Coordinates) -> Option<&ExploredLocation> {
        self.explored_locations.get(location)
    }

    pub fn explored_locations(&self) -> impl Iterator<Item = &ExploredLocation> {
        self.explored_locations.values()
    }

    pub fn set_explored(&mut self, location: &Coordinates, explored: bool) -> bool {
        self.explored_locations
            .get_mut(location)
            .map(|site| site.set_explored(explored))
            .is_some()
    }

    pub fn set_mined(&mut self, location: &Coordinates, mined: bool) -> bool {
        self.explored_locations
            .get_mut(location)
            .map(|site| site.set_mined(mined))
            .is_some()
    }

    pub fn set_reserved(&mut self, location: &Coordinates, reserved: bool) -> bool {
        self.explored_locations
            .get_mut(location)
            .map(|site| site.set_reserved(reserved))
            .is_some()
    }

    pub fn destroy(&mut self) {
        self.explored_locations.clear();
        self.optical_depth_cache.clear();
    }
}
