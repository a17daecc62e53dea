pub mod dust_storm;
pub mod explored_location;
pub mod mineral_map;
pub mod orbit_info;
pub mod surface_features;
pub mod terrain_elevation;
pub mod weather;

pub use dust_storm::DustStorm;
pub use explored_location::ExploredLocation;
pub use mineral_map::{MineralMap, RandomMineralMap};
pub use orbit_info::{OrbitInfo, Season};
pub use surface_features::SurfaceFeatures;
pub use terrain_elevation::{CollectionSite, TerrainElevation, TerrainProfile};
pub use weather::{Weather, WeatherSample};

use crate::config::{ConfigError, EnvironmentConfig};
use crate::coordinates::Coordinates;
use crate::time::{ClockPulse, MarsTime, Temporal};
use log::info;
use std::sync::Arc;

/// The planet: orbit, terrain, weather and surface, advanced together.
pub struct Environment {
    orbit: OrbitInfo,
    terrain: Arc<TerrainElevation>,
    weather: Weather,
    surface: SurfaceFeatures,
}

impl Environment {
    pub fn new(config: &EnvironmentConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let epoch = config.start_epoch()?;
        let minerals = config.mineral_types()?;

        let terrain = Arc::new(TerrainElevation::new(config.seed));
        let orbit = OrbitInfo::from_epoch(&epoch);
        let mut weather = Weather::new(config.weather.clone(), config.seed, Arc::clone(&terrain), orbit.clone());
        weather.start_at_sol(MarsTime::from_epoch(&epoch).sol());
        for settlement in &config.settlements {
            weather.add_settlement(&settlement.name, settlement.coordinates());
        }
        let surface = SurfaceFeatures::new(&minerals, &terrain, config.seed, config.weather.update_interval);

        info!(
            "Environment ready at {}: L_s {:.1} deg, {:.3} AU from the Sun",
            epoch,
            orbit.areocentric_longitude(),
            orbit.distance()
        );

        Ok(Self {
            orbit,
            terrain,
            weather,
            surface,
        })
    }

    pub fn orbit(&self) -> &OrbitInfo {
        &self.orbit
    }

    pub fn terrain(&self) -> Arc<TerrainElevation> {
        Arc::clone(&self.terrain)
    }

    pub fn weather(&self) -> &Weather {
        &self.weather
    }

    pub fn weather_mut(&mut self) -> &mut Weather {
        &mut self.weather
    }

    pub fn surface(&self) -> &SurfaceFeatures {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut SurfaceFeatures {
        &mut self.surface
    }

    pub fn weather_sample(&mut self, location: &Coordinates) -> WeatherSample {
        self.weather.sample(location)
    }

    pub fn temperature(&mut self, location: &Coordinates) -> f64 {
        self.weather.temperature(location)
    }

    pub fn pressure(&mut self, location: &Coordinates) -> f64 {
        self.weather.pressure(location)
    }

    pub fn air_density(&mut self, location: &Coordinates) -> f64 {
        self.weather.air_density(location)
    }

    pub fn wind_speed(&mut self, location: &Coordinates) -> f64 {
        self.weather.wind_speed(location)
    }

    pub fn wind_direction(&mut self, location: &Coordinates) -> f64 {
        self.weather.wind_direction(location)
    }

    pub fn optical_depth(&mut self, location: &Coordinates) -> f64 {
        self.surface.optical_depth(location, &self.orbit, &mut self.weather)
    }

    pub fn solar_irradiance(&mut self, location: &Coordinates) -> f64 {
        self.surface.solar_irradiance(location, &self.orbit, &mut self.weather)
    }

    pub fn sunlight_ratio(&mut self, location: &Coordinates) -> f64 {
        self.surface.sunlight_ratio(location, &self.orbit, &mut self.weather)
    }

    pub fn in_polar_region(&self, location: &Coordinates) -> bool {
        SurfaceFeatures::in_polar_region(location)
    }

    pub fn in_dark_polar_region(&self, location: &Coordinates) -> bool {
        SurfaceFeatures::in_dark_polar_region(location, &self.orbit)
    }

    pub fn elevation_km(&self, location: &Coordinates) -> f64 {
        self.terrain.elevation_km(location)
    }

    pub fn add_explored_location(
        &mut self,
        location: Coordinates,
        estimation_improvement: u32,
        settlement: &str,
    ) -> &ExploredLocation {
        self.surface
            .add_explored_location(location, estimation_improvement, settlement)
    }

    pub fn improve_mineral_estimates(&mut self, location: &Coordinates) -> bool {
        self.surface.improve_mineral_estimates(location)
    }

    /// Drop every cache and registry.
    pub fn destroy(&mut self) {
        self.weather.destroy();
        self.surface.destroy();
        self.terrain.clear_collection_sites();
        info!("Environment destroyed");
    }
}

impl Temporal for Environment {
    fn time_passing(&mut self, pulse: &ClockPulse) -> bool {
        self.orbit.time_passing(pulse)
            && self.weather.time_passing(pulse, &self.orbit)
            && self.surface.time_passing(pulse, &self.orbit, &self.weather)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::MasterClock;

    #[test]
    fn builds_from_default_config() {
        let mut env = Environment::new(&EnvironmentConfig::default()).unwrap();
        assert_eq!(env.weather().settlements().len(), 2);
        let l_s = env.orbit().areocentric_longitude();
        assert!((0.0..360.0).contains(&l_s));

        let jezero = Coordinates::from_lat_lon_degrees(18.4, 77.5);
        assert!(env.temperature(&jezero) <= 30.0);
        assert!(env.optical_depth(&jezero) >= 0.1);
    }

    #[test]
    fn clock_drives_every_component() {
        let config = EnvironmentConfig::default();
        let mut env = Environment::new(&config).unwrap();
        let mut clock = MasterClock::from_epoch(&config.start_epoch().unwrap());
        let start_ls = env.orbit().areocentric_longitude();
        let gale = Coordinates::from_lat_lon_degrees(-5.4, 137.8);
        env.pressure(&gale);

        for _ in 0..100 {
            let pulse = clock.next_pulse(20.0).unwrap();
            assert!(env.time_passing(&pulse));
            env.pressure(&gale);
        }
        assert_eq!(env.weather().current_sol(), clock.mars_time().sol());
        assert_ne!(env.orbit().areocentric_longitude(), start_ls);
    }

    #[test]
    fn optical_depth_queries_do_not_pin_the_weather_cache() {
        let config = EnvironmentConfig::default();
        let mut env = Environment::new(&config).unwrap();
        let mut clock = MasterClock::from_epoch(&config.start_epoch().unwrap());
        for i in 0..50 {
            let site = Coordinates::from_lat_lon_degrees(-60.0 + 2.4 * i as f64, 3.6 * i as f64);
            env.optical_depth(&site);
        }
        assert_eq!(env.weather().cache_len(), 50);
        assert_eq!(env.surface().optical_depth_cache_len(), 50);

        // 20 sols without another query
        for _ in 0..2000 {
            let pulse = clock.next_pulse(10.0).unwrap();
            env.time_passing(&pulse);
        }
        assert_eq!(env.weather().cache_len(), 0);
        assert_eq!(env.surface().optical_depth_cache_len(), 0);
    }

    #[test]
    fn destroy_clears_caches() {
        let mut env = Environment::new(&EnvironmentConfig::default()).unwrap();
        let site = Coordinates::from_lat_lon_degrees(-4.5, 137.4);
        env.add_explored_location(site, 0, "Gale Outpost");
        env.terrain().regolith_collection_rate(&site);
        env.weather_sample(&site);

        env.destroy();
        assert!(env.surface().explored_location(&site).is_none());
        assert_eq!(env.weather().cache_len(), 0);
        assert_eq!(env.terrain().collection_site_count(), 0);
    }
}
