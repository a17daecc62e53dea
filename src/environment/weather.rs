use super::dust_storm::DustStorm;
use super::orbit_info::OrbitInfo;
use super::terrain_elevation::TerrainElevation;
use crate::config::WeatherConfig;
use crate::constants::*;
use crate::coordinates::Coordinates;
use crate::physics::environment::{air_density, hydrostatic_pressure, seasonal_pressure_factor};
use crate::time::ClockPulse;
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

const WEATHER_SEED_SALT: u64 = 0x7765_6174_6865_7200;

const MIN_TEMPERATURE: f64 = -150.0;
const MAX_TEMPERATURE: f64 = 30.0;
const MIN_PRESSURE: f64 = 0.03;
const MAX_PRESSURE: f64 = 1.5;
const MAX_CALM_WIND: f64 = 40.0;

// Diurnal thermal tide: amplitude (fraction of mean) and the local time of its peak
const TIDE_AMPLITUDE: f64 = 0.02;
const TIDE_PEAK_MILLISOL: f64 = 150.0;

/// Daily pressure variance reported before a full sol has been observed.
pub const DEFAULT_DAILY_PRESSURE_VARIANCE: f64 = 0.04;

const STORM_SPAWN_RADIUS_KM: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherSample {
    /// deg C
    pub temperature: f64,
    /// kPa
    pub pressure: f64,
    /// kg/m^3
    pub air_density: f64,
    /// m/s
    pub wind_speed: f64,
    /// deg, clockwise from north
    pub wind_direction: f64,
}

#[derive(Debug, Clone)]
struct CachedWeather {
    sample: WeatherSample,
    calm_wind: f64,
    pressure_min: f64,
    pressure_max: f64,
    pressure_sum: f64,
    pressure_count: u32,
    daily_pressure_variance: f64,
    last_queried_sol: u64,
}

impl CachedWeather {
    fn new(sample: WeatherSample, calm_wind: f64, sol: u64) -> Self {
        Self {
            sample,
            calm_wind,
            pressure_min: sample.pressure,
            pressure_max: sample.pressure,
            pressure_sum: sample.pressure,
            pressure_count: 1,
            daily_pressure_variance: DEFAULT_DAILY_PRESSURE_VARIANCE,
            last_queried_sol: sol,
        }
    }

    fn record_pressure(&mut self, pressure: f64) {
        self.pressure_min = self.pressure_min.min(pressure);
        self.pressure_max = self.pressure_max.max(pressure);
        self.pressure_sum += pressure;
        self.pressure_count += 1;
    }

    fn roll_over_sol(&mut self) {
        let mean = self.pressure_sum / self.pressure_count.max(1) as f64;
        if self.pressure_count > 1 && mean > 0.0 {
            self.daily_pressure_variance = (self.pressure_max - self.pressure_min) / mean;
        }
        let current = self.sample.pressure;
        self.pressure_min = current;
        self.pressure_max = current;
        self.pressure_sum = current;
        self.pressure_count = 1;
    }
}

/// Locations in a fixed order, so cache walks draw from the rng reproducibly.
fn ordered(locations: impl Iterator<Item = Coordinates>) -> Vec<Coordinates> {
    let mut locations: Vec<_> = locations.collect();
    locations.sort_by(|a, b| a.phi().total_cmp(&b.phi()).then(a.theta().total_cmp(&b.theta())));
    locations
}

/// Per-location weather with a periodic refresh, plus dust storms near
/// settlements.
pub struct Weather {
    config: WeatherConfig,
    rng: ChaCha8Rng,
    terrain: Arc<TerrainElevation>,
    orbit: OrbitInfo,
    cache: HashMap<Coordinates, CachedWeather>,
    settlements: BTreeMap<String, Coordinates>,
    dust_storms: Vec<DustStorm>,
    next_storm_id: u32,
    current_sol: u64,
}

impl Weather {
    pub fn new(config: WeatherConfig, seed: u64, terrain: Arc<TerrainElevation>, orbit: OrbitInfo) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed ^ WEATHER_SEED_SALT),
            terrain,
            orbit,
            cache: HashMap::new(),
            settlements: BTreeMap::new(),
            dust_storms: Vec::new(),
            next_storm_id: 1,
            current_sol: 0,
        }
    }

    pub fn config(&self) -> &WeatherConfig {
        &self.config
    }

    pub fn add_settlement(&mut self, name: &str, location: Coordinates) {
        self.settlements.insert(name.to_string(), location);
    }

    pub fn settlements(&self) -> &BTreeMap<String, Coordinates> {
        &self.settlements
    }

    pub fn current_sol(&self) -> u64 {
        self.current_sol
    }

    /// Align the sol counter with the clock before the first pulse.
    pub fn start_at_sol(&mut self, sol: u64) {
        self.current_sol = sol;
    }

    /// Current weather at `location`, computing and caching it on first use.
    pub fn sample(&mut self, location: &Coordinates) -> WeatherSample {
        let sol = self.current_sol;
        if let Some(entry) = self.cache.get_mut(location) {
            entry.last_queried_sol = sol;
            return entry.sample;
        }

        let (sample, calm_wind) = self.compute_fresh(location, None);
        self.cache.insert(*location, CachedWeather::new(sample, calm_wind, sol));
        sample
    }

    /// Cached weather without computing or touching the entry.
    pub fn cached_sample(&self, location: &Coordinates) -> Option<WeatherSample> {
        self.cache.get(location).map(|entry| entry.sample)
    }

    pub fn temperature(&mut self, location: &Coordinates) -> f64 {
        self.sample(location).temperature
    }

    pub fn pressure(&mut self, location: &Coordinates) -> f64 {
        self.sample(location).pressure
    }

    pub fn air_density(&mut self, location: &Coordinates) -> f64 {
        self.sample(location).air_density
    }

    pub fn wind_speed(&mut self, location: &Coordinates) -> f64 {
        self.sample(location).wind_speed
    }

    pub fn wind_direction(&mut self, location: &Coordinates) -> f64 {
        self.sample(location).wind_direction
    }

    /// `(max - min) / mean` of the pressure readings during the previous sol.
    pub fn daily_pressure_variance(&mut self, location: &Coordinates) -> f64 {
        self.sample(location);
        self.cache
            .get(location)
            .map_or(DEFAULT_DAILY_PRESSURE_VARIANCE, |entry| entry.daily_pressure_variance)
    }

    /// Daily pressure variance of a cached entry, leaving its retention untouched.
    pub fn cached_daily_pressure_variance(&self, location: &Coordinates) -> Option<f64> {
        self.cache.get(location).map(|entry| entry.daily_pressure_variance)
    }

    pub fn dust_storms(&self) -> &[DustStorm] {
        &self.dust_storms
    }

    /// Combined optical depth added by every storm overhead.
    pub fn dust_storm_optical_depth(&self, location: &Coordinates) -> f64 {
        self.dust_storms
            .iter()
            .map(|storm| storm.optical_depth_contribution(location))
            .sum()
    }

    #[cfg(test)]
    pub(crate) fn push_dust_storm(&mut self, storm: DustStorm) {
        self.dust_storms.push(storm);
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn time_passing(&mut self, pulse: &ClockPulse, orbit: &OrbitInfo) -> bool {
        self.orbit = orbit.clone();

        if pulse.is_new_sol() {
            self.current_sol = pulse.mars_time().sol();
            for entry in self.cache.values_mut() {
                entry.roll_over_sol();
            }
            self.evict_stale_entries();
            self.update_dust_storms();
        }

        if pulse.is_new_millisol() && pulse.crossed_interval(self.config.update_interval) {
            self.refresh_cache();
        }
        true
    }

    pub fn destroy(&mut self) {
        self.cache.clear();
        self.settlements.clear();
        self.dust_storms.clear();
    }

    fn evict_stale_entries(&mut self) {
        let before = self.cache.len();
        let sol = self.current_sol;
        let retention = self.config.cache_retention_sols;
        self.cache
            .retain(|_, entry| sol.saturating_sub(entry.last_queried_sol) <= retention);
        let evicted = before - self.cache.len();
        if evicted > 0 {
            debug!("Evicted {} stale weather entries on sol {}", evicted, sol);
        }
    }

    fn refresh_cache(&mut self) {
        let a = self.config.smoothing;
        for location in ordered(self.cache.keys().copied()) {
            let Some(previous) = self.cache.get(&location).cloned() else {
                continue;
            };
            let (fresh, calm_wind) = self.compute_fresh(&location, Some(&previous));

            let blend = |old: f64, new: f64| old * (1.0 - a) + new * a;
            let temperature = blend(previous.sample.temperature, fresh.temperature);
            let pressure = blend(previous.sample.pressure, fresh.pressure);
            let sample = WeatherSample {
                temperature,
                pressure,
                air_density: air_density(pressure, temperature),
                wind_speed: blend(previous.sample.wind_speed, fresh.wind_speed),
                wind_direction: fresh.wind_direction,
            };

            if let Some(entry) = self.cache.get_mut(&location) {
                entry.sample = sample;
                entry.calm_wind = calm_wind;
                entry.record_pressure(pressure);
            }
        }
        debug!("Refreshed weather at {} locations", self.cache.len());
    }

    fn compute_fresh(
        &mut self,
        location: &Coordinates,
        previous: Option<&CachedWeather>,
    ) -> (WeatherSample, f64) {
        let temperature = self.compute_temperature(location);
        let pressure = self.compute_pressure(location);

        let calm_wind = match previous {
            Some(p) => p.calm_wind + self.rng.gen_range(-2.0..2.0),
            None => self.rng.gen_range(0.0..10.0),
        }
        .clamp(0.0, MAX_CALM_WIND);
        let gust = self
            .dust_storms
            .iter()
            .map(|storm| storm.wind_gust_at(location))
            .fold(0.0, f64::max);

        let wind_direction = match previous {
            Some(p) => p.sample.wind_direction + self.rng.gen_range(-15.0..15.0),
            None => self.rng.gen_range(0.0..360.0),
        }
        .rem_euclid(360.0);

        let sample = WeatherSample {
            temperature,
            pressure,
            air_density: air_density(pressure, temperature),
            wind_speed: calm_wind + gust,
            wind_direction,
        };
        (sample, calm_wind)
    }

    fn compute_temperature(&mut self, location: &Coordinates) -> f64 {
        let orbit = &self.orbit;
        let latitude = location.latitude_radians();

        let insolation = orbit.cos_solar_zenith(location).max(0.0) * orbit.top_of_atmosphere_irradiance()
            / MAX_SOLAR_IRRADIANCE;
        let seasonal = 20.0 * orbit.solar_declination() / AXIAL_TILT * latitude.sin();
        let polar_cooling = -30.0 * latitude.sin().abs();
        let lapse = -LAPSE_RATE * self.terrain.elevation_km(location);
        let noise = self.rng.gen_range(-2.0..2.0);

        (MEAN_SURFACE_TEMPERATURE + 70.0 * (insolation - 0.25) + seasonal + polar_cooling + lapse + noise)
            .clamp(MIN_TEMPERATURE, MAX_TEMPERATURE)
    }

    fn compute_pressure(&mut self, location: &Coordinates) -> f64 {
        let base = hydrostatic_pressure(self.terrain.elevation_km(location))
            * seasonal_pressure_factor(self.orbit.areocentric_longitude());

        let dust = self.dust_storm_optical_depth(location);
        let local_time = self.orbit.local_millisol(location);
        let tide = TIDE_AMPLITUDE
            * (1.0 + dust)
            * (TAU * (local_time - TIDE_PEAK_MILLISOL) / MILLISOLS_PER_SOL).cos();
        let noise = self.rng.gen_range(-0.005..0.005);

        (base * (1.0 + tide) + noise).clamp(MIN_PRESSURE, MAX_PRESSURE)
    }

    fn update_dust_storms(&mut self) {
        let in_season = self
            .config
            .in_storm_season(self.orbit.areocentric_longitude());
        let sol = self.current_sol;

        let rng = &mut self.rng;
        self.dust_storms.retain_mut(|storm| storm.evolve(in_season, sol, &mut *rng));

        let probability = if in_season {
            self.config.storm_probability_in_season
        } else {
            self.config.storm_probability_off_season
        };
        for (name, location) in &self.settlements {
            if self.dust_storms.iter().any(|storm| storm.settlement() == name) {
                continue;
            }
            if self.rng.gen_bool(probability) {
                let center = location.random_location_within(&mut self.rng, STORM_SPAWN_RADIUS_KM);
                self.dust_storms
                    .push(DustStorm::new(self.next_storm_id, name, center, sol, &mut self.rng));
                self.next_storm_id += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::MarsTime;

    fn weather(config: WeatherConfig) -> Weather {
        let terrain = Arc::new(TerrainElevation::new(7));
        Weather::new(config, 7, terrain, OrbitInfo::from_areocentric_longitude(100.0, 0.0))
    }

    fn pulse(id: u64, from: f64, to: f64) -> ClockPulse {
        ClockPulse::new(
            id,
            MarsTime::from_total_millisols(from),
            MarsTime::from_total_millisols(to),
        )
    }

    /// Drive weather and orbit together in `step` millisol pulses.
    fn run(weather: &mut Weather, orbit: &mut OrbitInfo, from: f64, to: f64, step: f64) {
        let mut t = from;
        let mut id = 0;
        while t < to {
            let p = pulse(id, t, t + step);
            orbit.add_time(step);
            weather.time_passing(&p, orbit);
            t += step;
            id += 1;
        }
    }

    #[test]
    fn readings_are_bounded() {
        let mut weather = weather(WeatherConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..200 {
            let s = weather.sample(&Coordinates::random(&mut rng));
            assert!((MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&s.temperature));
            assert!((MIN_PRESSURE..=MAX_PRESSURE).contains(&s.pressure));
            assert!(s.air_density > 0.0);
            assert!(s.wind_speed >= 0.0);
            assert!((0.0..360.0).contains(&s.wind_direction));
        }
    }

    #[test]
    fn cache_is_stable_between_update_ticks() {
        let mut weather = weather(WeatherConfig::default());
        let mut orbit = OrbitInfo::from_areocentric_longitude(100.0, 0.0);
        let loc = Coordinates::from_lat_lon_degrees(-4.5, 137.4);
        let first = weather.sample(&loc);

        // 0.5 -> 9.5 never reaches a multiple of 10
        run(&mut weather, &mut orbit, 0.5, 9.5, 1.0);
        assert_eq!(weather.sample(&loc), first);

        run(&mut weather, &mut orbit, 9.5, 10.5, 1.0);
        assert_ne!(weather.sample(&loc), first);
    }

    #[test]
    fn refresh_blends_with_previous_reading() {
        let config = WeatherConfig {
            smoothing: 1.0,
            ..WeatherConfig::default()
        };
        let mut weather = weather(config);
        let mut orbit = OrbitInfo::from_areocentric_longitude(100.0, 0.0);
        let loc = Coordinates::from_lat_lon_degrees(10.0, 10.0);
        weather.sample(&loc);
        run(&mut weather, &mut orbit, 5.0, 15.0, 10.0);
        let s = weather.cached_sample(&loc).unwrap();
        assert!((s.air_density - air_density(s.pressure, s.temperature)).abs() < 1e-12);
    }

    #[test]
    fn higher_ground_has_thinner_air() {
        let mut weather = weather(WeatherConfig::default());
        let olympus = Coordinates::from_lat_lon_degrees(18.65, 226.2);
        let hellas = Coordinates::from_lat_lon_degrees(-42.4, 70.5);
        assert!(weather.pressure(&olympus) < weather.pressure(&hellas));
    }

    #[test]
    fn unqueried_entries_are_evicted() {
        let mut weather = weather(WeatherConfig::default());
        let mut orbit = OrbitInfo::from_areocentric_longitude(100.0, 0.0);
        let kept = Coordinates::from_lat_lon_degrees(0.0, 0.0);
        let dropped = Coordinates::from_lat_lon_degrees(30.0, 30.0);
        weather.sample(&kept);
        weather.sample(&dropped);

        for sol in 0..5 {
            let start = sol as f64 * 1000.0;
            run(&mut weather, &mut orbit, start, start + 1000.0, 50.0);
            weather.sample(&kept);
        }
        assert!(weather.cached_sample(&kept).is_some());
        assert!(weather.cached_sample(&dropped).is_none());
        assert_eq!(weather.cache_len(), 1);
    }

    #[test]
    fn daily_variance_rolls_over_each_sol() {
        let mut weather = weather(WeatherConfig::default());
        let mut orbit = OrbitInfo::from_areocentric_longitude(100.0, 0.0);
        let loc = Coordinates::from_lat_lon_degrees(-4.5, 137.4);
        assert_eq!(weather.daily_pressure_variance(&loc), DEFAULT_DAILY_PRESSURE_VARIANCE);

        run(&mut weather, &mut orbit, 0.0, 1000.0, 10.0);
        let variance = weather.daily_pressure_variance(&loc);
        assert_ne!(variance, DEFAULT_DAILY_PRESSURE_VARIANCE);
        assert!(variance > 0.0 && variance < 0.5);
    }

    #[test]
    fn settlements_spawn_storms_in_season() {
        let config = WeatherConfig {
            storm_probability_in_season: 1.0,
            storm_season_start: 0.0,
            storm_season_end: 360.0,
            ..WeatherConfig::default()
        };
        let mut weather = weather(config);
        let mut orbit = OrbitInfo::from_areocentric_longitude(100.0, 0.0);
        weather.add_settlement("Jezero Base", Coordinates::from_lat_lon_degrees(18.4, 77.5));

        run(&mut weather, &mut orbit, 900.0, 1100.0, 100.0);
        assert_eq!(weather.dust_storms().len(), 1);
        let storm = &weather.dust_storms()[0];
        assert_eq!(storm.settlement(), "Jezero Base");
        assert!(weather.dust_storm_optical_depth(&storm.center()) > 0.0);
    }

    #[test]
    fn storm_gusts_add_to_the_calm_wind() {
        let loc = Coordinates::from_lat_lon_degrees(18.4, 77.5);
        let mut calm = weather(WeatherConfig::default());
        let mut stormy = weather(WeatherConfig::default());
        let storm = DustStorm::planet_encircling(1, "Jezero Base", loc, &mut ChaCha8Rng::seed_from_u64(9));
        let gust = storm.speed();
        stormy.push_dust_storm(storm);

        let quiet = calm.sample(&loc);
        let windy = stormy.sample(&loc);
        assert!(gust > 0.0);
        assert!((windy.wind_speed - (quiet.wind_speed + gust)).abs() < 1e-9);
        assert_eq!(windy.wind_direction, quiet.wind_direction);
    }

    #[test]
    fn cached_variance_read_does_not_extend_retention() {
        let mut weather = weather(WeatherConfig::default());
        let mut orbit = OrbitInfo::from_areocentric_longitude(100.0, 0.0);
        let loc = Coordinates::from_lat_lon_degrees(-4.5, 137.4);
        assert_eq!(weather.cached_daily_pressure_variance(&loc), None);
        weather.sample(&loc);

        for sol in 0..5 {
            let start = sol as f64 * 1000.0;
            run(&mut weather, &mut orbit, start, start + 1000.0, 50.0);
            weather.cached_daily_pressure_variance(&loc);
        }
        assert_eq!(weather.cache_len(), 0);
    }

    #[test]
    fn no_storms_without_chance() {
        let config = WeatherConfig {
            storm_probability_in_season: 0.0,
            storm_probability_off_season: 0.0,
            ..WeatherConfig::default()
        };
        let mut weather = weather(config);
        let mut orbit = OrbitInfo::from_areocentric_longitude(100.0, 0.0);
        weather.add_settlement("Gale Outpost", Coordinates::from_lat_lon_degrees(-5.4, 137.8));
        run(&mut weather, &mut orbit, 0.0, 5000.0, 100.0);
        assert!(weather.dust_storms().is_empty());
    }

    #[test]
    fn destroy_clears_everything() {
        let mut weather = weather(WeatherConfig::default());
        weather.add_settlement("Gale Outpost", Coordinates::from_lat_lon_degrees(-5.4, 137.8));
        weather.sample(&Coordinates::from_lat_lon_degrees(1.0, 1.0));
        weather.destroy();
        assert_eq!(weather.cache_len(), 0);
        assert!(weather.settlements().is_empty());
    }
}
