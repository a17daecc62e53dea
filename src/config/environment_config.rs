use super::config_errors::ConfigError;
use super::mineral_config::{load_mineral_types_from_path, MineralType, DEFAULT_MINERAL_TYPES};
use crate::coordinates::Coordinates;
use hifitime::Epoch;
use log::info;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Millisols between weather recomputations.
    pub update_interval: u32,
    /// Weight of a fresh reading when blended into the cache, in `(0, 1]`.
    pub smoothing: f64,
    /// Sols a cached location survives without being queried.
    pub cache_retention_sols: u64,
    pub storm_probability_in_season: f64,
    pub storm_probability_off_season: f64,
    /// Dust storm season as an areocentric longitude window (deg).
    pub storm_season_start: f64,
    pub storm_season_end: f64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            update_interval: 10,
            smoothing: 0.5,
            cache_retention_sols: 3,
            storm_probability_in_season: 0.25,
            storm_probability_off_season: 0.02,
            storm_season_start: 240.0,
            storm_season_end: 271.0,
        }
    }
}

impl WeatherConfig {
    pub fn in_storm_season(&self, l_s: f64) -> bool {
        l_s >= self.storm_season_start && l_s <= self.storm_season_end
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SettlementConfig {
    pub name: String,
    /// Degrees, north positive.
    pub latitude: f64,
    /// Degrees, east positive.
    pub longitude: f64,
}

impl SettlementConfig {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::from_lat_lon_degrees(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub seed: u64,
    /// Gregorian UTC start, e.g. "2043-09-30T00:00:00 UTC".
    pub start_epoch: String,
    pub weather: WeatherConfig,
    pub settlements: Vec<SettlementConfig>,
    /// Optional CSV mineral table; the built-in table is used when absent.
    pub minerals_csv: Option<PathBuf>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            start_epoch: "2043-09-30T00:00:00 UTC".to_string(),
            weather: WeatherConfig::default(),
            settlements: vec![
                SettlementConfig {
                    name: "Jezero Base".to_string(),
                    latitude: 18.4,
                    longitude: 77.5,
                },
                SettlementConfig {
                    name: "Gale Outpost".to_string(),
                    latitude: -5.4,
                    longitude: 137.8,
                },
            ],
            minerals_csv: None,
        }
    }
}

impl EnvironmentConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: EnvironmentConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::from_toml_str(&fs::read_to_string(path)?)?;
        info!("Loaded environment configuration from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let weather = &self.weather;
        if weather.update_interval == 0 {
            return Err(ConfigError::invalid("weather.update_interval", "must be at least 1"));
        }
        if !(weather.smoothing > 0.0 && weather.smoothing <= 1.0) {
            return Err(ConfigError::invalid(
                "weather.smoothing",
                format!("{} is outside (0, 1]", weather.smoothing),
            ));
        }
        for (field, p) in [
            ("weather.storm_probability_in_season", weather.storm_probability_in_season),
            ("weather.storm_probability_off_season", weather.storm_probability_off_season),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::invalid(field, format!("{} is not a probability", p)));
            }
        }
        if !(0.0..=360.0).contains(&weather.storm_season_start)
            || !(0.0..=360.0).contains(&weather.storm_season_end)
            || weather.storm_season_start > weather.storm_season_end
        {
            return Err(ConfigError::invalid(
                "weather.storm_season",
                "window must satisfy 0 <= start <= end <= 360",
            ));
        }
        for settlement in &self.settlements {
            if !(-90.0..=90.0).contains(&settlement.latitude) {
                return Err(ConfigError::invalid(
                    "settlements.latitude",
                    format!("{} has latitude {}", settlement.name, settlement.latitude),
                ));
            }
        }
        self.start_epoch()?;
        Ok(())
    }

    pub fn start_epoch(&self) -> Result<Epoch, ConfigError> {
        Epoch::from_gregorian_str(&self.start_epoch).map_err(ConfigError::InvalidEpoch)
    }

    pub fn mineral_types(&self) -> Result<Vec<MineralType>, ConfigError> {
        match &self.minerals_csv {
            Some(path) => load_mineral_types_from_path(path),
            None => Ok(DEFAULT_MINERAL_TYPES.clone()),
        }
    }
}
