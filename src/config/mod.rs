pub mod config_errors;
pub mod environment_config;
pub mod mineral_config;

pub use config_errors::ConfigError;
pub use environment_config::{EnvironmentConfig, SettlementConfig, WeatherConfig};
pub use mineral_config::{Frequency, Locale, MineralType, DEFAULT_MINERAL_TYPES};
