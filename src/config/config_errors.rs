use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid start epoch: {0}")]
    InvalidEpoch(hifitime::Errors),
    #[error("unknown mineral frequency {0:?}")]
    UnknownFrequency(String),
    #[error("unknown locale {0:?}")]
    UnknownLocale(String),
    #[error("mineral {0:?} is listed more than once")]
    DuplicateMineral(String),
    #[error("mineral table is empty")]
    EmptyMineralTable,
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
