use std::num::ParseFloatError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoordinatesError {
    #[error("malformed coordinate string: {0:?}")]
    Malformed(String),
    #[error("invalid number in coordinate string: {0}")]
    ParseFloat(#[from] ParseFloatError),
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("unknown hemisphere marker {0:?}")]
    UnknownHemisphere(String),
}
