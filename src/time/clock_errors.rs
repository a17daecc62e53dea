use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ClockError {
    #[error("elapsed time must be finite, got {0}")]
    NonFinitePulse(f64),
    #[error("elapsed time must be positive, got {0} millisols")]
    NonPositivePulse(f64),
}
