pub mod clock_errors;
pub mod clock_pulse;
pub mod mars_time;
pub mod master_clock;

pub use clock_errors::ClockError;
pub use clock_pulse::{ClockPulse, Temporal};
pub use mars_time::MarsTime;
pub use master_clock::MasterClock;
