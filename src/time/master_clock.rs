use super::clock_errors::ClockError;
use super::clock_pulse::ClockPulse;
use super::mars_time::MarsTime;
use hifitime::Epoch;
use log::debug;

/// Source of `ClockPulse`s for the simulation.
pub struct MasterClock {
    start: MarsTime,
    mars_time: MarsTime,
    next_pulse_id: u64,
}

impl MasterClock {
    pub fn new(start: MarsTime) -> Self {
        Self {
            start,
            mars_time: start,
            next_pulse_id: 1,
        }
    }

    pub fn from_epoch(epoch: &Epoch) -> Self {
        Self::new(MarsTime::from_epoch(epoch))
    }

    pub fn mars_time(&self) -> &MarsTime {
        &self.mars_time
    }

    pub fn start_time(&self) -> &MarsTime {
        &self.start
    }

    /// Millisols simulated so far.
    pub fn elapsed_millisols(&self) -> f64 {
        self.mars_time.millisols_since(&self.start)
    }

    /// Mission sol, starting at 1.
    pub fn mission_sol(&self) -> u64 {
        self.mars_time.sol() - self.start.sol() + 1
    }

    /// Advance the clock and produce the pulse describing the step.
    pub fn next_pulse(&mut self, elapsed_millisols: f64) -> Result<ClockPulse, ClockError> {
        if !elapsed_millisols.is_finite() {
            return Err(ClockError::NonFinitePulse(elapsed_millisols));
        }
        if elapsed_millisols <= 0.0 {
            return Err(ClockError::NonPositivePulse(elapsed_millisols));
        }

        let previous = self.mars_time;
        self.mars_time = previous.add_millisols(elapsed_millisols);
        let pulse = ClockPulse::new(self.next_pulse_id, previous, self.mars_time);
        self.next_pulse_id += 1;

        debug!(
            "pulse {} advanced {:.3} msol to {}",
            pulse.id(),
            elapsed_millisols,
            self.mars_time
        );
        Ok(pulse)
    }
}
