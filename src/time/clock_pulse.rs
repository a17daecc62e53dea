use super::mars_time::MarsTime;

/// One tick of simulated time handed to every `Temporal` component.
#[derive(Debug, Clone, Copy)]
pub struct ClockPulse {
    id: u64,
    elapsed: f64,
    previous: MarsTime,
    mars_time: MarsTime,
}

impl ClockPulse {
    pub fn new(id: u64, previous: MarsTime, mars_time: MarsTime) -> Self {
        Self {
            id,
            elapsed: mars_time.millisols_since(&previous),
            previous,
            mars_time,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Millisols covered by this pulse.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn mars_time(&self) -> &MarsTime {
        &self.mars_time
    }

    pub fn previous_time(&self) -> &MarsTime {
        &self.previous
    }

    pub fn is_new_sol(&self) -> bool {
        self.mars_time.sol() != self.previous.sol()
    }

    pub fn is_new_millisol(&self) -> bool {
        self.mars_time.total_millisols().floor() != self.previous.total_millisols().floor()
    }

    /// True if the pulse reached an integral millisol that is a multiple of
    /// `interval`. A pulse spanning several multiples still fires once.
    pub fn crossed_interval(&self, interval: u32) -> bool {
        if interval == 0 {
            return false;
        }
        let interval = interval as f64;
        (self.mars_time.total_millisols() / interval).floor()
            != (self.previous.total_millisols() / interval).floor()
    }
}

/// Components that evolve with simulated time.
pub trait Temporal {
    /// Advance by one pulse. Returns false if the pulse was not applied.
    fn time_passing(&mut self, pulse: &ClockPulse) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn pulse(from: f64, to: f64) -> ClockPulse {
        ClockPulse::new(
            1,
            MarsTime::from_total_millisols(from),
            MarsTime::from_total_millisols(to),
        )
    }

    #[test_case(999.5, 1000.2, true; "crosses midnight")]
    #[test_case(10.0, 20.0, false; "same sol")]
    fn test_new_sol(from: f64, to: f64, expected: bool) {
        assert_eq!(pulse(from, to).is_new_sol(), expected);
    }

    #[test_case(8.7, 10.1, 5, true; "reaches a multiple")]
    #[test_case(10.1, 14.9, 5, false; "between multiples")]
    #[test_case(3.0, 27.0, 5, true; "spans several multiples")]
    #[test_case(3.0, 27.0, 0, false; "zero interval never fires")]
    fn test_crossed_interval(from: f64, to: f64, interval: u32, expected: bool) {
        assert_eq!(pulse(from, to).crossed_interval(interval), expected);
    }
}
