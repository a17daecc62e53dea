use crate::constants::*;
use hifitime::Epoch;
use std::fmt;

/// A point on the Martian timeline, counted in millisols since Mars Sol Date 0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct MarsTime {
    total_millisols: f64,
}

impl MarsTime {
    pub fn from_total_millisols(total_millisols: f64) -> Self {
        Self {
            total_millisols: total_millisols.max(0.0),
        }
    }

    /// Mars time of an Earth epoch, via the Mars Sol Date (Allison & McEwen 2000).
    pub fn from_epoch(epoch: &Epoch) -> Self {
        let msd = (epoch.to_jde_tt_days() - MSD_EPOCH_JD_TT) / SOL_TO_DAY_RATIO;
        Self::from_total_millisols(msd * MILLISOLS_PER_SOL)
    }

    pub fn total_millisols(&self) -> f64 {
        self.total_millisols
    }

    /// Mars Sol Date, truncated.
    pub fn sol(&self) -> u64 {
        (self.total_millisols / MILLISOLS_PER_SOL).floor() as u64
    }

    /// Time of day at the prime meridian, in `[0, 1000)`.
    pub fn millisol(&self) -> f64 {
        self.total_millisols.rem_euclid(MILLISOLS_PER_SOL)
    }

    pub fn millisol_int(&self) -> u32 {
        self.millisol().floor() as u32
    }

    pub fn orbit(&self) -> u32 {
        (self.sol() as f64 / SOLS_PER_ORBIT).floor() as u32
    }

    /// Sol within the current orbit, starting at 1.
    pub fn sol_of_orbit(&self) -> u32 {
        let start = (self.orbit() as f64 * SOLS_PER_ORBIT).ceil() as u64;
        (self.sol() - start.min(self.sol())) as u32 + 1
    }

    pub fn add_millisols(&self, millisols: f64) -> MarsTime {
        MarsTime::from_total_millisols(self.total_millisols + millisols)
    }

    /// Millisols from `earlier` to `self`.
    pub fn millisols_since(&self, earlier: &MarsTime) -> f64 {
        self.total_millisols - earlier.total_millisols
    }
}

impl fmt::Display for MarsTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}-{:03}:{:07.3}",
            self.orbit(),
            self.sol_of_orbit(),
            self.millisol()
        )
    }
}
