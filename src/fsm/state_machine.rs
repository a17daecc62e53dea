use super::dust_storm_states::DustStormType;
use log::info;

// A shrinking storm drops a category only once it falls this far below the
// threshold it grew through.
const DECAY_HYSTERESIS: f64 = 0.8;

pub struct DustStormFSM {
    current_state: DustStormType,
    min_sols_between_changes: u64,
    last_state_change: u64,
}

impl DustStormFSM {
    pub fn new(sol: u64) -> Self {
        Self {
            current_state: DustStormType::DustDevil,
            min_sols_between_changes: 1,
            last_state_change: sol,
        }
    }

    pub fn get_current_state(&self) -> DustStormType {
        self.current_state
    }

    pub fn get_last_state_change(&self) -> u64 {
        self.last_state_change
    }

    fn transition_to(&mut self, new_state: DustStormType, sol: u64) {
        if self.current_state != new_state {
            info!(
                "Dust storm transition on sol {}: {} -> {}",
                sol, self.current_state, new_state
            );
            self.current_state = new_state;
            self.last_state_change = sol;
        }
    }

    /// Move at most one category per evaluation, based on the storm size (km).
    pub fn evaluate_transition(&mut self, size: f64, sol: u64) -> DustStormType {
        if sol.saturating_sub(self.last_state_change) < self.min_sols_between_changes {
            return self.current_state;
        }

        let grow = self
            .current_state
            .growth_threshold()
            .zip(self.current_state.next())
            .filter(|(threshold, _)| size >= *threshold)
            .map(|(_, next)| next);

        let shrink = self
            .current_state
            .previous()
            .and_then(|previous| previous.growth_threshold().map(|t| (t, previous)))
            .filter(|(threshold, _)| size < threshold * DECAY_HYSTERESIS)
            .map(|(_, previous)| previous);

        if let Some(next) = grow.or(shrink) {
            self.transition_to(next, sol);
        }
        self.current_state
    }
}
