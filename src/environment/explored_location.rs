use crate::coordinates::Coordinates;
use std::collections::BTreeMap;

/// A surveyed site and what the survey team believes lies beneath it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExploredLocation {
    location: Coordinates,
    estimated_concentrations: BTreeMap<String, f64>,
    num_estimation_improvement: u32,
    explored: bool,
    mined: bool,
    reserved: bool,
    settlement: String,
}

impl ExploredLocation {
    pub fn new(
        location: Coordinates,
        estimated_concentrations: BTreeMap<String, f64>,
        num_estimation_improvement: u32,
        settlement: &str,
    ) -> Self {
        Self {
            location,
            estimated_concentrations,
            num_estimation_improvement,
            explored: false,
            mined: false,
            reserved: false,
            settlement: settlement.to_string(),
        }
    }

    pub fn location(&self) -> Coordinates {
        self.location
    }

    /// Estimated concentration (%) of each mineral.
    pub fn estimated_concentrations(&self) -> &BTreeMap<String, f64> {
        &self.estimated_concentrations
    }

    pub fn estimated_concentration(&self, mineral: &str) -> Option<f64> {
        self.estimated_concentrations.get(mineral).copied()
    }

    pub(crate) fn estimated_concentrations_mut(&mut self) -> &mut BTreeMap<String, f64> {
        &mut self.estimated_concentrations
    }

    pub fn num_estimation_improvement(&self) -> u32 {
        self.num_estimation_improvement
    }

    pub(crate) fn increment_estimation_improvement(&mut self) {
        self.num_estimation_improvement = self.num_estimation_improvement.saturating_add(1);
    }

    pub fn is_explored(&self) -> bool {
        self.explored
    }

    pub fn set_explored(&mut self, explored: bool) {
        self.explored = explored;
    }

    pub fn is_mined(&self) -> bool {
        self.mined
    }

    pub fn set_mined(&mut self, mined: bool) {
        self.mined = mined;
    }

    pub fn is_reserved(&self) -> bool {
        self.reserved
    }

    pub fn set_reserved(&mut self, reserved: bool) {
        self.reserved = reserved;
    }

    /// Settlement that owns the survey.
    pub fn settlement(&self) -> &str {
        &self.settlement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_start_cleared() {
        let mut site = ExploredLocation::new(
            Coordinates::from_lat_lon_degrees(1.0, 2.0),
            BTreeMap::from([("Hematite".to_string(), 12.5)]),
            0,
            "Gale Outpost",
        );
        assert!(!site.is_explored() && !site.is_mined() && !site.is_reserved());

        site.set_reserved(true);
        site.increment_estimation_improvement();
        assert!(site.is_reserved());
        assert_eq!(site.num_estimation_improvement(), 1);
        assert_eq!(site.estimated_concentration("Hematite"), Some(12.5));
        assert_eq!(site.estimated_concentration("Olivine"), None);
    }
}
