use super::robot::Robot;
use log::debug;
use std::collections::BTreeSet;

/// Charging dock with a fixed number of slots.
pub struct RoboticStation {
    name: String,
    capacity: usize,
    /// Robot ids
    occupants: BTreeSet<u32>,
}

impl RoboticStation {
    pub fn new(name: &str, capacity: usize) -> Self {
        Self {
            name: name.to_string(),
            capacity,
            occupants: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn occupant_count(&self) -> usize {
        self.occupants.len()
    }

    pub fn has_free_slot(&self) -> bool {
        self.occupants.len() < self.capacity
    }

    pub fn is_docked(&self, robot: &Robot) -> bool {
        self.occupants.contains(&robot.id())
    }

    /// Dock `robot` if it is not already docked and a slot is free.
    pub fn try_dock(&mut self, robot: &mut Robot) -> bool {
        if self.is_docked(robot) {
            return true;
        }
        if !self.has_free_slot() {
            return false;
        }
        self.occupants.insert(robot.id());
        robot.set_docked(true);
        debug!("{} docked at {}", robot.name(), self.name);
        true
    }

    pub fn undock(&mut self, robot: &mut Robot) {
        if self.occupants.remove(&robot.id()) {
            debug!("{} left {}", robot.name(), self.name);
        }
        robot.set_docked(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robots::RobotType;

    #[test]
    fn slots_are_limited() {
        let mut station = RoboticStation::new("Dock A", 1);
        let mut a = Robot::new("A", RobotType::ChefBot);
        let mut b = Robot::new("B", RobotType::ChefBot);

        assert!(station.try_dock(&mut a));
        assert!(station.try_dock(&mut a));
        assert!(!station.try_dock(&mut b));
        assert!(!b.is_docked());
        assert_eq!(station.occupant_count(), 1);

        station.undock(&mut a);
        assert!(!a.is_docked());
        assert!(station.try_dock(&mut b));
    }

    #[test]
    fn robots_sharing_a_name_need_their_own_slots() {
        let mut station = RoboticStation::new("Dock A", 1);
        let mut first = Robot::new("Rover", RobotType::DeliveryBot);
        let mut second = Robot::new("Rover", RobotType::DeliveryBot);
        assert_ne!(first.id(), second.id());

        assert!(station.try_dock(&mut first));
        assert!(!station.is_docked(&second));
        assert!(!station.try_dock(&mut second));
        assert!(!second.is_docked());

        station.undock(&mut second);
        assert!(station.is_docked(&first));
        assert_eq!(station.occupant_count(), 1);
    }
}
