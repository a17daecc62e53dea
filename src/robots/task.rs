use super::robot::{millisols_to_hours, Robot};
use super::robotic_station::RoboticStation;
use log::debug;

/// Millisols a robot stays throttled after choosing to save power.
pub const POWER_SAVE_DURATION: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Charge,
    SavePower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    InProgress,
    Completed,
    /// Could not start, e.g. no free charging slot.
    Abandoned,
}

impl Task {
    pub fn name(&self) -> &'static str {
        match self {
            Task::Charge => "Charge",
            Task::SavePower => "Save Power",
        }
    }

    pub fn perform(&self, robot: &mut Robot, station: &mut RoboticStation, millisols: f64) -> TaskOutcome {
        match self {
            Task::Charge => {
                if !station.try_dock(robot) {
                    return TaskOutcome::Abandoned;
                }
                let energy = robot.charge_rate_kw() * millisols_to_hours(millisols);
                robot.battery_mut().charge(energy);
                if robot.battery().is_full() {
                    station.undock(robot);
                    debug!("{} finished charging", robot.name());
                    TaskOutcome::Completed
                } else {
                    TaskOutcome::InProgress
                }
            }
            Task::SavePower => {
                robot.enter_power_save(POWER_SAVE_DURATION);
                debug!("{} saving power", robot.name());
                TaskOutcome::Completed
            }
        }
    }
}
