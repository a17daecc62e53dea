use super::robot::Robot;
use super::robotic_station::RoboticStation;
use super::task::Task;

/// Scores how much a robot wants a task right now and builds it on demand.
pub trait MetaTask {
    fn name(&self) -> &'static str;

    /// Non-negative weight in the selection table; 0 means not applicable.
    fn probability(&self, robot: &Robot, station: &RoboticStation) -> f64;

    fn create_task(&self) -> Task;
}

const CHARGE_URGENT_PERCENT: f64 = 20.0;
const CHARGE_URGENT_PROBABILITY: f64 = 1000.0;
const CHARGE_BELOW_PERCENT: f64 = 80.0;

const SAVE_POWER_URGENT_PERCENT: f64 = 5.0;
const SAVE_POWER_URGENT_PROBABILITY: f64 = 500.0;
const SAVE_POWER_BELOW_PERCENT: f64 = 50.0;

fn can_reach_a_slot(robot: &Robot, station: &RoboticStation) -> bool {
    station.has_free_slot() || station.is_docked(robot)
}

/// Go to the station and recharge.
pub struct ChargeMeta;

impl MetaTask for ChargeMeta {
    fn name(&self) -> &'static str {
        "Charge"
    }

    fn probability(&self, robot: &Robot, station: &RoboticStation) -> f64 {
        if !can_reach_a_slot(robot, station) {
            return 0.0;
        }
        let percent = robot.battery().percent();
        if percent <= CHARGE_URGENT_PERCENT {
            CHARGE_URGENT_PROBABILITY
        } else if percent < CHARGE_BELOW_PERCENT {
            (CHARGE_BELOW_PERCENT - percent) * 5.0
        } else {
            0.0
        }
    }

    fn create_task(&self) -> Task {
        Task::Charge
    }
}

/// Throttle down when every charging slot is taken.
pub struct SavePowerMeta;

impl MetaTask for SavePowerMeta {
    fn name(&self) -> &'static str {
        "Save Power"
    }

    fn probability(&self, robot: &Robot, station: &RoboticStation) -> f64 {
        if can_reach_a_slot(robot, station) {
            return 0.0;
        }
        let percent = robot.battery().percent();
        if percent <= SAVE_POWER_URGENT_PERCENT {
            SAVE_POWER_URGENT_PROBABILITY
        } else if percent < SAVE_POWER_BELOW_PERCENT {
            (SAVE_POWER_BELOW_PERCENT - percent) * 4.0
        } else {
            0.0
        }
    }

    fn create_task(&self) -> Task {
        Task::SavePower
    }
}
