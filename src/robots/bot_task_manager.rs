use super::meta_task::{ChargeMeta, MetaTask, SavePowerMeta};
use super::robot::Robot;
use super::robotic_station::RoboticStation;
use super::task::Task;
use log::debug;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Picks a robot's next task by weighted draw over every applicable task.
pub struct BotTaskManager {
    meta_tasks: Vec<Box<dyn MetaTask>>,
}

impl Default for BotTaskManager {
    fn default() -> Self {
        Self::new(vec![Box::new(ChargeMeta), Box::new(SavePowerMeta)])
    }
}

impl BotTaskManager {
    pub fn new(meta_tasks: Vec<Box<dyn MetaTask>>) -> Self {
        Self { meta_tasks }
    }

    /// `(task name, probability)` for every registered task.
    pub fn probability_table(&self, robot: &Robot, station: &RoboticStation) -> Vec<(&'static str, f64)> {
        self.meta_tasks
            .iter()
            .map(|meta| {
                let p = meta.probability(robot, station);
                (meta.name(), if p.is_finite() { p.max(0.0) } else { 0.0 })
            })
            .collect()
    }

    pub fn total_probability(&self, robot: &Robot, station: &RoboticStation) -> f64 {
        self.probability_table(robot, station).iter().map(|(_, p)| p).sum()
    }

    /// None when no task applies.
    pub fn select_new_task<R: Rng + ?Sized>(
        &self,
        robot: &Robot,
        station: &RoboticStation,
        rng: &mut R,
    ) -> Option<Task> {
        let table = self.probability_table(robot, station);
        if table.iter().map(|(_, p)| p).sum::<f64>() <= 0.0 {
            return None;
        }

        let weights = WeightedIndex::new(table.iter().map(|(_, p)| *p)).ok()?;
        let index = weights.sample(rng);
        debug!(
            "{} at {:.1}% picked {} from {:?}",
            robot.name(),
            robot.battery().percent(),
            table[index].0,
            table
        );
        Some(self.meta_tasks[index].create_task())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robots::RobotType;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn nothing_to_do_when_charged() {
        let manager = BotTaskManager::default();
        let robot = Robot::new("Chef", RobotType::ChefBot);
        let station = RoboticStation::new("Dock", 1);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(manager.total_probability(&robot, &station), 0.0);
        assert_eq!(manager.select_new_task(&robot, &station, &mut rng), None);
    }

    #[test]
    fn low_battery_with_free_slot_charges() {
        let manager = BotTaskManager::default();
        let mut robot = Robot::new("Chef", RobotType::ChefBot);
        robot.battery_mut().set_percent(10.0);
        let station = RoboticStation::new("Dock", 1);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..20 {
            assert_eq!(manager.select_new_task(&robot, &station, &mut rng), Some(Task::Charge));
        }
    }

    #[test]
    fn full_station_falls_back_to_saving_power() {
        let manager = BotTaskManager::default();
        let mut robot = Robot::new("Chef", RobotType::ChefBot);
        robot.battery_mut().set_percent(10.0);
        let station = RoboticStation::new("Dock", 0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let table = manager.probability_table(&robot, &station);
        assert_eq!(table[0], ("Charge", 0.0));
        assert_eq!(table[1].0, "Save Power");
        assert!((table[1].1 - 160.0).abs() < 1e-9);
        assert_eq!(manager.select_new_task(&robot, &station, &mut rng), Some(Task::SavePower));
    }

    struct Fixed(&'static str, f64, Task);

    impl MetaTask for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn probability(&self, _: &Robot, _: &RoboticStation) -> f64 {
            self.1
        }

        fn create_task(&self) -> Task {
            self.2
        }
    }

    #[test]
    fn draws_follow_the_weights() {
        let manager = BotTaskManager::new(vec![
            Box::new(Fixed("a", 3.0, Task::Charge)),
            Box::new(Fixed("b", 1.0, Task::SavePower)),
        ]);
        let robot = Robot::new("Chef", RobotType::ChefBot);
        let station = RoboticStation::new("Dock", 1);
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let charges = (0..4000)
            .filter(|_| manager.select_new_task(&robot, &station, &mut rng) == Some(Task::Charge))
            .count();
        assert!((2800..3200).contains(&charges), "{} charges", charges);
    }
}
