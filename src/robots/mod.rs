pub mod bot_task_manager;
pub mod meta_task;
pub mod robot;
pub mod robotic_station;
pub mod task;

pub use bot_task_manager::BotTaskManager;
pub use meta_task::{ChargeMeta, MetaTask, SavePowerMeta};
pub use robot::{Battery, Robot, RobotType};
pub use robotic_station::RoboticStation;
pub use task::{Task, TaskOutcome};
