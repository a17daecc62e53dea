use crate::constants::*;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

// Drain multiplier while in power-save mode
const POWER_SAVE_FACTOR: f64 = 0.25;
const FULL_TOLERANCE: f64 = 1e-9; // kWh

static NEXT_ROBOT_ID: AtomicU32 = AtomicU32::new(1);

/// Hours in `millisols`.
pub fn millisols_to_hours(millisols: f64) -> f64 {
    millisols * SECONDS_PER_MILLISOL / 3600.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RobotType {
    ChefBot,
    ConstructionBot,
    DeliveryBot,
    GardenBot,
    MakerBot,
    MedicBot,
    RepairBot,
}

impl RobotType {
    /// Battery capacity (kWh).
    pub fn battery_capacity(&self) -> f64 {
        match self {
            RobotType::ConstructionBot | RobotType::DeliveryBot => 20.0,
            RobotType::GardenBot | RobotType::RepairBot => 12.0,
            RobotType::ChefBot | RobotType::MakerBot | RobotType::MedicBot => 8.0,
        }
    }

    /// Continuous draw while working (kW).
    pub fn power_draw(&self) -> f64 {
        match self {
            RobotType::ConstructionBot => 4.0,
            RobotType::DeliveryBot => 3.0,
            _ => 1.5,
        }
    }
}

impl fmt::Display for RobotType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RobotType::ChefBot => write!(f, "ChefBot"),
            RobotType::ConstructionBot => write!(f, "ConstructionBot"),
            RobotType::DeliveryBot => write!(f, "DeliveryBot"),
            RobotType::GardenBot => write!(f, "GardenBot"),
            RobotType::MakerBot => write!(f, "MakerBot"),
            RobotType::MedicBot => write!(f, "MedicBot"),
            RobotType::RepairBot => write!(f, "RepairBot"),
        }
    }
}

/// Stored energy in kWh.
#[derive(Debug, Clone, PartialEq)]
pub struct Battery {
    capacity: f64,
    energy: f64,
}

impl Battery {
    pub fn new(capacity: f64) -> Self {
        let capacity = capacity.max(0.0);
        Self {
            capacity,
            energy: capacity,
        }
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// State of charge in percent.
    pub fn percent(&self) -> f64 {
        if self.capacity <= 0.0 {
            return 0.0;
        }
        100.0 * self.energy / self.capacity
    }

    pub fn set_percent(&mut self, percent: f64) {
        self.energy = self.capacity * percent.clamp(0.0, 100.0) / 100.0;
    }

    pub fn is_full(&self) -> bool {
        self.energy >= self.capacity - FULL_TOLERANCE
    }

    /// Store up to `kwh`; returns what was accepted.
    pub fn charge(&mut self, kwh: f64) -> f64 {
        let accepted = kwh.max(0.0).min(self.capacity - self.energy);
        self.energy += accepted;
        accepted
    }

    /// Draw up to `kwh`; returns what was delivered.
    pub fn discharge(&mut self, kwh: f64) -> f64 {
        let delivered = kwh.max(0.0).min(self.energy);
        self.energy -= delivered;
        delivered
    }
}

pub struct Robot {
    id: u32,
    name: String,
    robot_type: RobotType,
    battery: Battery,
    /// kW
    charge_rate: f64,
    docked: bool,
    power_save_remaining: f64,
}

impl Robot {
    pub fn new(name: &str, robot_type: RobotType) -> Self {
        Self {
            id: NEXT_ROBOT_ID.fetch_add(1, Ordering::Relaxed),
            name: name.to_string(),
            robot_type,
            battery: Battery::new(robot_type.battery_capacity()),
            charge_rate: 2.0 * robot_type.power_draw(),
            docked: false,
            power_save_remaining: 0.0,
        }
    }

    /// Unique for the lifetime of the process, unlike the name.
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn robot_type(&self) -> RobotType {
        self.robot_type
    }

    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    pub fn battery_mut(&mut self) -> &mut Battery {
        &mut self.battery
    }

    pub fn charge_rate_kw(&self) -> f64 {
        self.charge_rate
    }

    pub fn is_docked(&self) -> bool {
        self.docked
    }

    pub(crate) fn set_docked(&mut self, docked: bool) {
        self.docked = docked;
    }

    pub fn is_power_saving(&self) -> bool {
        self.power_save_remaining > 0.0
    }

    pub fn enter_power_save(&mut self, millisols: f64) {
        self.power_save_remaining = self.power_save_remaining.max(millisols);
    }

    /// Current draw (kW), reduced in power-save mode. Docked robots draw from the station.
    pub fn power_draw_kw(&self) -> f64 {
        if self.docked {
            0.0
        } else if self.is_power_saving() {
            self.robot_type.power_draw() * POWER_SAVE_FACTOR
        } else {
            self.robot_type.power_draw()
        }
    }

    /// Run the robot's own systems for `millisols`.
    pub fn consume_power(&mut self, millisols: f64) -> f64 {
        let used = self
            .battery
            .discharge(self.power_draw_kw() * millisols_to_hours(millisols));
        self.power_save_remaining = (self.power_save_remaining - millisols).max(0.0);
        used
    }
}
