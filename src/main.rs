use csv::Writer;
use log::info;
use mars_environment::config::EnvironmentConfig;
use mars_environment::environment::Environment;
use mars_environment::robots::{BotTaskManager, Robot, RobotType, RoboticStation, Task, TaskOutcome};
use mars_environment::time::{MasterClock, Temporal};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::env;
use std::error::Error;
use std::fs::{self, File};
use std::path::Path;

const PULSE_MILLISOLS: f64 = 10.0;
const SIMULATED_SOLS: u32 = 30;
// Write a row every this many pulses
const SAMPLE_EVERY: u32 = 10;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match env::args().nth(1) {
        Some(path) => EnvironmentConfig::load(Path::new(&path))?,
        None => EnvironmentConfig::default(),
    };

    let start_epoch = config.start_epoch()?;
    let mut environment = Environment::new(&config)?;
    let mut clock = MasterClock::from_epoch(&start_epoch);
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    // One charging slot for two robots so the save-power path gets exercised
    let mut station = RoboticStation::new("Main Dock", 1);
    let mut robots = vec![
        Robot::new("Hauler", RobotType::DeliveryBot),
        Robot::new("Builder", RobotType::ConstructionBot),
    ];
    let mut current_tasks: Vec<Option<Task>> = vec![None; robots.len()];
    let task_manager = BotTaskManager::default();

    let settlements: Vec<_> = config
        .settlements
        .iter()
        .map(|s| (s.name.clone(), s.coordinates()))
        .collect();
    for (name, location) in &settlements {
        environment.add_explored_location(*location, 0, name);
    }

    // Create output directory if it doesn't exist
    let output_dir = Path::new("output");
    fs::create_dir_all(output_dir)?;
    let file = File::create(output_dir.join("environment_data.csv"))?;
    let mut writer = Writer::from_writer(file);

    writer.write_record([
        "Mars Time",
        "Mission Sol",
        "L_s (deg)",
        "Sun Distance (AU)",
        "Settlement",
        "Temperature (C)",
        "Pressure (kPa)",
        "Air Density (kg/m3)",
        "Wind Speed (m/s)",
        "Wind Direction (deg)",
        "Optical Depth",
        "Solar Irradiance (W/m2)",
        "Dust Storms",
        "Battery Hauler (%)",
        "Battery Builder (%)",
    ])?;

    let pulses = SIMULATED_SOLS * (1000.0 / PULSE_MILLISOLS) as u32;
    for i in 0..pulses {
        let pulse = clock.next_pulse(PULSE_MILLISOLS)?;
        environment.time_passing(&pulse);

        for (robot, task) in robots.iter_mut().zip(current_tasks.iter_mut()) {
            robot.consume_power(pulse.elapsed());
            if task.is_none() {
                *task = task_manager.select_new_task(robot, &station, &mut rng);
            }
            if let Some(t) = *task {
                if t.perform(robot, &mut station, pulse.elapsed()) != TaskOutcome::InProgress {
                    *task = None;
                }
            }
        }

        if pulse.is_new_sol() {
            for (_, location) in &settlements {
                environment.improve_mineral_estimates(location);
            }
        }

        if i % SAMPLE_EVERY == 0 {
            for (name, location) in &settlements {
                let sample = environment.weather_sample(location);
                let optical_depth = environment.optical_depth(location);
                let irradiance = environment.solar_irradiance(location);
                writer.write_record(&[
                    clock.mars_time().to_string(),
                    clock.mission_sol().to_string(),
                    format!("{:.3}", environment.orbit().areocentric_longitude()),
                    format!("{:.4}", environment.orbit().distance()),
                    name.clone(),
                    format!("{:.2}", sample.temperature),
                    format!("{:.4}", sample.pressure),
                    format!("{:.5}", sample.air_density),
                    format!("{:.2}", sample.wind_speed),
                    format!("{:.1}", sample.wind_direction),
                    format!("{:.3}", optical_depth),
                    format!("{:.1}", irradiance),
                    environment.weather().dust_storms().len().to_string(),
                    format!("{:.1}", robots[0].battery().percent()),
                    format!("{:.1}", robots[1].battery().percent()),
                ])?;
            }
        }
    }

    writer.flush()?;

    for site in environment.surface().explored_locations() {
        info!(
            "{} survey at {} refined {} times",
            site.settlement(),
            site.location(),
            site.num_estimation_improvement()
        );
    }
    info!(
        "Simulated {} sols, ending at {}",
        SIMULATED_SOLS,
        clock.mars_time()
    );
    info!("Results written to output/environment_data.csv");
    environment.destroy();
    Ok(())
}
