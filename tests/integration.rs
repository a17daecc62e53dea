use csv::Writer;
use mars_environment::config::EnvironmentConfig;
use mars_environment::constants::*;
use mars_environment::coordinates::Coordinates;
use mars_environment::environment::{Environment, MineralMap};
use mars_environment::time::{MasterClock, Temporal};
use std::collections::HashMap;
use std::fs::{self, File};
use std::path::Path;

fn estimate_errors(environment: &Environment, location: &Coordinates) -> HashMap<String, f64> {
    let surface = environment.surface();
    let site = surface.explored_location(location).expect("surveyed site");
    site.estimated_concentrations()
        .iter()
        .map(|(name, estimate)| {
            let truth = surface.mineral_map().mineral_concentration(name, location);
            (name.clone(), (estimate - truth).abs())
        })
        .collect()
}

// Integration test driving the whole environment for several sols
#[test]
fn integration_test() -> Result<(), Box<dyn std::error::Error>> {
    let config = EnvironmentConfig::from_toml_str(
        r#"
        seed = 2043
        start_epoch = "2043-09-30T00:00:00 UTC"

        [weather]
        update_interval = 10
        storm_probability_in_season = 0.5
        storm_probability_off_season = 0.1

        [[settlements]]
        name = "Jezero Base"
        latitude = 18.4
        longitude = 77.5

        [[settlements]]
        name = "Gale Outpost"
        latitude = -5.4
        longitude = 137.8
        "#,
    )?;

    let mut environment = Environment::new(&config)?;
    let mut clock = MasterClock::from_epoch(&config.start_epoch()?);

    let sites: Vec<(String, Coordinates)> = config
        .settlements
        .iter()
        .map(|s| (s.name.clone(), s.coordinates()))
        .collect();
    for (name, location) in &sites {
        environment.add_explored_location(*location, 0, name);
    }
    let mut errors: Vec<_> = sites
        .iter()
        .map(|(_, location)| estimate_errors(&environment, location))
        .collect();

    // Create output directory if it doesn't exist
    let output_dir = Path::new("output");
    fs::create_dir_all(output_dir)?;
    let file = File::create(output_dir.join("integration_environment.csv"))?;
    let mut writer = Writer::from_writer(file);
    writer.write_record([
        "Mars Time",
        "Settlement",
        "L_s (deg)",
        "Temperature (C)",
        "Pressure (kPa)",
        "Optical Depth",
    ])?;

    let pulse_length = 5.0;
    for i in 0..(10 * 200) {
        // Readings must not move between weather updates
        let before: Vec<_> = sites
            .iter()
            .map(|(_, location)| environment.weather().cached_sample(location))
            .collect();

        let pulse = clock.next_pulse(pulse_length)?;
        assert!(environment.time_passing(&pulse));

        if !pulse.crossed_interval(config.weather.update_interval) && !pulse.is_new_sol() {
            let after: Vec<_> = sites
                .iter()
                .map(|(_, location)| environment.weather().cached_sample(location))
                .collect();
            assert_eq!(before, after, "weather changed between updates at pulse {}", i);
        }

        let l_s = environment.orbit().areocentric_longitude();
        assert!((0.0..360.0).contains(&l_s));

        for (index, (name, location)) in sites.iter().enumerate() {
            let sample = environment.weather_sample(location);
            let optical_depth = environment.optical_depth(location);
            assert!((OPTICAL_DEPTH_MIN..=OPTICAL_DEPTH_MAX).contains(&optical_depth));
            assert!((0.0..=MAX_SOLAR_IRRADIANCE).contains(&environment.solar_irradiance(location)));

            if pulse.is_new_sol() {
                assert!(environment.improve_mineral_estimates(location));
                let improved = estimate_errors(&environment, location);
                for (mineral, error) in &improved {
                    assert!(*error <= errors[index][mineral] + 1e-12);
                }
                errors[index] = improved;
            }

            if i % 20 == 0 {
                writer.write_record(&[
                    clock.mars_time().to_string(),
                    name.clone(),
                    format!("{:.3}", l_s),
                    format!("{:.2}", sample.temperature),
                    format!("{:.4}", sample.pressure),
                    format!("{:.3}", optical_depth),
                ])?;
            }
        }
    }
    writer.flush()?;

    assert_eq!(clock.mission_sol(), 11);
    for (_, location) in &sites {
        let site = environment.surface().explored_location(location).unwrap();
        assert_eq!(site.num_estimation_improvement(), 10);
    }

    environment.destroy();
    assert_eq!(environment.weather().cache_len(), 0);
    Ok(())
}
