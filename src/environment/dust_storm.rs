use crate::constants::*;
use crate::coordinates::{Coordinates, Direction};
use crate::fsm::{DustStormFSM, DustStormType};
use log::info;
use rand::Rng;

// Storms below this size (km) have blown out
const DISSIPATION_SIZE_KM: f64 = 0.5;
const MAX_DRIFT_KM_PER_SOL: f64 = 200.0;
const SIZE_JITTER_KM: f64 = 1.0;

/// A dust storm anchored to the settlement it formed near.
pub struct DustStorm {
    id: u32,
    name: String,
    fsm: DustStormFSM,
    size_km: f64,
    center: Coordinates,
    speed: f64,
    settlement: String,
    age_sols: u32,
}

impl DustStorm {
    /// Every storm starts life as a dust devil a few km across.
    pub fn new<R: Rng + ?Sized>(
        id: u32,
        settlement: &str,
        center: Coordinates,
        sol: u64,
        rng: &mut R,
    ) -> Self {
        let (min_speed, max_speed) = DustStormType::DustDevil.wind_speed_range();
        let storm = Self {
            id,
            name: format!("{} storm #{}", settlement, id),
            fsm: DustStormFSM::new(sol),
            size_km: rng.gen_range(1.0..5.0),
            center,
            speed: rng.gen_range(min_speed..max_speed),
            settlement: settlement.to_string(),
            age_sols: 0,
        };
        info!("{} formed at {} on sol {}", storm.name, storm.center, sol);
        storm
    }

    /// A planet-encircling storm centred on `center`.
    #[cfg(test)]
    pub(crate) fn planet_encircling<R: Rng + ?Sized>(
        id: u32,
        settlement: &str,
        center: Coordinates,
        rng: &mut R,
    ) -> Self {
        let mut storm = Self::new(id, settlement, center, 0, rng);
        storm.size_km = MARS_CIRCUMFERENCE_KM;
        for sol in 1..=3 {
            storm.fsm.evaluate_transition(storm.size_km, sol);
        }
        storm
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn storm_type(&self) -> DustStormType {
        self.fsm.get_current_state()
    }

    /// Diameter (km).
    pub fn size_km(&self) -> f64 {
        self.size_km
    }

    pub fn radius_km(&self) -> f64 {
        self.size_km / 2.0
    }

    pub fn center(&self) -> Coordinates {
        self.center
    }

    /// Sustained wind speed (m/s).
    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn settlement(&self) -> &str {
        &self.settlement
    }

    pub fn age_sols(&self) -> u32 {
        self.age_sols
    }

    pub fn covers(&self, location: &Coordinates) -> bool {
        self.center.distance_km(location) <= self.radius_km()
    }

    /// 1 at the center, falling linearly to 0 at the edge.
    pub fn intensity_at(&self, location: &Coordinates) -> f64 {
        let radius = self.radius_km();
        if radius <= 0.0 {
            return 0.0;
        }
        (1.0 - self.center.distance_km(location) / radius).max(0.0)
    }

    pub fn optical_depth_contribution(&self, location: &Coordinates) -> f64 {
        self.storm_type().peak_optical_depth() * self.intensity_at(location)
    }

    pub fn wind_gust_at(&self, location: &Coordinates) -> f64 {
        self.speed * self.intensity_at(location)
    }

    /// Advance the storm by one sol. Returns false once it has dissipated.
    pub fn evolve<R: Rng + ?Sized>(&mut self, in_season: bool, sol: u64, rng: &mut R) -> bool {
        let growth = if in_season {
            rng.gen_range(-0.35..0.55)
        } else {
            rng.gen_range(-0.6..0.25)
        };
        self.size_km += self.size_km * growth + rng.gen_range(-SIZE_JITTER_KM..SIZE_JITTER_KM);
        self.size_km = self.size_km.min(MARS_CIRCUMFERENCE_KM);
        self.age_sols += 1;

        if self.size_km < DISSIPATION_SIZE_KM {
            info!("{} dissipated after {} sols", self.name, self.age_sols);
            return false;
        }

        let heading = Direction::new(rng.gen_range(0.0..TAU));
        self.center = self
            .center
            .new_location(heading, rng.gen_range(0.0..MAX_DRIFT_KM_PER_SOL));

        let storm_type = self.fsm.evaluate_transition(self.size_km, sol);
        let (min_speed, max_speed) = storm_type.wind_speed_range();
        self.speed = rng.gen_range(min_speed..max_speed);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn storm(rng: &mut ChaCha8Rng) -> DustStorm {
        DustStorm::new(1, "Jezero Base", Coordinates::from_lat_lon_degrees(18.4, 77.5), 10, rng)
    }

    #[test]
    fn forms_as_a_small_dust_devil() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let storm = storm(&mut rng);
        assert_eq!(storm.storm_type(), DustStormType::DustDevil);
        assert!((1.0..5.0).contains(&storm.size_km()));
        assert!((10.0..30.0).contains(&storm.speed()));
        assert_eq!(storm.settlement(), "Jezero Base");
    }

    #[test]
    fn influence_fades_towards_the_edge() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut storm = storm(&mut rng);
        storm.size_km = 400.0;
        let center = storm.center();
        let halfway = center.new_location(Direction::from_degrees(90.0), 100.0);
        let outside = center.new_location(Direction::from_degrees(90.0), 300.0);

        assert_abs_diff_eq!(storm.intensity_at(&center), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(storm.intensity_at(&halfway), 0.5, epsilon = 1e-6);
        assert!(storm.covers(&halfway));
        assert!(!storm.covers(&outside));
        assert_eq!(storm.optical_depth_contribution(&outside), 0.0);
        assert_eq!(storm.wind_gust_at(&outside), 0.0);
    }

    #[test]
    fn off_season_storms_die_out() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut storm = storm(&mut rng);
        let survived = (11..1000).take_while(|sol| storm.evolve(false, *sol, &mut rng)).count();
        assert!(survived < 989);
    }

    #[test]
    fn size_is_capped_at_planet_scale() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut storm = storm(&mut rng);
        storm.size_km = MARS_CIRCUMFERENCE_KM;
        for sol in 11..40 {
            if !storm.evolve(true, sol, &mut rng) {
                break;
            }
            assert!(storm.size_km() <= MARS_CIRCUMFERENCE_KM);
        }
        assert!(storm.age_sols() > 0);
    }

    #[test]
    fn large_storm_climbs_one_category_per_sol() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut storm = storm(&mut rng);
        storm.size_km = 15_000.0;
        assert!(storm.evolve(true, 11, &mut rng));
        assert_eq!(storm.storm_type(), DustStormType::Local);
    }

    #[test]
    fn planet_encircling_storm_blankets_the_planet() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let center = Coordinates::from_lat_lon_degrees(18.4, 77.5);
        let storm = DustStorm::planet_encircling(1, "Jezero Base", center, &mut rng);
        assert_eq!(storm.storm_type(), DustStormType::PlanetEncircling);
        assert_abs_diff_eq!(storm.optical_depth_contribution(&center), 4.0, epsilon = 1e-9);
        assert!(storm.covers(&Coordinates::from_lat_lon_degrees(-18.0, 250.0)));
    }
}
