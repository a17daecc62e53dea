use super::terrain_elevation::TerrainElevation;
use crate::config::MineralType;
use crate::coordinates::Coordinates;
use log::{debug, warn};
use rand::{Rng, RngCore};
use std::collections::BTreeMap;

// Placement attempts per deposit before accepting any locale
const PLACEMENT_ATTEMPTS: usize = 20;
const MIN_DEPOSIT_RADIUS_KM: f64 = 40.0;
const MAX_DEPOSIT_RADIUS_KM: f64 = 250.0;
const RANDOM_LOCATION_ATTEMPTS: usize = 50;

/// Ground-truth mineral concentrations over the planet, in percent.
pub trait MineralMap {
    fn mineral_concentration(&self, mineral: &str, location: &Coordinates) -> f64;

    fn all_mineral_concentrations(&self, location: &Coordinates) -> BTreeMap<String, f64>;

    fn mineral_names(&self) -> Vec<String>;

    /// A location within `range_km` of `center` with at least one mineral present.
    fn find_random_mineral_location(
        &self,
        center: &Coordinates,
        range_km: f64,
        rng: &mut dyn RngCore,
    ) -> Option<Coordinates>;
}

#[derive(Debug, Clone)]
struct Deposit {
    center: Coordinates,
    radius_km: f64,
    peak: f64,
}

impl Deposit {
    fn concentration_at(&self, location: &Coordinates) -> f64 {
        let d = self.center.distance_km(location);
        if d >= self.radius_km {
            0.0
        } else {
            self.peak * (1.0 - d / self.radius_km)
        }
    }
}

/// Mineral map built from randomly placed circular deposits.
pub struct RandomMineralMap {
    deposits: BTreeMap<String, Vec<Deposit>>,
}

impl RandomMineralMap {
    /// Seed deposits for every mineral, preferring locations whose terrain
    /// locale suits the mineral.
    pub fn generate<R: Rng + ?Sized>(
        minerals: &[MineralType],
        terrain: &TerrainElevation,
        rng: &mut R,
    ) -> Self {
        let mut deposits = BTreeMap::new();

        for mineral in minerals {
            let count = mineral.frequency.deposit_count();
            let mut placed = Vec::with_capacity(count);
            let mut misplaced = 0;

            for _ in 0..count {
                let mut center = Coordinates::random(rng);
                let mut suitable = mineral.forms_in(terrain.locale(&center));
                for _ in 1..PLACEMENT_ATTEMPTS {
                    if suitable {
                        break;
                    }
                    center = Coordinates::random(rng);
                    suitable = mineral.forms_in(terrain.locale(&center));
                }
                if !suitable {
                    misplaced += 1;
                }

                placed.push(Deposit {
                    center,
                    radius_km: rng.gen_range(MIN_DEPOSIT_RADIUS_KM..MAX_DEPOSIT_RADIUS_KM),
                    peak: rng.gen_range(5.0..60.0),
                });
            }

            if misplaced > 0 {
                warn!(
                    "{} of {} {} deposits placed outside their locales",
                    misplaced, count, mineral.name
                );
            }
            debug!("Placed {} {} deposits", placed.len(), mineral.name);
            deposits.insert(mineral.name.clone(), placed);
        }

        Self { deposits }
    }

    pub fn deposit_count(&self, mineral: &str) -> usize {
        self.deposits.get(mineral).map_or(0, Vec::len)
    }
}

impl MineralMap for RandomMineralMap {
    fn mineral_concentration(&self, mineral: &str, location: &Coordinates) -> f64 {
        self.deposits
            .get(mineral)
            .map(|deposits| {
                deposits
                    .iter()
                    .map(|d| d.concentration_at(location))
                    .sum::<f64>()
            })
            .unwrap_or(0.0)
            .clamp(0.0, 100.0)
    }

    fn all_mineral_concentrations(&self, location: &Coordinates) -> BTreeMap<String, f64> {
        self.deposits
            .keys()
            .map(|name| (name.clone(), self.mineral_concentration(name, location)))
            .collect()
    }

    fn mineral_names(&self) -> Vec<String> {
        self.deposits.keys().cloned().collect()
    }

    fn find_random_mineral_location(
        &self,
        center: &Coordinates,
        range_km: f64,
        rng: &mut dyn RngCore,
    ) -> Option<Coordinates> {
        (0..RANDOM_LOCATION_ATTEMPTS)
            .map(|_| center.random_location_within(&mut *rng, range_km))
            .find(|loc| {
                self.deposits
                    .values()
                    .flatten()
                    .any(|d| d.concentration_at(loc) > 0.0)
            })
    }
}
