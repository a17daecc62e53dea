use super::config_errors::ConfigError;
use csv::{ReaderBuilder, Trim};
use lazy_static::lazy_static;
use log::info;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// How widespread a mineral is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Common,
    Uncommon,
    Rare,
    VeryRare,
}

impl Frequency {
    /// Number of deposits seeded on the planet.
    pub fn deposit_count(&self) -> usize {
        match self {
            Frequency::Common => 120,
            Frequency::Uncommon => 60,
            Frequency::Rare => 25,
            Frequency::VeryRare => 8,
        }
    }
}

fn normalize_key(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .collect::<String>()
        .to_ascii_lowercase()
}

impl FromStr for Frequency {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "common" => Ok(Frequency::Common),
            "uncommon" => Ok(Frequency::Uncommon),
            "rare" => Ok(Frequency::Rare),
            "veryrare" => Ok(Frequency::VeryRare),
            _ => Err(ConfigError::UnknownFrequency(s.to_string())),
        }
    }
}

/// Geological setting a mineral forms in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    Crater,
    Sedimentary,
    Volcanic,
}

impl FromStr for Locale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "crater" => Ok(Locale::Crater),
            "sedimentary" => Ok(Locale::Sedimentary),
            "volcanic" => Ok(Locale::Volcanic),
            _ => Err(ConfigError::UnknownLocale(s.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Crater => write!(f, "crater"),
            Locale::Sedimentary => write!(f, "sedimentary"),
            Locale::Volcanic => write!(f, "volcanic"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MineralType {
    pub name: String,
    pub frequency: Frequency,
    pub locales: Vec<Locale>,
}

impl MineralType {
    pub fn new(name: &str, frequency: Frequency, locales: &[Locale]) -> Self {
        Self {
            name: name.to_string(),
            frequency,
            locales: locales.to_vec(),
        }
    }

    pub fn forms_in(&self, locale: Locale) -> bool {
        self.locales.contains(&locale)
    }
}

lazy_static! {
    pub static ref DEFAULT_MINERAL_TYPES: Vec<MineralType> = {
        use Frequency::*;
        use Locale::*;
        vec![
            MineralType::new("Chalcopyrite", Uncommon, &[Volcanic]),
            MineralType::new("Goethite", Common, &[Sedimentary, Volcanic]),
            MineralType::new("Gypsum", Uncommon, &[Sedimentary]),
            MineralType::new("Hematite", Common, &[Sedimentary, Volcanic]),
            MineralType::new("Kamacite", Rare, &[Crater]),
            MineralType::new("Magnesite", Uncommon, &[Volcanic, Sedimentary]),
            MineralType::new("Magnetite", Common, &[Volcanic, Crater]),
            MineralType::new("Malachite", Uncommon, &[Sedimentary]),
            MineralType::new("Olivine", Common, &[Volcanic]),
            MineralType::new("Sylvite", Rare, &[Sedimentary]),
            MineralType::new("Taenite", VeryRare, &[Crater]),
        ]
    };
}

#[derive(Debug, Deserialize)]
struct MineralRecord {
    name: String,
    frequency: String,
    locales: String,
}

/// Parse a `name,frequency,locales` table; locales are separated by `;`.
pub fn load_mineral_types<R: Read>(reader: R) -> Result<Vec<MineralType>, ConfigError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut seen = HashSet::new();
    let mut minerals = Vec::new();

    for result in rdr.deserialize::<MineralRecord>() {
        let record = result?;
        if !seen.insert(record.name.to_ascii_lowercase()) {
            return Err(ConfigError::DuplicateMineral(record.name));
        }

        let locales = record
            .locales
            .split(';')
            .filter(|s| !s.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Locale>, _>>()?;
        if locales.is_empty() {
            return Err(ConfigError::invalid("locales", format!("{} has no locale", record.name)));
        }

        minerals.push(MineralType {
            name: record.name,
            frequency: record.frequency.parse()?,
            locales,
        });
    }

    if minerals.is_empty() {
        return Err(ConfigError::EmptyMineralTable);
    }

    Ok(minerals)
}

pub fn load_mineral_types_from_path(path: &Path) -> Result<Vec<MineralType>, ConfigError> {
    let minerals = load_mineral_types(File::open(path)?)?;
    info!("Loaded {} mineral types from {:?}", minerals.len(), path);
    Ok(minerals)
}
