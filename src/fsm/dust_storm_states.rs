use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DustStormType {
    DustDevil,
    Local,
    Regional,
    PlanetEncircling,
}

impl DustStormType {
    /// Size (km) at which a storm of this type grows into the next type.
    pub fn growth_threshold(&self) -> Option<f64> {
        match self {
            DustStormType::DustDevil => Some(10.0),
            DustStormType::Local => Some(2_000.0),
            DustStormType::Regional => Some(10_000.0),
            DustStormType::PlanetEncircling => None,
        }
    }

    pub fn next(&self) -> Option<DustStormType> {
        match self {
            DustStormType::DustDevil => Some(DustStormType::Local),
            DustStormType::Local => Some(DustStormType::Regional),
            DustStormType::Regional => Some(DustStormType::PlanetEncircling),
            DustStormType::PlanetEncircling => None,
        }
    }

    pub fn previous(&self) -> Option<DustStormType> {
        match self {
            DustStormType::DustDevil => None,
            DustStormType::Local => Some(DustStormType::DustDevil),
            DustStormType::Regional => Some(DustStormType::Local),
            DustStormType::PlanetEncircling => Some(DustStormType::Regional),
        }
    }

    /// Optical depth added at the storm center.
    pub fn peak_optical_depth(&self) -> f64 {
        match self {
            DustStormType::DustDevil => 0.1,
            DustStormType::Local => 0.6,
            DustStormType::Regional => 1.8,
            DustStormType::PlanetEncircling => 4.0,
        }
    }

    /// Range of sustained wind speed (m/s).
    pub fn wind_speed_range(&self) -> (f64, f64) {
        match self {
            DustStormType::DustDevil => (10.0, 30.0),
            DustStormType::Local => (5.0, 15.0),
            DustStormType::Regional => (10.0, 25.0),
            DustStormType::PlanetEncircling => (15.0, 30.0),
        }
    }
}

impl fmt::Display for DustStormType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DustStormType::DustDevil => write!(f, "Dust Devil"),
            DustStormType::Local => write!(f, "Local Storm"),
            DustStormType::Regional => write!(f, "Regional Storm"),
            DustStormType::PlanetEncircling => write!(f, "Planet-Encircling Storm"),
        }
    }
}
