use crate::constants::*;

/// Simple exponential atmospheric model (kPa).
pub fn hydrostatic_pressure(elevation: f64) -> f64 {
    DATUM_PRESSURE * (-elevation / SCALE_HEIGHT_KM).exp()
}

/// Seasonal CO2 condensation cycle as a multiplier on the mean pressure.
///
/// Maximum near southern summer (L_s ~ 255), minimum in southern winter.
pub fn seasonal_pressure_factor(l_s: f64) -> f64 {
    let phase = (l_s - 255.0).to_radians();
    1.0 + 0.08 * phase.cos() + 0.04 * (2.0 * phase).cos()
}

/// Ideal gas density of CO2 (kg/m^3) for `pressure` in kPa and `temperature` in deg C.
pub fn air_density(pressure: f64, temperature: f64) -> f64 {
    let kelvin = (temperature + KELVIN_OFFSET).max(1.0);
    pressure * 1000.0 / (R_CO2 * kelvin)
}
