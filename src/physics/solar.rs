use crate::constants::*;

// Share of the scattered beam that still reaches the ground as diffuse light:
// dust single-scattering albedo (~0.9) times the forward hemisphere.
const DIFFUSE_TRANSMISSION: f64 = 0.45;
// Floor on cos(z) so the slant path stays finite near the horizon
const MIN_COS_ZENITH: f64 = 0.03;

/// Irradiance above the atmosphere at `distance` AU from the Sun (W/m^2).
pub fn top_of_atmosphere_irradiance(distance: f64) -> f64 {
    SOLAR_CONSTANT / (distance * distance)
}

/// Beam irradiance on a horizontal surface after extinction along the slant path.
pub fn direct_irradiance(top_of_atmosphere: f64, cos_zenith: f64, optical_depth: f64) -> f64 {
    if cos_zenith <= 0.0 {
        return 0.0;
    }
    let slant = cos_zenith.max(MIN_COS_ZENITH);
    top_of_atmosphere * cos_zenith * (-optical_depth / slant).exp()
}

/// Forward-scattered part of the extinguished beam.
pub fn diffuse_irradiance(top_of_atmosphere: f64, cos_zenith: f64, optical_depth: f64) -> f64 {
    if cos_zenith <= 0.0 {
        return 0.0;
    }
    let slant = cos_zenith.max(MIN_COS_ZENITH);
    top_of_atmosphere * cos_zenith * (1.0 - (-optical_depth / slant).exp()) * DIFFUSE_TRANSMISSION
}

/// Global horizontal irradiance, clamped to `[0, MAX_SOLAR_IRRADIANCE]`.
pub fn surface_irradiance(top_of_atmosphere: f64, cos_zenith: f64, optical_depth: f64) -> f64 {
    let total = direct_irradiance(top_of_atmosphere, cos_zenith, optical_depth)
        + diffuse_irradiance(top_of_atmosphere, cos_zenith, optical_depth);
    total.clamp(0.0, MAX_SOLAR_IRRADIANCE)
}
