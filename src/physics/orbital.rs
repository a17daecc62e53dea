use crate::constants::{J2000_JD, PI, TAU};

pub struct OrbitalMechanics;

#[allow(non_snake_case)]
impl OrbitalMechanics {
    // Anomaly conversion functions
    pub fn true_to_eccentric_anomaly(nu: f64, e: f64) -> f64 {
        if e < 1e-11 {
            return nu.rem_euclid(TAU);
        }

        let cos_nu = nu.cos();
        let mut E = ((1.0 - e * e).sqrt() * nu.sin()).atan2(e + cos_nu);

        if E < 0.0 {
            E += 2.0 * PI;
        }
        E
    }

    pub fn eccentric_to_mean_anomaly(E: f64, e: f64) -> f64 {
        let mut M = E - e * E.sin();
        if M < 0.0 {
            M += 2.0 * PI;
        }
        M
    }

    pub fn mean_to_eccentric_anomaly(M: f64, e: f64, tolerance: f64, max_iterations: i32) -> f64 {
        let M = M.rem_euclid(TAU);
        if e < 1e-11 {
            return M;
        }

        // Initial guess
        let mut E = if M < PI { M + e / 2.0 } else { M - e / 2.0 };

        // Newton-Raphson iteration
        for _ in 0..max_iterations {
            let delta = (E - e * E.sin() - M) / (1.0 - e * E.cos());
            E -= delta;
            if delta.abs() <= tolerance {
                break;
            }
        }

        E.rem_euclid(TAU)
    }

    pub fn eccentric_to_true_anomaly(E: f64, e: f64) -> f64 {
        let half = ((1.0 + e) / (1.0 - e)).sqrt() * (E / 2.0).tan();
        (2.0 * half.atan()).rem_euclid(TAU)
    }

    /// Heliocentric distance for a true anomaly, in units of `a`.
    pub fn radius(a: f64, e: f64, nu: f64) -> f64 {
        a * (1.0 - e * e) / (1.0 + e * nu.cos())
    }

    /// Mean anomaly of Mars (deg) for a Julian date (TT), Allison & McEwen 2000.
    pub fn mars_mean_anomaly(jd_tt: f64) -> f64 {
        let dt = jd_tt - J2000_JD;
        (19.3871 + 0.524_020_73 * dt).rem_euclid(360.0)
    }

    /// Areocentric solar longitude (deg) for a Julian date (TT), Allison & McEwen 2000.
    pub fn mars_areocentric_longitude(jd_tt: f64) -> f64 {
        let dt = jd_tt - J2000_JD;
        let m = Self::mars_mean_anomaly(jd_tt).to_radians();
        let alpha_fms = 270.3871 + 0.524_038_496 * dt;
        let equation_of_center = (10.691 + 3.0e-7 * dt) * m.sin()
            + 0.623 * (2.0 * m).sin()
            + 0.050 * (3.0 * m).sin()
            + 0.005 * (4.0 * m).sin()
            + 0.0005 * (5.0 * m).sin();
        (alpha_fms + equation_of_center).rem_euclid(360.0)
    }
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use test_case::test_case;

    #[test_case(0.0, 0.0934, 0.0; "perihelion")]
    #[test_case(PI, 0.0934, PI; "aphelion")]
    #[test_case(1.0, 0.0, 1.0; "circular orbit")]
    fn true_to_eccentric_anomaly(nu: f64, e: f64, expected: f64) {
        let result = OrbitalMechanics::true_to_eccentric_anomaly(nu, e);
        assert_abs_diff_eq!(result, expected, epsilon = 1e-9);
    }

    #[test_case(1.2, 0.0934; "low eccentricity")]
    #[test_case(4.0, 0.0934; "second half of orbit")]
    #[test_case(2.5, 0.6; "high eccentricity")]
    fn kepler_solution_inverts_mean_anomaly(E: f64, e: f64) {
        let M = OrbitalMechanics::eccentric_to_mean_anomaly(E, e);
        let solved = OrbitalMechanics::mean_to_eccentric_anomaly(M, e, 1e-13, 50);
        assert_abs_diff_eq!(solved, E, epsilon = 1e-9);
    }

    #[test_case(0.7, 0.0934; "early")]
    #[test_case(5.1, 0.0934; "late")]
    fn eccentric_and_true_anomaly_agree(nu: f64, e: f64) {
        let E = OrbitalMechanics::true_to_eccentric_anomaly(nu, e);
        let back = OrbitalMechanics::eccentric_to_true_anomaly(E, e);
        assert_abs_diff_eq!(back, nu, epsilon = 1e-9);
    }

    #[test]
    fn radius_extremes() {
        let a = 1.5236915;
        assert_abs_diff_eq!(OrbitalMechanics::radius(a, 0.0934, 0.0), a * (1.0 - 0.0934), epsilon = 1e-9);
        assert_abs_diff_eq!(OrbitalMechanics::radius(a, 0.0934, PI), a * (1.0 + 0.0934), epsilon = 1e-9);
    }

    #[test]
    fn areocentric_longitude_worked_example() {
        // Allison & McEwen worked example: 2000 Jan 6.0 TT, L_s = 277.187 deg
        let ls = OrbitalMechanics::mars_areocentric_longitude(J2000_JD + 4.5);
        assert_abs_diff_eq!(ls, 277.187, epsilon = 0.01);
    }
}
