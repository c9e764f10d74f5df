//! Core units, constants, and shared primitives for the Rocket Simulation workspace.

/// Physical constants used by the simplified heliocentric model.
///
/// The values are deliberately rounded the way the educational model states
/// them; changing them shifts every derived number and test expectation.
pub mod constants {
    /// Standard gravity used by the rocket equation (m/s²).
    pub const G0: f64 = 9.81;
    /// Kilometres per astronomical unit (rounded).
    pub const AU_KM: f64 = 149.6e6;
    /// Sun gravitational parameter (km³/s²).
    pub const MU_SUN_KM3_S2: f64 = 1.327e11;
    /// Newtonian gravitational constant (m³ kg⁻¹ s⁻²).
    pub const GRAVITATIONAL_CONSTANT: f64 = 6.674e-11;
    /// Days per Julian year.
    pub const DAYS_PER_YEAR: f64 = 365.25;
}

/// Basic unit conversion helpers.
pub mod units {
    use super::constants::AU_KM;

    /// Convert astronomical units to kilometres.
    #[inline]
    pub fn au_to_km(au: f64) -> f64 {
        au * AU_KM
    }

    /// Convert kilometres to metres.
    #[inline]
    pub fn km_to_m(v: f64) -> f64 {
        v * 1_000.0
    }

    /// Convert kilometres per second to metres per second.
    #[inline]
    pub fn kms_to_ms(v: f64) -> f64 {
        v * 1_000.0
    }

    /// Convert metres per second to kilometres per second.
    #[inline]
    pub fn ms_to_kms(v: f64) -> f64 {
        v / 1_000.0
    }
}

/// Lightweight time utilities shared across crates.
pub mod time {
    use super::constants::DAYS_PER_YEAR;

    /// Convert years to days.
    #[inline]
    pub fn years_to_days(years: f64) -> f64 {
        years * DAYS_PER_YEAR
    }

    /// Orbital period of a circular heliocentric orbit via Kepler's third law, in days.
    #[inline]
    pub fn kepler_period_days(distance_au: f64) -> f64 {
        years_to_days(distance_au.powf(1.5))
    }
}

/// Minimal planar vector helpers; the model is coplanar so positions are `[x, y]` in AU.
pub mod vector {
    /// Alias for a 2D position or velocity.
    pub type Point2 = [f64; 2];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Point2) -> f64 {
        v[0].hypot(v[1])
    }

    /// Point on a circle of radius `r` at polar angle `theta`.
    #[inline]
    pub fn polar(r: f64, theta: f64) -> Point2 {
        [r * theta.cos(), r * theta.sin()]
    }
}

/// Clamp helper that tolerates NaN by mapping it to the lower bound.
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kepler_period_of_earth_is_one_year() {
        assert!((time::kepler_period_days(1.0) - 365.25).abs() < 1e-9);
    }

    #[test]
    fn clamp_maps_nan_to_lower_bound() {
        assert_eq!(clamp(f64::NAN, 0.0, 100.0), 0.0);
        assert_eq!(clamp(140.0, 0.0, 100.0), 100.0);
    }
}
