//! Analytic estimators for impulsive transfers in the coplanar, circular limit.
//!
//! Provides the Hohmann transfer calculator returning delta-v components and
//! time of flight for two-body Keplerian motion with a specified central GM.

use rocket_core::constants::MU_SUN_KM3_S2;
use rocket_core::units::au_to_km;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum HohmannError {
    #[error("orbit radius must be positive and finite (got {0} km)")]
    InvalidRadius(f64),
    #[error("gravitational parameter must be positive and finite (got {0})")]
    InvalidMu(f64),
}

/// Result for a Hohmann transfer between circular orbits of radii r1 and r2.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HohmannResult {
    pub dv1_km_s: f64,      // signed: negative for inward (retro) burn
    pub dv2_km_s: f64,      // signed: negative for retro capture when arriving inward
    pub dv_total_km_s: f64, // |dv1| + |dv2|
    pub tof_seconds: f64,
}

/// Compute the classical Hohmann transfer between two circular coplanar orbits.
///
/// Inputs:
/// - `r1_km`: initial circular orbit radius (km)
/// - `r2_km`: target circular orbit radius (km)
/// - `mu_km3_s2`: gravitational parameter of central body (km^3/s^2)
pub fn hohmann(r1_km: f64, r2_km: f64, mu_km3_s2: f64) -> Result<HohmannResult, HohmannError> {
    for r in [r1_km, r2_km] {
        if !(r.is_finite() && r > 0.0) {
            return Err(HohmannError::InvalidRadius(r));
        }
    }
    if !(mu_km3_s2.is_finite() && mu_km3_s2 > 0.0) {
        return Err(HohmannError::InvalidMu(mu_km3_s2));
    }

    let v1 = (mu_km3_s2 / r1_km).sqrt();
    let v2 = (mu_km3_s2 / r2_km).sqrt();
    let a_t = 0.5 * (r1_km + r2_km);
    let tof = std::f64::consts::PI * (a_t.powi(3) / mu_km3_s2).sqrt();

    // Transfer periapsis speed (at r1) and apoapsis speed (at r2), vis-viva
    let v_t1 = (mu_km3_s2 * (2.0 / r1_km - 1.0 / a_t)).sqrt();
    let v_t2 = (mu_km3_s2 * (2.0 / r2_km - 1.0 / a_t)).sqrt();

    let dv1 = v_t1 - v1; // positive for outward, negative for inward
    let dv2 = v2 - v_t2; // positive for outward (prograde capture), negative for inward (retro capture)

    Ok(HohmannResult {
        dv1_km_s: dv1,
        dv2_km_s: dv2,
        dv_total_km_s: dv1.abs() + dv2.abs(),
        tof_seconds: tof,
    })
}

/// Departure and arrival burn magnitudes (km/s) for a heliocentric Hohmann
/// transfer between orbits given in AU.
pub fn delta_v_hohmann(r1_au: f64, r2_au: f64) -> Result<(f64, f64), HohmannError> {
    let h = hohmann(au_to_km(r1_au), au_to_km(r2_au), MU_SUN_KM3_S2)?;
    Ok((h.dv1_km_s.abs(), h.dv2_km_s.abs()))
}
