//! Heliocentric transfer geometry in the coplanar, circular-orbit limit.
//!
//! Distances are in AU and times in years, with the Sun's GM normalised so
//! that a 1 AU circular orbit has a period of one year.

use std::f64::consts::{PI, TAU};

use rocket_core::constants::DAYS_PER_YEAR;
use rocket_core::time::years_to_days;
use rocket_core::vector::{self, Point2};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TrajectoryError {
    #[error("orbital radius must be positive and finite (got {0})")]
    InvalidRadius(f64),
    #[error("departure and target orbits coincide at {0} AU")]
    CoincidentOrbits(f64),
    #[error("trajectory needs at least 2 samples (got {0})")]
    TooFewSteps(usize),
    #[error("orbital period must be positive and finite (got {0} days)")]
    InvalidPeriod(f64),
    #[error("bodies share the same period; they never drift out of alignment")]
    NoRelativeMotion,
}

/// Half-ellipse tangent to both circular orbits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransferOrbit {
    pub r_departure_au: f64,
    pub r_target_au: f64,
    pub semi_major_axis_au: f64,
    pub eccentricity: f64,
    pub transfer_time_years: f64,
}

impl TransferOrbit {
    /// Build the transfer ellipse between two distinct circular orbits.
    pub fn between(r_departure_au: f64, r_target_au: f64) -> Result<Self, TrajectoryError> {
        for r in [r_departure_au, r_target_au] {
            if !(r.is_finite() && r > 0.0) {
                return Err(TrajectoryError::InvalidRadius(r));
            }
        }
        if r_departure_au == r_target_au {
            return Err(TrajectoryError::CoincidentOrbits(r_departure_au));
        }

        let semi_major_axis_au = 0.5 * (r_departure_au + r_target_au);
        let eccentricity = (r_target_au - r_departure_au).abs() / (r_departure_au + r_target_au);
        // Kepler III with GM = 4π², halved for the half-orbit.
        let transfer_time_years = semi_major_axis_au.powf(1.5) / 2.0;

        Ok(Self {
            r_departure_au,
            r_target_au,
            semi_major_axis_au,
            eccentricity,
            transfer_time_years,
        })
    }

    pub fn transfer_time_days(&self) -> f64 {
        years_to_days(self.transfer_time_years)
    }

    /// True when the vehicle climbs away from the Sun.
    pub fn is_outbound(&self) -> bool {
        self.r_target_au > self.r_departure_au
    }

    pub fn semi_latus_rectum(&self) -> f64 {
        self.semi_major_axis_au * (1.0 - self.eccentricity * self.eccentricity)
    }

    /// Radial distance at polar angle `theta`, measured from the departure burn.
    ///
    /// Outbound transfers depart at periapsis; inbound transfers depart at
    /// apoapsis, so the conic's cosine term flips sign.
    pub fn radius_at(&self, theta: f64) -> f64 {
        let sign = if self.is_outbound() { 1.0 } else { -1.0 };
        self.semi_latus_rectum() / (1.0 + sign * self.eccentricity * theta.cos())
    }
}

/// Sampled positions of the departure body, target body and vehicle.
#[derive(Debug, Clone, Serialize)]
pub struct Trajectory {
    pub departure: Vec<Point2>,
    pub target: Vec<Point2>,
    pub rocket: Vec<Point2>,
    pub orbit: TransferOrbit,
    pub transfer_time_days: f64,
    pub max_distance_au: f64,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.rocket.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rocket.is_empty()
    }
}

/// Angular rate of a circular orbit in radians per year.
pub fn mean_motion(radius_au: f64) -> f64 {
    TAU / radius_au.powf(1.5)
}

/// Hohmann transfer time between two circular orbits, in years.
pub fn transfer_time_years(r1_au: f64, r2_au: f64) -> Result<f64, TrajectoryError> {
    Ok(TransferOrbit::between(r1_au, r2_au)?.transfer_time_years)
}

/// Sample a Hohmann transfer at `steps` uniformly spaced times over `[0, t_transfer]`.
///
/// The target's initial phase is chosen so that it reaches the transfer
/// apoapsis (polar angle π) exactly at arrival. The vehicle's polar angle
/// sweeps linearly in time, `θ = π·t/t_transfer`, which is an approximation
/// of the true Keplerian sweep kept for consistency of every derived number.
pub fn trajectory(
    r_departure_au: f64,
    r_target_au: f64,
    steps: usize,
) -> Result<Trajectory, TrajectoryError> {
    if steps < 2 {
        return Err(TrajectoryError::TooFewSteps(steps));
    }
    let orbit = TransferOrbit::between(r_departure_au, r_target_au)?;

    let t_transfer = orbit.transfer_time_years;
    let omega_departure = mean_motion(r_departure_au);
    let omega_target = mean_motion(r_target_au);
    let theta_target0 = PI - omega_target * t_transfer;

    let mut departure = Vec::with_capacity(steps);
    let mut target = Vec::with_capacity(steps);
    let mut rocket = Vec::with_capacity(steps);
    let mut max_distance_au = 0.0_f64;

    let last = (steps - 1) as f64;
    for i in 0..steps {
        let t = t_transfer * i as f64 / last;

        departure.push(vector::polar(r_departure_au, omega_departure * t));
        target.push(vector::polar(r_target_au, theta_target0 + omega_target * t));

        let theta_rocket = PI * t / t_transfer;
        let r_rocket = orbit.radius_at(theta_rocket);
        max_distance_au = max_distance_au.max(r_rocket);
        rocket.push(vector::polar(r_rocket, theta_rocket));
    }

    log::debug!(
        "sampled {steps} points for {r_departure_au} AU -> {r_target_au} AU (e = {:.4}, {:.1} days)",
        orbit.eccentricity,
        orbit.transfer_time_days()
    );

    Ok(Trajectory {
        departure,
        target,
        rocket,
        orbit,
        transfer_time_days: orbit.transfer_time_days(),
        max_distance_au,
    })
}

/// Time between successive alignments of two bodies with the given periods, in days.
pub fn synodic_period_between(period_a_days: f64, period_b_days: f64) -> Result<f64, TrajectoryError> {
    for p in [period_a_days, period_b_days] {
        if !(p.is_finite() && p > 0.0) {
            return Err(TrajectoryError::InvalidPeriod(p));
        }
    }
    let relative = (1.0 / period_a_days - 1.0 / period_b_days).abs();
    if relative == 0.0 {
        return Err(TrajectoryError::NoRelativeMotion);
    }
    Ok(1.0 / relative)
}

/// Synodic period of a target as seen from Earth, in days.
pub fn synodic_period(target_period_days: f64) -> Result<f64, TrajectoryError> {
    synodic_period_between(DAYS_PER_YEAR, target_period_days)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn mars_transfer_takes_about_259_days() {
        let years = transfer_time_years(1.0, 1.524).unwrap();
        assert!((years - 0.709).abs() < 1e-3, "years = {years}");
        let days = years * DAYS_PER_YEAR;
        assert!((days - 259.0).abs() < 1.0, "days = {days}");
    }

    #[test]
    fn trajectory_endpoints_touch_both_orbits() {
        for r in [0.387, 0.723, 1.524, 5.204, 30.07] {
            let traj = trajectory(1.0, r, 120).unwrap();
            assert_eq!(traj.departure.len(), 120);
            assert_eq!(traj.target.len(), 120);
            assert_eq!(traj.len(), 120);
            assert!((0.0..1.0).contains(&traj.orbit.eccentricity));

            let first = vector::norm(&traj.rocket[0]);
            let last = vector::norm(&traj.rocket[119]);
            assert!((first - 1.0).abs() < EPS, "r = {r}: first = {first}");
            assert!((last - r).abs() < EPS, "r = {r}: last = {last}");
        }
    }

    #[test]
    fn vehicle_meets_target_at_arrival() {
        let traj = trajectory(1.0, 1.524, 200).unwrap();
        let rocket = traj.rocket[199];
        let target = traj.target[199];
        assert!((rocket[0] - target[0]).abs() < EPS);
        assert!((rocket[1] - target[1]).abs() < EPS);
        // Departure body starts on the +x axis.
        assert_eq!(traj.departure[0], [1.0, 0.0]);
    }

    #[test]
    fn max_distance_matches_outer_radius() {
        let outbound = trajectory(1.0, 5.204, 50).unwrap();
        assert!((outbound.max_distance_au - 5.204).abs() < EPS);
        let inbound = trajectory(1.0, 0.723, 50).unwrap();
        assert!((inbound.max_distance_au - 1.0).abs() < EPS);
    }

    #[test]
    fn rejects_degenerate_inputs() {
        assert_eq!(
            trajectory(1.0, 1.0, 100).unwrap_err(),
            TrajectoryError::CoincidentOrbits(1.0)
        );
        assert_eq!(
            trajectory(1.0, -2.0, 100).unwrap_err(),
            TrajectoryError::InvalidRadius(-2.0)
        );
        assert_eq!(
            trajectory(1.0, 1.524, 1).unwrap_err(),
            TrajectoryError::TooFewSteps(1)
        );
        assert!(matches!(
            trajectory(1.0, f64::NAN, 10),
            Err(TrajectoryError::InvalidRadius(_))
        ));
    }

    #[test]
    fn synodic_period_of_mars() {
        let days = synodic_period(687.0).unwrap();
        assert!((days - 779.9).abs() < 0.5, "days = {days}");
        // Order of the bodies does not matter.
        let venus = synodic_period(224.7).unwrap();
        assert!((venus - synodic_period_between(224.7, 365.25).unwrap()).abs() < EPS);
        assert!((venus - 583.9).abs() < 0.5, "venus = {venus}");
    }

    #[test]
    fn synodic_period_rejects_resonance() {
        assert_eq!(
            synodic_period(365.25).unwrap_err(),
            TrajectoryError::NoRelativeMotion
        );
        assert!(matches!(
            synodic_period(0.0),
            Err(TrajectoryError::InvalidPeriod(_))
        ));
    }
}
