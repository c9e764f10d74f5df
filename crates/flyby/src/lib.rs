//! Gravity-assist estimates using a single patched-conic hyperbola per encounter.
//!
//! Approach speeds are placeholders (`15 + 5·leg` km/s) rather than values
//! derived from the interplanetary geometry, so route totals are a teaching
//! aid for comparing sequences, not a mission design.

use rocket_config::{PlanetConfig, RouteTable};
use rocket_core::constants::GRAVITATIONAL_CONSTANT;
use rocket_core::units::{km_to_m, kms_to_ms, ms_to_kms};
use serde::Serialize;
use thiserror::Error;

/// Periapsis altitude used for every encounter (km).
pub const DEFAULT_FLYBY_ALTITUDE_KM: f64 = 1_000.0;

#[derive(Debug, Error, PartialEq)]
pub enum FlybyError {
    #[error("planet mass must be positive and finite (got {0} kg)")]
    InvalidMass(f64),
    #[error("planet radius must be positive and finite (got {0} km)")]
    InvalidRadius(f64),
    #[error("flyby altitude must be non-negative and finite (got {0} km)")]
    InvalidAltitude(f64),
    #[error("approach velocity must be non-negative and finite (got {0} km/s)")]
    InvalidVelocity(f64),
    #[error("deflection undefined: arcsin argument {0} outside [-1, 1]")]
    DeflectionDomain(f64),
    #[error("body `{0}` is not in the catalog")]
    UnknownBody(String),
    #[error("route needs a launch body and at least one encounter")]
    RouteTooShort,
}

/// Magnitude of the velocity change (km/s) a hyperbolic flyby imparts.
///
/// Uses the turn angle `δ = 2·asin(1 / (1 + r_p·v∞²/μ))` and returns
/// `2·v∞·sin(δ/2)`.
pub fn flyby_velocity_change(
    planet_mass_kg: f64,
    planet_radius_km: f64,
    approach_velocity_km_s: f64,
    flyby_altitude_km: f64,
) -> Result<f64, FlybyError> {
    if !(planet_mass_kg.is_finite() && planet_mass_kg > 0.0) {
        return Err(FlybyError::InvalidMass(planet_mass_kg));
    }
    if !(planet_radius_km.is_finite() && planet_radius_km > 0.0) {
        return Err(FlybyError::InvalidRadius(planet_radius_km));
    }
    if !(flyby_altitude_km.is_finite() && flyby_altitude_km >= 0.0) {
        return Err(FlybyError::InvalidAltitude(flyby_altitude_km));
    }
    if !(approach_velocity_km_s.is_finite() && approach_velocity_km_s >= 0.0) {
        return Err(FlybyError::InvalidVelocity(approach_velocity_km_s));
    }

    let mu = GRAVITATIONAL_CONSTANT * planet_mass_kg;
    let r_p = km_to_m(planet_radius_km + flyby_altitude_km);
    let v_inf = kms_to_ms(approach_velocity_km_s);

    let arg = 1.0 / (1.0 + r_p * v_inf * v_inf / mu);
    if !(-1.0..=1.0).contains(&arg) {
        return Err(FlybyError::DeflectionDomain(arg));
    }
    let delta = 2.0 * arg.asin();
    Ok(ms_to_kms(2.0 * v_inf * (delta / 2.0).sin()))
}

/// Surface escape speed of a body (km/s).
pub fn escape_velocity(planet_mass_kg: f64, planet_radius_km: f64) -> f64 {
    ms_to_kms((2.0 * GRAVITATIONAL_CONSTANT * planet_mass_kg / km_to_m(planet_radius_km)).sqrt())
}

/// Placeholder hyperbolic approach speed for the `leg`-th encounter (km/s).
pub fn approach_velocity(leg: usize) -> f64 {
    15.0 + 5.0 * leg as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LegAction {
    Launch,
    Flyby,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteLeg {
    pub planet: String,
    pub action: LegAction,
    /// Launch delta-v for the first leg, velocity gained for flybys (km/s).
    pub delta_v_km_s: f64,
    /// Running propulsive total after this leg; may dip below zero mid-route.
    pub cumulative_dv_km_s: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteEvaluation {
    pub route: Vec<String>,
    pub total_dv_km_s: f64,
    pub legs: Vec<RouteLeg>,
    pub efficiency: f64,
}

/// Scores flyby sequences against an injected body catalog and route table.
#[derive(Debug, Clone)]
pub struct GravityAssistModel {
    bodies: Vec<PlanetConfig>,
    routes: RouteTable,
    flyby_altitude_km: f64,
}

impl GravityAssistModel {
    pub fn new(bodies: Vec<PlanetConfig>, routes: RouteTable) -> Self {
        Self {
            bodies,
            routes,
            flyby_altitude_km: DEFAULT_FLYBY_ALTITUDE_KM,
        }
    }

    pub fn with_flyby_altitude(mut self, altitude_km: f64) -> Self {
        self.flyby_altitude_km = altitude_km;
        self
    }

    fn body(&self, name: &str) -> Result<&PlanetConfig, FlybyError> {
        self.bodies
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| FlybyError::UnknownBody(name.to_string()))
    }

    /// Net propulsive delta-v for a launch followed by a chain of flybys.
    ///
    /// The first body contributes its surface escape speed; every later
    /// encounter subtracts the velocity it gives for free. The total is
    /// floored at zero.
    ///
    /// The launch charge is the body's own `sqrt(2GM/R)`, about 11.18 km/s
    /// for Earth. Evaluating that formula with the Sun's mass at 1 AU in
    /// metres gives roughly 0.0003 km/s, so route totals here are larger
    /// than figures computed that way.
    pub fn route_delta_v<S: AsRef<str>>(&self, route: &[S]) -> Result<RouteEvaluation, FlybyError> {
        let (launch, encounters) = match route {
            [launch, rest @ ..] if !rest.is_empty() => (launch.as_ref(), rest),
            _ => return Err(FlybyError::RouteTooShort),
        };

        let launch_body = self.body(launch)?;
        let launch_dv = escape_velocity(launch_body.mass_kg, launch_body.radius_km);
        let mut running = launch_dv;
        let mut legs = Vec::with_capacity(route.len());
        legs.push(RouteLeg {
            planet: launch_body.name.clone(),
            action: LegAction::Launch,
            delta_v_km_s: launch_dv,
            cumulative_dv_km_s: running,
        });

        for (i, name) in encounters.iter().enumerate() {
            let body = self.body(name.as_ref())?;
            let gain = flyby_velocity_change(
                body.mass_kg,
                body.radius_km,
                approach_velocity(i + 1),
                self.flyby_altitude_km,
            )?;
            running -= gain;
            legs.push(RouteLeg {
                planet: body.name.clone(),
                action: LegAction::Flyby,
                delta_v_km_s: gain,
                cumulative_dv_km_s: running,
            });
        }

        let total_dv_km_s = running.max(0.0);
        Ok(RouteEvaluation {
            route: legs.iter().map(|leg| leg.planet.clone()).collect(),
            total_dv_km_s,
            legs,
            efficiency: rocket_core::clamp(100.0 - 3.0 * total_dv_km_s, 0.0, 100.0),
        })
    }

    /// Evaluate every curated route to `destination`, cheapest first.
    ///
    /// Destinations without curated routes yield an empty list.
    pub fn suggest_routes(&self, destination: &str) -> Result<Vec<RouteEvaluation>, FlybyError> {
        let key = destination.to_ascii_lowercase();
        let Some(candidates) = self.routes.get(&key) else {
            return Ok(Vec::new());
        };

        let mut evaluated = candidates
            .iter()
            .map(|route| self.route_delta_v(route))
            .collect::<Result<Vec<_>, _>>()?;
        evaluated.sort_by(|a, b| a.total_dv_km_s.total_cmp(&b.total_dv_km_s));

        log::debug!(
            "ranked {} flyby routes to {destination}",
            evaluated.len()
        );
        Ok(evaluated)
    }
}
