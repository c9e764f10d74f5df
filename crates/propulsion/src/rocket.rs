//! Tsiolkovsky rocket equation applied to Hohmann delta-v budgets.

use rocket_core::constants::G0;
use rocket_core::units::kms_to_ms;
use rocket_impulsive::{HohmannError, delta_v_hohmann};
use serde::Serialize;
use thiserror::Error;

use crate::Vehicle;

/// Largest exponent `exp` can take before overflowing an f64.
const MAX_MASS_RATIO_EXPONENT: f64 = 709.0;

#[derive(Debug, Error, PartialEq)]
pub enum FuelError {
    #[error("specific impulse must be positive and finite (got {0} s)")]
    InvalidIsp(f64),
    #[error("standard gravity must be positive and finite (got {0} m/s²)")]
    InvalidGravity(f64),
    #[error("dry mass must be positive and finite (got {0} kg)")]
    InvalidDryMass(f64),
    #[error("delta-v must be non-negative and finite (got {0} km/s)")]
    InvalidDeltaV(f64),
    #[error("mass ratio overflows for {delta_v_km_s} km/s at {isp_seconds} s isp")]
    MassRatioOverflow { delta_v_km_s: f64, isp_seconds: f64 },
    #[error("hohmann budget failed: {0}")]
    Hohmann(#[from] HohmannError),
}

/// Propellant needed to give `dry_mass_kg` a velocity change of `total_dv_km_s`.
pub fn fuel_mass(
    total_dv_km_s: f64,
    dry_mass_kg: f64,
    isp_seconds: f64,
    g0: f64,
) -> Result<f64, FuelError> {
    if !(total_dv_km_s.is_finite() && total_dv_km_s >= 0.0) {
        return Err(FuelError::InvalidDeltaV(total_dv_km_s));
    }
    if !(dry_mass_kg.is_finite() && dry_mass_kg > 0.0) {
        return Err(FuelError::InvalidDryMass(dry_mass_kg));
    }
    if !(isp_seconds.is_finite() && isp_seconds > 0.0) {
        return Err(FuelError::InvalidIsp(isp_seconds));
    }
    if !(g0.is_finite() && g0 > 0.0) {
        return Err(FuelError::InvalidGravity(g0));
    }

    let exponent = kms_to_ms(total_dv_km_s) / (isp_seconds * g0);
    if exponent > MAX_MASS_RATIO_EXPONENT {
        return Err(FuelError::MassRatioOverflow {
            delta_v_km_s: total_dv_km_s,
            isp_seconds,
        });
    }
    // exp_m1 keeps precision for small burns and is exactly 0 for dv = 0.
    Ok(dry_mass_kg * exponent.exp_m1())
}

/// Delta-v and propellant budget for one transfer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FuelBudget {
    pub departure_dv_km_s: f64,
    pub arrival_dv_km_s: f64,
    pub total_dv_km_s: f64,
    pub fuel_mass_kg: f64,
    pub total_mass_kg: f64,
    /// Propellant share of the wet mass, in `[0, 1)`.
    pub fuel_ratio: f64,
    /// Whether the propellant fits the vehicle's tank, when it has one.
    pub fits_tank: Option<bool>,
}

/// Fuel calculator bound to a vehicle.
#[derive(Debug, Clone)]
pub struct FuelModel {
    vehicle: Vehicle,
    g0: f64,
}

impl Default for FuelModel {
    fn default() -> Self {
        Self {
            vehicle: Vehicle::reference(),
            g0: G0,
        }
    }
}

impl FuelModel {
    /// Bind the model to a vehicle, rejecting masses and isp the equation cannot use.
    pub fn new(vehicle: Vehicle) -> Result<Self, FuelError> {
        if !(vehicle.dry_mass_kg.is_finite() && vehicle.dry_mass_kg > 0.0) {
            return Err(FuelError::InvalidDryMass(vehicle.dry_mass_kg));
        }
        if !(vehicle.isp_seconds.is_finite() && vehicle.isp_seconds > 0.0) {
            return Err(FuelError::InvalidIsp(vehicle.isp_seconds));
        }
        Ok(Self { vehicle, g0: G0 })
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn fuel_mass(&self, total_dv_km_s: f64) -> Result<f64, FuelError> {
        fuel_mass(
            total_dv_km_s,
            self.vehicle.dry_mass_kg,
            self.vehicle.isp_seconds,
            self.g0,
        )
    }

    /// Full budget for a Hohmann transfer between heliocentric radii in AU.
    pub fn budget(&self, r1_au: f64, r2_au: f64) -> Result<FuelBudget, FuelError> {
        let (departure_dv_km_s, arrival_dv_km_s) = delta_v_hohmann(r1_au, r2_au)?;
        let total_dv_km_s = departure_dv_km_s + arrival_dv_km_s;
        let fuel_mass_kg = self.fuel_mass(total_dv_km_s)?;
        let total_mass_kg = self.vehicle.dry_mass_kg + fuel_mass_kg;

        Ok(FuelBudget {
            departure_dv_km_s,
            arrival_dv_km_s,
            total_dv_km_s,
            fuel_mass_kg,
            total_mass_kg,
            fuel_ratio: fuel_mass_kg / total_mass_kg,
            fits_tank: self
                .vehicle
                .propellant_capacity_kg
                .map(|capacity| fuel_mass_kg <= capacity),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_delta_v_needs_no_fuel() {
        assert_eq!(fuel_mass(0.0, 1000.0, 450.0, G0).unwrap(), 0.0);
    }

    #[test]
    fn fuel_grows_with_delta_v() {
        let mut previous = 0.0;
        for step in 1..=40 {
            let dv = step as f64 * 0.5;
            let fuel = fuel_mass(dv, 1000.0, 450.0, G0).unwrap();
            assert!(fuel > previous, "dv = {dv}");
            previous = fuel;
        }
    }

    #[test]
    fn rejects_degenerate_engine_parameters() {
        assert_eq!(
            fuel_mass(3.0, 1000.0, 0.0, G0).unwrap_err(),
            FuelError::InvalidIsp(0.0)
        );
        assert_eq!(
            fuel_mass(-1.0, 1000.0, 450.0, G0).unwrap_err(),
            FuelError::InvalidDeltaV(-1.0)
        );
        assert!(matches!(
            fuel_mass(5_000.0, 1000.0, 450.0, G0),
            Err(FuelError::MassRatioOverflow { .. })
        ));
        assert!(FuelModel::new(Vehicle {
            isp_seconds: -5.0,
            ..Vehicle::reference()
        })
        .is_err());
    }

    #[test]
    fn mars_budget_with_reference_vehicle() {
        let budget = FuelModel::default().budget(1.0, 1.524).unwrap();
        assert!((budget.total_dv_km_s - 5.596).abs() < 0.01);
        assert!((budget.fuel_mass_kg - 2552.0).abs() < 5.0, "{budget:?}");
        assert_eq!(budget.total_mass_kg, 1000.0 + budget.fuel_mass_kg);
        assert!((0.0..1.0).contains(&budget.fuel_ratio));
        assert_eq!(budget.fits_tank, None);
    }

    #[test]
    fn tank_capacity_is_checked() {
        let vehicle = Vehicle {
            name: "small tank".to_string(),
            dry_mass_kg: 1000.0,
            isp_seconds: 450.0,
            propellant_capacity_kg: Some(1000.0),
        };
        let budget = FuelModel::new(vehicle).unwrap().budget(1.0, 1.524).unwrap();
        assert_eq!(budget.fits_tank, Some(false));
    }
}
