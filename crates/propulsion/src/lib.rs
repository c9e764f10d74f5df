//! Propulsion models: rocket-equation fuel budgets and spacecraft assembly.

pub mod designer;
pub mod rocket;

pub use designer::{DesignError, DesignRequest, SpacecraftDesign, SpacecraftDesigner};
pub use rocket::{FuelBudget, FuelError, FuelModel, fuel_mass};

use serde::Serialize;

/// Reference spacecraft used when no design is supplied.
pub const REFERENCE_DRY_MASS_KG: f64 = 1_000.0;
pub const REFERENCE_ISP_SECONDS: f64 = 450.0;

/// Basic vehicle definition consumed by the fuel model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vehicle {
    pub name: String,
    pub dry_mass_kg: f64,
    pub isp_seconds: f64,
    /// Usable tank capacity, when the vehicle was assembled from parts.
    pub propellant_capacity_kg: Option<f64>,
}

impl Vehicle {
    /// The chemical-stage reference craft (1000 kg dry, 450 s isp).
    pub fn reference() -> Self {
        Self {
            name: "reference".to_string(),
            dry_mass_kg: REFERENCE_DRY_MASS_KG,
            isp_seconds: REFERENCE_ISP_SECONDS,
            propellant_capacity_kg: None,
        }
    }
}
