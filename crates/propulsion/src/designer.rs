//! Spacecraft assembly from the parts catalog.

use std::collections::BTreeMap;

use rocket_config::{DesignPreset, PartsCatalog};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Vehicle;

const BASE_STRUCTURE_MASS_KG: f64 = 100.0;
const BASE_STRUCTURE_COST: f64 = 500_000.0;

const DEFAULT_ENGINE: &str = "chemical";
const DEFAULT_FUEL_TANK: &str = "medium";
const DEFAULT_POWER: &str = "solar";
const DEFAULT_PAYLOAD: &str = "science";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DesignError {
    #[error("unknown {slot} `{name}`")]
    UnknownPart { slot: &'static str, name: String },
}

/// Requested part per slot; omitted slots take the standard choice.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct DesignRequest {
    #[serde(default)]
    pub engine: Option<String>,
    #[serde(default)]
    pub fuel_tank: Option<String>,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub payload: Option<String>,
}

impl From<&DesignPreset> for DesignRequest {
    fn from(preset: &DesignPreset) -> Self {
        Self {
            engine: Some(preset.engine.clone()),
            fuel_tank: Some(preset.fuel_tank.clone()),
            power: Some(preset.power.clone()),
            payload: Some(preset.payload.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SpacecraftDesign {
    pub config: DesignPreset,
    pub total_mass_kg: f64,
    pub total_cost: f64,
    pub capabilities: Vec<String>,
    pub fuel_capacity_kg: f64,
    pub isp_seconds: f64,
    pub performance_rating: f64,
    pub within_limits: bool,
}

impl SpacecraftDesign {
    /// Dry vehicle described by this design, ready for the fuel model.
    pub fn vehicle(&self, name: impl Into<String>) -> Vehicle {
        Vehicle {
            name: name.into(),
            dry_mass_kg: self.total_mass_kg,
            isp_seconds: self.isp_seconds,
            propellant_capacity_kg: Some(self.fuel_capacity_kg),
        }
    }
}

/// Assembles spacecraft from an injected parts catalog.
#[derive(Debug, Clone)]
pub struct SpacecraftDesigner {
    parts: PartsCatalog,
    max_mass_kg: f64,
    max_cost: f64,
}

impl SpacecraftDesigner {
    pub fn new(parts: PartsCatalog, max_mass_kg: f64, max_cost: f64) -> Self {
        Self {
            parts,
            max_mass_kg,
            max_cost,
        }
    }

    pub fn presets(&self) -> &BTreeMap<String, DesignPreset> {
        &self.parts.presets
    }

    pub fn design(&self, request: &DesignRequest) -> Result<SpacecraftDesign, DesignError> {
        let engine_name = request.engine.as_deref().unwrap_or(DEFAULT_ENGINE);
        let tank_name = request.fuel_tank.as_deref().unwrap_or(DEFAULT_FUEL_TANK);
        let power_name = request.power.as_deref().unwrap_or(DEFAULT_POWER);
        let payload_name = request.payload.as_deref().unwrap_or(DEFAULT_PAYLOAD);

        let engine = lookup(&self.parts.engines, "engine", engine_name)?;
        let tank = lookup(&self.parts.fuel_tanks, "fuel tank", tank_name)?;
        let power = lookup(&self.parts.power, "power system", power_name)?;
        let payload = lookup(&self.parts.payloads, "payload", payload_name)?;

        let total_mass_kg =
            BASE_STRUCTURE_MASS_KG + engine.mass_kg + tank.mass_kg + power.mass_kg + payload.mass_kg;
        let total_cost = BASE_STRUCTURE_COST + engine.cost + tank.cost + power.cost + payload.cost;

        let capabilities = vec![
            format!("Engine: {engine_name} (ISP: {:.0}s)", engine.isp_seconds),
            format!("Fuel: {:.0}kg capacity", tank.capacity_kg),
            format!("Power: {:.0}W", power.power_watts),
            format!("Payload: {payload_name}"),
        ];

        Ok(SpacecraftDesign {
            config: DesignPreset {
                engine: engine_name.to_string(),
                fuel_tank: tank_name.to_string(),
                power: power_name.to_string(),
                payload: payload_name.to_string(),
            },
            total_mass_kg,
            total_cost,
            capabilities,
            fuel_capacity_kg: tank.capacity_kg,
            isp_seconds: engine.isp_seconds,
            performance_rating: performance_rating(engine_name, power_name, total_mass_kg),
            within_limits: total_mass_kg <= self.max_mass_kg && total_cost <= self.max_cost,
        })
    }
}

fn lookup<'a, T>(
    table: &'a BTreeMap<String, T>,
    slot: &'static str,
    name: &str,
) -> Result<&'a T, DesignError> {
    table.get(name).ok_or_else(|| DesignError::UnknownPart {
        slot,
        name: name.to_string(),
    })
}

fn performance_rating(engine: &str, power: &str, total_mass_kg: f64) -> f64 {
    let mut score = 50.0;

    score += match engine {
        "ion" => 30.0,
        "nuclear" => 20.0,
        _ => 0.0,
    };

    if total_mass_kg < 2_000.0 {
        score += 20.0;
    } else if total_mass_kg > 5_000.0 {
        score -= 10.0;
    }

    score += match power {
        "nuclear" => 15.0,
        "rtg" => 10.0,
        _ => 0.0,
    };

    rocket_core::clamp(score, 0.0, 100.0)
}
