//! Mission planning orchestrator that chains trajectory, fuel, scoring and historical comparison.

pub mod launch;

use rocket_analytics::EfficiencyScorer;
use rocket_config::PlanetConfig;
use rocket_orbits::{Trajectory, TrajectoryError};
use rocket_propulsion::{FuelBudget, FuelError, FuelModel};
use serde::Serialize;

use crate::history::{HistoricalComparison, MissionDatabase};

/// Everything computed for one simulated transfer.
#[derive(Debug, Clone, Serialize)]
pub struct MissionProfile {
    pub target: String,
    pub trajectory: Trajectory,
    /// Absent when no fuel model is configured.
    pub fuel: Option<FuelBudget>,
    pub efficiency: f64,
    /// Absent when no database is configured or no flown mission shares the target.
    pub historical: Option<Vec<HistoricalComparison>>,
}

/// Top-level mission planning error.
#[derive(Debug, thiserror::Error)]
pub enum MissionError {
    #[error("trajectory planning failed: {0}")]
    Trajectory(#[from] TrajectoryError),
    #[error("fuel budget failed: {0}")]
    Fuel(#[from] FuelError),
}

/// Inputs and collaborators for a single planning run.
#[derive(Debug, Clone, Copy)]
pub struct MissionConfig<'a> {
    pub origin: &'a PlanetConfig,
    pub destination: &'a PlanetConfig,
    pub steps: usize,
    pub scorer: &'a EfficiencyScorer,
    pub fuel: Option<&'a FuelModel>,
    pub history: Option<&'a MissionDatabase>,
}

/// Sample the transfer, then derive fuel, efficiency and historical accuracy from it.
pub fn plan_mission(config: MissionConfig<'_>) -> Result<MissionProfile, MissionError> {
    let trajectory = rocket_orbits::trajectory(
        config.origin.distance_au,
        config.destination.distance_au,
        config.steps,
    )?;

    let fuel = config
        .fuel
        .map(|model| model.budget(config.origin.distance_au, config.destination.distance_au))
        .transpose()?;

    let target = config.destination.name.clone();
    let efficiency = config
        .scorer
        .score(&target, fuel.map_or(0.0, |budget| budget.total_dv_km_s));
    let historical = config
        .history
        .and_then(|db| db.compare_with_simulation(&target, trajectory.transfer_time_days));

    log::debug!(
        "planned {} -> {target}: {:.1} days, score {efficiency:.1}",
        config.origin.name,
        trajectory.transfer_time_days
    );

    Ok(MissionProfile {
        target,
        trajectory,
        fuel,
        efficiency,
        historical,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket_config::Catalog;

    #[test]
    fn mars_profile_carries_every_section() {
        let catalog = Catalog::builtin().unwrap();
        let scorer = EfficiencyScorer::new(catalog.optimal_delta_v());
        let fuel = FuelModel::default();
        let db = MissionDatabase::new(catalog.missions.clone());

        let profile = plan_mission(MissionConfig {
            origin: catalog.planet("earth").unwrap(),
            destination: catalog.planet("mars").unwrap(),
            steps: 200,
            scorer: &scorer,
            fuel: Some(&fuel),
            history: Some(&db),
        })
        .unwrap();

        assert_eq!(profile.target, "mars");
        assert_eq!(profile.trajectory.len(), 200);
        let budget = profile.fuel.unwrap();
        assert!((budget.total_dv_km_s - 5.596).abs() < 0.01);
        // 6.3 / 5.596 > 1, so the score saturates.
        assert_eq!(profile.efficiency, 100.0);
        let historical = profile.historical.unwrap();
        assert_eq!(historical.len(), 1);
        assert_eq!(historical[0].mission_name, "Perseverance");
    }

    #[test]
    fn optional_collaborators_can_be_absent() {
        let catalog = Catalog::builtin().unwrap();
        let scorer = EfficiencyScorer::new(catalog.optimal_delta_v());

        let profile = plan_mission(MissionConfig {
            origin: catalog.planet("earth").unwrap(),
            destination: catalog.planet("venus").unwrap(),
            steps: 50,
            scorer: &scorer,
            fuel: None,
            history: None,
        })
        .unwrap();

        assert!(profile.fuel.is_none());
        assert!(profile.historical.is_none());
        assert_eq!(profile.efficiency, rocket_analytics::NEUTRAL_SCORE);
    }

    #[test]
    fn same_body_is_rejected() {
        let catalog = Catalog::builtin().unwrap();
        let scorer = EfficiencyScorer::default();
        let earth = catalog.planet("earth").unwrap();
        let err = plan_mission(MissionConfig {
            origin: earth,
            destination: earth,
            steps: 50,
            scorer: &scorer,
            fuel: None,
            history: None,
        })
        .unwrap_err();
        assert!(matches!(err, MissionError::Trajectory(_)));
    }
}
