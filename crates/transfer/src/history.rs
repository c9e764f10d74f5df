//! Flown missions, used to put simulated transfer times in context.

use std::collections::BTreeMap;

use rocket_config::{HistoricalMissionConfig, HistoricalStatus};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalComparison {
    pub mission_name: String,
    pub actual_duration: f64,
    pub simulated_duration: f64,
    pub difference: f64,
    /// `100 - |Δ| / actual · 100`, floored at zero.
    pub accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseStats {
    pub total_missions: usize,
    pub active_missions: usize,
    pub completed_missions: usize,
    pub targets: BTreeMap<String, usize>,
    /// Name of the earliest-launched mission still active.
    pub oldest_active: Option<String>,
}

/// Read-only view over the historical mission table.
#[derive(Debug, Clone, Default)]
pub struct MissionDatabase {
    missions: Vec<HistoricalMissionConfig>,
}

impl MissionDatabase {
    pub fn new(missions: Vec<HistoricalMissionConfig>) -> Self {
        Self { missions }
    }

    pub fn missions(&self) -> &[HistoricalMissionConfig] {
        &self.missions
    }

    pub fn get(&self, id: &str) -> Option<&HistoricalMissionConfig> {
        self.missions.iter().find(|m| m.id == id)
    }

    pub fn missions_by_target(&self, target: &str) -> Vec<&HistoricalMissionConfig> {
        self.missions
            .iter()
            .filter(|m| m.target.eq_ignore_ascii_case(target))
            .collect()
    }

    pub fn active_missions(&self) -> Vec<&HistoricalMissionConfig> {
        self.missions
            .iter()
            .filter(|m| m.status == HistoricalStatus::Active)
            .collect()
    }

    pub fn stats(&self) -> DatabaseStats {
        let active = self.active_missions();
        let mut targets = BTreeMap::new();
        for mission in &self.missions {
            *targets.entry(mission.target.clone()).or_insert(0) += 1;
        }
        DatabaseStats {
            total_missions: self.missions.len(),
            active_missions: active.len(),
            completed_missions: self.missions.len() - active.len(),
            targets,
            oldest_active: active
                .iter()
                .min_by(|a, b| a.launch_date.cmp(&b.launch_date))
                .map(|m| m.name.clone()),
        }
    }

    /// Accuracy of a simulated duration against each flown mission to `target`.
    ///
    /// `None` when no mission went there.
    pub fn compare_with_simulation(
        &self,
        target: &str,
        simulated_days: f64,
    ) -> Option<Vec<HistoricalComparison>> {
        let flown = self.missions_by_target(target);
        if flown.is_empty() {
            return None;
        }
        Some(
            flown
                .into_iter()
                .map(|mission| {
                    let difference = (mission.duration_days - simulated_days).abs();
                    HistoricalComparison {
                        mission_name: mission.name.clone(),
                        actual_duration: mission.duration_days,
                        simulated_duration: simulated_days,
                        difference,
                        accuracy: (100.0 - difference / mission.duration_days * 100.0).max(0.0),
                    }
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket_config::Catalog;

    fn db() -> MissionDatabase {
        MissionDatabase::new(Catalog::builtin().unwrap().missions)
    }

    #[test]
    fn stats_over_builtin_table() {
        let stats = db().stats();
        assert_eq!(stats.total_missions, 5);
        assert_eq!(stats.active_missions, 4);
        assert_eq!(stats.completed_missions, 1);
        assert_eq!(stats.targets["jupiter"], 2);
        assert_eq!(stats.oldest_active.as_deref(), Some("Voyager 2"));
    }

    #[test]
    fn lookups() {
        let db = db();
        assert_eq!(db.missions_by_target("Jupiter").len(), 2);
        assert!(db.missions_by_target("venus").is_empty());
        assert_eq!(db.get("cassini").unwrap().name, "Cassini-Huygens");
        assert!(db.get("apollo_11").is_none());
    }

    #[test]
    fn comparison_accuracy() {
        let cmp = db().compare_with_simulation("mars", 900.0).unwrap();
        assert_eq!(cmp.len(), 1);
        assert_eq!(cmp[0].difference, 300.0);
        assert!((cmp[0].accuracy - 75.0).abs() < 1e-9);

        // A simulation off by more than the actual duration scores zero.
        let far = db().compare_with_simulation("mars", 3000.0).unwrap();
        assert_eq!(far[0].accuracy, 0.0);

        assert!(db().compare_with_simulation("venus", 146.0).is_none());
    }

    #[test]
    fn empty_database() {
        let stats = MissionDatabase::default().stats();
        assert_eq!(stats.total_missions, 0);
        assert_eq!(stats.oldest_active, None);
    }
}
