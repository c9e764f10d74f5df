//! Simulation history and the aggregate report built from it.

pub mod scoring;

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

pub use scoring::{EfficiencyScorer, NEUTRAL_SCORE, PerformanceTrend, Trend, aggregate_trend};

/// Entries kept when no capacity is configured.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Entries listed under `recent_missions` in an export.
pub const RECENT_MISSIONS: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("history capacity must be at least 1")]
    ZeroCapacity,
}

/// Figures of one simulation run, as handed to [`AnalyticsLog::log_simulation`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimulationRecord {
    pub transfer_time_days: f64,
    pub delta_v_km_s: f64,
    pub fuel_mass_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionLogEntry {
    pub timestamp: DateTime<Utc>,
    pub target: String,
    pub transfer_time_days: f64,
    pub delta_v_km_s: f64,
    pub fuel_mass_kg: f64,
    pub efficiency_score: f64,
    pub config: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub total_simulations: usize,
    pub favorite_target: Option<String>,
    pub avg_efficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetAnalytics {
    pub count: usize,
    pub avg_efficiency: f64,
    pub best_efficiency: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Tutorial,
    Improvement,
    Challenge,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub message: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsExport {
    pub user_stats: UserStats,
    pub performance_trends: PerformanceTrend,
    pub target_analytics: BTreeMap<String, TargetAnalytics>,
    pub recommendations: Vec<Recommendation>,
    pub recent_missions: Vec<MissionLogEntry>,
}

/// Bounded FIFO of scored simulations.
#[derive(Debug)]
pub struct AnalyticsLog {
    scorer: EfficiencyScorer,
    capacity: usize,
    history: Mutex<VecDeque<MissionLogEntry>>,
}

impl AnalyticsLog {
    pub fn new(scorer: EfficiencyScorer, capacity: usize) -> Result<Self, AnalyticsError> {
        if capacity == 0 {
            return Err(AnalyticsError::ZeroCapacity);
        }
        Ok(Self {
            scorer,
            capacity,
            history: Mutex::new(VecDeque::with_capacity(capacity)),
        })
    }

    pub fn scorer(&self) -> &EfficiencyScorer {
        &self.scorer
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn history(&self) -> MutexGuard<'_, VecDeque<MissionLogEntry>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Score and append a run, evicting the oldest entry once full.
    pub fn log_simulation(
        &self,
        timestamp: DateTime<Utc>,
        target: &str,
        record: SimulationRecord,
        config: BTreeMap<String, serde_json::Value>,
    ) -> MissionLogEntry {
        let entry = MissionLogEntry {
            timestamp,
            target: target.to_string(),
            transfer_time_days: record.transfer_time_days,
            delta_v_km_s: record.delta_v_km_s,
            fuel_mass_kg: record.fuel_mass_kg,
            efficiency_score: self.scorer.score(target, record.delta_v_km_s),
            config,
        };

        let mut history = self.history();
        history.push_back(entry.clone());
        while history.len() > self.capacity {
            if let Some(evicted) = history.pop_front() {
                log::debug!("evicted analytics entry for {} from {}", evicted.target, evicted.timestamp);
            }
        }
        log::debug!(
            "logged {target} simulation (score {:.1}, {} entries)",
            entry.efficiency_score,
            history.len()
        );
        entry
    }

    /// Snapshot of the history, oldest first.
    pub fn entries(&self) -> Vec<MissionLogEntry> {
        self.history().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.history().len()
    }

    pub fn is_empty(&self) -> bool {
        self.history().is_empty()
    }

    /// Build every report section from one consistent snapshot.
    pub fn export(&self) -> AnalyticsExport {
        let entries = self.entries();
        let scores: Vec<f64> = entries.iter().map(|e| e.efficiency_score).collect();
        let performance_trends = aggregate_trend(&scores);
        let target_analytics = target_analytics(&entries);
        let recommendations = recommendations(entries.len(), &performance_trends, &target_analytics);
        let recent_missions = entries[entries.len().saturating_sub(RECENT_MISSIONS)..].to_vec();

        AnalyticsExport {
            user_stats: user_stats(&entries),
            performance_trends,
            target_analytics,
            recommendations,
            recent_missions,
        }
    }
}

fn user_stats(entries: &[MissionLogEntry]) -> UserStats {
    // Ties go to the target seen first.
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for entry in entries {
        match counts.iter_mut().find(|(t, _)| *t == entry.target) {
            Some((_, n)) => *n += 1,
            None => counts.push((&entry.target, 1)),
        }
    }
    let favorite_target = counts
        .iter()
        .fold(None::<(&str, usize)>, |best, &(t, n)| match best {
            Some((_, m)) if m >= n => best,
            _ => Some((t, n)),
        })
        .map(|(t, _)| t.to_string());

    let avg_efficiency = if entries.is_empty() {
        0.0
    } else {
        entries.iter().map(|e| e.efficiency_score).sum::<f64>() / entries.len() as f64
    };

    UserStats {
        total_simulations: entries.len(),
        favorite_target,
        avg_efficiency,
    }
}

fn target_analytics(entries: &[MissionLogEntry]) -> BTreeMap<String, TargetAnalytics> {
    let mut stats: BTreeMap<String, TargetAnalytics> = BTreeMap::new();
    for entry in entries {
        let slot = stats.entry(entry.target.clone()).or_insert(TargetAnalytics {
            count: 0,
            avg_efficiency: 0.0,
            best_efficiency: 0.0,
        });
        slot.count += 1;
        slot.avg_efficiency += entry.efficiency_score;
        slot.best_efficiency = slot.best_efficiency.max(entry.efficiency_score);
    }
    for slot in stats.values_mut() {
        slot.avg_efficiency /= slot.count as f64;
    }
    stats
}

fn recommendations(
    total: usize,
    trend: &PerformanceTrend,
    targets: &BTreeMap<String, TargetAnalytics>,
) -> Vec<Recommendation> {
    let mut out = Vec::new();
    if total < 5 {
        out.push(Recommendation {
            kind: RecommendationKind::Tutorial,
            message: "Try the interactive tutorials to learn orbital mechanics basics!".into(),
            action: "open_tutorials".into(),
        });
    }
    if trend.trend == Trend::Declining {
        out.push(Recommendation {
            kind: RecommendationKind::Improvement,
            message: "Your efficiency has decreased. Try using gravity assists for better performance."
                .into(),
            action: "show_gravity_assist".into(),
        });
    }
    if total > 10 && !targets.contains_key("jupiter") {
        out.push(Recommendation {
            kind: RecommendationKind::Challenge,
            message: "Ready for a challenge? Try a mission to Jupiter!".into(),
            action: "set_target_jupiter".into(),
        });
    }
    out
}
