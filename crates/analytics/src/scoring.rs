//! Efficiency scores and performance trends.

use std::collections::BTreeMap;

use serde::Serialize;

/// Score given when no reference optimum applies.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Entries in each averaging window of [`aggregate_trend`].
pub const TREND_WINDOW: usize = 10;

/// Points the recent window must move before the trend is not `stable`.
pub const TREND_THRESHOLD: f64 = 5.0;

/// Normalises delta-v against per-target reference optimums.
#[derive(Debug, Clone, Default)]
pub struct EfficiencyScorer {
    optimal_dv_km_s: BTreeMap<String, f64>,
}

impl EfficiencyScorer {
    pub fn new(optimal_dv_km_s: BTreeMap<String, f64>) -> Self {
        Self { optimal_dv_km_s }
    }

    pub fn optimal(&self, target: &str) -> Option<f64> {
        self.optimal_dv_km_s.get(&target.to_ascii_lowercase()).copied()
    }

    /// `100 · optimal / total_dv`, clamped to `[0, 100]`.
    pub fn score(&self, target: &str, total_dv_km_s: f64) -> f64 {
        match self.optimal(target) {
            Some(optimal) if total_dv_km_s > 0.0 && total_dv_km_s.is_finite() => {
                (100.0 * optimal / total_dv_km_s).clamp(0.0, 100.0)
            }
            _ => NEUTRAL_SCORE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceTrend {
    pub trend: Trend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_efficiency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvement: Option<f64>,
    pub total_missions: usize,
}

/// Compare the mean of the last ten scores with the ten before them.
///
/// The earlier window only counts once it is full: with fewer than twenty
/// scores the change is zero. Fewer than two scores is `insufficient_data`.
pub fn aggregate_trend(scores: &[f64]) -> PerformanceTrend {
    let total_missions = scores.len();
    if total_missions < 2 {
        return PerformanceTrend {
            trend: Trend::InsufficientData,
            recent_efficiency: None,
            improvement: None,
            total_missions,
        };
    }

    let split = total_missions.saturating_sub(TREND_WINDOW);
    let recent = &scores[split..];
    let older: &[f64] = if total_missions >= 2 * TREND_WINDOW {
        &scores[split - TREND_WINDOW..split]
    } else {
        &[]
    };

    let recent_avg = mean(recent);
    let older_avg = if older.is_empty() {
        recent_avg
    } else {
        mean(older)
    };
    let delta = recent_avg - older_avg;

    let trend = if delta > TREND_THRESHOLD {
        Trend::Improving
    } else if delta < -TREND_THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    };

    PerformanceTrend {
        trend,
        recent_efficiency: Some(recent_avg),
        improvement: Some(delta),
        total_missions,
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
