//! Launch windows spaced by the synodic period, and the cost of missing one.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use rocket_config::PlanetConfig;
use rocket_core::time::years_to_days;
use rocket_orbits::{TrajectoryError, synodic_period_between, transfer_time_years};
use serde::Serialize;

/// Days either side of a window after which launching gains nothing.
pub const MAX_WINDOW_DEVIATION_DAYS: f64 = 30.0;

/// Fuel penalty at zero efficiency, as a fraction of the nominal load.
pub const MAX_FUEL_PENALTY: f64 = 0.2;

const RECOMMENDED_EFFICIENCY: f64 = 0.8;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LaunchError {
    #[error("launch window geometry failed: {0}")]
    Geometry(#[from] TrajectoryError),
    #[error("window {window} lies {offset_days:.3e} days out, beyond the calendar range")]
    DateOutOfRange { window: usize, offset_days: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchWindow {
    pub launch_date: NaiveDate,
    pub arrival_date: NaiveDate,
    /// Whole days of flight, truncated.
    pub transfer_days: u32,
    /// 1-based.
    pub window_number: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LaunchEfficiency {
    /// Percent.
    pub efficiency: f64,
    /// Extra propellant, percent.
    pub fuel_penalty: f64,
    pub recommended: bool,
}

fn days(value: f64) -> Option<TimeDelta> {
    let millis = (value * MILLIS_PER_DAY).round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    TimeDelta::try_milliseconds(millis as i64)
}

fn shift(from: DateTime<Utc>, offset_days: f64) -> Option<DateTime<Utc>> {
    from.checked_add_signed(days(offset_days)?)
}

/// `count` windows starting at `now`, one synodic period apart.
///
/// Dates are not checked against real planetary alignment.
pub fn launch_windows(
    origin: &PlanetConfig,
    target: &PlanetConfig,
    count: usize,
    now: DateTime<Utc>,
) -> Result<Vec<LaunchWindow>, LaunchError> {
    let synodic_days = synodic_period_between(origin.period_days(), target.period_days())?;
    let transfer_days = years_to_days(transfer_time_years(origin.distance_au, target.distance_au)?);

    let windows = (0..count)
        .map(|i| {
            let offset_days = i as f64 * synodic_days;
            let out_of_range = || LaunchError::DateOutOfRange {
                window: i + 1,
                offset_days,
            };
            let launch = shift(now, offset_days).ok_or_else(out_of_range)?;
            let arrival = shift(launch, transfer_days).ok_or_else(out_of_range)?;
            Ok(LaunchWindow {
                launch_date: launch.date_naive(),
                arrival_date: arrival.date_naive(),
                transfer_days: transfer_days as u32,
                window_number: i + 1,
            })
        })
        .collect::<Result<Vec<_>, LaunchError>>()?;

    log::debug!(
        "{count} windows to {} every {synodic_days:.1} days",
        target.name
    );
    Ok(windows)
}

/// Linear efficiency loss for launching `days_from_optimal` away from a window.
pub fn launch_efficiency(days_from_optimal: f64) -> LaunchEfficiency {
    let efficiency = (1.0 - days_from_optimal.abs() / MAX_WINDOW_DEVIATION_DAYS).max(0.0);
    LaunchEfficiency {
        efficiency: efficiency * 100.0,
        fuel_penalty: (1.0 - efficiency) * MAX_FUEL_PENALTY * 100.0,
        recommended: efficiency > RECOMMENDED_EFFICIENCY,
    }
}
