//! Live replay of computed transfers.
//!
//! A tracked mission stores the trajectory it was started with and the
//! instant it started. Progress is recomputed from the injected [`Clock`] on
//! every query, so there is no ticking task and repeated queries at the same
//! instant agree.

pub mod clock;

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use rocket_core::vector::Point2;
use rocket_orbits::Trajectory;
use serde::Serialize;
use thiserror::Error;

pub use clock::{Clock, ManualClock, SystemClock};

#[derive(Debug, Error, PartialEq)]
pub enum TrackerError {
    #[error("mission `{0}` is already being tracked")]
    AlreadyExists(String),
    #[error("mission `{0}` not found")]
    NotFound(String),
    #[error("trajectory has no vehicle samples")]
    EmptyTrajectory,
    #[error("transfer time must be positive and finite (got {0} days)")]
    InvalidTransferTime(f64),
    #[error("time scale must be positive and finite (got {0} days/s)")]
    InvalidTimeScale(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionEvent {
    pub timestamp: DateTime<Utc>,
    pub event: String,
}

/// Point-in-time view of a tracked mission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionProgress {
    pub mission_id: String,
    pub target: String,
    /// Fraction of the transfer flown, in `[0, 1]`.
    pub progress_fraction: f64,
    pub progress_percent: f64,
    pub current_position: Point2,
    pub status: MissionStatus,
    pub elapsed_days: f64,
    pub remaining_days: f64,
}

#[derive(Debug)]
struct MissionRun {
    target: String,
    trajectory: Trajectory,
    started_at: DateTime<Utc>,
    events: Vec<MissionEvent>,
}

impl MissionRun {
    fn progress_at(&self, id: &str, now: DateTime<Utc>, days_per_second: f64) -> MissionProgress {
        let elapsed = now - self.started_at;
        let elapsed_seconds = elapsed
            .num_microseconds()
            .map(|us| us as f64 / 1e6)
            .unwrap_or_else(|| elapsed.num_seconds() as f64)
            .max(0.0);

        let total_days = self.trajectory.transfer_time_days;
        let elapsed_days = elapsed_seconds * days_per_second;
        let fraction = rocket_core::clamp(elapsed_days / total_days, 0.0, 1.0);

        let last = self.trajectory.rocket.len() - 1;
        let index = ((fraction * last as f64).floor() as usize).min(last);

        MissionProgress {
            mission_id: id.to_string(),
            target: self.target.clone(),
            progress_fraction: fraction,
            progress_percent: fraction * 100.0,
            current_position: self.trajectory.rocket[index],
            status: if fraction >= 1.0 {
                MissionStatus::Completed
            } else {
                MissionStatus::Active
            },
            elapsed_days,
            remaining_days: (total_days - elapsed_days).max(0.0),
        }
    }
}

/// Registry of tracked missions replayed against a clock.
#[derive(Debug)]
pub struct MissionClock {
    clock: Arc<dyn Clock>,
    days_per_second: f64,
    runs: Mutex<HashMap<String, MissionRun>>,
}

impl MissionClock {
    /// `days_per_second` simulated days elapse per wall-clock second.
    pub fn new(clock: Arc<dyn Clock>, days_per_second: f64) -> Result<Self, TrackerError> {
        if !(days_per_second.is_finite() && days_per_second > 0.0) {
            return Err(TrackerError::InvalidTimeScale(days_per_second));
        }
        Ok(Self {
            clock,
            days_per_second,
            runs: Mutex::new(HashMap::new()),
        })
    }

    pub fn with_system_clock(days_per_second: f64) -> Result<Self, TrackerError> {
        Self::new(Arc::new(SystemClock), days_per_second)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn runs(&self) -> MutexGuard<'_, HashMap<String, MissionRun>> {
        // Every mutation completes before the guard drops, so a poisoned map is still consistent.
        self.runs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Begin tracking; identifiers are never silently reused.
    pub fn start(
        &self,
        mission_id: &str,
        target: &str,
        trajectory: Trajectory,
    ) -> Result<DateTime<Utc>, TrackerError> {
        if trajectory.rocket.is_empty() {
            return Err(TrackerError::EmptyTrajectory);
        }
        let days = trajectory.transfer_time_days;
        if !(days.is_finite() && days > 0.0) {
            return Err(TrackerError::InvalidTransferTime(days));
        }

        let mut runs = self.runs();
        if runs.contains_key(mission_id) {
            return Err(TrackerError::AlreadyExists(mission_id.to_string()));
        }
        let started_at = self.clock.now();
        runs.insert(
            mission_id.to_string(),
            MissionRun {
                target: target.to_string(),
                trajectory,
                started_at,
                events: Vec::new(),
            },
        );
        log::info!("tracking mission {mission_id} to {target} ({days:.1} days)");
        Ok(started_at)
    }

    pub fn progress(&self, mission_id: &str) -> Result<MissionProgress, TrackerError> {
        let now = self.clock.now();
        let runs = self.runs();
        let run = runs
            .get(mission_id)
            .ok_or_else(|| TrackerError::NotFound(mission_id.to_string()))?;
        Ok(run.progress_at(mission_id, now, self.days_per_second))
    }

    /// Progress of every tracked mission, keyed by identifier.
    pub fn all_progress(&self) -> BTreeMap<String, MissionProgress> {
        let now = self.clock.now();
        self.runs()
            .iter()
            .map(|(id, run)| (id.clone(), run.progress_at(id, now, self.days_per_second)))
            .collect()
    }

    pub fn add_event(&self, mission_id: &str, event: impl Into<String>) -> Result<(), TrackerError> {
        let timestamp = self.clock.now();
        let mut runs = self.runs();
        let run = runs
            .get_mut(mission_id)
            .ok_or_else(|| TrackerError::NotFound(mission_id.to_string()))?;
        run.events.push(MissionEvent {
            timestamp,
            event: event.into(),
        });
        Ok(())
    }

    pub fn events(&self, mission_id: &str) -> Result<Vec<MissionEvent>, TrackerError> {
        self.runs()
            .get(mission_id)
            .map(|run| run.events.clone())
            .ok_or_else(|| TrackerError::NotFound(mission_id.to_string()))
    }

    /// Stop tracking a mission. Runs are otherwise kept for the process lifetime.
    pub fn remove(&self, mission_id: &str) -> Result<(), TrackerError> {
        self.runs()
            .remove(mission_id)
            .map(|_| log::info!("stopped tracking mission {mission_id}"))
            .ok_or_else(|| TrackerError::NotFound(mission_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.runs().len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn setup() -> (ManualClock, MissionClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap());
        let tracker = MissionClock::new(Arc::new(clock.clone()), 10.0).unwrap();
        (clock, tracker)
    }

    fn mars() -> Trajectory {
        rocket_orbits::trajectory(1.0, 1.524, 100).unwrap()
    }

    #[test]
    fn progress_starts_at_departure() {
        let (_clock, tracker) = setup();
        let traj = mars();
        let first = traj.rocket[0];
        tracker.start("m1", "mars", traj).unwrap();

        let progress = tracker.progress("m1").unwrap();
        assert_eq!(progress.progress_fraction, 0.0);
        assert_eq!(progress.current_position, first);
        assert_eq!(progress.status, MissionStatus::Active);
        assert_eq!(progress.elapsed_days, 0.0);
    }

    #[test]
    fn repeated_queries_are_identical() {
        let (clock, tracker) = setup();
        tracker.start("m1", "mars", mars()).unwrap();
        clock.advance(TimeDelta::milliseconds(7_300));
        assert_eq!(tracker.progress("m1").unwrap(), tracker.progress("m1").unwrap());
    }

    #[test]
    fn progress_is_monotonic_and_completes() {
        let (clock, tracker) = setup();
        let traj = mars();
        let total_days = traj.transfer_time_days;
        let last = *traj.rocket.last().unwrap();
        tracker.start("m1", "mars", traj).unwrap();

        let mut previous = 0.0;
        for _ in 0..40 {
            clock.advance(TimeDelta::seconds(1));
            let p = tracker.progress("m1").unwrap();
            assert!(p.progress_fraction >= previous);
            previous = p.progress_fraction;
        }

        let done = tracker.progress("m1").unwrap();
        assert_eq!(done.progress_fraction, 1.0);
        assert_eq!(done.status, MissionStatus::Completed);
        assert_eq!(done.current_position, last);
        assert_eq!(done.remaining_days, 0.0);
        assert!(done.elapsed_days > total_days);
    }

    #[test]
    fn halfway_index_uses_floor() {
        let (clock, tracker) = setup();
        let traj = mars();
        let total_days = traj.transfer_time_days;
        let expected = traj.rocket[49];
        tracker.start("m1", "mars", traj).unwrap();

        // Half the transfer: 99 * 0.5 = 49.5 floors to sample 49.
        let seconds = total_days / 2.0 / 10.0;
        clock.advance(TimeDelta::microseconds((seconds * 1e6).round() as i64));
        let p = tracker.progress("m1").unwrap();
        assert!((p.progress_fraction - 0.5).abs() < 1e-6);
        assert_eq!(p.current_position, expected);
        assert!((p.remaining_days - total_days / 2.0).abs() < 1e-3);
    }

    #[test]
    fn duplicate_and_unknown_ids() {
        let (_clock, tracker) = setup();
        tracker.start("m1", "mars", mars()).unwrap();
        assert_eq!(
            tracker.start("m1", "venus", mars()).unwrap_err(),
            TrackerError::AlreadyExists("m1".into())
        );
        assert_eq!(
            tracker.progress("ghost").unwrap_err(),
            TrackerError::NotFound("ghost".into())
        );
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn events_are_timestamped_in_order() {
        let (clock, tracker) = setup();
        tracker.start("m1", "mars", mars()).unwrap();
        tracker.add_event("m1", "launch").unwrap();
        clock.advance(TimeDelta::seconds(3));
        tracker.add_event("m1", "mid-course correction").unwrap();

        let events = tracker.events("m1").unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event, "launch");
        assert!(events[1].timestamp > events[0].timestamp);
        assert!(tracker.add_event("ghost", "x").is_err());
    }

    #[test]
    fn all_progress_and_remove() {
        let (_clock, tracker) = setup();
        tracker.start("b", "mars", mars()).unwrap();
        tracker.start("a", "venus", rocket_orbits::trajectory(1.0, 0.723, 60).unwrap()).unwrap();
        let all = tracker.all_progress();
        assert_eq!(all.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(all["a"].target, "venus");

        tracker.remove("a").unwrap();
        assert_eq!(tracker.len(), 1);
        assert!(tracker.remove("a").is_err());
    }

    #[test]
    fn rejects_non_positive_time_scale() {
        assert!(MissionClock::with_system_clock(0.0).is_err());
    }
}
