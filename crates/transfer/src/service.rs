//! Request/response simulator composed from independently built components.
//!
//! Each optional subsystem is built only when its feature flag is set; routes
//! that need a missing subsystem answer `Unavailable` while the trajectory
//! core keeps working.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use rocket_analytics::{
    AnalyticsError, AnalyticsExport, AnalyticsLog, EfficiencyScorer, SimulationRecord,
};
use rocket_config::{Catalog, ConfigError, DesignPreset, PlanetConfig, QuizQuestionConfig, Settings};
use rocket_flyby::{GravityAssistModel, RouteEvaluation};
use rocket_propulsion::{DesignRequest, FuelModel, SpacecraftDesign, SpacecraftDesigner};
use rocket_tracker::{Clock, MissionClock, MissionEvent, MissionProgress, TrackerError};

use crate::history::MissionDatabase;
use crate::mission::launch::{self, LaunchEfficiency, LaunchWindow};
use crate::mission::{MissionConfig, MissionProfile, plan_mission};
use crate::request::{Request, Response, ServiceError};
use crate::tutorials::{TutorialLibrary, TutorialStep, TutorialSummary};

/// Body every transfer departs from.
pub const DEPARTURE_BODY: &str = "earth";

/// Target used when a request names none.
pub const DEFAULT_TARGET: &str = "mars";

/// Errors raised while assembling a [`Simulator`].
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid settings: {0}")]
    Config(#[from] ConfigError),
    #[error("catalog has no `{0}` to depart from")]
    MissingDeparture(&'static str),
    #[error("mission tracker: {0}")]
    Tracker(#[from] TrackerError),
    #[error("analytics: {0}")]
    Analytics(#[from] AnalyticsError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingStarted {
    pub mission_id: String,
    pub status: &'static str,
    pub started_at: DateTime<Utc>,
    /// How often clients should poll `mission-status`.
    pub update_interval_ms: u64,
}

/// Orchestrates the computation core and its collaborators.
#[derive(Debug)]
pub struct Simulator {
    settings: Settings,
    clock: Arc<dyn Clock>,
    origin: PlanetConfig,
    targets: Vec<PlanetConfig>,
    scorer: EfficiencyScorer,
    fuel: Option<FuelModel>,
    flyby: Option<GravityAssistModel>,
    history: Option<MissionDatabase>,
    tracker: Option<MissionClock>,
    designer: Option<SpacecraftDesigner>,
    tutorials: Option<TutorialLibrary>,
    analytics: Option<AnalyticsLog>,
}

impl Simulator {
    pub fn new(catalog: Catalog, settings: Settings, clock: Arc<dyn Clock>) -> Result<Self, SetupError> {
        settings.validate()?;
        let origin = catalog
            .planet(DEPARTURE_BODY)
            .cloned()
            .ok_or(SetupError::MissingDeparture(DEPARTURE_BODY))?;
        let features = settings.features;
        let scorer = EfficiencyScorer::new(catalog.optimal_delta_v());

        let tracker = if features.mission_tracker {
            Some(MissionClock::new(
                Arc::clone(&clock),
                settings.time_scale_days_per_second,
            )?)
        } else {
            None
        };
        let analytics = if features.analytics {
            Some(AnalyticsLog::new(scorer.clone(), settings.history_capacity)?)
        } else {
            None
        };

        let Catalog {
            planets,
            missions,
            parts,
            routes,
            tutorials,
        } = catalog;

        let simulator = Self {
            fuel: features.fuel_calculator.then(FuelModel::default),
            flyby: features
                .gravity_assist
                .then(|| GravityAssistModel::new(planets.clone(), routes)),
            history: features
                .mission_database
                .then(|| MissionDatabase::new(missions)),
            designer: features
                .spacecraft_designer
                .then(|| SpacecraftDesigner::new(parts, settings.max_mass_kg, settings.max_cost)),
            tutorials: features.tutorials.then(|| TutorialLibrary::new(tutorials)),
            targets: planets
                .into_iter()
                .filter(|p| !p.name.eq_ignore_ascii_case(DEPARTURE_BODY))
                .collect(),
            tracker,
            analytics,
            scorer,
            origin,
            settings,
            clock,
        };
        log::info!(
            "simulator ready with {} targets: {}",
            simulator.targets.len(),
            simulator
                .targets
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(simulator)
    }

    /// Built-in catalog, default settings and the system clock.
    pub fn with_defaults() -> Result<Self, SetupError> {
        Self::new(
            Catalog::builtin()?,
            Settings::default(),
            Arc::new(rocket_tracker::SystemClock),
        )
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn targets(&self) -> &[PlanetConfig] {
        &self.targets
    }

    fn target(&self, name: &str) -> Result<&PlanetConfig, ServiceError> {
        self.targets
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                log::warn!("rejected unknown target `{name}`");
                ServiceError::InvalidInput(format!("invalid target planet `{name}`"))
            })
    }

    fn plan(&self, target: &PlanetConfig, steps: usize) -> Result<MissionProfile, ServiceError> {
        Ok(plan_mission(MissionConfig {
            origin: &self.origin,
            destination: target,
            steps,
            scorer: &self.scorer,
            fuel: self.fuel.as_ref(),
            history: self.history.as_ref(),
        })?)
    }

    /// Plan a mission and log it to analytics. Steps are clamped, never rejected.
    pub fn simulate(&self, target: &str, steps: Option<i64>) -> Result<MissionProfile, ServiceError> {
        let body = self.target(target)?;
        let steps = self
            .settings
            .clamp_steps(steps.unwrap_or(self.settings.default_steps as i64));
        let profile = self.plan(body, steps)?;

        if let Some(analytics) = &self.analytics {
            let fuel = profile.fuel;
            analytics.log_simulation(
                self.clock.now(),
                &profile.target,
                SimulationRecord {
                    transfer_time_days: profile.trajectory.transfer_time_days,
                    delta_v_km_s: fuel.map_or(0.0, |f| f.total_dv_km_s),
                    fuel_mass_kg: fuel.map_or(0.0, |f| f.fuel_mass_kg),
                },
                BTreeMap::from([("steps".to_string(), json!(steps))]),
            );
        }
        Ok(profile)
    }

    pub fn launch_windows(&self, target: &str) -> Result<Vec<LaunchWindow>, ServiceError> {
        let body = self.target(target)?;
        if !self.settings.features.launch_optimizer {
            return Err(ServiceError::Unavailable("launch optimizer"));
        }
        Ok(launch::launch_windows(
            &self.origin,
            body,
            self.settings.launch_window_count,
            self.clock.now(),
        )?)
    }

    pub fn launch_efficiency(&self, days_from_optimal: f64) -> Result<LaunchEfficiency, ServiceError> {
        if !self.settings.features.launch_optimizer {
            return Err(ServiceError::Unavailable("launch optimizer"));
        }
        if !days_from_optimal.is_finite() {
            return Err(ServiceError::InvalidInput(
                "days_from_optimal must be finite".to_string(),
            ));
        }
        Ok(launch::launch_efficiency(days_from_optimal))
    }

    pub fn gravity_assist(&self, target: &str) -> Result<Vec<RouteEvaluation>, ServiceError> {
        let body = self.target(target)?;
        let flyby = self
            .flyby
            .as_ref()
            .ok_or(ServiceError::Unavailable("gravity assist calculator"))?;
        Ok(flyby.suggest_routes(&body.name)?)
    }

    fn tracker(&self) -> Result<&MissionClock, ServiceError> {
        self.tracker
            .as_ref()
            .ok_or(ServiceError::Unavailable("mission tracker"))
    }

    /// Track a freshly sampled transfer; the id defaults to `mission_<unix seconds>`.
    pub fn start_tracking(
        &self,
        mission_id: Option<&str>,
        target: &str,
    ) -> Result<TrackingStarted, ServiceError> {
        let tracker = self.tracker()?;
        let body = self.target(target)?;
        let mission_id = match mission_id {
            Some(id) => id.to_string(),
            None => format!("mission_{}", self.clock.now().timestamp()),
        };
        let trajectory = rocket_orbits::trajectory(
            self.origin.distance_au,
            body.distance_au,
            self.settings.tracking_steps,
        )?;
        let started_at = tracker.start(&mission_id, &body.name, trajectory)?;
        Ok(TrackingStarted {
            mission_id,
            status: "started",
            started_at,
            update_interval_ms: self.settings.tracking_update_interval_ms,
        })
    }

    pub fn mission_status(&self, mission_id: &str) -> Result<MissionProgress, ServiceError> {
        Ok(self.tracker()?.progress(mission_id)?)
    }

    pub fn active_missions(&self) -> Result<BTreeMap<String, MissionProgress>, ServiceError> {
        Ok(self.tracker()?.all_progress())
    }

    pub fn add_mission_event(&self, mission_id: &str, event: &str) -> Result<(), ServiceError> {
        Ok(self.tracker()?.add_event(mission_id, event)?)
    }

    pub fn mission_events(&self, mission_id: &str) -> Result<Vec<MissionEvent>, ServiceError> {
        Ok(self.tracker()?.events(mission_id)?)
    }

    fn designer(&self) -> Result<&SpacecraftDesigner, ServiceError> {
        self.designer
            .as_ref()
            .ok_or(ServiceError::Unavailable("spacecraft designer"))
    }

    pub fn design_spacecraft(&self, request: &DesignRequest) -> Result<SpacecraftDesign, ServiceError> {
        Ok(self.designer()?.design(request)?)
    }

    pub fn spacecraft_presets(&self) -> Result<&BTreeMap<String, DesignPreset>, ServiceError> {
        Ok(self.designer()?.presets())
    }

    fn library(&self) -> Result<&TutorialLibrary, ServiceError> {
        self.tutorials
            .as_ref()
            .ok_or(ServiceError::Unavailable("tutorial system"))
    }

    pub fn tutorials(&self) -> Result<BTreeMap<String, TutorialSummary>, ServiceError> {
        Ok(self.library()?.summaries())
    }

    pub fn tutorial_step(&self, tutorial_id: &str, step: usize) -> Result<TutorialStep, ServiceError> {
        Ok(self.library()?.step(tutorial_id, step)?)
    }

    pub fn quiz(&self, tutorial_id: &str) -> Result<&[QuizQuestionConfig], ServiceError> {
        Ok(self.library()?.quiz(tutorial_id))
    }

    pub fn analytics(&self) -> Result<AnalyticsExport, ServiceError> {
        self.analytics
            .as_ref()
            .map(AnalyticsLog::export)
            .ok_or(ServiceError::Unavailable("analytics"))
    }

    /// Dispatch a request to its handler and serialise the result.
    pub fn handle(&self, request: Request) -> Result<Value, ServiceError> {
        match request {
            Request::Simulate { target, steps } => {
                to_json(self.simulate(target.as_deref().unwrap_or(DEFAULT_TARGET), steps)?)
            }
            Request::LaunchWindows { target } => to_json(self.launch_windows(&target)?),
            Request::LaunchEfficiency { days_from_optimal } => {
                to_json(self.launch_efficiency(days_from_optimal)?)
            }
            Request::GravityAssist { target } => to_json(self.gravity_assist(&target)?),
            Request::StartTracking { mission_id, target } => to_json(self.start_tracking(
                mission_id.as_deref(),
                target.as_deref().unwrap_or(DEFAULT_TARGET),
            )?),
            Request::MissionStatus { mission_id } => to_json(self.mission_status(&mission_id)?),
            Request::ActiveMissions => to_json(self.active_missions()?),
            Request::MissionEvent { mission_id, event } => {
                self.add_mission_event(&mission_id, &event)?;
                Ok(json!({ "mission_id": mission_id, "status": "recorded" }))
            }
            Request::MissionEvents { mission_id } => to_json(self.mission_events(&mission_id)?),
            Request::DesignSpacecraft {
                engine,
                fuel_tank,
                power,
                payload,
            } => to_json(self.design_spacecraft(&DesignRequest {
                engine,
                fuel_tank,
                power,
                payload,
            })?),
            Request::SpacecraftPresets => to_json(self.spacecraft_presets()?),
            Request::Tutorials => to_json(self.tutorials()?),
            Request::TutorialStep { tutorial_id, step } => {
                to_json(self.tutorial_step(&tutorial_id, step)?)
            }
            Request::Quiz { tutorial_id } => to_json(self.quiz(&tutorial_id)?),
            Request::Analytics => to_json(self.analytics()?),
        }
    }

    /// Parse, dispatch and wrap one JSON request line.
    pub fn respond(&self, line: &str) -> Response {
        let result = Request::from_json(line).and_then(|request| self.handle(request));
        if let Err(err) = &result {
            log::warn!("request failed ({}): {err}", err.status_code());
        }
        Response::from(result)
    }
}

fn to_json<T: Serialize>(value: T) -> Result<Value, ServiceError> {
    serde_json::to_value(value)
        .map_err(|err| ServiceError::Numeric(format!("response not serialisable: {err}")))
}
