//! Wire types for the simulator's request/response surface.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use rocket_flyby::FlybyError;
use rocket_orbits::TrajectoryError;
use rocket_propulsion::{DesignError, FuelError};
use rocket_tracker::TrackerError;

use crate::mission::MissionError;
use crate::mission::launch::LaunchError;
use crate::tutorials::TutorialError;

/// One request, tagged by its route name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "route", rename_all = "kebab-case")]
pub enum Request {
    Simulate {
        #[serde(default)]
        target: Option<String>,
        /// Clamped into the configured step range rather than rejected.
        #[serde(default)]
        steps: Option<i64>,
    },
    LaunchWindows {
        target: String,
    },
    LaunchEfficiency {
        #[serde(default)]
        days_from_optimal: f64,
    },
    GravityAssist {
        target: String,
    },
    StartTracking {
        #[serde(default)]
        mission_id: Option<String>,
        #[serde(default)]
        target: Option<String>,
    },
    MissionStatus {
        mission_id: String,
    },
    ActiveMissions,
    MissionEvent {
        mission_id: String,
        event: String,
    },
    MissionEvents {
        mission_id: String,
    },
    DesignSpacecraft {
        #[serde(default)]
        engine: Option<String>,
        #[serde(default)]
        fuel_tank: Option<String>,
        #[serde(default)]
        power: Option<String>,
        #[serde(default)]
        payload: Option<String>,
    },
    SpacecraftPresets,
    Tutorials,
    TutorialStep {
        tutorial_id: String,
        step: usize,
    },
    Quiz {
        tutorial_id: String,
    },
    Analytics,
}

impl Request {
    /// Parse one JSON request; malformed input is a client error.
    pub fn from_json(text: &str) -> Result<Self, ServiceError> {
        serde_json::from_str(text)
            .map_err(|err| ServiceError::InvalidInput(format!("malformed request: {err}")))
    }
}

/// Failure kinds surfaced to callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0} not available")]
    Unavailable(&'static str),
    #[error("degenerate computation: {0}")]
    Numeric(String),
}

impl ServiceError {
    /// HTTP-style status code for the error kind.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::InvalidInput(_) | ServiceError::Numeric(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::Unavailable(_) => 503,
        }
    }
}

impl From<TrajectoryError> for ServiceError {
    fn from(err: TrajectoryError) -> Self {
        match err {
            TrajectoryError::TooFewSteps(_) => ServiceError::InvalidInput(err.to_string()),
            _ => ServiceError::Numeric(err.to_string()),
        }
    }
}

impl From<FuelError> for ServiceError {
    fn from(err: FuelError) -> Self {
        ServiceError::Numeric(err.to_string())
    }
}

impl From<MissionError> for ServiceError {
    fn from(err: MissionError) -> Self {
        match err {
            MissionError::Trajectory(inner) => inner.into(),
            MissionError::Fuel(inner) => inner.into(),
        }
    }
}

impl From<LaunchError> for ServiceError {
    fn from(err: LaunchError) -> Self {
        match err {
            LaunchError::Geometry(inner) => inner.into(),
            LaunchError::DateOutOfRange { .. } => ServiceError::Numeric(err.to_string()),
        }
    }
}

impl From<FlybyError> for ServiceError {
    fn from(err: FlybyError) -> Self {
        match err {
            FlybyError::UnknownBody(_) | FlybyError::RouteTooShort => {
                ServiceError::InvalidInput(err.to_string())
            }
            _ => ServiceError::Numeric(err.to_string()),
        }
    }
}

impl From<TrackerError> for ServiceError {
    fn from(err: TrackerError) -> Self {
        match err {
            TrackerError::NotFound(_) => ServiceError::NotFound(err.to_string()),
            TrackerError::AlreadyExists(_) => ServiceError::InvalidInput(err.to_string()),
            _ => ServiceError::Numeric(err.to_string()),
        }
    }
}

impl From<DesignError> for ServiceError {
    fn from(err: DesignError) -> Self {
        ServiceError::InvalidInput(err.to_string())
    }
}

impl From<TutorialError> for ServiceError {
    fn from(err: TutorialError) -> Self {
        ServiceError::NotFound(err.to_string())
    }
}

/// Status code plus JSON body, as written by the `serve` loop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn error(err: &ServiceError) -> Self {
        Self {
            status: err.status_code(),
            body: json!({ "error": err.to_string() }),
        }
    }
}

impl From<Result<Value, ServiceError>> for Response {
    fn from(result: Result<Value, ServiceError>) -> Self {
        match result {
            Ok(body) => Response::ok(body),
            Err(err) => Response::error(&err),
        }
    }
}
