//! Re-exported APIs for consumers of the transfer crate.

pub use crate::history::{DatabaseStats, HistoricalComparison, MissionDatabase};
pub use crate::mission::launch::{
    LaunchEfficiency, LaunchError, LaunchWindow, launch_efficiency, launch_windows,
};
pub use crate::mission::{MissionConfig, MissionError, MissionProfile, plan_mission};
pub use crate::request::{Request, Response, ServiceError};
pub use crate::service::{
    DEFAULT_TARGET, DEPARTURE_BODY, SetupError, Simulator, TrackingStarted,
};
pub use crate::tutorials::{TutorialError, TutorialLibrary, TutorialStep, TutorialSummary};
pub use rocket_propulsion::{DesignRequest, FuelBudget, FuelModel, SpacecraftDesign, Vehicle};
