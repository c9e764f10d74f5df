//! Educational orbital-mechanics simulator.
//!
//! The computation core lives in member crates: transfer geometry in
//! [`orbits`], delta-v and fuel in [`impulsive`] and [`propulsion`], flyby
//! estimates in [`flyby`], live replay in [`tracker`] and scoring in
//! [`analytics`]. [`transfer`] composes them into mission plans and the
//! request/response [`transfer::Simulator`]. Keeping the logic in library
//! crates lets the CLI and the JSON-lines server share it.

pub use rocket_analytics as analytics;
pub use rocket_config as config;
pub use rocket_core as common;
pub use rocket_export as export;
pub use rocket_flyby as flyby;
pub use rocket_impulsive as impulsive;
pub use rocket_orbits as orbits;
pub use rocket_propulsion as propulsion;
pub use rocket_tracker as tracker;
pub use rocket_transfer as transfer;
