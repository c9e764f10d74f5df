//! Mission planning, reference-data services and the request/response simulator.

pub mod history;
pub mod mission;
pub mod request;
pub mod service;
pub mod tutorials;

pub use facade::*;
pub use rocket_flyby as flyby;
pub use rocket_impulsive as impulsive;
pub use rocket_propulsion as propulsion;

mod facade;
