//! Impulsive transfer utilities: classical two-burn transfer delta-v budgets.

pub mod transfers;

pub use transfers::{HohmannError, HohmannResult, delta_v_hohmann, hohmann};
