//! Shared plumbing for the `mission` and `serve` binaries.

pub mod logger;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use rocket_simulation::config::{Catalog, Settings, load_catalog, load_settings};
use rocket_simulation::tracker::SystemClock;
use rocket_simulation::transfer::Simulator;

/// Where the simulator's reference data and limits come from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Directory with planets/missions/parts/routes/tutorials YAML (defaults to the built-in catalog)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Settings TOML (defaults to built-in limits)
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

impl SourceArgs {
    pub fn simulator(&self) -> anyhow::Result<Simulator> {
        let catalog = match &self.catalog {
            Some(dir) => load_catalog(dir)
                .with_context(|| format!("loading catalog from {}", dir.display()))?,
            None => Catalog::builtin().context("parsing built-in catalog")?,
        };
        let settings = match &self.settings {
            Some(path) => load_settings(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => Settings::default(),
        };
        Ok(Simulator::new(catalog, settings, Arc::new(SystemClock))?)
    }
}
