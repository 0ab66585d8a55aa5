mod config;
mod replay;

pub use config::ShowConfig;
pub use replay::Replay;

use std::path::Path;

use anyhow::Result;
use arena_content::ConfigLoader;
use arena_core::PlannerConfig;

/// Loads the config at `path`, or the defaults when none is given.
pub(crate) fn load_config(path: Option<&Path>) -> Result<PlannerConfig> {
    match path {
        Some(path) => ConfigLoader::load(path),
        None => Ok(PlannerConfig::default()),
    }
}
