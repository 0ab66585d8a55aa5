//! Print the effective planner configuration as TOML.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// Print the effective planner configuration
#[derive(Parser)]
pub struct ShowConfig {
    /// TOML file with overrides (defaults when omitted)
    #[arg(short, long, value_name = "TOML")]
    config: Option<PathBuf>,
}

impl ShowConfig {
    pub fn execute(self) -> Result<()> {
        let config = super::load_config(self.config.as_deref())?;
        let text = toml::to_string_pretty(&config).context("Failed to render config as TOML")?;
        print!("{text}");
        Ok(())
    }
}
