//! Planner configuration loader.

use std::path::Path;

use arena_core::PlannerConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for planner tuning from TOML files.
///
/// Missing tables and keys fall back to the defaults, so a file only needs
/// to name the values it overrides.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate a [`PlannerConfig`] from a TOML file.
    pub fn load(path: &Path) -> LoadResult<PlannerConfig> {
        let content = read_file(path)?;
        let config = Self::parse(&content)?;
        tracing::debug!("ConfigLoader: loaded {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn parse(content: &str) -> LoadResult<PlannerConfig> {
        let config: PlannerConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse planner config TOML: {}", e))?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid planner config: {}", e))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(ConfigLoader::parse("").unwrap(), PlannerConfig::default());
    }

    #[test]
    fn partial_tables_override_only_named_keys() {
        let config = ConfigLoader::parse(
            r#"
            [graph]
            neighbor_count = 6

            [hysteresis]
            lock_window = 2.5
            "#,
        )
        .unwrap();

        assert_eq!(config.graph.neighbor_count, 6);
        assert_eq!(config.graph.max_depth, PlannerConfig::default().graph.max_depth);
        assert_eq!(config.hysteresis.lock_window, 2.5);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let text = "[cadence]\nmin_interval = 2.0\nmax_interval = 1.0\n";
        let err = ConfigLoader::parse(text).unwrap_err();
        assert!(err.to_string().contains("cadence.interval"), "{err}");
    }

    #[test]
    fn malformed_toml_is_reported() {
        let err = ConfigLoader::parse("[graph\nneighbor_count = 3").unwrap_err();
        assert!(err.to_string().contains("Failed to parse planner config TOML"));
    }
}
