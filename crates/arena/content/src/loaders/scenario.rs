//! Scenario loader.

use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::scenario::Scenario;

/// Loader for scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Load a scenario from a RON file.
    ///
    /// Fails when a frame's clock runs backwards, since the planner's cache
    /// and cooldowns assume a monotonic match clock.
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        let scenario = Self::parse(&content)?;
        tracing::debug!(
            "ScenarioLoader: loaded '{}' ({} frames) from {}",
            scenario.name,
            scenario.len(),
            path.display()
        );
        Ok(scenario)
    }

    /// Parse RON text into a scenario.
    pub fn parse(content: &str) -> LoadResult<Scenario> {
        let scenario: Scenario = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;

        if let Some(index) = scenario.first_time_regression() {
            anyhow::bail!(
                "Scenario '{}' frame {} goes back in time ({} < {})",
                scenario.name,
                index,
                scenario.frames[index].world.time,
                scenario.frames[index - 1].world.time
            );
        }
        Ok(scenario)
    }
}
