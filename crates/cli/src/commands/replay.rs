//! Replay a scenario through one planner.
//!
//! Prints one line per frame: the selected target, its score and ETA, and the
//! forecast. With `--json` every frame becomes a JSON object on its own line;
//! a frame without a target has `"target": null`, `"score": "-inf"` and
//! `"estimated_time_to_target": "inf"`.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;

use arena_content::ScenarioLoader;
use waypoint_planner::{ObjectivePlanner, PlannerEvent, RecordingSink, SelectionResult};

/// Run a scenario through one planner and print each frame's selection
#[derive(Parser)]
pub struct Replay {
    /// RON scenario file
    #[arg(short, long, value_name = "RON")]
    scenario: PathBuf,

    /// TOML file with planner overrides
    #[arg(short, long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Emit JSON lines instead of text
    #[arg(long)]
    json: bool,

    /// Include planner events for each frame
    #[arg(long)]
    events: bool,
}

#[derive(serde::Serialize)]
struct FrameReport<'a> {
    frame: usize,
    time: f32,
    result: &'a SelectionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<&'a [PlannerEvent]>,
}

impl Replay {
    pub fn execute(self) -> Result<()> {
        let config = super::load_config(self.config.as_deref())?;
        let scenario = ScenarioLoader::load(&self.scenario)?;
        let mut planner = ObjectivePlanner::with_sink(config, RecordingSink::new())
            .context("Failed to build planner")?;

        tracing::info!(
            "Replaying '{}' ({} frames, {:.1}s)",
            scenario.name,
            scenario.len(),
            scenario.duration()
        );

        for (index, frame) in scenario.frames.iter().enumerate() {
            let result = planner.select_best_objective(frame.agent.as_ref(), &frame.world);
            let events = planner.sink_mut().drain();

            if self.json {
                let report = FrameReport {
                    frame: index,
                    time: frame.world.time,
                    result: &result,
                    events: self.events.then_some(events.as_slice()),
                };
                println!("{}", serde_json::to_string(&report).context("Failed to encode frame")?);
            } else {
                println!("{}", describe(index, frame.world.time, &result));
                if self.events {
                    for event in &events {
                        println!("      {}", style(format!("{event:?}")).dim());
                    }
                }
            }
        }

        tracing::info!(
            "Done: final target {:?}, interval {:.3}s",
            planner.current_target(),
            planner.interval()
        );
        Ok(())
    }
}

fn describe(index: usize, time: f32, result: &SelectionResult) -> String {
    let Some(target) = &result.target else {
        return format!("[{index:>3}] t={time:>6.2}  {}", style("no target").yellow());
    };
    let forecast: Vec<String> = result
        .future_objectives
        .iter()
        .map(|o| o.id.to_string())
        .collect();
    format!(
        "[{index:>3}] t={time:>6.2}  target={} ({})  score={:>7.3}  eta={:>6.2}  next=[{}]",
        style(target.id).green().bold(),
        target.owner,
        result.score,
        result.estimated_time_to_target,
        forecast.join(", ")
    )
}
