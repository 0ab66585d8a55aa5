//! Headless tools for the waypoint planner.
//!
//! Run with: `cargo run -p arena-cli -- <command>`

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Replay, ShowConfig};

/// Headless tools for the waypoint planner
#[derive(Parser)]
#[command(name = "arena")]
#[command(about = "Replay scenarios through the waypoint planner", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Run a scenario through one planner and print each frame's selection
    Replay(Replay),

    /// Print the effective planner configuration
    Config(ShowConfig),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Replay(cmd) => cmd.execute(),
        Command::Config(cmd) => cmd.execute(),
    }
}
