//! Meterboard CLI
//!
//! Terminal client for the damage/healing meter:
//! - Watch live or simulated statistics
//! - Take a one-off snapshot
//! - Clear statistics
//! - Generate a default config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use meterboard::config::{generate_default_config, Config};
use meterboard::report::{self, SortKey, View};
use meterboard::simulator::Simulator;
use meterboard::source::{select_source, MeterSource};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "meterboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Damage/healing meter for the terminal")]
#[command(long_about = "Meterboard polls a combat meter backend and renders per-player damage and healing.\nWithout a backend it can serve a simulated fight instead.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Meter backend URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Force the simulated feed
    #[arg(long, global = true, conflicts_with = "live")]
    pub mock: bool,

    /// Force the live backend
    #[arg(long, global = true)]
    pub live: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Continuously poll and render statistics
    Watch {
        /// View to render
        #[arg(short, long, value_enum, default_value_t)]
        view: View,
        /// Ranking order
        #[arg(short, long, value_enum, default_value_t)]
        sort: SortKey,
        /// Poll interval in milliseconds (default: from config)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Fetch and print statistics once
    Snapshot {
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
        /// View to render for table output
        #[arg(short, long, value_enum, default_value_t)]
        view: View,
        /// Ranking order
        #[arg(short, long, value_enum, default_value_t)]
        sort: SortKey,
    },

    /// Clear all statistics
    Clear,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write {:?}", path))?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let config = load_config(&cli)?;
    meterboard::logging::init(&config.logging);

    let simulator = config
        .source
        .use_mock()
        .then(|| Arc::new(Simulator::new(config.simulator.clone())));
    let source = select_source(&config.source, simulator.clone())
        .context("Failed to create meter source")?;

    if let Some(simulator) = &simulator {
        simulator.start().await;
    }

    let result = match cli.command {
        Commands::Watch {
            view,
            sort,
            interval,
        } => {
            let interval = interval.unwrap_or(config.source.poll_interval_ms);
            watch(source.as_ref(), view, sort, Duration::from_millis(interval.max(50))).await
        }

        Commands::Snapshot { format, view, sort } => {
            let snapshot = source
                .fetch_snapshot()
                .await
                .with_context(|| format!("Failed to fetch from {} source", source.name()))?;

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print!("{}", report::render(&snapshot, view, sort));
            }
            Ok(())
        }

        Commands::Clear => {
            let ack = source
                .clear_snapshot()
                .await
                .with_context(|| format!("Failed to clear {} source", source.name()))?;
            println!("{}", ack.msg);
            Ok(())
        }

        Commands::Config { .. } => Ok(()),
    };

    if let Some(simulator) = &simulator {
        simulator.stop().await;
    }
    result
}

/// Load config from `--config` or default locations, then apply CLI flags
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    if let Some(url) = &cli.base_url {
        config.source.base_url = url.clone();
    }
    if cli.mock {
        config.source.dev_mode = true;
        config.source.mock_enabled = true;
    }
    if cli.live {
        config.source.mock_enabled = false;
    }

    Ok(config)
}

/// Poll the source until Ctrl+C
///
/// A failed poll is reported and the next one is attempted on schedule.
async fn watch(
    source: &dyn MeterSource,
    view: View,
    sort: SortKey,
    interval: Duration,
) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => break,
        }

        match source.fetch_snapshot().await {
            Ok(snapshot) => {
                // clear screen, cursor home
                print!("\x1B[2J\x1B[H");
                println!(
                    "meterboard [{}] {}  (Ctrl+C to quit)",
                    source.name(),
                    chrono::Local::now().format("%H:%M:%S")
                );
                println!();
                print!("{}", report::render(&snapshot, view, sort));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Poll failed");
                eprintln!("Poll failed: {}", e);
            }
        }
    }

    Ok(())
}
