//! rankfid-cli: run the aggregation robustness study from the command line.
//!
//! Loads a configuration (defaults, optional file, `RANKFID_*` environment),
//! applies flag overrides, runs the pipeline once, and prints a text summary
//! or writes a JSON report.

mod report;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rankfid_core::config::SimulationConfig;
use rankfid_sim::Simulation;
use tracing::info;

/// Monte Carlo study of sum vs. product rating aggregation under noise.
#[derive(Parser, Debug)]
#[command(name = "rankfid-cli", version, about)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, default_value = "text", global = true)]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the simulation and report the evaluation table.
    Run(RunArgs),
    /// Print the resolved configuration as JSON.
    Config(ConfigArgs),
}

#[derive(Args, Debug, Default)]
struct Overrides {
    /// Configuration file (TOML, JSON or YAML, by extension).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of simulated entities.
    #[arg(long)]
    population: Option<usize>,

    /// Latent attributes per entity.
    #[arg(long)]
    attributes: Option<usize>,
}

impl Overrides {
    /// Load the layered configuration and apply flag overrides last.
    fn resolve(&self) -> Result<SimulationConfig> {
        let mut cfg = SimulationConfig::load(self.config.as_deref())
            .context("failed to load configuration")?;
        if let Some(seed) = self.seed {
            cfg.seed = seed;
        }
        if let Some(population) = self.population {
            cfg.population_size = population;
        }
        if let Some(attributes) = self.attributes {
            cfg.attribute_count = attributes;
        }
        cfg.validate().context("invalid configuration")?;
        Ok(cfg)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    overrides: Overrides,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Write the report to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Include the raw per-entity series in JSON output.
    #[arg(long)]
    include_series: bool,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(flatten)]
    overrides: Overrides,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, &cli.log_format);

    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Config(args) => show_config(args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let cfg = args.overrides.resolve()?;
    let simulation = Simulation::new(cfg).context("invalid configuration")?;
    let result = simulation.run().context("simulation failed")?;

    let rendered = match args.format {
        OutputFormat::Text => report::render_text(&result),
        OutputFormat::Json => report::render_json(&result, args.include_series)?,
    };

    match args.output {
        Some(path) => {
            fs::write(&path, rendered)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn show_config(args: ConfigArgs) -> Result<()> {
    let cfg = args.overrides.resolve()?;
    println!("{}", serde_json::to_string_pretty(&cfg)?);
    Ok(())
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Logs go to stderr so stdout carries only the report.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
