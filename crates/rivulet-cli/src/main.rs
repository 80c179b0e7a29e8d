//! Rivulet CLI - Command-line interface for rivulet connector graphs.

mod commands;
mod progress;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rivulet_config::RuntimeConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rivulet")]
#[command(author, version, about = "Rivulet reactive connector CLI", long_about = None)]
struct Cli {
    /// Runtime configuration file (defaults to config.toml in the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a patch file and print its outputs
    Run(commands::run::RunArgs),

    /// List available modules and their connectors
    Modules(commands::modules::ModulesArgs),

    /// Walk through a small connected graph step by step
    Demo(commands::demo::DemoArgs),

    /// Show or initialize the runtime configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // `config --init` must work before any config file exists.
    let config = match &cli.command {
        Commands::Config(args) if args.init => RuntimeConfig::default(),
        _ => RuntimeConfig::resolve(cli.config.as_deref())?,
    };

    let default_filter = config.log_filter.clone().unwrap_or_else(|| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(mode = config.connectors.name(), "starting rivulet");

    match cli.command {
        Commands::Run(args) => commands::run::run(args, &config),
        Commands::Modules(args) => commands::modules::run(args),
        Commands::Demo(args) => commands::demo::run(args),
        Commands::Config(args) => commands::config::run(args, &config, cli.config.as_deref()),
    }
}
