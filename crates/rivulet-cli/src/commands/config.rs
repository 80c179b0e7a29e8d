//! Show or initialize the runtime configuration.

use std::path::Path;

use clap::Args;
use rivulet_config::{DISABLE_ENV, RuntimeConfig, default_config_path};

#[derive(Args)]
pub struct ConfigArgs {
    /// Write a default configuration file if none exists
    #[arg(long)]
    pub init: bool,
}

pub fn run(args: ConfigArgs, config: &RuntimeConfig, explicit: Option<&Path>) -> anyhow::Result<()> {
    let path = explicit.map_or_else(default_config_path, Path::to_path_buf);

    if args.init {
        if path.exists() {
            println!("Config already exists: {}", path.display());
        } else {
            RuntimeConfig::default().save(&path)?;
            println!("Wrote {}", path.display());
        }
        return Ok(());
    }

    println!("Config file: {}{}", path.display(), if path.is_file() { "" } else { " (not found)" });
    println!("Override:    {DISABLE_ENV}");
    println!();
    print!("{}", config.to_toml()?);
    Ok(())
}
