//! Build a patch and report its outputs.

use clap::Args;
use rivulet_config::{ConnectorMode, Patch, Reading, RuntimeConfig, find_patch};
use rivulet_modules::ModuleRegistry;
use serde::Serialize;

use crate::progress::BarObserver;

#[derive(Args)]
pub struct RunArgs {
    /// Patch file, or the name of a patch in the user patches directory
    #[arg(value_name = "PATCH")]
    patch: String,

    /// Set an input after building (e.g. --set a.SetValue=7)
    #[arg(short, long = "set", value_name = "MODULE.CONNECTOR=VALUE")]
    sets: Vec<String>,

    /// Read an extra output (e.g. --read b.GetOutput)
    #[arg(short, long = "read", value_name = "MODULE.CONNECTOR")]
    reads: Vec<String>,

    /// Print readings as JSON
    #[arg(long)]
    json: bool,

    /// Show propagation progress on stderr
    #[arg(long)]
    progress: bool,

    /// Run without the connection graph
    #[arg(long)]
    pass_through: bool,
}

#[derive(Serialize)]
struct RunReport<'a> {
    patch: &'a str,
    mode: &'static str,
    skipped_connections: usize,
    readings: &'a [Reading],
}

pub fn run(args: RunArgs, config: &RuntimeConfig) -> anyhow::Result<()> {
    let path = find_patch(&args.patch)
        .ok_or_else(|| anyhow::anyhow!("Patch not found: {}", args.patch))?;
    let patch = Patch::load(&path)?;

    let mut config = config.clone();
    if args.pass_through {
        config.connectors = ConnectorMode::PassThrough;
    }
    let mut runtime = config.build_runtime();
    if args.progress {
        runtime.set_observer(Some(Box::new(BarObserver::new())));
    }

    let registry = ModuleRegistry::new();
    let built = patch.build(&registry, &mut *runtime)?;
    for assignment in &args.sets {
        built.assign(&mut *runtime, assignment)?;
    }

    let mut readings = built.read_all(&mut *runtime)?;
    for reference in &args.reads {
        readings.push(built.read(&mut *runtime, reference)?);
    }
    runtime.set_observer(None);

    if args.json {
        let report = RunReport {
            patch: &patch.name,
            mode: config.connectors.name(),
            skipped_connections: built.skipped_connections(),
            readings: &readings,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Patch: {} ({})", patch.name, config.connectors.name());
    if let Some(description) = &patch.description {
        println!("  {description}");
    }
    if built.skipped_connections() > 0 {
        println!(
            "  {} connection(s) skipped in pass-through mode",
            built.skipped_connections()
        );
    }
    println!();
    if readings.is_empty() {
        println!("No outputs to read. Add `reads` to the patch or pass --read.");
    }
    for reading in &readings {
        println!("  {reading}");
    }

    Ok(())
}
