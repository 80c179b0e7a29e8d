//! Module listing and information command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use rivulet_core::Role;
use rivulet_modules::{ModuleCategory, ModuleRegistry};

#[derive(Args)]
pub struct ModulesArgs {
    /// Show connectors of a specific module type
    #[arg(value_name = "MODULE")]
    module: Option<String>,
}

pub fn run(args: ModulesArgs) -> anyhow::Result<()> {
    let registry = ModuleRegistry::new();

    if let Some(module_id) = &args.module {
        let id = module_id.to_ascii_lowercase();
        let descriptor = registry
            .get(&id)
            .ok_or_else(|| anyhow::anyhow!("Unknown module: {}", module_id))?;
        let specs = registry
            .connectors(&id)
            .ok_or_else(|| anyhow::anyhow!("Unknown module: {}", module_id))?;

        println!("{} ({})", descriptor.name, descriptor.id);
        println!("{}", "=".repeat(descriptor.name.len() + descriptor.id.len() + 3));
        println!();
        println!("{}", descriptor.description);
        println!();

        println!("Connectors:");
        println!();
        println!("  {:12}  {:12}  {:22}  {}", "Name", "Role", "Type", "Affects");
        println!("  {:12}  {:12}  {:22}  {}", "----", "----", "----", "-------");
        for spec in &specs {
            let value_type = spec.value_type.to_string();
            let affects = if spec.role == Role::Output {
                if spec.caching {
                    String::new()
                } else {
                    "(not cached)".to_string()
                }
            } else {
                spec.dependents.join(", ")
            };
            println!(
                "  {:12}  {:12}  {:22}  {}",
                spec.name,
                spec.role.name(),
                value_type,
                affects
            );
        }
    } else {
        println!("Available Modules");
        println!("=================");

        for category in [
            ModuleCategory::Source,
            ModuleCategory::Transform,
            ModuleCategory::Aggregate,
        ] {
            let modules = registry.modules_in_category(category);
            if modules.is_empty() {
                continue;
            }
            println!();
            println!("{} - {}", category.name(), category.description());
            for descriptor in modules {
                println!("  {:12} - {}", descriptor.id, descriptor.description);
            }
        }

        println!();
        println!("Use 'rivulet modules <name>' for connector details.");
    }

    Ok(())
}
