//! `depscope ego` command implementation.

use anyhow::Result;
use colored::Colorize;
use depscope::Snapshot;

use super::display::{cycle_path, print_file_refs};
use super::print_json;

/// Run the ego command.
pub fn run(snapshot: &Snapshot, file: &str, json: bool) -> Result<()> {
    let ego = snapshot.ego_graph(file)?;

    if json {
        return print_json(&ego);
    }

    println!("{}", ego.file.cyan().bold());
    println!(
        "  {} {}  {} {}",
        "module:".dimmed(),
        ego.module_name,
        "language:".dimmed(),
        ego.language
    );

    let mut roles = Vec::new();
    if ego.is_root {
        roles.push("root");
    }
    if ego.is_leaf {
        roles.push("leaf");
    }
    if !roles.is_empty() {
        println!("  {} {}", "role:".dimmed(), roles.join(", "));
    }
    println!();

    println!(
        "  {} ({}):",
        "Imports".white().bold(),
        ego.imports_count.to_string().green()
    );
    print_file_refs(&ego.imports, "(none)");
    println!();

    println!(
        "  {} ({}):",
        "Imported by".white().bold(),
        ego.imported_by_count.to_string().green()
    );
    print_file_refs(&ego.imported_by, "(none)");

    if !ego.external_deps.is_empty() {
        println!();
        println!("  {}:", "External".white().bold());
        for name in &ego.external_deps {
            println!("    {} {}", "•".dimmed(), name);
        }
    }

    if ego.in_circular_dependency {
        println!();
        println!(
            "  {}: part of {} reported cycle(s)",
            "Circular".red().bold(),
            ego.circular_cycles.len()
        );
        for cycle in &ego.circular_cycles {
            println!("    {}", cycle_path(cycle).dimmed());
        }
    }

    Ok(())
}
