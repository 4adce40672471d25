//! `depscope cycles` command implementation.

use anyhow::Result;
use colored::Colorize;
use depscope::Snapshot;

use super::display::cycle_path;
use super::print_json;

/// Run the cycles command.
pub fn run(snapshot: &Snapshot, json: bool) -> Result<()> {
    let circular = snapshot.circular_dependencies();

    if json {
        return print_json(&circular);
    }

    if !circular.has_circular {
        println!("{}", "No circular dependencies detected.".green());
        return Ok(());
    }

    println!(
        "Found {} circular dependencies:",
        circular.count.to_string().red().bold()
    );
    println!();

    for (i, cycle) in circular.cycles.iter().enumerate() {
        println!(
            "  {} {} {}:",
            "Cycle".yellow().bold(),
            i + 1,
            format!("(length {})", cycle.length).dimmed()
        );
        println!("    {}", cycle_path(&cycle.files).dimmed());
    }

    if circular.truncated {
        println!();
        println!(
            "  {}: enumeration stopped at the per-component bound; more cycles exist",
            "Warning".yellow().bold()
        );
    }

    Ok(())
}
