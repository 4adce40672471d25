//! `depscope summary` command implementation.

use anyhow::Result;
use colored::Colorize;
use depscope::Snapshot;

use super::display::print_ranking;
use super::print_json;

/// Run the summary command.
pub fn run(snapshot: &Snapshot, top: Option<usize>, json: bool) -> Result<()> {
    let summary = match top {
        Some(n) => snapshot.summary(n),
        None => snapshot.summary_default(),
    };

    if json {
        return print_json(&summary);
    }

    println!(
        "{} {}",
        summary.project_name.cyan().bold(),
        format!("({})", summary.project_id).dimmed()
    );
    println!();

    let stats = &summary.stats;
    for (label, value) in [
        ("Files", stats.total_files),
        ("Dependencies", stats.total_dependencies),
        ("Max depth", stats.max_depth),
        ("Root files", stats.root_files),
        ("Leaf files", stats.leaf_files),
    ] {
        println!("  {}: {}", label.white().bold(), value.to_string().green());
    }
    println!();

    let circular = &summary.circular_dependencies;
    if circular.has_circular {
        println!(
            "  {}: {}{}",
            "Circular dependencies".white().bold(),
            circular.count.to_string().red().bold(),
            if circular.truncated {
                " (truncated)".yellow().to_string()
            } else {
                String::new()
            }
        );
    } else {
        println!(
            "  {}: {}",
            "Circular dependencies".white().bold(),
            "none".green()
        );
    }
    println!();

    println!("  {}:", "Most imported".white().bold());
    print_ranking(&summary.most_imported, "(no files)");
    println!();

    println!("  {}:", "Most dependencies".white().bold());
    print_ranking(&summary.most_dependencies, "(no files)");

    Ok(())
}
