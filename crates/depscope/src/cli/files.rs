//! `depscope files` command implementation.

use anyhow::Result;
use colored::Colorize;
use depscope::{FileListQuery, Snapshot};

use super::print_json;

/// Run the files command.
pub fn run(snapshot: &Snapshot, query: &FileListQuery, json: bool) -> Result<()> {
    let list = snapshot.file_list(query);

    if json {
        return print_json(&list);
    }

    if list.files.is_empty() {
        println!("{}", "No matching files.".yellow());
        return Ok(());
    }

    let width = list
        .files
        .iter()
        .map(|entry| entry.file.len())
        .max()
        .unwrap_or(0);

    println!(
        "  {}  {}  {}  {}",
        format!("{:<width$}", "FILE").white().bold(),
        format!("{:>7}", "IMPORTS").white().bold(),
        "IMPORTED BY".white().bold(),
        "LANGUAGE".white().bold()
    );
    for entry in &list.files {
        println!(
            "  {:<width$}  {:>7}  {:>11}  {}",
            entry.file,
            entry.imports_count,
            entry.imported_by_count,
            entry.language.dimmed()
        );
    }

    println!();
    println!(
        "Showing {} of {} matching files",
        list.files.len().to_string().green(),
        list.total.to_string().green()
    );

    Ok(())
}
