//! Common display utilities for CLI commands.

use colored::Colorize;
use depscope::{FileCount, FileRef};

const MAX_DISPLAY_ITEMS: usize = 10;

/// Render a cycle as `a → b → c → a`.
pub fn cycle_path(files: &[String]) -> String {
    let mut path = files.join(" → ");
    // Close the loop back to the first file
    if let Some(first) = files.first() {
        path.push_str(" → ");
        path.push_str(first);
    }
    path
}

/// Display neighbor references with truncation after `MAX_DISPLAY_ITEMS`.
pub fn print_file_refs(refs: &[FileRef], empty_message: &str) {
    if refs.is_empty() {
        println!("    {}", empty_message.dimmed());
        return;
    }

    for file_ref in refs.iter().take(MAX_DISPLAY_ITEMS) {
        println!(
            "    {} {} {}",
            "•".dimmed(),
            file_ref.file,
            format!("({})", file_ref.module_name).dimmed()
        );
    }

    if refs.len() > MAX_DISPLAY_ITEMS {
        println!(
            "    {} ... and {} more",
            "•".dimmed(),
            refs.len() - MAX_DISPLAY_ITEMS
        );
    }
}

/// Display a ranking as an aligned numbered list.
pub fn print_ranking(entries: &[FileCount], empty_message: &str) {
    if entries.is_empty() {
        println!("    {}", empty_message.dimmed());
        return;
    }

    let width = entries
        .iter()
        .map(|entry| entry.count.to_string().len())
        .max()
        .unwrap_or(1);
    for (i, entry) in entries.iter().enumerate() {
        println!(
            "    {:>2}. {}  {}",
            i + 1,
            format!("{:>width$}", entry.count).green(),
            entry.file
        );
    }
}
