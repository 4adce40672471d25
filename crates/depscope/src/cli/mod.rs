//! CLI command implementations.

mod display;

pub mod cycles;
pub mod ego;
pub mod files;
pub mod summary;

use std::path::Path;

use anyhow::{Context, Result};
use depscope::{AnalysisConfig, ProjectScan, Snapshot};
use tracing::debug;

/// Read the scan and optional config, then analyze once.
pub fn load_snapshot(scan_path: &Path, config_path: Option<&Path>) -> Result<Snapshot> {
    let config = match config_path {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    let content = std::fs::read_to_string(scan_path)
        .with_context(|| format!("Failed to read scan {}", scan_path.display()))?;
    let scan: ProjectScan = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse scan {}", scan_path.display()))?;
    debug!(
        path = %scan_path.display(),
        project_id = %scan.project_id,
        files = scan.files.len(),
        "Loaded scan"
    );

    Snapshot::analyze(&scan, &config, 1)
        .with_context(|| format!("Failed to analyze project {}", scan.project_id))
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
