//! Integration tests for the depscope CLI.
//!
//! These tests run the built binary against scan files written to a
//! temporary directory.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use rstest::{fixture, rstest};
use serde_json::Value;
use tempfile::TempDir;

const SCAN: &str = r#"{
    "project_id": "demo",
    "project_name": "Demo",
    "files": [
        {"path": "app.py", "module_name": "app", "language": "python",
         "imports": [{"internal": "models.py"}, {"internal": "views.py"}, {"external": "flask"}]},
        {"path": "views.py", "module_name": "views", "language": "python",
         "imports": [{"internal": "models.py"}, {"internal": "app.py"}]},
        {"path": "models.py", "module_name": "models", "language": "python",
         "imports": [{"internal": "gone.py"}]},
        {"path": "build.rs", "module_name": "build", "language": "rust"}
    ]
}"#;

struct Workspace {
    _dir: TempDir,
    scan: PathBuf,
}

impl Workspace {
    fn run(&self, args: &[&str]) -> Output {
        run_depscope(&self.scan, args)
    }

    fn json(&self, args: &[&str]) -> Value {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "depscope {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
    }
}

fn run_depscope(scan: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_depscope"))
        .arg("--scan")
        .arg(scan)
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute depscope")
}

// ============================================================================
// Test Fixtures
// ============================================================================

/// Provides a temporary directory containing `scan.json`
#[fixture]
fn workspace() -> Workspace {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let scan = dir.path().join("scan.json");
    std::fs::write(&scan, SCAN).expect("Failed to write scan");
    Workspace { _dir: dir, scan }
}

// ============================================================================
// JSON output
// ============================================================================

#[rstest]
fn summary_json(workspace: Workspace) {
    let summary = workspace.json(&["summary", "--json"]);

    assert_eq!(summary["project_id"], "demo");
    assert_eq!(summary["stats"]["total_files"], 4);
    assert_eq!(summary["stats"]["total_dependencies"], 4);
    assert_eq!(summary["circular_dependencies"]["count"], 1);
    assert_eq!(summary["most_imported"][0]["file"], "models.py");
}

#[rstest]
fn summary_top_limits_rankings(workspace: Workspace) {
    let summary = workspace.json(&["summary", "--top", "1", "--json"]);

    assert_eq!(summary["most_imported"].as_array().map(Vec::len), Some(1));
    assert_eq!(summary["most_dependencies"].as_array().map(Vec::len), Some(1));
}

#[rstest]
fn ego_json(workspace: Workspace) {
    let ego = workspace.json(&["ego", "models.py", "--json"]);

    assert_eq!(ego["imported_by_count"], 2);
    assert_eq!(ego["is_leaf"], true);
    assert_eq!(ego["external_deps"][0], "gone.py");
}

#[rstest]
#[case::all(&["files", "--json"], 4, 4)]
#[case::language(&["files", "--language", "rust", "--json"], 1, 1)]
#[case::paged(&["files", "--offset", "1", "--limit", "2", "--json"], 2, 4)]
fn files_json(
    workspace: Workspace,
    #[case] args: &[&str],
    #[case] shown: usize,
    #[case] total: u64,
) {
    let list = workspace.json(args);

    assert_eq!(list["files"].as_array().map(Vec::len), Some(shown));
    assert_eq!(list["total"], total);
}

#[rstest]
fn cycles_json(workspace: Workspace) {
    let cycles = workspace.json(&["cycles", "--json"]);

    assert_eq!(cycles["has_circular"], true);
    assert_eq!(cycles["cycles"][0]["files"], serde_json::json!(["app.py", "views.py"]));
}

// ============================================================================
// Human output
// ============================================================================

#[rstest]
fn cycles_human_output_closes_loop(workspace: Workspace) {
    let output = workspace.run(&["cycles"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("app.py → views.py → app.py"), "got: {stdout}");
}

#[rstest]
fn summary_human_output(workspace: Workspace) {
    let output = workspace.run(&["summary"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Demo"));
    assert!(stdout.contains("Most imported"));
}

// ============================================================================
// Failures
// ============================================================================

#[rstest]
fn unknown_file_fails(workspace: Workspace) {
    let output = workspace.run(&["ego", "nope.py"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nope.py"), "got: {stderr}");
}

#[rstest]
fn invalid_config_fails(workspace: Workspace) {
    let config = workspace.scan.with_file_name("depscope.yaml");
    std::fs::write(&config, "top-n: 0\n").expect("Failed to write config");

    let output = workspace.run(&["--config", config.to_str().expect("utf-8 path"), "summary"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("top-n"), "got: {stderr}");
}

#[test]
fn malformed_scan_fails() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let scan = dir.path().join("scan.json");
    std::fs::write(
        &scan,
        r#"{"project_id": "p", "project_name": "P", "files": [
            {"path": "/abs.py", "module_name": "abs", "language": "python"}
        ]}"#,
    )
    .expect("Failed to write scan");

    let output = run_depscope(&scan, &["summary"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("malformed input"), "got: {stderr}");
}
