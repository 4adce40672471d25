//! Immutable analysis results for one scan of one project.
//!
//! A [`Snapshot`] is built once by [`Snapshot::analyze`] and never mutated.
//! Cycle detection and metrics run exactly once during construction; every
//! read afterwards is assembly over cached results and safe to serve from any
//! number of threads.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::{debug, debug_span};

use crate::config::AnalysisConfig;
use crate::contracts::{CircularDependenciesInfo, DependencyFileList, DependencySummary, FileEgoGraph};
use crate::cycles::{detect_cycles, CycleReport};
use crate::ego::build_ego_graph;
use crate::error::Result;
use crate::graph::DependencyGraph;
use crate::metrics::{compute_metrics, Metrics};
use crate::summary::{build_file_list, build_summary, FileListQuery};
use crate::types::ProjectScan;

/// One analyzed version of a project.
#[derive(Debug)]
pub struct Snapshot {
    project_id: String,
    project_name: String,
    version: u64,
    analyzed_at: DateTime<Utc>,
    fingerprint: String,
    default_top_n: usize,
    graph: DependencyGraph,
    cycles: CycleReport,
    metrics: Metrics,
}

impl Snapshot {
    /// Build the graph and run every analysis for `scan`.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedInput` if the scan is structurally invalid and
    /// `Error::Json` if it cannot be fingerprinted.
    pub fn analyze(scan: &ProjectScan, config: &AnalysisConfig, version: u64) -> Result<Self> {
        Self::analyze_fingerprinted(scan, config, version, fingerprint(scan)?)
    }

    pub(crate) fn analyze_fingerprinted(
        scan: &ProjectScan,
        config: &AnalysisConfig,
        version: u64,
        fingerprint: String,
    ) -> Result<Self> {
        let span = debug_span!("analyze", project_id = %scan.project_id, version);
        let _guard = span.enter();

        let graph = DependencyGraph::build(&scan.files)?;
        let cycles = detect_cycles(&graph, config.max_cycles_per_scc);
        let metrics = compute_metrics(&graph, config.parallel_depth);

        debug!(
            files = graph.file_count(),
            dependencies = graph.dependency_count(),
            cycles = cycles.cycles().len(),
            truncated = cycles.is_truncated(),
            "Snapshot analyzed"
        );

        Ok(Self {
            project_id: scan.project_id.clone(),
            project_name: scan.project_name.clone(),
            version,
            analyzed_at: Utc::now(),
            fingerprint,
            default_top_n: config.top_n,
            graph,
            cycles,
            metrics,
        })
    }

    /// Project identifier.
    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Project display name.
    #[must_use]
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Monotonic version assigned at analysis time.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// When the analysis finished.
    #[must_use]
    pub fn analyzed_at(&self) -> DateTime<Utc> {
        self.analyzed_at
    }

    /// Hex SHA-256 of the scan this snapshot was built from.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// The underlying import graph.
    #[must_use]
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// The cached cycle report.
    #[must_use]
    pub fn cycles(&self) -> &CycleReport {
        &self.cycles
    }

    /// The cached metrics.
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Project summary with rankings of at most `top_n` entries.
    #[must_use]
    pub fn summary(&self, top_n: usize) -> DependencySummary {
        build_summary(
            &self.project_id,
            &self.project_name,
            &self.graph,
            &self.cycles,
            &self.metrics,
            top_n,
        )
    }

    /// Project summary using the configured ranking length.
    #[must_use]
    pub fn summary_default(&self) -> DependencySummary {
        self.summary(self.default_top_n)
    }

    /// Ego graph of one file.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if `path` is not in this snapshot.
    pub fn ego_graph(&self, path: &str) -> Result<FileEgoGraph> {
        build_ego_graph(
            &self.project_id,
            &self.graph,
            &self.cycles,
            &self.metrics,
            path,
        )
    }

    /// Files matching `query`.
    #[must_use]
    pub fn file_list(&self, query: &FileListQuery) -> DependencyFileList {
        build_file_list(&self.project_id, &self.graph, &self.metrics, query)
    }

    /// Every reported circular dependency.
    #[must_use]
    pub fn circular_dependencies(&self) -> CircularDependenciesInfo {
        self.cycles.info()
    }
}

/// Hex SHA-256 over the canonical JSON encoding of `scan`.
///
/// # Errors
///
/// Returns `Error::Json` if the scan cannot be serialized.
pub fn fingerprint(scan: &ProjectScan) -> Result<String> {
    let bytes = serde_json::to_vec(scan)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}
