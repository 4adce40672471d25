//! Active snapshot per project.
//!
//! [`SnapshotStore`] maps project ids to the current `Arc<Snapshot>`.
//! Publishing swaps the `Arc` under the map's shard lock; readers that already
//! cloned the previous `Arc` keep using it until they drop it.
//!
//! Versions come from a store-wide counter taken *before* analysis starts, so
//! when two analyses of the same project race, the one that started later wins
//! regardless of which finishes first.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::contracts::{CircularDependenciesInfo, DependencyFileList, DependencySummary, FileEgoGraph};
use crate::error::{Error, Result};
use crate::snapshot::{fingerprint, Snapshot};
use crate::summary::FileListQuery;
use crate::types::ProjectScan;

/// Concurrent registry of the active snapshot for each project.
#[derive(Debug)]
pub struct SnapshotStore {
    config: AnalysisConfig,
    snapshots: DashMap<String, Arc<Snapshot>>,
    next_version: AtomicU64,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl SnapshotStore {
    /// Create an empty store that analyzes with `config`.
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            snapshots: DashMap::new(),
            next_version: AtomicU64::new(1),
        }
    }

    /// Configuration used for every analysis.
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze `scan` and publish the result as the project's active snapshot.
    ///
    /// Returns the snapshot that is active once this call completes. That is
    /// the existing one when the scan's fingerprint matches it, or when a
    /// newer analysis was published while this one ran.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedInput` if the scan is invalid. The active
    /// snapshot, if any, is left in place.
    pub fn analyze(&self, scan: &ProjectScan) -> Result<Arc<Snapshot>> {
        let fingerprint = fingerprint(scan)?;

        if let Some(active) = self.get(&scan.project_id) {
            if active.fingerprint() == fingerprint {
                debug!(
                    project_id = %scan.project_id,
                    version = active.version(),
                    "Scan unchanged, reusing active snapshot"
                );
                return Ok(active);
            }
        }

        let version = self.next_version.fetch_add(1, Ordering::Relaxed);
        let snapshot = Snapshot::analyze_fingerprinted(scan, &self.config, version, fingerprint)?;
        Ok(self.publish(snapshot))
    }

    /// Publish an externally built snapshot.
    ///
    /// The snapshot replaces the active one only if its version is newer.
    /// Returns whichever snapshot is active afterwards. Later analyses always
    /// draw a version above any published one.
    pub fn publish(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        self.next_version
            .fetch_max(snapshot.version().saturating_add(1), Ordering::Relaxed);

        match self.snapshots.entry(snapshot.project_id().to_string()) {
            Entry::Occupied(mut entry) => {
                if entry.get().version() >= snapshot.version() {
                    debug!(
                        project_id = %snapshot.project_id(),
                        version = snapshot.version(),
                        active_version = entry.get().version(),
                        "Discarding stale snapshot"
                    );
                    return Arc::clone(entry.get());
                }
                let snapshot = Arc::new(snapshot);
                log_published(&snapshot);
                entry.insert(Arc::clone(&snapshot));
                snapshot
            }
            Entry::Vacant(entry) => {
                let snapshot = Arc::new(snapshot);
                log_published(&snapshot);
                entry.insert(Arc::clone(&snapshot));
                snapshot
            }
        }
    }

    /// The active snapshot for `project_id`.
    #[must_use]
    pub fn get(&self, project_id: &str) -> Option<Arc<Snapshot>> {
        self.snapshots
            .get(project_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Drop the active snapshot for `project_id`, returning it.
    pub fn remove(&self, project_id: &str) -> Option<Arc<Snapshot>> {
        self.snapshots.remove(project_id).map(|(_, snapshot)| snapshot)
    }

    /// Every project with an active snapshot, sorted.
    #[must_use]
    pub fn project_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .snapshots
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Summary of the active snapshot, using the configured ranking length
    /// unless `top_n` is given.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProjectNotFound` if no snapshot is active for the id.
    pub fn summary(&self, project_id: &str, top_n: Option<usize>) -> Result<DependencySummary> {
        let snapshot = self.require(project_id)?;
        Ok(top_n.map_or_else(|| snapshot.summary_default(), |n| snapshot.summary(n)))
    }

    /// Ego graph of one file in the active snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProjectNotFound` for an unknown project and
    /// `Error::NotFound` for an unknown file.
    pub fn ego_graph(&self, project_id: &str, path: &str) -> Result<FileEgoGraph> {
        self.require(project_id)?.ego_graph(path)
    }

    /// File listing from the active snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProjectNotFound` if no snapshot is active for the id.
    pub fn file_list(&self, project_id: &str, query: &FileListQuery) -> Result<DependencyFileList> {
        Ok(self.require(project_id)?.file_list(query))
    }

    /// Circular dependencies of the active snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProjectNotFound` if no snapshot is active for the id.
    pub fn circular_dependencies(&self, project_id: &str) -> Result<CircularDependenciesInfo> {
        Ok(self.require(project_id)?.circular_dependencies())
    }

    fn require(&self, project_id: &str) -> Result<Arc<Snapshot>> {
        self.get(project_id)
            .ok_or_else(|| Error::ProjectNotFound(project_id.to_string()))
    }
}

fn log_published(snapshot: &Snapshot) {
    info!(
        project_id = %snapshot.project_id(),
        version = snapshot.version(),
        files = snapshot.graph().file_count(),
        dependencies = snapshot.graph().dependency_count(),
        cycles = snapshot.cycles().cycles().len(),
        "Published snapshot"
    );
}
