//! # Depscope: File-Level Dependency Graph Analysis
//!
//! Depscope turns the output of a source scanner (files plus their already
//! resolved imports) into an import graph and answers structural questions
//! about it: which files form circular dependencies, how deep the import
//! hierarchy goes, which files are most imported, and what a single file's
//! one-hop neighborhood looks like.
//!
//! ## Design Philosophy
//!
//! - **Analyze once, read many** - Cycles and metrics are computed when a
//!   snapshot is built; every query afterwards is cheap assembly
//! - **Immutable snapshots** - A new scan produces a new snapshot that is
//!   swapped in atomically; readers are never interrupted
//! - **Degrade, don't fail** - Dense cycle clusters are reported as a bounded,
//!   flagged subset rather than an error
//! - **Library first, CLI second**
//!
//! ## Quick Start
//!
//! ```
//! use depscope::{ProjectScan, ScanFile, SnapshotStore};
//!
//! let store = SnapshotStore::default();
//! let scan = ProjectScan::new(
//!     "demo",
//!     "Demo",
//!     vec![
//!         ScanFile::new("app.py", "app", "python").importing("db.py"),
//!         ScanFile::new("db.py", "db", "python").importing_external("sqlite3"),
//!     ],
//! );
//!
//! store.analyze(&scan)?;
//!
//! let summary = store.summary("demo", None)?;
//! assert_eq!(summary.stats.max_depth, 1);
//!
//! let ego = store.ego_graph("demo", "db.py")?;
//! assert_eq!(ego.imported_by_count, 1);
//! # Ok::<(), depscope::Error>(())
//! ```

mod config;
mod contracts;
mod cycles;
mod ego;
mod error;
mod graph;
mod metrics;
mod snapshot;
mod store;
mod summary;
mod types;

pub use config::{AnalysisConfig, DEFAULT_MAX_CYCLES_PER_SCC, DEFAULT_TOP_N};
pub use contracts::{
    CircularDependenciesInfo, CycleInfo, DependencyFileList, DependencyStats, DependencySummary,
    FileCount, FileEgoGraph, FileListEntry, FileRef,
};
pub use cycles::{detect_cycles, CycleReport};
pub use ego::build_ego_graph;
pub use error::{Error, MalformedInput, MalformedInputKind, Result};
pub use graph::DependencyGraph;
pub use metrics::{compute_metrics, FileMetrics, GraphMetrics, Metrics};
pub use snapshot::{fingerprint, Snapshot};
pub use store::SnapshotStore;
pub use summary::{build_file_list, build_summary, FileListQuery};
pub use types::{Cycle, FileId, FileNode, ImportTarget, ProjectScan, ScanFile};
