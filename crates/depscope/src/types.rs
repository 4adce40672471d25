//! Domain types for depscope.
//!
//! These types represent the core domain model:
//! - **Input**: `ProjectScan`, `ScanFile`, `ImportTarget` (what the upstream scanner hands us)
//! - **Entities**: `FileNode` (owned by the graph arena, addressed by `FileId`)
//! - **Results**: `Cycle` (computed once per snapshot)
//!
//! ## Design Decisions
//!
//! | Decision | Choice | Rationale |
//! |----------|--------|-----------|
//! | Paths | `String`, not `PathBuf` | Paths are project-relative identifiers echoed verbatim in JSON |
//! | Language | `String`, not enum | The tag comes from the scanner; we never interpret it |
//! | Node handle | `FileId` over arena index | No cyclic ownership; snapshots stay trivially immutable |

use serde::{Deserialize, Serialize};

// ============================================================================
// Strongly-typed ID wrappers
// ============================================================================

/// Handle to a file node inside one [`DependencyGraph`](crate::DependencyGraph).
///
/// Handles are dense, assigned in input order starting at zero, and are only
/// meaningful for the graph that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub usize);

impl FileId {
    /// Extract the raw arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for FileId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

// ============================================================================
// Input records
// ============================================================================

/// The full output of one scan of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectScan {
    /// Stable identifier of the project
    pub project_id: String,
    /// Display name of the project
    pub project_name: String,
    /// Every scanned file, in scanner order
    pub files: Vec<ScanFile>,
}

impl ProjectScan {
    /// Create a scan from its parts.
    #[must_use]
    pub fn new(
        project_id: impl Into<String>,
        project_name: impl Into<String>,
        files: Vec<ScanFile>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            project_name: project_name.into(),
            files,
        }
    }
}

/// One scanned file with its already-resolved imports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanFile {
    /// Project-relative path, unique within the scan
    pub path: String,
    /// Language-specific logical identifier (e.g. `app.models.user`)
    pub module_name: String,
    /// Language tag reported by the scanner
    pub language: String,
    /// Import targets, classified as internal paths or external names
    #[serde(default)]
    pub imports: Vec<ImportTarget>,
}

impl ScanFile {
    /// Create a file record with no imports.
    #[must_use]
    pub fn new(
        path: impl Into<String>,
        module_name: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            module_name: module_name.into(),
            language: language.into(),
            imports: Vec::new(),
        }
    }

    /// Add an import of another project file.
    #[must_use]
    pub fn importing(mut self, path: impl Into<String>) -> Self {
        self.imports.push(ImportTarget::Internal(path.into()));
        self
    }

    /// Add an import of an external package or unresolved symbol.
    #[must_use]
    pub fn importing_external(mut self, name: impl Into<String>) -> Self {
        self.imports.push(ImportTarget::External(name.into()));
        self
    }
}

/// An import target as classified by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportTarget {
    /// A project-relative path of another scanned file
    Internal(String),
    /// A name that does not resolve to a project file
    External(String),
}

// ============================================================================
// Graph entities
// ============================================================================

/// A project file in the dependency graph.
///
/// Immutable for the lifetime of one snapshot; re-analysis builds new nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileNode {
    /// Project-relative path (node identity)
    pub path: String,
    /// Language-specific logical identifier
    pub module_name: String,
    /// Language tag
    pub language: String,
    /// Imports that did not resolve to a project file, first-seen order
    pub external_deps: Vec<String>,
}

/// An elementary circular dependency.
///
/// Files are listed in edge order starting from the lexicographically
/// smallest path; the closing edge back to `files[0]` is implied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Cycle {
    /// Files involved in the cycle, in dependency order
    pub files: Vec<String>,
}

impl Cycle {
    /// Number of distinct files in the cycle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Always `false` for cycles produced by the detector.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Whether `path` participates in this cycle.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.files.iter().any(|f| f == path)
    }
}
