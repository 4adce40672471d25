//! Response shapes consumed by the client layer.
//!
//! Field names and presence are part of the contract; these structs are
//! serialized as-is. Everything here is a derived view of one snapshot and is
//! never stored independently.

// Field names mirror the wire contract and are self-describing.
#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

/// Whole-project dependency overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySummary {
    pub project_id: String,
    pub project_name: String,
    pub stats: DependencyStats,
    pub circular_dependencies: CircularDependenciesInfo,
    pub most_imported: Vec<FileCount>,
    pub most_dependencies: Vec<FileCount>,
}

/// Graph-level counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyStats {
    pub total_files: usize,
    pub total_dependencies: usize,
    pub max_depth: usize,
    pub leaf_files: usize,
    pub root_files: usize,
}

/// Every reported circular dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircularDependenciesInfo {
    pub count: usize,
    pub has_circular: bool,
    pub cycles: Vec<CycleInfo>,
    /// Set when at least one strongly connected component hit the
    /// enumeration bound. Omitted from JSON when `false`.
    #[serde(default, skip_serializing_if = "is_false")]
    pub truncated: bool,
}

/// One circular dependency as a path sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleInfo {
    pub files: Vec<String>,
    pub length: usize,
}

/// A ranking entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCount {
    pub file: String,
    pub count: usize,
}

/// One-hop neighborhood of a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEgoGraph {
    pub project_id: String,
    pub file: String,
    pub module_name: String,
    pub language: String,
    pub imports: Vec<FileRef>,
    pub imports_count: usize,
    pub imported_by: Vec<FileRef>,
    pub imported_by_count: usize,
    pub external_deps: Vec<String>,
    pub is_leaf: bool,
    pub is_root: bool,
    pub in_circular_dependency: bool,
    pub circular_cycles: Vec<Vec<String>>,
}

/// A neighbor reference inside an ego graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub file: String,
    pub module_name: String,
    pub language: String,
}

/// Flat listing of files with their degree counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyFileList {
    pub project_id: String,
    pub files: Vec<FileListEntry>,
    pub total: usize,
}

/// One row of a [`DependencyFileList`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileListEntry {
    pub file: String,
    pub module_name: String,
    pub language: String,
    pub imports_count: usize,
    pub imported_by_count: usize,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}
