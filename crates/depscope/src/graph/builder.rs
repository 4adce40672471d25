//! Construction of a [`DependencyGraph`] from scanner output.
//!
//! Building is stateless and deterministic: identical input always yields the
//! same node handles and the same edge order. The whole build fails on the
//! first structural problem; callers never observe a partial graph.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use super::DependencyGraph;
use crate::error::{MalformedInput, MalformedInputKind, Result};
use crate::types::{FileNode, ImportTarget, ScanFile};

impl DependencyGraph {
    /// Build the import graph for one scan.
    ///
    /// Internal import targets that name no scanned file are recorded as
    /// external dependencies of the importing file rather than rejected, since
    /// partial scans are routine. Duplicate imports between the same pair of
    /// files collapse to a single edge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedInput`](crate::Error::MalformedInput) if a file
    /// path is empty or invalid, a path appears twice, an internal import target
    /// is not a valid project path, or an external name is blank.
    pub fn build(files: &[ScanFile]) -> Result<Self> {
        let mut inner: DiGraph<FileNode, ()> = DiGraph::with_capacity(files.len(), files.len());
        let mut by_path: HashMap<String, NodeIndex> = HashMap::with_capacity(files.len());

        for file in files {
            check_path(&file.path).map_err(|(kind, reason)| {
                MalformedInput::new(file.path.clone(), kind, format!("file path {reason}"))
            })?;

            if by_path.contains_key(&file.path) {
                return Err(MalformedInput::duplicate_path(&file.path).into());
            }

            let idx = inner.add_node(FileNode {
                path: file.path.clone(),
                module_name: file.module_name.clone(),
                language: file.language.clone(),
                external_deps: Vec::new(),
            });
            by_path.insert(file.path.clone(), idx);
        }

        let mut seen_edges: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();
        let mut demoted = 0usize;
        let mut duplicates = 0usize;

        for (position, file) in files.iter().enumerate() {
            let source = NodeIndex::new(position);
            let mut externals: Vec<String> = Vec::new();

            for target in &file.imports {
                match target {
                    ImportTarget::Internal(path) => {
                        check_path(path).map_err(|(_, reason)| {
                            MalformedInput::invalid_import_target(&file.path, path, reason)
                        })?;

                        if let Some(&dest) = by_path.get(path) {
                            if seen_edges.insert((source, dest)) {
                                inner.add_edge(source, dest, ());
                            } else {
                                duplicates += 1;
                            }
                        } else {
                            debug!(
                                source = %file.path,
                                target = %path,
                                "Import target not in scan, recording as external"
                            );
                            demoted += 1;
                            push_unique(&mut externals, path);
                        }
                    }
                    ImportTarget::External(name) => {
                        let name = name.trim();
                        if name.is_empty() {
                            return Err(MalformedInput::new(
                                file.path.clone(),
                                MalformedInputKind::EmptyExternalName,
                                "external import name is empty",
                            )
                            .into());
                        }
                        push_unique(&mut externals, name);
                    }
                }
            }

            inner[source].external_deps = externals;
        }

        debug!(
            file_count = inner.node_count(),
            dependency_count = inner.edge_count(),
            demoted_to_external = demoted,
            duplicate_imports = duplicates,
            "Built dependency graph"
        );

        Ok(Self { inner, by_path })
    }
}

/// Validate a project-relative path.
///
/// Returns the failure category and a short reason on rejection.
fn check_path(path: &str) -> std::result::Result<(), (MalformedInputKind, &'static str)> {
    if path.is_empty() {
        return Err((MalformedInputKind::EmptyPath, "is empty"));
    }
    if path.contains('\0') {
        return Err((MalformedInputKind::InvalidPath, "contains a NUL byte"));
    }
    if path.starts_with('/') || path.starts_with('\\') || has_drive_prefix(path) {
        return Err((MalformedInputKind::InvalidPath, "is absolute"));
    }
    if path.split(['/', '\\']).any(|segment| segment == "..") {
        return Err((MalformedInputKind::InvalidPath, "escapes the project root"));
    }
    Ok(())
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}
