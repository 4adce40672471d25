//! The file-level import graph.
//!
//! `DependencyGraph` owns every [`FileNode`] and import edge of one project
//! snapshot. Nodes live in a petgraph arena addressed by [`FileId`]; edges are
//! handle pairs, so cycles in the import relation never become cycles in Rust
//! ownership.
//!
//! ## Invariants
//!
//! - Every edge's endpoints exist in the node set.
//! - There is at most one edge per ordered `(source, target)` pair.
//! - Edge indices follow input order, so "first import first" ordering can be
//!   recovered from the arena at any time.
//! - The graph is never mutated after [`DependencyGraph::build`] returns.

mod builder;

use std::collections::HashMap;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::types::{FileId, FileNode};

/// Directed graph of intra-project imports for one snapshot.
pub struct DependencyGraph {
    inner: DiGraph<FileNode, ()>,
    by_path: HashMap<String, NodeIndex>,
}

impl std::fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("file_count", &self.inner.node_count())
            .field("dependency_count", &self.inner.edge_count())
            .finish()
    }
}

impl DependencyGraph {
    /// Number of files (nodes).
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of distinct intra-project imports (edges).
    #[must_use]
    pub fn dependency_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Get a file by handle.
    #[must_use]
    pub fn file(&self, id: FileId) -> Option<&FileNode> {
        self.inner.node_weight(node_index(id))
    }

    /// Resolve a project path to its handle.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<FileId> {
        self.by_path.get(path).map(|&idx| file_id(idx))
    }

    /// Iterate over all files in input order.
    pub fn files(&self) -> impl Iterator<Item = (FileId, &FileNode)> {
        self.inner
            .node_indices()
            .map(move |idx| (file_id(idx), &self.inner[idx]))
    }

    /// Iterate over all edges in input order.
    pub fn edges(&self) -> impl Iterator<Item = (FileId, FileId)> + '_ {
        self.inner
            .raw_edges()
            .iter()
            .map(|edge| (file_id(edge.source()), file_id(edge.target())))
    }

    /// Files that `id` imports directly, in input order.
    #[must_use]
    pub fn imports_of(&self, id: FileId) -> Vec<FileId> {
        self.neighbors_in_input_order(id, Direction::Outgoing)
    }

    /// Files that import `id` directly, in input order of the importing edges.
    #[must_use]
    pub fn importers_of(&self, id: FileId) -> Vec<FileId> {
        self.neighbors_in_input_order(id, Direction::Incoming)
    }

    /// Number of files `id` imports.
    #[must_use]
    pub fn out_degree(&self, id: FileId) -> usize {
        self.inner
            .edges_directed(node_index(id), Direction::Outgoing)
            .count()
    }

    /// Number of files importing `id`.
    #[must_use]
    pub fn in_degree(&self, id: FileId) -> usize {
        self.inner
            .edges_directed(node_index(id), Direction::Incoming)
            .count()
    }

    /// Whether `id` imports itself.
    #[must_use]
    pub fn has_self_import(&self, id: FileId) -> bool {
        let idx = node_index(id);
        self.inner.find_edge(idx, idx).is_some()
    }

    /// The underlying petgraph arena, for algorithms in sibling modules.
    pub(crate) fn arena(&self) -> &DiGraph<FileNode, ()> {
        &self.inner
    }

    fn neighbors_in_input_order(&self, id: FileId, direction: Direction) -> Vec<FileId> {
        let mut edges: Vec<(EdgeIndex, NodeIndex)> = self
            .inner
            .edges_directed(node_index(id), direction)
            .map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                (edge.id(), other)
            })
            .collect();
        edges.sort_unstable_by_key(|(edge, _)| *edge);
        edges.into_iter().map(|(_, idx)| file_id(idx)).collect()
    }
}

pub(crate) fn node_index(id: FileId) -> NodeIndex {
    NodeIndex::new(id.index())
}

pub(crate) fn file_id(idx: NodeIndex) -> FileId {
    FileId(idx.index())
}
