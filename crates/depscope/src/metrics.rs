//! Degree, depth and ranking metrics.
//!
//! ## Definitions
//!
//! | Metric | Meaning |
//! |--------|---------|
//! | root | in-degree zero (nothing in the project imports it) |
//! | leaf | out-degree zero (imports nothing in the project) |
//! | depth | longest shortest-path distance from any BFS seed that reaches the file |
//! | `max_depth` | largest per-file depth |
//!
//! ## Depth seeds
//!
//! BFS runs from one representative (smallest path) of every source component
//! of the SCC condensation. Every root is its own source component, so this is
//! "BFS from each root" plus one extra seed per cycle that nothing outside the
//! cycle imports. Every file is reachable from some source component, so every
//! file gets a finite depth. Each traversal visits a node at most once, so
//! cycles cannot cause loops.
//!
//! Traversals are independent and may run on the rayon pool; per-node results
//! are merged with `max`, which is order-independent.

use std::collections::VecDeque;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use rayon::prelude::*;
use tracing::debug;

use crate::graph::{node_index, DependencyGraph};
use crate::types::{FileId, FileNode};

/// Per-file metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetrics {
    /// Number of project files importing this file
    pub in_degree: usize,
    /// Number of project files this file imports
    pub out_degree: usize,
    /// Depth from the nearest-seed BFS (max over seeds)
    pub depth: usize,
    /// `out_degree == 0`
    pub is_leaf: bool,
    /// `in_degree == 0`
    pub is_root: bool,
}

/// Graph-level metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphMetrics {
    /// Largest per-file depth
    pub max_depth: usize,
    /// Files with out-degree zero
    pub leaf_files: usize,
    /// Files with in-degree zero
    pub root_files: usize,
    /// Total edge count
    pub total_dependencies: usize,
}

/// Metrics for one snapshot, including precomputed rankings.
#[derive(Debug, Clone)]
pub struct Metrics {
    files: Vec<FileMetrics>,
    graph: GraphMetrics,
    by_in_degree: Vec<FileId>,
    by_out_degree: Vec<FileId>,
}

impl Metrics {
    /// Metrics of one file.
    #[must_use]
    pub fn file(&self, id: FileId) -> Option<&FileMetrics> {
        self.files.get(id.index())
    }

    /// Graph-level metrics.
    #[must_use]
    pub fn graph(&self) -> &GraphMetrics {
        &self.graph
    }

    /// Every file, by in-degree descending then path ascending.
    #[must_use]
    pub fn ranked_by_in_degree(&self) -> &[FileId] {
        &self.by_in_degree
    }

    /// Every file, by out-degree descending then path ascending.
    #[must_use]
    pub fn ranked_by_out_degree(&self) -> &[FileId] {
        &self.by_out_degree
    }
}

/// Compute every metric for `graph` in one pass over edges plus the depth BFS.
///
/// With `parallel` set, the per-seed BFS traversals run on the rayon pool.
#[must_use]
pub fn compute_metrics(graph: &DependencyGraph, parallel: bool) -> Metrics {
    let n = graph.file_count();
    let mut in_degree = vec![0usize; n];
    let mut out_degree = vec![0usize; n];
    for (source, target) in graph.edges() {
        out_degree[source.index()] += 1;
        in_degree[target.index()] += 1;
    }

    let seeds = depth_seeds(graph);
    let depth = depths_from(graph.arena(), &seeds, parallel);

    let files: Vec<FileMetrics> = (0..n)
        .map(|i| FileMetrics {
            in_degree: in_degree[i],
            out_degree: out_degree[i],
            depth: depth[i],
            is_leaf: out_degree[i] == 0,
            is_root: in_degree[i] == 0,
        })
        .collect();

    let summary = GraphMetrics {
        max_depth: depth.iter().copied().max().unwrap_or(0),
        leaf_files: files.iter().filter(|m| m.is_leaf).count(),
        root_files: files.iter().filter(|m| m.is_root).count(),
        total_dependencies: graph.dependency_count(),
    };

    let arena = graph.arena();
    let by_in_degree = rank(arena, &in_degree);
    let by_out_degree = rank(arena, &out_degree);

    debug!(
        file_count = n,
        seed_count = seeds.len(),
        max_depth = summary.max_depth,
        root_files = summary.root_files,
        leaf_files = summary.leaf_files,
        parallel,
        "Metrics computed"
    );

    Metrics {
        files,
        graph: summary,
        by_in_degree,
        by_out_degree,
    }
}

/// One representative per source component of the condensation.
fn depth_seeds(graph: &DependencyGraph) -> Vec<NodeIndex> {
    let arena = graph.arena();
    let components = tarjan_scc(arena);

    let mut component_of = vec![0usize; arena.node_count()];
    for (c, members) in components.iter().enumerate() {
        for idx in members {
            component_of[idx.index()] = c;
        }
    }

    let mut entered = vec![false; components.len()];
    for (source, target) in graph.edges() {
        let (from, to) = (component_of[source.index()], component_of[target.index()]);
        if from != to {
            entered[to] = true;
        }
    }

    let mut seeds: Vec<NodeIndex> = components
        .iter()
        .zip(&entered)
        .filter(|(_, entered)| !**entered)
        .filter_map(|(members, _)| {
            members
                .iter()
                .copied()
                .min_by(|a, b| arena[*a].path.cmp(&arena[*b].path))
        })
        .collect();
    seeds.sort_unstable();
    seeds
}

fn depths_from(arena: &DiGraph<FileNode, ()>, seeds: &[NodeIndex], parallel: bool) -> Vec<usize> {
    let n = arena.node_count();
    if parallel {
        seeds
            .par_iter()
            .fold(
                || DepthWalker::new(n),
                |mut walker, &seed| {
                    walker.walk(arena, seed);
                    walker
                },
            )
            .reduce(|| DepthWalker::new(n), DepthWalker::merge)
            .depth
    } else {
        let mut walker = DepthWalker::new(n);
        for &seed in seeds {
            walker.walk(arena, seed);
        }
        walker.depth
    }
}

/// BFS scratch space reused across traversals on one worker.
///
/// `visited_in[v] == round` marks `v` as seen in the current traversal, so
/// nothing needs clearing between seeds.
struct DepthWalker {
    depth: Vec<usize>,
    visited_in: Vec<usize>,
    round: usize,
    queue: VecDeque<(NodeIndex, usize)>,
}

impl DepthWalker {
    fn new(n: usize) -> Self {
        Self {
            depth: vec![0; n],
            visited_in: vec![0; n],
            round: 0,
            queue: VecDeque::new(),
        }
    }

    fn walk(&mut self, arena: &DiGraph<FileNode, ()>, seed: NodeIndex) {
        self.round += 1;
        self.queue.clear();
        self.visited_in[seed.index()] = self.round;
        self.queue.push_back((seed, 0));

        while let Some((node, distance)) = self.queue.pop_front() {
            let slot = &mut self.depth[node.index()];
            *slot = (*slot).max(distance);

            for next in arena.neighbors(node) {
                if self.visited_in[next.index()] != self.round {
                    self.visited_in[next.index()] = self.round;
                    self.queue.push_back((next, distance + 1));
                }
            }
        }
    }

    fn merge(mut self, other: Self) -> Self {
        for (mine, theirs) in self.depth.iter_mut().zip(other.depth) {
            *mine = (*mine).max(theirs);
        }
        self
    }
}

/// All files, count descending then path ascending. Zero counts sort last.
fn rank(arena: &DiGraph<FileNode, ()>, counts: &[usize]) -> Vec<FileId> {
    let mut ranked: Vec<FileId> = (0..counts.len()).map(FileId).collect();
    ranked.sort_by(|a, b| {
        counts[b.index()].cmp(&counts[a.index()]).then_with(|| {
            arena[node_index(*a)]
                .path
                .cmp(&arena[node_index(*b)].path)
        })
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::file_id;
    use crate::types::ScanFile;
    use rstest::rstest;

    fn seed_ids(graph: &DependencyGraph) -> Vec<FileId> {
        depth_seeds(graph).into_iter().map(file_id).collect()
    }

    fn graph_of(edges: &[(&str, &[&str])]) -> DependencyGraph {
        let files: Vec<ScanFile> = edges
            .iter()
            .map(|(path, imports)| {
                imports
                    .iter()
                    .fold(ScanFile::new(*path, *path, "python"), |f, t| f.importing(*t))
            })
            .collect();
        DependencyGraph::build(&files).expect("valid scan")
    }

    fn metrics_of(graph: &DependencyGraph, path: &str, metrics: &Metrics) -> FileMetrics {
        *metrics
            .file(graph.lookup(path).expect("path exists"))
            .expect("metrics exist")
    }

    #[rstest]
    #[case::sequential(false)]
    #[case::parallel(true)]
    fn simple_chain(#[case] parallel: bool) {
        let graph = graph_of(&[("a", &["b"]), ("b", &[])]);
        let metrics = compute_metrics(&graph, parallel);

        assert_eq!(metrics.graph().root_files, 1);
        assert_eq!(metrics.graph().leaf_files, 1);
        assert_eq!(metrics.graph().max_depth, 1);
        assert_eq!(metrics.graph().total_dependencies, 1);
        assert!(metrics_of(&graph, "a", &metrics).is_root);
        assert!(metrics_of(&graph, "b", &metrics).is_leaf);
    }

    #[rstest]
    #[case::sequential(false)]
    #[case::parallel(true)]
    fn depth_is_longest_shortest_path_over_roots(#[case] parallel: bool) {
        // r1 -> a -> b -> c, r2 -> c, a -> c
        let graph = graph_of(&[
            ("r1", &["a"]),
            ("a", &["b", "c"]),
            ("b", &["c"]),
            ("c", &[]),
            ("r2", &["c"]),
        ]);
        let metrics = compute_metrics(&graph, parallel);

        // Shortest r1 -> c is 2 (via a), r2 -> c is 1: max over roots is 2.
        assert_eq!(metrics_of(&graph, "c", &metrics).depth, 2);
        assert_eq!(metrics_of(&graph, "b", &metrics).depth, 2);
        assert_eq!(metrics.graph().max_depth, 2);
        assert_eq!(metrics.graph().root_files, 2);
    }

    #[test]
    fn pure_cycle_has_finite_depth_and_no_roots_or_leaves() {
        let graph = graph_of(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"])]);
        let metrics = compute_metrics(&graph, false);

        assert_eq!(metrics.graph().root_files, 0);
        assert_eq!(metrics.graph().leaf_files, 0);
        // Seeded from "a", the smallest path in the cycle.
        assert_eq!(metrics_of(&graph, "c", &metrics).depth, 2);
        assert_eq!(metrics.graph().max_depth, 2);
    }

    #[test]
    fn cycle_reachable_from_root_is_not_reseeded() {
        let graph = graph_of(&[("r", &["x"]), ("x", &["y"]), ("y", &["x"])]);

        let seeds: Vec<String> = seed_ids(&graph)
            .into_iter()
            .map(|id| graph.file(id).expect("node").path.clone())
            .collect();
        assert_eq!(seeds, vec!["r".to_string()]);

        let metrics = compute_metrics(&graph, false);
        assert_eq!(metrics_of(&graph, "y", &metrics).depth, 2);
    }

    #[test]
    fn isolated_file_is_both_root_and_leaf() {
        let graph = graph_of(&[("solo", &[])]);
        let metrics = compute_metrics(&graph, false);

        let solo = metrics_of(&graph, "solo", &metrics);
        assert!(solo.is_root && solo.is_leaf);
        assert_eq!(solo.depth, 0);
        assert_eq!(metrics.graph().max_depth, 0);
    }

    #[test]
    fn empty_graph_has_zero_metrics() {
        let graph = DependencyGraph::build(&[]).expect("empty scan is valid");
        let metrics = compute_metrics(&graph, true);

        assert_eq!(*metrics.graph(), GraphMetrics::default());
        assert!(metrics.ranked_by_in_degree().is_empty());
    }

    #[test]
    fn rankings_break_ties_by_path() {
        let graph = graph_of(&[
            ("main", &["util", "models", "db"]),
            ("api", &["util", "models"]),
            ("models", &["db"]),
            ("util", &[]),
            ("db", &[]),
        ]);
        let metrics = compute_metrics(&graph, false);

        let names = |ids: &[FileId]| -> Vec<String> {
            ids.iter()
                .map(|&id| graph.file(id).expect("node").path.clone())
                .collect()
        };

        assert_eq!(
            names(metrics.ranked_by_in_degree()),
            vec!["db", "models", "util", "api", "main"]
        );
        assert_eq!(
            names(metrics.ranked_by_out_degree()),
            vec!["main", "api", "models", "db", "util"]
        );
    }

    #[test]
    fn rankings_include_zero_counts() {
        let graph = graph_of(&[("a", &["b"]), ("b", &[])]);
        let metrics = compute_metrics(&graph, false);

        let ranked = |ids: &[FileId], by_in: bool| -> Vec<(String, usize)> {
            ids.iter()
                .map(|&id| {
                    let m = metrics.file(id).expect("metrics");
                    let count = if by_in { m.in_degree } else { m.out_degree };
                    (graph.file(id).expect("node").path.clone(), count)
                })
                .collect()
        };

        assert_eq!(
            ranked(metrics.ranked_by_in_degree(), true),
            vec![("b".to_string(), 1), ("a".to_string(), 0)]
        );
        assert_eq!(
            ranked(metrics.ranked_by_out_degree(), false),
            vec![("a".to_string(), 1), ("b".to_string(), 0)]
        );
    }

    #[test]
    fn self_import_counts_in_both_degrees() {
        let graph = graph_of(&[("a", &["a"])]);
        let metrics = compute_metrics(&graph, false);

        let a = metrics_of(&graph, "a", &metrics);
        assert_eq!((a.in_degree, a.out_degree), (1, 1));
        assert!(!a.is_root && !a.is_leaf);
    }
}
