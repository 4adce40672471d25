//! Circular dependency detection.
//!
//! ## Algorithm
//!
//! 1. Strongly connected components via Tarjan's algorithm (petgraph,
//!    iterative, O(V+E)). An SCC bears cycles if it has more than one file or
//!    a single file that imports itself.
//! 2. Inside each cycle-bearing SCC, elementary cycles are enumerated with
//!    Johnson's blocking search restricted to the SCC's induced subgraph. Start
//!    nodes are taken in ascending path order and each search only visits
//!    files whose path sorts at or after the start, so every cycle is found
//!    exactly once, rotated to begin at its smallest path. Starts that lie on
//!    no remaining cycle are skipped by recomputing SCCs of the shrinking
//!    subgraph, which keeps sparse components linear per reported cycle.
//! 3. Enumeration stops once an SCC has produced `max_cycles_per_scc` cycles.
//!    The cycles kept are the ones discovered from the earliest start nodes,
//!    and the report is flagged as truncated.
//!
//! The final list is ordered by ascending length, then lexicographically by
//! path sequence, so identical input always yields identical output.
//!
//! Both the search and the unblock step are explicit-stack loops: an SCC can
//! hold thousands of files and recursion depth would follow path length.

use std::collections::{HashMap, HashSet};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, warn};

use crate::contracts::{CircularDependenciesInfo, CycleInfo};
use crate::graph::{file_id, DependencyGraph};
use crate::types::{Cycle, FileId};

/// Every circular dependency in one snapshot plus a per-file index.
#[derive(Debug, Clone)]
pub struct CycleReport {
    cycles: Vec<Cycle>,
    truncated_components: usize,
    /// Per file: indices into `cycles`, ascending.
    membership: Vec<Vec<usize>>,
    /// Per file: member of a cycle-bearing SCC.
    cyclic: Vec<bool>,
}

impl CycleReport {
    /// All reported cycles in canonical order.
    #[must_use]
    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    /// Whether any SCC hit the enumeration bound.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.truncated_components > 0
    }

    /// Number of SCCs whose enumeration was cut short.
    #[must_use]
    pub fn truncated_components(&self) -> usize {
        self.truncated_components
    }

    /// Whether `id` lies on at least one circular dependency.
    ///
    /// This holds for every file in a cycle-bearing SCC, even when truncation
    /// left none of its cycles in the report.
    #[must_use]
    pub fn in_cycle(&self, id: FileId) -> bool {
        self.cyclic.get(id.index()).copied().unwrap_or(false)
    }

    /// Reported cycles that include `id`, in canonical order.
    pub fn cycles_involving(&self, id: FileId) -> impl Iterator<Item = &Cycle> {
        self.membership
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |&i| &self.cycles[i])
    }

    /// The client-facing view of this report.
    #[must_use]
    pub fn info(&self) -> CircularDependenciesInfo {
        CircularDependenciesInfo {
            count: self.cycles.len(),
            has_circular: !self.cycles.is_empty(),
            cycles: self
                .cycles
                .iter()
                .map(|cycle| CycleInfo {
                    files: cycle.files.clone(),
                    length: cycle.len(),
                })
                .collect(),
            truncated: self.is_truncated(),
        }
    }
}

/// Detect every elementary circular dependency in `graph`.
///
/// `max_cycles_per_scc` bounds enumeration inside each strongly connected
/// component; a bound of zero is treated as one.
#[must_use]
pub fn detect_cycles(graph: &DependencyGraph, max_cycles_per_scc: usize) -> CycleReport {
    let limit = max_cycles_per_scc.max(1);
    let file_count = graph.file_count();
    let mut cyclic = vec![false; file_count];
    let mut cycles: Vec<Cycle> = Vec::new();
    let mut truncated_components = 0usize;
    let mut cyclic_components = 0usize;

    for component in tarjan_scc(graph.arena()) {
        let bears_cycles = component.len() > 1
            || component
                .first()
                .is_some_and(|&idx| graph.has_self_import(file_id(idx)));
        if !bears_cycles {
            continue;
        }
        cyclic_components += 1;
        for &idx in &component {
            cyclic[idx.index()] = true;
        }

        let enumeration = enumerate_component(graph, &component, limit);
        if enumeration.truncated {
            truncated_components += 1;
            warn!(
                component_size = component.len(),
                cycles_kept = enumeration.cycles.len(),
                bound = limit,
                "Cycle enumeration bound reached; reporting a truncated subset"
            );
        }
        cycles.extend(enumeration.cycles);
    }

    cycles.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.files.cmp(&b.files)));

    let mut membership: Vec<Vec<usize>> = vec![Vec::new(); file_count];
    for (i, cycle) in cycles.iter().enumerate() {
        for path in &cycle.files {
            if let Some(id) = graph.lookup(path) {
                membership[id.index()].push(i);
            }
        }
    }

    debug!(
        cyclic_components,
        cycle_count = cycles.len(),
        truncated_components,
        "Cycle detection complete"
    );

    CycleReport {
        cycles,
        truncated_components,
        membership,
        cyclic,
    }
}

struct ComponentCycles {
    cycles: Vec<Cycle>,
    truncated: bool,
}

/// Search frame: the node, the next neighbor slot to try, and whether any
/// cycle has closed below this frame.
struct Frame {
    node: usize,
    next: usize,
    found: bool,
}

impl Frame {
    fn new(node: usize) -> Self {
        Self {
            node,
            next: 0,
            found: false,
        }
    }
}

/// Johnson's elementary-cycle search over one SCC.
///
/// Nodes are renumbered `0..k` in ascending path order; that local index
/// doubles as the start-node rank. Each round searches from the least node
/// that still lies on a cycle of the subgraph induced by nodes at or after the
/// previous start, restricted to that node's SCC in the subgraph.
fn enumerate_component(
    graph: &DependencyGraph,
    component: &[NodeIndex],
    limit: usize,
) -> ComponentCycles {
    let arena = graph.arena();
    let mut members: Vec<NodeIndex> = component.to_vec();
    members.sort_by(|a, b| arena[*a].path.cmp(&arena[*b].path));

    let local: HashMap<NodeIndex, usize> = members
        .iter()
        .enumerate()
        .map(|(i, &idx)| (idx, i))
        .collect();

    let adjacency: Vec<Vec<usize>> = members
        .iter()
        .map(|&idx| {
            let mut next: Vec<usize> = arena
                .neighbors(idx)
                .filter_map(|n| local.get(&n).copied())
                .collect();
            next.sort_unstable();
            next.dedup();
            next
        })
        .collect();

    let k = members.len();
    let mut scope = vec![false; k];
    let mut blocked = vec![false; k];
    let mut blocked_by: Vec<HashSet<usize>> = vec![HashSet::new(); k];
    let mut found: Vec<Vec<usize>> = Vec::new();
    let mut truncated = false;
    let mut from = 0usize;

    'rounds: while from < k {
        let Some((start, reachable)) = least_cyclic_component(&adjacency, from) else {
            break;
        };

        scope.iter_mut().for_each(|s| *s = false);
        blocked.iter_mut().for_each(|b| *b = false);
        blocked_by.iter_mut().for_each(HashSet::clear);
        for &i in &reachable {
            scope[i] = true;
        }

        let mut path: Vec<usize> = vec![start];
        let mut frames: Vec<Frame> = vec![Frame::new(start)];
        blocked[start] = true;

        while let Some(frame) = frames.last_mut() {
            let v = frame.node;

            if let Some(&w) = adjacency[v].get(frame.next) {
                frame.next += 1;
                if !scope[w] {
                    continue;
                }
                if w == start {
                    if found.len() == limit {
                        truncated = true;
                        break 'rounds;
                    }
                    frame.found = true;
                    found.push(path.clone());
                } else if !blocked[w] {
                    blocked[w] = true;
                    path.push(w);
                    frames.push(Frame::new(w));
                }
                continue;
            }

            let closed = frame.found;
            frames.pop();
            path.pop();

            if closed {
                unblock(v, &mut blocked, &mut blocked_by);
            } else {
                for &w in adjacency[v].iter().filter(|&&w| scope[w]) {
                    blocked_by[w].insert(v);
                }
            }

            if let Some(parent) = frames.last_mut() {
                parent.found |= closed;
            }
        }

        from = start + 1;
    }

    let cycles = found
        .into_iter()
        .map(|locals| Cycle {
            files: locals
                .into_iter()
                .map(|i| arena[members[i]].path.clone())
                .collect(),
        })
        .collect();

    ComponentCycles { cycles, truncated }
}

/// Find the cycle-bearing SCC with the smallest member among local nodes
/// `from..`, returning that member and the SCC.
fn least_cyclic_component(adjacency: &[Vec<usize>], from: usize) -> Option<(usize, Vec<usize>)> {
    let mut sub: DiGraph<(), ()> = DiGraph::with_capacity(adjacency.len(), adjacency.len());
    for _ in adjacency {
        sub.add_node(());
    }
    for (v, next) in adjacency.iter().enumerate().skip(from) {
        for &w in next.iter().filter(|&&w| w >= from) {
            sub.add_edge(NodeIndex::new(v), NodeIndex::new(w), ());
        }
    }

    tarjan_scc(&sub)
        .into_iter()
        .filter_map(|scc| {
            let nodes: Vec<usize> = scc.iter().map(|n| n.index()).collect();
            let least = *nodes.iter().min()?;
            let cyclic = nodes.len() > 1 || (least >= from && adjacency[least].contains(&least));
            cyclic.then_some((least, nodes))
        })
        .min_by_key(|(least, _)| *least)
}

fn unblock(node: usize, blocked: &mut [bool], blocked_by: &mut [HashSet<usize>]) {
    let mut pending = vec![node];
    while let Some(current) = pending.pop() {
        if !blocked[current] {
            continue;
        }
        blocked[current] = false;
        pending.extend(blocked_by[current].drain());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScanFile;

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

    fn paths(report: &CycleReport) -> Vec<Vec<&str>> {
        report
            .cycles()
            .iter()
            .map(|c| c.files.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn acyclic_graph_has_no_cycles() {
        let graph = graph_of(&[("a", &["b"]), ("b", &["c"]), ("c", &[])]);
        let report = detect_cycles(&graph, 1000);

        assert!(report.cycles().is_empty());
        assert!(!report.info().has_circular);
        assert!(!report.is_truncated());
    }

    #[test]
    fn triangle_is_one_cycle_starting_at_smallest_path() {
        let graph = graph_of(&[("b", &["c"]), ("c", &["a"]), ("a", &["b"])]);
        let report = detect_cycles(&graph, 1000);

        assert_eq!(paths(&report), vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn self_import_is_a_cycle_of_length_one() {
        let graph = graph_of(&[("a", &["a"]), ("b", &[])]);
        let report = detect_cycles(&graph, 1000);

        assert_eq!(paths(&report), vec![vec!["a"]]);
        assert!(report.in_cycle(graph.lookup("a").expect("a")));
        assert!(!report.in_cycle(graph.lookup("b").expect("b")));
    }

    #[test]
    fn overlapping_cycles_are_all_enumerated_and_ordered() {
        // a <-> b, b -> c -> a
        let graph = graph_of(&[("a", &["b"]), ("b", &["a", "c"]), ("c", &["a"])]);
        let report = detect_cycles(&graph, 1000);

        assert_eq!(paths(&report), vec![vec!["a", "b"], vec!["a", "b", "c"]]);
    }

    #[test]
    fn complete_graph_enumerates_every_elementary_cycle() {
        // K4 directed: 6 two-cycles, 8 three-cycles, 6 four-cycles
        let graph = graph_of(&[
            ("a", &["b", "c", "d"]),
            ("b", &["a", "c", "d"]),
            ("c", &["a", "b", "d"]),
            ("d", &["a", "b", "c"]),
        ]);
        let report = detect_cycles(&graph, 1000);

        let by_len = |n: usize| report.cycles().iter().filter(|c| c.len() == n).count();
        assert_eq!(by_len(2), 6);
        assert_eq!(by_len(3), 8);
        assert_eq!(by_len(4), 6);
        assert_eq!(report.cycles().len(), 20);
    }

    #[test]
    fn separate_components_are_merged_in_canonical_order() {
        let graph = graph_of(&[
            ("x", &["y"]),
            ("y", &["z"]),
            ("z", &["x"]),
            ("m", &["n"]),
            ("n", &["m"]),
        ]);
        let report = detect_cycles(&graph, 1000);

        assert_eq!(paths(&report), vec![vec!["m", "n"], vec!["x", "y", "z"]]);
    }

    #[test]
    fn bound_truncates_and_flags_report() {
        let graph = graph_of(&[
            ("a", &["b", "c", "d"]),
            ("b", &["a", "c", "d"]),
            ("c", &["a", "b", "d"]),
            ("d", &["a", "b", "c"]),
        ]);
        let report = detect_cycles(&graph, 3);

        assert_eq!(report.cycles().len(), 3);
        assert!(report.is_truncated());
        assert_eq!(report.truncated_components(), 1);
        assert!(report.info().truncated);
        // Kept cycles all come from the first start node.
        assert!(report.cycles().iter().all(|c| c.files[0] == "a"));
        // Membership still reflects the SCC, not just the kept cycles.
        assert!(report.in_cycle(graph.lookup("d").expect("d")));
    }

    #[test]
    fn bound_equal_to_cycle_count_is_not_truncated() {
        let graph = graph_of(&[("a", &["b"]), ("b", &["a", "c"]), ("c", &["a"])]);
        let report = detect_cycles(&graph, 2);

        assert_eq!(report.cycles().len(), 2);
        assert!(!report.is_truncated());
    }

    #[test]
    fn membership_lists_cycles_per_file() {
        let graph = graph_of(&[("a", &["b"]), ("b", &["a", "c"]), ("c", &["a"]), ("d", &["a"])]);
        let report = detect_cycles(&graph, 1000);

        let c = graph.lookup("c").expect("c");
        let involving: Vec<&Cycle> = report.cycles_involving(c).collect();
        assert_eq!(involving.len(), 1);
        assert_eq!(involving[0].files, vec!["a", "b", "c"]);

        let d = graph.lookup("d").expect("d");
        assert_eq!(report.cycles_involving(d).count(), 0);
        assert!(!report.in_cycle(d));
    }

    #[test]
    fn long_chain_cycle_does_not_overflow() {
        let names: Vec<String> = (0..5000).map(|i| format!("m{i:05}")).collect();
        let files: Vec<ScanFile> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                ScanFile::new(name.clone(), name.clone(), "python")
                    .importing(names[(i + 1) % names.len()].clone())
            })
            .collect();
        let graph = DependencyGraph::build(&files).expect("valid scan");

        let report = detect_cycles(&graph, 10);
        assert_eq!(report.cycles().len(), 1);
        assert_eq!(report.cycles()[0].len(), 5000);
    }

    #[test]
    fn dense_large_component_stops_at_bound() {
        let n = 3000;
        let names: Vec<String> = (0..n).map(|i| format!("m{i:05}")).collect();
        let files: Vec<ScanFile> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                ScanFile::new(name.clone(), name.clone(), "python")
                    .importing(names[(i + 1) % n].clone())
                    .importing(names[(i + 7) % n].clone())
            })
            .collect();
        let graph = DependencyGraph::build(&files).expect("valid scan");

        let report = detect_cycles(&graph, 100);
        assert!(report.is_truncated());
        assert_eq!(report.truncated_components(), 1);
        assert_eq!(report.cycles().len(), 100);
        assert!(report.cycles().iter().all(|c| c.files[0] == "m00000"));
        assert!(report
            .cycles()
            .windows(2)
            .all(|pair| (pair[0].len(), &pair[0].files) <= (pair[1].len(), &pair[1].files)));
    }
}
