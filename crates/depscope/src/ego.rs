//! One-hop neighborhood of a single file.
//!
//! Pure assembly from the already-computed graph, cycle report and metrics.
//! Cost is proportional to the degree of the requested file plus the number
//! of cycles it lies on.

use tracing::trace;

use crate::contracts::{FileEgoGraph, FileRef};
use crate::cycles::CycleReport;
use crate::error::{Error, Result};
use crate::graph::DependencyGraph;
use crate::metrics::Metrics;
use crate::types::FileId;

/// Build the ego graph for `path`.
///
/// # Errors
///
/// Returns `Error::NotFound` if `path` is not a file in `graph`.
pub fn build_ego_graph(
    project_id: &str,
    graph: &DependencyGraph,
    cycles: &CycleReport,
    metrics: &Metrics,
    path: &str,
) -> Result<FileEgoGraph> {
    let id = graph
        .lookup(path)
        .ok_or_else(|| Error::NotFound(path.to_string()))?;
    let node = graph
        .file(id)
        .ok_or_else(|| Error::NotFound(path.to_string()))?;

    let imports = file_refs(graph, &graph.imports_of(id));
    let imported_by = file_refs(graph, &graph.importers_of(id));

    let (is_leaf, is_root) = metrics
        .file(id)
        .map_or((imports.is_empty(), imported_by.is_empty()), |m| {
            (m.is_leaf, m.is_root)
        });
    debug_assert_eq!(is_leaf, imports.is_empty());
    debug_assert_eq!(is_root, imported_by.is_empty());

    let circular_cycles: Vec<Vec<String>> = cycles
        .cycles_involving(id)
        .map(|cycle| cycle.files.clone())
        .collect();

    trace!(
        file = %path,
        imports = imports.len(),
        imported_by = imported_by.len(),
        cycles = circular_cycles.len(),
        "Assembled ego graph"
    );

    Ok(FileEgoGraph {
        project_id: project_id.to_string(),
        file: node.path.clone(),
        module_name: node.module_name.clone(),
        language: node.language.clone(),
        imports_count: imports.len(),
        imports,
        imported_by_count: imported_by.len(),
        imported_by,
        external_deps: node.external_deps.clone(),
        is_leaf,
        is_root,
        in_circular_dependency: cycles.in_cycle(id),
        circular_cycles,
    })
}

fn file_refs(graph: &DependencyGraph, ids: &[FileId]) -> Vec<FileRef> {
    ids.iter()
        .filter_map(|&id| graph.file(id))
        .map(|node| FileRef {
            file: node.path.clone(),
            module_name: node.module_name.clone(),
            language: node.language.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycles::detect_cycles;
    use crate::metrics::compute_metrics;
    use crate::types::ScanFile;

    struct Fixture {
        graph: DependencyGraph,
        cycles: CycleReport,
        metrics: Metrics,
    }

    impl Fixture {
        fn new(files: &[ScanFile]) -> Self {
            let graph = DependencyGraph::build(files).expect("valid scan");
            let cycles = detect_cycles(&graph, 100);
            let metrics = compute_metrics(&graph, false);
            Self {
                graph,
                cycles,
                metrics,
            }
        }

        fn ego(&self, path: &str) -> Result<FileEgoGraph> {
            build_ego_graph("proj", &self.graph, &self.cycles, &self.metrics, path)
        }
    }

    fn web_app() -> Fixture {
        Fixture::new(&[
            ScanFile::new("app/main.py", "app.main", "python")
                .importing("app/routes.py")
                .importing("app/db.py")
                .importing_external("flask"),
            ScanFile::new("app/routes.py", "app.routes", "python")
                .importing("app/db.py")
                .importing("app/views.py"),
            ScanFile::new("app/views.py", "app.views", "python").importing("app/routes.py"),
            ScanFile::new("app/db.py", "app.db", "python").importing_external("sqlalchemy"),
        ])
    }

    #[test]
    fn assembles_neighbors_in_input_order() {
        let ego = web_app().ego("app/routes.py").expect("file exists");

        let imports: Vec<&str> = ego.imports.iter().map(|r| r.file.as_str()).collect();
        let importers: Vec<&str> = ego.imported_by.iter().map(|r| r.file.as_str()).collect();
        assert_eq!(imports, vec!["app/db.py", "app/views.py"]);
        assert_eq!(importers, vec!["app/main.py", "app/views.py"]);
        assert_eq!(ego.imports_count, 2);
        assert_eq!(ego.imported_by_count, 2);
        assert_eq!(ego.module_name, "app.routes");
        assert_eq!(ego.project_id, "proj");
    }

    #[test]
    fn reports_cycle_membership() {
        let fixture = web_app();

        let routes = fixture.ego("app/routes.py").expect("file exists");
        assert!(routes.in_circular_dependency);
        assert_eq!(
            routes.circular_cycles,
            vec![vec!["app/routes.py".to_string(), "app/views.py".to_string()]]
        );

        let main = fixture.ego("app/main.py").expect("file exists");
        assert!(!main.in_circular_dependency);
        assert!(main.circular_cycles.is_empty());
    }

    #[test]
    fn leaf_with_external_deps() {
        let ego = web_app().ego("app/db.py").expect("file exists");

        assert!(ego.is_leaf);
        assert!(!ego.is_root);
        assert_eq!(ego.external_deps, vec!["sqlalchemy".to_string()]);
        assert_eq!(ego.imported_by[0].language, "python");
    }

    #[test]
    fn unknown_path_is_not_found() {
        let result = web_app().ego("app/missing.py");
        assert!(
            matches!(&result, Err(Error::NotFound(path)) if path == "app/missing.py"),
            "expected NotFound, got {result:?}"
        );
    }
}
