//! Project-wide summary and the flat file listing.
//!
//! Both are compositions of results already held by a snapshot.

use crate::contracts::{
    DependencyFileList, DependencyStats, DependencySummary, FileCount, FileListEntry,
};
use crate::cycles::CycleReport;
use crate::graph::DependencyGraph;
use crate::metrics::{FileMetrics, Metrics};
use crate::types::FileId;

/// Filter and pagination for [`build_file_list`].
///
/// The default query matches every file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileListQuery {
    /// Case-insensitive substring of the path or module name
    pub search: Option<String>,
    /// Exact language tag
    pub language: Option<String>,
    /// Number of matching files to skip
    pub offset: usize,
    /// Maximum number of files to return
    pub limit: Option<usize>,
}

impl FileListQuery {
    /// Restrict to files whose path or module name contains `search`.
    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Restrict to one language tag.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Return one page of `limit` files starting at `offset`.
    #[must_use]
    pub fn page(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = Some(limit);
        self
    }
}

/// Assemble the summary with rankings of length at most `top_n`.
#[must_use]
pub fn build_summary(
    project_id: &str,
    project_name: &str,
    graph: &DependencyGraph,
    cycles: &CycleReport,
    metrics: &Metrics,
    top_n: usize,
) -> DependencySummary {
    let totals = metrics.graph();

    DependencySummary {
        project_id: project_id.to_string(),
        project_name: project_name.to_string(),
        stats: DependencyStats {
            total_files: graph.file_count(),
            total_dependencies: totals.total_dependencies,
            max_depth: totals.max_depth,
            leaf_files: totals.leaf_files,
            root_files: totals.root_files,
        },
        circular_dependencies: cycles.info(),
        most_imported: ranking(graph, metrics, metrics.ranked_by_in_degree(), top_n, |m| {
            m.in_degree
        }),
        most_dependencies: ranking(graph, metrics, metrics.ranked_by_out_degree(), top_n, |m| {
            m.out_degree
        }),
    }
}

/// List files matching `query`, in input order.
#[must_use]
pub fn build_file_list(
    project_id: &str,
    graph: &DependencyGraph,
    metrics: &Metrics,
    query: &FileListQuery,
) -> DependencyFileList {
    let needle = query.search.as_deref().map(str::to_lowercase);

    let matching: Vec<_> = graph
        .files()
        .filter(|(_, node)| {
            query
                .language
                .as_deref()
                .is_none_or(|language| node.language == language)
        })
        .filter(|(_, node)| {
            needle.as_deref().is_none_or(|needle| {
                node.path.to_lowercase().contains(needle)
                    || node.module_name.to_lowercase().contains(needle)
            })
        })
        .collect();

    let total = matching.len();
    let files = matching
        .into_iter()
        .skip(query.offset)
        .take(query.limit.unwrap_or(usize::MAX))
        .map(|(id, node)| {
            let (imports_count, imported_by_count) = metrics
                .file(id)
                .map_or((0, 0), |m| (m.out_degree, m.in_degree));
            FileListEntry {
                file: node.path.clone(),
                module_name: node.module_name.clone(),
                language: node.language.clone(),
                imports_count,
                imported_by_count,
            }
        })
        .collect();

    DependencyFileList {
        project_id: project_id.to_string(),
        files,
        total,
    }
}

fn ranking(
    graph: &DependencyGraph,
    metrics: &Metrics,
    ranked: &[FileId],
    top_n: usize,
    count: impl Fn(&FileMetrics) -> usize,
) -> Vec<FileCount> {
    ranked
        .iter()
        .take(top_n)
        .filter_map(|&id| {
            let node = graph.file(id)?;
            let file_metrics = metrics.file(id)?;
            Some(FileCount {
                file: node.path.clone(),
                count: count(file_metrics),
            })
        })
        .collect()
}
