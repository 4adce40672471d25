//! Error types for depscope operations.
//!
//! Errors fall into three groups:
//!
//! - **Input problems**: the scan handed to us is malformed (`MalformedInput`).
//!   These are fatal for the whole build; no partial graph is ever exposed.
//! - **Query problems**: a read against a finished snapshot asked for something
//!   that isn't there (`NotFound`, `ProjectNotFound`). These never affect the
//!   snapshot itself.
//! - **Infrastructure problems**: reading config or scan files (`Io`, `Json`,
//!   `Config`).
//!
//! A truncated cycle enumeration is *not* an error. It is reported through
//! [`CircularDependenciesInfo::truncated`](crate::CircularDependenciesInfo).

use thiserror::Error;

/// Result type for depscope operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for depscope operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The scan input is structurally invalid
    #[error("malformed input: {0}")]
    MalformedInput(#[from] MalformedInput),

    /// A file was requested that is not part of the snapshot
    #[error("file not found in snapshot: {0}")]
    NotFound(String),

    /// No snapshot has been published for the project
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),

    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single structural problem found while building a graph from a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedInput {
    /// Path of the file record that carries the problem
    pub path: String,
    /// Category of the problem
    pub kind: MalformedInputKind,
    /// Human-readable detail
    pub message: String,
}

impl std::fmt::Display for MalformedInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{} ({})", self.message, self.kind)
        } else {
            write!(f, "{}: {} ({})", self.path, self.message, self.kind)
        }
    }
}

impl std::error::Error for MalformedInput {}

/// Categorization of malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedInputKind {
    /// A file record has an empty path
    EmptyPath,
    /// A file record's path is absolute, escapes the project or contains NUL
    InvalidPath,
    /// Two file records share the same path
    DuplicatePath,
    /// An internal import target is not a valid project path
    InvalidImportTarget,
    /// An external import name is empty
    EmptyExternalName,
}

impl std::fmt::Display for MalformedInputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPath => write!(f, "empty path"),
            Self::InvalidPath => write!(f, "invalid path"),
            Self::DuplicatePath => write!(f, "duplicate path"),
            Self::InvalidImportTarget => write!(f, "invalid import target"),
            Self::EmptyExternalName => write!(f, "empty external name"),
        }
    }
}

impl MalformedInput {
    /// Create a new malformed-input report.
    #[must_use]
    pub fn new(path: impl Into<String>, kind: MalformedInputKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }

    /// A file record appeared twice.
    #[must_use]
    pub fn duplicate_path(path: &str) -> Self {
        Self::new(
            path,
            MalformedInputKind::DuplicatePath,
            "file appears more than once in the scan",
        )
    }

    /// An internal import target failed path validation.
    #[must_use]
    pub fn invalid_import_target(source: &str, target: &str, reason: &str) -> Self {
        Self::new(
            source,
            MalformedInputKind::InvalidImportTarget,
            format!("import target '{target}' is not a valid project path: {reason}"),
        )
    }
}

impl Error {
    /// Returns `true` if the error was caused by the caller's input or query
    /// rather than by the environment.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedInput(_) | Self::NotFound(_) | Self::ProjectNotFound(_)
        )
    }
}
