//! Unified error types for evaluation runs.
//!
//! Only `Config` (and the repository-missing case) abort a run: a malformed
//! rubric must never be graded against. Everything else degrades to a
//! conservative default — a failing check producer becomes a failed check
//! result, a broken feedback template falls back to the built-in report —
//! so a single broken piece never denies the student a score.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvalError {
    /// Malformed or missing criteria. Fatal: aborts before any checks run.
    #[error("invalid criteria: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// The student repository path does not exist.
    #[error("student repository not found: {0}")]
    RepoNotFound(PathBuf),

    /// File system failure while reading criteria or templates.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single check producer failed. Isolated per check, never fatal.
    #[error("check `{name}` failed: {message}")]
    Check { name: String, message: String },

    /// A custom feedback template failed to render. Recovered locally by
    /// falling back to the built-in report generator.
    #[error("template render failed: {0}")]
    Report(String),
}

impl EvalError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    pub fn config_at(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable name used as `error_type` in the error envelope.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Config { .. } => "ConfigError",
            Self::RepoNotFound(_) => "RepositoryNotFound",
            Self::Io { .. } => "IoError",
            Self::Check { .. } => "CheckProducerError",
            Self::Report(_) => "ReportRenderError",
        }
    }
}
