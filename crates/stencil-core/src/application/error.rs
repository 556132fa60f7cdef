//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not business
//! rules. Business rule violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// No archetype at the given location.
    #[error("Archetype not found at {location}")]
    ArchetypeNotFound { location: PathBuf },

    /// An answer file passed on the command line does not exist.
    #[error("Answer file not found: {path}")]
    AnswerFileNotFound { path: PathBuf },

    /// An answer source could not produce a value.
    #[error("Answer source '{source_name}' failed: {reason}")]
    AnswerSource { source_name: String, reason: String },

    /// Filesystem operation failed (read, write, permission change).
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Archetype store access failed (lock poisoned).
    #[error("Archetype store error")]
    StoreLockError,

    /// Rollback after a failed write could not clean up.
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Convenience constructor for I/O failures.
    pub fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::FilesystemError {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ArchetypeNotFound { location } => vec![
                format!("No archetype.toml under {}", location.display()),
                "Pass the directory that contains archetype.toml".into(),
            ],
            Self::AnswerFileNotFound { path } => vec![
                format!("Check the path {}", path.display()),
                "Answer files may be .yaml, .yml, .json or .toml".into(),
            ],
            Self::AnswerSource { source_name, .. } => vec![
                format!("Check the answers provided by '{source_name}'"),
                "Answer files must map keys to strings, numbers or booleans".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure there is enough free space".into(),
            ],
            Self::StoreLockError => vec![
                "The archetype store is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::RollbackFailed { path, .. } => vec![
                format!("Partial output may remain at {}", path.display()),
                "Remove it manually before retrying".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ArchetypeNotFound { .. } | Self::AnswerFileNotFound { .. } => {
                ErrorCategory::NotFound
            }
            Self::AnswerSource { .. } => ErrorCategory::Validation,
            Self::FilesystemError { .. } | Self::RollbackFailed { .. } => ErrorCategory::Internal,
            Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
