//! Unified error handling for Stencil Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Stencil Core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StencilError {
    /// Errors from the domain layer (answers, casing, placeholders).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (I/O, lookups, rollback).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl StencilError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {message}"),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Stencil".into(),
                "Please report it together with the archetype that triggered it".into(),
            ],
        }
    }

    /// Get error category for display and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Definition => ErrorCategory::Configuration,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// The domain error inside, if any. Handy in tests and reports.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) => Some(e),
            _ => None,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input for this run.
    Validation,
    /// Archetype or answer file missing.
    NotFound,
    /// Defective archetype or configuration.
    Configuration,
    /// I/O failures and bugs.
    Internal,
}

/// Convenient result type alias.
pub type StencilResult<T> = Result<T, StencilError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_categories_map_to_core_categories() {
        let missing: StencilError = DomainError::MissingAnswer { key: "k".into() }.into();
        assert_eq!(missing.category(), ErrorCategory::Validation);

        let dup: StencilError = DomainError::DuplicateKey {
            key: "k".into(),
            existing: "a".into(),
            conflicting: "b".into(),
        }
        .into();
        assert_eq!(dup.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn application_categories() {
        let not_found: StencilError = ApplicationError::ArchetypeNotFound {
            location: "x".into(),
        }
        .into();
        assert_eq!(not_found.category(), ErrorCategory::NotFound);

        let io: StencilError = ApplicationError::FilesystemError {
            path: "x".into(),
            reason: "disk full".into(),
        }
        .into();
        assert_eq!(io.category(), ErrorCategory::Internal);
    }

    #[test]
    fn messages_are_not_double_prefixed() {
        let err: StencilError = DomainError::MissingAnswer {
            key: "org-name".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "No answer supplied for 'org-name' and the prompt has no default"
        );
    }

    #[test]
    fn suggestions_name_the_key() {
        let err: StencilError = DomainError::MissingAnswer {
            key: "org-name".into(),
        }
        .into();
        assert!(err.suggestions().iter().any(|s| s.contains("-a org-name=")));
    }
}
