// ============================================================================
// domain/error.rs - CONTEXT AND RENDER ERROR DOMAIN
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (carried through reports and test assertions)
/// - Categorizable (for CLI display and exit codes)
/// - Actionable (provides suggestions naming the offending key or path)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Context construction errors
    // ========================================================================
    #[error("No answer supplied for '{key}' and the prompt has no default")]
    MissingAnswer { key: String },

    #[error("Key '{key}' is produced twice with different values ({existing} vs {conflicting})")]
    DuplicateKey {
        key: String,
        existing: String,
        conflicting: String,
    },

    #[error("Unknown casing rule '{rule}'")]
    UnknownCasingRule { rule: String },

    // ========================================================================
    // Render errors
    // ========================================================================
    #[error("Unresolved placeholder '{key}' in {path}")]
    UnresolvedPlaceholder { key: String, path: String },

    #[error("Malformed placeholder in {path} at byte {offset}: {reason}")]
    MalformedPlaceholder {
        path: String,
        offset: usize,
        reason: String,
    },

    #[error("Template path '{template}' renders to invalid path '{rendered}'")]
    InvalidRenderedPath { template: String, rendered: String },

    #[error("Destination conflict at {path}")]
    DestinationConflict { path: String },

    // ========================================================================
    // Archetype definition errors
    // ========================================================================
    #[error("Invalid archetype: {0}")]
    InvalidArchetype(String),

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingAnswer { key } => vec![
                format!("Supply a value for '{key}'"),
                format!("Pass it on the command line: -a {key}=<value>"),
                "Or add it to an answer file passed with --answer-file".into(),
            ],
            Self::DuplicateKey { key, .. } => vec![
                format!("Two casing rules write '{key}' with different values"),
                "Rename the fixed key or drop one of the overlapping rules in archetype.toml"
                    .into(),
            ],
            Self::UnknownCasingRule { rule } => vec![
                format!("'{rule}' is not a known case"),
                "Known cases: kebab, snake, pascal, camel, title, constant, train, dot, lower, upper"
                    .into(),
            ],
            Self::UnresolvedPlaceholder { key, path } => vec![
                format!("'{path}' references '{key}', which no prompt produces"),
                "Declare a prompt for it in archetype.toml or fix the placeholder".into(),
                "Run: stencil check <archetype> to list every unresolved key".into(),
            ],
            Self::MalformedPlaceholder { path, .. } => vec![
                format!("Fix the placeholder syntax in '{path}'"),
                "Emit literal braces with the escape form {{'{'}}".into(),
            ],
            Self::DestinationConflict { path } => vec![
                format!("'{path}' already exists or is produced twice"),
                "Choose an empty or missing destination directory".into(),
            ],
            Self::InvalidArchetype(msg) => vec![
                "Check archetype.toml".into(),
                format!("Details: {msg}"),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingAnswer { .. }
            | Self::UnresolvedPlaceholder { .. }
            | Self::MalformedPlaceholder { .. }
            | Self::InvalidRenderedPath { .. }
            | Self::DestinationConflict { .. } => ErrorCategory::Validation,
            Self::DuplicateKey { .. }
            | Self::UnknownCasingRule { .. }
            | Self::InvalidArchetype(_)
            | Self::AbsolutePathNotAllowed { .. } => ErrorCategory::Definition,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input for this run (answers, destination, template text).
    Validation,
    /// The archetype itself is defective.
    Definition,
}
