// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel inside reports)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Template '{template_id}' has an empty body")]
    EmptyTemplate { template_id: String },

    #[error("Invalid variable name '{name}': must match [A-Za-z_][A-Za-z0-9_]*")]
    InvalidVariableName { name: String },

    #[error("Unknown {field} value '{value}'")]
    UnknownValue { field: &'static str, value: String },

    // ========================================================================
    // Guard Configuration Errors
    // ========================================================================
    #[error("Secret pattern '{name}' does not compile: {reason}")]
    InvalidSecretPattern { name: String, reason: String },

    #[error("Path pattern '{pattern}' is not a valid glob: {reason}")]
    InvalidPathPattern { pattern: String, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidTemplate(msg) => vec![
                "Check the template manifest and body".into(),
                format!("Details: {}", msg),
            ],
            Self::EmptyTemplate { template_id } => vec![
                format!("Template '{}' has nothing to render", template_id),
                "Add content to its body.md or remove the template directory".into(),
            ],
            Self::InvalidVariableName { name } => vec![
                format!("'{}' cannot be used as a placeholder name", name),
                "Use letters, digits and underscores, e.g. MY_VARIABLE".into(),
            ],
            Self::UnknownValue { field, .. } => match *field {
                "code style" => vec!["Valid code styles: functional, oop, mixed".into()],
                "focus" => {
                    vec!["Valid focus values: none, security, performance, accessibility".into()]
                }
                _ => vec!["See `primer --help` for accepted values".into()],
            },
            Self::InvalidSecretPattern { .. } | Self::InvalidPathPattern { .. } => vec![
                "A built-in guard pattern failed to compile".into(),
                "This is a bug, please report it".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidTemplate(_) | Self::EmptyTemplate { .. } => ErrorCategory::Validation,
            Self::InvalidVariableName { .. } | Self::UnknownValue { .. } => {
                ErrorCategory::Validation
            }
            Self::InvalidSecretPattern { .. } | Self::InvalidPathPattern { .. } => {
                ErrorCategory::Internal
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Internal,
}
