//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not business
//! rules. Business rule errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while running the pipeline.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The directory to scan does not exist.
    #[error("Path not found: {path}")]
    PathNotFound { path: PathBuf },

    /// Not even the generic fallback template is available.
    #[error("No templates available (tried '{requested}' and the generic fallback)")]
    TemplatesMissing { requested: String },

    /// A specific template lookup failed.
    #[error("Template resolution failed: {reason}")]
    TemplateResolution { reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The path guard refused an operation.
    #[error("Refusing to {operation} {path}: path is not allowed")]
    PathNotAllowed {
        path: PathBuf,
        operation: &'static str,
    },

    /// Copying an existing file aside failed; nothing was overwritten.
    #[error("Backup of {path} failed: {reason}")]
    BackupFailed { path: PathBuf, reason: String },

    /// Writing new content failed after the backup step.
    #[error("Writing {path} failed: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    /// Store access failed (lock poisoned, etc.).
    #[error("Template store error")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::PathNotFound { path } => vec![
                format!("Directory does not exist: {}", path.display()),
                "Pass an existing project directory, or omit it to use the current one".into(),
            ],
            Self::TemplatesMissing { .. } => vec![
                "No template could be loaded, not even 'generic'".into(),
                "Check templates.local_path in your configuration".into(),
                "Or set PRIMER_TEMPLATES_DIR to a directory of templates".into(),
            ],
            Self::TemplateResolution { reason } => vec![
                format!("Resolution failed: {}", reason),
                "Try: primer list to see available templates".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have read and write permissions".into(),
            ],
            Self::PathNotAllowed { path, .. } => vec![
                format!("'{}' is outside the set of files Primer may touch", path.display()),
                "Primer only writes its own output files, their backups and .gitignore".into(),
            ],
            Self::BackupFailed { path, .. } => vec![
                format!("The existing {} was left untouched", path.display()),
                "Check free disk space and write permissions in the target directory".into(),
            ],
            Self::WriteFailed { path, .. } => vec![
                format!("The previous version of {} was restored", path.display()),
                "Check free disk space and write permissions".into(),
            ],
            Self::StoreLockError => vec![
                "The template store is locked".into(),
                "Try again in a moment".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::PathNotFound { .. } => ErrorCategory::NotFound,
            Self::TemplatesMissing { .. } | Self::TemplateResolution { .. } => {
                ErrorCategory::NotFound
            }
            Self::PathNotAllowed { .. } => ErrorCategory::Validation,
            Self::FilesystemError { .. }
            | Self::BackupFailed { .. }
            | Self::WriteFailed { .. }
            | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
