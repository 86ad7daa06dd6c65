//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `primer-adapters` crate provides implementations.

use crate::domain::{Template, TemplateId, Variables};
use crate::error::PrimerResult;
use std::path::{Path, PathBuf};

/// Port for filesystem operations.
///
/// Implemented by:
/// - `primer_adapters::filesystem::LocalFilesystem` (production)
/// - `primer_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> PrimerResult<String>;

    /// List files under `root`, at most `max_depth` levels down.
    ///
    /// Directories named `.git`, `node_modules` or `vendor` are not entered.
    fn list_files(&self, root: &Path, max_depth: usize) -> PrimerResult<Vec<PathBuf>>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> PrimerResult<()>;

    /// Copy `from` over `to`.
    fn copy_file(&self, from: &Path, to: &Path) -> PrimerResult<()>;

    fn remove_file(&self, path: &Path) -> PrimerResult<()>;
}

/// Port for template storage and retrieval.
///
/// Implemented by:
/// - `primer_adapters::template_store::InMemoryStore` (built-in and user templates)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateStore: Send + Sync {
    /// Get a specific template by ID.
    fn get(&self, id: &TemplateId) -> PrimerResult<Template>;

    fn contains(&self, id: &TemplateId) -> bool;

    /// List all available templates, ordered by id.
    fn list(&self) -> PrimerResult<Vec<Template>>;

    /// Insert or replace a template.
    fn insert(&self, template: Template) -> PrimerResult<()>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `primer_adapters::renderer::MarkerRenderer` (placeholders and `{{#IF}}` blocks)
pub trait TemplateRenderer: Send + Sync {
    /// Render template text with the given variables. Pure.
    fn render(&self, template: &str, variables: &Variables) -> String;
}

/// Directory names that file listings never descend into.
pub const SKIPPED_DIRS: &[&str] = &[".git", "node_modules", "vendor"];
