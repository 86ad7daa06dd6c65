//! Command handlers. Each turns parsed arguments into core calls and output.

use std::path::{Path, PathBuf};

use tracing::debug;

use primer_adapters::InMemoryStore;

use crate::{
    config::AppConfig,
    error::{CliError, CliResult},
};

pub mod check;
pub mod completions;
pub mod config;
pub mod generate;
pub mod init;
pub mod list;
pub mod scan;

/// Built-in templates, overlaid with `templates.local_path` when configured.
pub(crate) fn template_store(config: &AppConfig) -> CliResult<InMemoryStore> {
    let store = InMemoryStore::with_builtin()?;

    if let Some(dir) = &config.templates.local_path {
        let loaded = store.load_dir(dir).map_err(|e| CliError::ConfigError {
            message: format!("templates.local_path '{}': {e}", dir.display()),
            source: Some(Box::new(e)),
        })?;
        debug!(loaded, dir = %dir.display(), "User templates applied");
    }

    Ok(store)
}

/// Absolute form of a project path, so `.` still yields a project name.
/// Missing paths pass through for the pipeline to report.
pub(crate) fn resolve_dir(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
