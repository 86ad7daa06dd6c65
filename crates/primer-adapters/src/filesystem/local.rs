//! Local filesystem adapter using std::fs.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use primer_core::{
    application::{ApplicationError, ports::{Filesystem, SKIPPED_DIRS}},
    error::{PrimerError, PrimerResult},
};
use tracing::debug;
use walkdir::WalkDir;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> PrimerResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn list_files(&self, root: &Path, max_depth: usize) -> PrimerResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !(entry.file_type().is_dir()
                        && SKIPPED_DIRS.iter().any(|skip| entry.file_name() == *skip))
            });

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                PrimerError::from(ApplicationError::FilesystemError {
                    path,
                    reason: format!("Failed to list directory: {}", e),
                })
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Writes a sibling temp file, then renames it over `path`.
    fn write_file(&self, path: &Path, content: &str) -> PrimerResult<()> {
        let tmp = temp_sibling(path);
        let result = std::fs::File::create(&tmp)
            .and_then(|mut file| {
                file.write_all(content.as_bytes())?;
                file.sync_all()
            })
            .and_then(|()| std::fs::rename(&tmp, path));

        if let Err(e) = result {
            if tmp.exists() {
                if let Err(cleanup) = std::fs::remove_file(&tmp) {
                    debug!(tmp = %tmp.display(), error = %cleanup, "Temp file cleanup failed");
                }
            }
            return Err(map_io_error(path, e, "write file"));
        }
        debug!(path = %path.display(), bytes = content.len(), "Wrote file");
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> PrimerResult<()> {
        std::fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| map_io_error(to, e, "copy file"))
    }

    fn remove_file(&self, path: &Path) -> PrimerResult<()> {
        std::fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.primer-tmp", name))
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> PrimerError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
