//! Output Writer - persists validated documents behind timestamped backups.
//!
//! Not safe for concurrent runs against the same directory: the
//! exists/backup/write sequence takes no lock.

use chrono::{Local, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{PathGuard, PathOperation, ValidationResult, WriteResult, security::IGNORE_FILE},
    error::PrimerResult,
};

/// Comment line that precedes the backup globs in the ignore file.
pub const IGNORE_MARKER: &str = "# Primer backups";

/// File names of the generated documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputNames {
    pub primary: &'static str,
    pub secondary: &'static str,
}

impl Default for OutputNames {
    fn default() -> Self {
        Self {
            primary: "AGENTS.md",
            secondary: "CONVENTIONS.md",
        }
    }
}

impl OutputNames {
    pub fn all(&self) -> [&'static str; 2] {
        [self.primary, self.secondary]
    }

    /// Ignore-file globs covering every backup of every output.
    pub fn backup_globs(&self) -> Vec<String> {
        self.all()
            .iter()
            .map(|name| format!("{}.backup.*", name))
            .collect()
    }
}

// ── PendingBackup ────────────────────────────────────────────────────────────

/// A backup that has been taken but not yet settled.
///
/// `commit` leaves the target as it is. `rollback`, or dropping the guard
/// without settling it, copies the backup back over the target.
pub struct PendingBackup<'a> {
    filesystem: &'a dyn Filesystem,
    target: PathBuf,
    backup: PathBuf,
    settled: bool,
}

impl<'a> PendingBackup<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, target: PathBuf, backup: PathBuf) -> Self {
        Self {
            filesystem,
            target,
            backup,
            settled: false,
        }
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup
    }

    pub fn commit(mut self) {
        self.settled = true;
    }

    pub fn rollback(mut self) -> PrimerResult<()> {
        self.settled = true;
        self.filesystem.copy_file(&self.backup, &self.target)
    }
}

impl Drop for PendingBackup<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!(target_file = %self.target.display(), "Unsettled backup, restoring");
        if let Err(e) = self.filesystem.copy_file(&self.backup, &self.target) {
            warn!(error = %e, "Restore from backup failed");
        }
    }
}

/// Settle backups whose targets were never overwritten.
fn release(pending: Vec<Option<PendingBackup<'_>>>) {
    for backup in pending.into_iter().flatten() {
        backup.commit();
    }
}

fn backup_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ── OutputWriter ─────────────────────────────────────────────────────────────

pub struct OutputWriter {
    filesystem: Arc<dyn Filesystem>,
    guard: Arc<PathGuard>,
    names: OutputNames,
}

impl OutputWriter {
    pub fn new(filesystem: Arc<dyn Filesystem>, guard: Arc<PathGuard>) -> Self {
        Self::with_names(filesystem, guard, OutputNames::default())
    }

    pub fn with_names(
        filesystem: Arc<dyn Filesystem>,
        guard: Arc<PathGuard>,
        names: OutputNames,
    ) -> Self {
        Self {
            filesystem,
            guard,
            names,
        }
    }

    pub fn names(&self) -> OutputNames {
        self.names
    }

    /// Write the validated documents into `target_dir`.
    ///
    /// Invalid input is refused without touching anything.
    #[instrument(skip_all, fields(target_dir = %target_dir.display()))]
    pub fn write(&self, validated: &ValidationResult, target_dir: &Path) -> WriteResult {
        if !validated.is_valid {
            return WriteResult::failed(validated.errors.clone());
        }

        let content = &validated.content;
        let mut outputs = vec![(self.names.primary, content.primary.as_str())];
        if let Some(secondary) = &content.secondary {
            outputs.push((self.names.secondary, secondary.as_str()));
        }

        let mut result = WriteResult::empty();

        for (name, _) in &outputs {
            if !self.guard.is_path_allowed(name, PathOperation::Write) {
                result.errors.push(
                    ApplicationError::PathNotAllowed {
                        path: PathBuf::from(name),
                        operation: PathOperation::Write.as_str(),
                    }
                    .to_string(),
                );
                return result;
            }
        }

        match self.take_backups(target_dir, &outputs, &mut result) {
            Ok(pending) => self.write_all(target_dir, &outputs, pending, &mut result),
            Err(e) => {
                warn!(error = %e, "Backup failed, nothing overwritten");
                result.errors.push(e.to_string());
            }
        }

        // Backups stay on disk after a rollback, so they are ignored either way.
        if result.errors.is_empty() || !result.backup_files.is_empty() {
            match self.update_ignore(target_dir, !result.backup_files.is_empty()) {
                Ok(updated) => result.ignore_updated = updated,
                Err(e) => result
                    .warnings
                    .push(format!("Could not update {}: {}", IGNORE_FILE, e)),
            }
        }

        result.success = result.errors.is_empty();
        result.timestamp = Utc::now();
        info!(
            written = result.written_files.len(),
            backups = result.backup_files.len(),
            success = result.success,
            "Write finished"
        );
        result
    }

    /// Back up every existing target before any of them is overwritten.
    ///
    /// Entries line up with `outputs`; `None` marks a target that did not
    /// exist yet.
    fn take_backups(
        &self,
        target_dir: &Path,
        outputs: &[(&'static str, &str)],
        result: &mut WriteResult,
    ) -> Result<Vec<Option<PendingBackup<'_>>>, ApplicationError> {
        let mut pending = Vec::with_capacity(outputs.len());

        for (name, _) in outputs {
            let target = target_dir.join(name);
            if !self.filesystem.exists(&target) {
                pending.push(None);
                continue;
            }

            let backup_name = self.next_backup_name(target_dir, name);
            if !self.guard.is_path_allowed(&backup_name, PathOperation::Write) {
                release(pending);
                return Err(ApplicationError::PathNotAllowed {
                    path: PathBuf::from(&backup_name),
                    operation: PathOperation::Write.as_str(),
                });
            }

            let backup = target_dir.join(&backup_name);
            if let Err(e) = self.filesystem.copy_file(&target, &backup) {
                release(pending);
                return Err(ApplicationError::BackupFailed {
                    path: PathBuf::from(name),
                    reason: e.to_string(),
                });
            }
            debug!(backup = %backup_name, "Backup taken");
            result.backup_files.push(backup_name);
            pending.push(Some(PendingBackup::new(
                self.filesystem.as_ref(),
                target,
                backup,
            )));
        }

        Ok(pending)
    }

    /// Write every output. The first failure undoes the whole step: new
    /// files are removed and every backed-up target is restored.
    fn write_all(
        &self,
        target_dir: &Path,
        outputs: &[(&'static str, &str)],
        pending: Vec<Option<PendingBackup<'_>>>,
        result: &mut WriteResult,
    ) {
        let mut created = Vec::new();
        let mut failure = None;

        for ((name, text), backup) in outputs.iter().zip(&pending) {
            let target = target_dir.join(name);
            let outcome = self.filesystem.write_file(&target, text);
            if backup.is_none() {
                created.push(*name);
            }
            match outcome {
                Ok(()) => result.written_files.push((*name).to_string()),
                Err(e) => {
                    warn!(file = name, error = %e, "Output not written");
                    failure = Some(ApplicationError::WriteFailed {
                        path: PathBuf::from(name),
                        reason: e.to_string(),
                    });
                    break;
                }
            }
        }

        let Some(err) = failure else {
            for backup in pending.into_iter().flatten() {
                backup.commit();
            }
            return;
        };

        for name in created {
            let target = target_dir.join(name);
            if !self.filesystem.exists(&target) {
                continue;
            }
            if let Err(cleanup) = self.filesystem.remove_file(&target) {
                result
                    .warnings
                    .push(format!("Could not remove partial {}: {}", name, cleanup));
            }
        }

        for ((name, _), backup) in outputs.iter().zip(pending) {
            let Some(backup) = backup else {
                continue;
            };
            let backup_name = backup_file_name(backup.backup_path());
            match backup.rollback() {
                Ok(()) => result
                    .warnings
                    .push(format!("Restored {} from {}", name, backup_name)),
                Err(restore) => result.warnings.push(format!(
                    "Could not restore {} from {}: {}",
                    name, backup_name, restore
                )),
            }
        }

        result.written_files.clear();
        result.errors.push(err.to_string());
    }

    /// `<name>.backup.<YYYYMMDD-HHmmss>`, with `-1`, `-2`... on collision.
    fn next_backup_name(&self, target_dir: &Path, name: &str) -> String {
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        let base = format!("{}.backup.{}", name, stamp);
        if !self.filesystem.exists(&target_dir.join(&base)) {
            return base;
        }
        let mut n = 1;
        loop {
            let candidate = format!("{}-{}", base, n);
            if !self.filesystem.exists(&target_dir.join(&candidate)) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Add missing backup globs to the ignore file. Returns whether it
    /// changed.
    fn update_ignore(&self, target_dir: &Path, made_backup: bool) -> PrimerResult<bool> {
        if !self.guard.is_path_allowed(IGNORE_FILE, PathOperation::Write) {
            return Err(ApplicationError::PathNotAllowed {
                path: PathBuf::from(IGNORE_FILE),
                operation: PathOperation::Write.as_str(),
            }
            .into());
        }

        let path = target_dir.join(IGNORE_FILE);
        let globs = self.names.backup_globs();

        if !self.filesystem.exists(&path) {
            if !made_backup {
                return Ok(false);
            }
            let mut content = format!("{}\n", IGNORE_MARKER);
            for glob in &globs {
                content.push_str(glob);
                content.push('\n');
            }
            self.filesystem.write_file(&path, &content)?;
            return Ok(true);
        }

        let existing = self.filesystem.read_to_string(&path)?;
        let missing: Vec<&String> = globs
            .iter()
            .filter(|glob| !existing.lines().any(|line| line.trim() == glob.as_str()))
            .collect();
        if missing.is_empty() {
            return Ok(false);
        }

        let mut content = existing.clone();
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        if !existing.lines().any(|line| line.trim() == IGNORE_MARKER) {
            content.push_str(IGNORE_MARKER);
            content.push('\n');
        }
        for glob in missing {
            content.push_str(glob);
            content.push('\n');
        }
        self.filesystem.write_file(&path, &content)?;
        Ok(true)
    }
}
