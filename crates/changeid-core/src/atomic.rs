//! Backup-restore guard for rewriting the commit message file.
//!
//! git hands the hook the path to its message file (`COMMIT_EDITMSG` or
//! similar); a write that fails partway there would abort the commit with
//! a mangled message. [`RewriteGuard`] copies the file aside before the
//! rewrite begins and, unless [`RewriteGuard::commit`] is called, restores
//! the copy when the guard is dropped.
//!
//! # Examples
//!
//! ```no_run
//! use changeid_core::atomic::RewriteGuard;
//! use std::path::Path;
//!
//! fn rewrite(path: &Path, text: &str) -> Result<(), changeid_core::ChangeIdError> {
//!     let guard = RewriteGuard::new(path)?;
//!     std::fs::write(path, text)?;
//!     guard.commit()?;
//!     Ok(())
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ChangeIdError;

/// Guards a file across an in-place rewrite.
///
/// The backup lives alongside the original, named `{name}.bak.{epoch_secs}`.
/// Dropping an uncommitted guard restores the original from the backup;
/// committing deletes the backup. A guard over a file that does not exist
/// yet takes no backup and is a no-op either way.
pub struct RewriteGuard {
    /// The file being rewritten.
    path: PathBuf,
    /// The backup copy, or `None` when the original did not exist.
    backup: Option<PathBuf>,
    /// Whether [`commit`](RewriteGuard::commit) has run.
    committed: bool,
}

impl RewriteGuard {
    /// Backs up the file at `path` if it exists.
    ///
    /// # Errors
    ///
    /// Returns [`ChangeIdError::Io`] if the file exists but cannot be
    /// copied.
    pub fn new(path: &Path) -> Result<Self, ChangeIdError> {
        let path = path.to_path_buf();

        let backup = if path.exists() {
            let epoch = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("system clock is before UNIX epoch")
                .as_secs();

            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            let backup = path.with_file_name(format!("{name}.bak.{epoch}"));

            fs::copy(&path, &backup)?;
            Some(backup)
        } else {
            None
        };

        Ok(Self {
            path,
            backup,
            committed: false,
        })
    }

    /// Path of the backup copy, if one was taken.
    pub fn backup_path(&self) -> Option<&Path> {
        self.backup.as_deref()
    }

    /// Declares the rewrite successful and deletes the backup.
    ///
    /// Consumes the guard so `Drop` cannot undo a rewrite that already
    /// landed. Even if removing the backup fails, the guard counts as
    /// committed.
    ///
    /// # Errors
    ///
    /// Returns [`ChangeIdError::Io`] if the backup file exists but cannot
    /// be removed.
    pub fn commit(mut self) -> Result<(), ChangeIdError> {
        self.committed = true;
        if let Some(ref backup) = self.backup {
            if backup.exists() {
                fs::remove_file(backup)?;
            }
        }
        Ok(())
    }
}

impl Drop for RewriteGuard {
    fn drop(&mut self) {
        if self.committed {
            return;
        }

        if let Some(ref backup) = self.backup {
            if backup.exists() {
                // Best-effort restore. If this fails there is not much we
                // can do from a destructor -- the backup file remains on
                // disk for manual recovery.
                let _ = fs::copy(backup, &self.path);
                let _ = fs::remove_file(backup);
            }
        }
    }
}
