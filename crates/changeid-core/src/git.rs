//! Queries against the enclosing git repository.
//!
//! Commit metadata is read through the `git` binary rather than a
//! reimplementation of the object database, matching what Gerrit's own
//! commit-msg hook shells out to. Every failure surfaces as
//! [`ChangeIdError::GitUnavailable`] so the commit is rejected instead
//! of being written without an identifier.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::ChangeIdError;

/// The commit inputs a Change-Id is derived from, captured at hook time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMetadata {
    /// Tree hash of the index, from `git write-tree`.
    pub tree: String,
    /// Current HEAD commit, absent for a root commit.
    pub parent: Option<String>,
    /// Author identity line, from `git var GIT_AUTHOR_IDENT`.
    pub author: String,
    /// Committer identity line, from `git var GIT_COMMITTER_IDENT`.
    pub committer: String,
}

/// Handle to the repository the hook runs inside.
#[derive(Debug, Clone)]
pub struct GitRepo {
    root: PathBuf,
}

impl GitRepo {
    /// Locate the repository containing `start_dir`.
    ///
    /// # Errors
    ///
    /// Returns `ChangeIdError::GitUnavailable` if the `git` binary cannot
    /// be run or `start_dir` is not inside a work tree.
    pub fn discover(start_dir: &Path) -> Result<Self, ChangeIdError> {
        let output = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(start_dir)
            .output()
            .map_err(|e| ChangeIdError::GitUnavailable(format!("failed to run git: {e}")))?;

        if !output.status.success() {
            return Err(ChangeIdError::GitUnavailable(format!(
                "not inside a git repository: {}",
                start_dir.display()
            )));
        }

        let root = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn git_stdout(&self, args: &[&str]) -> Result<String, ChangeIdError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|e| ChangeIdError::GitUnavailable(format!("failed to run git: {e}")))?;

        if !output.status.success() {
            return Err(ChangeIdError::GitUnavailable(format!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Hash of the tree currently staged in the index.
    pub fn write_tree(&self) -> Result<String, ChangeIdError> {
        self.git_stdout(&["write-tree"])
    }

    /// The commit HEAD points at, or `None` on an unborn branch.
    pub fn head_commit(&self) -> Result<Option<String>, ChangeIdError> {
        let output = Command::new("git")
            .args(["rev-parse", "--verify", "--quiet", "HEAD^0"])
            .current_dir(&self.root)
            .output()
            .map_err(|e| ChangeIdError::GitUnavailable(format!("failed to run git: {e}")))?;

        if !output.status.success() {
            return Ok(None);
        }

        let sha = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(if sha.is_empty() { None } else { Some(sha) })
    }

    /// A `git var` logical variable, e.g. `GIT_AUTHOR_IDENT`.
    pub fn var(&self, name: &str) -> Result<String, ChangeIdError> {
        self.git_stdout(&["var", name])
    }

    /// Gather every input the Change-Id hash is seeded from.
    ///
    /// # Errors
    ///
    /// Returns `ChangeIdError::GitUnavailable` if any of the underlying
    /// commands fail, including when no author identity is configured.
    pub fn commit_metadata(&self) -> Result<CommitMetadata, ChangeIdError> {
        Ok(CommitMetadata {
            tree: self.write_tree()?,
            parent: self.head_commit()?,
            author: self.var("GIT_AUTHOR_IDENT")?,
            committer: self.var("GIT_COMMITTER_IDENT")?,
        })
    }

    /// Hash a payload as a commit object, like `git hash-object -t commit --stdin`.
    pub fn hash_object_commit(&self, payload: &str) -> Result<String, ChangeIdError> {
        let mut child = Command::new("git")
            .args(["hash-object", "-t", "commit", "--stdin"])
            .current_dir(&self.root)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ChangeIdError::GitUnavailable(format!("failed to run git: {e}")))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(payload.as_bytes()).map_err(|e| {
                ChangeIdError::GitUnavailable(format!("failed to write to git hash-object: {e}"))
            })?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| ChangeIdError::GitUnavailable(format!("failed to run git: {e}")))?;

        if !output.status.success() {
            return Err(ChangeIdError::GitUnavailable(format!(
                "git hash-object failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Whether Change-Id insertion is switched on for this repository.
    ///
    /// Reads the `gerrit.createChangeId` config knob; anything other than
    /// an explicit `false` counts as enabled.
    pub fn change_id_enabled(&self) -> Result<bool, ChangeIdError> {
        let output = Command::new("git")
            .args(["config", "--bool", "gerrit.createChangeId"])
            .current_dir(&self.root)
            .output()
            .map_err(|e| ChangeIdError::GitUnavailable(format!("failed to run git: {e}")))?;

        if !output.status.success() {
            return Ok(true);
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim() != "false")
    }
}
