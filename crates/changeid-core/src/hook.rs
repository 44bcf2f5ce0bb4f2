//! The prepare-commit-msg transformation.
//!
//! `ensure_change_id` is the pure rewrite applied to message text;
//! `prepare_message` wraps it with identifier generation against the
//! enclosing repository and decides whether the file needs rewriting.

use std::fs;
use std::path::Path;

use crate::atomic::RewriteGuard;
use crate::changeid::{hash_input, ChangeId};
use crate::error::ChangeIdError;
use crate::git::GitRepo;
use crate::message::{
    append_trailer, extract_change_id, has_change_id_trailer, split_verbose, strip_comments,
    stripspace,
};

/// What [`prepare_message`] decided about the message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    /// The message already carries a well-formed trailer; nothing to write.
    Unchanged,
    /// The rewritten text that should replace the file contents.
    Rewritten(String),
}

/// Ensure `text` carries a `Change-Id` trailer, inserting `id` when the
/// message has none of its own.
///
/// A message whose trailer block already holds a canonical identifier
/// comes back byte-identical, as does one whose only substance is the
/// identifier itself. An identifier found elsewhere in the message, or
/// written with a non-canonical key, is kept verbatim but re-sited as a
/// proper trailer. Rewritten output always ends with a single newline.
///
/// # Errors
///
/// Returns `ChangeIdError::MalformedMessage` when nothing remains of the
/// message once comments and the verbose diff are removed.
pub fn ensure_change_id(text: &str, id: &ChangeId) -> Result<String, ChangeIdError> {
    rewrite_with(text, id.as_str())
}

fn rewrite_with(text: &str, fallback: &str) -> Result<String, ChangeIdError> {
    let (content, verbose) = split_verbose(text);
    if stripspace(&strip_comments(content)).is_empty() {
        return Err(ChangeIdError::MalformedMessage(
            "commit message has no content".to_string(),
        ));
    }
    if has_change_id_trailer(content) {
        return Ok(text.to_string());
    }
    let (without_id, existing) = extract_change_id(content);
    if existing.is_some() && stripspace(&strip_comments(&without_id)).is_empty() {
        // The identifier is the only content; there is no body to attach it to.
        return Ok(text.to_string());
    }
    let value = existing.as_deref().unwrap_or(fallback);
    let rewritten = append_trailer(&without_id, &format!("Change-Id: {value}"));
    let mut out = format!("{rewritten}{verbose}");
    let end = out.trim_end_matches('\n').len();
    out.truncate(end);
    out.push('\n');
    Ok(out)
}

/// Derive a new identifier from the commit inputs git would use right now.
///
/// # Errors
///
/// Returns `ChangeIdError::GitUnavailable` when the tree, parent, or
/// identity cannot be read, or the hash cannot be computed.
pub fn generate_change_id(repo: &GitRepo, clean_message: &str) -> Result<ChangeId, ChangeIdError> {
    let meta = repo.commit_metadata()?;
    let digest = repo.hash_object_commit(&hash_input(&meta, clean_message))?;
    ChangeId::from_digest(&digest).ok_or_else(|| {
        ChangeIdError::GitUnavailable(format!("unexpected hash-object output: {digest}"))
    })
}

/// Apply the full hook transformation to a message file's text.
///
/// Generation only happens when the message carries no identifier at
/// all; an existing identifier, even a misplaced one, is reused so an
/// amended commit keeps its identity.
pub fn prepare_message(repo: &GitRepo, text: &str) -> Result<MessageOutcome, ChangeIdError> {
    let (content, _verbose) = split_verbose(text);
    let clean = stripspace(&strip_comments(content));
    if clean.is_empty() {
        return Err(ChangeIdError::MalformedMessage(
            "commit message has no content".to_string(),
        ));
    }
    if has_change_id_trailer(content) {
        return Ok(MessageOutcome::Unchanged);
    }

    let value = match extract_change_id(content).1 {
        Some(existing) => existing,
        None => generate_change_id(repo, &clean)?.to_string(),
    };
    let rewritten = rewrite_with(text, &value)?;
    if rewritten == text {
        Ok(MessageOutcome::Unchanged)
    } else {
        Ok(MessageOutcome::Rewritten(rewritten))
    }
}

/// Replace the commit message file's contents.
///
/// The previous contents are backed up first and restored if the write
/// fails partway, so an interrupted hook never leaves a mangled file
/// behind.
pub fn write_message(path: &Path, text: &str) -> Result<(), ChangeIdError> {
    let guard = RewriteGuard::new(path)?;
    fs::write(path, text)?;
    guard.commit()
}
