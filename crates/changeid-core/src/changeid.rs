//! The Change-Id identifier and the hashed payload it derives from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::git::CommitMetadata;

/// A Gerrit change identifier: the letter `I` followed by 40 lowercase
/// hex digits, as produced by hashing a commit-shaped payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeId(String);

impl ChangeId {
    /// Validates and wraps an identifier string.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        Self::is_valid(&value).then_some(Self(value))
    }

    /// Wraps a raw 40-hex digest as printed by `git hash-object`.
    pub fn from_digest(digest: &str) -> Option<Self> {
        Self::new(format!("I{digest}"))
    }

    /// Checks the canonical shape: `I` plus 40 lowercase hex digits.
    pub fn is_valid(value: &str) -> bool {
        let Some(hex) = value.strip_prefix('I') else {
            return false;
        };
        hex.len() == 40 && hex.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the payload whose commit-object hash becomes the Change-Id.
///
/// The field set and layout match Gerrit's commit-msg hook, so the
/// identifier is stable across re-runs on unchanged content and agrees
/// with what Gerrit itself would have generated: the current tree, the
/// current HEAD (absent for a root commit), both identities, and the
/// cleaned message body.
pub fn hash_input(meta: &CommitMetadata, clean_message: &str) -> String {
    let mut input = format!("tree {}\n", meta.tree);
    if let Some(parent) = &meta.parent {
        input.push_str(&format!("parent {parent}\n"));
    }
    input.push_str(&format!("author {}\n", meta.author));
    input.push_str(&format!("committer {}\n", meta.committer));
    input.push('\n');
    input.push_str(clean_message);
    input
}
