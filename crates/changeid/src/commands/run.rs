//! CLI handler for `changeid run`.
//!
//! This is the command git invokes through the prepare-commit-msg hook:
//! read the message file, insert a Change-Id trailer if missing, write
//! the file back. A failure exits non-zero so the commit is aborted
//! rather than recorded without an identifier.

use std::env;
use std::fs;
use std::path::Path;

use changeid_core::hook::write_message;
use changeid_core::message::{extract_change_id, split_verbose};
use changeid_core::{prepare_message, GitRepo, MessageOutcome};

use crate::output::Reporter;

/// Ensure the commit message file at `file` carries a Change-Id trailer.
///
/// The file is rewritten in place only when a trailer had to be added.
pub fn run_hook(file: &Path, reporter: &mut Reporter) -> bool {
    let cwd = match env::current_dir() {
        Ok(c) => c,
        Err(e) => {
            reporter.error(&format!("Cannot get current directory: {e}"));
            return false;
        }
    };

    let repo = match GitRepo::discover(&cwd) {
        Ok(r) => r,
        Err(e) => {
            reporter.error(&format!("{e}"));
            return false;
        }
    };

    match repo.change_id_enabled() {
        Ok(true) => {}
        Ok(false) => {
            reporter.info("gerrit.createChangeId is false, leaving message untouched");
            return true;
        }
        Err(e) => {
            reporter.error(&format!("{e}"));
            return false;
        }
    }

    let text = match fs::read_to_string(file) {
        Ok(t) => t,
        Err(e) => {
            reporter.error(&format!("Cannot read {}: {e}", file.display()));
            return false;
        }
    };

    match prepare_message(&repo, &text) {
        Ok(MessageOutcome::Unchanged) => {
            reporter.success("Change-Id already present");
            true
        }
        Ok(MessageOutcome::Rewritten(rewritten)) => {
            if let Err(e) = write_message(file, &rewritten) {
                reporter.error(&format!("Cannot write {}: {e}", file.display()));
                return false;
            }
            let (content, _verbose) = split_verbose(&rewritten);
            match extract_change_id(content).1 {
                Some(id) => reporter.success_with_details("Inserted Change-Id", &id),
                None => reporter.success("Updated commit message"),
            }
            true
        }
        Err(e) => {
            reporter.error(&format!("{e}"));
            false
        }
    }
}
