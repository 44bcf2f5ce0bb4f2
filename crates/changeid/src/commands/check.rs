//! CLI handler for `changeid check`.

use std::fs;
use std::path::Path;

use changeid_core::message::{extract_change_id, has_change_id_trailer, split_verbose};

use crate::output::Reporter;

/// Report whether the message file already carries a well-formed
/// Change-Id trailer, without modifying anything.
pub fn run_check(file: &Path, reporter: &mut Reporter) -> bool {
    let text = match fs::read_to_string(file) {
        Ok(t) => t,
        Err(e) => {
            reporter.error(&format!("Cannot read {}: {e}", file.display()));
            return false;
        }
    };

    let (content, _verbose) = split_verbose(&text);
    if has_change_id_trailer(content) {
        match extract_change_id(content).1 {
            Some(id) => reporter.success_with_details("Change-Id present", &id),
            None => reporter.success("Change-Id present"),
        }
        true
    } else {
        reporter.error("Missing or malformed Change-Id trailer");
        false
    }
}
