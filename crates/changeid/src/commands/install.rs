//! CLI handler for `changeid install`.

use std::env;

use changeid_core::install::{detect_framework, install_hook, HookFramework, HookKind};
use changeid_core::GitRepo;

use crate::cli::HookChoice;
use crate::output::Reporter;

/// Install the hook at the repository root, auto-detecting the framework
/// unless one was forced.
pub fn run_install(
    native: bool,
    pre_commit: bool,
    hook: HookChoice,
    reporter: &mut Reporter,
) -> bool {
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

    let framework = if native {
        HookFramework::Native
    } else if pre_commit {
        HookFramework::PreCommit
    } else {
        // Auto-detect
        match detect_framework(repo.root()) {
            Some(f) => {
                reporter.info(&format!("Detected hook framework: {f}"));
                f
            }
            None => {
                reporter.info("No hook framework detected, defaulting to native git hooks");
                HookFramework::Native
            }
        }
    };

    let kind = match hook {
        HookChoice::PrepareCommitMsg => HookKind::PrepareCommitMsg,
        HookChoice::CommitMsg => HookKind::CommitMsg,
    };

    reporter.section(&format!("Installing {kind} hook via {framework}"));

    match install_hook(repo.root(), &framework, kind) {
        Ok(msg) => {
            reporter.success(&msg);
            true
        }
        Err(e) => {
            reporter.error(&format!("Failed to install hook: {e}"));
            false
        }
    }
}
