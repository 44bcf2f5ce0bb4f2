//! Hook installation for native git hooks and the pre-commit framework.
//!
//! Detects whether the repository uses pre-commit and generates the
//! appropriate configuration to run `changeid run` when a commit
//! message is prepared.

use std::fs;
use std::path::Path;

use crate::error::ChangeIdError;

/// Supported hook frameworks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookFramework {
    /// Native git hooks (`.git/hooks/`)
    Native,
    /// pre-commit (`.pre-commit-config.yaml`)
    PreCommit,
}

impl HookFramework {
    /// Returns the lowercase name of the framework.
    pub fn name(&self) -> &str {
        match self {
            HookFramework::Native => "native",
            HookFramework::PreCommit => "pre-commit",
        }
    }
}

impl std::fmt::Display for HookFramework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which git hook the trailer insertion runs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    /// `prepare-commit-msg`, runs before the editor opens.
    PrepareCommitMsg,
    /// `commit-msg`, runs after the message is finalized.
    CommitMsg,
}

impl HookKind {
    /// The hook's file name under `.git/hooks/`.
    pub fn file_name(&self) -> &str {
        match self {
            HookKind::PrepareCommitMsg => "prepare-commit-msg",
            HookKind::CommitMsg => "commit-msg",
        }
    }
}

impl std::fmt::Display for HookKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

/// Auto-detect the hook framework in use at the given project root.
///
/// Returns `None` if no framework configuration is found (caller should
/// default to native).
pub fn detect_framework(project_root: &Path) -> Option<HookFramework> {
    if project_root.join(".pre-commit-config.yaml").exists()
        || project_root.join(".pre-commit-config.yml").exists()
    {
        Some(HookFramework::PreCommit)
    } else {
        None
    }
}

/// Install the hook for the specified framework.
///
/// Returns a human-readable description of what was done.
pub fn install_hook(
    project_root: &Path,
    framework: &HookFramework,
    kind: HookKind,
) -> Result<String, ChangeIdError> {
    match framework {
        HookFramework::Native => install_native(project_root, kind),
        HookFramework::PreCommit => install_pre_commit(project_root, kind),
    }
}

/// The shebang and hook body for native git hooks.
const NATIVE_HOOK_TEMPLATE: &str = "#!/bin/sh\nexec changeid run \"$@\"\n";

/// Install a native git hook by writing a script to `.git/hooks/`.
///
/// An existing hook script that was not written by changeid is left in
/// place and reported as `ChangeIdError::HookExists`.
fn install_native(project_root: &Path, kind: HookKind) -> Result<String, ChangeIdError> {
    let hooks_dir = project_root.join(".git").join("hooks");
    fs::create_dir_all(&hooks_dir)?;

    let hook_path = hooks_dir.join(kind.file_name());
    if hook_path.exists() {
        let existing = fs::read_to_string(&hook_path)?;
        if existing.contains("changeid run") {
            return Ok(format!("Hook already installed at {}", hook_path.display()));
        }
        return Err(ChangeIdError::HookExists(hook_path));
    }

    fs::write(&hook_path, NATIVE_HOOK_TEMPLATE)?;

    // Make executable on Unix
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o755);
        fs::set_permissions(&hook_path, perms)?;
    }

    Ok(format!("Created {}", hook_path.display()))
}

/// Config written when no `.pre-commit-config.yaml` exists yet.
const PRE_COMMIT_TEMPLATE: &str = "\
default_install_hook_types: [pre-commit, {hook}]
repos:
  - repo: https://github.com/changeid-rs/changeid
    rev: v0.1.0
    hooks:
      - id: changeid
        stages: [{hook}]
";

/// YAML snippet appended to an existing `.pre-commit-config.yaml`.
const PRE_COMMIT_SNIPPET: &str = r#"
# Add the following to your .pre-commit-config.yaml:
#
# default_install_hook_types: [pre-commit, {hook}]
# repos:
#   - repo: https://github.com/changeid-rs/changeid
#     rev: v0.1.0
#     hooks:
#       - id: changeid
#         stages: [{hook}]
"#;

/// Install the hook through pre-commit.
///
/// pre-commit uses a structured YAML format that requires careful
/// merging, so for an existing config the entry is appended as a
/// commented block for the user to integrate.
fn install_pre_commit(project_root: &Path, kind: HookKind) -> Result<String, ChangeIdError> {
    let config_path = if project_root.join(".pre-commit-config.yml").exists() {
        project_root.join(".pre-commit-config.yml")
    } else {
        project_root.join(".pre-commit-config.yaml")
    };

    if config_path.exists() {
        let existing = fs::read_to_string(&config_path)?;
        if existing.contains("id: changeid") {
            return Ok(format!(
                "pre-commit hook already configured in {}",
                config_path.display()
            ));
        }
        let snippet = PRE_COMMIT_SNIPPET.replace("{hook}", kind.file_name());
        fs::write(&config_path, format!("{existing}{snippet}"))?;
        return Ok(format!(
            "Added changeid hook configuration notes to {}. \
             Please integrate the commented YAML into your pre-commit config.",
            config_path.display()
        ));
    }

    let content = PRE_COMMIT_TEMPLATE.replace("{hook}", kind.file_name());
    fs::write(&config_path, content)?;
    Ok(format!("Created {}", config_path.display()))
}
