use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "changeid", version, about = "Gerrit Change-Id commit message hook")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Color mode
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorMode,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ensure a commit message file carries a Change-Id trailer (hook entry point)
    Run {
        /// Path to the commit message file
        file: PathBuf,

        /// Commit source passed by git (message, template, merge, squash, commit)
        source: Option<String>,

        /// Commit object passed by git when amending
        commit: Option<String>,
    },

    /// Check that a commit message file carries a well-formed Change-Id
    Check {
        /// Path to the commit message file
        file: PathBuf,
    },

    /// Install the hook into the current repository
    Install {
        /// Write a native git hook script
        #[arg(long)]
        native: bool,

        /// Configure the pre-commit framework
        #[arg(long)]
        pre_commit: bool,

        /// Which git hook to install
        #[arg(long, value_enum, default_value = "prepare-commit-msg")]
        hook: HookChoice,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HookChoice {
    PrepareCommitMsg,
    CommitMsg,
}
