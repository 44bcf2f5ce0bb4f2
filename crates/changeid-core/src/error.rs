use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChangeIdError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed commit message: {0}")]
    MalformedMessage(String),

    #[error("git unavailable: {0}")]
    GitUnavailable(String),

    #[error("a hook already exists at {0} and was not written by changeid")]
    HookExists(PathBuf),
}
