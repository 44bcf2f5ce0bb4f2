pub mod atomic;
pub mod changeid;
pub mod error;
pub mod git;
pub mod hook;
pub mod install;
pub mod message;

pub use changeid::ChangeId;
pub use error::ChangeIdError;
pub use git::{CommitMetadata, GitRepo};
pub use hook::{ensure_change_id, generate_change_id, prepare_message, MessageOutcome};
