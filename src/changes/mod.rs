pub mod file;
pub mod git;
pub mod model;

use crate::errors::InputError;

pub use file::ChangeSetFile;
pub use git::GitWorkingTree;
pub use model::{ChangeSet, SummaryResult};

/// Anything that can report the uncommitted changes of a working tree.
pub trait ChangeSource: Send + Sync {
    fn describe(&self) -> String;

    fn collect(&self) -> Result<ChangeSet, InputError>;
}
