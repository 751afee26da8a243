use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

pub const NEW_FILE_PREFIX: &str = "New file: ";

/// Uncommitted modifications of one working tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Diff text per path; new files carry `"New file: <path>\n<content>"`.
    #[serde(default)]
    pub modified: BTreeMap<String, String>,
    #[serde(default)]
    pub untracked: Vec<String>,
    #[serde(default)]
    pub deleted: Vec<String>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.modified.is_empty() && self.untracked.is_empty() && self.deleted.is_empty()
    }

    pub fn new_file_entry(path: &str, content: &str) -> String {
        format!("{NEW_FILE_PREFIX}{path}\n{content}")
    }
}

/// A [`ChangeSet`] with every modified text condensed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResult {
    pub modified: BTreeMap<String, String>,
    pub untracked: Vec<String>,
    pub deleted: Vec<String>,
    /// Which backend produced each entry of `modified`.
    pub backends: BTreeMap<String, String>,
    /// Set when a deadline or interrupt stopped summarization early.
    pub interrupted: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
}

impl SummaryResult {
    pub fn empty_like(changes: &ChangeSet) -> Self {
        Self {
            modified: BTreeMap::new(),
            untracked: changes.untracked.clone(),
            deleted: changes.deleted.clone(),
            backends: BTreeMap::new(),
            interrupted: false,
            generated_at: OffsetDateTime::now_utc(),
        }
    }
}
