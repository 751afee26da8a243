use serde::Deserialize;
use std::path::PathBuf;

use crate::changes::{ChangeSet, ChangeSource};
use crate::errors::InputError;

/// Change set serialized by another tool, or the `{"error": ...}` it wrote instead.
#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Failed { error: String },
    Changes(ChangeSet),
}

pub struct ChangeSetFile {
    path: PathBuf,
}

impl ChangeSetFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn parse(raw: &str) -> Result<ChangeSet, InputError> {
        match serde_json::from_str::<Document>(raw) {
            Ok(Document::Changes(cs)) => Ok(cs),
            Ok(Document::Failed { error }) => Err(InputError::Reported(error)),
            Err(e) => Err(InputError::Malformed(e.to_string())),
        }
    }
}

impl ChangeSource for ChangeSetFile {
    fn describe(&self) -> String {
        format!("change set file {}", self.path.display())
    }

    fn collect(&self) -> Result<ChangeSet, InputError> {
        let raw = std::fs::read_to_string(&self.path)?;
        Self::parse(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_change_set() {
        let cs = ChangeSetFile::parse(
            r#"{"modified":{"a.py":"+x"},"untracked":["b.txt"],"deleted":["c.old"]}"#,
        )
        .expect("parse");
        assert_eq!(cs.modified["a.py"], "+x");
        assert_eq!(cs.untracked, vec!["b.txt"]);
    }

    #[test]
    fn error_document_becomes_input_error() {
        let err = ChangeSetFile::parse(r#"{"error":"not a git repository"}"#).unwrap_err();
        match err {
            InputError::Reported(msg) => assert_eq!(msg, "not a git repository"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            ChangeSetFile::parse("[1, 2]").unwrap_err(),
            InputError::Malformed(_)
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let src = ChangeSetFile::new("/nonexistent/changes.json".into());
        assert!(matches!(src.collect().unwrap_err(), InputError::Io(_)));
    }
}
