use std::path::{Path, PathBuf};
use std::process::Command;

use crate::changes::{ChangeSet, ChangeSource};
use crate::errors::InputError;

/// Reads uncommitted changes from a working tree through the `git` CLI.
pub struct GitWorkingTree {
    root: PathBuf,
}

impl GitWorkingTree {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn git(&self, args: &[&str]) -> Result<String, InputError> {
        run_git(&self.root, args)
    }
}

pub(crate) fn run_git(dir: &Path, args: &[&str]) -> Result<String, InputError> {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .map_err(|e| InputError::Git(format!("failed to run git: {e}")))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(InputError::Git(stderr.trim().to_string()));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parses `git diff --name-status -z` output. Renames and copies carry two
/// paths; the new one is reported.
fn parse_name_status(output: &str) -> Vec<(char, &str)> {
    let mut fields = output.split('\0').filter(|f| !f.is_empty());
    let mut entries = Vec::new();
    while let Some(code) = fields.next() {
        let Some(status) = code.chars().next() else {
            continue;
        };
        if matches!(status, 'R' | 'C') {
            fields.next();
        }
        match fields.next() {
            Some(path) => entries.push((status, path)),
            None => break,
        }
    }
    entries
}

impl ChangeSource for GitWorkingTree {
    fn describe(&self) -> String {
        format!("git working tree {}", self.root.display())
    }

    fn collect(&self) -> Result<ChangeSet, InputError> {
        if self.git(&["rev-parse", "--is-bare-repository"])?.trim() == "true" {
            return Err(InputError::BareRepository);
        }

        let mut changes = ChangeSet::default();
        let listing = self.git(&["diff", "--name-status", "-z"])?;
        for (status, path) in parse_name_status(&listing) {
            if status == 'D' {
                changes.deleted.push(path.to_string());
                continue;
            }
            let diff = self
                .git(&["--literal-pathspecs", "diff", "--", path])
                .unwrap_or_else(|e| format!("Error retrieving diff: {e}"));
            changes.modified.insert(path.to_string(), diff);
        }
        if !changes.modified.is_empty() {
            tracing::info!(count = changes.modified.len(), "found modified files");
        }

        let untracked = self.git(&["ls-files", "--others", "--exclude-standard", "-z"])?;
        for path in untracked.split('\0').filter(|p| !p.is_empty()) {
            let entry = match std::fs::read_to_string(self.root.join(path)) {
                Ok(content) => ChangeSet::new_file_entry(path, &content),
                Err(e) => format!("Error reading new file: {e}"),
            };
            changes.untracked.push(path.to_string());
            changes.modified.insert(path.to_string(), entry);
        }
        if !changes.untracked.is_empty() {
            tracing::info!(count = changes.untracked.len(), "found untracked files");
        }
        Ok(changes)
    }
}
