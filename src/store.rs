use std::path::{Path, PathBuf};
use std::process::Command;

use time::format_description::well_known::Rfc3339;

use crate::changes::SummaryResult;
use crate::errors::StoreError;
use crate::report;

const DIGEST_MARKDOWN: &str = "DIGEST.md";
const DIGEST_JSON: &str = "digest.json";

/// A separate git repository that records one commit per digest.
pub struct TrackingStore {
    root: PathBuf,
}

impl TrackingStore {
    pub fn open(root: PathBuf) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&root)?;
        let store = Self { root };
        if !store.root.join(".git").exists() {
            store.git(&["init", "-q"])?;
            tracing::info!(path = %store.root.display(), "initialized tracking repository");
        }
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn git(&self, args: &[&str]) -> Result<String, StoreError> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StoreError::Git(format!("git {}: {}", args.join(" "), stderr.trim())));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Writes the digest and commits it. Returns false when nothing changed.
    pub fn commit(&self, result: &SummaryResult) -> Result<bool, StoreError> {
        std::fs::write(self.root.join(DIGEST_MARKDOWN), report::render_summary(result))?;
        std::fs::write(self.root.join(DIGEST_JSON), report::render_json(result)?)?;
        self.git(&["add", "-A"])?;
        if self.git(&["status", "--porcelain"])?.trim().is_empty() {
            return Ok(false);
        }
        let stamp = result
            .generated_at
            .format(&Rfc3339)
            .unwrap_or_else(|_| result.generated_at.to_string());
        let message = format!("Change digest {stamp}");
        self.git(&[
            "-c",
            "user.name=diff-digest",
            "-c",
            "user.email=diff-digest@localhost",
            "commit",
            "-q",
            "-m",
            &message,
        ])?;
        tracing::info!(path = %self.root.display(), %message, "recorded digest");
        Ok(true)
    }
}
