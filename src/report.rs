use std::collections::BTreeMap;
use std::fmt::Write as _;

use time::format_description::well_known::Rfc3339;

use crate::changes::{ChangeSet, SummaryResult};

const PREVIEW_CHARS: usize = 500;

fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

fn render_sections(
    out: &mut String,
    heading: &str,
    modified: &BTreeMap<String, String>,
    untracked: &[String],
    deleted: &[String],
    body: impl Fn(&str) -> String,
) {
    if modified.is_empty() && untracked.is_empty() && deleted.is_empty() {
        out.push_str("No changes detected in the repository.\n");
        return;
    }
    if !modified.is_empty() {
        let _ = writeln!(out, "\n----- {heading} ({}) -----", modified.len());
        for (path, text) in modified {
            let _ = writeln!(out, "\nFile: {path}\n{}", body(text));
        }
    }
    if !untracked.is_empty() {
        let _ = writeln!(out, "\n----- UNTRACKED FILES ({}) -----", untracked.len());
        for path in untracked {
            let _ = writeln!(out, "- {path}");
        }
    }
    if !deleted.is_empty() {
        let _ = writeln!(out, "\n----- DELETED FILES ({}) -----", deleted.len());
        for path in deleted {
            let _ = writeln!(out, "- {path}");
        }
    }
}

/// Raw change listing; long diffs are cut to a preview.
pub fn render_changes(changes: &ChangeSet) -> String {
    let mut out = String::from("\n===== UNCOMMITTED CHANGES =====\n");
    render_sections(
        &mut out,
        "MODIFIED/NEW FILES",
        &changes.modified,
        &changes.untracked,
        &changes.deleted,
        preview,
    );
    out
}

pub fn render_summary(result: &SummaryResult) -> String {
    let stamp = result
        .generated_at
        .format(&Rfc3339)
        .unwrap_or_else(|_| result.generated_at.to_string());
    let mut out = format!("\n===== CHANGE DIGEST {stamp} =====\n");
    if result.interrupted {
        out.push_str("(interrupted: some files are shown unsummarized)\n");
    }
    render_sections(
        &mut out,
        "SUMMARIZED FILES",
        &result.modified,
        &result.untracked,
        &result.deleted,
        str::to_string,
    );
    out
}

pub fn render_json(result: &SummaryResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}
