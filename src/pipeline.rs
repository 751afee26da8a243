use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::changes::{ChangeSet, SummaryResult};
use crate::errors::InputError;
use crate::summarize::{Summarizer, SummaryParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    Code,
    Prose,
}

/// Per-class summarization budgets.
#[derive(Debug, Clone)]
pub struct SummaryPolicy {
    code: SummaryParams,
    prose: SummaryParams,
    code_extensions: HashSet<String>,
}

impl SummaryPolicy {
    pub fn new<'a>(
        code: SummaryParams,
        prose: SummaryParams,
        code_extensions: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            code,
            prose,
            code_extensions: code_extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn classify(&self, path: &str) -> FileClass {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext {
            Some(ext) if self.code_extensions.contains(&ext) => FileClass::Code,
            _ => FileClass::Prose,
        }
    }

    pub fn params_for(&self, path: &str) -> SummaryParams {
        match self.classify(path) {
            FileClass::Code => self.code,
            FileClass::Prose => self.prose,
        }
    }
}

/// Interrupt flag plus an optional deadline, checked between files.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst) || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

pub struct Pipeline {
    summarizer: Arc<dyn Summarizer>,
    policy: SummaryPolicy,
}

impl Pipeline {
    pub fn new(summarizer: Arc<dyn Summarizer>, policy: SummaryPolicy) -> Self {
        Self { summarizer, policy }
    }

    /// Summarizes whatever a change source reported. A source failure is
    /// returned as-is and nothing is summarized.
    pub fn summarize_collected(
        &self,
        collected: Result<ChangeSet, InputError>,
        cancel: &CancelToken,
    ) -> Result<SummaryResult, InputError> {
        let changes = collected?;
        Ok(self.summarize_changes(&changes, cancel))
    }

    /// Every modified path appears in the result: files whose summarization
    /// fails, or that are reached after cancellation, keep their original text.
    pub fn summarize_changes(&self, changes: &ChangeSet, cancel: &CancelToken) -> SummaryResult {
        let mut result = SummaryResult::empty_like(changes);
        if changes.is_empty() {
            tracing::debug!("no uncommitted changes");
        }
        for (path, text) in &changes.modified {
            if !result.interrupted && cancel.is_cancelled() {
                tracing::warn!(path = %path, "summarization interrupted, keeping remaining files verbatim");
                result.interrupted = true;
            }
            if result.interrupted {
                result.modified.insert(path.clone(), text.clone());
                result.backends.insert(path.clone(), "verbatim".into());
                continue;
            }

            let params = self.policy.params_for(path);
            match self.summarizer.summarize(text, &params) {
                Ok(res) => {
                    tracing::debug!(path = %path, backend = %res.backend, chars = res.summary.chars().count(), "summarized");
                    result.modified.insert(path.clone(), res.summary);
                    result.backends.insert(path.clone(), res.backend);
                }
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "summarization failed, keeping original text");
                    result.modified.insert(path.clone(), text.clone());
                    result.backends.insert(path.clone(), "verbatim".into());
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::ChangeSource;
    use crate::config::DEFAULT_CODE_EXTENSIONS;
    use crate::errors::SummarizeError;
    use crate::summarize::{SummarizeResult, SummarizerChain};
    use std::collections::BTreeMap;

    fn policy() -> SummaryPolicy {
        SummaryPolicy::new(
            SummaryParams {
                min_length: 40,
                max_length: 600,
                min_input_length: 400,
                ratio: 0.4,
            },
            SummaryParams {
                min_length: 20,
                max_length: 300,
                min_input_length: 200,
                ratio: 0.2,
            },
            DEFAULT_CODE_EXTENSIONS.iter().copied(),
        )
    }

    fn long_diff() -> String {
        let mut diff = String::from("diff --git a/a.py b/a.py\n--- a/a.py\n+++ b/a.py\n");
        let mut i = 0;
        while diff.len() < 2000 {
            diff.push_str(&format!("+def handler_{i}(request): return parse_request(request, {i})\n"));
            i += 1;
        }
        diff
    }

    fn change_set() -> ChangeSet {
        let mut modified = BTreeMap::new();
        modified.insert("a.py".to_string(), long_diff());
        ChangeSet {
            modified,
            untracked: vec!["b.txt".into()],
            deleted: vec!["c.old".into()],
        }
    }

    struct AlwaysFails;

    impl Summarizer for AlwaysFails {
        fn name(&self) -> &'static str {
            "always_fails"
        }
        fn summarize(&self, _: &str, _: &SummaryParams) -> Result<SummarizeResult, SummarizeError> {
            Err(SummarizeError::Unavailable)
        }
    }

    struct StaticSource(Result<ChangeSet, String>);

    impl ChangeSource for StaticSource {
        fn describe(&self) -> String {
            "static".into()
        }
        fn collect(&self) -> Result<ChangeSet, InputError> {
            self.0.clone().map_err(InputError::Reported)
        }
    }

    #[test]
    fn classifies_by_extension_case_insensitively() {
        let p = policy();
        assert_eq!(p.classify("src/main.PY"), FileClass::Code);
        assert_eq!(p.classify("docs/README.md"), FileClass::Prose);
        assert_eq!(p.classify("Makefile"), FileClass::Prose);
        assert_eq!(p.params_for("x.rs").max_length, 600);
        assert_eq!(p.params_for("notes.txt").max_length, 300);
    }

    #[test]
    fn code_file_summary_fits_policy_and_lists_pass_through() {
        let pipeline = Pipeline::new(Arc::new(SummarizerChain::new(Vec::new())), policy());
        let changes = change_set();
        let res = pipeline.summarize_changes(&changes, &CancelToken::new());
        assert_eq!(res.untracked, vec!["b.txt"]);
        assert_eq!(res.deleted, vec!["c.old"]);
        let summary = &res.modified["a.py"];
        assert!(!summary.is_empty());
        assert!(summary.chars().count() <= 600);
        assert_ne!(summary, &changes.modified["a.py"]);
        assert!(!res.interrupted);
    }

    #[test]
    fn failing_summarizer_keeps_original_text() {
        let pipeline = Pipeline::new(Arc::new(AlwaysFails), policy());
        let changes = change_set();
        let res = pipeline.summarize_changes(&changes, &CancelToken::new());
        assert_eq!(res.modified["a.py"], changes.modified["a.py"]);
        assert_eq!(res.backends["a.py"], "verbatim");
    }

    #[test]
    fn cancelled_run_returns_partial_result_without_dropping_files() {
        let pipeline = Pipeline::new(Arc::new(SummarizerChain::new(Vec::new())), policy());
        let mut changes = change_set();
        changes.modified.insert("z.md".into(), "Short.".into());
        let cancel = CancelToken::new();
        cancel.cancel();
        let res = pipeline.summarize_changes(&changes, &cancel);
        assert!(res.interrupted);
        assert_eq!(res.modified.len(), 2);
        assert_eq!(res.modified["a.py"], changes.modified["a.py"]);
    }

    #[test]
    fn expired_deadline_counts_as_cancelled() {
        let token = CancelToken::new().with_deadline(Instant::now());
        assert!(token.is_cancelled());
        assert!(!CancelToken::new().is_cancelled());
    }

    #[test]
    fn source_error_short_circuits() {
        let pipeline = Pipeline::new(Arc::new(AlwaysFails), policy());
        let collected = StaticSource(Err("bare".into())).collect();
        let err = pipeline
            .summarize_collected(collected, &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, InputError::Reported(ref m) if m == "bare"));

        let collected = StaticSource(Ok(change_set())).collect();
        let ok = pipeline
            .summarize_collected(collected, &CancelToken::new())
            .expect("ok");
        assert_eq!(ok.deleted, vec!["c.old"]);
    }
}
