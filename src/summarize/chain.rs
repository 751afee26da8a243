use std::sync::Arc;

use crate::errors::SummarizeError;
use crate::summarize::chunk;
use crate::summarize::textrank::TextRankSummarizer;
use crate::summarize::{SummarizeResult, Summarizer, SummaryParams};

/// Ordered fallback over several backends.
///
/// Backends are tried in preference order and any failure moves on to the
/// next one. The manual ranker is always appended last. Output is clipped to
/// `max_length` characters, except for text returned by the short-input guard.
pub struct SummarizerChain {
    backends: Vec<Arc<dyn Summarizer>>,
}

impl SummarizerChain {
    pub fn new(mut backends: Vec<Arc<dyn Summarizer>>) -> Self {
        backends.push(Arc::new(TextRankSummarizer));
        Self { backends }
    }

    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    fn run_backend(
        &self,
        backend: &dyn Summarizer,
        text: &str,
        params: &SummaryParams,
    ) -> Result<SummarizeResult, SummarizeError> {
        let len = text.chars().count();
        let limit = match backend.max_input_length() {
            Some(limit) if limit < len => limit,
            _ => return backend.summarize(text, params),
        };

        let chunks = chunk::split(text, limit);
        let per_chunk = params.divided(chunks.len());
        tracing::debug!(backend = backend.name(), chunks = chunks.len(), chars = len, "chunking input");
        let mut parts = Vec::with_capacity(chunks.len());
        for piece in &chunks {
            if piece.chars().count() < params.min_input_length {
                continue;
            }
            let res = backend.summarize(piece, &per_chunk)?;
            let part = res.summary.trim();
            if !part.is_empty() {
                parts.push(part.to_string());
            }
        }
        if parts.is_empty() {
            return Err(SummarizeError::Other("every chunk was below the input threshold".into()));
        }
        Ok(SummarizeResult {
            summary: parts.join(" "),
            backend: backend.name().into(),
        })
    }
}

impl Summarizer for SummarizerChain {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn summarize(&self, text: &str, params: &SummaryParams) -> Result<SummarizeResult, SummarizeError> {
        if let Some(res) = params.passthrough(text, "passthrough") {
            return Ok(res);
        }
        let mut last_err = None;
        for backend in &self.backends {
            match self.run_backend(backend.as_ref(), text, params) {
                Ok(mut res) => {
                    res.summary = clip_chars(res.summary, params.max_length);
                    return Ok(res);
                }
                Err(e) => {
                    tracing::warn!(backend = backend.name(), error = %e, "summarizer backend failed, falling back");
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or(SummarizeError::Unavailable))
    }
}

fn clip_chars(mut s: String, max_chars: usize) -> String {
    if let Some((idx, _)) = s.char_indices().nth(max_chars) {
        s.truncate(idx);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingSummarizer {
        calls: Arc<AtomicUsize>,
    }

    impl Summarizer for FailingSummarizer {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn summarize(&self, _: &str, _: &SummaryParams) -> Result<SummarizeResult, SummarizeError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Err(SummarizeError::Http("connect refused".into()))
        }
    }

    /// Echoes the first word of each input; accepts at most `limit` characters.
    struct FirstWordSummarizer {
        limit: usize,
        seen: Arc<std::sync::Mutex<Vec<(String, SummaryParams)>>>,
    }

    impl Summarizer for FirstWordSummarizer {
        fn name(&self) -> &'static str {
            "first_word"
        }
        fn max_input_length(&self) -> Option<usize> {
            Some(self.limit)
        }
        fn summarize(&self, text: &str, params: &SummaryParams) -> Result<SummarizeResult, SummarizeError> {
            assert!(text.chars().count() <= self.limit);
            self.seen.lock().unwrap().push((text.to_string(), *params));
            Ok(SummarizeResult {
                summary: text.split_whitespace().next().unwrap_or("").to_string(),
                backend: self.name().into(),
            })
        }
    }

    fn params(min_input_length: usize, max_length: usize) -> SummaryParams {
        SummaryParams {
            min_length: 10,
            max_length,
            min_input_length,
            ratio: 0.4,
        }
    }

    const FIVE: &str = "Weather was pleasant today. \
                        Parser now reports token errors. \
                        Lunch was late. \
                        Token errors include parser positions. \
                        Parser token errors are tested.";

    #[test]
    fn short_input_passes_through_untouched() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = SummarizerChain::new(vec![Arc::new(FailingSummarizer { calls: calls.clone() })]);
        let res = chain.summarize("Short note.", &params(100, 5)).expect("ok");
        assert_eq!(res.summary, "Short note.");
        assert_eq!(res.backend, "passthrough");
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn failing_primary_falls_back_to_manual_ranking() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = SummarizerChain::new(vec![Arc::new(FailingSummarizer { calls: calls.clone() })]);
        let p = params(0, 1000);
        let res = chain.summarize(FIVE, &p).expect("ok");
        let manual = TextRankSummarizer.summarize(FIVE, &p).expect("manual");
        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert_eq!(res.backend, "textrank");
        assert_eq!(res.summary, manual.summary);
        assert!(!res.summary.is_empty());
    }

    #[test]
    fn output_is_clipped_to_max_length() {
        let chain = SummarizerChain::new(Vec::new());
        let res = chain.summarize(FIVE, &params(0, 12)).expect("ok");
        assert_eq!(res.summary.chars().count(), 12);
    }

    #[test]
    fn oversized_input_is_chunked_and_joined() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let backend = FirstWordSummarizer {
            limit: 20,
            seen: seen.clone(),
        };
        let chain = SummarizerChain::new(vec![Arc::new(backend)]);
        let text = "alpha one two three\n\nx\n\nbeta four five six\n\ngamma seven eight";
        let res = chain.summarize(text, &params(5, 90)).expect("ok");
        assert_eq!(res.backend, "first_word");
        // "x" is below the input threshold and contributes nothing
        assert_eq!(res.summary, "alpha beta gamma");
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|(_, p)| p.max_length == 22 && p.min_length == 2));
    }

    #[test]
    fn long_paragraph_never_exceeds_backend_limit() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let backend = FirstWordSummarizer {
            limit: 20,
            seen: seen.clone(),
        };
        let chain = SummarizerChain::new(vec![Arc::new(backend)]);
        let text = format!("intro line\n\n{}", "word ".repeat(12));
        let res = chain.summarize(&text, &params(0, 200)).expect("ok");
        assert_eq!(res.backend, "first_word");
        let seen = seen.lock().unwrap();
        assert!(seen.len() >= 4);
        assert!(seen.iter().all(|(piece, _)| piece.chars().count() <= 20));
    }

    #[test]
    fn clip_respects_char_boundaries() {
        assert_eq!(clip_chars("héllo".into(), 2), "hé");
        assert_eq!(clip_chars("hi".into(), 5), "hi");
    }
}
