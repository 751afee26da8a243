use crate::errors::SummarizeError;
use crate::summarize::rank::rank_and_select;
use crate::summarize::similarity::build_matrix;
use crate::summarize::text::{self, MIN_SENTENCES};
use crate::summarize::{stopwords, SummarizeResult, Summarizer, SummaryParams};

/// Manual graph ranking. No external resources, so it ends every chain.
#[derive(Default)]
pub struct TextRankSummarizer;

impl TextRankSummarizer {
    /// Number of sentences kept for `n` input sentences.
    pub fn sentence_budget(n: usize, ratio: f64) -> usize {
        ((n as f64 * ratio).ceil() as usize).max(1)
    }
}

impl Summarizer for TextRankSummarizer {
    fn name(&self) -> &'static str {
        "textrank"
    }

    fn summarize(&self, context: &str, params: &SummaryParams) -> Result<SummarizeResult, SummarizeError> {
        if let Some(res) = params.passthrough(context, self.name()) {
            return Ok(res);
        }
        let unchanged = || SummarizeResult {
            summary: context.to_string(),
            backend: self.name().into(),
        };

        let sentences = text::sentences(context);
        if sentences.len() < MIN_SENTENCES {
            return Ok(unchanged());
        }
        let k = Self::sentence_budget(sentences.len(), params.ratio);
        if k >= sentences.len() {
            return Ok(unchanged());
        }

        let words: Vec<Vec<String>> = sentences.iter().map(|s| text::words(s)).collect();
        let matrix = build_matrix(&words, stopwords::english());
        let summary = rank_and_select(&sentences, &matrix, k).join(" ");
        tracing::debug!(sentences = sentences.len(), kept = k, "textrank selection");
        Ok(SummarizeResult {
            summary,
            backend: self.name().into(),
        })
    }
}
