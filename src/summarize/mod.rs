use crate::config::AppConfig;
use crate::errors::SummarizeError;

#[derive(Debug, Clone)]
pub struct SummarizeResult {
    pub summary: String,
    pub backend: String,
}

/// Length budgets for one summarization call. All lengths count characters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryParams {
    pub min_length: usize,
    pub max_length: usize,
    /// Texts shorter than this are returned unchanged.
    pub min_input_length: usize,
    /// Fraction of sentences kept by the extractive backends.
    pub ratio: f64,
}

impl SummaryParams {
    /// The short-input guard shared by the chain and every backend.
    pub fn passthrough(&self, text: &str, backend: &str) -> Option<SummarizeResult> {
        (text.chars().count() < self.min_input_length).then(|| SummarizeResult {
            summary: text.to_string(),
            backend: backend.to_string(),
        })
    }

    /// Budgets for one of `parts` chunks summarized independently.
    pub fn divided(&self, parts: usize) -> Self {
        let parts = parts.max(1);
        Self {
            min_length: self.min_length / parts,
            max_length: (self.max_length / parts).max(1),
            ..*self
        }
    }
}

pub trait Summarizer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Longest input the backend accepts in one call; longer text is chunked.
    fn max_input_length(&self) -> Option<usize> {
        None
    }

    fn summarize(&self, text: &str, params: &SummaryParams) -> Result<SummarizeResult, SummarizeError>;
}

pub mod chain;
pub mod chunk;
pub mod extractive;
#[cfg(feature = "summarizer-llama-cpp")]
mod llama_cpp;
mod ollama;
pub mod rank;
pub mod similarity;
pub mod stopwords;
pub mod text;
pub mod textrank;

use std::sync::Arc;

pub use chain::SummarizerChain;

/// Builds the fallback chain for the configured backend. The manual ranker always comes last.
pub fn build_chain(cfg: &AppConfig) -> SummarizerChain {
    let mut backends: Vec<Arc<dyn Summarizer>> = Vec::new();
    match cfg.summary_backend.as_str() {
        "ollama" => backends.push(Arc::new(ollama::OllamaSummarizer::new(
            cfg.ollama_host.clone(),
            cfg.summary_model.clone(),
            cfg.max_token_length,
        ))),
        #[cfg(feature = "summarizer-llama-cpp")]
        "llama_cpp" => backends.push(Arc::new(llama_cpp::LlamaCppSummarizer::new(
            cfg.summary_model.clone(),
            cfg.max_token_length,
        ))),
        "textrank" => {}
        other if other != "extractive" => {
            tracing::warn!(backend = %other, "unknown summary backend, using extractive");
        }
        _ => {}
    }
    if cfg.summary_backend != "textrank" {
        backends.push(Arc::new(extractive::ExtractiveSummarizer::default()));
    }
    SummarizerChain::new(backends)
}
