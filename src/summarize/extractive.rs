use crate::errors::SummarizeError;
use crate::summarize::rank::top_k_in_order;
use crate::summarize::similarity::{build_matrix, SimilarityMatrix};
use crate::summarize::text::{self, MIN_SENTENCES};
use crate::summarize::textrank::TextRankSummarizer;
use crate::summarize::{stopwords, SummarizeResult, Summarizer, SummaryParams};

const DAMPING: f64 = 0.85;
const CONVERGENCE: f64 = 1e-6;
const MAX_ITERATIONS: usize = 100;

/// Ratio-driven extractive summarizer scored with damped PageRank.
///
/// Refuses input it cannot rank (too few sentences, or no shared vocabulary at
/// all) so the chain moves on to the manual ranker.
#[derive(Default)]
pub struct ExtractiveSummarizer;

impl Summarizer for ExtractiveSummarizer {
    fn name(&self) -> &'static str {
        "extractive"
    }

    fn summarize(&self, context: &str, params: &SummaryParams) -> Result<SummarizeResult, SummarizeError> {
        if let Some(res) = params.passthrough(context, self.name()) {
            return Ok(res);
        }
        let sentences = text::sentences(context);
        if sentences.len() < MIN_SENTENCES {
            return Err(SummarizeError::Other(format!(
                "need at least {MIN_SENTENCES} sentences, got {}",
                sentences.len()
            )));
        }
        let words: Vec<Vec<String>> = sentences.iter().map(|s| text::words(s)).collect();
        let matrix = build_matrix(&words, stopwords::english());
        if !matrix.has_edges() {
            return Err(SummarizeError::Other("no similar sentences to rank".into()));
        }

        let k = TextRankSummarizer::sentence_budget(sentences.len(), params.ratio);
        let summary = if k >= sentences.len() {
            context.to_string()
        } else {
            top_k_in_order(&pagerank(&matrix), k)
                .into_iter()
                .map(|i| sentences[i].as_str())
                .collect::<Vec<_>>()
                .join(" ")
        };
        Ok(SummarizeResult {
            summary,
            backend: self.name().into(),
        })
    }
}

/// Weighted PageRank over the similarity graph.
fn pagerank(matrix: &SimilarityMatrix) -> Vec<f64> {
    let n = matrix.len();
    if n == 0 {
        return Vec::new();
    }
    let out_weight: Vec<f64> = (0..n).map(|j| matrix.row_sum(j)).collect();
    let base = (1.0 - DAMPING) / n as f64;
    let mut scores = vec![1.0 / n as f64; n];
    for _ in 0..MAX_ITERATIONS {
        let mut next = vec![base; n];
        for (i, slot) in next.iter_mut().enumerate() {
            let inbound: f64 = (0..n)
                .filter(|&j| j != i && out_weight[j] > f64::EPSILON)
                .map(|j| matrix.get(j, i) / out_weight[j] * scores[j])
                .sum();
            *slot += DAMPING * inbound;
        }
        let delta = next
            .iter()
            .zip(&scores)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f64, f64::max);
        scores = next;
        if delta < CONVERGENCE {
            break;
        }
    }
    scores
}
