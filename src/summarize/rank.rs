//! Centrality ranking over a [`SimilarityMatrix`].
//!
//! A sentence's score is its row-sum, i.e. its total similarity to every other
//! sentence. This is a one-step centrality proxy, not iterated PageRank;
//! switching to PageRank changes which sentences get picked.

use super::similarity::SimilarityMatrix;

pub fn scores(matrix: &SimilarityMatrix) -> Vec<f64> {
    (0..matrix.len()).map(|i| matrix.row_sum(i)).collect()
}

/// Indices of the `k` best-scoring entries, returned in ascending index order.
/// Equal scores prefer the earlier index.
pub fn top_k_in_order(scores: &[f64], k: usize) -> Vec<usize> {
    let mut ranked: Vec<(usize, f64)> = scores.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    let mut picked: Vec<usize> = ranked.into_iter().take(k).map(|(i, _)| i).collect();
    picked.sort_unstable();
    picked
}

/// Picks the `k` most central sentences and returns them in document order.
/// With `k >= sentences.len()` every sentence is returned.
pub fn rank_and_select(sentences: &[String], matrix: &SimilarityMatrix, k: usize) -> Vec<String> {
    if k >= sentences.len() {
        return sentences.to_vec();
    }
    top_k_in_order(&scores(matrix), k)
        .into_iter()
        .map(|i| sentences[i].clone())
        .collect()
}
