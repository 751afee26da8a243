//! Pairwise sentence similarity over bag-of-words vectors.
//!
//! Building a matrix costs O(n²) sentence pairs, each O(v) in the pair's
//! combined vocabulary. That is fine for diff-sized input (tens to low hundreds
//! of sentences) and is the ceiling for this engine.

use std::collections::{BTreeMap, HashSet};

/// `1 - cosine_distance` of the two sentences' word counts, ignoring stop-words.
/// Returns 0 when either side has no countable words.
pub fn similarity(a: &[String], b: &[String], stopwords: &HashSet<&str>) -> f64 {
    let mut vocab: BTreeMap<&str, (u32, u32)> = BTreeMap::new();
    for w in a {
        let entry = vocab.entry(w.as_str()).or_default();
        if !stopwords.contains(w.as_str()) {
            entry.0 += 1;
        }
    }
    for w in b {
        let entry = vocab.entry(w.as_str()).or_default();
        if !stopwords.contains(w.as_str()) {
            entry.1 += 1;
        }
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for &(x, y) in vocab.values() {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    rows: Vec<Vec<f64>>,
}

impl SimilarityMatrix {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.rows[i][j]
    }

    pub fn row_sum(&self, i: usize) -> f64 {
        self.rows[i].iter().sum()
    }

    /// True when at least one pair of sentences shares a word.
    pub fn has_edges(&self) -> bool {
        self.rows.iter().flatten().any(|&w| w > 0.0)
    }
}

/// Builds the matrix from pre-split word lists. The diagonal stays 0.
pub fn build_matrix(sentences: &[Vec<String>], stopwords: &HashSet<&str>) -> SimilarityMatrix {
    let n = sentences.len();
    let mut rows = vec![vec![0.0f64; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let s = similarity(&sentences[i], &sentences[j], stopwords);
            rows[i][j] = s;
            rows[j][i] = s;
        }
    }
    SimilarityMatrix { rows }
}
