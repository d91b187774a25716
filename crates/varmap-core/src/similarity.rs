//! Similarity scoring between normalized labels

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strsim::{jaro_winkler, normalized_levenshtein};

use crate::config::{ScoreWeights, SequenceMetric};
use crate::normalization::NormalizedLabel;

/// Largest `f64` strictly below 1.0. Only identical labels reach 1.0.
const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

/// Per-signal view of a comparison, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub sequence: f64,
    pub token_set: f64,
    pub containment: f64,
    /// Weighted combination, in [0, 1]
    pub score: f64,
}

impl ScoreBreakdown {
    fn uniform(value: f64) -> Self {
        Self {
            sequence: value,
            token_set: value,
            containment: value,
            score: value,
        }
    }
}

/// Weighted combination of sequence, token-set and containment similarity.
///
/// The score is symmetric, bounded to [0, 1], non-decreasing in each signal,
/// and equals 1.0 exactly when both labels normalized to the same string.
/// Two empty labels score 1.0; an empty label against a non-empty one
/// scores 0.0.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    weights: ScoreWeights,
    metric: SequenceMetric,
}

impl Scorer {
    /// Weights are expected to have passed [`ScoreWeights::validate`].
    pub fn new(weights: ScoreWeights, metric: SequenceMetric) -> Self {
        Self { weights, metric }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn score(&self, a: &NormalizedLabel, b: &NormalizedLabel) -> f64 {
        self.explain(a, b).score
    }

    pub fn explain(&self, a: &NormalizedLabel, b: &NormalizedLabel) -> ScoreBreakdown {
        if a.canonical == b.canonical && a.tokens == b.tokens {
            return ScoreBreakdown::uniform(1.0);
        }
        if a.is_empty() || b.is_empty() {
            return ScoreBreakdown::uniform(0.0);
        }

        let sequence = sequence_similarity(self.metric, &a.canonical, &b.canonical);
        let token_set = jaccard(&a.tokens, &b.tokens);
        let containment = containment(&a.tokens, &b.tokens);

        let w = &self.weights;
        let combined = (w.sequence * sequence + w.token_set * token_set
            + w.containment * containment)
            / w.total();

        ScoreBreakdown {
            sequence,
            token_set,
            containment,
            score: combined.clamp(0.0, BELOW_ONE),
        }
    }
}

/// Character sequence similarity in [0, 1].
///
/// Arguments are ordered before comparison so the result never depends on
/// which side is which.
pub fn sequence_similarity(metric: SequenceMetric, a: &str, b: &str) -> f64 {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    let value = match metric {
        SequenceMetric::Lcs => lcs_ratio(first, second),
        SequenceMetric::Levenshtein => normalized_levenshtein(first, second),
        SequenceMetric::JaroWinkler => jaro_winkler(first, second),
    };
    value.clamp(0.0, 1.0)
}

/// `2 * lcs(a, b) / (|a| + |b|)` over characters.
pub fn lcs_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in &a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    2.0 * prev[b.len()] as f64 / total as f64
}

/// Intersection over union of two token sets.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 1.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Shared tokens over the size of the smaller set.
pub fn containment(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return if a.len() == b.len() { 1.0 } else { 0.0 };
    }
    a.intersection(b).count() as f64 / smaller as f64
}
