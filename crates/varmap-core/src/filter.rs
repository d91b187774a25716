//! Candidate prefiltering
//!
//! The resolver scores every shortlisted candidate for every source label.
//! At the scale of one model (tens of labels) scoring all pairs is cheap, so
//! the default filter shortlists everything. Larger inputs can plug in an
//! approximate nearest-neighbour index through [`CandidateFilter`].

use crate::normalization::NormalizedLabel;

/// Chooses which candidates are worth scoring for a source label.
pub trait CandidateFilter: Send + Sync {
    /// Indices into `candidates` to score. Out-of-range indices are ignored.
    fn shortlist(&self, source: &NormalizedLabel, candidates: &[NormalizedLabel]) -> Vec<usize>;
}

/// Shortlists every candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllCandidates;

impl CandidateFilter for AllCandidates {
    fn shortlist(&self, _source: &NormalizedLabel, candidates: &[NormalizedLabel]) -> Vec<usize> {
        (0..candidates.len()).collect()
    }
}

/// Shortlists candidates sharing at least one token with the source,
/// falling back to every candidate when none does.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedTokenFilter;

impl CandidateFilter for SharedTokenFilter {
    fn shortlist(&self, source: &NormalizedLabel, candidates: &[NormalizedLabel]) -> Vec<usize> {
        let sharing: Vec<usize> = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.tokens.is_disjoint(&source.tokens))
            .map(|(i, _)| i)
            .collect();

        if sharing.is_empty() {
            AllCandidates.shortlist(source, candidates)
        } else {
            sharing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalization::Normalizer;

    #[test]
    fn shared_token_filter() {
        let normalizer = Normalizer::default();
        let candidates: Vec<_> = ["Asta 1.2 MT", "Sportz 1.2 AMT", "Era"]
            .iter()
            .map(|c| normalizer.normalize(c))
            .collect();

        let source = normalizer.normalize("Sportz AMT");
        assert_eq!(SharedTokenFilter.shortlist(&source, &candidates), vec![1]);

        let unrelated = normalizer.normalize("Magna");
        assert_eq!(
            SharedTokenFilter.shortlist(&unrelated, &candidates),
            vec![0, 1, 2]
        );
    }
}
