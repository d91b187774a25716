//! Source-to-candidate resolution
//!
//! Each source label is normalized once, scored against the eligible
//! candidates, and either mapped to its best candidate (score at or above
//! the threshold) or reported unmapped with the best score it could get.
//!
//! # Assignment
//!
//! Under `no-reuse` the default strategy is greedy: sources are visited in
//! order and a selected candidate leaves the eligible set for every later
//! source. This is first-come-first-served and not a globally optimal
//! assignment; when two sources compete for one candidate the earlier one
//! wins even if the later one scores higher. `AssignmentStrategy::Optimal`
//! instead maximizes the total score of the above-threshold pairs.
//!
//! # Ties
//!
//! Equal scores are broken by the lexicographically smaller canonical
//! string, then the raw label, then candidate position, so results never
//! depend on iteration order.

use std::cmp::{Ordering, Reverse};

use tracing::{debug, info};

use crate::assignment::optimal_assignment;
use crate::config::{AssignmentStrategy, ResolverConfig, ReusePolicy, SourceOrder};
use crate::error::Result;
use crate::filter::{AllCandidates, CandidateFilter};
use crate::normalization::{NormalizedLabel, Normalizer};
use crate::report::{MatchResult, ResolutionReport, ScoredCandidate};
use crate::similarity::Scorer;

/// Labels of one side with their normalized forms, computed once per run.
struct LabelSet<'a> {
    raw: Vec<&'a str>,
    normalized: Vec<NormalizedLabel>,
}

impl<'a> LabelSet<'a> {
    fn new<S: AsRef<str>>(labels: &'a [S], normalizer: &Normalizer) -> Self {
        let raw: Vec<&str> = labels.iter().map(|l| l.as_ref()).collect();
        let normalized = raw.iter().map(|l| normalizer.normalize(l)).collect();
        Self { raw, normalized }
    }

    fn len(&self) -> usize {
        self.raw.len()
    }

    /// Candidate order used for ties: canonical, then raw label, then position.
    fn tie_order(&self, a: usize, b: usize) -> Ordering {
        self.normalized[a]
            .canonical
            .cmp(&self.normalized[b].canonical)
            .then_with(|| self.raw[a].cmp(self.raw[b]))
            .then_with(|| a.cmp(&b))
    }
}

/// Per-source outcome before it is turned into a [`MatchResult`].
#[derive(Debug, Default)]
struct Decision {
    selected: Option<usize>,
    score: f64,
    alternatives: Vec<(usize, f64)>,
}

/// Resolution engine bound to one validated configuration.
pub struct Resolver {
    config: ResolverConfig,
    normalizer: Normalizer,
    scorer: Scorer,
    filter: Box<dyn CandidateFilter>,
}

impl Resolver {
    /// Validate the configuration and build a resolver.
    ///
    /// Fails before any scoring if the configuration is invalid.
    pub fn new(config: ResolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            normalizer: Normalizer::new(config.abbreviations.clone()),
            scorer: Scorer::new(config.weights, config.sequence_metric),
            filter: Box::new(AllCandidates),
            config,
        })
    }

    /// Replace the candidate prefilter.
    pub fn with_filter(mut self, filter: impl CandidateFilter + 'static) -> Self {
        self.filter = Box::new(filter);
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Score two raw labels with this resolver's normalizer and weights.
    pub fn score(&self, a: &str, b: &str) -> f64 {
        self.scorer
            .score(&self.normalizer.normalize(a), &self.normalizer.normalize(b))
    }

    /// Resolve every source label against the candidate labels.
    pub fn resolve<S, C>(&self, sources: &[S], candidates: &[C]) -> ResolutionReport
    where
        S: AsRef<str>,
        C: AsRef<str>,
    {
        let sources = LabelSet::new(sources, &self.normalizer);
        let candidates = LabelSet::new(candidates, &self.normalizer);

        let decisions = match (self.config.reuse_policy, self.config.strategy) {
            (ReusePolicy::NoReuse, AssignmentStrategy::Optimal) => {
                self.assign_optimal(&sources, &candidates)
            }
            _ => self.assign_greedy(&sources, &candidates),
        };

        let report = self.build_report(&sources, &candidates, decisions);
        info!(
            sources = sources.len(),
            candidates = candidates.len(),
            mapped = report.mapped.len(),
            unmapped = report.unmapped.len(),
            unused = report.unused.len(),
            "resolution complete"
        );
        report
    }

    fn processing_order(&self, sources: &LabelSet) -> Vec<usize> {
        let mut order: Vec<usize> = (0..sources.len()).collect();
        if self.config.source_order == SourceOrder::LongestFirst {
            order.sort_by_key(|&i| Reverse(sources.raw[i].chars().count()));
        }
        order
    }

    /// Score the shortlisted, eligible candidates for one source, best first.
    fn rank(
        &self,
        source: &NormalizedLabel,
        candidates: &LabelSet,
        eligible: &[bool],
    ) -> Vec<(usize, f64)> {
        let mut ranked: Vec<(usize, f64)> = self
            .filter
            .shortlist(source, &candidates.normalized)
            .into_iter()
            .filter(|&j| j < candidates.len() && eligible[j])
            .map(|j| (j, self.scorer.score(source, &candidates.normalized[j])))
            .collect();

        ranked.sort_by(|(a, score_a), (b, score_b)| {
            score_b
                .total_cmp(score_a)
                .then_with(|| candidates.tie_order(*a, *b))
        });
        ranked.dedup_by_key(|(j, _)| *j);
        ranked
    }

    fn assign_greedy(&self, sources: &LabelSet, candidates: &LabelSet) -> Vec<Decision> {
        let mut eligible = vec![true; candidates.len()];
        let mut decisions: Vec<Option<Decision>> = (0..sources.len()).map(|_| None).collect();

        for i in self.processing_order(sources) {
            let ranked = self.rank(&sources.normalized[i], candidates, &eligible);

            let decision = match ranked.first() {
                Some(&(best, score)) if score >= self.config.threshold => Decision {
                    selected: Some(best),
                    score,
                    alternatives: self.runner_ups(&ranked[1..]),
                },
                Some(&(_, score)) => Decision {
                    selected: None,
                    score,
                    alternatives: self.runner_ups(&ranked),
                },
                None => Decision::default(),
            };

            if let Some(best) = decision.selected {
                if self.config.reuse_policy == ReusePolicy::NoReuse {
                    eligible[best] = false;
                }
            }
            decisions[i] = Some(decision);
        }

        decisions.into_iter().map(Option::unwrap_or_default).collect()
    }

    fn assign_optimal(&self, sources: &LabelSet, candidates: &LabelSet) -> Vec<Decision> {
        let everything = vec![true; candidates.len()];
        let ranked: Vec<Vec<(usize, f64)>> = sources
            .normalized
            .iter()
            .map(|source| self.rank(source, candidates, &everything))
            .collect();

        // Columns in tie order so the outcome does not depend on candidate input order.
        let mut columns: Vec<usize> = (0..candidates.len()).collect();
        columns.sort_by(|&a, &b| candidates.tie_order(a, b));
        let mut column_of = vec![0; candidates.len()];
        for (col, &j) in columns.iter().enumerate() {
            column_of[j] = col;
        }

        let matrix: Vec<Vec<f64>> = ranked
            .iter()
            .map(|row| {
                let mut scores = vec![f64::NEG_INFINITY; candidates.len()];
                for &(j, score) in row {
                    scores[column_of[j]] = score;
                }
                scores
            })
            .collect();

        let assignment: Vec<Option<usize>> = optimal_assignment(&matrix, self.config.threshold)
            .into_iter()
            .map(|col| col.map(|c| columns[c]))
            .collect();

        let mut taken = vec![false; candidates.len()];
        for j in assignment.iter().flatten() {
            taken[*j] = true;
        }

        ranked
            .into_iter()
            .zip(assignment)
            .map(|(row, selected)| match selected {
                Some(j) => Decision {
                    selected: Some(j),
                    score: row
                        .iter()
                        .find(|(c, _)| *c == j)
                        .map_or(0.0, |(_, s)| *s),
                    alternatives: self.runner_ups(
                        &row.iter().copied().filter(|(c, _)| *c != j).collect::<Vec<_>>(),
                    ),
                },
                None => {
                    let available: Vec<(usize, f64)> =
                        row.into_iter().filter(|(c, _)| !taken[*c]).collect();
                    Decision {
                        selected: None,
                        score: available.first().map_or(0.0, |(_, s)| *s),
                        alternatives: self.runner_ups(&available),
                    }
                }
            })
            .collect()
    }

    fn runner_ups(&self, ranked: &[(usize, f64)]) -> Vec<(usize, f64)> {
        ranked.iter().take(self.config.runner_ups).copied().collect()
    }

    fn build_report(
        &self,
        sources: &LabelSet,
        candidates: &LabelSet,
        decisions: Vec<Decision>,
    ) -> ResolutionReport {
        let scored = |alternatives: Vec<(usize, f64)>| -> Vec<ScoredCandidate> {
            alternatives
                .into_iter()
                .map(|(j, score)| ScoredCandidate {
                    label: candidates.raw[j].to_string(),
                    score,
                })
                .collect()
        };

        let mut selected = vec![false; candidates.len()];
        let mut report = ResolutionReport::default();

        for (i, decision) in decisions.into_iter().enumerate() {
            let source = sources.raw[i].to_string();
            match decision.selected {
                Some(j) => {
                    debug!(%source, candidate = candidates.raw[j], score = decision.score, "mapped");
                    selected[j] = true;
                    report.mapped.push(MatchResult {
                        source,
                        candidate: Some(candidates.raw[j].to_string()),
                        score: decision.score,
                        alternatives: scored(decision.alternatives),
                    });
                }
                None => {
                    debug!(%source, best_score = decision.score, "unmapped");
                    report.unmapped.push(MatchResult {
                        source,
                        candidate: None,
                        score: decision.score,
                        alternatives: scored(decision.alternatives),
                    });
                }
            }
        }

        report.unused = candidates
            .raw
            .iter()
            .zip(&selected)
            .filter(|(_, used)| !**used)
            .map(|(label, _)| label.to_string())
            .collect();

        report
    }
}

/// Resolve with the default configuration, overriding threshold and reuse policy.
///
/// Fails only when the threshold lies outside [0, 1].
pub fn resolve<S, C>(
    sources: &[S],
    candidates: &[C],
    threshold: f64,
    reuse_policy: ReusePolicy,
) -> Result<ResolutionReport>
where
    S: AsRef<str>,
    C: AsRef<str>,
{
    let config = ResolverConfig::default()
        .with_threshold(threshold)
        .with_reuse_policy(reuse_policy);
    Ok(Resolver::new(config)?.resolve(sources, candidates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn resolver() -> Resolver {
        Resolver::new(ResolverConfig::default()).unwrap()
    }

    #[test]
    fn test_invalid_threshold_fails_fast() {
        let err = resolve(&["a"], &["a"], 1.5, ReusePolicy::NoReuse).unwrap_err();
        assert!(matches!(err, ConfigError::ThresholdOutOfRange { .. }));
    }

    #[test]
    fn test_exact_match() {
        let report = resolver().resolve(&["Asta 1.2 MT"], &["Era", "ASTA 1.2 mt"]);
        assert_eq!(report.mapped.len(), 1);
        assert_eq!(report.mapped[0].candidate.as_deref(), Some("ASTA 1.2 mt"));
        assert_eq!(report.mapped[0].score, 1.0);
        assert_eq!(report.unused, vec!["Era"]);
    }

    #[test]
    fn test_no_reuse_consumes_candidate() {
        let report = resolver().resolve(&["Asta", "Asta"], &["Asta"]);
        assert_eq!(report.mapped.len(), 1);
        assert_eq!(report.unmapped.len(), 1);
        assert_eq!(report.unmapped[0].score, 0.0);
        assert!(report.unused.is_empty());
    }

    #[test]
    fn test_allow_reuse_shares_candidate() {
        let config = ResolverConfig::default().with_reuse_policy(ReusePolicy::AllowReuse);
        let report = Resolver::new(config).unwrap().resolve(&["Asta", "Asta"], &["Asta"]);
        assert_eq!(report.mapped.len(), 2);
        assert!(report.unused.is_empty());
    }

    #[test]
    fn test_tie_breaks_on_canonical_string() {
        // Both candidates score identically against the source.
        let report = resolver().resolve(&["zeta"], &["zeta b", "zeta a"]);
        assert_eq!(report.mapped[0].candidate.as_deref(), Some("zeta a"));
        assert_eq!(report.mapped[0].alternatives[0].label, "zeta b");
        assert_eq!(
            report.mapped[0].score,
            report.mapped[0].alternatives[0].score
        );
    }

    #[test]
    fn test_longest_first_order() {
        let mut config = ResolverConfig::default();
        config.source_order = SourceOrder::LongestFirst;
        let sources = ["Sportz", "Sportz Executive"];
        let candidates = ["Sportz Executive"];

        let as_given = resolver().resolve(&sources, &candidates);
        assert_eq!(as_given.candidate_for("Sportz"), Some("Sportz Executive"));

        let longest = Resolver::new(config).unwrap().resolve(&sources, &candidates);
        assert_eq!(
            longest.candidate_for("Sportz Executive"),
            Some("Sportz Executive")
        );
        assert_eq!(longest.candidate_for("Sportz"), None);
        // Report order follows input order regardless of processing order.
        assert_eq!(longest.unmapped[0].source, "Sportz");
    }

    #[test]
    fn test_optimal_strategy_resolves_contention() {
        let candidates = ["Asta 1.2 MT", "Asta 1.2 AMT"];
        let sources = ["Asta", "Asta MT"];

        let greedy = resolver().resolve(&sources, &candidates);
        let config = ResolverConfig::default().with_strategy(AssignmentStrategy::Optimal);
        let optimal = Resolver::new(config).unwrap().resolve(&sources, &candidates);

        assert_eq!(optimal.mapped.len(), 2);
        assert_eq!(optimal.candidate_for("Asta MT"), Some("Asta 1.2 MT"));
        assert_eq!(optimal.candidate_for("Asta"), Some("Asta 1.2 AMT"));

        let total = |r: &ResolutionReport| r.mapped.iter().map(|m| m.score).sum::<f64>();
        assert!(total(&optimal) >= total(&greedy));
    }

    #[test]
    fn test_unmapped_keeps_near_misses() {
        let config = ResolverConfig::default().with_threshold(0.95);
        let report = Resolver::new(config)
            .unwrap()
            .resolve(&["Sportz"], &["Sportz 1.2 MT", "Asta 1.2 MT"]);
        let miss = &report.unmapped[0];
        assert!(miss.candidate.is_none());
        assert_eq!(miss.alternatives[0].label, "Sportz 1.2 MT");
        assert_eq!(miss.score, miss.alternatives[0].score);
        assert_eq!(report.unused.len(), 2);
    }

    #[test]
    fn test_runner_up_limit() {
        let mut config = ResolverConfig::default();
        config.runner_ups = 1;
        let report = Resolver::new(config)
            .unwrap()
            .resolve(&["Asta"], &["Asta", "Asta MT", "Asta AMT"]);
        assert_eq!(report.mapped[0].alternatives.len(), 1);
    }
}
