//! Match results and the resolution report

use serde::{Deserialize, Serialize};

/// A candidate label with its score against some source label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub label: String,
    pub score: f64,
}

/// Outcome for one source label.
///
/// In `mapped`, `candidate` is the selected label and `score` its score.
/// In `unmapped`, `candidate` is `None` and `score` is the best score that
/// was available, kept for diagnostics; `alternatives` then holds the
/// near misses for manual review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub source: String,
    pub candidate: Option<String>,
    pub score: f64,
    /// Ranked runner-up candidates, best first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<ScoredCandidate>,
}

impl MatchResult {
    pub fn is_mapped(&self) -> bool {
        self.candidate.is_some()
    }

    pub fn band(&self) -> ConfidenceBand {
        ConfidenceBand::of(self.score)
    }
}

/// Complete output of one resolution run.
///
/// Every source label appears in exactly one of `mapped` / `unmapped`, in
/// input order. `unused` lists candidates no mapped result selected, in
/// candidate input order.
///
/// Candidates are positional: a label listed twice is two candidates, and
/// under `no-reuse` each copy can be selected once. Callers that want one
/// entry per label de-duplicate before resolving, as the file readers do.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub mapped: Vec<MatchResult>,
    pub unmapped: Vec<MatchResult>,
    pub unused: Vec<String>,
}

impl ResolutionReport {
    /// Number of source labels covered by the report
    pub fn total(&self) -> usize {
        self.mapped.len() + self.unmapped.len()
    }

    /// Look up the result for a source label
    pub fn get(&self, source: &str) -> Option<&MatchResult> {
        self.mapped
            .iter()
            .chain(self.unmapped.iter())
            .find(|r| r.source == source)
    }

    /// Selected candidate for a source label, if it was mapped
    pub fn candidate_for(&self, source: &str) -> Option<&str> {
        self.mapped
            .iter()
            .find(|r| r.source == source)
            .and_then(|r| r.candidate.as_deref())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary::from_report(self)
    }
}

/// Coarse confidence grading used when presenting results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    /// score >= 0.8
    High,
    /// 0.6 <= score < 0.8
    Medium,
    /// score < 0.6
    Low,
}

impl ConfidenceBand {
    pub fn of(score: f64) -> Self {
        if score >= 0.8 {
            Self::High
        } else if score >= 0.6 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Single-character marker for console output.
    pub fn marker(&self) -> char {
        match self {
            Self::High => '●',
            Self::Medium => '◐',
            Self::Low => '○',
        }
    }
}

/// Aggregate statistics over a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub mapped: usize,
    pub unmapped: usize,
    pub unused: usize,
    /// Confidence statistics over mapped results only
    pub mean_confidence: Option<f64>,
    pub min_confidence: Option<f64>,
    pub max_confidence: Option<f64>,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl ReportSummary {
    pub fn from_report(report: &ResolutionReport) -> Self {
        let scores: Vec<f64> = report.mapped.iter().map(|r| r.score).collect();

        let mean_confidence = if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        };
        let min_confidence = scores.iter().copied().reduce(f64::min);
        let max_confidence = scores.iter().copied().reduce(f64::max);

        let count = |band: ConfidenceBand| {
            scores
                .iter()
                .filter(|&&s| ConfidenceBand::of(s) == band)
                .count()
        };

        Self {
            total: report.total(),
            mapped: report.mapped.len(),
            unmapped: report.unmapped.len(),
            unused: report.unused.len(),
            mean_confidence,
            min_confidence,
            max_confidence,
            high: count(ConfidenceBand::High),
            medium: count(ConfidenceBand::Medium),
            low: count(ConfidenceBand::Low),
        }
    }

    /// Share of source labels that were mapped, as a percentage
    pub fn mapped_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.mapped as f64 / self.total as f64 * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapped(source: &str, candidate: &str, score: f64) -> MatchResult {
        MatchResult {
            source: source.to_string(),
            candidate: Some(candidate.to_string()),
            score,
            alternatives: vec![],
        }
    }

    fn sample() -> ResolutionReport {
        ResolutionReport {
            mapped: vec![
                mapped("Asta", "Asta 1.2 MT", 0.91),
                mapped("Sportz DT", "Sportz 1.2 MT Dual Tone", 0.7),
                mapped("S", "S 1.2 MT", 0.55),
            ],
            unmapped: vec![MatchResult {
                source: "Era Executive".to_string(),
                candidate: None,
                score: 0.31,
                alternatives: vec![ScoredCandidate {
                    label: "Era 1.2 MT".to_string(),
                    score: 0.31,
                }],
            }],
            unused: vec!["SX (O) 1.5 DCT".to_string()],
        }
    }

    #[test]
    fn test_confidence_bands() {
        assert_eq!(ConfidenceBand::of(0.8), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::of(0.79), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::of(0.6), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::of(0.0), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::High.marker(), '●');
    }

    #[test]
    fn test_summary() {
        let summary = sample().summary();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.mapped, 3);
        assert_eq!(summary.unmapped, 1);
        assert_eq!(summary.unused, 1);
        assert_eq!((summary.high, summary.medium, summary.low), (1, 1, 1));
        assert_eq!(summary.max_confidence, Some(0.91));
        assert_eq!(summary.min_confidence, Some(0.55));
        assert!((summary.mapped_percent() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_summary() {
        let summary = ResolutionReport::default().summary();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.mean_confidence, None);
        assert_eq!(summary.mapped_percent(), 0.0);
    }

    #[test]
    fn test_lookup() {
        let report = sample();
        assert_eq!(report.candidate_for("Asta"), Some("Asta 1.2 MT"));
        assert_eq!(report.candidate_for("Era Executive"), None);
        assert!(!report.get("Era Executive").unwrap().is_mapped());
        assert!(report.get("missing").is_none());
    }

    #[test]
    fn test_json_shape() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["mapped"][0]["candidate"], "Asta 1.2 MT");
        assert!(value["unmapped"][0]["candidate"].is_null());
        assert_eq!(value["unused"][0], "SX (O) 1.5 DCT");
        assert!(value["mapped"][0].get("alternatives").is_none());
    }
}
