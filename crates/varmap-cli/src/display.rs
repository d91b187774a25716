//! Console rendering of a resolution report

use varmap_core::{ReportSummary, ResolutionReport};

const RULE_WIDTH: usize = 100;

fn rule(out: &mut String) {
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
}

fn line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

/// Mapped pairs with confidence markers, unmapped labels with their best
/// score, then unused candidates. Each section is sorted by label.
pub fn render_mapping(report: &ResolutionReport, threshold: f64) -> String {
    let mut out = String::new();
    rule(&mut out);
    line(&mut out, &format!("VARIANT MAPPING (threshold {threshold:.2})"));
    rule(&mut out);

    if !report.mapped.is_empty() {
        line(&mut out, &format!("\nMapped ({}):\n", report.mapped.len()));
        let mut mapped: Vec<_> = report.mapped.iter().collect();
        mapped.sort_by(|a, b| a.source.cmp(&b.source));
        for result in mapped {
            line(
                &mut out,
                &format!(
                    "  {} {:40} -> {:50} [{:.2}]",
                    result.band().marker(),
                    result.source,
                    result.candidate.as_deref().unwrap_or_default(),
                    result.score
                ),
            );
        }
    }

    if !report.unmapped.is_empty() {
        line(&mut out, &format!("\nUnmapped ({}):\n", report.unmapped.len()));
        let mut unmapped: Vec<_> = report.unmapped.iter().collect();
        unmapped.sort_by(|a, b| a.source.cmp(&b.source));
        for result in unmapped {
            let mut entry = format!("  x {:40} (best score: {:.2})", result.source, result.score);
            if let Some(nearest) = result.alternatives.first() {
                entry.push_str(&format!(" nearest: {}", nearest.label));
            }
            line(&mut out, &entry);
        }
    }

    if !report.unused.is_empty() {
        line(&mut out, &format!("\nUnused candidates ({}):\n", report.unused.len()));
        let mut unused: Vec<_> = report.unused.iter().collect();
        unused.sort();
        for candidate in unused {
            line(&mut out, &format!("  - {candidate}"));
        }
    }

    out.push('\n');
    out
}

/// Totals, confidence spread and band counts.
pub fn render_summary(summary: &ReportSummary) -> String {
    let mut out = String::new();
    rule(&mut out);
    line(
        &mut out,
        &format!(
            "SUMMARY: {}/{} mapped ({:.1}%), {} unmapped, {} unused candidates",
            summary.mapped,
            summary.total,
            summary.mapped_percent(),
            summary.unmapped,
            summary.unused
        ),
    );

    if let (Some(mean), Some(min), Some(max)) = (
        summary.mean_confidence,
        summary.min_confidence,
        summary.max_confidence,
    ) {
        line(&mut out, &format!("Confidence: mean {mean:.3}, min {min:.3}, max {max:.3}"));
        line(
            &mut out,
            &format!(
                "  ● high (>= 0.8): {}   ◐ medium (0.6-0.8): {}   ○ low (< 0.6): {}",
                summary.high, summary.medium, summary.low
            ),
        );
    }
    rule(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use varmap_core::{MatchResult, ScoredCandidate};

    fn report() -> ResolutionReport {
        ResolutionReport {
            mapped: vec![
                MatchResult {
                    source: "Sportz DT".to_string(),
                    candidate: Some("Sportz 1.2 MT Dual Tone".to_string()),
                    score: 0.83,
                    alternatives: vec![],
                },
                MatchResult {
                    source: "Asta OPT".to_string(),
                    candidate: Some("Asta (O) 1.2 MT".to_string()),
                    score: 0.76,
                    alternatives: vec![],
                },
            ],
            unmapped: vec![MatchResult {
                source: "Magna".to_string(),
                candidate: None,
                score: 0.21,
                alternatives: vec![ScoredCandidate {
                    label: "Era 1.2 MT".to_string(),
                    score: 0.21,
                }],
            }],
            unused: vec!["Era 1.2 MT".to_string()],
        }
    }

    #[test]
    fn test_render_mapping() {
        let text = render_mapping(&report(), 0.5);
        assert!(text.contains("threshold 0.50"));
        assert!(text.contains("Mapped (2)"));
        assert!(text.contains("● Sportz DT"));
        assert!(text.contains("◐ Asta OPT"));
        assert!(text.contains("(best score: 0.21) nearest: Era 1.2 MT"));
        assert!(text.contains("  - Era 1.2 MT"));
        // Sorted by source label.
        assert!(text.find("Asta OPT").unwrap() < text.find("Sportz DT").unwrap());
    }

    #[test]
    fn test_render_summary() {
        let text = render_summary(&report().summary());
        assert!(text.contains("2/3 mapped (66.7%)"));
        assert!(text.contains("high (>= 0.8): 1"));
        assert!(text.contains("medium (0.6-0.8): 1"));
    }

    #[test]
    fn test_rendering_layout() {
        let text = render_mapping(&ResolutionReport::default(), 0.5);
        let rule = "=".repeat(RULE_WIDTH);
        assert_eq!(text, format!("{rule}\nVARIANT MAPPING (threshold 0.50)\n{rule}\n\n"));

        let text = render_mapping(&report(), 0.5);
        assert!(text.contains("\nUnmapped (1):\n\n  x Magna"));
        assert!(text.ends_with("  - Era 1.2 MT\n\n"));
    }

    #[test]
    fn test_empty_summary_has_no_confidence_line() {
        let text = render_summary(&ResolutionReport::default().summary());
        assert!(text.contains("0/0 mapped (0.0%)"));
        assert!(!text.contains("Confidence"));
    }
}
