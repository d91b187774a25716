//! Optimal one-to-one assignment via Kuhn-Munkres

use pathfinding::kuhn_munkres::{kuhn_munkres, Weights};

/// Fixed-point scale for turning scores into integer weights.
const SCALE: f64 = 1_000_000.0;

/// Pick at most one column per row so the total score of the chosen
/// above-threshold pairs is maximal.
///
/// `scores[i][j]` is the score of row `i` against column `j`; rows must all
/// have the same length. Pairs below `threshold` (including `NEG_INFINITY`
/// placeholders for unscored pairs) are never chosen.
pub(crate) fn optimal_assignment(scores: &[Vec<f64>], threshold: f64) -> Vec<Option<usize>> {
    let rows = scores.len();
    let columns = scores.first().map_or(0, Vec::len);
    if rows == 0 || columns == 0 {
        return vec![None; rows];
    }

    // Padding rows/columns carry weight 0, so a real above-threshold pair
    // (weight >= 1) is always preferred over leaving a row unassigned.
    let size = rows.max(columns);
    let mut data = vec![vec![0i64; size]; size];
    for (i, row) in scores.iter().enumerate() {
        for (j, &score) in row.iter().enumerate().take(columns) {
            if score >= threshold {
                data[i][j] = (score * SCALE).round() as i64 + 1;
            }
        }
    }

    let (_, assignment) = kuhn_munkres(&SquareWeights::new(data));

    assignment
        .into_iter()
        .take(rows)
        .enumerate()
        .map(|(i, j)| (j < columns && scores[i][j] >= threshold).then_some(j))
        .collect()
}

/// Square weight matrix for `kuhn_munkres`.
struct SquareWeights {
    data: Vec<Vec<i64>>,
    size: usize,
}

impl SquareWeights {
    fn new(data: Vec<Vec<i64>>) -> Self {
        let size = data.len();
        Self { data, size }
    }
}

impl Weights<i64> for SquareWeights {
    fn rows(&self) -> usize {
        self.size
    }

    fn columns(&self) -> usize {
        self.size
    }

    fn at(&self, row: usize, col: usize) -> i64 {
        self.data
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(0)
    }

    fn neg(&self) -> Self {
        let data = self
            .data
            .iter()
            .map(|row| row.iter().map(|&v| -v).collect())
            .collect();
        Self {
            data,
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beats_greedy() {
        // Greedy would give row 0 column 0 (0.9) and leave row 1 with 0.2.
        let scores = vec![vec![0.9, 0.8], vec![0.85, 0.2]];
        let assignment = optimal_assignment(&scores, 0.5);
        assert_eq!(assignment, vec![Some(1), Some(0)]);
    }

    #[test]
    fn test_below_threshold_left_unassigned() {
        let scores = vec![vec![0.3, 0.2], vec![0.7, 0.1]];
        assert_eq!(optimal_assignment(&scores, 0.5), vec![None, Some(0)]);
    }

    #[test]
    fn test_more_rows_than_columns() {
        let scores = vec![vec![0.6], vec![0.9], vec![0.7]];
        assert_eq!(optimal_assignment(&scores, 0.5), vec![None, Some(0), None]);
    }

    #[test]
    fn test_unscored_pairs_never_chosen() {
        let scores = vec![vec![f64::NEG_INFINITY, 0.0]];
        assert_eq!(optimal_assignment(&scores, 0.0), vec![Some(1)]);
    }

    #[test]
    fn test_empty() {
        assert!(optimal_assignment(&[], 0.5).is_empty());
        assert_eq!(optimal_assignment(&[vec![]], 0.5), vec![None]);
    }
}
