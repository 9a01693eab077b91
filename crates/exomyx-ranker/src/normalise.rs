//! Score normalisation functions shared by the prioritisers.

/// Rank-based normalisation: assign rank r in [1, N], then n = r/N.
/// Handles ties by averaging ranks. With `higher_is_better` the best raw
/// score gets rank 1; otherwise the best raw score gets rank N and so
/// normalises to 1.0.
/// Returns normalised scores in the same order as input.
pub fn rank_normalise(raw_scores: &[f64], higher_is_better: bool) -> Vec<f64> {
    let n = raw_scores.len();
    if n == 0 {
        return vec![];
    }

    let mut indexed: Vec<(usize, f64)> = raw_scores
        .iter()
        .copied()
        .enumerate()
        .collect();

    if higher_is_better {
        indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    } else {
        indexed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    }

    // Assign ranks (1-indexed), handle ties by averaging
    let mut ranks = vec![0.0f64; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j < n - 1 && (indexed[j].1 - indexed[j + 1].1).abs() < 1e-10 {
            j += 1;
        }
        let avg_rank = (i + 1 + j + 1) as f64 / 2.0;
        for k in i..=j {
            ranks[indexed[k].0] = avg_rank;
        }
        i = j + 1;
    }

    ranks.iter().map(|&r| r / n as f64).collect()
}

/// Divide every score by the best one. All-zero input stays all-zero.
pub fn max_normalise(raw_scores: &[f64]) -> Vec<f64> {
    let best = raw_scores.iter().copied().fold(0.0f64, f64::max);
    if best <= 0.0 {
        return vec![0.0; raw_scores.len()];
    }
    raw_scores.iter().map(|&s| (s / best).clamp(0.0, 1.0)).collect()
}

/// Clamp a provider score into [0, 1]; NaN counts as no evidence.
pub fn unit_clamp(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_normalise_basic() {
        let scores = vec![10.0, 20.0, 30.0];
        let normed = rank_normalise(&scores, false);
        // ascending ranks: 10.0 → 1/3, 20.0 → 2/3, 30.0 → 1.0
        assert!((normed[0] - 1.0/3.0).abs() < 1e-6);
        assert!((normed[1] - 2.0/3.0).abs() < 1e-6);
        assert!((normed[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rank_normalise_ties() {
        let normed = rank_normalise(&[0.5, 0.5, 0.9], false);
        assert!((normed[0] - 0.5).abs() < 1e-6);
        assert!((normed[1] - 0.5).abs() < 1e-6);
        assert!((normed[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_max_normalise() {
        assert_eq!(max_normalise(&[0.2, 0.4, 0.0]), vec![0.5, 1.0, 0.0]);
        assert_eq!(max_normalise(&[0.0, 0.0]), vec![0.0, 0.0]);
        assert!(max_normalise(&[]).is_empty());
    }

    #[test]
    fn test_unit_clamp() {
        assert_eq!(unit_clamp(1.7), 1.0);
        assert_eq!(unit_clamp(f64::NAN), 0.0);
    }
}
