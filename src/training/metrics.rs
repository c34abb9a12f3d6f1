//! Diagnostic metrics for the win classifier
//!
//! Holdout accuracy and ROC-AUC are reported for inspection only; they are
//! not part of the serving contract.

/// Fraction of predictions on the correct side of 0.5
pub fn accuracy(probs: &[f32], labels: &[f32]) -> f32 {
    if probs.is_empty() {
        return 0.0;
    }
    let correct = probs
        .iter()
        .zip(labels.iter())
        .filter(|(p, l)| (**p >= 0.5) == (**l >= 0.5))
        .count();
    correct as f32 / probs.len() as f32
}

/// Area under the ROC curve via the rank-sum formulation.
///
/// Tied scores receive their average rank. Degenerate inputs with a single
/// class score 0.5.
pub fn roc_auc(probs: &[f32], labels: &[f32]) -> f32 {
    let n = probs.len();
    let n_pos = labels.iter().filter(|&&l| l >= 0.5).count();
    let n_neg = n - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return 0.5;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| probs[a].partial_cmp(&probs[b]).unwrap_or(std::cmp::Ordering::Equal));

    // Average ranks over tied score groups
    let mut ranks = vec![0.0f64; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && probs[order[j + 1]] == probs[order[i]] {
            j += 1;
        }
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg_rank;
        }
        i = j + 1;
    }

    let pos_rank_sum: f64 = labels
        .iter()
        .zip(ranks.iter())
        .filter(|(l, _)| **l >= 0.5)
        .map(|(_, r)| r)
        .sum();

    let auc = (pos_rank_sum - (n_pos * (n_pos + 1)) as f64 / 2.0) / (n_pos * n_neg) as f64;
    auc as f32
}

/// Summary of one training run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub epochs: usize,
    pub final_loss: f32,
    pub train_accuracy: f32,
    /// Diagnostic metrics on the stratified holdout, when one exists
    pub holdout_accuracy: Option<f32>,
    pub holdout_auc: Option<f32>,
}

impl std::fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "epochs={}, loss={:.4}, train_acc={:.1}%",
            self.epochs,
            self.final_loss,
            self.train_accuracy * 100.0
        )?;
        if let (Some(acc), Some(auc)) = (self.holdout_accuracy, self.holdout_auc) {
            write!(f, ", holdout_acc={:.1}%, holdout_auc={:.3}", acc * 100.0, auc)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy() {
        let probs = [0.9, 0.2, 0.6, 0.4];
        let labels = [1.0, 0.0, 0.0, 0.0];
        assert_eq!(accuracy(&probs, &labels), 0.75);
    }

    #[test]
    fn test_accuracy_empty() {
        assert_eq!(accuracy(&[], &[]), 0.0);
    }

    #[test]
    fn test_auc_perfect_ranking() {
        let probs = [0.1, 0.2, 0.8, 0.9];
        let labels = [0.0, 0.0, 1.0, 1.0];
        assert!((roc_auc(&probs, &labels) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_auc_inverted_ranking() {
        let probs = [0.9, 0.8, 0.2, 0.1];
        let labels = [0.0, 0.0, 1.0, 1.0];
        assert!(roc_auc(&probs, &labels).abs() < 1e-6);
    }

    #[test]
    fn test_auc_ties_are_half() {
        let probs = [0.5, 0.5, 0.5, 0.5];
        let labels = [0.0, 1.0, 0.0, 1.0];
        assert!((roc_auc(&probs, &labels) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_auc_single_class() {
        assert_eq!(roc_auc(&[0.3, 0.7], &[1.0, 1.0]), 0.5);
    }

    #[test]
    fn test_auc_partial() {
        // One inversion among 2x2: AUC = 3/4
        let probs = [0.1, 0.6, 0.4, 0.9];
        let labels = [0.0, 0.0, 1.0, 1.0];
        assert!((roc_auc(&probs, &labels) - 0.75).abs() < 1e-6);
    }
}
