//! Depth-limited regression tree used as the boosting weak learner
//!
//! Splits are found by exhaustive scan over every feature: candidate
//! thresholds are the midpoints between consecutive distinct values, scored
//! by the reduction in sum of squared error. Deterministic given the input:
//! the first feature/threshold with a strictly larger gain wins.

use serde::{Deserialize, Serialize};

/// Minimum SSE reduction for a split to be worth keeping
const MIN_GAIN: f64 = 1e-12;

/// Growth limits shared by every node of a tree
#[derive(Debug, Clone, Copy)]
pub struct GrowthLimits {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        gain: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

/// A fitted regression tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    root: TreeNode,
}

impl RegressionTree {
    /// Fit a tree to `targets` over the rows named by `indices`
    pub fn fit(
        x: &[Vec<f64>],
        targets: &[f64],
        indices: &[usize],
        limits: GrowthLimits,
    ) -> Self {
        Self {
            root: grow(x, targets, indices, 0, limits),
        }
    }

    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    node = if row[*feature] <= *threshold { left } else { right };
                }
            }
        }
    }

    /// Add each split's gain to the per-feature accumulator
    pub fn accumulate_gain(&self, gains: &mut [f64]) {
        fn walk(node: &TreeNode, gains: &mut [f64]) {
            if let TreeNode::Split {
                feature,
                gain,
                left,
                right,
                ..
            } = node
            {
                gains[*feature] += gain;
                walk(left, gains);
                walk(right, gains);
            }
        }
        walk(&self.root, gains);
    }
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
}

fn grow(
    x: &[Vec<f64>],
    targets: &[f64],
    indices: &[usize],
    depth: usize,
    limits: GrowthLimits,
) -> TreeNode {
    let n = indices.len();
    let sum: f64 = indices.iter().map(|&i| targets[i]).sum();
    let mean = sum / n as f64;

    if depth >= limits.max_depth || n < limits.min_samples_split {
        return TreeNode::Leaf { value: mean };
    }

    let Some(best) = find_best_split(x, targets, indices, limits) else {
        return TreeNode::Leaf { value: mean };
    };

    let (left, right): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .copied()
        .partition(|&i| x[i][best.feature] <= best.threshold);

    TreeNode::Split {
        feature: best.feature,
        threshold: best.threshold,
        gain: best.gain,
        left: Box::new(grow(x, targets, &left, depth + 1, limits)),
        right: Box::new(grow(x, targets, &right, depth + 1, limits)),
    }
}

fn find_best_split(
    x: &[Vec<f64>],
    targets: &[f64],
    indices: &[usize],
    limits: GrowthLimits,
) -> Option<BestSplit> {
    let n = indices.len();
    let n_features = x[indices[0]].len();

    let total: f64 = indices.iter().map(|&i| targets[i]).sum();
    let total_sq: f64 = indices.iter().map(|&i| targets[i] * targets[i]).sum();
    let parent_sse = total_sq - total * total / n as f64;

    let mut best: Option<BestSplit> = None;
    let mut sorted = indices.to_vec();

    for feature in 0..n_features {
        sorted.sort_unstable_by(|&a, &b| {
            x[a][feature]
                .partial_cmp(&x[b][feature])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for k in 1..n {
            let prev = sorted[k - 1];
            left_sum += targets[prev];
            left_sq += targets[prev] * targets[prev];

            // Only split between distinct values
            if x[prev][feature] == x[sorted[k]][feature] {
                continue;
            }
            if k < limits.min_samples_leaf || n - k < limits.min_samples_leaf {
                continue;
            }

            let right_sum = total - left_sum;
            let right_sq = total_sq - left_sq;
            let left_sse = left_sq - left_sum * left_sum / k as f64;
            let right_sse = right_sq - right_sum * right_sum / (n - k) as f64;
            let gain = parent_sse - left_sse - right_sse;

            if gain > MIN_GAIN && best.as_ref().map_or(true, |b| gain > b.gain) {
                best = Some(BestSplit {
                    feature,
                    threshold: (x[prev][feature] + x[sorted[k]][feature]) / 2.0,
                    gain,
                });
            }
        }
    }
    best
}
