//! Gradient-boosted regression trees
//!
//! Squared-error boosting over depth-limited regression trees: each round
//! fits a tree to the current residuals and adds its predictions scaled by
//! the learning rate. Deterministic under a fixed seed; with the default
//! subsample ratio of 1.0 the seed is never consulted.

mod tree;

pub use tree::{GrowthLimits, RegressionTree, TreeNode};

use crate::error::EngineError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Boosting hyperparameters
///
/// Exposed as configuration, not constants; the trainer carries one set per
/// prediction target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GbmParams {
    /// Number of boosting rounds (trees)
    pub n_estimators: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Shrinkage applied to every tree's contribution
    pub learning_rate: f64,
    /// Minimum rows required to split a node
    pub min_samples_split: usize,
    /// Minimum rows required in a leaf
    pub min_samples_leaf: usize,
    /// Fraction of rows sampled per round; 1.0 disables sampling
    pub subsample: f64,
    /// Seed for the row sampler
    pub seed: u64,
}

impl Default for GbmParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 5,
            learning_rate: 0.1,
            min_samples_split: 2,
            min_samples_leaf: 1,
            subsample: 1.0,
            seed: 42,
        }
    }
}

/// A fitted gradient-boosted regressor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GbmRegressor {
    params: GbmParams,
    base_score: f64,
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl GbmRegressor {
    /// Fit a regressor on a dense row-major matrix
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: GbmParams) -> Result<Self, EngineError> {
        if x.is_empty() {
            return Err(EngineError::EmptyTrainingSet);
        }
        let n_features = x[0].len();
        if x.iter().any(|row| row.len() != n_features) {
            return Err(EngineError::InvalidFeature {
                name: "feature_matrix".to_string(),
                reason: "rows have inconsistent widths".to_string(),
            });
        }
        if y.len() != x.len() {
            return Err(EngineError::InvalidFeature {
                name: "target".to_string(),
                reason: format!("{} targets for {} rows", y.len(), x.len()),
            });
        }
        if let Some(v) = y.iter().find(|v| !v.is_finite()) {
            return Err(EngineError::InvalidFeature {
                name: "target".to_string(),
                reason: format!("non-finite value {v}"),
            });
        }

        let n = x.len();
        let base_score = y.iter().sum::<f64>() / n as f64;
        let limits = GrowthLimits {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            min_samples_leaf: params.min_samples_leaf,
        };

        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut predictions = vec![base_score; n];
        let mut residuals = vec![0.0; n];
        let mut trees = Vec::with_capacity(params.n_estimators);

        for round in 0..params.n_estimators {
            for i in 0..n {
                residuals[i] = y[i] - predictions[i];
            }
            let indices = sample_rows(n, params.subsample, &mut rng);
            let tree = RegressionTree::fit(x, &residuals, &indices, limits);
            for (i, row) in x.iter().enumerate() {
                predictions[i] += params.learning_rate * tree.predict_row(row);
            }
            trees.push(tree);
            if round == params.n_estimators - 1 {
                let sse: f64 = (0..n).map(|i| (y[i] - predictions[i]).powi(2)).sum();
                debug!(
                    rounds = params.n_estimators,
                    train_rmse = (sse / n as f64).sqrt(),
                    "boosting finished"
                );
            }
        }

        Ok(Self {
            params,
            base_score,
            trees,
            n_features,
        })
    }

    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let boost: f64 = self.trees.iter().map(|t| t.predict_row(row)).sum();
        self.base_score + self.params.learning_rate * boost
    }

    pub fn predict(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        rows.iter().map(|r| self.predict_row(r)).collect()
    }

    /// Total split gain per feature, normalized to sum to 1
    pub fn feature_importance(&self) -> Vec<f64> {
        let mut gains = vec![0.0; self.n_features];
        for tree in &self.trees {
            tree.accumulate_gain(&mut gains);
        }
        let total: f64 = gains.iter().sum();
        if total > 0.0 {
            for g in &mut gains {
                *g /= total;
            }
        }
        gains
    }

    pub fn params(&self) -> &GbmParams {
        &self.params
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

/// Row indices for one boosting round; sorted so summation order is stable
fn sample_rows(n: usize, subsample: f64, rng: &mut StdRng) -> Vec<usize> {
    if subsample >= 1.0 {
        return (0..n).collect();
    }
    let k = ((n as f64 * subsample).floor() as usize).max(1);
    let mut indices = rand::seq::index::sample(rng, n, k).into_vec();
    indices.sort_unstable();
    indices
}
