//! Dual-regression training pipeline
//!
//! Fits the profit-margin and delivery-day regressors on a training table,
//! producing an immutable [`TrainedModelBundle`] plus holdout fit metrics.
//! Everything inference needs — encoder vocabularies, scaler parameters,
//! imputation means, the frozen feature order — is captured in the bundle.

use crate::boosting::{GbmParams, GbmRegressor};
use crate::error::EngineError;
use crate::features::{candidate_features, CategoryEncoder, FeatureTransformer};
use crate::scaler::StandardScaler;
use crate::table::DataTable;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Default holdout fraction for fit-quality evaluation
const DEFAULT_HOLDOUT_FRACTION: f64 = 0.2;

/// Default seed for the reproducible train/holdout shuffle
const DEFAULT_SPLIT_SEED: u64 = 42;

/// Below this row count metrics carry the low-confidence flag
const DEFAULT_MIN_TRAINING_ROWS: usize = 30;

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Hyperparameters for the profit-margin regressor
    pub profit_params: GbmParams,
    /// Hyperparameters for the delivery-day regressor
    pub delivery_params: GbmParams,
    /// Fraction of rows held out for evaluation
    pub holdout_fraction: f64,
    /// Seed for the train/holdout shuffle
    pub split_seed: u64,
    /// Minimum rows before metrics are considered trustworthy
    pub min_training_rows: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            profit_params: GbmParams {
                n_estimators: 200,
                max_depth: 15,
                ..GbmParams::default()
            },
            delivery_params: GbmParams {
                n_estimators: 150,
                max_depth: 12,
                ..GbmParams::default()
            },
            holdout_fraction: DEFAULT_HOLDOUT_FRACTION,
            split_seed: DEFAULT_SPLIT_SEED,
            min_training_rows: DEFAULT_MIN_TRAINING_ROWS,
        }
    }
}

/// Holdout metrics for one prediction target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetMetrics {
    /// Coefficient of determination
    pub r2: f64,
    /// Root-mean-squared error
    pub rmse: f64,
    /// Mean absolute error
    pub mae: f64,
}

impl TargetMetrics {
    pub fn from_predictions(y_true: &[f64], y_pred: &[f64]) -> Self {
        let n = y_true.len() as f64;
        let mse = y_true
            .iter()
            .zip(y_pred)
            .map(|(t, p)| (t - p).powi(2))
            .sum::<f64>()
            / n;
        let mae = y_true
            .iter()
            .zip(y_pred)
            .map(|(t, p)| (t - p).abs())
            .sum::<f64>()
            / n;
        let mean = y_true.iter().sum::<f64>() / n;
        let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();
        let ss_res: f64 = y_true
            .iter()
            .zip(y_pred)
            .map(|(t, p)| (t - p).powi(2))
            .sum();
        let r2 = if ss_tot != 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };
        Self {
            r2,
            rmse: mse.sqrt(),
            mae,
        }
    }
}

/// Fit-quality report for one training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitMetrics {
    /// Metrics for the profit model, when its target column was present
    pub profit: Option<TargetMetrics>,
    /// Metrics for the delivery model, when its target column was present
    pub delivery: Option<TargetMetrics>,
    pub training_rows: usize,
    pub holdout_rows: usize,
    /// Set when the table had fewer rows than the configured minimum
    pub low_confidence: bool,
}

/// Frozen artifact produced by one `fit` call
///
/// Immutable after training; a predictor either owns a freshly trained
/// bundle or loads one from the model store, never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModelBundle {
    /// Profit-margin regressor; absent when its target column was missing
    pub profit_model: Option<GbmRegressor>,
    /// Delivery-day regressor; absent when its target column was missing
    pub delivery_model: Option<GbmRegressor>,
    /// Categorical vocabularies fixed at fit time
    pub encoders: BTreeMap<String, CategoryEncoder>,
    pub scaler: StandardScaler,
    /// Ordered feature list; inference reproduces this order exactly
    pub feature_names: Vec<String>,
    /// Training-set column means, aligned with `feature_names`, used to
    /// impute absent cells at inference time
    pub feature_means: Vec<f64>,
    /// Unix timestamp of the fit call
    pub trained_at: i64,
}

/// Fits the two regressors and assembles the bundle
#[derive(Debug, Default)]
pub struct Trainer {
    config: TrainerConfig,
    transformer: FeatureTransformer,
}

impl Trainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TrainerConfig) -> Self {
        Self {
            config,
            transformer: FeatureTransformer::new(),
        }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Train both models on `table`
    ///
    /// Target columns with absent cells are imputed with the column mean
    /// before the split. Proceeds (flagged) below the minimum row count;
    /// fails on an empty table or when neither target column exists.
    pub fn fit(
        &mut self,
        table: &DataTable,
        profit_target: &str,
        delivery_target: &str,
    ) -> Result<(TrainedModelBundle, FitMetrics), EngineError> {
        if table.is_empty() {
            return Err(EngineError::EmptyTrainingSet);
        }
        let has_profit = table.numeric(profit_target).is_some();
        let has_delivery = table.numeric(delivery_target).is_some();
        if !has_profit && !has_delivery {
            return Err(EngineError::MissingTarget {
                profit: profit_target.to_string(),
                delivery: delivery_target.to_string(),
            });
        }

        let n = table.rows();
        info!(rows = n, "starting model training");

        let transformed = self.transformer.fit_transform(table)?;

        // Candidate superset ∩ columns actually present; this order is
        // frozen into the bundle
        let feature_names: Vec<String> = candidate_features()
            .into_iter()
            .filter(|name| transformed.numeric(name).is_some())
            .collect();
        let feature_means: Vec<f64> = feature_names
            .iter()
            .map(|name| transformed.numeric_mean(name).unwrap_or(0.0))
            .collect();

        let mut matrix: Vec<Vec<f64>> = (0..n)
            .map(|row| {
                feature_names
                    .iter()
                    .zip(&feature_means)
                    .map(|(name, mean)| transformed.numeric_cell(name, row).unwrap_or(*mean))
                    .collect()
            })
            .collect();

        let scaler = StandardScaler::fit(&matrix);
        scaler.transform(&mut matrix);

        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(self.config.split_seed);
        indices.shuffle(&mut rng);
        let mut holdout_len = (n as f64 * self.config.holdout_fraction).round() as usize;
        if holdout_len >= n {
            holdout_len = n - 1;
        }
        let (train_idx, holdout_idx) = indices.split_at(n - holdout_len);
        // A tiny table can leave the holdout empty; evaluate on the
        // training rows in that case
        let eval_idx = if holdout_idx.is_empty() { train_idx } else { holdout_idx };

        let low_confidence = n < self.config.min_training_rows;
        if low_confidence {
            warn!(
                rows = n,
                minimum = self.config.min_training_rows,
                "training set below minimum row count, metrics are low-confidence"
            );
        }

        let fit_target = |target: &str,
                              params: &GbmParams|
         -> Result<(GbmRegressor, TargetMetrics), EngineError> {
            let mean = table.numeric_mean(target).unwrap_or(0.0);
            let y: Vec<f64> = (0..n)
                .map(|row| table.numeric_cell(target, row).unwrap_or(mean))
                .collect();

            let x_train: Vec<Vec<f64>> = train_idx.iter().map(|&i| matrix[i].clone()).collect();
            let y_train: Vec<f64> = train_idx.iter().map(|&i| y[i]).collect();
            let model = GbmRegressor::fit(&x_train, &y_train, params.clone())?;

            let y_eval: Vec<f64> = eval_idx.iter().map(|&i| y[i]).collect();
            let y_pred: Vec<f64> = eval_idx.iter().map(|&i| model.predict_row(&matrix[i])).collect();
            let metrics = TargetMetrics::from_predictions(&y_eval, &y_pred);
            info!(
                column = target,
                r2 = metrics.r2,
                rmse = metrics.rmse,
                mae = metrics.mae,
                "target model fitted"
            );
            Ok((model, metrics))
        };

        let mut profit_model = None;
        let mut profit_metrics = None;
        if has_profit {
            let (model, metrics) = fit_target(profit_target, &self.config.profit_params)?;
            profit_model = Some(model);
            profit_metrics = Some(metrics);
        }
        let mut delivery_model = None;
        let mut delivery_metrics = None;
        if has_delivery {
            let (model, metrics) = fit_target(delivery_target, &self.config.delivery_params)?;
            delivery_model = Some(model);
            delivery_metrics = Some(metrics);
        }

        let bundle = TrainedModelBundle {
            profit_model,
            delivery_model,
            encoders: self.transformer.encoders().clone(),
            scaler,
            feature_names,
            feature_means,
            trained_at: chrono::Utc::now().timestamp(),
        };
        let metrics = FitMetrics {
            profit: profit_metrics,
            delivery: delivery_metrics,
            training_rows: train_idx.len(),
            holdout_rows: holdout_idx.len(),
            low_confidence,
        };
        info!(
            features = bundle.feature_names.len(),
            training_rows = metrics.training_rows,
            holdout_rows = metrics.holdout_rows,
            "model training completed"
        );
        Ok((bundle, metrics))
    }
}
