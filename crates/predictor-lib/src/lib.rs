//! Prediction and ranking engine for trade deal sourcing decisions
//!
//! This crate provides the core functionality for:
//! - Feature engineering over raw transaction attributes
//! - Dual gradient-boosted regression (profit margin, delivery days)
//! - Single-scenario forecasting with confidence and recommendation
//! - Weighted multi-criteria dealer ranking
//! - Checksummed, schema-versioned bundle persistence
//!
//! The engine is single-threaded and synchronous. Training mutates the
//! transformer's encoder state in place and must be serialized by the
//! caller; once a [`TrainedModelBundle`] is frozen, concurrent read-only
//! predictions against it are safe.

pub mod boosting;
pub mod error;
pub mod features;
pub mod models;
pub mod predictor;
pub mod ranking;
pub mod scaler;
pub mod store;
pub mod table;
pub mod trainer;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::EngineError;
pub use models::{DealerSummary, RawScenario, Recommendation, TradePrediction};
pub use predictor::{DealPredictor, FeatureImportance};
pub use ranking::{DealerRankingSystem, RankingWeights};
pub use store::{FileModelStore, ModelStore, BUNDLE_SCHEMA_VERSION};
pub use table::DataTable;
pub use trainer::{FitMetrics, TargetMetrics, TrainedModelBundle, Trainer, TrainerConfig};
