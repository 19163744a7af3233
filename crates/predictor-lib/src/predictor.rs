//! Scenario prediction over a frozen model bundle
//!
//! Applies the trained regressors plus the fitted transformer to a single
//! scenario, producing point predictions, a coarse rule-based confidence
//! score, and a recommendation label.

use crate::error::EngineError;
use crate::features::FeatureTransformer;
use crate::models::{RawScenario, Recommendation, TradePrediction};
use crate::trainer::TrainedModelBundle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Confidence assigned to a fully-populated scenario
///
/// A documented placeholder policy, not a predictive interval: the value is
/// fixed and only discounted for missing input fields.
pub const BASE_CONFIDENCE: f64 = 0.8;

/// Multiplicative confidence discount when any numeric field is absent
pub const MISSING_FIELD_PENALTY: f64 = 0.9;

/// Unit-cost baseline of the diagnostic cost-deviation risk
const COST_RISK_BASELINE: f64 = 500.0;

/// Scale of the diagnostic cost-deviation risk
const COST_RISK_SCALE: f64 = 1000.0;

/// Per-target feature importance maps from the fitted regressors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub profit: Option<BTreeMap<String, f64>>,
    pub delivery: Option<BTreeMap<String, f64>>,
}

/// Applies a trained bundle to individual scenarios
///
/// Holds either a freshly trained bundle or one loaded from the model
/// store. Prediction is read-only: concurrent `predict` calls against the
/// same instance are safe once the bundle is attached.
#[derive(Debug, Default)]
pub struct DealPredictor {
    bundle: Option<TrainedModelBundle>,
    transformer: FeatureTransformer,
}

impl DealPredictor {
    /// An untrained predictor; `predict` fails until a bundle is attached
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bundle(bundle: TrainedModelBundle) -> Self {
        let transformer = FeatureTransformer::from_encoders(bundle.encoders.clone());
        Self {
            bundle: Some(bundle),
            transformer,
        }
    }

    /// Replace the current bundle (e.g. after loading from the store)
    pub fn attach_bundle(&mut self, bundle: TrainedModelBundle) {
        self.transformer = FeatureTransformer::from_encoders(bundle.encoders.clone());
        self.bundle = Some(bundle);
    }

    pub fn is_trained(&self) -> bool {
        self.bundle.is_some()
    }

    pub fn bundle(&self) -> Option<&TrainedModelBundle> {
        self.bundle.as_ref()
    }

    /// Forecast profit margin and delivery time for one scenario
    pub fn predict(&self, scenario: &RawScenario) -> Result<TradePrediction, EngineError> {
        let bundle = self.bundle.as_ref().ok_or(EngineError::NotTrained)?;

        let table = scenario.to_table()?;
        let transformed = self.transformer.transform(&table)?;

        // Frozen feature order, with absent cells imputed from the
        // training-set means captured at fit time
        let mut row: Vec<f64> = bundle
            .feature_names
            .iter()
            .zip(&bundle.feature_means)
            .map(|(name, mean)| transformed.numeric_cell(name, 0).unwrap_or(*mean))
            .collect();
        bundle.scaler.transform_row(&mut row);

        let profit_model = bundle.profit_model.as_ref().ok_or(EngineError::NotTrained)?;
        let delivery_model = bundle
            .delivery_model
            .as_ref()
            .ok_or(EngineError::NotTrained)?;

        let profit_margin = profit_model.predict_row(&row);
        let delivery_raw = delivery_model.predict_row(&row);
        let delivery_days = delivery_raw.floor().max(1.0) as u32;

        let mut confidence = BASE_CONFIDENCE;
        if scenario.has_missing_numeric() {
            confidence *= MISSING_FIELD_PENALTY;
        }

        let recommendation = Recommendation::from_forecast(profit_margin, delivery_days);

        debug!(
            profit_margin,
            delivery_days,
            confidence,
            recommendation = %recommendation,
            "scenario forecast generated"
        );

        Ok(TradePrediction {
            profit_margin,
            delivery_days,
            confidence,
            recommendation,
            risk_factors: risk_factors(scenario),
        })
    }

    /// Per-feature importance from the fitted regressors
    pub fn feature_importance(&self) -> Result<FeatureImportance, EngineError> {
        let bundle = self.bundle.as_ref().ok_or(EngineError::NotTrained)?;
        let named = |model: &crate::boosting::GbmRegressor| {
            bundle
                .feature_names
                .iter()
                .cloned()
                .zip(model.feature_importance())
                .collect::<BTreeMap<String, f64>>()
        };
        Ok(FeatureImportance {
            profit: bundle.profit_model.as_ref().map(named),
            delivery: bundle.delivery_model.as_ref().map(named),
        })
    }
}

/// Diagnostic risk quantities, taken verbatim from the scenario
///
/// Absent fields contribute zero risk; these values never alter the point
/// predictions.
fn risk_factors(scenario: &RawScenario) -> BTreeMap<String, f64> {
    let unit_cost = scenario.dealer_cost_per_unit.unwrap_or(0.0);
    let mut factors = BTreeMap::new();
    factors.insert(
        "delivery_risk".to_string(),
        scenario.delay_probability.unwrap_or(0.0),
    );
    factors.insert(
        "quality_risk".to_string(),
        scenario.defect_rate.unwrap_or(0.0),
    );
    factors.insert(
        "cost_risk".to_string(),
        ((unit_cost - COST_RISK_BASELINE) / COST_RISK_SCALE).max(0.0),
    );
    factors.insert(
        "reliability_risk".to_string(),
        1.0 - scenario.dealer_reliability_score.unwrap_or(1.0),
    );
    factors
}
