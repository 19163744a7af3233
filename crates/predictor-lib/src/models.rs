//! Core data models for the prediction and ranking engine

use crate::error::EngineError;
use crate::table::DataTable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One candidate trade deal to be forecast
///
/// Numeric fields are optional: an absent field is imputed from training-set
/// means at inference time (and discounts the confidence score). Categorical
/// fields must be supplied by the caller; defaulting for missing route or
/// tariff data belongs to the data-access layer, not the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawScenario {
    pub quantity: Option<f64>,
    pub dealer_cost_per_unit: Option<f64>,
    pub logistics_cost_per_kg: Option<f64>,
    pub import_duty_rate: Option<f64>,
    pub export_duty_rate: Option<f64>,
    pub exchange_rate: Option<f64>,
    pub dealer_quality_score: Option<f64>,
    pub dealer_reliability_score: Option<f64>,
    pub dealer_delivery_performance: Option<f64>,
    pub average_delivery_days: Option<f64>,
    pub delay_probability: Option<f64>,
    pub defect_rate: Option<f64>,
    pub market_price: Option<f64>,
    pub dealer_country: String,
    pub destination_country: String,
    pub product_category: String,
    pub transport_mode: String,
    pub dealer_business_type: String,
    pub order_date: Option<NaiveDate>,
}

impl RawScenario {
    /// True when any numeric field is absent (used by the confidence rule)
    pub fn has_missing_numeric(&self) -> bool {
        self.numeric_fields().iter().any(|(_, v)| v.is_none())
    }

    fn numeric_fields(&self) -> [(&'static str, Option<f64>); 13] {
        [
            ("quantity", self.quantity),
            ("dealer_cost_per_unit", self.dealer_cost_per_unit),
            ("logistics_cost_per_kg", self.logistics_cost_per_kg),
            ("import_duty_rate", self.import_duty_rate),
            ("export_duty_rate", self.export_duty_rate),
            ("exchange_rate", self.exchange_rate),
            ("dealer_quality_score", self.dealer_quality_score),
            ("dealer_reliability_score", self.dealer_reliability_score),
            (
                "dealer_delivery_performance",
                self.dealer_delivery_performance,
            ),
            ("average_delivery_days", self.average_delivery_days),
            ("delay_probability", self.delay_probability),
            ("defect_rate", self.defect_rate),
            ("market_price", self.market_price),
        ]
    }

    /// Convert to a one-row table so training and inference share a single
    /// transform path
    pub fn to_table(&self) -> Result<DataTable, EngineError> {
        let mut table = DataTable::new();
        for (name, value) in self.numeric_fields() {
            table.insert_numeric(name, vec![value])?;
        }
        let categorical = [
            ("dealer_country", &self.dealer_country),
            ("destination_country", &self.destination_country),
            ("product_category", &self.product_category),
            ("transport_mode", &self.transport_mode),
            ("dealer_business_type", &self.dealer_business_type),
        ];
        for (name, value) in categorical {
            table.insert_text(name, vec![Some(value.clone())])?;
        }
        if let Some(date) = self.order_date {
            table.insert_text("order_date", vec![Some(date.format("%Y-%m-%d").to_string())])?;
        }
        Ok(table)
    }
}

/// Label attached to a forecast by the deterministic 4-tier rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Highly Recommended")]
    HighlyRecommended,
    #[serde(rename = "Recommended")]
    Recommended,
    #[serde(rename = "Consider")]
    Consider,
    #[serde(rename = "Not Recommended")]
    NotRecommended,
}

impl Recommendation {
    /// First-match rule over (profit margin, delivery days)
    pub fn from_forecast(profit_margin: f64, delivery_days: u32) -> Self {
        if profit_margin > 15.0 && delivery_days <= 30 {
            Recommendation::HighlyRecommended
        } else if profit_margin > 10.0 && delivery_days <= 45 {
            Recommendation::Recommended
        } else if profit_margin > 5.0 {
            Recommendation::Consider
        } else {
            Recommendation::NotRecommended
        }
    }

    /// Longer advisory text for user-facing output
    pub fn describe(&self) -> &'static str {
        match self {
            Recommendation::HighlyRecommended => {
                "Highly Recommended - High profit with fast delivery"
            }
            Recommendation::Recommended => {
                "Recommended - Good profit with reasonable delivery time"
            }
            Recommendation::Consider => "Consider - Moderate profit potential",
            Recommendation::NotRecommended => "Not Recommended - Low profit margin",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Recommendation::HighlyRecommended => "Highly Recommended",
            Recommendation::Recommended => "Recommended",
            Recommendation::Consider => "Consider",
            Recommendation::NotRecommended => "Not Recommended",
        };
        f.write_str(label)
    }
}

/// Structured forecast for a single trade scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradePrediction {
    /// Predicted profit margin, in percent
    pub profit_margin: f64,
    /// Predicted delivery time in days, always >= 1
    pub delivery_days: u32,
    /// Coarse rule-based confidence in [0, 1]
    pub confidence: f64,
    pub recommendation: Recommendation,
    /// Diagnostic quantities derived from the scenario; never fed back into
    /// the point predictions
    pub risk_factors: BTreeMap<String, f64>,
}

/// Aggregated per-dealer record scored and ranked by the ranking system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealerSummary {
    pub id: u64,
    pub name: String,
    pub country: String,
    pub business_type: String,
    pub average_unit_cost: f64,
    /// Normalized quality score in [0, 1]
    pub quality_score: f64,
    /// Delivery-performance score in [0, 1]
    pub delivery_performance: f64,
    /// Reliability score in [0, 1]
    pub reliability_score: f64,
    /// Maximum supply capacity in units
    pub max_supply_capacity: f64,
    /// Composite score, assigned by the ranking system
    #[serde(default)]
    pub ranking_score: Option<f64>,
    /// 1-based rank, assigned by the ranking system
    #[serde(default)]
    pub rank: Option<u32>,
}
