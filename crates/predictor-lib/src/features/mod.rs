//! Feature engineering for the prediction pipeline
//!
//! Turns raw transaction attributes into the engineered numeric columns the
//! regressors train on: encoded categoricals, derived ratios and composites,
//! and seasonal fields when an order date is present. The transformer is
//! stateful only in its categorical vocabularies.

mod encoder;

pub use encoder::CategoryEncoder;

use crate::error::EngineError;
use crate::table::DataTable;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use tracing::debug;

/// Categorical columns encoded into label indices
pub const CATEGORICAL_COLUMNS: [&str; 5] = [
    "dealer_country",
    "destination_country",
    "product_category",
    "transport_mode",
    "dealer_business_type",
];

/// Text column holding ISO dates, source of the seasonal features
pub const ORDER_DATE_COLUMN: &str = "order_date";

/// Seasonal columns derived from the order date
pub const SEASONAL_COLUMNS: [&str; 2] = ["order_month", "order_quarter"];

/// Date format accepted in the order-date column
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fixed candidate feature superset, in the order frozen into a bundle
///
/// The intersection of this list with the columns actually present after
/// transformation becomes the model's feature list. The order here is
/// load-bearing: inference reproduces it exactly.
pub fn candidate_features() -> Vec<String> {
    let mut names: Vec<String> = [
        // Raw numeric attributes
        "quantity",
        "dealer_cost_per_unit",
        "logistics_cost_per_kg",
        "import_duty_rate",
        "export_duty_rate",
        "exchange_rate",
        "dealer_quality_score",
        "dealer_reliability_score",
        "dealer_delivery_performance",
        "average_delivery_days",
        "delay_probability",
        "defect_rate",
        // Derived
        "cost_to_market_ratio",
        "tariff_burden",
        "dealer_performance_score",
        "logistics_cost_ratio",
        "delivery_speed_score",
        "exchange_rate_impact",
        "risk_score",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    names.extend(CATEGORICAL_COLUMNS.iter().map(|c| encoded_name(c)));
    names.extend(SEASONAL_COLUMNS.iter().map(|s| s.to_string()));
    names
}

/// Name of the numeric column holding a categorical column's label indices
pub fn encoded_name(column: &str) -> String {
    format!("{column}_encoded")
}

/// Maps raw records to engineered feature columns
///
/// Stateful only in the per-column categorical vocabularies; everything else
/// is a deterministic, total function of the input cells.
#[derive(Debug, Clone, Default)]
pub struct FeatureTransformer {
    encoders: BTreeMap<String, CategoryEncoder>,
}

impl FeatureTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a transformer from the vocabularies frozen into a bundle
    pub fn from_encoders(encoders: BTreeMap<String, CategoryEncoder>) -> Self {
        Self { encoders }
    }

    pub fn encoders(&self) -> &BTreeMap<String, CategoryEncoder> {
        &self.encoders
    }

    /// Build (or extend) the categorical vocabularies from `table`, then
    /// transform it
    pub fn fit_transform(&mut self, table: &DataTable) -> Result<DataTable, EngineError> {
        for column in CATEGORICAL_COLUMNS {
            if let Some(values) = table.text(column) {
                let encoder = self.encoders.entry(column.to_string()).or_default();
                let present: Vec<&str> = values.iter().flatten().map(String::as_str).collect();
                if present.len() != values.len() {
                    return Err(EngineError::InvalidFeature {
                        name: column.to_string(),
                        reason: "absent value in categorical column".to_string(),
                    });
                }
                encoder.fit_extend(present);
                debug!(
                    column,
                    vocabulary = encoder.len(),
                    "fitted categorical encoder"
                );
            }
        }
        self.apply(table)
    }

    /// Transform with frozen vocabularies; unknown categories are rejected
    pub fn transform(&self, table: &DataTable) -> Result<DataTable, EngineError> {
        self.apply(table)
    }

    fn apply(&self, table: &DataTable) -> Result<DataTable, EngineError> {
        let mut out = table.clone();
        self.encode_categoricals(table, &mut out)?;
        derive_columns(table, &mut out)?;
        derive_seasonal(table, &mut out)?;
        Ok(out)
    }

    fn encode_categoricals(
        &self,
        table: &DataTable,
        out: &mut DataTable,
    ) -> Result<(), EngineError> {
        for (column, encoder) in &self.encoders {
            let values = table
                .text(column)
                .ok_or_else(|| EngineError::MissingColumn {
                    column: column.clone(),
                })?;
            let mut encoded = Vec::with_capacity(values.len());
            for value in values {
                let value = value.as_deref().ok_or_else(|| EngineError::InvalidFeature {
                    name: column.clone(),
                    reason: "absent value in categorical column".to_string(),
                })?;
                let index =
                    encoder
                        .encode(value)
                        .ok_or_else(|| EngineError::UnknownCategory {
                            column: column.clone(),
                            value: value.to_string(),
                        })?;
                encoded.push(Some(index as f64));
            }
            out.insert_numeric(encoded_name(column), encoded)?;
        }
        Ok(())
    }
}

/// Compute the derived numeric columns row by row
///
/// A ratio with a zero or absent denominator is rejected; an absent
/// numerator (or any absent non-denominator input) yields an absent cell,
/// imputed later from training-set means.
fn derive_columns(table: &DataTable, out: &mut DataTable) -> Result<(), EngineError> {
    let rows = table.rows();
    let mut cost_to_market = Vec::with_capacity(rows);
    let mut tariff_burden = Vec::with_capacity(rows);
    let mut dealer_performance = Vec::with_capacity(rows);
    let mut logistics_ratio = Vec::with_capacity(rows);
    let mut delivery_speed = Vec::with_capacity(rows);
    let mut exchange_impact = Vec::with_capacity(rows);
    let mut risk = Vec::with_capacity(rows);

    for row in 0..rows {
        let cell = |name: &str| table.numeric_cell(name, row);

        let market_price = require_denominator("cost_to_market_ratio", "market_price", cell("market_price"))?;
        cost_to_market.push(cell("dealer_cost_per_unit").map(|c| c / market_price));

        tariff_burden.push(combine2(cell("import_duty_rate"), cell("export_duty_rate"), |i, e| i + e));

        dealer_performance.push(combine3(
            cell("dealer_quality_score"),
            cell("dealer_reliability_score"),
            cell("dealer_delivery_performance"),
            |q, r, d| 0.3 * q + 0.3 * r + 0.4 * d,
        ));

        let unit_cost = require_denominator(
            "logistics_cost_ratio",
            "dealer_cost_per_unit",
            cell("dealer_cost_per_unit"),
        )?;
        logistics_ratio.push(cell("logistics_cost_per_kg").map(|l| l / unit_cost));

        delivery_speed.push(match cell("average_delivery_days") {
            Some(days) => {
                let denom = 1.0 + days / 30.0;
                if denom == 0.0 {
                    return Err(EngineError::InvalidFeature {
                        name: "delivery_speed_score".to_string(),
                        reason: "delivery-day value makes the denominator zero".to_string(),
                    });
                }
                Some(1.0 / denom)
            }
            None => None,
        });

        exchange_impact.push(combine2(
            cell("exchange_rate"),
            cell("dealer_cost_per_unit"),
            |r, c| r * c,
        ));

        risk.push(combine3(
            cell("delay_probability"),
            cell("defect_rate"),
            cell("dealer_reliability_score"),
            |delay, defect, rel| 0.5 * delay + 0.3 * defect + 0.2 * (1.0 - rel),
        ));
    }

    out.insert_numeric("cost_to_market_ratio", cost_to_market)?;
    out.insert_numeric("tariff_burden", tariff_burden)?;
    out.insert_numeric("dealer_performance_score", dealer_performance)?;
    out.insert_numeric("logistics_cost_ratio", logistics_ratio)?;
    out.insert_numeric("delivery_speed_score", delivery_speed)?;
    out.insert_numeric("exchange_rate_impact", exchange_impact)?;
    out.insert_numeric("risk_score", risk)?;
    Ok(())
}

/// Extract month and quarter columns when an order-date column is present
fn derive_seasonal(table: &DataTable, out: &mut DataTable) -> Result<(), EngineError> {
    let Some(dates) = table.text(ORDER_DATE_COLUMN) else {
        return Ok(());
    };
    let mut months = Vec::with_capacity(dates.len());
    let mut quarters = Vec::with_capacity(dates.len());
    for value in dates {
        match value.as_deref() {
            Some(raw) => {
                let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
                    EngineError::InvalidFeature {
                        name: ORDER_DATE_COLUMN.to_string(),
                        reason: format!("unparseable date `{raw}`"),
                    }
                })?;
                months.push(Some(date.month() as f64));
                quarters.push(Some(((date.month0() / 3) + 1) as f64));
            }
            None => {
                months.push(None);
                quarters.push(None);
            }
        }
    }
    out.insert_numeric("order_month", months)?;
    out.insert_numeric("order_quarter", quarters)?;
    Ok(())
}

fn require_denominator(
    feature: &str,
    column: &str,
    value: Option<f64>,
) -> Result<f64, EngineError> {
    match value {
        Some(v) if v != 0.0 => Ok(v),
        Some(_) => Err(EngineError::InvalidFeature {
            name: feature.to_string(),
            reason: format!("`{column}` is zero"),
        }),
        None => Err(EngineError::InvalidFeature {
            name: feature.to_string(),
            reason: format!("`{column}` is absent"),
        }),
    }
}

fn combine2(a: Option<f64>, b: Option<f64>, f: impl Fn(f64, f64) -> f64) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        _ => None,
    }
}

fn combine3(
    a: Option<f64>,
    b: Option<f64>,
    c: Option<f64>,
    f: impl Fn(f64, f64, f64) -> f64,
) -> Option<f64> {
    match (a, b, c) {
        (Some(a), Some(b), Some(c)) => Some(f(a, b, c)),
        _ => None,
    }
}
