//! Weighted multi-criteria dealer ranking
//!
//! Stateless given its configured weights: scores a batch of dealer
//! summaries and returns the same batch annotated and sorted. Independent of
//! the prediction pipeline.

use crate::error::EngineError;
use crate::models::DealerSummary;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Capacity at which the capacity sub-score saturates
const CAPACITY_SATURATION: f64 = 10_000.0;

/// Multiplier applied to a dealer's own cost when no market-wide reference
/// cost is configured
///
/// Under this per-dealer default the cost-efficiency sub-score is a constant
/// 1/3 for every dealer. Deliberately preserved; supply a market-wide
/// reference via [`DealerRankingSystem::with_reference_cost`] to make the
/// sub-score discriminate.
const DEFAULT_REFERENCE_MULTIPLIER: f64 = 1.5;

/// Tolerance when validating that weights sum to 1.0
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Criterion weights for the composite dealer score; must sum to 1.0
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RankingWeights {
    pub cost_efficiency: f64,
    pub quality: f64,
    pub delivery_performance: f64,
    pub reliability: f64,
    pub capacity: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            cost_efficiency: 0.25,
            quality: 0.25,
            delivery_performance: 0.25,
            reliability: 0.15,
            capacity: 0.10,
        }
    }
}

impl RankingWeights {
    fn sum(&self) -> f64 {
        self.cost_efficiency
            + self.quality
            + self.delivery_performance
            + self.reliability
            + self.capacity
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(EngineError::InvalidWeights { sum });
        }
        Ok(())
    }
}

/// Scores and ranks batches of dealer summaries
#[derive(Debug, Clone, Default)]
pub struct DealerRankingSystem {
    weights: RankingWeights,
    reference_cost: Option<f64>,
}

impl DealerRankingSystem {
    /// Ranking system with the default criterion weights
    pub fn new() -> Self {
        Self::default()
    }

    /// Ranking system with custom weights; rejects weights that do not sum
    /// to 1.0
    pub fn with_weights(weights: RankingWeights) -> Result<Self, EngineError> {
        weights.validate()?;
        Ok(Self {
            weights,
            reference_cost: None,
        })
    }

    /// Supply a market-wide reference cost for the cost-efficiency
    /// sub-score
    pub fn with_reference_cost(mut self, reference_cost: f64) -> Self {
        self.reference_cost = Some(reference_cost);
        self
    }

    pub fn weights(&self) -> &RankingWeights {
        &self.weights
    }

    /// Composite score for one dealer, rounded to 3 decimals
    pub fn score(&self, dealer: &DealerSummary) -> Result<f64, EngineError> {
        let reference = self
            .reference_cost
            .unwrap_or(dealer.average_unit_cost * DEFAULT_REFERENCE_MULTIPLIER);
        if reference <= 0.0 {
            return Err(EngineError::InvalidFeature {
                name: "cost_efficiency".to_string(),
                reason: format!("non-positive reference cost {reference}"),
            });
        }
        let cost_efficiency = (reference - dealer.average_unit_cost) / reference;
        let capacity_score = (dealer.max_supply_capacity / CAPACITY_SATURATION).min(1.0);

        let total = cost_efficiency * self.weights.cost_efficiency
            + dealer.quality_score * self.weights.quality
            + dealer.delivery_performance * self.weights.delivery_performance
            + dealer.reliability_score * self.weights.reliability
            + capacity_score * self.weights.capacity;
        if !total.is_finite() {
            return Err(EngineError::InvalidFeature {
                name: "ranking_score".to_string(),
                reason: "non-finite composite score".to_string(),
            });
        }
        Ok((total * 1000.0).round() / 1000.0)
    }

    /// Score, sort (stable, descending) and rank a batch
    ///
    /// Ties keep their original input order; ranks are 1-based and
    /// contiguous even across tied scores.
    pub fn rank(&self, dealers: Vec<DealerSummary>) -> Result<Vec<DealerSummary>, EngineError> {
        self.weights.validate()?;

        let mut ranked = dealers;
        for dealer in &mut ranked {
            dealer.ranking_score = Some(self.score(dealer)?);
        }
        ranked.sort_by(|a, b| {
            b.ranking_score
                .partial_cmp(&a.ranking_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for (position, dealer) in ranked.iter_mut().enumerate() {
            dealer.rank = Some(position as u32 + 1);
        }
        debug!(dealers = ranked.len(), "dealer batch ranked");
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dealer(id: u64, cost: f64, quality: f64, delivery: f64, reliability: f64, capacity: f64) -> DealerSummary {
        DealerSummary {
            id,
            name: format!("dealer-{id}"),
            country: "India".to_string(),
            business_type: "manufacturer".to_string(),
            average_unit_cost: cost,
            quality_score: quality,
            delivery_performance: delivery,
            reliability_score: reliability,
            max_supply_capacity: capacity,
            ranking_score: None,
            rank: None,
        }
    }

    #[test]
    fn test_worked_scoring_example() {
        // cost_efficiency = (750 - 500) / 750 = 0.333..., capacity = 0.5
        let system = DealerRankingSystem::new();
        let score = system
            .score(&dealer(1, 500.0, 0.9, 0.8, 0.95, 5000.0))
            .unwrap();
        assert_eq!(score, 0.701);
    }

    #[test]
    fn test_default_reference_makes_cost_term_constant() {
        let system = DealerRankingSystem::new();
        let cheap = dealer(1, 10.0, 0.5, 0.5, 0.5, 0.0);
        let pricey = dealer(2, 9000.0, 0.5, 0.5, 0.5, 0.0);
        // With the per-dealer default reference both cost terms are 1/3
        assert_eq!(system.score(&cheap).unwrap(), system.score(&pricey).unwrap());
    }

    #[test]
    fn test_market_reference_discriminates_on_cost() {
        let system = DealerRankingSystem::new().with_reference_cost(1000.0);
        let cheap = system.score(&dealer(1, 100.0, 0.5, 0.5, 0.5, 0.0)).unwrap();
        let pricey = system.score(&dealer(2, 900.0, 0.5, 0.5, 0.5, 0.0)).unwrap();
        assert!(cheap > pricey);
    }

    #[test]
    fn test_capacity_saturates() {
        let system = DealerRankingSystem::new();
        let at_cap = system
            .score(&dealer(1, 100.0, 0.0, 0.0, 0.0, 10_000.0))
            .unwrap();
        let over_cap = system
            .score(&dealer(2, 100.0, 0.0, 0.0, 0.0, 80_000.0))
            .unwrap();
        assert_eq!(at_cap, over_cap);
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let weights = RankingWeights {
            cost_efficiency: 0.5,
            quality: 0.5,
            delivery_performance: 0.5,
            reliability: 0.0,
            capacity: 0.0,
        };
        assert!(matches!(
            DealerRankingSystem::with_weights(weights),
            Err(EngineError::InvalidWeights { .. })
        ));
    }

    #[test]
    fn test_ranks_are_contiguous_permutation() {
        let system = DealerRankingSystem::new();
        let batch = vec![
            dealer(1, 100.0, 0.2, 0.2, 0.2, 1000.0),
            dealer(2, 100.0, 0.9, 0.9, 0.9, 9000.0),
            dealer(3, 100.0, 0.5, 0.5, 0.5, 5000.0),
        ];
        let ranked = system.rank(batch).unwrap();
        let ranks: Vec<u32> = ranked.iter().map(|d| d.rank.unwrap()).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(ranked[0].id, 2);
        assert_eq!(ranked[2].id, 1);
        assert!(ranked[0].ranking_score >= ranked[1].ranking_score);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let system = DealerRankingSystem::new();
        let batch = vec![
            dealer(7, 100.0, 0.5, 0.5, 0.5, 2000.0),
            dealer(8, 100.0, 0.5, 0.5, 0.5, 2000.0),
            dealer(9, 100.0, 0.5, 0.5, 0.5, 2000.0),
        ];
        let ranked = system.rank(batch).unwrap();
        let ids: Vec<u64> = ranked.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![7, 8, 9]);
        let ranks: Vec<u32> = ranked.iter().map(|d| d.rank.unwrap()).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_non_positive_reference_rejected() {
        let system = DealerRankingSystem::new();
        let err = system.score(&dealer(1, 0.0, 0.5, 0.5, 0.5, 0.0)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidFeature { .. }));
    }
}
