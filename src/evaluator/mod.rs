pub mod features;
pub mod scorer;
pub mod kelly;
pub mod risk_analyzer;
pub mod ranker;
pub mod pipeline;

pub use features::{FeatureAggregator, FeatureVector};
pub use scorer::ConfidenceScorer;
pub use kelly::{KellyQuote, KellyStakeCalculator};
pub use risk_analyzer::{RiskAssessment, RiskClassifier};
pub use ranker::OpportunityRanker;
pub use pipeline::{BatchOutcome, ScoringPipeline};

use serde::{Deserialize, Serialize};
use std::fmt;

/// One contributing factor for a bet (model probability, sentiment, odds edge...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub name: String,
    pub value: f64,
    pub weight: f64,
}

impl Signal {
    pub fn new(name: impl Into<String>, value: f64, weight: f64) -> Self {
        Self {
            name: name.into(),
            value,
            weight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTier::Low => write!(f, "low"),
            RiskTier::Medium => write!(f, "medium"),
            RiskTier::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredOpportunity {
    pub id: String,
    pub label: Option<String>,
    pub decimal_odds: f64,
    /// Aggregated confidence in [0, 1]
    pub confidence: f64,
    /// Expected profit per unit staked
    pub expected_value: f64,
    /// Fraction of bankroll in [0, max_stake]
    pub recommended_stake: f64,
    /// Stake in currency units, when a bankroll was supplied
    pub stake_amount: Option<f64>,
    pub risk_tier: RiskTier,
    pub reasoning: Vec<String>,
}
