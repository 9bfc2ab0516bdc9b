use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::RiskThresholds;
use super::RiskTier;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub tier: RiskTier,
    /// One line per triggered condition, in the order they were checked
    pub reasoning: Vec<String>,
}

pub struct RiskClassifier {
    thresholds: RiskThresholds,
}

impl RiskClassifier {
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    pub fn classify(&self, stake: f64, confidence: f64, volatility: f64) -> RiskAssessment {
        let mut reasoning = Vec::new();

        // Tier follows stake size only
        let tier = if !stake.is_finite() {
            warn!("Stake {} is not a number, defaulting to medium risk", stake);
            reasoning.push("Stake could not be computed".to_string());
            RiskTier::Medium
        } else if stake <= self.thresholds.low_stake {
            RiskTier::Low
        } else if stake <= self.thresholds.medium_stake {
            RiskTier::Medium
        } else {
            reasoning.push(format!(
                "Large stake recommended ({:.1}% of bankroll)",
                stake * 100.0
            ));
            RiskTier::High
        };

        if volatility.is_nan() {
            warn!("Volatility is NaN, skipping volatility check");
            reasoning.push("Volatility unavailable".to_string());
        } else if volatility > self.thresholds.high_volatility {
            reasoning.push("High volatility detected".to_string());
        }

        if confidence.is_nan() {
            warn!("Confidence is NaN, skipping confidence check");
            reasoning.push("Confidence unavailable".to_string());
        } else if confidence < self.thresholds.low_confidence {
            reasoning.push("Confidence below threshold".to_string());
        }

        debug!("Risk tier {} for stake {:.4}", tier, stake);

        RiskAssessment { tier, reasoning }
    }
}

impl Default for RiskClassifier {
    fn default() -> Self {
        Self::new(RiskThresholds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        let classifier = RiskClassifier::default();
        assert_eq!(classifier.classify(0.0, 0.6, 0.1).tier, RiskTier::Low);
        assert_eq!(classifier.classify(0.05, 0.6, 0.1).tier, RiskTier::Low);
        assert_eq!(classifier.classify(0.0501, 0.6, 0.1).tier, RiskTier::Medium);
        assert_eq!(classifier.classify(0.15, 0.6, 0.1).tier, RiskTier::Medium);
        assert_eq!(classifier.classify(0.1501, 0.6, 0.1).tier, RiskTier::High);
    }

    #[test]
    fn tier_ignores_confidence_and_volatility() {
        let classifier = RiskClassifier::default();
        for (confidence, volatility) in [(0.0, 0.0), (1.0, 5.0), (f64::NAN, f64::NAN)] {
            assert_eq!(classifier.classify(0.05, confidence, volatility).tier, RiskTier::Low);
            assert_eq!(classifier.classify(0.1501, confidence, volatility).tier, RiskTier::High);
        }
    }

    #[test]
    fn nan_stake_defaults_to_medium() {
        let classifier = RiskClassifier::default();
        let assessment = classifier.classify(f64::NAN, 0.7, 0.1);
        assert_eq!(assessment.tier, RiskTier::Medium);
        assert_eq!(assessment.reasoning, vec!["Stake could not be computed".to_string()]);
        assert_eq!(classifier.classify(f64::INFINITY, 0.7, 0.1).tier, RiskTier::Medium);
    }

    #[test]
    fn reasoning_in_check_order() {
        let classifier = RiskClassifier::default();
        let assessment = classifier.classify(0.3, 0.4, 0.5);
        assert_eq!(assessment.tier, RiskTier::High);
        assert_eq!(
            assessment.reasoning,
            vec![
                "Large stake recommended (30.0% of bankroll)".to_string(),
                "High volatility detected".to_string(),
                "Confidence below threshold".to_string(),
            ]
        );
    }

    #[test]
    fn quiet_when_nothing_triggers() {
        let classifier = RiskClassifier::default();
        assert!(classifier.classify(0.02, 0.8, 0.05).reasoning.is_empty());
    }
}
