use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::config::{Config, StrategyConfig};
use crate::error::Result;
use crate::markets::{odds, BankrollState, BetCandidate};
use super::{
    ConfidenceScorer, FeatureAggregator, KellyStakeCalculator, OpportunityRanker, RiskClassifier,
    ScoredOpportunity,
};

/// A candidate that could not be scored, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct ScoringFailure {
    pub id: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    /// Opportunities that passed the confidence floor, best first
    pub ranked: Vec<ScoredOpportunity>,
    /// How many candidates were scored, including those filtered out by ranking
    pub evaluated: usize,
    pub failures: Vec<ScoringFailure>,
}

/// Runs signals through aggregation, confidence, Kelly sizing, risk and ranking.
/// Every collaborator is handed in at construction.
pub struct ScoringPipeline {
    strategy: StrategyConfig,
    signal_weights: HashMap<String, f64>,
    aggregator: FeatureAggregator,
    scorer: ConfidenceScorer,
    kelly: KellyStakeCalculator,
    classifier: RiskClassifier,
    ranker: OpportunityRanker,
}

impl ScoringPipeline {
    pub fn new(
        strategy: StrategyConfig,
        signal_weights: HashMap<String, f64>,
        aggregator: FeatureAggregator,
        scorer: ConfidenceScorer,
        kelly: KellyStakeCalculator,
        classifier: RiskClassifier,
        ranker: OpportunityRanker,
    ) -> Self {
        Self {
            strategy,
            signal_weights,
            aggregator,
            scorer,
            kelly,
            classifier,
            ranker,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.strategy.clone(),
            config.signal_weights.clone(),
            FeatureAggregator::new(config.feature_ranges.clone()),
            ConfidenceScorer::new(),
            KellyStakeCalculator::new(),
            RiskClassifier::new(config.strategy.risk_thresholds.clone()),
            OpportunityRanker::new(),
        )
    }

    pub fn strategy(&self) -> &StrategyConfig {
        &self.strategy
    }

    pub fn evaluate(&self, candidate: &BetCandidate, bankroll: Option<&BankrollState>) -> Result<ScoredOpportunity> {
        debug!("Scoring candidate {}", candidate.id);

        let features = self.aggregator.aggregate(&candidate.signals)?;

        let confidence = if self.signal_weights.is_empty() {
            self.scorer.score(&features, &features.signal_weights())
        } else {
            self.scorer.score(&features, &self.signal_weights)
        };

        let decimal_odds = candidate.decimal_odds;
        let expected_value = odds::expected_value(confidence, decimal_odds);
        let mut reasoning = Vec::new();

        let in_window = decimal_odds >= self.strategy.min_odds && decimal_odds <= self.strategy.max_odds;
        let stake = if in_window {
            let quote = self.kelly.quote(confidence, decimal_odds, &self.strategy);
            if quote.edge <= 0.0 {
                reasoning.push("No positive edge at offered odds".to_string());
            }
            quote.stake
        } else {
            debug!(
                "Odds {} outside [{}, {}] for {}",
                decimal_odds, self.strategy.min_odds, self.strategy.max_odds, candidate.id
            );
            reasoning.push(format!(
                "Odds {:.2} outside strategy window [{:.2}, {:.2}]",
                decimal_odds, self.strategy.min_odds, self.strategy.max_odds
            ));
            0.0
        };

        let assessment = self.classifier.classify(stake, confidence, candidate.volatility);
        reasoning.extend(assessment.reasoning);

        Ok(ScoredOpportunity {
            id: candidate.id.clone(),
            label: candidate.label.clone(),
            decimal_odds,
            confidence,
            expected_value,
            recommended_stake: stake,
            stake_amount: bankroll.map(|b| stake * b.available()),
            risk_tier: assessment.tier,
            reasoning,
        })
    }

    /// Scores each candidate independently; one bad candidate never sinks the batch.
    pub fn evaluate_batch(&self, candidates: &[BetCandidate], bankroll: Option<&BankrollState>) -> BatchOutcome {
        info!("Scoring batch of {} candidates", candidates.len());

        let mut scored = Vec::with_capacity(candidates.len());
        let mut failures = Vec::new();

        for candidate in candidates {
            match self.evaluate(candidate, bankroll) {
                Ok(opportunity) => scored.push(opportunity),
                Err(e) => {
                    warn!("Failed to score {}: {}", candidate.id, e);
                    failures.push(ScoringFailure {
                        id: candidate.id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let ranked = self.rank(&scored);
        info!(
            "Batch done: {} scored, {} ranked, {} failed",
            scored.len(),
            ranked.len(),
            failures.len()
        );

        BatchOutcome {
            ranked,
            evaluated: scored.len(),
            failures,
        }
    }

    pub fn rank(&self, opportunities: &[ScoredOpportunity]) -> Vec<ScoredOpportunity> {
        self.ranker.rank(opportunities, self.strategy.min_confidence)
    }

    /// Whether this opportunity makes it through `rank`'s confidence floor
    pub fn survives(&self, opportunity: &ScoredOpportunity) -> bool {
        self.ranker.passes(opportunity, self.strategy.min_confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BetSeerError;
    use crate::evaluator::{RiskTier, Signal};

    fn single_signal_pipeline() -> ScoringPipeline {
        let mut config = Config::default();
        config.signal_weights = [("model_probability".to_string(), 1.0)].into_iter().collect();
        ScoringPipeline::from_config(&config)
    }

    #[test]
    fn even_money_scenario_is_high_risk() {
        let pipeline = single_signal_pipeline();
        let candidate = BetCandidate::new("nba-1", 2.0)
            .with_signal(Signal::new("model_probability", 0.65, 1.0));

        let scored = pipeline.evaluate(&candidate, None).unwrap();
        assert!((scored.confidence - 0.65).abs() < 1e-12);
        assert!((scored.recommended_stake - 0.30).abs() < 1e-9);
        assert!((scored.expected_value - 0.30).abs() < 1e-9);
        assert_eq!(scored.risk_tier, RiskTier::High);
        assert!(scored.stake_amount.is_none());
    }

    #[test]
    fn stake_amount_uses_free_bankroll() {
        let pipeline = single_signal_pipeline();
        let candidate = BetCandidate::new("nba-1", 2.0)
            .with_signal(Signal::new("model_probability", 0.65, 1.0));
        let bankroll = BankrollState::new(1_000.0, 200.0);

        let scored = pipeline.evaluate(&candidate, Some(&bankroll)).unwrap();
        assert!((scored.stake_amount.unwrap() - 240.0).abs() < 1e-6);
    }

    #[test]
    fn odds_outside_window_get_no_stake() {
        let pipeline = single_signal_pipeline();
        let candidate = BetCandidate::new("long-shot", 80.0)
            .with_signal(Signal::new("model_probability", 0.9, 1.0));

        let scored = pipeline.evaluate(&candidate, None).unwrap();
        assert_eq!(scored.recommended_stake, 0.0);
        assert_eq!(scored.risk_tier, RiskTier::Low);
        assert!(scored.reasoning[0].starts_with("Odds 80.00 outside"));
    }

    #[test]
    fn falls_back_to_signal_weights() {
        let mut config = Config::default();
        config.signal_weights.clear();
        let pipeline = ScoringPipeline::from_config(&config);
        let candidate = BetCandidate::new("x", 2.0)
            .with_signal(Signal::new("model_probability", 0.8, 3.0))
            .with_signal(Signal::new("sentiment", 0.0, 1.0));

        let scored = pipeline.evaluate(&candidate, None).unwrap();
        assert!((scored.confidence - 0.725).abs() < 1e-12);
    }

    #[test]
    fn huge_signal_weights_keep_confidence_finite() {
        let mut config = Config::default();
        config.signal_weights.clear();
        let pipeline = ScoringPipeline::from_config(&config);
        let candidate = BetCandidate::new("heavy", 2.0)
            .with_signal(Signal::new("model_probability", 0.9, 1e308))
            .with_signal(Signal::new("sentiment", 0.9, 1e308));

        let scored = pipeline.evaluate(&candidate, None).unwrap();
        // sentiment 0.9 on [-1, 1] scales to 0.95
        assert!((scored.confidence - 0.925).abs() < 1e-12);
        assert!(scored.recommended_stake > 0.0);
        assert_eq!(pipeline.rank(&[scored]).len(), 1);
    }

    #[test]
    fn unusable_config_ranges_still_score() {
        let mut config = Config::default();
        config.signal_weights = [("sentiment".to_string(), 1.0)].into_iter().collect();
        config
            .feature_ranges
            .insert("sentiment".to_string(), crate::config::FeatureRange::new(0.5, 0.5));
        let pipeline = ScoringPipeline::from_config(&config);
        let candidate = BetCandidate::new("flat-range", 2.0)
            .with_signal(Signal::new("sentiment", 0.5, 1.0));

        let scored = pipeline.evaluate(&candidate, None).unwrap();
        assert!(scored.confidence.is_finite());
        assert!(scored.recommended_stake.is_finite());
        assert!((0.0..=1.0).contains(&scored.confidence));
    }

    #[test]
    fn survival_is_judged_per_opportunity() {
        let pipeline = single_signal_pipeline();
        let strong = pipeline
            .evaluate(
                &BetCandidate::new("dup", 2.0).with_signal(Signal::new("model_probability", 0.65, 1.0)),
                None,
            )
            .unwrap();
        let weak = pipeline
            .evaluate(
                &BetCandidate::new("dup", 2.0).with_signal(Signal::new("model_probability", 0.3, 1.0)),
                None,
            )
            .unwrap();

        let ranked = pipeline.rank(&[strong.clone(), weak.clone()]);
        assert_eq!(ranked.len(), 1);
        assert!(pipeline.survives(&strong));
        assert!(!pipeline.survives(&weak));
    }

    #[test]
    fn invalid_signal_surfaces() {
        let pipeline = single_signal_pipeline();
        let candidate = BetCandidate::new("bad", 2.0)
            .with_signal(Signal::new("model_probability", 0.6, -1.0));
        assert!(matches!(
            pipeline.evaluate(&candidate, None),
            Err(BetSeerError::InvalidSignal { .. })
        ));
    }

    #[test]
    fn batch_isolates_failures() {
        let pipeline = single_signal_pipeline();
        let candidates = vec![
            BetCandidate::new("good", 2.0).with_signal(Signal::new("model_probability", 0.65, 1.0)),
            BetCandidate::new("empty", 2.0),
            BetCandidate::new("better", 3.0).with_signal(Signal::new("model_probability", 0.6, 1.0)),
            BetCandidate::new("weak", 2.0).with_signal(Signal::new("model_probability", 0.3, 1.0)),
        ];

        let outcome = pipeline.evaluate_batch(&candidates, None);
        assert_eq!(outcome.evaluated, 3);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].id, "empty");
        let ids: Vec<_> = outcome.ranked.iter().map(|o| o.id.as_str()).collect();
        // "weak" falls under the 0.55 confidence floor
        assert_eq!(ids, vec!["better", "good"]);
    }
}
