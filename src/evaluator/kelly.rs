use tracing::{debug, warn};

use crate::config::StrategyConfig;

/// Keeps p away from 0 and 1 so b*p - q never hits a singular edge.
const PROBABILITY_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KellyQuote {
    /// b*p - q, the expected profit per unit staked
    pub edge: f64,
    /// Unclipped Kelly fraction f* = (b*p - q) / b
    pub raw_fraction: f64,
    /// Fraction after the Kelly multiplier and the [0, max_stake] clip
    pub stake: f64,
}

impl KellyQuote {
    fn no_bet() -> Self {
        Self {
            edge: 0.0,
            raw_fraction: 0.0,
            stake: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct KellyStakeCalculator;

impl KellyStakeCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn calculate_stake(&self, confidence: f64, decimal_odds: f64, config: &StrategyConfig) -> f64 {
        self.quote(confidence, decimal_odds, config).stake
    }

    pub fn quote(&self, confidence: f64, decimal_odds: f64, config: &StrategyConfig) -> KellyQuote {
        if !decimal_odds.is_finite() || decimal_odds <= 1.0 {
            debug!("Decimal odds {} pay nothing above the stake, no bet", decimal_odds);
            return KellyQuote::no_bet();
        }

        if confidence.is_nan() {
            warn!("Confidence is NaN, recommending no stake");
            return KellyQuote::no_bet();
        }

        let p = if confidence <= 0.0 || confidence >= 1.0 {
            let clamped = confidence.clamp(PROBABILITY_EPSILON, 1.0 - PROBABILITY_EPSILON);
            warn!("Confidence {} clamped to {} for Kelly sizing", confidence, clamped);
            clamped
        } else {
            confidence
        };

        let b = decimal_odds - 1.0;
        let q = 1.0 - p;
        let edge = b * p - q;
        let raw_fraction = edge / b;

        let max_stake = config.max_stake.max(0.0);
        let mut stake = (raw_fraction * config.kelly_fraction).clamp(0.0, max_stake);
        if stake.is_nan() {
            warn!("Kelly stake is NaN (fraction {}), recommending no stake", config.kelly_fraction);
            stake = 0.0;
        } else if raw_fraction * config.kelly_fraction > max_stake {
            debug!("Kelly fraction {:.4} capped at {}", raw_fraction, max_stake);
        }

        KellyQuote {
            edge,
            raw_fraction,
            stake,
        }
    }
}
