use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{BetSeerError, Result};
use crate::evaluator::Signal;
use crate::markets::{odds, BetCandidate};
use super::{candidate_rng, SignalProvider};

pub const SIGNAL_NAME: &str = "market_edge";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookQuote {
    pub book: String,
    pub decimal_odds: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub candidate_id: String,
    pub quotes: Vec<BookQuote>,
    /// Probability implied by the offered price
    pub implied_probability: f64,
    /// No-vig probability across the sharper books
    pub consensus_probability: f64,
    pub timestamp: i64,
}

impl MarketSnapshot {
    /// Consensus minus offered implied probability; positive means the offered price is generous
    pub fn edge(&self) -> f64 {
        self.consensus_probability - self.implied_probability
    }
}

pub struct MarketDataCollector {
    weight: f64,
}

impl MarketDataCollector {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }

    pub async fn get_market_snapshot(&self, candidate: &BetCandidate) -> Result<MarketSnapshot> {
        info!("Getting market data for {}", candidate.id);

        let implied_probability = odds::implied_probability(candidate.decimal_odds)
            .filter(|p| *p < 1.0)
            .ok_or_else(|| {
                BetSeerError::provider_error(format!(
                    "no market for {} at decimal odds {}",
                    candidate.id, candidate.decimal_odds
                ))
            })?;

        Ok(self.simulate_market_snapshot(candidate, implied_probability))
    }

    fn simulate_market_snapshot(&self, candidate: &BetCandidate, implied_probability: f64) -> MarketSnapshot {
        let mut rng = candidate_rng(&candidate.id, SIGNAL_NAME);

        let quotes: Vec<BookQuote> = ["Pinnacle", "Circa", "BetCRIS"]
            .iter()
            .map(|book| {
                let shift = rng.gen_range(-0.08..0.08);
                BookQuote {
                    book: book.to_string(),
                    decimal_odds: (candidate.decimal_odds + shift).max(1.01),
                }
            })
            .collect();

        let consensus_probability = quotes
            .iter()
            .filter_map(|q| odds::implied_probability(q.decimal_odds))
            .sum::<f64>()
            / quotes.len() as f64;

        debug!(
            "{}: implied {:.3}, consensus {:.3}",
            candidate.id, implied_probability, consensus_probability
        );

        MarketSnapshot {
            candidate_id: candidate.id.clone(),
            quotes,
            implied_probability,
            consensus_probability,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

#[async_trait]
impl SignalProvider for MarketDataCollector {
    fn name(&self) -> &'static str {
        SIGNAL_NAME
    }

    async fn signals_for(&self, candidate: &BetCandidate) -> Result<Vec<Signal>> {
        let snapshot = self.get_market_snapshot(candidate).await?;
        Ok(vec![Signal::new(SIGNAL_NAME, snapshot.edge(), self.weight)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn edge_stays_small() {
        let collector = MarketDataCollector::new(0.2);
        let snapshot = collector
            .get_market_snapshot(&BetCandidate::new("nhl-3", 2.1))
            .await
            .unwrap();
        assert_eq!(snapshot.quotes.len(), 3);
        assert!(snapshot.edge().abs() < 0.05);
    }

    #[tokio::test]
    async fn no_market_at_even_stake() {
        let collector = MarketDataCollector::new(0.2);
        assert!(collector
            .get_market_snapshot(&BetCandidate::new("x", 1.0))
            .await
            .is_err());
    }
}
