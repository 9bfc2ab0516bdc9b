use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::evaluator::Signal;
use crate::markets::BetCandidate;
use super::{candidate_rng, SignalProvider};

pub const SIGNAL_NAME: &str = "sentiment";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentData {
    pub subject: String,
    pub sentiment_score: f64,  // -1.0 to 1.0
    pub social_mentions: u32,
    pub trending_score: f64,   // 0.0 to 1.0
    pub timestamp: i64,
}

pub struct SentimentAnalyzer {
    weight: f64,
}

impl SentimentAnalyzer {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }

    pub async fn get_sentiment(&self, candidate: &BetCandidate) -> Result<SentimentData> {
        let subject = candidate.label.clone().unwrap_or_else(|| candidate.id.clone());
        info!("Getting sentiment data for: {}", subject);

        Ok(self.simulate_sentiment_data(candidate, subject))
    }

    fn simulate_sentiment_data(&self, candidate: &BetCandidate, subject: String) -> SentimentData {
        let mut rng = candidate_rng(&candidate.id, SIGNAL_NAME);

        // Favourites draw more public support
        let base_sentiment: f64 = if candidate.decimal_odds < 2.0 { 0.3 } else { 0.0 };
        let random_factor = rng.gen_range(-0.4..0.4);

        SentimentData {
            subject,
            sentiment_score: (base_sentiment + random_factor).clamp(-1.0, 1.0),
            social_mentions: rng.gen_range(0..1000),
            trending_score: rng.gen_range(0.0..1.0),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

#[async_trait]
impl SignalProvider for SentimentAnalyzer {
    fn name(&self) -> &'static str {
        SIGNAL_NAME
    }

    async fn signals_for(&self, candidate: &BetCandidate) -> Result<Vec<Signal>> {
        let sentiment = self.get_sentiment(candidate).await?;
        Ok(vec![Signal::new(SIGNAL_NAME, sentiment.sentiment_score, self.weight)])
    }
}
