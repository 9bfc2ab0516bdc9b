use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{BetSeerError, Result};
use crate::evaluator::Signal;
use crate::markets::{odds, BetCandidate};
use super::{candidate_rng, SignalProvider};

pub const SIGNAL_NAME: &str = "model_probability";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPrediction {
    pub candidate_id: String,
    /// Estimated probability the selection wins
    pub win_probability: f64,
    /// Model's own uncertainty, 0.0 to 1.0
    pub uncertainty: f64,
    pub reasoning: String,
}

/// Stand-in for the prediction model service; simulated, seeded per candidate.
pub struct ModelPredictor {
    weight: f64,
}

impl ModelPredictor {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }

    pub async fn predict(&self, candidate: &BetCandidate) -> Result<ModelPrediction> {
        info!("Getting model prediction for {}", candidate.id);

        let implied = odds::implied_probability(candidate.decimal_odds).ok_or_else(|| {
            BetSeerError::provider_error(format!(
                "cannot price {} at decimal odds {}",
                candidate.id, candidate.decimal_odds
            ))
        })?;

        Ok(self.simulate_prediction(candidate, implied))
    }

    fn simulate_prediction(&self, candidate: &BetCandidate, implied: f64) -> ModelPrediction {
        let mut rng = candidate_rng(&candidate.id, SIGNAL_NAME);

        // The model disagrees with the market by a few points either way
        let model_edge = rng.gen_range(-0.08..0.12);
        let win_probability = (implied + model_edge).clamp(0.01, 0.99);
        let uncertainty = rng.gen_range(0.02..0.15);

        let reasoning = format!(
            "Market implies {:.1}%, model estimates {:.1}% (+/- {:.1})",
            implied * 100.0,
            win_probability * 100.0,
            uncertainty * 100.0
        );
        debug!("{}: {}", candidate.id, reasoning);

        ModelPrediction {
            candidate_id: candidate.id.clone(),
            win_probability,
            uncertainty,
            reasoning,
        }
    }
}

#[async_trait]
impl SignalProvider for ModelPredictor {
    fn name(&self) -> &'static str {
        SIGNAL_NAME
    }

    async fn signals_for(&self, candidate: &BetCandidate) -> Result<Vec<Signal>> {
        let prediction = self.predict(candidate).await?;
        Ok(vec![Signal::new(SIGNAL_NAME, prediction.win_probability, self.weight)])
    }
}
