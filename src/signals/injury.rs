use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::evaluator::Signal;
use crate::markets::BetCandidate;
use super::{candidate_rng, SignalProvider};

pub const SIGNAL_NAME: &str = "injury_impact";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjuryReport {
    pub candidate_id: String,
    pub players_out: u32,
    pub players_questionable: u32,
    /// -1.0 (selection badly hurt) to 1.0 (opponent badly hurt)
    pub impact: f64,
}

pub struct InjuryReportCollector {
    weight: f64,
}

impl InjuryReportCollector {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }

    pub async fn get_report(&self, candidate: &BetCandidate) -> Result<InjuryReport> {
        info!("Getting injury report for {}", candidate.id);
        Ok(self.simulate_report(candidate))
    }

    fn simulate_report(&self, candidate: &BetCandidate) -> InjuryReport {
        let mut rng = candidate_rng(&candidate.id, SIGNAL_NAME);

        let players_out = rng.gen_range(0..3);
        let players_questionable = rng.gen_range(0..4);
        let opponent_out = rng.gen_range(0..3);

        let own = players_out as f64 * 0.25 + players_questionable as f64 * 0.05;
        let theirs = opponent_out as f64 * 0.25;

        InjuryReport {
            candidate_id: candidate.id.clone(),
            players_out,
            players_questionable,
            impact: (theirs - own).clamp(-1.0, 1.0),
        }
    }
}

#[async_trait]
impl SignalProvider for InjuryReportCollector {
    fn name(&self) -> &'static str {
        SIGNAL_NAME
    }

    async fn signals_for(&self, candidate: &BetCandidate) -> Result<Vec<Signal>> {
        let report = self.get_report(candidate).await?;
        Ok(vec![Signal::new(SIGNAL_NAME, report.impact, self.weight)])
    }
}
