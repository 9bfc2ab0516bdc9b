pub mod prediction;
pub mod sentiment;
pub mod market_data;
pub mod injury;

pub use prediction::ModelPredictor;
pub use sentiment::SentimentAnalyzer;
pub use market_data::MarketDataCollector;
pub use injury::InjuryReportCollector;

use async_trait::async_trait;
use futures::future::join_all;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use tracing::{debug, error, info};

use crate::error::Result;
use crate::evaluator::Signal;
use crate::markets::BetCandidate;

/// Source of signals for a bet candidate.
#[async_trait]
pub trait SignalProvider: Send + Sync {
    /// Name of the signal this provider emits
    fn name(&self) -> &'static str;

    async fn signals_for(&self, candidate: &BetCandidate) -> Result<Vec<Signal>>;
}

/// Queries every provider for a candidate and merges what they return.
pub struct SignalCollector {
    providers: Vec<Box<dyn SignalProvider>>,
}

impl SignalCollector {
    pub fn new(providers: Vec<Box<dyn SignalProvider>>) -> Self {
        Self { providers }
    }

    /// The four simulated providers, weighted from `weights` when present
    pub fn simulated(weights: &HashMap<String, f64>) -> Self {
        let weight = |name: &str, default: f64| weights.get(name).copied().unwrap_or(default);

        Self::new(vec![
            Box::new(ModelPredictor::new(weight(prediction::SIGNAL_NAME, 0.5))),
            Box::new(MarketDataCollector::new(weight(market_data::SIGNAL_NAME, 0.2))),
            Box::new(SentimentAnalyzer::new(weight(sentiment::SIGNAL_NAME, 0.15))),
            Box::new(InjuryReportCollector::new(weight(injury::SIGNAL_NAME, 0.15))),
        ])
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Signals already on the candidate win over provider output.
    /// A failing provider is logged and skipped.
    pub async fn enrich(&self, mut candidate: BetCandidate) -> BetCandidate {
        let results = join_all(self.providers.iter().map(|p| p.signals_for(&candidate))).await;

        let mut added = 0;
        for (provider, result) in self.providers.iter().zip(results) {
            match result {
                Ok(signals) => {
                    for signal in signals {
                        if candidate.has_signal(&signal.name) {
                            debug!("Keeping supplied '{}' for {}", signal.name, candidate.id);
                            continue;
                        }
                        candidate.signals.push(signal);
                        added += 1;
                    }
                }
                Err(e) => error!("Provider {} failed for {}: {}", provider.name(), candidate.id, e),
            }
        }

        info!("Collected {} signals for {}", added, candidate.id);
        candidate
    }
}

/// Per-candidate RNG so simulated signals are reproducible across runs.
pub(crate) fn candidate_rng(candidate_id: &str, salt: &str) -> StdRng {
    // FNV-1a
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in candidate_id.bytes().chain(salt.bytes()) {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    StdRng::seed_from_u64(hash)
}
