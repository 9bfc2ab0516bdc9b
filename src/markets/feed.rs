use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::error::Result;
use super::BetCandidate;

const SIMULATED_MATCHUPS: &[&str] = &[
    "Lakers ML",
    "Celtics -4.5",
    "Chiefs ML",
    "Eagles +3",
    "Yankees ML",
    "Dodgers -1.5",
    "Arsenal ML",
    "Real Madrid Draw No Bet",
];

#[derive(Debug, Clone)]
pub enum FeedSource {
    /// JSON array of candidates on disk
    File(PathBuf),
    /// Generated candidates without signals; providers fill those in
    Simulated { count: usize, seed: u64 },
}

#[derive(Debug, Clone)]
pub struct CandidateFeed {
    source: FeedSource,
    tx_sender: mpsc::Sender<BetCandidate>,
}

impl CandidateFeed {
    pub fn new(source: FeedSource, tx_sender: mpsc::Sender<BetCandidate>) -> Self {
        Self { source, tx_sender }
    }

    /// Pushes every candidate into the channel. Returns how many were delivered.
    pub async fn start(&self) -> Result<usize> {
        let candidates = match &self.source {
            FeedSource::File(path) => {
                info!("Reading bet candidates from {}", path.display());
                load_candidates(path).await?
            }
            FeedSource::Simulated { count, seed } => {
                info!("Generating {} simulated bet candidates (seed {})", count, seed);
                simulate_candidates(*count, *seed)
            }
        };

        let mut delivered = 0;
        for candidate in candidates {
            debug!("Feeding candidate {}", candidate.id);
            if let Err(e) = self.tx_sender.send(candidate).await {
                error!("Failed to send candidate to channel: {}", e);
                break;
            }
            delivered += 1;
        }

        info!("Candidate feed finished, {} delivered", delivered);
        Ok(delivered)
    }
}

pub async fn load_candidates(path: &Path) -> Result<Vec<BetCandidate>> {
    let content = tokio::fs::read_to_string(path).await?;
    let candidates: Vec<BetCandidate> = serde_json::from_str(&content)?;
    Ok(candidates)
}

pub fn simulate_candidates(count: usize, seed: u64) -> Vec<BetCandidate> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..count)
        .map(|i| {
            let label = SIMULATED_MATCHUPS[rng.gen_range(0..SIMULATED_MATCHUPS.len())];
            let decimal_odds = (rng.gen_range(1.3..4.5_f64) * 100.0).round() / 100.0;
            let volatility = rng.gen_range(0.02..0.40);

            BetCandidate::new(format!("sim-{}-{:03}", seed, i), decimal_odds)
                .with_label(label)
                .with_volatility(volatility)
        })
        .collect()
}
