use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::evaluator::{RiskTier, ScoredOpportunity};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreLog {
    pub timestamp: DateTime<Utc>,
    pub id: String,
    pub label: Option<String>,
    pub decimal_odds: f64,
    pub confidence: f64,
    pub expected_value: f64,
    pub recommended_stake: f64,
    pub stake_amount: Option<f64>,
    pub risk_tier: RiskTier,
    /// Whether the opportunity survived ranking
    pub ranked: bool,
    pub reasoning: Vec<String>,
}

impl ScoreLog {
    pub fn from_opportunity(opportunity: &ScoredOpportunity, ranked: bool) -> Self {
        Self {
            timestamp: Utc::now(),
            id: opportunity.id.clone(),
            label: opportunity.label.clone(),
            decimal_odds: opportunity.decimal_odds,
            confidence: opportunity.confidence,
            expected_value: opportunity.expected_value,
            recommended_stake: opportunity.recommended_stake,
            stake_amount: opportunity.stake_amount,
            risk_tier: opportunity.risk_tier,
            ranked,
            reasoning: opportunity.reasoning.clone(),
        }
    }
}

/// Append-only JSON-lines log of scored opportunities.
pub struct Logger {
    log_path: PathBuf,
}

impl Logger {
    pub fn new(log_dir: &Path) -> Result<Self> {
        // Ensure the log directory exists
        std::fs::create_dir_all(log_dir)?;

        let log_path = log_dir.join("scores.jsonl");
        debug!("Score log at {}", log_path.display());

        Ok(Self { log_path })
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    pub async fn log_score(&self, entry: &ScoreLog) -> Result<()> {
        info!("Logging score for {} ({} risk)", entry.id, entry.risk_tier);

        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        file.write_all(line.as_bytes())?;

        Ok(())
    }

    pub async fn get_score_history(&self) -> Result<Vec<ScoreLog>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.log_path)?;

        let mut logs = Vec::new();
        for (n, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ScoreLog>(line) {
                Ok(entry) => logs.push(entry),
                Err(e) => warn!("Skipping unreadable score log line {}: {}", n + 1, e),
            }
        }

        Ok(logs)
    }
}
