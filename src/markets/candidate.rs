use serde::{Deserialize, Serialize};

use crate::error::{BetSeerError, Result};
use crate::evaluator::Signal;
use super::odds;

/// One bet the pipeline can score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawCandidate")]
pub struct BetCandidate {
    pub id: String,
    pub label: Option<String>,
    pub decimal_odds: f64,
    /// Price volatility of the market, 0.0 when unknown
    pub volatility: f64,
    pub signals: Vec<Signal>,
}

impl BetCandidate {
    pub fn new(id: impl Into<String>, decimal_odds: f64) -> Self {
        Self {
            id: id.into(),
            label: None,
            decimal_odds,
            volatility: 0.0,
            signals: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = volatility;
        self
    }

    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signals.push(signal);
        self
    }

    pub fn has_signal(&self, name: &str) -> bool {
        self.signals.iter().any(|s| s.name == name)
    }
}

// Input shape: either decimalOdds or americanOdds must be present.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCandidate {
    id: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    decimal_odds: Option<f64>,
    #[serde(default)]
    american_odds: Option<f64>,
    #[serde(default)]
    volatility: Option<f64>,
    #[serde(default)]
    signals: Vec<Signal>,
}

impl TryFrom<RawCandidate> for BetCandidate {
    type Error = BetSeerError;

    fn try_from(raw: RawCandidate) -> Result<Self> {
        let decimal_odds = match (raw.decimal_odds, raw.american_odds) {
            (Some(decimal), _) => decimal,
            (None, Some(american)) => odds::american_to_decimal(american)?,
            (None, None) => {
                return Err(BetSeerError::validation_error(format!(
                    "candidate '{}' has neither decimalOdds nor americanOdds",
                    raw.id
                )))
            }
        };

        Ok(Self {
            id: raw.id,
            label: raw.label,
            decimal_odds,
            volatility: raw.volatility.unwrap_or(0.0),
            signals: raw.signals,
        })
    }
}

/// Bankroll snapshot. Owned by the settlement side; scoring only reads it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BankrollState {
    pub balance: f64,
    pub exposure: f64,
}

impl BankrollState {
    pub fn new(balance: f64, exposure: f64) -> Self {
        Self { balance, exposure }
    }

    /// Funds not already tied up in open bets
    pub fn available(&self) -> f64 {
        let free = self.balance - self.exposure;
        if free.is_finite() {
            free.max(0.0)
        } else {
            0.0
        }
    }
}

impl Default for BankrollState {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}
