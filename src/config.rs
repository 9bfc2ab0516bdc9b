use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{BetSeerError, Result};
use crate::markets::BankrollState;

/// Stake size and confidence boundaries for the risk tiers and reasoning lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RiskThresholds {
    /// Stakes at or below this fraction are low risk
    pub low_stake: f64,
    /// Stakes at or below this fraction (and above `low_stake`) are medium risk
    pub medium_stake: f64,
    /// Volatility above this adds a warning line
    pub high_volatility: f64,
    /// Confidence below this adds a warning line
    pub low_confidence: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low_stake: 0.05,
            medium_stake: 0.15,
            high_volatility: 0.25,
            low_confidence: 0.55,
        }
    }
}

/// Read-only strategy parameters for one scoring pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StrategyConfig {
    pub min_confidence: f64,
    /// Hard ceiling on the recommended bankroll fraction
    pub max_stake: f64,
    pub min_odds: f64,
    pub max_odds: f64,
    /// Multiplier on the full Kelly fraction (1.0 = full Kelly)
    pub kelly_fraction: f64,
    pub risk_thresholds: RiskThresholds,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.55,
            // 50% of bankroll. Business rule carried over unchanged, pending product sign-off.
            max_stake: 0.5,
            min_odds: 1.01,
            max_odds: 50.0,
            kelly_fraction: 1.0,
            risk_thresholds: RiskThresholds::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
}

impl FeatureRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub strategy: StrategyConfig,
    /// Weights used by the confidence scorer; empty means "use each signal's own weight"
    pub signal_weights: HashMap<String, f64>,
    /// Min-max ranges for known signals; unknown signals are squashed with a sigmoid
    pub feature_ranges: HashMap<String, FeatureRange>,
    pub bankroll: BankrollState,
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let signal_weights = [
            ("model_probability", 0.5),
            ("market_edge", 0.2),
            ("sentiment", 0.15),
            ("injury_impact", 0.15),
        ]
        .into_iter()
        .map(|(name, weight)| (name.to_string(), weight))
        .collect();

        Self {
            strategy: StrategyConfig::default(),
            signal_weights,
            feature_ranges: default_feature_ranges(),
            bankroll: BankrollState::new(1_000.0, 0.0),
            log_dir: PathBuf::from("./logs"),
        }
    }
}

pub fn default_feature_ranges() -> HashMap<String, FeatureRange> {
    [
        ("model_probability", FeatureRange::new(0.0, 1.0)),
        ("market_edge", FeatureRange::new(-0.25, 0.25)),
        ("sentiment", FeatureRange::new(-1.0, 1.0)),
        ("injury_impact", FeatureRange::new(-1.0, 1.0)),
    ]
    .into_iter()
    .map(|(name, range)| (name.to_string(), range))
    .collect()
}

impl Config {
    /// Checks the numeric bounds the pipeline relies on.
    pub fn validate(&self) -> Result<()> {
        let s = &self.strategy;

        if !(0.0..=1.0).contains(&s.min_confidence) {
            return Err(BetSeerError::config_error(format!(
                "minConfidence must be within [0, 1], got {}",
                s.min_confidence
            )));
        }
        if !(0.0..=1.0).contains(&s.max_stake) {
            return Err(BetSeerError::config_error(format!(
                "maxStake must be within [0, 1], got {}",
                s.max_stake
            )));
        }
        if !(s.min_odds.is_finite() && s.max_odds.is_finite()) || s.min_odds > s.max_odds {
            return Err(BetSeerError::config_error(format!(
                "invalid odds window [{}, {}]",
                s.min_odds, s.max_odds
            )));
        }
        if !(s.kelly_fraction.is_finite() && s.kelly_fraction >= 0.0) {
            return Err(BetSeerError::config_error(format!(
                "kellyFraction must be non-negative, got {}",
                s.kelly_fraction
            )));
        }

        let t = &s.risk_thresholds;
        if t.low_stake > t.medium_stake {
            return Err(BetSeerError::config_error(format!(
                "lowStake ({}) exceeds mediumStake ({})",
                t.low_stake, t.medium_stake
            )));
        }

        for (name, weight) in &self.signal_weights {
            if !(weight.is_finite() && *weight >= 0.0) {
                return Err(BetSeerError::config_error(format!(
                    "weight for '{}' must be non-negative, got {}",
                    name, weight
                )));
            }
        }

        for (name, range) in &self.feature_ranges {
            let span = range.max - range.min;
            if !(range.min.is_finite() && range.max.is_finite() && span.is_finite()) || span <= 0.0 {
                return Err(BetSeerError::config_error(format!(
                    "range for '{}' is empty: [{}, {}]",
                    name, range.min, range.max
                )));
            }
        }

        if !(self.bankroll.balance.is_finite() && self.bankroll.balance >= 0.0) {
            return Err(BetSeerError::config_error(format!(
                "bankroll balance must be non-negative, got {}",
                self.bankroll.balance
            )));
        }
        if !(self.bankroll.exposure.is_finite() && self.bankroll.exposure >= 0.0) {
            return Err(BetSeerError::config_error(format!(
                "bankroll exposure must be non-negative, got {}",
                self.bankroll.exposure
            )));
        }

        Ok(())
    }
}

pub async fn load_config(path: Option<&Path>) -> Result<Config> {
    let file = path
        .map(Path::to_path_buf)
        .or_else(|| env::var("BETSEER_CONFIG").ok().map(PathBuf::from));

    let mut config = match file {
        Some(file) => {
            info!("Loading configuration from {}", file.display());
            let raw = tokio::fs::read_to_string(&file).await?;
            serde_json::from_str::<Config>(&raw)?
        }
        None => Config::default(),
    };

    // Override with environment variables
    if let Some(v) = env_f64("BETSEER_MIN_CONFIDENCE")? {
        config.strategy.min_confidence = v;
    }
    if let Some(v) = env_f64("BETSEER_MAX_STAKE")? {
        config.strategy.max_stake = v;
    }
    if let Some(v) = env_f64("BETSEER_MIN_ODDS")? {
        config.strategy.min_odds = v;
    }
    if let Some(v) = env_f64("BETSEER_MAX_ODDS")? {
        config.strategy.max_odds = v;
    }
    if let Some(v) = env_f64("BETSEER_KELLY_FRACTION")? {
        config.strategy.kelly_fraction = v;
    }
    if let Some(v) = env_f64("BETSEER_BANKROLL")? {
        config.bankroll.balance = v;
    }
    if let Some(v) = env_f64("BETSEER_EXPOSURE")? {
        config.bankroll.exposure = v;
    }
    if let Ok(log_dir) = env::var("BETSEER_LOG_DIR") {
        config.log_dir = PathBuf::from(log_dir);
    }

    if config.signal_weights.is_empty() {
        warn!("No signal weights configured, falling back to per-signal weights");
    }

    config.validate()?;
    Ok(config)
}

fn env_f64(key: &str) -> Result<Option<f64>> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|e| BetSeerError::config_error(format!("{}={}: {}", key, raw, e))),
        Err(_) => Ok(None),
    }
}
