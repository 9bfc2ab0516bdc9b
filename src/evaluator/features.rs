use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::config::{default_feature_ranges, FeatureRange};
use crate::error::{BetSeerError, Result};
use super::Signal;

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub name: String,
    /// Normalized value in [0, 1]
    pub value: f64,
    /// Weight of the signal this feature came from
    pub weight: f64,
}

/// Normalized signals in the order they were supplied. Built once per evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    entries: Vec<Feature>,
}

impl FeatureVector {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|f| f.name == name).map(|f| f.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The weights the signals arrived with, keyed by name
    pub fn signal_weights(&self) -> HashMap<String, f64> {
        self.entries
            .iter()
            .map(|f| (f.name.clone(), f.weight))
            .collect()
    }
}

pub struct FeatureAggregator {
    ranges: HashMap<String, FeatureRange>,
}

impl FeatureAggregator {
    /// Ranges that can't scale a value (non-finite, empty or inverted) are
    /// dropped and their signals go through the sigmoid instead.
    pub fn new(ranges: HashMap<String, FeatureRange>) -> Self {
        let ranges = ranges
            .into_iter()
            .filter(|(name, range)| usable_range(name, range))
            .collect();
        Self { ranges }
    }

    pub fn with_range(mut self, name: impl Into<String>, range: FeatureRange) -> Self {
        let name = name.into();
        if usable_range(&name, &range) {
            self.ranges.insert(name, range);
        } else {
            self.ranges.remove(&name);
        }
        self
    }

    pub fn aggregate(&self, signals: &[Signal]) -> Result<FeatureVector> {
        if signals.is_empty() {
            return Err(BetSeerError::invalid_signal("<none>", "at least one signal is required"));
        }

        let mut seen = HashSet::with_capacity(signals.len());
        let mut entries = Vec::with_capacity(signals.len());

        for signal in signals {
            if !signal.value.is_finite() {
                return Err(BetSeerError::invalid_signal(
                    &signal.name,
                    format!("value must be finite, got {}", signal.value),
                ));
            }
            if !(signal.weight.is_finite() && signal.weight >= 0.0) {
                return Err(BetSeerError::invalid_signal(
                    &signal.name,
                    format!("weight must be non-negative, got {}", signal.weight),
                ));
            }
            if !seen.insert(signal.name.as_str()) {
                return Err(BetSeerError::invalid_signal(&signal.name, "duplicate signal"));
            }

            let value = self.normalize(&signal.name, signal.value);
            debug!("Feature {}: {} -> {:.4}", signal.name, signal.value, value);

            entries.push(Feature {
                name: signal.name.clone(),
                value,
                weight: signal.weight,
            });
        }

        Ok(FeatureVector { entries })
    }

    fn normalize(&self, name: &str, value: f64) -> f64 {
        let scaled = match self.ranges.get(name) {
            Some(range) => ((value - range.min) / (range.max - range.min)).clamp(0.0, 1.0),
            None => sigmoid(value),
        };
        if scaled.is_nan() {
            warn!("Feature {} normalized to NaN, using the sigmoid", name);
            return sigmoid(value);
        }
        scaled
    }
}

fn usable_range(name: &str, range: &FeatureRange) -> bool {
    let span = range.max - range.min;
    let usable = range.min.is_finite() && range.max.is_finite() && span.is_finite() && span > 0.0;
    if !usable {
        warn!(
            "Ignoring range [{}, {}] for feature {}, it can't scale values",
            range.min, range.max, name
        );
    }
    usable
}

impl Default for FeatureAggregator {
    fn default() -> Self {
        Self::new(default_feature_ranges())
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
