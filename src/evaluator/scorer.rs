use std::collections::HashMap;
use tracing::{debug, warn};

use super::FeatureVector;

/// Weighted average of normalized features.
#[derive(Debug, Clone, Default)]
pub struct ConfidenceScorer;

impl ConfidenceScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, features: &FeatureVector, weights: &HashMap<String, f64>) -> f64 {
        // Sorted keys keep the float summation order stable between calls
        let mut names: Vec<&String> = weights.keys().collect();
        names.sort();

        let mut valid = Vec::with_capacity(names.len());
        for name in names {
            let weight = weights[name];
            if weight.is_finite() && weight >= 0.0 {
                valid.push((name, weight));
            } else {
                warn!("Ignoring invalid weight {} for feature '{}'", weight, name);
            }
        }

        // Weights are divided by the largest one so the sums stay finite
        let max_weight = valid.iter().map(|(_, w)| *w).fold(0.0, f64::max);
        if max_weight <= 0.0 {
            warn!("Total feature weight is zero, confidence defaults to 0");
            return 0.0;
        }

        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;

        for (name, weight) in valid {
            let weight = weight / max_weight;
            let value = match features.get(name) {
                Some(value) => value,
                None => {
                    warn!("Feature '{}' is weighted but missing, counting it as 0", name);
                    0.0
                }
            };

            weighted_sum += value * weight;
            total_weight += weight;
        }

        let confidence = weighted_sum / total_weight;
        if !confidence.is_finite() {
            warn!("Confidence is not finite ({}), defaulting to 0", confidence);
            return 0.0;
        }

        let confidence = confidence.clamp(0.0, 1.0);
        debug!("Confidence {:.4} from {} weighted features", confidence, weights.len());
        confidence
    }
}
