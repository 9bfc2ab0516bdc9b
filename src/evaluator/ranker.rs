use std::cmp::Ordering;
use tracing::debug;

use super::ScoredOpportunity;

#[derive(Debug, Clone, Default)]
pub struct OpportunityRanker;

impl OpportunityRanker {
    pub fn new() -> Self {
        Self
    }

    /// Drops opportunities under `min_confidence`, then orders by expected value
    /// and confidence, both descending. The input is left untouched.
    pub fn rank(&self, opportunities: &[ScoredOpportunity], min_confidence: f64) -> Vec<ScoredOpportunity> {
        let mut ranked: Vec<ScoredOpportunity> = opportunities
            .iter()
            .filter(|o| self.passes(o, min_confidence))
            .cloned()
            .collect();

        ranked.sort_by(|a, b| {
            descending(a.expected_value, b.expected_value)
                .then_with(|| descending(a.confidence, b.confidence))
        });

        debug!(
            "Ranked {} of {} opportunities (min confidence {})",
            ranked.len(),
            opportunities.len(),
            min_confidence
        );
        ranked
    }

    /// Whether `rank` keeps this opportunity. NaN confidence never passes.
    pub fn passes(&self, opportunity: &ScoredOpportunity, min_confidence: f64) -> bool {
        opportunity.confidence >= min_confidence
    }

    pub fn top(&self, opportunities: &[ScoredOpportunity], min_confidence: f64, n: usize) -> Vec<ScoredOpportunity> {
        let mut ranked = self.rank(opportunities, min_confidence);
        ranked.truncate(n);
        ranked
    }
}

// NaN sorts after every real number
fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::RiskTier;

    fn opportunity(id: &str, confidence: f64, expected_value: f64) -> ScoredOpportunity {
        ScoredOpportunity {
            id: id.to_string(),
            label: None,
            decimal_odds: 2.0,
            confidence,
            expected_value,
            recommended_stake: 0.0,
            stake_amount: None,
            risk_tier: RiskTier::Low,
            reasoning: Vec::new(),
        }
    }

    fn ids(list: &[ScoredOpportunity]) -> Vec<&str> {
        list.iter().map(|o| o.id.as_str()).collect()
    }

    #[test]
    fn empty_in_empty_out() {
        assert!(OpportunityRanker::new().rank(&[], 0.5).is_empty());
    }

    #[test]
    fn sorts_by_ev_then_confidence() {
        let input = vec![
            opportunity("a", 0.60, 0.05),
            opportunity("b", 0.70, 0.20),
            opportunity("c", 0.80, 0.05),
            opportunity("d", 0.55, -0.10),
        ];
        let ranked = OpportunityRanker::new().rank(&input, 0.0);
        assert_eq!(ids(&ranked), vec!["b", "c", "a", "d"]);
        // input order untouched
        assert_eq!(ids(&input), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn filters_below_min_confidence() {
        let input = vec![
            opportunity("a", 0.49, 0.50),
            opportunity("b", 0.50, 0.10),
            opportunity("c", 0.90, 0.30),
        ];
        let ranked = OpportunityRanker::new().rank(&input, 0.5);
        assert_eq!(ids(&ranked), vec!["c", "b"]);
    }

    #[test]
    fn passes_matches_rank_filter() {
        let ranker = OpportunityRanker::new();
        let input = vec![
            opportunity("same", 0.80, 0.10),
            opportunity("same", 0.20, 0.40),
            opportunity("same", f64::NAN, 0.30),
        ];
        let kept: Vec<bool> = input.iter().map(|o| ranker.passes(o, 0.5)).collect();
        assert_eq!(kept, vec![true, false, false]);
        assert_eq!(ranker.rank(&input, 0.5).len(), 1);
    }

    #[test]
    fn nan_expected_value_sorts_last() {
        let input = vec![
            opportunity("nan", 0.9, f64::NAN),
            opportunity("neg", 0.6, -0.2),
            opportunity("pos", 0.6, 0.1),
        ];
        let ranked = OpportunityRanker::new().rank(&input, 0.0);
        assert_eq!(ids(&ranked), vec!["pos", "neg", "nan"]);
    }

    #[test]
    fn top_truncates() {
        let input = vec![
            opportunity("a", 0.6, 0.1),
            opportunity("b", 0.6, 0.3),
            opportunity("c", 0.6, 0.2),
        ];
        let top = OpportunityRanker::new().top(&input, 0.0, 2);
        assert_eq!(ids(&top), vec!["b", "c"]);
    }
}
