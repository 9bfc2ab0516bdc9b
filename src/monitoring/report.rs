use std::fmt::Write;

use crate::evaluator::pipeline::ScoringFailure;
use crate::evaluator::ScoredOpportunity;
use crate::markets::odds;

/// Plain-text table of ranked opportunities for the terminal.
pub fn render_ranking(ranked: &[ScoredOpportunity], failures: &[ScoringFailure]) -> String {
    let mut out = String::new();

    if ranked.is_empty() {
        out.push_str("No opportunities cleared the confidence floor.\n");
    } else {
        let _ = writeln!(
            out,
            "{:<4} {:<16} {:<26} {:>6} {:>6} {:>7} {:>7} {:>10} {:<6}",
            "#", "id", "selection", "odds", "conf", "ev", "stake", "amount", "risk"
        );
        for (rank, o) in ranked.iter().enumerate() {
            let amount = match o.stake_amount {
                Some(amount) => format!("{:.2}", amount),
                None => "N/A".to_string(),
            };
            let _ = writeln!(
                out,
                "{:<4} {:<16} {:<26} {:>6} {:>5.1}% {:>+7.3} {:>6.2}% {:>10} {:<6}",
                rank + 1,
                truncate(&o.id, 16),
                truncate(o.label.as_deref().unwrap_or("-"), 26),
                odds::format_american(o.decimal_odds),
                o.confidence * 100.0,
                o.expected_value,
                o.recommended_stake * 100.0,
                amount,
                o.risk_tier,
            );
            for reason in &o.reasoning {
                let _ = writeln!(out, "       - {}", reason);
            }
        }
    }

    if !failures.is_empty() {
        let _ = writeln!(out, "\n{} candidate(s) could not be scored:", failures.len());
        for failure in failures {
            let _ = writeln!(out, "  {}: {}", failure.id, failure.error);
        }
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::RiskTier;

    #[test]
    fn renders_rows_and_failures() {
        let ranked = vec![ScoredOpportunity {
            id: "nba-1".to_string(),
            label: Some("Lakers ML".to_string()),
            decimal_odds: 2.0,
            confidence: 0.65,
            expected_value: 0.3,
            recommended_stake: 0.3,
            stake_amount: None,
            risk_tier: RiskTier::High,
            reasoning: vec!["High volatility detected".to_string()],
        }];
        let failures = vec![ScoringFailure {
            id: "bad".to_string(),
            error: "Invalid signal 'x': duplicate signal".to_string(),
        }];

        let text = render_ranking(&ranked, &failures);
        assert!(text.contains("Lakers ML"));
        assert!(text.contains("+100"));
        assert!(text.contains("N/A"));
        assert!(text.contains("high"));
        assert!(text.contains("- High volatility detected"));
        assert!(text.contains("bad: Invalid signal"));
    }

    #[test]
    fn empty_ranking_message() {
        assert!(render_ranking(&[], &[]).starts_with("No opportunities"));
    }
}
