use crate::error::{BetSeerError, Result};

/// Converts American odds (+150, -110) to decimal odds
pub fn american_to_decimal(american: f64) -> Result<f64> {
    if !american.is_finite() {
        return Err(BetSeerError::validation_error(format!(
            "American odds must be finite, got {}",
            american
        )));
    }

    if american >= 100.0 {
        Ok(1.0 + american / 100.0)
    } else if american <= -100.0 {
        Ok(1.0 + 100.0 / american.abs())
    } else {
        Err(BetSeerError::validation_error(format!(
            "American odds must be <= -100 or >= +100, got {}",
            american
        )))
    }
}

/// Converts decimal odds back to American odds
pub fn decimal_to_american(decimal: f64) -> Result<f64> {
    if !decimal.is_finite() || decimal <= 1.0 {
        return Err(BetSeerError::validation_error(format!(
            "Decimal odds must be greater than 1.0, got {}",
            decimal
        )));
    }

    if decimal >= 2.0 {
        Ok((decimal - 1.0) * 100.0)
    } else {
        Ok(-100.0 / (decimal - 1.0))
    }
}

/// Probability the bookmaker's price implies (vig included)
pub fn implied_probability(decimal: f64) -> Option<f64> {
    if decimal.is_finite() && decimal > 0.0 {
        Some((1.0 / decimal).min(1.0))
    } else {
        None
    }
}

/// Expected profit per unit staked for win probability `p` at `decimal` odds
pub fn expected_value(p: f64, decimal: f64) -> f64 {
    p * (decimal - 1.0) - (1.0 - p)
}

/// Formats decimal odds as an American price for display ("+150", "-110")
pub fn format_american(decimal: f64) -> String {
    match decimal_to_american(decimal) {
        Ok(american) if american > 0.0 => format!("+{:.0}", american),
        Ok(american) => format!("{:.0}", american),
        Err(_) => "N/A".to_string(),
    }
}
