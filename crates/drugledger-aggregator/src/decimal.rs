//! Decimal rounding and rendering

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to 3 decimal places, ties away from zero
pub fn round_grams(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
}

/// Render a decimal as a floating value: trailing zeros dropped, at least one
/// fractional digit kept (`3` → `3.0`, `2.5010` → `2.501`)
pub fn render_decimal(amount: Decimal) -> String {
    let normalized = amount.normalize();
    if normalized.scale() == 0 {
        format!("{}.0", normalized)
    } else {
        normalized.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_grams(dec("2.5005")), dec("2.501"));
        assert_eq!(round_grams(dec("2.5004")), dec("2.500"));
        assert_eq!(round_grams(dec("0.0125")), dec("0.013"));
        assert_eq!(round_grams(dec("-1.0005")), dec("-1.001"));
    }

    #[test]
    fn test_render() {
        assert_eq!(render_decimal(dec("3")), "3.0");
        assert_eq!(render_decimal(dec("3.000")), "3.0");
        assert_eq!(render_decimal(dec("2.5010")), "2.501");
        assert_eq!(render_decimal(dec("0.1")), "0.1");
        assert_eq!(render_decimal(Decimal::ZERO), "0.0");
        assert_eq!(render_decimal(dec("1200")), "1200.0");
    }
}
