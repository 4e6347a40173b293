use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::error::FactoringError;
use crate::types::{Money, Rate};
use crate::FactoringResult;

/// Fixed commercial month used to turn monthly rates into daily rates.
pub const DAYS_IN_MONTH: Decimal = dec!(30);

/// Daily rate from a nominal monthly rate (30-day month convention).
pub fn daily_rate(monthly_rate: Rate) -> Rate {
    monthly_rate / DAYS_IN_MONTH
}

/// Growth factor `(1 + daily)^days - 1` for daily compounding.
///
/// The exponent is a whole number of days, so the power is taken with
/// `checked_powu` (repeated squaring) rather than `powd`.
pub fn compound_factor(daily: Rate, days: u32) -> FactoringResult<Rate> {
    let compound = (Decimal::ONE + daily)
        .checked_powu(u64::from(days))
        .ok_or_else(|| {
            FactoringError::FinancialImpossibility(format!(
                "Compounding {daily} daily over {days} days overflows"
            ))
        })?;
    Ok(compound - Decimal::ONE)
}

/// Interest accrued on `principal` over `days` at a monthly rate, compounded daily.
pub fn compound_interest(principal: Money, monthly_rate: Rate, days: u32) -> FactoringResult<Money> {
    Ok(principal * compound_factor(daily_rate(monthly_rate), days)?)
}

/// Convert a signed day count into a compounding exponent.
pub fn term_to_days(term_days: i64) -> FactoringResult<u32> {
    if term_days < 0 {
        return Err(FactoringError::InvalidTerm { term_days });
    }
    u32::try_from(term_days).map_err(|_| FactoringError::InvalidInput {
        field: "term_days".into(),
        reason: format!("Term of {term_days} days is out of range"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_daily_rate() {
        assert_eq!(daily_rate(dec!(0.03)), dec!(0.001));
    }

    #[test]
    fn test_compound_factor_zero_days() {
        assert_eq!(compound_factor(dec!(0.001), 0).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_compound_factor_two_days() {
        // (1.01)^2 - 1 = 0.0201
        assert_eq!(compound_factor(dec!(0.01), 2).unwrap(), dec!(0.0201));
    }

    #[test]
    fn test_compound_interest_matches_monthly_rate_over_thirty_days() {
        // 30 days of daily compounding at 2%/30 slightly exceeds simple 2%
        let interest = compound_interest(dec!(1000), dec!(0.02), 30).unwrap();
        assert!(interest > dec!(20));
        assert!(interest < dec!(20.3));
    }

    #[test]
    fn test_compound_factor_overflow() {
        assert!(matches!(
            compound_factor(dec!(1), 200),
            Err(FactoringError::FinancialImpossibility(_))
        ));
    }

    #[test]
    fn test_compound_factor_long_zero_rate_term() {
        assert_eq!(compound_factor(Decimal::ZERO, u32::MAX).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_compound_factor_matches_stepwise_product() {
        let daily = daily_rate(dec!(0.0125));
        let mut stepwise = Decimal::ONE;
        for _ in 0..53 {
            stepwise *= Decimal::ONE + daily;
        }
        let factor = compound_factor(daily, 53).unwrap();
        assert!((factor - (stepwise - Decimal::ONE)).abs() < dec!(0.0000000001));
    }

    #[test]
    fn test_term_to_days_negative() {
        match term_to_days(-1) {
            Err(FactoringError::InvalidTerm { term_days }) => assert_eq!(term_days, -1),
            other => panic!("Expected InvalidTerm, got {:?}", other),
        }
    }
}
