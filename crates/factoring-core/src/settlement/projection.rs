//! Forward projection of an unpaid settlement balance.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::FactoringError;
use crate::time_value::daily_rate;
use crate::types::{format_date, round_money, Money, Rate};
use crate::FactoringResult;

/// Number of days projected past the actual payment date.
pub const PROJECTION_DAYS: u32 = 30;

/// Debt position at the end of one projected day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionDay {
    pub day: u32,
    /// `DD-MM-YYYY`
    pub date: String,
    /// Outstanding debt after capitalising the day's charges.
    pub projected_capital: Money,
    pub compensatory_interest: Money,
    pub tax_on_compensatory: Money,
    pub moratory_interest: Money,
    pub tax_on_moratory: Money,
}

/// Project `principal` day by day from `start_date`.
///
/// Every day the compensatory interest and its tax are charged on the
/// running debt; moratory interest is charged on the debt plus that day's
/// compensatory interest and tax. All four amounts are capitalised.
pub fn project_debt(
    principal: Money,
    start_date: NaiveDate,
    compensatory_rate: Rate,
    moratory_rate: Rate,
    tax_rate: Rate,
) -> FactoringResult<Vec<ProjectionDay>> {
    let daily_compensatory = daily_rate(compensatory_rate);
    let daily_moratory = daily_rate(moratory_rate);

    let mut capital = principal;
    let mut days = Vec::with_capacity(PROJECTION_DAYS as usize);

    for day in 1..=PROJECTION_DAYS {
        let date = start_date
            .checked_add_signed(Duration::days(i64::from(day)))
            .ok_or_else(|| {
                FactoringError::DateError(format!("projection day {day} is out of range"))
            })?;

        let compensatory = capital * daily_compensatory;
        let tax_on_compensatory = compensatory * tax_rate;

        let moratory_base = capital + compensatory + tax_on_compensatory;
        let moratory = moratory_base * daily_moratory;
        let tax_on_moratory = moratory * tax_rate;

        capital += compensatory + tax_on_compensatory + moratory + tax_on_moratory;

        days.push(ProjectionDay {
            day,
            date: format_date(date),
            projected_capital: round_money(capital),
            compensatory_interest: round_money(compensatory),
            tax_on_compensatory: round_money(tax_on_compensatory),
            moratory_interest: round_money(moratory),
            tax_on_moratory: round_money(tax_on_moratory),
        });
    }

    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 30).unwrap()
    }

    #[test]
    fn test_thirty_consecutive_days() {
        let days = project_debt(dec!(214.70), start(), dec!(0.035), dec!(0.01), dec!(0.18)).unwrap();
        assert_eq!(days.len(), 30);
        assert_eq!(days[0].day, 1);
        assert_eq!(days[0].date, "01-10-2025");
        assert_eq!(days[29].day, 30);
        assert_eq!(days[29].date, "30-10-2025");
    }

    #[test]
    fn test_first_day_components() {
        let days = project_debt(dec!(214.70), start(), dec!(0.035), dec!(0.01), dec!(0.18)).unwrap();
        let first = &days[0];
        assert_eq!(first.compensatory_interest, dec!(0.25));
        assert_eq!(first.tax_on_compensatory, dec!(0.05));
        assert_eq!(first.moratory_interest, dec!(0.07));
        assert_eq!(first.tax_on_moratory, dec!(0.01));
        assert_eq!(first.projected_capital, dec!(215.08));
    }

    #[test]
    fn test_projected_capital_monotonic() {
        let days = project_debt(dec!(214.70), start(), dec!(0.035), dec!(0.01), dec!(0.18)).unwrap();
        for pair in days.windows(2) {
            assert!(pair[1].projected_capital >= pair[0].projected_capital);
        }
        assert_eq!(days[1].projected_capital, dec!(215.46));
        assert_eq!(days[29].projected_capital, dec!(226.40));
    }

    #[test]
    fn test_zero_rates_keep_capital_flat() {
        let days = project_debt(dec!(100), start(), Decimal::ZERO, Decimal::ZERO, dec!(0.18)).unwrap();
        assert!(days.iter().all(|d| d.projected_capital == dec!(100)));
    }

    #[test]
    fn test_date_overflow() {
        let end = NaiveDate::MAX;
        assert!(matches!(
            project_debt(dec!(100), end, dec!(0.03), dec!(0.01), dec!(0.18)),
            Err(FactoringError::DateError(_))
        ));
    }
}
