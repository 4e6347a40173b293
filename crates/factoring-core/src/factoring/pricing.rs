//! Commercial pricing schedule.
//!
//! Holds the house defaults for commissions, tax and minimum interest days.
//! A schedule is always passed explicitly into the calculations that need
//! it; there is no process-wide pricing state.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::FactoringError;
use crate::factoring::disbursement::OperationTerms;
use crate::types::{Currency, Money, Rate};
use crate::FactoringResult;

/// A fee that differs by invoice currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyAmounts {
    pub pen: Money,
    pub usd: Money,
}

impl CurrencyAmounts {
    pub fn for_currency(&self, currency: &Currency, field: &str) -> FactoringResult<Money> {
        match currency {
            Currency::PEN => Ok(self.pen),
            Currency::USD => Ok(self.usd),
            Currency::Other(code) => Err(FactoringError::InvalidInput {
                field: field.to_string(),
                reason: format!("No {field} configured for currency {code}"),
            }),
        }
    }
}

/// House pricing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingSchedule {
    /// Structuring commission as a fraction of capital.
    pub structuring_commission_pct: Rate,
    /// Floor for the structuring commission, per currency.
    pub minimum_commission: CurrencyAmounts,
    /// One-off affiliation fee, per currency.
    pub affiliation_commission: CurrencyAmounts,
    /// IGV applied to interest and commissions.
    pub tax_rate: Rate,
    /// Interest is always charged for at least this many days.
    pub minimum_interest_days: u32,
}

impl Default for PricingSchedule {
    fn default() -> Self {
        Self {
            structuring_commission_pct: dec!(0.005),
            minimum_commission: CurrencyAmounts {
                pen: dec!(200),
                usd: dec!(50),
            },
            affiliation_commission: CurrencyAmounts {
                pen: dec!(200),
                usd: dec!(50),
            },
            tax_rate: dec!(0.18),
            minimum_interest_days: 15,
        }
    }
}

impl PricingSchedule {
    pub fn validate(&self) -> FactoringResult<()> {
        if self.structuring_commission_pct < Decimal::ZERO {
            return Err(FactoringError::InvalidInput {
                field: "structuring_commission_pct".into(),
                reason: "Structuring commission cannot be negative".into(),
            });
        }
        if self.tax_rate < Decimal::ZERO || self.tax_rate >= Decimal::ONE {
            return Err(FactoringError::InvalidInput {
                field: "tax_rate".into(),
                reason: "Tax rate must be in [0, 1)".into(),
            });
        }
        for (field, amounts) in [
            ("minimum_commission", &self.minimum_commission),
            ("affiliation_commission", &self.affiliation_commission),
        ] {
            if amounts.pen < Decimal::ZERO || amounts.usd < Decimal::ZERO {
                return Err(FactoringError::InvalidInput {
                    field: field.into(),
                    reason: "Commission amounts cannot be negative".into(),
                });
            }
        }
        Ok(())
    }

    pub fn minimum_commission_for(&self, currency: &Currency) -> FactoringResult<Money> {
        self.minimum_commission
            .for_currency(currency, "minimum_commission")
    }

    pub fn affiliation_commission_for(&self, currency: &Currency) -> FactoringResult<Money> {
        self.affiliation_commission
            .for_currency(currency, "affiliation_commission")
    }

    /// Term actually charged: never below the minimum interest days.
    pub fn charged_term(&self, operation_term_days: i64) -> i64 {
        operation_term_days.max(i64::from(self.minimum_interest_days))
    }

    /// Build per-invoice terms from this schedule.
    pub fn terms_for(
        &self,
        currency: &Currency,
        term_days: i64,
        net_amount: Money,
        advance_rate: Rate,
        monthly_interest_rate: Rate,
        apply_affiliation: bool,
    ) -> FactoringResult<OperationTerms> {
        Ok(OperationTerms {
            term_days,
            net_amount,
            advance_rate,
            monthly_interest_rate,
            structuring_commission_pct: self.structuring_commission_pct,
            minimum_commission: self.minimum_commission_for(currency)?,
            tax_rate: self.tax_rate,
            affiliation_commission: self.affiliation_commission_for(currency)?,
            apply_affiliation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule_is_valid() {
        let schedule = PricingSchedule::default();
        assert!(schedule.validate().is_ok());
        assert_eq!(schedule.tax_rate, dec!(0.18));
    }

    #[test]
    fn test_minimum_commission_by_currency() {
        let schedule = PricingSchedule::default();
        assert_eq!(schedule.minimum_commission_for(&Currency::PEN).unwrap(), dec!(200));
        assert_eq!(schedule.minimum_commission_for(&Currency::USD).unwrap(), dec!(50));
    }

    #[test]
    fn test_unknown_currency_rejected() {
        let schedule = PricingSchedule::default();
        let result = schedule.affiliation_commission_for(&Currency::Other("EUR".into()));
        match result {
            Err(FactoringError::InvalidInput { field, reason }) => {
                assert_eq!(field, "affiliation_commission");
                assert!(reason.contains("EUR"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_charged_term_applies_minimum_days() {
        let schedule = PricingSchedule::default();
        assert_eq!(schedule.charged_term(3), 15);
        assert_eq!(schedule.charged_term(53), 53);
    }

    #[test]
    fn test_invalid_tax_rate() {
        let schedule = PricingSchedule {
            tax_rate: dec!(1.5),
            ..Default::default()
        };
        match schedule.validate() {
            Err(FactoringError::InvalidInput { field, .. }) => assert_eq!(field, "tax_rate"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_schedule_deserializes_with_defaults() {
        let schedule: PricingSchedule =
            serde_json::from_str(r#"{"structuring_commission_pct": "0.015"}"#).unwrap();
        assert_eq!(schedule.structuring_commission_pct, dec!(0.015));
        assert_eq!(schedule.minimum_interest_days, 15);
    }

    #[test]
    fn test_terms_for_usd() {
        let schedule = PricingSchedule::default();
        let terms = schedule
            .terms_for(&Currency::USD, 30, dec!(1000), dec!(0.9), dec!(0.02), true)
            .unwrap();
        assert_eq!(terms.minimum_commission, dec!(50));
        assert_eq!(terms.affiliation_commission, dec!(50));
        assert!(terms.apply_affiliation);
    }
}
