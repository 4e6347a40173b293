//! Operation calendar: expected payment date and financing term derived
//! from the invoice issue date, its credit days and the disbursement date.

use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FactoringError;
use crate::types::{format_date, parse_date, Money};
use crate::FactoringResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationDatesInput {
    /// Invoice issue date, `DD-MM-YYYY`.
    pub issue_date: String,
    /// Credit granted to the acceptor, in days from issue.
    pub credit_days: i64,
    /// Date the financier pays out, `DD-MM-YYYY`.
    pub disbursement_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationDates {
    /// `issue_date + credit_days`, `DD-MM-YYYY`.
    pub expected_payment_date: String,
    /// Days from disbursement to expected payment, never negative.
    pub operation_term_days: i64,
    pub warnings: Vec<String>,
}

pub fn derive_operation_dates(input: &OperationDatesInput) -> FactoringResult<OperationDates> {
    if input.credit_days < 0 {
        return Err(FactoringError::InvalidInput {
            field: "credit_days".into(),
            reason: "Credit days cannot be negative".into(),
        });
    }
    let mut warnings = Vec::new();

    let issue = parse_date(&input.issue_date, "issue_date")?;
    let disbursement = parse_date(&input.disbursement_date, "disbursement_date")?;

    let expected_payment = Duration::try_days(input.credit_days)
        .and_then(|credit| issue.checked_add_signed(credit))
        .ok_or_else(|| {
            FactoringError::DateError(format!(
                "issue_date + {} days is out of range",
                input.credit_days
            ))
        })?;

    let raw_term = (expected_payment - disbursement).num_days();
    if raw_term < 0 {
        warnings.push(format!(
            "Disbursement date {} is after the expected payment date {}; term set to 0",
            input.disbursement_date,
            format_date(expected_payment)
        ));
    }

    Ok(OperationDates {
        expected_payment_date: format_date(expected_payment),
        operation_term_days: raw_term.max(0),
        warnings,
    })
}

/// Detracción / retención as a percentage of the invoice total.
pub fn withholding_pct(total_amount: Money, net_amount: Money) -> Decimal {
    if total_amount <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (total_amount - net_amount) / total_amount * Decimal::ONE_HUNDRED
}
