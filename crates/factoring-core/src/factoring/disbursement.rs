//! Forward disbursement ("abono") calculation for a single invoice.
//!
//! Interest compounds daily over the operation term using a 30-day month.
//! IGV applies to interest and commissions, never to capital. Values are
//! carried at full `Decimal` precision and rounded to cents only when the
//! output is built.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::time_value::{compound_factor, daily_rate, term_to_days};
use crate::types::{round_money, with_metadata, ComputationOutput, Money, Rate};
use crate::FactoringResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Commercial terms of a single invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationTerms {
    /// Financing term in days ("plazo de operación").
    pub term_days: i64,
    /// Invoice amount net of detracción / retención.
    pub net_amount: Money,
    /// Fraction of the net amount advanced as capital.
    pub advance_rate: Rate,
    /// Nominal monthly interest rate.
    pub monthly_interest_rate: Rate,
    /// Structuring commission as a fraction of capital.
    pub structuring_commission_pct: Rate,
    /// Floor for the structuring commission.
    pub minimum_commission: Money,
    /// IGV rate.
    pub tax_rate: Rate,
    #[serde(default)]
    pub affiliation_commission: Money,
    #[serde(default)]
    pub apply_affiliation: bool,
}

impl OperationTerms {
    pub fn capital(&self) -> Money {
        self.net_amount * self.advance_rate
    }

    /// Structuring commission when the invoice is priced on its own.
    pub fn standalone_commission(&self) -> Money {
        (self.capital() * self.structuring_commission_pct).max(self.minimum_commission)
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Breakdown of the disbursement for one invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisbursementOutput {
    pub capital: Money,
    pub interest: Money,
    pub tax_on_interest: Money,
    pub structuring_commission: Money,
    pub tax_on_commission: Money,
    pub affiliation_commission: Money,
    pub tax_on_affiliation: Money,
    /// Disbursement before flooring to whole currency units.
    pub net_disbursement_theoretical: Money,
    /// Amount actually paid out.
    pub floored_disbursement: Money,
    pub safety_margin: Money,
    pub term_days: i64,
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the disbursement for one invoice priced on its own.
///
/// The structuring commission is `max(capital * pct, minimum_commission)`.
pub fn compute_disbursement(
    terms: &OperationTerms,
) -> FactoringResult<ComputationOutput<DisbursementOutput>> {
    let start = Instant::now();

    let output = disbursement_breakdown(terms, terms.standalone_commission())?;

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Factoring disbursement -- daily compound interest, 30-day month, IGV on interest and commissions",
        &serde_json::json!({
            "day_count": "30/month",
            "commission_rule": "max(capital * pct, minimum)",
            "rounding": "2dp on output, disbursement floored",
        }),
        output.warnings.clone(),
        elapsed,
        output,
    ))
}

/// Disbursement breakdown with an already-resolved structuring commission.
///
/// Batch pricing decides the commission for every invoice up front and
/// calls this directly, bypassing the per-invoice minimum.
pub(crate) fn disbursement_breakdown(
    terms: &OperationTerms,
    structuring_commission: Money,
) -> FactoringResult<DisbursementOutput> {
    let days = term_to_days(terms.term_days)?;
    let mut warnings: Vec<String> = Vec::new();

    if terms.advance_rate <= Decimal::ZERO || terms.advance_rate > Decimal::ONE {
        warnings.push(format!(
            "Advance rate {} is outside (0, 1]",
            terms.advance_rate
        ));
    }

    let capital = terms.capital();
    let interest = capital * compound_factor(daily_rate(terms.monthly_interest_rate), days)?;
    let tax_on_interest = interest * terms.tax_rate;

    let tax_on_commission = structuring_commission * terms.tax_rate;

    let mut net_disbursement =
        capital - interest - tax_on_interest - structuring_commission - tax_on_commission;

    let (affiliation_commission, tax_on_affiliation) = if terms.apply_affiliation {
        let fee = terms.affiliation_commission;
        (fee, fee * terms.tax_rate)
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };
    net_disbursement -= affiliation_commission + tax_on_affiliation;

    if net_disbursement <= Decimal::ZERO {
        warnings.push("Costs consume the whole capital: disbursement is not positive".into());
    }

    // Floor toward negative infinity: never pay out more than the theoretical amount
    let floored_disbursement = net_disbursement.floor();
    let safety_margin = terms.net_amount - capital;

    Ok(DisbursementOutput {
        capital: round_money(capital),
        interest: round_money(interest),
        tax_on_interest: round_money(tax_on_interest),
        structuring_commission: round_money(structuring_commission),
        tax_on_commission: round_money(tax_on_commission),
        affiliation_commission: round_money(affiliation_commission),
        tax_on_affiliation: round_money(tax_on_affiliation),
        net_disbursement_theoretical: round_money(net_disbursement),
        floored_disbursement,
        safety_margin: round_money(safety_margin),
        term_days: terms.term_days,
        warnings,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
