//! Operation quote: the origination flow run for each invoice profile.
//!
//! Dates give the operation term, the pricing schedule fills in the
//! currency-specific commissions, the forward calculation gives the
//! theoretical disbursement, which is rounded down to a multiple of 10 and
//! fed back into the rate search to obtain the advance rate offered.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::FactoringError;
use crate::factoring::dates::{derive_operation_dates, withholding_pct, OperationDatesInput};
use crate::factoring::disbursement::{disbursement_breakdown, DisbursementOutput};
use crate::factoring::pricing::PricingSchedule;
use crate::factoring::rate_search::{search_rate_for_target, RateSearchInput, RateSearchOutput};
use crate::types::{with_metadata, ComputationOutput, Currency, Money, Rate};
use crate::FactoringResult;

/// Disbursement targets are quoted in steps of this many currency units.
const TARGET_STEP: Decimal = dec!(10);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// One invoice as captured at origination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceProfile {
    pub invoice_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceptor_name: Option<String>,
    pub currency: Currency,
    /// Invoice total including IGV.
    pub total_amount: Money,
    /// Amount after detracción / retención.
    pub net_amount: Money,
    pub issue_date: String,
    pub credit_days: i64,
    pub disbursement_date: String,
    pub advance_rate: Rate,
    pub monthly_interest_rate: Rate,
    #[serde(default)]
    pub apply_affiliation: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteInput {
    #[serde(default)]
    pub pricing: PricingSchedule,
    pub invoices: Vec<InvoiceProfile>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceQuote {
    pub invoice_number: String,
    pub currency: Currency,
    pub expected_payment_date: String,
    /// Calendar days from disbursement to expected payment.
    pub operation_term_days: i64,
    /// Days of interest actually charged (minimum interest days applied).
    pub charged_term_days: i64,
    /// Detracción / retención in percent, 2 dp.
    pub withholding_pct: Decimal,
    pub disbursement: DisbursementOutput,
    /// Theoretical disbursement rounded down to a multiple of 10.
    pub target_amount: Money,
    pub rate_search: RateSearchOutput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteOutput {
    pub quotes: Vec<InvoiceQuote>,
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Quote every invoice profile independently under one pricing schedule.
pub fn quote_operation(input: &QuoteInput) -> FactoringResult<ComputationOutput<QuoteOutput>> {
    let start = Instant::now();
    if input.invoices.is_empty() {
        return Err(FactoringError::EmptyBatch);
    }
    input.pricing.validate()?;

    let mut warnings: Vec<String> = Vec::new();
    let mut quotes = Vec::with_capacity(input.invoices.len());

    for profile in &input.invoices {
        let quote = quote_invoice(&input.pricing, profile)?;
        warnings.extend(
            quote
                .disbursement
                .warnings
                .iter()
                .chain(quote.rate_search.warnings.iter())
                .map(|w| format!("{}: {}", profile.invoice_number, w)),
        );
        quotes.push(quote);
    }

    let output = QuoteOutput {
        quotes,
        warnings: warnings.clone(),
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Operation quote -- forward disbursement, target floored to 10, advance rate solved for target",
        &input.pricing,
        warnings,
        elapsed,
        output,
    ))
}

fn quote_invoice(pricing: &PricingSchedule, profile: &InvoiceProfile) -> FactoringResult<InvoiceQuote> {
    let mut dates = derive_operation_dates(&OperationDatesInput {
        issue_date: profile.issue_date.clone(),
        credit_days: profile.credit_days,
        disbursement_date: profile.disbursement_date.clone(),
    })?;
    let charged_term_days = pricing.charged_term(dates.operation_term_days);

    let terms = pricing.terms_for(
        &profile.currency,
        charged_term_days,
        profile.net_amount,
        profile.advance_rate,
        profile.monthly_interest_rate,
        profile.apply_affiliation,
    )?;

    let mut disbursement = disbursement_breakdown(&terms, terms.standalone_commission())?;
    disbursement.warnings.append(&mut dates.warnings);

    let target_amount =
        (disbursement.net_disbursement_theoretical / TARGET_STEP).floor() * TARGET_STEP;
    if target_amount <= Decimal::ZERO {
        return Err(FactoringError::FinancialImpossibility(format!(
            "Invoice {}: theoretical disbursement {} leaves no positive target",
            profile.invoice_number, disbursement.net_disbursement_theoretical
        )));
    }
    debug!(
        invoice = %profile.invoice_number,
        %target_amount,
        charged_term_days,
        "quoting invoice"
    );

    let rate_search = search_rate_for_target(&RateSearchInput {
        term_days: terms.term_days,
        net_amount: terms.net_amount,
        monthly_interest_rate: terms.monthly_interest_rate,
        structuring_commission_pct: terms.structuring_commission_pct,
        tax_rate: terms.tax_rate,
        target_amount,
        minimum_commission: terms.minimum_commission,
        affiliation_commission: terms.affiliation_commission,
        apply_affiliation: terms.apply_affiliation,
    })?
    .result;

    Ok(InvoiceQuote {
        invoice_number: profile.invoice_number.clone(),
        currency: profile.currency.clone(),
        expected_payment_date: dates.expected_payment_date,
        operation_term_days: dates.operation_term_days,
        charged_term_days,
        withholding_pct: withholding_pct(profile.total_amount, profile.net_amount).round_dp(2),
        disbursement,
        target_amount,
        rate_search,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
