//! Settlement of an operation once the acceptor has paid.
//!
//! A late payment accrues compensatory interest on the disbursed capital and
//! moratory interest on capital plus compensatory interest. An early payment
//! returns the interest charged for the days not used. Any shortfall against
//! the expected net amount is charged too. Everything is settled against the
//! safety margin retained at disbursement.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::FactoringError;
use crate::settlement::projection::{project_debt, ProjectionDay};
use crate::time_value::{compound_factor, compound_interest, daily_rate, term_to_days};
use crate::types::{parse_date, round_money, with_metadata, ComputationOutput, Money, Rate};
use crate::FactoringResult;

fn default_tax_rate() -> Rate {
    dec!(0.18)
}

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// The figures recorded when the operation was disbursed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationSnapshot {
    /// `DD-MM-YYYY`. Operations captured before dates were mandatory may lack it.
    #[serde(default)]
    pub expected_payment_date: Option<String>,
    pub expected_net_amount: Money,
    pub capital: Money,
    pub safety_margin: Money,
    #[serde(default)]
    pub original_interest: Money,
    #[serde(default)]
    pub original_term_days: i64,
    #[serde(default)]
    pub original_monthly_rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementInput {
    pub operation: OperationSnapshot,
    pub received_amount: Money,
    /// `DD-MM-YYYY`
    pub actual_payment_date: String,
    /// Monthly compensatory rate as a decimal (3.5% = 0.035).
    pub compensatory_rate: Rate,
    /// Monthly moratory rate as a decimal.
    pub moratory_rate: Rate,
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Rate,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentType {
    #[serde(rename = "Tardío")]
    Late,
    #[serde(rename = "Anticipado")]
    Early,
    #[serde(rename = "A Tiempo")]
    OnTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementCharges {
    pub compensatory_interest: Money,
    pub tax_on_compensatory: Money,
    pub moratory_interest: Money,
    pub tax_on_moratory: Money,
    /// Interest, taxes and the amount shortfall.
    pub total_charges: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementCredits {
    pub interest_to_return: Money,
    pub tax_on_interest_to_return: Money,
    pub total_credits: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementOutput {
    /// Actual minus expected payment date, in days.
    pub days_difference: i64,
    pub payment_type: PaymentType,
    /// Expected net amount minus the amount received.
    pub amount_difference: Money,
    pub charges: SettlementCharges,
    pub credits: SettlementCredits,
    pub initial_safety_margin: Money,
    /// Positive: owed to the client. Negative: owed by the client.
    pub final_balance: Money,
    pub projection: Vec<ProjectionDay>,
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Settle an operation against its safety margin.
pub fn settle_operation(
    input: &SettlementInput,
) -> FactoringResult<ComputationOutput<SettlementOutput>> {
    let start = Instant::now();
    validate_rates(input)?;

    let op = &input.operation;
    let mut warnings: Vec<String> = Vec::new();

    let expected_date = op
        .expected_payment_date
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| FactoringError::MissingExpectedDate("expected_payment_date is absent".into()))
        .and_then(|s| {
            parse_date(s, "expected_payment_date")
                .map_err(|e| FactoringError::MissingExpectedDate(e.to_string()))
        })?;
    let actual_date = parse_date(&input.actual_payment_date, "actual_payment_date")?;

    let days_difference = (actual_date - expected_date).num_days();
    let amount_difference = op.expected_net_amount - input.received_amount;

    let payment_type = match days_difference {
        d if d > 0 => PaymentType::Late,
        d if d < 0 => PaymentType::Early,
        _ => PaymentType::OnTime,
    };
    debug!(?payment_type, days_difference, %amount_difference, "settling operation");

    // --- Late payment: compensatory and moratory interest ---
    let mut compensatory = Decimal::ZERO;
    let mut moratory = Decimal::ZERO;
    if payment_type == PaymentType::Late {
        let days = term_to_days(days_difference)?;
        compensatory = compound_interest(op.capital, input.compensatory_rate, days)?;
        // Tax on compensatory interest is not part of the moratory base
        moratory = (op.capital + compensatory)
            * compound_factor(daily_rate(input.moratory_rate), days)?;
    }
    let tax_on_compensatory = compensatory * input.tax_rate;
    let tax_on_moratory = moratory * input.tax_rate;

    // --- Early payment: return interest for the days not used ---
    let mut interest_to_return = Decimal::ZERO;
    if payment_type == PaymentType::Early {
        let days_early = -days_difference;
        let actual_term = (op.original_term_days - days_early).max(0);
        let actual_interest = compound_interest(
            op.capital,
            op.original_monthly_rate,
            term_to_days(actual_term)?,
        )?;
        interest_to_return = op.original_interest - actual_interest;
        if interest_to_return < Decimal::ZERO {
            warnings.push(format!(
                "Original interest {} is below the interest for the {} days actually used; credit is negative",
                op.original_interest, actual_term
            ));
        }
    }
    let tax_on_interest_to_return = interest_to_return * input.tax_rate;

    let total_charges =
        compensatory + tax_on_compensatory + moratory + tax_on_moratory + amount_difference;
    let total_credits = interest_to_return + tax_on_interest_to_return;
    let final_balance = op.safety_margin - total_charges + total_credits;

    let projection = if payment_type == PaymentType::Late
        && amount_difference > Decimal::ZERO
        && final_balance < Decimal::ZERO
    {
        project_debt(
            final_balance.abs(),
            actual_date,
            input.compensatory_rate,
            input.moratory_rate,
            input.tax_rate,
        )?
    } else {
        Vec::new()
    };

    let output = SettlementOutput {
        days_difference,
        payment_type,
        amount_difference: round_money(amount_difference),
        charges: SettlementCharges {
            compensatory_interest: round_money(compensatory),
            tax_on_compensatory: round_money(tax_on_compensatory),
            moratory_interest: round_money(moratory),
            tax_on_moratory: round_money(tax_on_moratory),
            total_charges: round_money(total_charges),
        },
        credits: SettlementCredits {
            interest_to_return: round_money(interest_to_return),
            tax_on_interest_to_return: round_money(tax_on_interest_to_return),
            total_credits: round_money(total_credits),
        },
        initial_safety_margin: round_money(op.safety_margin),
        final_balance: round_money(final_balance),
        projection,
        warnings: warnings.clone(),
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Factoring settlement -- daily compounding on a 30-day month, moratory base excludes IGV, 30-day debt projection",
        &serde_json::json!({
            "compensatory_rate": input.compensatory_rate.to_string(),
            "moratory_rate": input.moratory_rate.to_string(),
            "tax_rate": input.tax_rate.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Utility
// ---------------------------------------------------------------------------

fn validate_rates(input: &SettlementInput) -> FactoringResult<()> {
    let rates = [
        ("compensatory_rate", input.compensatory_rate),
        ("moratory_rate", input.moratory_rate),
        ("operation.original_monthly_rate", input.operation.original_monthly_rate),
    ];
    for (field, rate) in rates {
        if rate < Decimal::ZERO {
            return Err(FactoringError::InvalidInput {
                field: field.into(),
                reason: "Rate cannot be negative".into(),
            });
        }
    }
    if input.tax_rate < Decimal::ZERO || input.tax_rate >= Decimal::ONE {
        return Err(FactoringError::InvalidInput {
            field: "tax_rate".into(),
            reason: "Tax rate must be in [0, 1)".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
