//! Advance rate search: the inverse of the disbursement calculation.
//!
//! The forward calculation charges `max(capital * pct, minimum)` as the
//! structuring commission, so the disbursement is the smaller of two
//! increasing linear functions of capital. Each is inverted in closed form
//! and the larger capital is the one that reaches the target under the
//! real `max()` rule. No iteration is involved.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::FactoringError;
use crate::time_value::{compound_factor, daily_rate, term_to_days};
use crate::types::{round_money, share_of, with_metadata, AmountShare, ComputationOutput, Money, Rate};
use crate::FactoringResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Terms of an invoice without an advance rate, plus the desired payout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSearchInput {
    pub term_days: i64,
    pub net_amount: Money,
    pub monthly_interest_rate: Rate,
    pub structuring_commission_pct: Rate,
    pub tax_rate: Rate,
    /// Disbursement the client should receive.
    pub target_amount: Money,
    pub minimum_commission: Money,
    #[serde(default)]
    pub affiliation_commission: Money,
    #[serde(default)]
    pub apply_affiliation: bool,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Which side of the commission floor the solution sits on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommissionBranch {
    /// Commission charged as a percentage of capital.
    Percentage,
    /// Commission charged at the minimum.
    Minimum,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSummary {
    /// Advance rate reaching the target, 6 dp.
    pub found_advance_rate: Rate,
    /// Disbursement recomputed from the solved capital.
    pub achieved_disbursement: Money,
    pub target_amount: Money,
    pub commission_branch: CommissionBranch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolvedCalculation {
    pub capital: Money,
    pub interest: Money,
    pub tax_on_interest: Money,
    pub structuring_commission: Money,
    pub tax_on_commission: Money,
    pub affiliation_commission: Money,
    pub tax_on_affiliation: Money,
    pub safety_margin: Money,
    pub term_days: i64,
}

/// Every cost line as an amount and a percentage of the net amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub abono: AmountShare,
    pub interest: AmountShare,
    pub structuring_commission: AmountShare,
    pub affiliation_commission: AmountShare,
    pub total_tax: AmountShare,
    pub safety_margin: AmountShare,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSearchOutput {
    pub search: SearchSummary,
    pub calculation: SolvedCalculation,
    /// Omitted when the net amount is not positive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<CostBreakdown>,
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Find the advance rate whose disbursement equals `target_amount`.
pub fn search_rate_for_target(
    input: &RateSearchInput,
) -> FactoringResult<ComputationOutput<RateSearchOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.net_amount.is_zero() {
        return Err(FactoringError::ZeroNetAmount);
    }
    let days = term_to_days(input.term_days)?;

    let tax_factor = Decimal::ONE + input.tax_rate;
    let interest_factor = compound_factor(daily_rate(input.monthly_interest_rate), days)?;

    let fixed_affiliation_cost = if input.apply_affiliation {
        input.affiliation_commission * tax_factor
    } else {
        Decimal::ZERO
    };

    // --- Branch A: commission is a percentage of capital ---
    let variable_cost_a = (interest_factor + input.structuring_commission_pct) * tax_factor;
    let capital_a = solve_capital(
        input.target_amount + fixed_affiliation_cost,
        variable_cost_a,
    );
    if capital_a.is_none() {
        warn!(term_days = input.term_days, %variable_cost_a, "percentage branch guarded");
        warnings.push(
            "Percentage branch yields zero capital: interest and commission consume all capital".into(),
        );
    }

    // --- Branch B: commission is the fixed minimum ---
    let variable_cost_b = interest_factor * tax_factor;
    let fixed_costs_b = input.minimum_commission * tax_factor + fixed_affiliation_cost;
    let capital_b = solve_capital(input.target_amount + fixed_costs_b, variable_cost_b);
    if capital_b.is_none() {
        warn!(term_days = input.term_days, %variable_cost_b, "minimum branch guarded");
        warnings.push("Minimum branch yields zero capital: interest consumes all capital".into());
    }

    // A guarded branch contributes a capital of zero
    let capital_a = capital_a.unwrap_or(Decimal::ZERO);
    let capital_b = capital_b.unwrap_or(Decimal::ZERO);
    let (capital, branch) = if capital_a >= capital_b {
        (capital_a, CommissionBranch::Percentage)
    } else {
        (capital_b, CommissionBranch::Minimum)
    };
    debug!(?branch, %capital, "rate search capital solved");

    // --- Recompute the operation from the solved capital ---
    let interest = capital * interest_factor;
    let tax_on_interest = interest * input.tax_rate;

    let structuring_commission =
        (capital * input.structuring_commission_pct).max(input.minimum_commission);
    let tax_on_commission = structuring_commission * input.tax_rate;

    let (affiliation_commission, tax_on_affiliation) = if input.apply_affiliation {
        let fee = input.affiliation_commission;
        (fee, fee * input.tax_rate)
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    let abono = capital
        - interest
        - tax_on_interest
        - structuring_commission
        - tax_on_commission
        - affiliation_commission
        - tax_on_affiliation;
    let safety_margin = input.net_amount - capital;
    let total_tax = tax_on_interest + tax_on_commission + tax_on_affiliation;
    let advance_rate = capital / input.net_amount;

    if advance_rate > Decimal::ONE {
        warnings.push(format!(
            "Required advance rate {} exceeds 100% of the net amount",
            advance_rate.round_dp(6)
        ));
    }

    let breakdown = if input.net_amount > Decimal::ZERO {
        Some(CostBreakdown {
            abono: share_of(abono, input.net_amount),
            interest: share_of(interest, input.net_amount),
            structuring_commission: share_of(structuring_commission, input.net_amount),
            affiliation_commission: share_of(affiliation_commission, input.net_amount),
            total_tax: share_of(total_tax, input.net_amount),
            safety_margin: share_of(safety_margin, input.net_amount),
        })
    } else {
        None
    };

    let output = RateSearchOutput {
        search: SearchSummary {
            found_advance_rate: advance_rate.round_dp(6),
            achieved_disbursement: round_money(abono),
            target_amount: input.target_amount,
            commission_branch: branch,
        },
        calculation: SolvedCalculation {
            capital: round_money(capital),
            interest: round_money(interest),
            tax_on_interest: round_money(tax_on_interest),
            structuring_commission: round_money(structuring_commission),
            tax_on_commission: round_money(tax_on_commission),
            affiliation_commission: round_money(affiliation_commission),
            tax_on_affiliation: round_money(tax_on_affiliation),
            safety_margin: round_money(safety_margin),
            term_days: input.term_days,
        },
        breakdown,
        warnings: warnings.clone(),
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Advance rate search -- closed-form inversion of both commission branches, larger capital wins",
        &serde_json::json!({
            "day_count": "30/month",
            "commission_rule": "max(capital * pct, minimum)",
            "percentage_branch_capital": round_money(capital_a).to_string(),
            "minimum_branch_capital": round_money(capital_b).to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Utility
// ---------------------------------------------------------------------------

/// Capital `C` with `C * (1 - variable_cost) = numerator`.
///
/// Returns `None` when `1 - variable_cost <= 0`: no capital is large enough.
fn solve_capital(numerator: Money, variable_cost: Rate) -> Option<Money> {
    let denominator = Decimal::ONE - variable_cost;
    if denominator <= Decimal::ZERO {
        return None;
    }
    Some(numerator / denominator)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
