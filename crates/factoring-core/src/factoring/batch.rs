//! Structuring commission policy for a batch of invoices disbursed together.
//!
//! The choice between a percentage of capital and the prorated minimum fee
//! is made once for the whole batch, then every invoice is priced under
//! that single method.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::FactoringError;
use crate::factoring::disbursement::{disbursement_breakdown, DisbursementOutput, OperationTerms};
use crate::types::{round_money, with_metadata, ComputationOutput, Money};
use crate::FactoringResult;

/// How the structuring commission is charged across the batch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommissionMethod {
    /// `capital_i * pct` on every invoice.
    #[serde(rename = "PORCENTAJE")]
    Percentage,
    /// Each invoice's own minimum commission.
    #[serde(rename = "PRORRATEADO")]
    Prorated,
}

/// Batch pricing result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchCommissionOutput {
    pub commission_method: CommissionMethod,
    /// Borrower-facing structuring commission total for the batch.
    pub corrected_commission_total: Money,
    /// Per-invoice breakdowns, in input order.
    pub invoices: Vec<DisbursementOutput>,
    pub warnings: Vec<String>,
}

/// Resolve the commission method for a batch and price every invoice.
pub fn resolve_batch_commission(
    batch: &[OperationTerms],
) -> FactoringResult<ComputationOutput<BatchCommissionOutput>> {
    let start = Instant::now();
    let first = batch.first().ok_or(FactoringError::EmptyBatch)?;
    let mut warnings: Vec<String> = Vec::new();

    let pct = first.structuring_commission_pct;
    for (idx, terms) in batch.iter().enumerate().skip(1) {
        if terms.structuring_commission_pct != pct || terms.tax_rate != first.tax_rate {
            warnings.push(format!(
                "Invoice {} has a commission pct or tax rate different from the first invoice; the first invoice's pct is used",
                idx + 1
            ));
        }
    }

    // --- Phase 1: one decision for the whole batch ---
    let total_capital: Money = batch.iter().map(OperationTerms::capital).sum();
    let total_prorated: Money = batch.iter().map(|t| t.minimum_commission).sum();
    let percentage_total = total_capital * pct;

    let method = if percentage_total > total_prorated {
        CommissionMethod::Percentage
    } else {
        CommissionMethod::Prorated
    };
    debug!(
        ?method,
        %percentage_total,
        %total_prorated,
        invoices = batch.len(),
        "batch structuring commission method resolved"
    );

    // --- Phase 2: price each invoice under the chosen method ---
    let mut invoices = Vec::with_capacity(batch.len());
    for terms in batch {
        let commission = match method {
            CommissionMethod::Percentage => terms.capital() * pct,
            CommissionMethod::Prorated => terms.minimum_commission,
        };
        let mut breakdown = disbursement_breakdown(terms, commission)?;
        warnings.append(&mut breakdown.warnings);
        invoices.push(breakdown);
    }

    // --- Phase 3: total free of rounding drift ---
    let corrected_commission_total = match method {
        CommissionMethod::Prorated => round_money(total_prorated),
        CommissionMethod::Percentage => round_money(
            invoices
                .iter()
                .map(|inv| inv.structuring_commission)
                .sum::<Decimal>(),
        ),
    };

    let output = BatchCommissionOutput {
        commission_method: method,
        corrected_commission_total,
        invoices,
        warnings: warnings.clone(),
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Batch structuring commission -- aggregate percentage vs prorated minimum, single method per batch",
        &serde_json::json!({
            "invoices": batch.len(),
            "structuring_commission_pct": pct.to_string(),
            "total_capital": round_money(total_capital).to_string(),
            "percentage_total": round_money(percentage_total).to_string(),
            "prorated_total": round_money(total_prorated).to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
