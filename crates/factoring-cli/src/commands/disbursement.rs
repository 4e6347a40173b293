use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use factoring_core::factoring::disbursement::{self, OperationTerms};
use factoring_core::factoring::pricing::PricingSchedule;

use super::parse_currency;
use crate::input;

/// Arguments for a single-invoice disbursement
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct DisbursementArgs {
    /// Path to a JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Operation term in days
    #[arg(long)]
    pub term_days: Option<i64>,

    /// Invoice amount net of detracción / retención
    #[arg(long)]
    pub net_amount: Option<Decimal>,

    /// Fraction of the net amount advanced (e.g. 0.98)
    #[arg(long)]
    pub advance_rate: Option<Decimal>,

    /// Monthly interest rate as a decimal (e.g. 0.0125)
    #[arg(long, alias = "monthly-rate")]
    pub monthly_interest_rate: Option<Decimal>,

    /// Invoice currency, selects the pricing schedule's fees
    #[arg(long, default_value = "PEN")]
    pub currency: String,

    /// Override the schedule's structuring commission pct
    #[arg(long)]
    pub commission_pct: Option<Decimal>,

    /// Override the schedule's minimum commission
    #[arg(long)]
    pub minimum_commission: Option<Decimal>,

    /// Override the schedule's tax rate
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Charge the affiliation commission
    #[arg(long)]
    pub affiliation: bool,

    /// Charge at least the schedule's minimum interest days
    #[arg(long)]
    pub apply_minimum_days: bool,
}

pub fn run_disbursement(
    args: DisbursementArgs,
    pricing: &PricingSchedule,
) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: OperationTerms = match input::read_input(args.input.as_deref())? {
        Some(terms) => terms,
        None => terms_from_flags(&args, pricing)?,
    };
    let result = disbursement::compute_disbursement(&terms)?;
    Ok(serde_json::to_value(result)?)
}

fn terms_from_flags(
    args: &DisbursementArgs,
    pricing: &PricingSchedule,
) -> Result<OperationTerms, Box<dyn std::error::Error>> {
    let term_days = args
        .term_days
        .ok_or("--term-days is required (or provide --input)")?;
    let term_days = if args.apply_minimum_days {
        pricing.charged_term(term_days)
    } else {
        term_days
    };

    let mut terms = pricing.terms_for(
        &parse_currency(&args.currency),
        term_days,
        args.net_amount
            .ok_or("--net-amount is required (or provide --input)")?,
        args.advance_rate
            .ok_or("--advance-rate is required (or provide --input)")?,
        args.monthly_interest_rate
            .ok_or("--monthly-interest-rate is required (or provide --input)")?,
        args.affiliation,
    )?;

    if let Some(pct) = args.commission_pct {
        terms.structuring_commission_pct = pct;
    }
    if let Some(minimum) = args.minimum_commission {
        terms.minimum_commission = minimum;
    }
    if let Some(tax) = args.tax_rate {
        terms.tax_rate = tax;
    }
    Ok(terms)
}
