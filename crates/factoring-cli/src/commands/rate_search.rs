use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use factoring_core::factoring::pricing::PricingSchedule;
use factoring_core::factoring::rate_search::{self, RateSearchInput};

use super::parse_currency;
use crate::input;

/// Arguments for the advance rate search
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RateSearchArgs {
    /// Path to a JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Disbursement the client should receive
    #[arg(long, alias = "target")]
    pub target_amount: Option<Decimal>,

    /// Operation term in days
    #[arg(long)]
    pub term_days: Option<i64>,

    /// Invoice amount net of detracción / retención
    #[arg(long)]
    pub net_amount: Option<Decimal>,

    /// Monthly interest rate as a decimal
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
}

pub fn run_rate_search(
    args: RateSearchArgs,
    pricing: &PricingSchedule,
) -> Result<Value, Box<dyn std::error::Error>> {
    let search_input: RateSearchInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => input_from_flags(&args, pricing)?,
    };
    let result = rate_search::search_rate_for_target(&search_input)?;
    Ok(serde_json::to_value(result)?)
}

fn input_from_flags(
    args: &RateSearchArgs,
    pricing: &PricingSchedule,
) -> Result<RateSearchInput, Box<dyn std::error::Error>> {
    let currency = parse_currency(&args.currency);
    Ok(RateSearchInput {
        term_days: args
            .term_days
            .ok_or("--term-days is required (or provide --input)")?,
        net_amount: args
            .net_amount
            .ok_or("--net-amount is required (or provide --input)")?,
        monthly_interest_rate: args
            .monthly_interest_rate
            .ok_or("--monthly-interest-rate is required (or provide --input)")?,
        structuring_commission_pct: args
            .commission_pct
            .unwrap_or(pricing.structuring_commission_pct),
        tax_rate: args.tax_rate.unwrap_or(pricing.tax_rate),
        target_amount: args
            .target_amount
            .ok_or("--target-amount is required (or provide --input)")?,
        minimum_commission: match args.minimum_commission {
            Some(minimum) => minimum,
            None => pricing.minimum_commission_for(&currency)?,
        },
        affiliation_commission: pricing.affiliation_commission_for(&currency)?,
        apply_affiliation: args.affiliation,
    })
}
