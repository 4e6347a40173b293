use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use factoring_core::factoring::pricing::PricingSchedule;
use factoring_core::settlement::liquidation::{self, OperationSnapshot, SettlementInput};

use crate::input;

/// Arguments for settling an operation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SettleArgs {
    /// Path to a JSON/YAML file with the full settlement input
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a JSON/YAML file with the disbursed operation only
    #[arg(long)]
    pub operation: Option<String>,

    /// Amount received from the acceptor
    #[arg(long, alias = "received")]
    pub received_amount: Option<Decimal>,

    /// Actual payment date, DD-MM-YYYY
    #[arg(long, alias = "paid-on")]
    pub payment_date: Option<String>,

    /// Monthly compensatory rate as a decimal (3.5% = 0.035)
    #[arg(long)]
    pub compensatory_rate: Option<Decimal>,

    /// Monthly moratory rate as a decimal
    #[arg(long)]
    pub moratory_rate: Option<Decimal>,

    /// Override the schedule's tax rate
    #[arg(long)]
    pub tax_rate: Option<Decimal>,
}

pub fn run_settle(
    args: SettleArgs,
    pricing: &PricingSchedule,
) -> Result<Value, Box<dyn std::error::Error>> {
    let settlement_input: SettlementInput = if let Some(ref path) = args.operation {
        let operation: OperationSnapshot = input::file::read_structured(path)?;
        input_from_flags(operation, &args, pricing)?
    } else {
        input::require_input(args.input.as_deref(), "settlement (or --operation with flags)")?
    };
    let result = liquidation::settle_operation(&settlement_input)?;
    Ok(serde_json::to_value(result)?)
}

fn input_from_flags(
    operation: OperationSnapshot,
    args: &SettleArgs,
    pricing: &PricingSchedule,
) -> Result<SettlementInput, Box<dyn std::error::Error>> {
    Ok(SettlementInput {
        operation,
        received_amount: args
            .received_amount
            .ok_or("--received-amount is required with --operation")?,
        actual_payment_date: args
            .payment_date
            .clone()
            .ok_or("--payment-date is required with --operation")?,
        compensatory_rate: args
            .compensatory_rate
            .ok_or("--compensatory-rate is required with --operation")?,
        moratory_rate: args
            .moratory_rate
            .ok_or("--moratory-rate is required with --operation")?,
        tax_rate: args.tax_rate.unwrap_or(pricing.tax_rate),
    })
}
