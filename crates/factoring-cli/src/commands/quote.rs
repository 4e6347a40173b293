use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use factoring_core::factoring::pricing::PricingSchedule;
use factoring_core::factoring::quote::{self, InvoiceProfile, QuoteInput};

use crate::input;

/// Arguments for quoting invoices
#[derive(Args)]
pub struct QuoteArgs {
    /// Path to a JSON/YAML file with invoice profiles
    #[arg(long)]
    pub input: Option<String>,
}

/// Either a bare list of invoice profiles or a full quote input.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuoteFile {
    Profiles(Vec<InvoiceProfile>),
    Full(QuoteInput),
}

/// An explicit `--pricing` file wins over pricing embedded in the input.
pub fn run_quote(
    args: QuoteArgs,
    pricing: &PricingSchedule,
    pricing_from_flag: bool,
) -> Result<Value, Box<dyn std::error::Error>> {
    let quote_input = match input::require_input::<QuoteFile>(args.input.as_deref(), "quote")? {
        QuoteFile::Profiles(invoices) => QuoteInput {
            pricing: pricing.clone(),
            invoices,
        },
        QuoteFile::Full(mut full) => {
            if pricing_from_flag {
                full.pricing = pricing.clone();
            }
            full
        }
    };
    let result = quote::quote_operation(&quote_input)?;
    Ok(serde_json::to_value(result)?)
}
