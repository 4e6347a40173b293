use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use factoring_core::factoring::batch;
use factoring_core::factoring::disbursement::OperationTerms;

use crate::input;

/// Arguments for batch commission pricing
#[derive(Args)]
pub struct BatchArgs {
    /// Path to a JSON/YAML file with the invoices of the batch
    #[arg(long)]
    pub input: Option<String>,
}

/// A batch is either a bare list of invoices or wrapped in `{"invoices": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum BatchFile {
    List(Vec<OperationTerms>),
    Wrapped { invoices: Vec<OperationTerms> },
}

pub fn run_batch(args: BatchArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let invoices = match input::require_input::<BatchFile>(args.input.as_deref(), "batch pricing")? {
        BatchFile::List(invoices) | BatchFile::Wrapped { invoices } => invoices,
    };
    let result = batch::resolve_batch_commission(&invoices)?;
    Ok(serde_json::to_value(result)?)
}
