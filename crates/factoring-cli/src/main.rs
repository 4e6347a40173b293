mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::batch::BatchArgs;
use commands::disbursement::DisbursementArgs;
use commands::quote::QuoteArgs;
use commands::rate_search::RateSearchArgs;
use commands::settlement::SettleArgs;
use factoring_core::factoring::pricing::PricingSchedule;

/// Invoice factoring calculations
#[derive(Parser)]
#[command(
    name = "fct",
    version,
    about = "Invoice factoring calculations",
    long_about = "A CLI for pricing and settling invoice factoring operations with decimal \
                  precision. Computes disbursements, batch commissions, the advance rate \
                  needed for a target payout, operation quotes and post-payment settlements."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Pricing schedule file (YAML or JSON); house defaults when omitted
    #[arg(long, global = true)]
    pricing: Option<String>,

    /// Log calculation decisions to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Disbursement for a single invoice
    Disbursement(DisbursementArgs),
    /// Price a batch of invoices under one commission method
    Batch(BatchArgs),
    /// Advance rate that yields a target disbursement
    RateSearch(RateSearchArgs),
    /// Settle an operation after payment
    Settle(SettleArgs),
    /// Quote invoices from their dates and amounts
    Quote(QuoteArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("factoring_core=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // stdout carries the result, logs go to stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load the pricing schedule only for commands that use it.
fn with_pricing<F>(
    pricing_path: Option<&str>,
    command: F,
) -> Result<serde_json::Value, Box<dyn std::error::Error>>
where
    F: FnOnce(&PricingSchedule) -> Result<serde_json::Value, Box<dyn std::error::Error>>,
{
    let pricing = input::pricing::load_pricing(pricing_path)?;
    command(&pricing)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let pricing_path = cli.pricing.as_deref();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Disbursement(args) => with_pricing(pricing_path, |p| {
            commands::disbursement::run_disbursement(args, p)
        }),
        Commands::Batch(args) => commands::batch::run_batch(args),
        Commands::RateSearch(args) => with_pricing(pricing_path, |p| {
            commands::rate_search::run_rate_search(args, p)
        }),
        Commands::Settle(args) => {
            with_pricing(pricing_path, |p| commands::settlement::run_settle(args, p))
        }
        Commands::Quote(args) => with_pricing(pricing_path, |p| {
            commands::quote::run_quote(args, p, pricing_path.is_some())
        }),
        Commands::Version => {
            println!("fct {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parses_without_pricing() {
        let cli = Cli::try_parse_from(["fct", "version", "--pricing", "missing.yaml"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_with_pricing_defaults_when_no_file() {
        let value = with_pricing(None, |p| {
            Ok(serde_json::json!({ "days": p.minimum_interest_days }))
        })
        .unwrap();
        assert_eq!(value["days"], 15);
    }

    #[test]
    fn test_with_pricing_missing_file_skips_command() {
        let mut ran = false;
        let result = with_pricing(Some("missing/pricing.yaml"), |_| {
            ran = true;
            Ok(serde_json::Value::Null)
        });
        assert!(result.is_err());
        assert!(!ran);
    }
}
