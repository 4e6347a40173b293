use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FactoringError;
use crate::FactoringResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Calendar format used for every date crossing the API boundary.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Invoice currency
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    PEN,
    USD,
    Other(String),
}

/// An amount together with its share of the invoice net amount (in percent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountShare {
    pub amount: Money,
    pub percentage: Decimal,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Round a monetary value to cents. Applied only when building outputs.
pub fn round_money(value: Money) -> Money {
    value.round_dp(2)
}

/// Build an `AmountShare` of `base`, percentage rounded to 3 dp.
///
/// Callers must guarantee `base > 0`.
pub fn share_of(amount: Money, base: Money) -> AmountShare {
    AmountShare {
        amount: round_money(amount),
        percentage: (amount / base * Decimal::ONE_HUNDRED).round_dp(3),
    }
}

/// Parse a `DD-MM-YYYY` date, reporting the offending field on failure.
pub fn parse_date(value: &str, field: &str) -> FactoringResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        FactoringError::DateError(format!("{field}: '{value}' is not a DD-MM-YYYY date ({e})"))
    })
}

/// Format a date as `DD-MM-YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
