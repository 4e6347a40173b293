pub mod batch;
pub mod disbursement;
pub mod quote;
pub mod rate_search;
pub mod settlement;

use factoring_core::Currency;

/// Parse a `--currency` flag value.
pub(crate) fn parse_currency(code: &str) -> Currency {
    match code.trim().to_ascii_uppercase().as_str() {
        "PEN" => Currency::PEN,
        "USD" => Currency::USD,
        other => Currency::Other(other.to_string()),
    }
}
