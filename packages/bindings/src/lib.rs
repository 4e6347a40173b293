use napi::Result as NapiResult;
use napi_derive::napi;

use factoring_core::factoring::{batch, disbursement, quote, rate_search};
use factoring_core::settlement::liquidation;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Origination
// ---------------------------------------------------------------------------

/// `OperationTerms` JSON in, disbursement envelope JSON out.
#[napi]
pub fn compute_disbursement(input_json: String) -> NapiResult<String> {
    let input: disbursement::OperationTerms =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = disbursement::compute_disbursement(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// JSON array of `OperationTerms`, priced as one batch.
#[napi]
pub fn resolve_batch_commission(input_json: String) -> NapiResult<String> {
    let invoices: Vec<disbursement::OperationTerms> =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = batch::resolve_batch_commission(&invoices).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn search_rate_for_target(input_json: String) -> NapiResult<String> {
    let input: rate_search::RateSearchInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rate_search::search_rate_for_target(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn quote_operation(input_json: String) -> NapiResult<String> {
    let input: quote::QuoteInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = quote::quote_operation(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Settlement
// ---------------------------------------------------------------------------

#[napi]
pub fn settle_operation(input_json: String) -> NapiResult<String> {
    let input: liquidation::SettlementInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = liquidation::settle_operation(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
