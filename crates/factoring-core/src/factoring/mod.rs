//! Factoring origination: disbursement, batch commission policy, advance
//! rate search, operation dates and the quote flow that chains them.

pub mod batch;
pub mod dates;
pub mod disbursement;
pub mod pricing;
pub mod quote;
pub mod rate_search;
