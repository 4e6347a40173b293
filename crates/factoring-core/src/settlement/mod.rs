//! Post-payment settlement ("liquidación") of a factoring operation.

pub mod liquidation;
pub mod projection;
