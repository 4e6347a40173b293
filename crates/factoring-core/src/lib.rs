pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "factoring")]
pub mod factoring;

#[cfg(feature = "settlement")]
pub mod settlement;

pub use error::FactoringError;
pub use types::*;

/// Standard result type for all factoring operations
pub type FactoringResult<T> = Result<T, FactoringError>;
