//! Error types shared by the FxView crates.

use thiserror::Error;

/// Errors raised while constructing shared domain values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// Currency code is not three ASCII letters.
    #[error("Invalid currency code: {0:?}")]
    InvalidCurrencyCode(String),
}

/// Result type for common operations.
pub type CommonResult<T> = Result<T, CommonError>;
