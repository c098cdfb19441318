//! Rate source error types.

use fxview_common::Currency;
use thiserror::Error;

/// Errors a quote provider can report. None of them reach the display layer;
/// `RateSource` turns every one into a fallback table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FxError {
    /// Network unreachable, connection reset, timeout.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider answered with a non-2xx status.
    #[error("Provider returned HTTP {0}")]
    HttpStatus(u16),

    /// Body did not match the expected shape.
    #[error("Malformed provider response: {0}")]
    Malformed(String),

    /// Body parsed but the success flag was false or absent.
    #[error("Provider rejected request: {0}")]
    Rejected(String),

    /// Body had no table for the requested base.
    #[error("Provider response has no table for {0}")]
    MissingBase(Currency),
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
