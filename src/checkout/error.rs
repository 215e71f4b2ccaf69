//! Checkout errors.
//!
//! Display strings are user-facing: they are shown verbatim inside the
//! result message, so provider variants format the provider's own text.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use super::types::ProviderError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    /// The HTTP request could not be sent or its body not read.
    #[error("request failed: {0}")]
    Transport(String),

    /// The response body was not JSON.
    #[error("response was not valid JSON: {0}")]
    Decode(String),

    /// Order creation returned a provider error envelope.
    #[error("{}", .0.summary())]
    OrderRejected(ProviderError),

    /// Order creation returned neither an id nor an error; carries the body as JSON text.
    #[error("{0}")]
    MissingOrderId(String),

    /// Capture returned a provider error envelope other than a decline.
    #[error("{}", .0.reason())]
    CaptureRejected(ProviderError),

    /// Capture returned no usable transaction; carries the body as JSON text.
    #[error("{0}")]
    MissingTransaction(String),

    #[error("a checkout attempt is already in progress")]
    AttemptInFlight,

    #[error("this purchase has already been completed")]
    AlreadyCompleted,

    #[error("invalid order API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl CheckoutError {
    /// Stable code for logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "E_TRANSPORT",
            Self::Decode(_) => "E_DECODE",
            Self::OrderRejected(_) => "E_ORDER_REJECTED",
            Self::MissingOrderId(_) => "E_MISSING_ORDER_ID",
            Self::CaptureRejected(_) => "E_CAPTURE_REJECTED",
            Self::MissingTransaction(_) => "E_MISSING_TRANSACTION",
            Self::AttemptInFlight => "E_ATTEMPT_IN_FLIGHT",
            Self::AlreadyCompleted => "E_ALREADY_COMPLETED",
            Self::InvalidBaseUrl(_) => "E_INVALID_BASE_URL",
        }
    }
}
