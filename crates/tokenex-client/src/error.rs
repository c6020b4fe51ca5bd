//! Error types for the client library.

use std::fmt;

use thiserror::Error;

/// Diagnostic detail the service attaches to a rejected request.
///
/// TokenEx replies carry an `Error` message and a `ReferenceNumber` alongside
/// `Success: false`. Both are optional and purely informational; the failure
/// itself is decided by the success gate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceFault {
    /// Error text reported by the service, if any.
    pub error: Option<String>,
    /// Service-side reference for support lookups, if any.
    pub reference_number: Option<String>,
}

impl fmt::Display for ServiceFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.error, &self.reference_number) {
            (Some(error), Some(reference)) => write!(f, ": {error} (reference {reference})"),
            (Some(error), None) => write!(f, ": {error}"),
            (None, Some(reference)) => write!(f, " (reference {reference})"),
            (None, None) => Ok(()),
        }
    }
}

/// Errors that can occur when talking to the tokenization service.
///
/// Variants fall into two tiers. Transport and protocol errors mean the
/// exchange itself broke down; service failures mean the service answered and
/// refused the request. Use [`ClientError::is_service_failure`] and
/// [`ClientError::is_transport_error`] to tell them apart.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// Network or HTTP request failure.
    ///
    /// DNS resolution, TLS handshake or certificate verification, refused
    /// connections and timeouts all land here.
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON serialization or deserialization error.
    ///
    /// Raised when the response body is not valid JSON.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// The service replied with JSON that does not match the envelope.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client configuration issue.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The service refused to tokenize a card number.
    #[error("Cannot tokenize: invalid card number{0}")]
    InvalidCardNumber(ServiceFault),

    /// The service refused to tokenize the supplied data.
    #[error("Cannot tokenize data{0}")]
    CannotTokenizeData(ServiceFault),

    /// The service refused to tokenize the supplied encrypted value.
    #[error("Cannot tokenize encrypted value{0}")]
    CannotTokenizeEncryptedValue(ServiceFault),

    /// The service rejected the token for detokenize, validate or delete.
    #[error("Invalid token{0}")]
    InvalidToken(ServiceFault),
}

impl ClientError {
    /// Check if the service answered and refused the request.
    pub const fn is_service_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidCardNumber(_)
                | Self::CannotTokenizeData(_)
                | Self::CannotTokenizeEncryptedValue(_)
                | Self::InvalidToken(_)
        )
    }

    /// Check if the exchange failed before a service verdict was available.
    pub const fn is_transport_error(&self) -> bool {
        !self.is_service_failure()
    }

    /// Get the service-supplied detail for a service failure.
    pub const fn service_fault(&self) -> Option<&ServiceFault> {
        match self {
            Self::InvalidCardNumber(fault)
            | Self::CannotTokenizeData(fault)
            | Self::CannotTokenizeEncryptedValue(fault)
            | Self::InvalidToken(fault) => Some(fault),
            _ => None,
        }
    }
}
