//! Error types for the paywall core
//!
//! Every per-request failure is eventually mapped to an HTTP response by the
//! middleware or surfaced to the caller by the client wrapper; nothing in this
//! taxonomy is allowed to leak past those boundaries unmapped.

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, PaygateError>;

/// Errors produced by the paywall protocol core
#[derive(Error, Debug)]
pub enum PaygateError {
    /// Startup-time misconfiguration. A route with this error must not be served.
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed payment header or payload. Treated the same as "no payment attempted".
    #[error("invalid payment payload: {0}")]
    InvalidPayload(String),

    /// Payment did not satisfy the challenged requirement. Always a 402, never a 5xx.
    #[error("payment verification failed: {0}")]
    VerificationFailed(String),

    /// Transport failure reaching the facilitator. Fails closed.
    #[error("facilitator unavailable: {0}")]
    FacilitatorUnavailable(String),

    /// No signing capability attached on the client side.
    #[error("signer unavailable: {0}")]
    SignerUnavailable(String),

    /// Signature construction or recovery failed.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 decoding error
    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl PaygateError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid payload error
    pub fn invalid_payload(msg: impl Into<String>) -> Self {
        Self::InvalidPayload(msg.into())
    }

    /// Create a verification failure
    pub fn verification_failed(msg: impl Into<String>) -> Self {
        Self::VerificationFailed(msg.into())
    }

    /// Create a facilitator transport error
    pub fn facilitator_unavailable(msg: impl Into<String>) -> Self {
        Self::FacilitatorUnavailable(msg.into())
    }

    /// Create a signer unavailable error
    pub fn signer_unavailable(msg: impl Into<String>) -> Self {
        Self::SignerUnavailable(msg.into())
    }

    /// Create an invalid signature error
    pub fn invalid_signature(msg: impl Into<String>) -> Self {
        Self::InvalidSignature(msg.into())
    }

    /// Whether this error means the client has no usable signing capability
    pub fn is_signer_unavailable(&self) -> bool {
        matches!(self, Self::SignerUnavailable(_))
    }
}
