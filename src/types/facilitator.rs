//! Facilitator configuration and response types

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::payment::PaymentRequirement;
use crate::{PaygateError, Result};

/// Configuration for the external facilitator service
#[derive(Debug, Clone)]
pub struct FacilitatorConfig {
    /// Base URL of the facilitator service
    pub url: String,
    /// Request timeout
    pub timeout: Option<Duration>,
}

impl FacilitatorConfig {
    /// Create a new facilitator config
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: None,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate the configuration eagerly, at startup
    pub fn validate(&self) -> Result<()> {
        let parsed = Url::parse(&self.url)
            .map_err(|e| PaygateError::config(format!("invalid facilitator URL: {e}")))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(PaygateError::config(
                "facilitator URL must use http or https",
            ));
        }
        Ok(())
    }
}

impl Default for FacilitatorConfig {
    fn default() -> Self {
        Self::new("https://x402.org/facilitator")
    }
}

/// Result of a facilitator verification call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// Whether the payment is valid
    #[serde(rename = "isValid")]
    pub is_valid: bool,
    /// Reason for invalidity, when invalid
    #[serde(rename = "invalidReason", skip_serializing_if = "Option::is_none")]
    pub invalid_reason: Option<String>,
    /// Payer's address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,
}

/// Result of a facilitator settlement call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettleResponse {
    /// Whether the settlement was executed
    pub success: bool,
    /// Error reason if settlement failed
    #[serde(rename = "errorReason", skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<String>,
    /// Transaction hash or identifier
    pub transaction: String,
    /// Network the transaction was executed on
    pub network: String,
    /// Payer address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,
}

/// Record of a finalized payment, surfaced to the client in the
/// `X-PAYMENT-RESPONSE` header. Read-only once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementReceipt {
    /// Transaction hash or identifier
    pub transaction: String,
    /// Network the transaction was executed on
    pub network: String,
    /// Payer address, when the facilitator reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,
    /// Recipient address from the satisfied requirement
    #[serde(rename = "payTo")]
    pub pay_to: String,
    /// Final status, `"settled"` on success
    pub status: String,
}

impl SettlementReceipt {
    /// Build a receipt from a successful settlement and the requirement it satisfied
    pub fn from_settlement(settlement: &SettleResponse, requirement: &PaymentRequirement) -> Self {
        Self {
            transaction: settlement.transaction.clone(),
            network: settlement.network.clone(),
            payer: settlement.payer.clone(),
            pay_to: requirement.pay_to.clone(),
            status: "settled".to_string(),
        }
    }

    /// Encode the receipt for the `X-PAYMENT-RESPONSE` header
    pub fn to_base64(&self) -> Result<String> {
        use base64::{engine::general_purpose, Engine as _};
        let json = serde_json::to_string(self)?;
        Ok(general_purpose::STANDARD.encode(json))
    }

    /// Decode a receipt from its base64 header form
    pub fn from_base64(encoded: &str) -> Result<Self> {
        use base64::{engine::general_purpose, Engine as _};
        let decoded = general_purpose::STANDARD.decode(encoded)?;
        let receipt = serde_json::from_slice(&decoded)?;
        Ok(receipt)
    }
}
