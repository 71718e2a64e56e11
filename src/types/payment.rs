//! Payment challenge and payload types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{PaygateError, Result};

/// x402 protocol version
pub const X402_VERSION: u32 = 1;

/// USDC uses 6 decimal places
const USDC_DECIMALS: u32 = 6;

/// Describes what must be paid to access a resource.
///
/// One instance is issued per (route, request) pair, recomputed from the
/// static route configuration; the serialized form is byte-stable for a
/// given route because field order is fixed by the struct declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequirement {
    /// Dollar-denominated price string, e.g. `"$0.001"`
    pub price: String,
    /// Network identifier, e.g. `"base-sepolia"`
    pub network: String,
    /// Recipient wallet address
    #[serde(rename = "payTo")]
    pub pay_to: String,
    /// Path of the protected resource
    pub resource: String,
    /// Human-readable description of the resource
    pub description: String,
    /// Maximum time allowed for payment completion in seconds
    #[serde(rename = "maxTimeoutSeconds", skip_serializing_if = "Option::is_none")]
    pub max_timeout_seconds: Option<u32>,
}

impl PaymentRequirement {
    /// Parse the dollar price string into a decimal amount
    pub fn price_as_decimal(&self) -> Result<Decimal> {
        parse_price(&self.price)
    }

    /// Required amount in atomic USDC units, as a decimal string
    pub fn atomic_amount(&self) -> Result<String> {
        let dollars = self.price_as_decimal()?;
        let atomic = (dollars * Decimal::from(10u64.pow(USDC_DECIMALS))).normalize();
        if atomic != atomic.trunc() {
            return Err(PaygateError::config(format!(
                "price {} is below one atomic USDC unit",
                self.price
            )));
        }
        Ok(atomic.to_string())
    }
}

/// Parse a price string of the form `"$0.001"` into a decimal dollar amount
pub fn parse_price(price: &str) -> Result<Decimal> {
    let stripped = price.trim().trim_start_matches('$');
    let amount: Decimal = stripped
        .parse()
        .map_err(|_| PaygateError::config(format!("invalid price: {price}")))?;
    if amount <= Decimal::ZERO {
        return Err(PaygateError::config(format!(
            "price must be positive: {price}"
        )));
    }
    Ok(amount)
}

/// JSON body of a 402 response: the requirement, plus a failure reason when
/// a submitted payment was rejected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentChallenge {
    /// Reason the submitted payment was rejected; absent on a plain challenge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The requirement the client must satisfy
    #[serde(flatten)]
    pub requirement: PaymentRequirement,
}

impl PaymentChallenge {
    /// A plain challenge, issued when no payment was attempted
    pub fn new(requirement: PaymentRequirement) -> Self {
        Self {
            error: None,
            requirement,
        }
    }

    /// A rejection, issued when a submitted payment failed verification
    pub fn rejected(requirement: PaymentRequirement, reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            requirement,
        }
    }
}

/// The signed artifact a client attaches to a retried request, transported
/// base64-encoded in the `X-PAYMENT` header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentPayload {
    /// Protocol version
    #[serde(rename = "x402Version")]
    pub x402_version: u32,
    /// Payment scheme identifier
    pub scheme: String,
    /// Network identifier
    pub network: String,
    /// Path of the resource this payment is for
    pub resource: String,
    /// Signed authorization data
    pub payload: ExactEvmPayload,
}

impl PaymentPayload {
    /// Create a new payment payload for the exact scheme
    pub fn new(
        network: impl Into<String>,
        resource: impl Into<String>,
        payload: ExactEvmPayload,
    ) -> Self {
        Self {
            x402_version: X402_VERSION,
            scheme: super::constants::schemes::EXACT.to_string(),
            network: network.into(),
            resource: resource.into(),
            payload,
        }
    }

    /// Decode a payload from its base64 header form
    pub fn from_base64(encoded: &str) -> Result<Self> {
        use base64::{engine::general_purpose, Engine as _};
        let decoded = general_purpose::STANDARD.decode(encoded)?;
        let payload = serde_json::from_slice(&decoded)?;
        Ok(payload)
    }

    /// Encode the payload for the `X-PAYMENT` header
    pub fn to_base64(&self) -> Result<String> {
        use base64::{engine::general_purpose, Engine as _};
        let json = serde_json::to_string(self)?;
        Ok(general_purpose::STANDARD.encode(json))
    }

    /// Check that this payload authorizes exactly what the requirement asks
    /// for: same resource, network, recipient, and atomic amount.
    ///
    /// Returns the mismatch reason on failure. Signature validity and replay
    /// protection remain the facilitator's responsibility.
    pub fn check_binding(&self, requirement: &PaymentRequirement) -> std::result::Result<(), String> {
        if self.network != requirement.network {
            return Err("network mismatch".to_string());
        }
        if self.resource != requirement.resource {
            return Err("resource mismatch".to_string());
        }
        let auth = &self.payload.authorization;
        if !auth.to.eq_ignore_ascii_case(&requirement.pay_to) {
            return Err("recipient mismatch".to_string());
        }
        let required = requirement
            .atomic_amount()
            .map_err(|_| "unparseable price in requirement".to_string())?;
        if auth.value != required {
            return Err("amount mismatch".to_string());
        }
        Ok(())
    }
}

/// EIP-3009 payment data for the exact scheme
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExactEvmPayload {
    /// EIP-712 signature over the authorization
    pub signature: String,
    /// Authorization parameters
    pub authorization: ExactEvmPayloadAuthorization,
}

/// EIP-3009 `TransferWithAuthorization` parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExactEvmPayloadAuthorization {
    /// Payer's wallet address
    pub from: String,
    /// Recipient's wallet address
    pub to: String,
    /// Amount in atomic token units
    pub value: String,
    /// Unix timestamp when the authorization becomes valid
    #[serde(rename = "validAfter")]
    pub valid_after: String,
    /// Unix timestamp when the authorization expires
    #[serde(rename = "validBefore")]
    pub valid_before: String,
    /// 32-byte random nonce, fresh per payment attempt
    pub nonce: String,
}

impl ExactEvmPayloadAuthorization {
    /// Create a new authorization
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        value: impl Into<String>,
        valid_after: impl Into<String>,
        valid_before: impl Into<String>,
        nonce: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            value: value.into(),
            valid_after: valid_after.into(),
            valid_before: valid_before.into(),
            nonce: nonce.into(),
        }
    }
}
