//! Signing capability and payment payload construction
//!
//! The client wrapper is generic over [`PaymentSigner`] so that any wallet
//! integration can supply signatures; [`LocalSigner`] is the in-process
//! implementation backed by a raw secp256k1 key.

use async_trait::async_trait;
use chrono::Utc;

use crate::crypto;
use crate::types::{
    ExactEvmPayload, ExactEvmPayloadAuthorization, NetworkConfig, PaymentPayload,
    PaymentRequirement,
};
use crate::{PaygateError, Result};

/// Clock skew allowance for the start of an authorization's validity window
const VALID_AFTER_SKEW_SECS: i64 = 60;

/// Default validity window when the challenge carries no timeout
const DEFAULT_TIMEOUT_SECS: u32 = 300;

/// A capability that can authorize payments from a wallet address.
///
/// Implementations that are disconnected or otherwise unable to sign return
/// [`PaygateError::SignerUnavailable`] from either method; the client wrapper
/// surfaces that before issuing any retried request.
#[async_trait]
pub trait PaymentSigner: Send + Sync {
    /// Address of the paying account
    fn address(&self) -> Result<String>;

    /// Produce an EIP-712 signature over the given transfer authorization
    async fn sign_authorization(
        &self,
        network: &NetworkConfig,
        authorization: &ExactEvmPayloadAuthorization,
    ) -> Result<String>;
}

/// In-process signer holding a hex-encoded secp256k1 private key
#[derive(Clone)]
pub struct LocalSigner {
    private_key: String,
    address: String,
}

impl std::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl LocalSigner {
    /// Create a signer from a hex-encoded private key
    pub fn from_private_key(private_key: impl Into<String>) -> Result<Self> {
        let private_key = private_key.into();
        let address = crypto::address_from_private_key(&private_key)?;
        Ok(Self {
            private_key,
            address: format!("{address:#x}"),
        })
    }
}

#[async_trait]
impl PaymentSigner for LocalSigner {
    fn address(&self) -> Result<String> {
        Ok(self.address.clone())
    }

    async fn sign_authorization(
        &self,
        network: &NetworkConfig,
        authorization: &ExactEvmPayloadAuthorization,
    ) -> Result<String> {
        let digest = crypto::authorization_digest(authorization, network)?;
        crypto::sign_digest(digest, &self.private_key)
    }
}

/// Construct a signed payment payload satisfying exactly the given
/// requirement.
///
/// The authorized amount, recipient, and network are taken verbatim from the
/// challenge; a fresh random nonce is generated per call so a payload is
/// never reused across attempts. Fails with `SignerUnavailable` before doing
/// any work if the signer has no account.
pub async fn build_payment_payload<S: PaymentSigner + ?Sized>(
    signer: &S,
    requirement: &PaymentRequirement,
) -> Result<PaymentPayload> {
    let from = signer.address()?;

    let network = NetworkConfig::from_name(&requirement.network).ok_or_else(|| {
        PaygateError::invalid_payload(format!(
            "challenge names unsupported network {}",
            requirement.network
        ))
    })?;
    let value = requirement.atomic_amount()?;

    let now = Utc::now().timestamp();
    let timeout = requirement
        .max_timeout_seconds
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    let authorization = ExactEvmPayloadAuthorization::new(
        from,
        requirement.pay_to.clone(),
        value,
        (now - VALID_AFTER_SKEW_SECS).to_string(),
        (now + i64::from(timeout)).to_string(),
        format!("{:#x}", crypto::generate_nonce()),
    );

    let signature = signer.sign_authorization(&network, &authorization).await?;
    let payload = PaymentPayload::new(
        requirement.network.clone(),
        requirement.resource.clone(),
        ExactEvmPayload {
            signature,
            authorization,
        },
    );

    // A payload that does not bind to the challenge it was built from is a
    // contract violation; fail here rather than let a server reject it.
    payload
        .check_binding(requirement)
        .map_err(PaygateError::verification_failed)?;

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::verify_transfer_authorization;

    // Well-known development key (hardhat account #0)
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn requirement() -> PaymentRequirement {
        PaymentRequirement {
            price: "$0.001".to_string(),
            network: "base-sepolia".to_string(),
            pay_to: "0x6a475ed41c9a172332dba2308e5d6d059f650e12".to_string(),
            resource: "/api/protected".to_string(),
            description: "Access to protected content".to_string(),
            max_timeout_seconds: Some(120),
        }
    }

    #[test]
    fn test_local_signer_address() {
        let signer = LocalSigner::from_private_key(TEST_KEY).unwrap();
        assert_eq!(
            signer.address().unwrap(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_local_signer_rejects_garbage_key() {
        assert!(LocalSigner::from_private_key("0xnothex").is_err());
        assert!(LocalSigner::from_private_key("").is_err());
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let signer = LocalSigner::from_private_key(TEST_KEY).unwrap();
        let debug = format!("{signer:?}");
        assert!(!debug.contains("ac0974be"));
    }

    #[tokio::test]
    async fn test_payload_binds_to_requirement() {
        let signer = LocalSigner::from_private_key(TEST_KEY).unwrap();
        let req = requirement();
        let payload = build_payment_payload(&signer, &req).await.unwrap();

        assert_eq!(payload.network, "base-sepolia");
        assert_eq!(payload.resource, "/api/protected");
        assert_eq!(payload.payload.authorization.value, "1000");
        assert_eq!(payload.payload.authorization.to, req.pay_to);
        assert!(payload.check_binding(&req).is_ok());
    }

    #[tokio::test]
    async fn test_payload_signature_verifies() {
        let signer = LocalSigner::from_private_key(TEST_KEY).unwrap();
        let payload = build_payment_payload(&signer, &requirement()).await.unwrap();
        let network = NetworkConfig::base_sepolia();
        assert!(verify_transfer_authorization(&payload.payload, &network).unwrap());
    }

    #[tokio::test]
    async fn test_fresh_nonce_per_attempt() {
        let signer = LocalSigner::from_private_key(TEST_KEY).unwrap();
        let req = requirement();
        let a = build_payment_payload(&signer, &req).await.unwrap();
        let b = build_payment_payload(&signer, &req).await.unwrap();
        assert_ne!(
            a.payload.authorization.nonce,
            b.payload.authorization.nonce
        );
    }

    #[tokio::test]
    async fn test_validity_window_uses_challenge_timeout() {
        let signer = LocalSigner::from_private_key(TEST_KEY).unwrap();
        let payload = build_payment_payload(&signer, &requirement()).await.unwrap();
        let auth = &payload.payload.authorization;
        let valid_after: i64 = auth.valid_after.parse().unwrap();
        let valid_before: i64 = auth.valid_before.parse().unwrap();
        assert_eq!(valid_before - valid_after, 120 + VALID_AFTER_SKEW_SECS);
    }

    #[tokio::test]
    async fn test_unsupported_network_in_challenge() {
        let signer = LocalSigner::from_private_key(TEST_KEY).unwrap();
        let mut req = requirement();
        req.network = "dogecoin".to_string();
        let result = build_payment_payload(&signer, &req).await;
        assert!(matches!(result, Err(PaygateError::InvalidPayload(_))));
    }
}
