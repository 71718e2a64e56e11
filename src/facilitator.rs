//! Facilitator client for payment verification and settlement
//!
//! The facilitator is an external trust boundary: it checks payment
//! authorizations (including nonce/replay bookkeeping) and executes settled
//! transfers. This client maps its two logical operations onto HTTP POSTs to
//! `/verify` and `/settle`. Any transport failure is reported as
//! [`PaygateError::FacilitatorUnavailable`] so callers fail closed; results
//! are never cached across requests.
//!
//! ```no_run
//! use x402_paygate::facilitator::FacilitatorClient;
//! use x402_paygate::types::FacilitatorConfig;
//!
//! # async fn example() -> x402_paygate::Result<()> {
//! let client = FacilitatorClient::new(FacilitatorConfig::new("https://x402.org/facilitator"))?;
//! # let payload = todo!();
//! # let requirement = todo!();
//! let outcome = client.verify(&payload, &requirement).await?;
//! if outcome.is_valid {
//!     let settlement = client.settle(&payload, &requirement).await?;
//!     println!("settled: {}", settlement.transaction);
//! }
//! # Ok(())
//! # }
//! ```

use reqwest::Client;
use serde_json::json;

use crate::types::{
    FacilitatorConfig, PaymentPayload, PaymentRequirement, SettleResponse, VerifyResponse,
    X402_VERSION,
};
use crate::{PaygateError, Result};

/// Client for an external facilitator service
#[derive(Debug, Clone)]
pub struct FacilitatorClient {
    url: String,
    client: Client,
}

impl FacilitatorClient {
    /// Create a new facilitator client, validating the configuration eagerly
    pub fn new(config: FacilitatorConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PaygateError::config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            url: config.url,
            client,
        })
    }

    /// Verify a payment authorization without executing it
    pub async fn verify(
        &self,
        payload: &PaymentPayload,
        requirement: &PaymentRequirement,
    ) -> Result<VerifyResponse> {
        let body = json!({
            "x402Version": X402_VERSION,
            "paymentPayload": payload,
            "paymentRequirement": requirement,
        });

        tracing::debug!(url = %self.url, resource = %requirement.resource, "facilitator verify");

        let response = self
            .client
            .post(format!("{}/verify", self.url))
            .json(&body)
            .send()
            .await
            .map_err(|e| PaygateError::facilitator_unavailable(format!("verify: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PaygateError::facilitator_unavailable(format!(
                "verify returned status {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| PaygateError::facilitator_unavailable(format!("verify response: {e}")))
    }

    /// Settle a verified payment by executing the transfer
    pub async fn settle(
        &self,
        payload: &PaymentPayload,
        requirement: &PaymentRequirement,
    ) -> Result<SettleResponse> {
        let body = json!({
            "x402Version": X402_VERSION,
            "paymentPayload": payload,
            "paymentRequirement": requirement,
        });

        tracing::debug!(url = %self.url, resource = %requirement.resource, "facilitator settle");

        let response = self
            .client
            .post(format!("{}/settle", self.url))
            .json(&body)
            .send()
            .await
            .map_err(|e| PaygateError::facilitator_unavailable(format!("settle: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PaygateError::facilitator_unavailable(format!(
                "settle returned status {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| PaygateError::facilitator_unavailable(format!("settle response: {e}")))
    }

    /// Base URL of this facilitator
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExactEvmPayload, ExactEvmPayloadAuthorization};
    use serde_json::json;

    fn test_payload() -> PaymentPayload {
        PaymentPayload::new(
            "base-sepolia",
            "/api/protected",
            ExactEvmPayload {
                signature: "0xdead".to_string(),
                authorization: ExactEvmPayloadAuthorization::new(
                    "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
                    "0x6a475ed41c9a172332dba2308e5d6d059f650e12",
                    "1000",
                    "1745323800",
                    "1745323985",
                    "0xf3746613c2d920b5fdabc0856f2aeb2d4f88ee6037b8cc5d04a71a4462f13480",
                ),
            },
        )
    }

    fn test_requirement() -> PaymentRequirement {
        PaymentRequirement {
            price: "$0.001".to_string(),
            network: "base-sepolia".to_string(),
            pay_to: "0x6a475ed41c9a172332dba2308e5d6d059f650e12".to_string(),
            resource: "/api/protected".to_string(),
            description: "Access to protected content".to_string(),
            max_timeout_seconds: None,
        }
    }

    #[tokio::test]
    async fn test_verify_success() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/verify")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "isValid": true,
                    "payer": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = FacilitatorClient::new(FacilitatorConfig::new(server.url())).unwrap();
        let outcome = client
            .verify(&test_payload(), &test_requirement())
            .await
            .unwrap();
        assert!(outcome.is_valid);
        assert_eq!(
            outcome.payer.as_deref(),
            Some("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
    }

    #[tokio::test]
    async fn test_verify_invalid() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/verify")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "isValid": false,
                    "invalidReason": "nonce already used"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = FacilitatorClient::new(FacilitatorConfig::new(server.url())).unwrap();
        let outcome = client
            .verify(&test_payload(), &test_requirement())
            .await
            .unwrap();
        assert!(!outcome.is_valid);
        assert_eq!(outcome.invalid_reason.as_deref(), Some("nonce already used"));
    }

    #[tokio::test]
    async fn test_verify_server_error_is_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/verify")
            .with_status(500)
            .create_async()
            .await;

        let client = FacilitatorClient::new(FacilitatorConfig::new(server.url())).unwrap();
        let result = client.verify(&test_payload(), &test_requirement()).await;
        assert!(matches!(
            result,
            Err(PaygateError::FacilitatorUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_transport_error_is_unavailable() {
        // Nothing is listening here
        let client =
            FacilitatorClient::new(FacilitatorConfig::new("http://127.0.0.1:1")).unwrap();
        let result = client.verify(&test_payload(), &test_requirement()).await;
        assert!(matches!(
            result,
            Err(PaygateError::FacilitatorUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_settle_success() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/settle")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "success": true,
                    "transaction": "0x1234567890abcdef",
                    "network": "base-sepolia",
                    "payer": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = FacilitatorClient::new(FacilitatorConfig::new(server.url())).unwrap();
        let settlement = client
            .settle(&test_payload(), &test_requirement())
            .await
            .unwrap();
        assert!(settlement.success);
        assert_eq!(settlement.transaction, "0x1234567890abcdef");
        assert_eq!(settlement.network, "base-sepolia");
    }

    #[tokio::test]
    async fn test_settle_failure_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/settle")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "success": false,
                    "errorReason": "transaction reverted",
                    "transaction": "",
                    "network": "base-sepolia"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = FacilitatorClient::new(FacilitatorConfig::new(server.url())).unwrap();
        let settlement = client
            .settle(&test_payload(), &test_requirement())
            .await
            .unwrap();
        assert!(!settlement.success);
        assert_eq!(
            settlement.error_reason.as_deref(),
            Some("transaction reverted")
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(FacilitatorClient::new(FacilitatorConfig::new("not a url")).is_err());
    }
}
