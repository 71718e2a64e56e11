//! Client-side payment wrapper
//!
//! Wraps an HTTP request so that a 402 challenge is satisfied transparently:
//! issue the request, and if the server demands payment, build a signed
//! payload for exactly the challenged amount and retry once with it attached.
//! Responses that are not 402 pass through untouched with zero extra network
//! calls, and a still-failing retry is returned to the caller as-is; there is
//! never more than one retry per call.
//!
//! ```no_run
//! use x402_paygate::client::PaymentFetch;
//! use x402_paygate::signer::LocalSigner;
//!
//! # async fn example() -> x402_paygate::Result<()> {
//! let signer = LocalSigner::from_private_key("0xYOUR_KEY")?;
//! let client = PaymentFetch::new(signer);
//!
//! let (response, receipt) = client
//!     .fetch(reqwest::Method::GET, "https://api.example.com/api/protected")
//!     .await?;
//! if let Some(receipt) = receipt {
//!     println!("paid via {}", receipt.transaction);
//! }
//! # let _ = response;
//! # Ok(())
//! # }
//! ```

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, Response};

use crate::signer::{build_payment_payload, PaymentSigner};
use crate::types::{headers, PaymentRequirement, SettlementReceipt};
use crate::{PaygateError, Result};

/// HTTP client that satisfies 402 payment challenges via a signing capability
#[derive(Debug, Clone)]
pub struct PaymentFetch<S> {
    http: Client,
    signer: S,
}

impl<S: PaymentSigner> PaymentFetch<S> {
    /// Wrap a default `reqwest` client around a signer
    pub fn new(signer: S) -> Self {
        Self {
            http: Client::new(),
            signer,
        }
    }

    /// Wrap a preconfigured `reqwest` client
    pub fn with_http_client(signer: S, http: Client) -> Self {
        Self { http, signer }
    }

    /// Issue a request, paying for it if challenged.
    ///
    /// Returns the final response together with the decoded settlement
    /// receipt when the server attached one.
    pub async fn fetch(
        &self,
        method: Method,
        url: &str,
    ) -> Result<(Response, Option<SettlementReceipt>)> {
        self.fetch_with_body(method, url, HeaderMap::new(), None)
            .await
    }

    /// Issue a request with custom headers and an optional body, paying for
    /// it if challenged. The retried request preserves the method, headers,
    /// and body of the original.
    pub async fn fetch_with_body(
        &self,
        method: Method,
        url: &str,
        extra_headers: HeaderMap,
        body: Option<Vec<u8>>,
    ) -> Result<(Response, Option<SettlementReceipt>)> {
        // Original request, unmodified
        let mut request = self.http.request(method.clone(), url).headers(extra_headers.clone());
        if let Some(ref bytes) = body {
            request = request.body(bytes.clone());
        }
        let response = request.send().await?;

        // Common path: nothing to pay
        if response.status() != reqwest::StatusCode::PAYMENT_REQUIRED {
            return Ok((response, None));
        }

        let requirement: PaymentRequirement = response.json().await.map_err(|e| {
            PaygateError::invalid_payload(format!("malformed 402 challenge: {e}"))
        })?;
        tracing::debug!(
            resource = %requirement.resource,
            price = %requirement.price,
            "payment challenged, building payload"
        );

        // Fails with SignerUnavailable before any retry when no signer is
        // attached, and with a hard error if the payload would not authorize
        // exactly what was challenged.
        let payload = build_payment_payload(&self.signer, &requirement).await?;
        let header = HeaderValue::from_str(&payload.to_base64()?)
            .map_err(|e| PaygateError::invalid_payload(format!("unencodable payment: {e}")))?;

        // Single retry with the payment attached
        let mut retry = self
            .http
            .request(method, url)
            .headers(extra_headers)
            .header(headers::PAYMENT, header);
        if let Some(bytes) = body {
            retry = retry.body(bytes);
        }
        let response = retry.send().await?;

        let receipt = response
            .headers()
            .get(headers::PAYMENT_RESPONSE)
            .and_then(|v| v.to_str().ok())
            .and_then(|encoded| decode_payment_response(encoded).ok());

        Ok((response, receipt))
    }
}

/// Decode the `X-PAYMENT-RESPONSE` header into a settlement receipt.
///
/// Pure helper, independent of any transport.
pub fn decode_payment_response(encoded: &str) -> Result<SettlementReceipt> {
    SettlementReceipt::from_base64(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SettleResponse;

    #[test]
    fn test_decode_payment_response() {
        let settlement = SettleResponse {
            success: true,
            error_reason: None,
            transaction: "0xabc".to_string(),
            network: "base-sepolia".to_string(),
            payer: None,
        };
        let requirement = PaymentRequirement {
            price: "$0.001".to_string(),
            network: "base-sepolia".to_string(),
            pay_to: "0x6a475ed41c9a172332dba2308e5d6d059f650e12".to_string(),
            resource: "/api/protected".to_string(),
            description: "Access to protected content".to_string(),
            max_timeout_seconds: None,
        };
        let receipt = SettlementReceipt::from_settlement(&settlement, &requirement);
        let decoded = decode_payment_response(&receipt.to_base64().unwrap()).unwrap();
        assert_eq!(decoded, receipt);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_payment_response("%%%").is_err());
        assert!(decode_payment_response("aGVsbG8=").is_err());
    }
}
