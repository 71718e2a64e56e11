//! Paywall middleware implementation
//!
//! The per-request state machine: a request to a protected path either has no
//! usable payment header (challenged with a 402), or carries a payload that is
//! bound to the route's requirement, verified through the facilitator, and
//! settled after the handler runs. The middleware holds no mutable state; it
//! is a pure gatekeeper and all settlement bookkeeping lives in the
//! facilitator.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use http::{HeaderValue, StatusCode};

use super::config::RouteTable;
use crate::facilitator::FacilitatorClient;
use crate::types::{headers, PaymentChallenge, PaymentPayload, SettlementReceipt};
use crate::Result;

/// Paywall middleware state shared across requests
#[derive(Debug, Clone)]
pub struct Paywall {
    table: Arc<RouteTable>,
    facilitator: FacilitatorClient,
}

impl Paywall {
    /// Build the paywall from a route table, validating it eagerly.
    ///
    /// A misconfigured table is a startup error; no route is served until it
    /// is fixed.
    pub fn new(table: RouteTable) -> Result<Self> {
        table.validate()?;
        let facilitator = FacilitatorClient::new(table.facilitator().clone())?;
        Ok(Self {
            table: Arc::new(table),
            facilitator,
        })
    }

    /// The route table backing this paywall
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Run the paywall state machine for one request.
    ///
    /// Every failure path produces an HTTP response (402); nothing here can
    /// surface as a 5xx to the client.
    pub async fn process(&self, request: Request, next: Next) -> Response {
        let path = request.uri().path().to_string();

        // Unmatched paths bypass the paywall entirely
        let Some(policy) = self.table.match_route(&path) else {
            return next.run(request).await;
        };
        let requirement = policy.requirement(&path);

        let app_name = self
            .table
            .app()
            .map(|app| app.app_name.as_str())
            .unwrap_or_default();

        let payment_header = request
            .headers()
            .get(headers::PAYMENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        // No header, or a header that fails structural decoding, both mean
        // "no payment attempted": challenge and terminate. A normal protocol
        // event, not an error.
        let Some(encoded) = payment_header else {
            tracing::debug!(app = app_name, path = %path, "challenging unpaid request");
            return challenge_response(PaymentChallenge::new(requirement));
        };
        let payload = match PaymentPayload::from_base64(&encoded) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!(app = app_name, path = %path, error = %e, "malformed payment header");
                return challenge_response(PaymentChallenge::new(requirement));
            }
        };

        // The payload must authorize exactly what this route challenged
        if let Err(reason) = payload.check_binding(&requirement) {
            tracing::debug!(app = app_name, path = %path, %reason, "payment rejected");
            return challenge_response(PaymentChallenge::rejected(requirement, reason));
        }

        // Facilitator transport failures fail closed
        let verification = match self.facilitator.verify(&payload, &requirement).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "facilitator unreachable during verify");
                return challenge_response(PaymentChallenge::rejected(
                    requirement,
                    "payment verification unavailable",
                ));
            }
        };
        if !verification.is_valid {
            let reason = verification
                .invalid_reason
                .unwrap_or_else(|| "payment verification failed".to_string());
            tracing::debug!(path = %path, %reason, "payment rejected by facilitator");
            return challenge_response(PaymentChallenge::rejected(requirement, reason));
        }

        // Authorized: run the handler exactly once, then settle. The receipt
        // header is attached only after settlement succeeds, so an aborted
        // request can never observe a success header.
        let mut response = next.run(request).await;

        let settlement = match self.facilitator.settle(&payload, &requirement).await {
            Ok(settlement) if settlement.success => settlement,
            Ok(settlement) => {
                let reason = settlement
                    .error_reason
                    .unwrap_or_else(|| "settlement failed".to_string());
                tracing::warn!(path = %path, %reason, "settlement rejected");
                return challenge_response(PaymentChallenge::rejected(requirement, reason));
            }
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "facilitator unreachable during settle");
                return challenge_response(PaymentChallenge::rejected(
                    requirement,
                    "payment settlement unavailable",
                ));
            }
        };

        let receipt = SettlementReceipt::from_settlement(&settlement, &requirement);
        if let Ok(encoded) = receipt.to_base64() {
            if let Ok(value) = HeaderValue::from_str(&encoded) {
                response.headers_mut().insert(headers::PAYMENT_RESPONSE, value);
            }
        }
        tracing::debug!(path = %path, transaction = %settlement.transaction, "payment settled");

        response
    }
}

/// Axum middleware function, to be mounted with
/// `axum::middleware::from_fn_with_state`
pub async fn paywall_middleware(
    State(paywall): State<Paywall>,
    request: Request,
    next: Next,
) -> Response {
    paywall.process(request, next).await
}

fn challenge_response(challenge: PaymentChallenge) -> Response {
    (StatusCode::PAYMENT_REQUIRED, Json(challenge)).into_response()
}
