//! # x402-paygate
//!
//! A pay-per-request access-control layer for HTTP resources, built on the
//! x402 protocol: a server exposes routes behind a paywall, unpaid requests
//! receive a structured 402 challenge, and clients satisfy the challenge by
//! attaching a signed payment payload which a trusted facilitator verifies
//! and settles before access is granted.
//!
//! ## Server side
//!
//! ```rust,no_run
//! use axum::{routing::get, Json, Router};
//! use x402_paygate::middleware::{paywall_middleware, Paywall, RoutePolicy, RouteTable};
//! use x402_paygate::types::FacilitatorConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let table = RouteTable::new(FacilitatorConfig::new("https://x402.org/facilitator"))
//!         .route(
//!             "/api/protected",
//!             RoutePolicy::new("$0.001", "0x6a475ed41c9a172332dba2308e5d6d059f650e12")
//!                 .with_network("base-sepolia")
//!                 .with_description("Access to protected content"),
//!         );
//!     let paywall = Paywall::new(table)?;
//!
//!     let app = Router::new()
//!         .route("/api/protected", get(protected))
//!         .layer(axum::middleware::from_fn_with_state(
//!             paywall,
//!             paywall_middleware,
//!         ));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:4021").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//!
//! async fn protected() -> Json<serde_json::Value> {
//!     Json(serde_json::json!({ "content": "premium" }))
//! }
//! ```
//!
//! ## Client side
//!
//! ```rust,no_run
//! use x402_paygate::client::PaymentFetch;
//! use x402_paygate::signer::LocalSigner;
//!
//! # async fn example() -> x402_paygate::Result<()> {
//! let signer = LocalSigner::from_private_key("0xYOUR_KEY")?;
//! let client = PaymentFetch::new(signer);
//! let (response, receipt) = client
//!     .fetch(reqwest::Method::GET, "http://localhost:4021/api/protected")
//!     .await?;
//! # let _ = (response, receipt);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **`types`** - challenge, payload, and receipt wire types
//! - **`middleware`** - server-side paywall for axum
//! - **`facilitator`** - client for the external verify/settle service
//! - **`client`** - fetch wrapper that pays 402 challenges, at most one retry
//! - **`signer`** - signing capability trait and local key signer
//! - **`crypto`** - EIP-712 hashing and secp256k1 signatures
//! - **`error`** - error taxonomy; every per-request failure maps to an HTTP
//!   response
//!
//! Authorization is strictly per-request: every request to a protected route
//! is re-verified through the facilitator, and the middleware keeps no
//! counters, caches, or verification state of its own.

pub mod client;
pub mod crypto;
pub mod error;
pub mod facilitator;
pub mod middleware;
pub mod signer;
pub mod types;

// Re-exports for convenience
pub use client::{decode_payment_response, PaymentFetch};
pub use error::{PaygateError, Result};
pub use facilitator::FacilitatorClient;
pub use middleware::{paywall_middleware, AppMetadata, Paywall, RoutePolicy, RouteTable};
pub use signer::{build_payment_payload, LocalSigner, PaymentSigner};
pub use types::*;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
