//! Server-side paywall middleware
//!
//! Intercepts requests to protected routes, issues 402 challenges, verifies
//! submitted payments through the facilitator, and attaches settlement
//! receipts to authorized responses.
//!
//! - [`config`] - static route configuration (path patterns, prices, recipients)
//! - [`paywall`] - the per-request state machine and axum middleware function
//!
//! # Example
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use x402_paygate::middleware::{paywall_middleware, Paywall, RoutePolicy, RouteTable};
//! use x402_paygate::types::FacilitatorConfig;
//!
//! # fn example() -> x402_paygate::Result<()> {
//! let table = RouteTable::new(FacilitatorConfig::new("https://x402.org/facilitator")).route(
//!     "/api/protected",
//!     RoutePolicy::new("$0.001", "0x6a475ed41c9a172332dba2308e5d6d059f650e12")
//!         .with_network("base-sepolia")
//!         .with_description("Access to protected content"),
//! );
//! let paywall = Paywall::new(table)?;
//!
//! let app: Router = Router::new()
//!     .route("/api/protected", get(|| async { "Protected content" }))
//!     .layer(axum::middleware::from_fn_with_state(
//!         paywall,
//!         paywall_middleware,
//!     ));
//! # Ok(())
//! # }
//! ```
//!
//! # Payment flow
//!
//! 1. Request without `X-PAYMENT` header, or with a malformed one, receives a
//!    402 carrying the route's payment requirement.
//! 2. Request with a structurally valid header is checked against the
//!    requirement (amount, network, recipient, resource) and then verified by
//!    the facilitator. Any failure, including a facilitator transport error,
//!    yields a 402 with a reason; never a 5xx.
//! 3. On success the route handler runs exactly once, the payment is settled,
//!    and the response passes through unmodified with an `X-PAYMENT-RESPONSE`
//!    receipt header attached.

pub mod config;
pub mod paywall;


pub use config::{AppMetadata, RoutePolicy, RouteTable};
pub use paywall::{paywall_middleware, Paywall};
