//! Core types for the paywall protocol
//!
//! Type-safe representations of the challenge, payload, and receipt that move
//! between client, middleware, and facilitator:
//! - [`payment`] - payment requirements, challenges, and signed payloads
//! - [`facilitator`] - facilitator configuration and verify/settle responses
//! - [`network`] - chain-specific network configuration
//! - [`constants`] - header names, schemes, and network identifiers

pub mod constants;
pub mod facilitator;
pub mod network;
pub mod payment;

pub use constants::{headers, networks, schemes};
pub use facilitator::{FacilitatorConfig, SettleResponse, SettlementReceipt, VerifyResponse};
pub use network::NetworkConfig;
pub use payment::{
    parse_price, ExactEvmPayload, ExactEvmPayloadAuthorization, PaymentChallenge, PaymentPayload,
    PaymentRequirement, X402_VERSION,
};
