//! Cryptographic utilities for payment signing
//!
//! EIP-712 typed data hashing ([`eip712`]) and secp256k1 signing/recovery
//! ([`signature`]) for EIP-3009 transfer authorizations. The middleware never
//! verifies signatures itself; these utilities back the client-side signer
//! and are available to facilitator implementations.

pub mod eip712;
pub mod signature;


pub use eip712::{domain_separator, keccak256, transfer_with_authorization_hash, Domain};
pub use signature::{
    address_from_private_key, authorization_digest, generate_nonce, sign_digest,
    verify_digest_signature, verify_transfer_authorization,
};
