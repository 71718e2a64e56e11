//! Protocol constants

/// HTTP header names used on the wire
pub mod headers {
    /// Request header carrying the base64-encoded payment payload
    pub const PAYMENT: &str = "X-PAYMENT";
    /// Response header carrying the base64-encoded settlement receipt
    pub const PAYMENT_RESPONSE: &str = "X-PAYMENT-RESPONSE";
}

/// Payment schemes
pub mod schemes {
    /// Exact-amount payment scheme (EIP-3009 transfer with authorization)
    pub const EXACT: &str = "exact";
}

/// Network identifiers
pub mod networks {
    /// Base mainnet
    pub const BASE_MAINNET: &str = "base";
    /// Base Sepolia testnet
    pub const BASE_SEPOLIA: &str = "base-sepolia";

    /// Check whether a network identifier is supported
    pub fn is_supported(network: &str) -> bool {
        matches!(network, BASE_MAINNET | BASE_SEPOLIA)
    }
}
