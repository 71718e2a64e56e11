//! Chain-specific network configuration

use super::constants::networks;

/// Network configuration with the details needed to build and verify
/// EIP-3009 authorizations
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Chain ID for the network
    pub chain_id: u64,
    /// USDC contract address (the EIP-712 verifying contract)
    pub usdc_contract: String,
    /// Token name used in the EIP-712 domain
    pub usdc_name: String,
    /// Network name
    pub name: String,
    /// Whether this is a testnet
    pub is_testnet: bool,
}

impl NetworkConfig {
    /// Base mainnet configuration
    pub fn base_mainnet() -> Self {
        Self {
            chain_id: 8453,
            usdc_contract: "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913".to_string(),
            usdc_name: "USD Coin".to_string(),
            name: networks::BASE_MAINNET.to_string(),
            is_testnet: false,
        }
    }

    /// Base Sepolia testnet configuration
    pub fn base_sepolia() -> Self {
        Self {
            chain_id: 84532,
            usdc_contract: "0x036CbD53842c5426634e7929541eC2318f3dCF7e".to_string(),
            usdc_name: "USDC".to_string(),
            name: networks::BASE_SEPOLIA.to_string(),
            is_testnet: true,
        }
    }

    /// Look up a network configuration by its identifier
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            networks::BASE_MAINNET => Some(Self::base_mainnet()),
            networks::BASE_SEPOLIA => Some(Self::base_sepolia()),
            _ => None,
        }
    }
}
