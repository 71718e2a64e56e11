//! EIP-712 typed data hashing for EIP-3009 transfer authorizations

use ethereum_types::{Address, H256, U256};
use sha3::{Digest, Keccak256};

/// EIP-712 domain separator parameters
#[derive(Debug, Clone)]
pub struct Domain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

const DOMAIN_TYPE: &[u8] =
    b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

const TRANSFER_WITH_AUTHORIZATION_TYPE: &[u8] =
    b"TransferWithAuthorization(address from,address to,uint256 value,uint256 validAfter,uint256 validBefore,bytes32 nonce)";

/// Keccak-256 hash function
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Compute the EIP-712 digest for an EIP-3009 `TransferWithAuthorization`
#[allow(clippy::too_many_arguments)]
pub fn transfer_with_authorization_hash(
    domain: &Domain,
    from: Address,
    to: Address,
    value: U256,
    valid_after: U256,
    valid_before: U256,
    nonce: H256,
) -> H256 {
    let struct_hash = {
        let mut data = Vec::with_capacity(32 * 7);
        data.extend_from_slice(&keccak256(TRANSFER_WITH_AUTHORIZATION_TYPE));
        data.extend_from_slice(&encode_address(from));
        data.extend_from_slice(&encode_address(to));
        data.extend_from_slice(&encode_uint(value));
        data.extend_from_slice(&encode_uint(valid_after));
        data.extend_from_slice(&encode_uint(valid_before));
        data.extend_from_slice(nonce.as_bytes());
        keccak256(&data)
    };

    // hash(0x1901 || domainSeparator || structHash)
    let mut data = Vec::with_capacity(2 + 64);
    data.extend_from_slice(&[0x19, 0x01]);
    data.extend_from_slice(domain_separator(domain).as_bytes());
    data.extend_from_slice(&struct_hash);
    H256::from_slice(&keccak256(&data))
}

/// Compute the domain separator hash
pub fn domain_separator(domain: &Domain) -> H256 {
    let mut data = Vec::with_capacity(32 * 5);
    data.extend_from_slice(&keccak256(DOMAIN_TYPE));
    data.extend_from_slice(&keccak256(domain.name.as_bytes()));
    data.extend_from_slice(&keccak256(domain.version.as_bytes()));
    data.extend_from_slice(&encode_uint(U256::from(domain.chain_id)));
    data.extend_from_slice(&encode_address(domain.verifying_contract));
    H256::from_slice(&keccak256(&data))
}

/// ABI-encode an address as a left-padded 32-byte word
fn encode_address(address: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

/// ABI-encode a uint256 as a big-endian 32-byte word
fn encode_uint(value: U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}
