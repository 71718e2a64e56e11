//! secp256k1 signing and recovery for payment authorizations

use std::str::FromStr;

use ethereum_types::{Address, H256, U256};
use k256::ecdsa::{RecoveryId, Signature as K256Signature, VerifyingKey};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};

use super::eip712::{self, Domain};
use crate::types::{ExactEvmPayload, ExactEvmPayloadAuthorization, NetworkConfig};
use crate::{PaygateError, Result};

/// Sign a 32-byte digest with a hex-encoded private key, producing a 65-byte
/// `r || s || v` signature with `v` in {27, 28}
pub fn sign_digest(digest: H256, private_key: &str) -> Result<String> {
    let key_bytes = hex::decode(private_key.trim_start_matches("0x"))
        .map_err(|_| PaygateError::invalid_signature("invalid hex private key"))?;
    let secret_key = SecretKey::from_slice(&key_bytes)
        .map_err(|_| PaygateError::invalid_signature("invalid private key"))?;

    let secp = Secp256k1::new();
    let message = Message::from_digest_slice(digest.as_bytes())
        .map_err(|_| PaygateError::invalid_signature("invalid digest"))?;

    let (recovery_id, compact) = secp
        .sign_ecdsa_recoverable(&message, &secret_key)
        .serialize_compact();

    let mut sig = [0u8; 65];
    sig[..64].copy_from_slice(&compact);
    sig[64] = recovery_id.to_i32() as u8 + 27;
    Ok(format!("0x{}", hex::encode(sig)))
}

/// Recover the signer of a digest and compare it to the expected address.
/// Accepts `v` in {0, 1} as well as {27, 28}.
pub fn verify_digest_signature(
    signature: &str,
    digest: H256,
    expected: Address,
) -> Result<bool> {
    let sig_bytes = hex::decode(signature.trim_start_matches("0x"))
        .map_err(|_| PaygateError::invalid_signature("invalid hex signature"))?;
    if sig_bytes.len() != 65 {
        return Err(PaygateError::invalid_signature("signature must be 65 bytes"));
    }

    let v = match sig_bytes[64] {
        v @ 27..=28 => v - 27,
        v @ 0..=1 => v,
        _ => return Err(PaygateError::invalid_signature("invalid recovery id")),
    };
    let recovery_id = RecoveryId::try_from(v)
        .map_err(|_| PaygateError::invalid_signature("invalid recovery id"))?;
    let k256_sig = K256Signature::try_from(&sig_bytes[..64])
        .map_err(|_| PaygateError::invalid_signature("invalid signature format"))?;

    let verifying_key =
        VerifyingKey::recover_from_prehash(digest.as_bytes(), &k256_sig, recovery_id)
            .map_err(|_| PaygateError::invalid_signature("failed to recover public key"))?;

    Ok(address_from_verifying_key(&verifying_key)? == expected)
}

/// Compute the EIP-712 digest for a payment authorization on a given network
pub fn authorization_digest(
    authorization: &ExactEvmPayloadAuthorization,
    network: &NetworkConfig,
) -> Result<H256> {
    let domain = Domain {
        name: network.usdc_name.clone(),
        version: "2".to_string(),
        chain_id: network.chain_id,
        verifying_contract: parse_address(&network.usdc_contract)?,
    };

    Ok(eip712::transfer_with_authorization_hash(
        &domain,
        parse_address(&authorization.from)?,
        parse_address(&authorization.to)?,
        parse_uint(&authorization.value, "value")?,
        parse_uint(&authorization.valid_after, "validAfter")?,
        parse_uint(&authorization.valid_before, "validBefore")?,
        parse_hash(&authorization.nonce)?,
    ))
}

/// Verify the signature of a payment authorization against its `from` address
pub fn verify_transfer_authorization(
    payload: &ExactEvmPayload,
    network: &NetworkConfig,
) -> Result<bool> {
    let digest = authorization_digest(&payload.authorization, network)?;
    let from = parse_address(&payload.authorization.from)?;
    verify_digest_signature(&payload.signature, digest, from)
}

/// Derive the Ethereum address controlled by a hex-encoded private key
pub fn address_from_private_key(private_key: &str) -> Result<Address> {
    let key_bytes = hex::decode(private_key.trim_start_matches("0x"))
        .map_err(|_| PaygateError::invalid_signature("invalid hex private key"))?;
    let secret_key = SecretKey::from_slice(&key_bytes)
        .map_err(|_| PaygateError::invalid_signature("invalid private key"))?;

    let secp = Secp256k1::new();
    let public_key = PublicKey::from_secret_key(&secp, &secret_key);
    let uncompressed = public_key.serialize_uncompressed();

    // Drop the 0x04 prefix, hash, take the low 20 bytes
    let hash = eip712::keccak256(&uncompressed[1..]);
    Ok(Address::from_slice(&hash[12..]))
}

/// Generate a fresh 32-byte nonce for an authorization
pub fn generate_nonce() -> H256 {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    H256::from(bytes)
}

fn address_from_verifying_key(key: &VerifyingKey) -> Result<Address> {
    let point = key.to_encoded_point(false);
    let bytes = point.as_bytes();
    if bytes.len() != 65 {
        return Err(PaygateError::invalid_signature("invalid public key length"));
    }
    let hash = eip712::keccak256(&bytes[1..]);
    Ok(Address::from_slice(&hash[12..]))
}

fn parse_address(s: &str) -> Result<Address> {
    Address::from_str(s.trim_start_matches("0x"))
        .map_err(|_| PaygateError::invalid_signature(format!("invalid address: {s}")))
}

fn parse_uint(s: &str, field: &str) -> Result<U256> {
    U256::from_str_radix(s, 10)
        .map_err(|_| PaygateError::invalid_signature(format!("invalid {field}: {s}")))
}

fn parse_hash(s: &str) -> Result<H256> {
    H256::from_str(s.trim_start_matches("0x"))
        .map_err(|_| PaygateError::invalid_signature(format!("invalid nonce: {s}")))
}
