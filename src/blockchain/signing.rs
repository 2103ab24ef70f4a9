// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Key material and address parsing.
//!
//! Secret keys arrive either as a base58 string (the format wallets export)
//! or as the JSON byte array written by `solana-keygen`. Both decode to the
//! 64-byte ed25519 keypair the SDK signs with.

use std::str::FromStr;

use solana_sdk::{pubkey::Pubkey, signature::Keypair, signature::Signature};

use super::client::SolanaClientError;

/// Decode a secret key into a signing keypair.
///
/// # Arguments
/// * `secret` - Base58 string or JSON byte array of the 64-byte keypair
///
/// # Returns
/// * `Ok(Keypair)` - A keypair ready to sign transactions
/// * `Err(SolanaClientError::InvalidKey)` - If decoding fails
pub fn keypair_from_secret(secret: &str) -> Result<Keypair, SolanaClientError> {
    let secret = secret.trim();

    let bytes = if secret.starts_with('[') {
        serde_json::from_str::<Vec<u8>>(secret)
            .map_err(|e| SolanaClientError::InvalidKey(format!("Invalid JSON key: {}", e)))?
    } else {
        bs58::decode(secret)
            .into_vec()
            .map_err(|e| SolanaClientError::InvalidKey(format!("Invalid base58: {}", e)))?
    };

    Keypair::from_bytes(&bytes)
        .map_err(|e| SolanaClientError::InvalidKey(format!("Invalid keypair bytes: {}", e)))
}

/// Parse a base58 public key.
pub fn parse_pubkey(address: &str) -> Result<Pubkey, SolanaClientError> {
    Pubkey::from_str(address.trim())
        .map_err(|e| SolanaClientError::InvalidAddress(format!("{}: {}", address, e)))
}

/// Parse a base58 transaction signature.
pub fn parse_signature(signature: &str) -> Result<Signature, SolanaClientError> {
    Signature::from_str(signature.trim())
        .map_err(|e| SolanaClientError::InvalidSignature(format!("{}: {}", signature, e)))
}

/// Whether `address` is a wallet address a user can sign for.
///
/// Program derived addresses decode fine but lie off the ed25519 curve, so
/// they are rejected too.
pub fn is_valid_wallet_address(address: &str) -> bool {
    match Pubkey::from_str(address) {
        Ok(key) => key.is_on_curve(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use solana_sdk::signature::Signer;
    use spl_associated_token_account::get_associated_token_address;

    use super::*;

    #[test]
    fn test_keypair_from_base58() {
        let keypair = Keypair::new();
        let decoded = keypair_from_secret(&keypair.to_base58_string()).unwrap();
        assert_eq!(decoded.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_keypair_from_json_bytes() {
        let keypair = Keypair::new();
        let json = serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap();
        let decoded = keypair_from_secret(&json).unwrap();
        assert_eq!(decoded.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_keypair_rejects_garbage() {
        for secret in ["", "0OIl", "abc", "[1, 2, 3]", "[not json"] {
            let result = keypair_from_secret(secret);
            assert!(
                matches!(result, Err(SolanaClientError::InvalidKey(_))),
                "accepted {:?}",
                secret
            );
        }
    }

    #[test]
    fn test_valid_wallet_address() {
        let address = Keypair::new().pubkey().to_string();
        assert!(is_valid_wallet_address(&address));
    }

    #[test]
    fn test_off_curve_address_is_invalid() {
        let pda = get_associated_token_address(&Keypair::new().pubkey(), &Pubkey::new_unique());
        assert!(!is_valid_wallet_address(&pda.to_string()));
    }

    #[test]
    fn test_bad_encoding_is_invalid() {
        assert!(!is_valid_wallet_address(""));
        assert!(!is_valid_wallet_address("not-an-address"));
        assert!(!is_valid_wallet_address("0x742d35Cc6634C0532925a3b844Bc9e7595f2bD18"));
        // 31 bytes
        assert!(!is_valid_wallet_address(&bs58::encode([7u8; 31]).into_string()));
    }

    #[test]
    fn test_parse_pubkey_and_signature() {
        let key = Pubkey::new_unique();
        assert_eq!(parse_pubkey(&key.to_string()).unwrap(), key);
        assert!(matches!(
            parse_pubkey("nope"),
            Err(SolanaClientError::InvalidAddress(_))
        ));

        let sig = Signature::new_unique();
        assert_eq!(parse_signature(&sig.to_string()).unwrap(), sig);
        assert!(matches!(
            parse_signature("abc123"),
            Err(SolanaClientError::InvalidSignature(_))
        ));
    }
}
