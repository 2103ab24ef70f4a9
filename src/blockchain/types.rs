// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use solana_transaction_status::EncodedConfirmedTransactionWithStatusMeta;
use utoipa::ToSchema;

use super::client::SolanaClientError;

/// Lamports in one SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Decimal places of the native currency.
pub const SOL_DECIMALS: u8 = 9;

/// Symbol reported as the fee currency on receipts.
pub const NATIVE_CURRENCY: &str = "SOL";

/// Supported Solana clusters.
///
/// Serialized as its identifier (`main` / `testnet`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    /// Production cluster (`main`).
    Mainnet,
    /// Test cluster. The `testnet` identifier routes here.
    Devnet,
}

impl Network {
    /// Identifier used by callers and echoed back on receipts.
    pub fn identifier(self) -> &'static str {
        match self {
            Network::Mainnet => "main",
            Network::Devnet => "testnet",
        }
    }

    /// Static configuration for this network.
    pub fn config(self) -> &'static NetworkConfig {
        match self {
            Network::Mainnet => &SOLANA_MAINNET,
            Network::Devnet => &SOLANA_DEVNET,
        }
    }
}

impl FromStr for Network {
    type Err = SolanaClientError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "main" | "mainnet" | "mainnet-beta" => Ok(Network::Mainnet),
            "testnet" | "devnet" => Ok(Network::Devnet),
            other => Err(SolanaClientError::UnknownNetwork(other.to_string())),
        }
    }
}

impl Serialize for Network {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.identifier())
    }
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Solana network configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Network this configuration belongs to
    pub network: Network,
    /// Cluster name for display
    pub name: &'static str,
    /// RPC endpoint URL
    pub rpc_url: &'static str,
    /// Block explorer base URL
    pub explorer_url: &'static str,
    /// Query string appended to explorer links (empty on mainnet)
    pub explorer_suffix: &'static str,
}

/// Solana mainnet-beta configuration.
pub const SOLANA_MAINNET: NetworkConfig = NetworkConfig {
    network: Network::Mainnet,
    name: "mainnet",
    rpc_url: "https://api.mainnet-beta.solana.com",
    explorer_url: "https://solscan.io",
    explorer_suffix: "",
};

/// Solana devnet configuration, used for every non-production identifier.
pub const SOLANA_DEVNET: NetworkConfig = NetworkConfig {
    network: Network::Devnet,
    name: "testnet",
    rpc_url: "https://api.devnet.solana.com",
    explorer_url: "https://solscan.io",
    explorer_suffix: "?cluster=devnet",
};

impl NetworkConfig {
    /// Resolve a raw identifier: `"main"` selects mainnet, anything else
    /// falls back to devnet.
    ///
    /// Prefer parsing a [`Network`] where unknown identifiers must be rejected.
    pub fn resolve(identifier: &str) -> &'static NetworkConfig {
        match identifier {
            "main" => &SOLANA_MAINNET,
            other => {
                if other.parse::<Network>().is_err() {
                    tracing::warn!(identifier = other, "unknown network identifier, using devnet");
                }
                &SOLANA_DEVNET
            }
        }
    }

    /// Explorer URL for a transaction signature.
    pub fn transaction_link(&self, signature: &str) -> String {
        format!("{}/tx/{}{}", self.explorer_url, signature, self.explorer_suffix)
    }

    /// Explorer URL for a wallet address.
    pub fn wallet_link(&self, address: &str) -> String {
        format!("{}/account/{}{}", self.explorer_url, address, self.explorer_suffix)
    }
}

/// Explorer link for a transaction on the given network identifier.
pub fn get_transaction_link(signature: &str, network: &str) -> String {
    NetworkConfig::resolve(network).transaction_link(signature)
}

/// Explorer link for a wallet on the given network identifier.
pub fn get_wallet_link(address: &str, network: &str) -> String {
    NetworkConfig::resolve(network).wallet_link(address)
}

/// Shaped view of a fetched transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// Fee payer (first account key)
    pub from: String,
    /// Block time, when the node reports one
    pub date: Option<DateTime<Utc>>,
    /// Currency of the fee
    pub gas_cost_crypto_currency: String,
    /// Fee paid, in lamports
    pub gas_cost_in_crypto: u64,
    /// Compute units consumed
    pub gas_limit: u64,
    pub is_pending: bool,
    pub is_executed: bool,
    pub is_successful: bool,
    pub is_failed: bool,
    pub is_invalid: bool,
    /// Network identifier
    pub network: String,
    pub nonce: u64,
    /// Transaction signature
    pub transaction_hash: String,
    /// Explorer URL
    pub transaction_link: String,
}

/// Raw transaction data together with its shaped receipt.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLookup {
    #[schema(value_type = Object)]
    pub transaction_data: EncodedConfirmedTransactionWithStatusMeta,
    pub receipt: TransactionReceipt,
}

/// Signature status observed while waiting for confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    /// Slot the transaction landed in
    pub slot: u64,
    /// Confirmations reported by the node (`None` once rooted)
    pub confirmations: Option<usize>,
    /// Execution error, if the transaction failed on-chain
    pub err: Option<String>,
    /// `processed`, `confirmed` or `finalized`
    pub confirmation_status: Option<String>,
}

/// Receipt returned after a transfer is submitted and confirmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    /// Amount sent, in human units
    pub amount: f64,
    /// Always `None`: block time is not known at submission
    pub date: Option<DateTime<Utc>>,
    /// Sender address
    pub from: String,
    /// Currency of the fee
    pub gas_cost_crypto_currency: String,
    /// Network identifier
    pub network: String,
    pub nonce: u64,
    /// Recipient address
    pub to: String,
    /// Transaction signature
    pub transaction_hash: String,
    /// Explorer URL
    pub transaction_link: String,
    /// Confirmation payload
    pub transaction_receipt: Confirmation,
}

impl TransferReceipt {
    /// Whether the transfer executed without an on-chain error.
    pub fn succeeded(&self) -> bool {
        self.transaction_receipt.err.is_none()
    }
}

/// A transfer that was submitted but whose finality is not yet known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedTransfer {
    pub signature: String,
    pub from: String,
    pub to: String,
    pub amount: f64,
    #[schema(value_type = String, example = "testnet")]
    pub network: Network,
}

impl SubmittedTransfer {
    /// Explorer URL for the submitted transaction.
    pub fn transaction_link(&self) -> String {
        self.network.config().transaction_link(&self.signature)
    }

    /// Assemble the final receipt once a confirmation was observed.
    pub fn into_receipt(self, confirmation: Confirmation) -> TransferReceipt {
        TransferReceipt {
            transaction_link: self.transaction_link(),
            amount: self.amount,
            date: None,
            from: self.from,
            gas_cost_crypto_currency: NATIVE_CURRENCY.to_string(),
            network: self.network.identifier().to_string(),
            nonce: 0,
            to: self.to,
            transaction_hash: self.signature,
            transaction_receipt: confirmation,
        }
    }
}

/// Parameters for a SOL or SPL token transfer.
#[derive(Clone)]
pub struct TransferRequest {
    /// Recipient wallet address
    pub to: String,
    /// Amount in human units (e.g. `0.5`)
    pub amount: f64,
    /// Target network
    pub network: Network,
    /// Token decimals; only read for token transfers
    pub decimals: u8,
    /// Base58-encoded 64-byte secret key of the sender
    pub private_key: String,
    /// Token mint; `None` sends native SOL
    pub token_mint: Option<String>,
}

impl fmt::Debug for TransferRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferRequest")
            .field("to", &self.to)
            .field("amount", &self.amount)
            .field("network", &self.network)
            .field("decimals", &self.decimals)
            .field("private_key", &"<redacted>")
            .field("token_mint", &self.token_mint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_link_mainnet() {
        assert_eq!(
            get_transaction_link("abc123", "main"),
            "https://solscan.io/tx/abc123"
        );
    }

    #[test]
    fn test_transaction_link_falls_back_to_devnet() {
        assert_eq!(
            get_transaction_link("abc123", "other"),
            "https://solscan.io/tx/abc123?cluster=devnet"
        );
        assert_eq!(
            get_transaction_link("abc123", "testnet"),
            "https://solscan.io/tx/abc123?cluster=devnet"
        );
    }

    #[test]
    fn test_wallet_link() {
        let address = "HPC9kMWf6DLD6oYW9znD4CGgsJqjAtQ4RnGN5d91wNsg";
        assert_eq!(
            get_wallet_link(address, "main"),
            format!("https://solscan.io/account/{address}")
        );
        assert_eq!(
            get_wallet_link(address, "testnet"),
            format!("https://solscan.io/account/{address}?cluster=devnet")
        );
    }

    #[test]
    fn test_network_parsing_is_strict() {
        assert_eq!("main".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!("Mainnet-Beta".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!("testnet".parse::<Network>().unwrap(), Network::Devnet);
        assert_eq!(" devnet ".parse::<Network>().unwrap(), Network::Devnet);

        let err = "other".parse::<Network>().unwrap_err();
        assert!(matches!(err, SolanaClientError::UnknownNetwork(ref n) if n == "other"));
    }

    #[test]
    fn test_network_serde_uses_identifier() {
        assert_eq!(serde_json::to_value(Network::Mainnet).unwrap(), "main");
        assert_eq!(
            serde_json::from_value::<Network>(serde_json::json!("devnet")).unwrap(),
            Network::Devnet
        );
        assert!(serde_json::from_value::<Network>(serde_json::json!("other")).is_err());
    }

    #[test]
    fn test_resolve_matches_typed_config() {
        assert_eq!(NetworkConfig::resolve("main"), Network::Mainnet.config());
        assert_eq!(NetworkConfig::resolve("testnet"), Network::Devnet.config());
        // "mainnet" is not the production identifier for the lenient registry
        assert_eq!(NetworkConfig::resolve("mainnet"), &SOLANA_DEVNET);
    }

    #[test]
    fn test_submitted_transfer_into_receipt() {
        let submitted = SubmittedTransfer {
            signature: "5sig".to_string(),
            from: "sender".to_string(),
            to: "recipient".to_string(),
            amount: 0.5,
            network: Network::Devnet,
        };
        let confirmation = Confirmation {
            slot: 7,
            confirmations: Some(1),
            err: None,
            confirmation_status: Some("confirmed".to_string()),
        };

        let receipt = submitted.into_receipt(confirmation.clone());
        assert_eq!(receipt.amount, 0.5);
        assert!(receipt.date.is_none());
        assert_eq!(receipt.network, "testnet");
        assert_eq!(receipt.transaction_hash, "5sig");
        assert_eq!(
            receipt.transaction_link,
            get_transaction_link(&receipt.transaction_hash, &receipt.network)
        );
        assert_eq!(receipt.transaction_receipt, confirmation);
    }

    #[test]
    fn test_receipt_serializes_camel_case() {
        let receipt = TransactionReceipt {
            from: "a".into(),
            date: None,
            gas_cost_crypto_currency: NATIVE_CURRENCY.into(),
            gas_cost_in_crypto: 5000,
            gas_limit: 150,
            is_pending: false,
            is_executed: true,
            is_successful: true,
            is_failed: false,
            is_invalid: false,
            network: "main".into(),
            nonce: 0,
            transaction_hash: "h".into(),
            transaction_link: "l".into(),
        };
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["gasCostInCrypto"], 5000);
        assert_eq!(json["isSuccessful"], true);
        assert_eq!(json["transactionHash"], "h");
    }

    #[test]
    fn test_transfer_request_debug_redacts_key() {
        let request = TransferRequest {
            to: "to".into(),
            amount: 1.0,
            network: Network::Devnet,
            decimals: 6,
            private_key: "super-secret".into(),
            token_mint: None,
        };
        let debug = format!("{:?}", request);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
