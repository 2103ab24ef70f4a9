// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Solana RPC client for balance queries and transaction lookups.

use std::sync::Arc;

use chrono::DateTime;
use serde_json::json;
use solana_client::{
    client_error::ClientError,
    nonblocking::rpc_client::RpcClient,
    rpc_config::RpcTransactionConfig,
    rpc_request::{RpcRequest, TokenAccountsFilter},
};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_transaction_status::{
    EncodedConfirmedTransactionWithStatusMeta, EncodedTransaction, UiMessage,
    UiTransactionEncoding,
};

use super::signing::{parse_pubkey, parse_signature};
use super::token::first_token_balance;
use super::types::*;

/// Highest transaction version the lookup asks the node to return.
const MAX_SUPPORTED_TRANSACTION_VERSION: u8 = 0;

/// Solana RPC client bound to one network.
///
/// Cloning is cheap; clones share the underlying connection.
#[derive(Clone)]
pub struct SolanaClient {
    /// Network this client talks to
    network: Network,
    /// Nonblocking JSON-RPC client
    rpc: Arc<RpcClient>,
}

impl SolanaClient {
    /// Create a new client for the network's default endpoint.
    pub async fn new(network: Network) -> Result<Self, SolanaClientError> {
        Self::with_url(network, network.config().rpc_url).await
    }

    /// Create a client for the network bound to a custom RPC endpoint.
    pub async fn with_url(network: Network, rpc_url: &str) -> Result<Self, SolanaClientError> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e: url::ParseError| SolanaClientError::InvalidRpcUrl(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SolanaClientError::InvalidRpcUrl(format!(
                "unsupported scheme `{}`",
                url.scheme()
            )));
        }

        let rpc = RpcClient::new_with_commitment(url.to_string(), CommitmentConfig::confirmed());
        Ok(Self::with_rpc(network, rpc))
    }

    /// Wrap an already constructed RPC client.
    pub fn with_rpc(network: Network, rpc: RpcClient) -> Self {
        Self {
            network,
            rpc: Arc::new(rpc),
        }
    }

    /// Get the network this client is bound to.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Get the underlying RPC client.
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// Get the native SOL balance of an address, in SOL.
    pub async fn get_native_balance(&self, owner: &str) -> Result<f64, SolanaClientError> {
        let owner = parse_pubkey(owner)?;
        let lamports = self.rpc.get_balance(&owner).await?;

        Ok(lamports as f64 / LAMPORTS_PER_SOL as f64)
    }

    /// Get the balance an owner holds of the given token mint, in token units.
    ///
    /// Only the first token account the node returns for the mint is read;
    /// balances spread across several accounts of the same mint are not summed.
    pub async fn get_token_balance(&self, owner: &str, mint: &str) -> Result<f64, SolanaClientError> {
        let owner_key = parse_pubkey(owner)?;
        let mint_key = parse_pubkey(mint)?;

        let accounts = self
            .rpc
            .get_token_accounts_by_owner(&owner_key, TokenAccountsFilter::Mint(mint_key))
            .await?;
        tracing::debug!(owner, mint, accounts = accounts.len(), "token accounts fetched");

        first_token_balance(&accounts, owner, mint)
    }

    /// Get a native balance, or a token balance when a mint is given.
    pub async fn get_balance(
        &self,
        owner: &str,
        token_mint: Option<&str>,
    ) -> Result<f64, SolanaClientError> {
        match token_mint {
            Some(mint) => self.get_token_balance(owner, mint).await,
            None => self.get_native_balance(owner).await,
        }
    }

    /// Fetch a transaction at `confirmed` commitment.
    ///
    /// Returns `Ok(None)` when the node has no such transaction. Transport
    /// and decoding failures are returned as errors.
    pub async fn get_transaction(
        &self,
        signature: &str,
    ) -> Result<Option<TransactionLookup>, SolanaClientError> {
        let sig = parse_signature(signature)?;
        let config = RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::Json),
            commitment: Some(CommitmentConfig::confirmed()),
            max_supported_transaction_version: Some(MAX_SUPPORTED_TRANSACTION_VERSION),
        };

        let data: Option<EncodedConfirmedTransactionWithStatusMeta> = self
            .rpc
            .send(RpcRequest::GetTransaction, json!([sig.to_string(), config]))
            .await
            .map_err(|e| {
                tracing::warn!(signature, error = %e, "transaction lookup failed");
                SolanaClientError::from(e)
            })?;

        let Some(data) = data else {
            tracing::info!(signature, network = %self.network, "transaction not found");
            return Ok(None);
        };
        tracing::debug!(signature, slot = data.slot, "transaction fetched");

        let receipt = shape_receipt(signature, self.network, &data);
        Ok(Some(TransactionLookup {
            transaction_data: data,
            receipt,
        }))
    }
}

/// Map a raw transaction response onto the receipt shape.
///
/// Anything returned at `confirmed` commitment has already executed, so the
/// pending and invalid flags are constant.
pub fn shape_receipt(
    signature: &str,
    network: Network,
    data: &EncodedConfirmedTransactionWithStatusMeta,
) -> TransactionReceipt {
    let meta = data.transaction.meta.as_ref();
    let status_ok = meta.map(|m| m.status.is_ok());

    TransactionReceipt {
        from: fee_payer(&data.transaction.transaction).unwrap_or_default(),
        date: data
            .block_time
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        gas_cost_crypto_currency: NATIVE_CURRENCY.to_string(),
        gas_cost_in_crypto: meta.map(|m| m.fee).unwrap_or(0),
        gas_limit: meta
            .and_then(|m| Option::<u64>::from(m.compute_units_consumed.clone()))
            .unwrap_or(0),
        is_pending: false,
        is_executed: true,
        is_successful: status_ok == Some(true),
        is_failed: status_ok == Some(false),
        is_invalid: false,
        network: network.identifier().to_string(),
        nonce: 0,
        transaction_hash: signature.to_string(),
        transaction_link: network.config().transaction_link(signature),
    }
}

/// First account key of the message, which is the fee payer.
fn fee_payer(transaction: &EncodedTransaction) -> Option<String> {
    match transaction {
        EncodedTransaction::Json(ui) => match &ui.message {
            UiMessage::Raw(raw) => raw.account_keys.first().cloned(),
            UiMessage::Parsed(parsed) => parsed.account_keys.first().map(|k| k.pubkey.clone()),
        },
        other => other
            .decode()
            .and_then(|tx| tx.message.static_account_keys().first().map(|k| k.to_string())),
    }
}

/// Open a fresh client for a network.
pub async fn connect(network: Network) -> Result<SolanaClient, SolanaClientError> {
    SolanaClient::new(network).await
}

/// Get the SOL balance of `owner`, or its balance of `token_mint` when given.
pub async fn get_balance(
    network: Network,
    owner: &str,
    token_mint: Option<&str>,
) -> Result<f64, SolanaClientError> {
    connect(network).await?.get_balance(owner, token_mint).await
}

/// Look up a transaction by signature.
pub async fn get_transaction(
    signature: &str,
    network: Network,
) -> Result<Option<TransactionLookup>, SolanaClientError> {
    connect(network).await?.get_transaction(signature).await
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, thiserror::Error)]
pub enum SolanaClientError {
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    #[error("Network mismatch: client is bound to {client}, request targets {request}")]
    NetworkMismatch { client: Network, request: Network },

    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid transaction signature: {0}")]
    InvalidSignature(String),

    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("No token account for mint {mint} owned by {owner}")]
    AccountNotFound { owner: String, mint: String },

    #[error("RPC error: {0}")]
    TransportFailure(String),

    #[error("Failed to build transaction: {0}")]
    TransactionBuild(String),

    #[error("Transaction {signature} was submitted but not confirmed: {reason}")]
    UnconfirmedSubmission { signature: String, reason: String },
}

impl From<ClientError> for SolanaClientError {
    fn from(err: ClientError) -> Self {
        SolanaClientError::TransportFailure(err.to_string())
    }
}
