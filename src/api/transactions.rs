// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction endpoints for lookups and transfers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    blockchain::{Confirmation, TransactionLookup, TransferReceipt, TransferRequest},
    error::ApiError,
    state::AppState,
};

use super::{parse_network, LinkResponse};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Request to send SOL or an SPL token from the service wallet.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendTransferRequest {
    /// Recipient address
    pub to: String,
    /// Amount in human units (e.g. 0.5)
    pub amount: f64,
    /// Token decimals; required with `tokenMint`
    #[serde(default)]
    pub decimals: Option<u8>,
    /// SPL token mint. Omit to send SOL.
    #[serde(default)]
    pub token_mint: Option<String>,
}

/// Confirmation status of a submitted transfer.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransferStatusResponse {
    /// Transaction signature
    pub signature: String,
    /// Whether `confirmed` commitment was reached
    pub confirmed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<Confirmation>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Look up a transaction by signature.
#[utoipa::path(
    get,
    path = "/v1/networks/{network}/transactions/{signature}",
    tag = "Transactions",
    params(
        ("network" = String, Path, description = "`main` or `testnet`"),
        ("signature" = String, Path, description = "Transaction signature")
    ),
    responses(
        (status = 200, description = "Transaction found", body = TransactionLookup),
        (status = 400, description = "Unknown network or malformed signature"),
        (status = 404, description = "Transaction not found"),
        (status = 503, description = "Blockchain network unavailable")
    )
)]
pub async fn get_transaction(
    State(state): State<AppState>,
    Path((network, signature)): Path<(String, String)>,
) -> Result<Json<TransactionLookup>, ApiError> {
    let network = parse_network(&network)?;
    let client = state.client(network).await?;

    client
        .get_transaction(&signature)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Transaction {} not found", signature)))
}

/// Get the block explorer link for a transaction.
#[utoipa::path(
    get,
    path = "/v1/networks/{network}/transactions/{signature}/link",
    tag = "Transactions",
    params(
        ("network" = String, Path, description = "`main` or `testnet`"),
        ("signature" = String, Path, description = "Transaction signature")
    ),
    responses(
        (status = 200, description = "Explorer link", body = LinkResponse),
        (status = 400, description = "Unknown network")
    )
)]
pub async fn transaction_link(
    Path((network, signature)): Path<(String, String)>,
) -> Result<Json<LinkResponse>, ApiError> {
    let network = parse_network(&network)?;
    Ok(Json(LinkResponse {
        url: network.config().transaction_link(&signature),
    }))
}

/// Send SOL or an SPL token from the service wallet and wait for confirmation.
///
/// A 504 means the transaction was submitted but not confirmed in time. Poll
/// the status endpoint with the signature in the message instead of retrying.
#[utoipa::path(
    post,
    path = "/v1/networks/{network}/transfers",
    tag = "Transactions",
    params(("network" = String, Path, description = "`main` or `testnet`")),
    request_body = SendTransferRequest,
    responses(
        (status = 200, description = "Transfer confirmed", body = TransferReceipt),
        (status = 400, description = "Invalid request"),
        (status = 503, description = "Transfers disabled or network unavailable"),
        (status = 504, description = "Submitted but not confirmed")
    )
)]
pub async fn send_transfer(
    State(state): State<AppState>,
    Path(network): Path<String>,
    Json(request): Json<SendTransferRequest>,
) -> Result<Json<TransferReceipt>, ApiError> {
    let network = parse_network(&network)?;
    let Some(private_key) = state.config.transfer_secret_key.clone() else {
        return Err(ApiError::service_unavailable(
            "Transfers are disabled: no signing key configured",
        ));
    };

    let decimals = match (&request.token_mint, request.decimals) {
        (Some(_), None) => {
            return Err(ApiError::bad_request(
                "decimals is required for token transfers",
            ))
        }
        (_, decimals) => decimals.unwrap_or(0),
    };

    let transfer = TransferRequest {
        to: request.to,
        amount: request.amount,
        network,
        decimals,
        private_key,
        token_mint: request.token_mint,
    };

    let client = state.client(network).await?;
    let receipt = client
        .send_transfer(&transfer, state.config.confirm_timeout)
        .await?;

    Ok(Json(receipt))
}

/// Check whether a submitted transfer reached `confirmed` commitment.
#[utoipa::path(
    get,
    path = "/v1/networks/{network}/transfers/{signature}/status",
    tag = "Transactions",
    params(
        ("network" = String, Path, description = "`main` or `testnet`"),
        ("signature" = String, Path, description = "Transaction signature")
    ),
    responses(
        (status = 200, description = "Status retrieved", body = TransferStatusResponse),
        (status = 400, description = "Unknown network or malformed signature"),
        (status = 503, description = "Blockchain network unavailable")
    )
)]
pub async fn transfer_status(
    State(state): State<AppState>,
    Path((network, signature)): Path<(String, String)>,
) -> Result<Json<TransferStatusResponse>, ApiError> {
    let network = parse_network(&network)?;
    let client = state.client(network).await?;

    let confirmation = client.poll_confirmation(&signature).await?;

    Ok(Json(TransferStatusResponse {
        signature,
        confirmed: confirmation.is_some(),
        confirmation,
    }))
}
