// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet endpoints: address validation, balances and explorer links.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{blockchain::is_valid_wallet_address, error::ApiError, state::AppState};

use super::{parse_network, LinkResponse};

/// Query parameters for balance request.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BalanceQuery {
    /// SPL token mint. Omit for the native SOL balance.
    pub mint: Option<String>,
}

/// Balance response.
#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    /// Wallet address
    pub address: String,
    /// Network identifier
    pub network: String,
    /// Token mint (absent for SOL)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mint: Option<String>,
    /// Balance in SOL or token units
    pub balance: f64,
}

/// Address validity response.
#[derive(Debug, Serialize, ToSchema)]
pub struct AddressValidityResponse {
    pub address: String,
    /// Whether the address is an on-curve wallet key
    pub valid: bool,
}

/// Check whether an address is a valid Solana wallet address.
#[utoipa::path(
    get,
    path = "/v1/addresses/{address}/validity",
    tag = "Wallets",
    params(("address" = String, Path, description = "Base58 address")),
    responses(
        (status = 200, description = "Validity computed", body = AddressValidityResponse)
    )
)]
pub async fn address_validity(Path(address): Path<String>) -> Json<AddressValidityResponse> {
    let valid = is_valid_wallet_address(&address);
    Json(AddressValidityResponse { address, valid })
}

/// Get the SOL or SPL token balance of a wallet.
#[utoipa::path(
    get,
    path = "/v1/networks/{network}/wallets/{address}/balance",
    tag = "Wallets",
    params(
        ("network" = String, Path, description = "`main` or `testnet`"),
        ("address" = String, Path, description = "Wallet address"),
        BalanceQuery
    ),
    responses(
        (status = 200, description = "Balance retrieved successfully", body = BalanceResponse),
        (status = 400, description = "Unknown network or invalid address"),
        (status = 404, description = "No token account for the mint"),
        (status = 503, description = "Blockchain network unavailable")
    )
)]
pub async fn get_wallet_balance(
    State(state): State<AppState>,
    Path((network, address)): Path<(String, String)>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let network = parse_network(&network)?;
    let client = state.client(network).await?;

    let balance = client.get_balance(&address, query.mint.as_deref()).await?;

    Ok(Json(BalanceResponse {
        address,
        network: network.identifier().to_string(),
        mint: query.mint,
        balance,
    }))
}

/// Get the block explorer link for a wallet.
#[utoipa::path(
    get,
    path = "/v1/networks/{network}/wallets/{address}/link",
    tag = "Wallets",
    params(
        ("network" = String, Path, description = "`main` or `testnet`"),
        ("address" = String, Path, description = "Wallet address")
    ),
    responses(
        (status = 200, description = "Explorer link", body = LinkResponse),
        (status = 400, description = "Unknown network")
    )
)]
pub async fn wallet_link(
    Path((network, address)): Path<(String, String)>,
) -> Result<Json<LinkResponse>, ApiError> {
    let network = parse_network(&network)?;
    Ok(Json(LinkResponse {
        url: network.config().wallet_link(&address),
    }))
}
