// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    blockchain::{
        Confirmation, Network, TransactionLookup, TransactionReceipt, TransferReceipt,
    },
    error::ApiError,
    state::AppState,
};

pub mod health;
pub mod transactions;
pub mod wallets;

/// Block explorer link.
#[derive(Debug, Serialize, ToSchema)]
pub struct LinkResponse {
    pub url: String,
}

/// Parse a network path segment, rejecting unknown identifiers.
pub(crate) fn parse_network(raw: &str) -> Result<Network, ApiError> {
    raw.parse::<Network>().map_err(ApiError::from)
}

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route(
            "/addresses/{address}/validity",
            get(wallets::address_validity),
        )
        .route(
            "/networks/{network}/wallets/{address}/balance",
            get(wallets::get_wallet_balance),
        )
        .route(
            "/networks/{network}/wallets/{address}/link",
            get(wallets::wallet_link),
        )
        .route(
            "/networks/{network}/transactions/{signature}",
            get(transactions::get_transaction),
        )
        .route(
            "/networks/{network}/transactions/{signature}/link",
            get(transactions::transaction_link),
        )
        .route(
            "/networks/{network}/transfers",
            post(transactions::send_transfer),
        )
        .route(
            "/networks/{network}/transfers/{signature}/status",
            get(transactions::transfer_status),
        )
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::liveness,
        health::readiness,
        wallets::address_validity,
        wallets::get_wallet_balance,
        wallets::wallet_link,
        transactions::get_transaction,
        transactions::transaction_link,
        transactions::send_transfer,
        transactions::transfer_status
    ),
    components(
        schemas(
            LinkResponse,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks,
            wallets::AddressValidityResponse,
            wallets::BalanceResponse,
            transactions::SendTransferRequest,
            transactions::TransferStatusResponse,
            TransactionLookup,
            TransactionReceipt,
            TransferReceipt,
            Confirmation
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Wallets", description = "Address validation, balances and wallet links"),
        (name = "Transactions", description = "Transaction lookup and transfers")
    )
)]
struct ApiDoc;
