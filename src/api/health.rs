// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::blockchain::Network;
use crate::state::AppState;

/// Health check response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall health status ("ok" or "degraded").
    pub status: String,
    /// Individual health checks and their results.
    pub checks: HealthChecks,
}

/// Individual health check results.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Whether the service process is running.
    pub service: String,
    /// Mainnet RPC reachability.
    pub mainnet_rpc: String,
    /// Devnet RPC reachability.
    pub devnet_rpc: String,
    /// Whether the transfer endpoint has a signing key.
    pub transfers: String,
}

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Check that a network's RPC node answers.
async fn check_rpc(state: &AppState, network: Network) -> String {
    let client = match state.client(network).await {
        Ok(client) => client,
        Err(_) => return "misconfigured".to_string(),
    };

    match client.rpc().get_version().await {
        Ok(_) => "ok".to_string(),
        Err(e) => {
            tracing::warn!(%network, error = %e, "RPC health check failed");
            "unavailable".to_string()
        }
    }
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
/// Does not check dependencies - use readiness for that.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness probe handler.
///
/// Returns 200 only if both RPC nodes answer.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse),
        (status = 503, description = "Service is not ready", body = ReadyResponse)
    )
)]
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let mainnet_rpc = check_rpc(&state, Network::Mainnet).await;
    let devnet_rpc = check_rpc(&state, Network::Devnet).await;
    let all_ok = mainnet_rpc == "ok" && devnet_rpc == "ok";

    let transfers = if state.config.transfer_secret_key.is_some() {
        "enabled"
    } else {
        "disabled"
    };

    let response = ReadyResponse {
        status: if all_ok { "ok" } else { "degraded" }.to_string(),
        checks: HealthChecks {
            service: "ok".to_string(),
            mainnet_rpc,
            devnet_rpc,
            transfers: transfers.to_string(),
        },
    };

    let status = if all_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
