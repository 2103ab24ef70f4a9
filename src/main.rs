// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;

use solana_wallet_helpers::{
    api::router,
    blockchain::keypair_from_secret,
    config::{Config, LogFormat, DEFAULT_LOG_FILTER},
    state::AppState,
};
use solana_sdk::signature::Signer;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[tokio::main]
async fn main() {
    let config = Config::from_env().expect("Invalid configuration");
    init_tracing(config.log_format);

    // Fail at startup rather than on the first transfer request
    if let Some(secret) = &config.transfer_secret_key {
        let signer = keypair_from_secret(secret).expect("TRANSFER_SECRET_KEY is not a valid keypair");
        tracing::info!(signer = %signer.pubkey(), "transfers enabled");
    } else {
        tracing::info!("transfers disabled: TRANSFER_SECRET_KEY not set");
    }

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");

    let state = AppState::new(config);
    let app = router(state);

    tracing::info!("Solana wallet helpers listening on http://{addr} (docs at /docs)");

    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
        .expect("HTTP server failed");
}
