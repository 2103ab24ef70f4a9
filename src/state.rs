// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use crate::{
    blockchain::{Network, SolanaClient, SolanaClientError},
    config::Config,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// One RPC client per network, created on first use and kept for the
    /// life of the process.
    clients: Arc<RwLock<HashMap<Network, SolanaClient>>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            clients: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get the shared client for a network, connecting on first use.
    pub async fn client(&self, network: Network) -> Result<SolanaClient, SolanaClientError> {
        if let Some(client) = self.clients.read().await.get(&network) {
            return Ok(client.clone());
        }

        let mut clients = self.clients.write().await;
        if let Some(client) = clients.get(&network) {
            return Ok(client.clone());
        }

        let client = SolanaClient::with_url(network, self.config.rpc_url(network)).await?;
        tracing::info!(%network, url = self.config.rpc_url(network), "RPC client created");
        clients.insert(network, client.clone());
        Ok(client)
    }

    /// Register a pre-built client, replacing any cached one.
    pub async fn insert_client(&self, client: SolanaClient) {
        self.clients.write().await.insert(client.network(), client);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use solana_client::nonblocking::rpc_client::RpcClient;

    use super::*;

    #[tokio::test]
    async fn client_is_created_once_per_network() {
        let state = AppState::default();

        let first = state.client(Network::Devnet).await.unwrap();
        let second = state.client(Network::Devnet).await.unwrap();
        assert!(std::ptr::eq(first.rpc(), second.rpc()));

        let mainnet = state.client(Network::Mainnet).await.unwrap();
        assert_eq!(mainnet.network(), Network::Mainnet);
        assert!(!std::ptr::eq(first.rpc(), mainnet.rpc()));
    }

    #[tokio::test]
    async fn inserted_client_is_reused() {
        let state = AppState::default();
        let mock = SolanaClient::with_rpc(
            Network::Devnet,
            RpcClient::new_mock("succeeds".to_string()),
        );
        state.insert_client(mock.clone()).await;

        let client = state.client(Network::Devnet).await.unwrap();
        assert!(std::ptr::eq(client.rpc(), mock.rpc()));
    }
}
