// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `SOLANA_MAINNET_RPC_URL` | Mainnet RPC endpoint override | `https://api.mainnet-beta.solana.com` |
//! | `SOLANA_DEVNET_RPC_URL` | Devnet RPC endpoint override | `https://api.devnet.solana.com` |
//! | `CONFIRM_TIMEOUT_SECS` | Seconds to wait for `confirmed` commitment | `30` |
//! | `TRANSFER_SECRET_KEY` | Base58 key used by the transfer endpoint | Unset (transfers disabled) |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{collections::HashMap, env, fmt, time::Duration};

use crate::blockchain::{Network, DEFAULT_CONFIRM_TIMEOUT};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the mainnet RPC endpoint override.
pub const MAINNET_RPC_URL_ENV: &str = "SOLANA_MAINNET_RPC_URL";

/// Environment variable name for the devnet RPC endpoint override.
pub const DEVNET_RPC_URL_ENV: &str = "SOLANA_DEVNET_RPC_URL";

pub const CONFIRM_TIMEOUT_ENV: &str = "CONFIRM_TIMEOUT_SECS";

/// Environment variable name for the transfer signing key.
///
/// The key never leaves the process: it is decoded per request and is
/// redacted from `Debug` output.
pub const TRANSFER_SECRET_KEY_ENV: &str = "TRANSFER_SECRET_KEY";

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Runtime configuration.
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// RPC endpoint overrides per network
    pub rpc_urls: HashMap<Network, String>,
    pub confirm_timeout: Duration,
    pub transfer_secret_key: Option<String>,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            rpc_urls: HashMap::new(),
            confirm_timeout: DEFAULT_CONFIRM_TIMEOUT,
            transfer_secret_key: None,
            log_format: LogFormat::Pretty,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("rpc_urls", &self.rpc_urls)
            .field("confirm_timeout", &self.confirm_timeout)
            .field(
                "transfer_secret_key",
                &self.transfer_secret_key.as_ref().map(|_| "<redacted>"),
            )
            .field("log_format", &self.log_format)
            .finish()
    }
}

/// Configuration errors raised at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid value: {value}")]
    InvalidValue { var: &'static str, value: String },

    #[error("{var} must be an http(s) URL: {value}")]
    InvalidUrl { var: &'static str, value: String },
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(host) = lookup(HOST_ENV) {
            config.host = host;
        }
        if let Some(port) = lookup(PORT_ENV) {
            config.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                var: PORT_ENV,
                value: port,
            })?;
        }

        for (network, var) in [
            (Network::Mainnet, MAINNET_RPC_URL_ENV),
            (Network::Devnet, DEVNET_RPC_URL_ENV),
        ] {
            if let Some(url) = lookup(var) {
                if !validate_url(&url) {
                    return Err(ConfigError::InvalidUrl { var, value: url });
                }
                config.rpc_urls.insert(network, url);
            }
        }

        if let Some(secs) = lookup(CONFIRM_TIMEOUT_ENV) {
            let parsed: u64 = secs.parse().map_err(|_| ConfigError::InvalidValue {
                var: CONFIRM_TIMEOUT_ENV,
                value: secs,
            })?;
            config.confirm_timeout = Duration::from_secs(parsed);
        }

        config.transfer_secret_key = lookup(TRANSFER_SECRET_KEY_ENV).filter(|k| !k.trim().is_empty());

        config.log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(config)
    }

    /// RPC endpoint for a network, honouring overrides.
    pub fn rpc_url(&self, network: Network) -> &str {
        self.rpc_urls
            .get(&network)
            .map(String::as_str)
            .unwrap_or(network.config().rpc_url)
    }
}

/// Validate that a URL is well-formed and uses HTTP or HTTPS.
pub fn validate_url(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            (scheme == "http" || scheme == "https") && parsed.host().is_some()
        }
        Err(_) => false,
    }
}
