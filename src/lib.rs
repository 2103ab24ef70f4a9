// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Solana Wallet Helpers
//!
//! A thin layer over the Solana SDK for balance lookups, transaction
//! lookups, address validation and SOL / SPL token transfers on mainnet or
//! devnet. Usable directly as a library or through the bundled HTTP service.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `blockchain` - Solana integration (queries, transfers, explorer links)
//! - `config` - Environment configuration
//! - `state` - Shared per-network RPC clients

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod state;
