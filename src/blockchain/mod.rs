// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain integration module for Solana.
//!
//! This module provides functionality for:
//! - Explorer links and wallet address validation
//! - Querying native SOL and SPL token balances
//! - Transaction lookup with receipt shaping
//! - Transfer signing, submission and confirmation

pub mod client;
pub mod signing;
pub mod token;
pub mod transactions;
pub mod types;

pub use client::{connect, get_balance, get_transaction, SolanaClient, SolanaClientError};
pub use signing::{is_valid_wallet_address, keypair_from_secret};
pub use transactions::{
    amount_to_base_units, parse_amount, send_transaction, DEFAULT_CONFIRM_TIMEOUT,
};
pub use types::*;
