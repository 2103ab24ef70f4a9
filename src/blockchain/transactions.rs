// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction building, submission and confirmation for Solana.
//!
//! A transfer goes through BUILD, SIGN, SUBMIT and CONFIRM. Submission and
//! confirmation are exposed separately ([`SolanaClient::submit_transfer`],
//! [`SolanaClient::poll_confirmation`]) for callers that want to poll on
//! their own schedule; [`SolanaClient::send_transfer`] chains them.

use std::time::Duration;

use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_sdk::{
    commitment_config::{CommitmentConfig, CommitmentLevel},
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    system_instruction,
    transaction::Transaction,
};
use solana_transaction_status::{
    TransactionConfirmationStatus, TransactionStatus, UiTransactionEncoding,
};
use tokio::time::{sleep, Instant};

use super::client::{SolanaClient, SolanaClientError};
use super::signing::{keypair_from_secret, parse_pubkey, parse_signature};
use super::token::{resolve_associated_account, transfer_instruction};
use super::types::*;

/// Default time to wait for `confirmed` commitment after submission.
pub const DEFAULT_CONFIRM_TIMEOUT: Duration = Duration::from_secs(30);

/// Delay between signature status polls.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

impl From<&TransactionStatus> for Confirmation {
    fn from(status: &TransactionStatus) -> Self {
        let confirmation_status = status.confirmation_status.as_ref().map(|s| {
            let label = match s {
                TransactionConfirmationStatus::Processed => "processed",
                TransactionConfirmationStatus::Confirmed => "confirmed",
                TransactionConfirmationStatus::Finalized => "finalized",
            };
            label.to_string()
        });

        Confirmation {
            slot: status.slot,
            confirmations: status.confirmations,
            err: status.err.as_ref().map(|e| e.to_string()),
            confirmation_status,
        }
    }
}

impl SolanaClient {
    /// Build the instructions for a transfer (BUILD).
    ///
    /// Token transfers prepend idempotent creation of the sender's and
    /// recipient's associated token accounts when they are missing; the
    /// sender pays for them.
    pub async fn build_transfer_instructions(
        &self,
        sender: &Pubkey,
        recipient: &Pubkey,
        amount: f64,
        decimals: u8,
        token_mint: Option<&str>,
    ) -> Result<Vec<Instruction>, SolanaClientError> {
        let Some(mint) = token_mint else {
            let lamports = amount_to_base_units(amount, SOL_DECIMALS)?;
            return Ok(vec![system_instruction::transfer(sender, recipient, lamports)]);
        };

        let mint = parse_pubkey(mint)?;
        let base_units = amount_to_base_units(amount, decimals)?;

        let mut instructions = Vec::with_capacity(3);
        let (source, create_source) =
            resolve_associated_account(self.rpc(), sender, sender, &mint).await?;
        let (destination, create_destination) =
            resolve_associated_account(self.rpc(), sender, recipient, &mint).await?;
        instructions.extend(create_source);
        instructions.extend(create_destination);
        instructions.push(transfer_instruction(&source, &destination, sender, base_units)?);

        Ok(instructions)
    }

    /// Build, sign and submit a transfer (BUILD, SIGN, SUBMIT).
    ///
    /// The returned signature says nothing about finality.
    pub async fn submit_transfer(
        &self,
        request: &TransferRequest,
    ) -> Result<SubmittedTransfer, SolanaClientError> {
        if request.network != self.network() {
            return Err(SolanaClientError::NetworkMismatch {
                client: self.network(),
                request: request.network,
            });
        }

        let sender = keypair_from_secret(&request.private_key)?;
        let recipient = parse_pubkey(&request.to)?;
        let instructions = self
            .build_transfer_instructions(
                &sender.pubkey(),
                &recipient,
                request.amount,
                request.decimals,
                request.token_mint.as_deref(),
            )
            .await?;

        let signature = self.sign_and_send(&sender, &instructions).await?;
        tracing::info!(
            %signature,
            from = %sender.pubkey(),
            to = %recipient,
            amount = request.amount,
            mint = request.token_mint.as_deref().unwrap_or("native"),
            network = %self.network(),
            "transfer submitted"
        );

        Ok(SubmittedTransfer {
            signature,
            from: sender.pubkey().to_string(),
            to: request.to.clone(),
            amount: request.amount,
            network: self.network(),
        })
    }

    /// Internal helper to sign instructions and submit them as one transaction.
    async fn sign_and_send(
        &self,
        payer: &Keypair,
        instructions: &[Instruction],
    ) -> Result<String, SolanaClientError> {
        let blockhash = self.rpc().get_latest_blockhash().await?;
        let transaction =
            Transaction::new_signed_with_payer(instructions, Some(&payer.pubkey()), &[payer], blockhash);

        let config = RpcSendTransactionConfig {
            preflight_commitment: Some(CommitmentLevel::Confirmed),
            encoding: Some(UiTransactionEncoding::Base64),
            ..RpcSendTransactionConfig::default()
        };
        let signature = self
            .rpc()
            .send_transaction_with_config(&transaction, config)
            .await?;

        Ok(signature.to_string())
    }

    /// Check once whether a signature reached `confirmed` commitment.
    ///
    /// Returns `Ok(None)` while the node has not seen it at that level.
    pub async fn poll_confirmation(
        &self,
        signature: &str,
    ) -> Result<Option<Confirmation>, SolanaClientError> {
        let sig = parse_signature(signature)?;
        let statuses = self.rpc().get_signature_statuses(&[sig]).await?;

        Ok(statuses
            .value
            .into_iter()
            .next()
            .flatten()
            .filter(|status| status.satisfies_commitment(CommitmentConfig::confirmed()))
            .map(|status| Confirmation::from(&status)))
    }

    /// Wait until a signature reaches `confirmed` commitment (CONFIRM).
    ///
    /// Fails with [`SolanaClientError::UnconfirmedSubmission`] once `timeout`
    /// elapses. The transaction may still land afterwards, so callers should
    /// poll again rather than resubmit.
    pub async fn wait_for_confirmation(
        &self,
        signature: &str,
        timeout: Duration,
    ) -> Result<Confirmation, SolanaClientError> {
        parse_signature(signature)?;
        let deadline = Instant::now() + timeout;
        let mut last_error = None;

        loop {
            match self.poll_confirmation(signature).await {
                Ok(Some(confirmation)) => {
                    if let Some(err) = &confirmation.err {
                        tracing::warn!(signature, error = %err, "transaction confirmed with error");
                    } else {
                        tracing::info!(signature, slot = confirmation.slot, "transaction confirmed");
                    }
                    return Ok(confirmation);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(signature, error = %e, "signature status poll failed");
                    last_error = Some(e.to_string());
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(SolanaClientError::UnconfirmedSubmission {
                    signature: signature.to_string(),
                    reason: last_error.unwrap_or_else(|| {
                        format!("not confirmed after {}ms", timeout.as_millis())
                    }),
                });
            }
            sleep(POLL_INTERVAL.min(deadline - now)).await;
        }
    }

    /// Submit a transfer and block until it is confirmed.
    ///
    /// A transaction that lands but fails on-chain still reaches `confirmed`
    /// and yields `Ok`; its error is in `transaction_receipt.err`. Check
    /// [`TransferReceipt::succeeded`] before treating the funds as moved.
    pub async fn send_transfer(
        &self,
        request: &TransferRequest,
        timeout: Duration,
    ) -> Result<TransferReceipt, SolanaClientError> {
        let submitted = self.submit_transfer(request).await?;
        let confirmation = self
            .wait_for_confirmation(&submitted.signature, timeout)
            .await?;

        Ok(submitted.into_receipt(confirmation))
    }
}

/// Send SOL or an SPL token and wait for confirmation.
pub async fn send_transaction(request: TransferRequest) -> Result<TransferReceipt, SolanaClientError> {
    let client = SolanaClient::new(request.network).await?;
    client.send_transfer(&request, DEFAULT_CONFIRM_TIMEOUT).await
}

/// Convert a human amount to base units without floating point drift.
///
/// The float is rendered with its shortest round-trip representation and
/// parsed as a decimal string, so `0.1` SOL is exactly 100_000_000 lamports.
pub fn amount_to_base_units(amount: f64, decimals: u8) -> Result<u64, SolanaClientError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(SolanaClientError::InvalidAmount(format!(
            "amount must be a positive number, got {}",
            amount
        )));
    }

    parse_amount(&amount.to_string(), decimals)
}

/// Parse a human-readable amount to base units.
///
/// # Arguments
/// * `amount` - Amount as a string (e.g., "1.5")
/// * `decimals` - Number of decimals (9 for SOL, 6 for USDC)
///
/// # Returns
/// * `Ok(u64)` - Amount in smallest unit
/// * `Err` - If parsing fails or the value does not fit
pub fn parse_amount(amount: &str, decimals: u8) -> Result<u64, SolanaClientError> {
    let parts: Vec<&str> = amount.trim().split('.').collect();

    if parts.len() > 2 || parts[0].is_empty() {
        return Err(SolanaClientError::InvalidAmount(format!(
            "Invalid amount format: {}",
            amount
        )));
    }

    let whole = parts[0]
        .parse::<u64>()
        .map_err(|_| SolanaClientError::InvalidAmount("Invalid whole number".to_string()))?;

    let decimal_part = if parts.len() == 2 {
        let dec_str = parts[1];
        if dec_str.len() > decimals as usize {
            return Err(SolanaClientError::InvalidAmount(format!(
                "Too many decimal places (max {})",
                decimals
            )));
        }
        if dec_str.is_empty() {
            0u64
        } else {
            // Pad with zeros to match decimals
            let padded = format!("{:0<width$}", dec_str, width = decimals as usize);
            padded
                .parse::<u64>()
                .map_err(|_| SolanaClientError::InvalidAmount("Invalid decimal".to_string()))?
        }
    } else {
        0u64
    };

    let multiplier = 10u64
        .checked_pow(decimals as u32)
        .ok_or_else(|| SolanaClientError::InvalidAmount("Too many decimals".to_string()))?;
    whole
        .checked_mul(multiplier)
        .and_then(|w| w.checked_add(decimal_part))
        .ok_or_else(|| SolanaClientError::InvalidAmount("Amount overflow".to_string()))
}
