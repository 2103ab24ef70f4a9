// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! SPL token account interactions.

use serde::Deserialize;
use solana_client::{nonblocking::rpc_client::RpcClient, rpc_response::RpcKeyedAccount};
use solana_sdk::{commitment_config::CommitmentConfig, instruction::Instruction, pubkey::Pubkey};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account_idempotent,
};

use super::client::SolanaClientError;

/// `tokenAmount` object of a `jsonParsed` token account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenAmount {
    /// Balance in the token's smallest unit
    #[serde(deserialize_with = "amount_from_str")]
    pub amount: u64,
    /// Number of decimals of the mint
    pub decimals: u8,
}

impl TokenAmount {
    /// Balance in token units.
    pub fn ui_amount(&self) -> f64 {
        self.amount as f64 / 10f64.powi(self.decimals as i32)
    }
}

fn amount_from_str<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

/// Extract the token amount from a `jsonParsed` keyed account.
pub fn token_amount(account: &RpcKeyedAccount) -> Result<TokenAmount, SolanaClientError> {
    let data = serde_json::to_value(&account.account.data)
        .map_err(|e| SolanaClientError::TransportFailure(e.to_string()))?;

    let amount = data.pointer("/parsed/info/tokenAmount").ok_or_else(|| {
        SolanaClientError::TransportFailure(format!(
            "token account {} is not jsonParsed",
            account.pubkey
        ))
    })?;

    serde_json::from_value(amount.clone())
        .map_err(|e| SolanaClientError::TransportFailure(format!("bad tokenAmount: {}", e)))
}

/// Balance of the first token account in `accounts`.
pub fn first_token_balance(
    accounts: &[RpcKeyedAccount],
    owner: &str,
    mint: &str,
) -> Result<f64, SolanaClientError> {
    let account = accounts
        .first()
        .ok_or_else(|| SolanaClientError::AccountNotFound {
            owner: owner.to_string(),
            mint: mint.to_string(),
        })?;

    Ok(token_amount(account)?.ui_amount())
}

/// Associated token account of `wallet` for `mint`, plus an instruction to
/// create it when it does not exist yet.
pub async fn resolve_associated_account(
    rpc: &RpcClient,
    payer: &Pubkey,
    wallet: &Pubkey,
    mint: &Pubkey,
) -> Result<(Pubkey, Option<Instruction>), SolanaClientError> {
    let address = get_associated_token_address(wallet, mint);
    let existing = rpc
        .get_account_with_commitment(&address, CommitmentConfig::confirmed())
        .await?
        .value;

    if existing.is_some() {
        return Ok((address, None));
    }

    tracing::info!(%wallet, %mint, %address, "associated token account missing, creating");
    let create = create_associated_token_account_idempotent(payer, wallet, mint, &spl_token::id());
    Ok((address, Some(create)))
}

/// Instruction moving `amount` base units between two token accounts.
pub fn transfer_instruction(
    source: &Pubkey,
    destination: &Pubkey,
    authority: &Pubkey,
    amount: u64,
) -> Result<Instruction, SolanaClientError> {
    spl_token::instruction::transfer(&spl_token::id(), source, destination, authority, &[], amount)
        .map_err(|e| SolanaClientError::TransactionBuild(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;
    use solana_client::rpc_request::RpcRequest;

    use super::*;

    fn keyed(data: serde_json::Value) -> RpcKeyedAccount {
        serde_json::from_value(json!({
            "pubkey": Pubkey::new_unique().to_string(),
            "account": {
                "lamports": 2_039_280,
                "data": data,
                "owner": spl_token::id().to_string(),
                "executable": false,
                "rentEpoch": 0
            }
        }))
        .unwrap()
    }

    fn parsed(amount: &str, decimals: u8) -> serde_json::Value {
        json!({
            "program": "spl-token",
            "parsed": {
                "type": "account",
                "info": { "tokenAmount": { "amount": amount, "decimals": decimals } }
            },
            "space": 165
        })
    }

    #[test]
    fn test_token_amount_parses() {
        let amount = token_amount(&keyed(parsed("2500000", 6))).unwrap();
        assert_eq!(amount, TokenAmount { amount: 2_500_000, decimals: 6 });
        assert_eq!(amount.ui_amount(), 2.5);
    }

    #[test]
    fn test_token_amount_rejects_binary_data() {
        let account = keyed(json!(["AAAA", "base64"]));
        assert!(matches!(
            token_amount(&account),
            Err(SolanaClientError::TransportFailure(_))
        ));
    }

    #[test]
    fn test_first_token_balance_empty() {
        let err = first_token_balance(&[], "owner", "mint").unwrap_err();
        assert!(matches!(err, SolanaClientError::AccountNotFound { .. }));
    }

    #[test]
    fn test_first_token_balance_ignores_later_accounts() {
        let accounts = vec![keyed(parsed("1", 0)), keyed(parsed("100", 0))];
        assert_eq!(first_token_balance(&accounts, "owner", "mint").unwrap(), 1.0);
    }

    #[test]
    fn test_transfer_instruction_targets_token_program() {
        let source = Pubkey::new_unique();
        let destination = Pubkey::new_unique();
        let authority = Pubkey::new_unique();

        let ix = transfer_instruction(&source, &destination, &authority, 42).unwrap();
        assert_eq!(ix.program_id, spl_token::id());
        assert_eq!(ix.accounts[0].pubkey, source);
        assert_eq!(ix.accounts[1].pubkey, destination);
        assert_eq!(ix.accounts[2].pubkey, authority);
        assert!(ix.accounts[2].is_signer);
    }

    fn mock_rpc(account: serde_json::Value) -> RpcClient {
        let mut mocks = HashMap::new();
        mocks.insert(
            RpcRequest::GetAccountInfo,
            json!({ "context": { "slot": 1 }, "value": account }),
        );
        RpcClient::new_mock_with_mocks("succeeds".to_string(), mocks)
    }

    #[tokio::test]
    async fn test_resolve_existing_associated_account() {
        let rpc = mock_rpc(json!({
            "lamports": 2_039_280,
            "data": ["", "base64"],
            "owner": spl_token::id().to_string(),
            "executable": false,
            "rentEpoch": 0
        }));
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let (address, create) = resolve_associated_account(&rpc, &payer, &payer, &mint)
            .await
            .unwrap();
        assert_eq!(address, get_associated_token_address(&payer, &mint));
        assert!(create.is_none());
    }

    #[tokio::test]
    async fn test_resolve_missing_associated_account() {
        let rpc = mock_rpc(serde_json::Value::Null);
        let payer = Pubkey::new_unique();
        let recipient = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let (address, create) = resolve_associated_account(&rpc, &payer, &recipient, &mint)
            .await
            .unwrap();
        assert_eq!(address, get_associated_token_address(&recipient, &mint));

        let create = create.expect("create instruction");
        assert_eq!(create.program_id, spl_associated_token_account::id());
        assert_eq!(create.accounts[0].pubkey, payer);
        assert_eq!(create.accounts[1].pubkey, address);
    }
}
