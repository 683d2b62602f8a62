//! Ledger rows: accounts, entries and transfers

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::core_types::{AccountId, EntryId, TransferId};

/// Account with its current balance
///
/// The balance is the sum of every entry posted against the account. It is
/// only ever changed by a balance delta inside a unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Account {
    #[schema(example = 1)]
    pub id: AccountId,
    #[schema(example = "alice")]
    pub owner: String,
    #[schema(value_type = String, example = "1000.00")]
    pub balance: Decimal,
    #[schema(example = "USD")]
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

/// Immutable balance change of a single account
///
/// Negative amount = debit, positive amount = credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Entry {
    pub id: EntryId,
    pub account_id: AccountId,
    #[schema(value_type = String, example = "-10.00")]
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Immutable record of a completed money movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Transfer {
    pub id: TransferId,
    pub from_account_id: AccountId,
    pub to_account_id: AccountId,
    /// Always positive
    #[schema(value_type = String, example = "10.00")]
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Input of a single transfer transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferTxParams {
    pub from_account_id: AccountId,
    pub to_account_id: AccountId,
    pub amount: Decimal,
}

impl TransferTxParams {
    pub fn new(from_account_id: AccountId, to_account_id: AccountId, amount: Decimal) -> Self {
        Self {
            from_account_id,
            to_account_id,
            amount,
        }
    }
}

/// Everything one transfer transaction wrote
///
/// `from_account` / `to_account` are the post-update snapshots, always keyed
/// by the caller's direction regardless of the order the rows were locked in.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferTxResult {
    pub transfer: Transfer,
    pub from_account: Account,
    pub to_account: Account,
    pub from_entry: Entry,
    pub to_entry: Entry,
}
