//! Transfer Error Types

use thiserror::Error;

use crate::core_types::{AccountId, EntryId, TransferId};
use crate::ledger::{StoreError, TransferTxError};

/// Transfer error types
///
/// Every variant is scoped to one request; none is fatal to the process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    // === Validation Errors ===
    #[error("Source and target account cannot be the same")]
    SameAccount,

    #[error("Amount must be greater than zero with at most 2 decimal places")]
    InvalidAmount,

    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    // === Account Errors ===
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Account {account_id} currency mismatch: {actual} vs {expected}")]
    CurrencyMismatch {
        account_id: AccountId,
        expected: String,
        actual: String,
    },

    #[error("Insufficient balance in account {0}")]
    InsufficientBalance(AccountId),

    // === Read-back Errors ===
    #[error("Transfer not found: {0}")]
    TransferNotFound(TransferId),

    #[error("Entry not found: {0}")]
    EntryNotFound(EntryId),

    // === System Errors ===
    #[error("Transaction failed: {0}")]
    Transaction(TransferTxError),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for TransferError {
    fn from(e: StoreError) -> Self {
        TransferError::Store(e)
    }
}

impl From<TransferTxError> for TransferError {
    fn from(e: TransferTxError) -> Self {
        match e {
            // Debit guard tripped by a concurrent transfer after the pre-check
            TransferTxError::Store(StoreError::InsufficientFunds { account_id }) => {
                TransferError::InsufficientBalance(account_id)
            }
            other => TransferError::Transaction(other),
        }
    }
}

impl TransferError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::SameAccount => "SAME_ACCOUNT",
            TransferError::InvalidAmount => "INVALID_AMOUNT",
            TransferError::UnsupportedCurrency(_) => "UNSUPPORTED_CURRENCY",
            TransferError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            TransferError::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            TransferError::InsufficientBalance(_) => "INSUFFICIENT_BALANCE",
            TransferError::TransferNotFound(_) => "TRANSFER_NOT_FOUND",
            TransferError::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            TransferError::Transaction(_) => "TRANSACTION_FAILED",
            TransferError::Store(_) => "DATABASE_ERROR",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            TransferError::SameAccount
            | TransferError::InvalidAmount
            | TransferError::UnsupportedCurrency(_)
            | TransferError::CurrencyMismatch { .. }
            | TransferError::InsufficientBalance(_) => 400,
            TransferError::AccountNotFound(_)
            | TransferError::TransferNotFound(_)
            | TransferError::EntryNotFound(_) => 404,
            TransferError::Transaction(e) => store_status(e.cause()),
            TransferError::Store(e) => store_status(e),
        }
    }
}

fn store_status(e: &StoreError) -> u16 {
    match e {
        StoreError::InsufficientFunds { .. } => 400,
        StoreError::NotFound(_) => 404,
        _ => 500,
    }
}
