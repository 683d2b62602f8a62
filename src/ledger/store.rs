//! Ledger store abstraction
//!
//! The transfer coordinator only sees these two traits. A store hands out
//! units of work; every mutation happens inside one, and a unit is either
//! committed as a whole or discarded as a whole.
//!
//! # Unit of work rules
//!
//! 1. **Row locks**: `apply_balance_delta` locks the account row until the
//!    unit ends. Callers touching two accounts MUST go through
//!    [`LockOrder`](super::lock_order::LockOrder).
//! 2. **Drop = rollback**: a unit dropped without `commit` leaves no trace.
//!    This is what makes cancelling an in-flight transfer safe.
//! 3. **Debit guard**: a negative delta that would take the balance below
//!    zero fails with `StoreError::InsufficientFunds`.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::error::StoreError;
use super::models::{Account, Entry, Transfer};
use crate::core_types::{AccountId, EntryId, TransferId};

/// Factory of units of work plus committed-state reads
#[async_trait]
pub trait LedgerStore: Send + Sync {
    type Unit: UnitOfWork;

    /// Open a new atomic unit of work
    async fn begin_unit(&self) -> Result<Self::Unit, StoreError>;

    /// Read committed account state (outside any unit of work)
    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    async fn get_transfer(&self, id: TransferId) -> Result<Option<Transfer>, StoreError>;

    async fn get_entry(&self, id: EntryId) -> Result<Option<Entry>, StoreError>;
}

/// One open atomic unit of work
#[async_trait]
pub trait UnitOfWork: Send + Sized {
    async fn insert_transfer(
        &mut self,
        from_account_id: AccountId,
        to_account_id: AccountId,
        amount: Decimal,
    ) -> Result<Transfer, StoreError>;

    async fn insert_entry(
        &mut self,
        account_id: AccountId,
        amount: Decimal,
    ) -> Result<Entry, StoreError>;

    /// Add `delta` to the balance and return the post-update snapshot
    async fn apply_balance_delta(
        &mut self,
        account_id: AccountId,
        delta: Decimal,
    ) -> Result<Account, StoreError>;

    async fn commit(self) -> Result<(), StoreError>;

    async fn rollback(self) -> Result<(), StoreError>;
}
