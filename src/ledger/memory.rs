//! In-memory ledger store
//!
//! Substitute for PostgreSQL in tests. It keeps the properties the transfer
//! coordinator relies on:
//!
//! - **Row locks**: each account has a `tokio::sync::Mutex`; a unit takes it
//!   on its first balance delta for that account and holds it until the unit
//!   ends. Acquiring two rows in opposite orders deadlocks here exactly as it
//!   would against Postgres.
//! - **Staged writes**: inserts and deltas stay in the unit until `commit`.
//!   Rollback and drop discard them.
//! - **Foreign keys and the debit guard** behave like the SQL schema.
//! - **Failure injection**: [`MemoryLedgerStore::fail_on`] makes the n-th call
//!   of an operation inside every unit fail.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::OwnedMutexGuard;

use super::error::{ConstraintKind, StoreError};
use super::models::{Account, Entry, Transfer};
use super::store::{LedgerStore, UnitOfWork};
use crate::core_types::{AccountId, EntryId, TransferId};

/// Store operation, used to target injected failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    BeginUnit,
    InsertTransfer,
    InsertEntry,
    ApplyBalanceDelta,
    Commit,
    Rollback,
}

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<AccountId, Account>,
    transfers: BTreeMap<TransferId, Transfer>,
    entries: BTreeMap<EntryId, Entry>,
}

struct Inner {
    tables: Mutex<Tables>,
    row_locks: Mutex<HashMap<AccountId, Arc<tokio::sync::Mutex<()>>>>,
    /// (operation, 1-based call number within a unit)
    failures: Mutex<Vec<(StoreOp, usize)>>,
    next_account_id: AtomicI64,
    next_transfer_id: AtomicI64,
    next_entry_id: AtomicI64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Inner {
    fn check_failure(&self, op: StoreOp, call: usize) -> Result<(), StoreError> {
        if lock(&self.failures).contains(&(op, call)) {
            return Err(StoreError::Injected(format!("{:?} call #{}", op, call)));
        }
        Ok(())
    }

    fn account_exists(&self, id: AccountId) -> bool {
        lock(&self.tables).accounts.contains_key(&id)
    }

    fn row_lock(&self, id: AccountId) -> Arc<tokio::sync::Mutex<()>> {
        lock(&self.row_locks).entry(id).or_default().clone()
    }
}

/// In-memory ledger store (cheap to clone, clones share state)
#[derive(Clone)]
pub struct MemoryLedgerStore {
    inner: Arc<Inner>,
}

impl Default for MemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                tables: Mutex::new(Tables::default()),
                row_locks: Mutex::new(HashMap::new()),
                failures: Mutex::new(Vec::new()),
                next_account_id: AtomicI64::new(1),
                next_transfer_id: AtomicI64::new(1),
                next_entry_id: AtomicI64::new(1),
            }),
        }
    }

    /// Seed an account with an opening balance
    pub fn open_account(&self, owner: &str, currency: &str, balance: Decimal) -> Account {
        let account = Account {
            id: self.inner.next_account_id.fetch_add(1, Ordering::SeqCst),
            owner: owner.to_string(),
            balance,
            currency: currency.to_string(),
            created_at: Utc::now(),
        };
        lock(&self.inner.tables)
            .accounts
            .insert(account.id, account.clone());
        account
    }

    /// Make the `call`-th `op` of every subsequent unit fail
    pub fn fail_on(&self, op: StoreOp, call: usize) {
        lock(&self.inner.failures).push((op, call));
    }

    pub fn clear_failures(&self) {
        lock(&self.inner.failures).clear();
    }

    pub fn transfer_count(&self) -> usize {
        lock(&self.inner.tables).transfers.len()
    }

    pub fn entry_count(&self) -> usize {
        lock(&self.inner.tables).entries.len()
    }

    /// Committed entries of one account, oldest first
    pub fn entries_for(&self, account_id: AccountId) -> Vec<Entry> {
        lock(&self.inner.tables)
            .entries
            .values()
            .filter(|e| e.account_id == account_id)
            .cloned()
            .collect()
    }

    /// Sum of all committed balances
    pub fn total_balance(&self) -> Decimal {
        lock(&self.inner.tables)
            .accounts
            .values()
            .map(|a| a.balance)
            .sum()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    type Unit = MemoryUnit;

    async fn begin_unit(&self) -> Result<MemoryUnit, StoreError> {
        self.inner.check_failure(StoreOp::BeginUnit, 1)?;
        Ok(MemoryUnit {
            inner: self.inner.clone(),
            transfers: Vec::new(),
            entries: Vec::new(),
            deltas: BTreeMap::new(),
            row_guards: HashMap::new(),
            calls: HashMap::new(),
        })
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(lock(&self.inner.tables).accounts.get(&id).cloned())
    }

    async fn get_transfer(&self, id: TransferId) -> Result<Option<Transfer>, StoreError> {
        Ok(lock(&self.inner.tables).transfers.get(&id).cloned())
    }

    async fn get_entry(&self, id: EntryId) -> Result<Option<Entry>, StoreError> {
        Ok(lock(&self.inner.tables).entries.get(&id).cloned())
    }
}

/// Open unit of work on a [`MemoryLedgerStore`]
pub struct MemoryUnit {
    inner: Arc<Inner>,
    transfers: Vec<Transfer>,
    entries: Vec<Entry>,
    deltas: BTreeMap<AccountId, Decimal>,
    row_guards: HashMap<AccountId, OwnedMutexGuard<()>>,
    calls: HashMap<StoreOp, usize>,
}

impl MemoryUnit {
    fn enter(&mut self, op: StoreOp) -> Result<(), StoreError> {
        let call = self.calls.entry(op).or_insert(0);
        *call += 1;
        self.inner.check_failure(op, *call)
    }

    fn require_account(&self, account_id: AccountId, table: &str) -> Result<(), StoreError> {
        if self.inner.account_exists(account_id) {
            Ok(())
        } else {
            Err(StoreError::ConstraintViolation {
                kind: ConstraintKind::ForeignKey,
                message: format!("{} references missing account {}", table, account_id),
            })
        }
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnit {
    async fn insert_transfer(
        &mut self,
        from_account_id: AccountId,
        to_account_id: AccountId,
        amount: Decimal,
    ) -> Result<Transfer, StoreError> {
        self.enter(StoreOp::InsertTransfer)?;
        self.require_account(from_account_id, "transfers")?;
        self.require_account(to_account_id, "transfers")?;
        if amount <= Decimal::ZERO {
            return Err(StoreError::ConstraintViolation {
                kind: ConstraintKind::Check,
                message: "transfer amount must be positive".to_string(),
            });
        }

        let transfer = Transfer {
            id: self.inner.next_transfer_id.fetch_add(1, Ordering::SeqCst),
            from_account_id,
            to_account_id,
            amount,
            created_at: Utc::now(),
        };
        self.transfers.push(transfer.clone());
        Ok(transfer)
    }

    async fn insert_entry(
        &mut self,
        account_id: AccountId,
        amount: Decimal,
    ) -> Result<Entry, StoreError> {
        self.enter(StoreOp::InsertEntry)?;
        self.require_account(account_id, "entries")?;

        let entry = Entry {
            id: self.inner.next_entry_id.fetch_add(1, Ordering::SeqCst),
            account_id,
            amount,
            created_at: Utc::now(),
        };
        self.entries.push(entry.clone());
        Ok(entry)
    }

    async fn apply_balance_delta(
        &mut self,
        account_id: AccountId,
        delta: Decimal,
    ) -> Result<Account, StoreError> {
        self.enter(StoreOp::ApplyBalanceDelta)?;
        if !self.inner.account_exists(account_id) {
            return Err(StoreError::NotFound(format!("account {}", account_id)));
        }

        if !self.row_guards.contains_key(&account_id) {
            // May suspend until the unit holding this row ends
            let guard = self.inner.row_lock(account_id).lock_owned().await;
            self.row_guards.insert(account_id, guard);
        }

        let committed = lock(&self.inner.tables)
            .accounts
            .get(&account_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("account {}", account_id)))?;

        let staged = self.deltas.get(&account_id).copied().unwrap_or_default();
        let balance = committed.balance + staged + delta;
        if delta < Decimal::ZERO && balance < Decimal::ZERO {
            return Err(StoreError::InsufficientFunds { account_id });
        }

        self.deltas.insert(account_id, staged + delta);
        Ok(Account {
            balance,
            ..committed
        })
    }

    async fn commit(mut self) -> Result<(), StoreError> {
        self.enter(StoreOp::Commit)?;

        let mut tables = lock(&self.inner.tables);
        for (account_id, delta) in &self.deltas {
            if let Some(account) = tables.accounts.get_mut(account_id) {
                account.balance += *delta;
            }
        }
        for transfer in self.transfers.drain(..) {
            tables.transfers.insert(transfer.id, transfer);
        }
        for entry in self.entries.drain(..) {
            tables.entries.insert(entry.id, entry);
        }
        drop(tables);

        // Row locks released when `self` drops
        Ok(())
    }

    async fn rollback(mut self) -> Result<(), StoreError> {
        self.enter(StoreOp::Rollback)?;
        Ok(())
    }
}
