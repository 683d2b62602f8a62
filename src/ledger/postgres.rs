//! PostgreSQL ledger store
//!
//! A unit of work is a `sqlx` transaction. `UPDATE accounts` takes the row
//! lock, held until COMMIT/ROLLBACK. Dropping an uncommitted
//! `sqlx::Transaction` issues a ROLLBACK, which covers cancelled requests.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use super::error::StoreError;
use super::models::{Account, Entry, Transfer};
use super::store::{LedgerStore, UnitOfWork};
use crate::core_types::{AccountId, EntryId, TransferId};

const ACCOUNT_COLUMNS: &str = "id, owner, balance, currency, created_at";

/// Ledger store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    type Unit = PgUnit;

    async fn begin_unit(&self) -> Result<PgUnit, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(PgUnit { tx })
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {} FROM accounts WHERE id = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    async fn get_transfer(&self, id: TransferId) -> Result<Option<Transfer>, StoreError> {
        let transfer = sqlx::query_as::<_, Transfer>(
            r#"SELECT id, from_account_id, to_account_id, amount, created_at
               FROM transfers WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(transfer)
    }

    async fn get_entry(&self, id: EntryId) -> Result<Option<Entry>, StoreError> {
        let entry = sqlx::query_as::<_, Entry>(
            "SELECT id, account_id, amount, created_at FROM entries WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }
}

/// Open PostgreSQL transaction
pub struct PgUnit {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnit {
    async fn insert_transfer(
        &mut self,
        from_account_id: AccountId,
        to_account_id: AccountId,
        amount: Decimal,
    ) -> Result<Transfer, StoreError> {
        let transfer = sqlx::query_as::<_, Transfer>(
            r#"INSERT INTO transfers (from_account_id, to_account_id, amount)
               VALUES ($1, $2, $3)
               RETURNING id, from_account_id, to_account_id, amount, created_at"#,
        )
        .bind(from_account_id)
        .bind(to_account_id)
        .bind(amount)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(transfer)
    }

    async fn insert_entry(
        &mut self,
        account_id: AccountId,
        amount: Decimal,
    ) -> Result<Entry, StoreError> {
        let entry = sqlx::query_as::<_, Entry>(
            r#"INSERT INTO entries (account_id, amount)
               VALUES ($1, $2)
               RETURNING id, account_id, amount, created_at"#,
        )
        .bind(account_id)
        .bind(amount)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(entry)
    }

    async fn apply_balance_delta(
        &mut self,
        account_id: AccountId,
        delta: Decimal,
    ) -> Result<Account, StoreError> {
        // Debits only apply while the balance stays non-negative
        let updated = sqlx::query_as::<_, Account>(&format!(
            r#"UPDATE accounts SET balance = balance + $2::numeric
               WHERE id = $1 AND ($2::numeric >= 0 OR balance + $2::numeric >= 0)
               RETURNING {}"#,
            ACCOUNT_COLUMNS
        ))
        .bind(account_id)
        .bind(delta)
        .fetch_optional(&mut *self.tx)
        .await?;

        if let Some(account) = updated {
            return Ok(account);
        }

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM accounts WHERE id = $1")
            .bind(account_id)
            .fetch_optional(&mut *self.tx)
            .await?;

        match exists {
            Some(_) => Err(StoreError::InsufficientFunds { account_id }),
            None => Err(StoreError::NotFound(format!("account {}", account_id))),
        }
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
