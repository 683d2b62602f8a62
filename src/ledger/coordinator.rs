//! Transfer Transaction Coordinator
//!
//! Runs one money transfer as a single unit of work:
//!
//! ```text
//! BEGIN
//!   INSERT transfer (from, to, amount)
//!   INSERT entry    (from, -amount)
//!   INSERT entry    (to,   +amount)
//!   UPDATE balance  lower account id   ─┐ LockOrder
//!   UPDATE balance  higher account id  ─┘
//! COMMIT                 (any failure -> ROLLBACK)
//! ```
//!
//! The coordinator trusts its inputs: distinct accounts, positive amount and
//! matching currency are checked by the caller. It keeps no shared state of
//! its own; consistency comes from the store's unit of work and row locks.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::error::{StoreError, TransferTxError};
use super::lock_order::LockOrder;
use super::models::{TransferTxParams, TransferTxResult};
use super::store::{LedgerStore, UnitOfWork};

/// Executes transfers against an injected ledger store
pub struct TransferCoordinator<S: LedgerStore> {
    store: Arc<S>,
}

impl<S: LedgerStore> Clone for TransferCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: LedgerStore> TransferCoordinator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Move `amount` from one account to another atomically
    ///
    /// On failure the unit of work is rolled back and the store error is
    /// returned as is. If the rollback fails too, both errors are returned in
    /// [`TransferTxError::RollbackFailed`].
    ///
    /// Dropping the returned future before it completes drops the open unit,
    /// which rolls it back.
    pub async fn execute_transfer(
        &self,
        params: TransferTxParams,
    ) -> Result<TransferTxResult, TransferTxError> {
        let mut unit = self.store.begin_unit().await?;

        match Self::apply(&mut unit, params).await {
            Ok(result) => {
                unit.commit().await?;
                info!(
                    transfer_id = result.transfer.id,
                    from_account_id = params.from_account_id,
                    to_account_id = params.to_account_id,
                    amount = %params.amount,
                    "Transfer committed"
                );
                Ok(result)
            }
            Err(cause) => {
                if let Err(rollback) = unit.rollback().await {
                    error!(
                        from_account_id = params.from_account_id,
                        to_account_id = params.to_account_id,
                        cause = %cause,
                        rollback = %rollback,
                        "Transfer failed and rollback failed"
                    );
                    return Err(TransferTxError::RollbackFailed { cause, rollback });
                }
                warn!(
                    from_account_id = params.from_account_id,
                    to_account_id = params.to_account_id,
                    error = %cause,
                    "Transfer rolled back"
                );
                Err(TransferTxError::Store(cause))
            }
        }
    }

    async fn apply(
        unit: &mut S::Unit,
        params: TransferTxParams,
    ) -> Result<TransferTxResult, StoreError> {
        let TransferTxParams {
            from_account_id,
            to_account_id,
            amount,
        } = params;

        let transfer = unit
            .insert_transfer(from_account_id, to_account_id, amount)
            .await?;
        let from_entry = unit.insert_entry(from_account_id, -amount).await?;
        let to_entry = unit.insert_entry(to_account_id, amount).await?;

        let order = LockOrder::for_transfer(from_account_id, to_account_id, amount);
        let first = unit
            .apply_balance_delta(order.first().account_id, order.first().delta)
            .await?;
        let second = unit
            .apply_balance_delta(order.second().account_id, order.second().delta)
            .await?;
        let (from_account, to_account) = order.into_from_to(first, second);

        debug!(
            transfer_id = transfer.id,
            from_balance = %from_account.balance,
            to_balance = %to_account.balance,
            "Balances updated"
        );

        Ok(TransferTxResult {
            transfer,
            from_account,
            to_account,
            from_entry,
            to_entry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::memory::{MemoryLedgerStore, StoreOp};
    use rust_decimal::Decimal;

    fn setup(a_balance: i64, b_balance: i64) -> (TransferCoordinator<MemoryLedgerStore>, i64, i64) {
        let store = Arc::new(MemoryLedgerStore::new());
        let a = store.open_account("alice", "USD", Decimal::from(a_balance));
        let b = store.open_account("bob", "USD", Decimal::from(b_balance));
        (TransferCoordinator::new(store), a.id, b.id)
    }

    #[tokio::test]
    async fn test_execute_transfer_result() {
        let (coordinator, a, b) = setup(100, 50);
        let amount = Decimal::from(10);

        let result = coordinator
            .execute_transfer(TransferTxParams::new(a, b, amount))
            .await
            .unwrap();

        assert_eq!(result.transfer.from_account_id, a);
        assert_eq!(result.transfer.to_account_id, b);
        assert_eq!(result.transfer.amount, amount);

        assert_eq!(result.from_entry.account_id, a);
        assert_eq!(result.from_entry.amount, -amount);
        assert_eq!(result.to_entry.account_id, b);
        assert_eq!(result.to_entry.amount, amount);

        assert_eq!(result.from_account.id, a);
        assert_eq!(result.from_account.balance, Decimal::from(90));
        assert_eq!(result.to_account.id, b);
        assert_eq!(result.to_account.balance, Decimal::from(60));
    }

    #[tokio::test]
    async fn test_reverse_direction_maps_snapshots_back() {
        let (coordinator, a, b) = setup(100, 50);

        // b > a, so a is locked first even though b is the source
        let result = coordinator
            .execute_transfer(TransferTxParams::new(b, a, Decimal::from(20)))
            .await
            .unwrap();

        assert_eq!(result.from_account.id, b);
        assert_eq!(result.from_account.balance, Decimal::from(30));
        assert_eq!(result.to_account.id, a);
        assert_eq!(result.to_account.balance, Decimal::from(120));
        assert_eq!(result.from_entry.amount, Decimal::from(-20));
    }

    #[tokio::test]
    async fn test_store_error_returned_unmodified() {
        let (coordinator, a, b) = setup(100, 50);
        coordinator.store().fail_on(StoreOp::InsertTransfer, 1);

        let err = coordinator
            .execute_transfer(TransferTxParams::new(a, b, Decimal::ONE))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            TransferTxError::Store(StoreError::Injected("InsertTransfer call #1".into()))
        );
    }

    #[tokio::test]
    async fn test_rollback_failure_reports_both() {
        let (coordinator, a, b) = setup(100, 50);
        coordinator.store().fail_on(StoreOp::ApplyBalanceDelta, 2);
        coordinator.store().fail_on(StoreOp::Rollback, 1);

        let err = coordinator
            .execute_transfer(TransferTxParams::new(a, b, Decimal::ONE))
            .await
            .unwrap_err();

        match err {
            TransferTxError::RollbackFailed { cause, rollback } => {
                assert!(cause.to_string().contains("ApplyBalanceDelta"));
                assert!(rollback.to_string().contains("Rollback"));
            }
            other => panic!("expected RollbackFailed, got {:?}", other),
        }
        // Nothing was committed either way
        assert_eq!(coordinator.store().transfer_count(), 0);
    }

    #[tokio::test]
    async fn test_begin_failure() {
        let (coordinator, a, b) = setup(100, 50);
        coordinator.store().fail_on(StoreOp::BeginUnit, 1);

        let err = coordinator
            .execute_transfer(TransferTxParams::new(a, b, Decimal::ONE))
            .await
            .unwrap_err();
        assert!(matches!(err, TransferTxError::Store(StoreError::Injected(_))));
    }

    #[tokio::test]
    async fn test_overdraw_rejected_atomically() {
        let (coordinator, a, b) = setup(5, 0);

        let err = coordinator
            .execute_transfer(TransferTxParams::new(a, b, Decimal::from(6)))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            TransferTxError::Store(StoreError::InsufficientFunds { account_id: a })
        );
        assert_eq!(coordinator.store().transfer_count(), 0);
        assert_eq!(coordinator.store().entry_count(), 0);
    }
}
