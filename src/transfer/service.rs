//! Transfer Service
//!
//! Validates a transfer request against current account state, then hands
//! it to the [`TransferCoordinator`]. The balance check here is advisory;
//! the store's debit guard closes the race between check and commit.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::error::TransferError;
use crate::core_types::{AccountId, EntryId, TransferId};
use crate::currency::Currency;
use crate::ledger::{
    Account, Entry, LedgerStore, Transfer, TransferCoordinator, TransferTxParams, TransferTxResult,
};

/// Validated-on-entry transfer request
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTransferRequest {
    pub from_account_id: AccountId,
    pub to_account_id: AccountId,
    pub amount: Decimal,
    pub currency: String,
}

/// Decimal places stored by the `NUMERIC(20, 2)` money columns
pub const MONEY_SCALE: u32 = 2;

pub struct TransferService<S: LedgerStore> {
    coordinator: TransferCoordinator<S>,
}

impl<S: LedgerStore> Clone for TransferService<S> {
    fn clone(&self) -> Self {
        Self {
            coordinator: self.coordinator.clone(),
        }
    }
}

impl<S: LedgerStore> TransferService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            coordinator: TransferCoordinator::new(store),
        }
    }

    pub fn coordinator(&self) -> &TransferCoordinator<S> {
        &self.coordinator
    }

    /// Validate and execute a transfer
    pub async fn create_transfer(
        &self,
        req: CreateTransferRequest,
    ) -> Result<TransferTxResult, TransferError> {
        if req.from_account_id == req.to_account_id {
            return Err(TransferError::SameAccount);
        }
        // Finer amounts would be rounded per row by the database
        if req.amount <= Decimal::ZERO || req.amount.normalize().scale() > MONEY_SCALE {
            return Err(TransferError::InvalidAmount);
        }
        if !Currency::is_supported(&req.currency) {
            return Err(TransferError::UnsupportedCurrency(req.currency));
        }

        let from = self
            .valid_account(req.from_account_id, &req.currency)
            .await?;
        if from.balance < req.amount {
            debug!(
                account_id = from.id,
                balance = %from.balance,
                amount = %req.amount,
                "Rejected transfer: insufficient balance"
            );
            return Err(TransferError::InsufficientBalance(from.id));
        }
        self.valid_account(req.to_account_id, &req.currency).await?;

        let params = TransferTxParams::new(req.from_account_id, req.to_account_id, req.amount);
        self.coordinator.execute_transfer(params).await.map_err(|e| {
            warn!(
                from_account_id = req.from_account_id,
                to_account_id = req.to_account_id,
                error = %e,
                "Transfer failed"
            );
            TransferError::from(e)
        })
    }

    /// Get an account that exists and is denominated in `currency`
    async fn valid_account(&self, id: AccountId, currency: &str) -> Result<Account, TransferError> {
        let account = self
            .coordinator
            .store()
            .get_account(id)
            .await?
            .ok_or(TransferError::AccountNotFound(id))?;

        if account.currency != currency {
            return Err(TransferError::CurrencyMismatch {
                account_id: id,
                expected: currency.to_string(),
                actual: account.currency,
            });
        }
        Ok(account)
    }

    pub async fn get_transfer(&self, id: TransferId) -> Result<Transfer, TransferError> {
        self.coordinator
            .store()
            .get_transfer(id)
            .await?
            .ok_or(TransferError::TransferNotFound(id))
    }

    pub async fn get_entry(&self, id: EntryId) -> Result<Entry, TransferError> {
        self.coordinator
            .store()
            .get_entry(id)
            .await?
            .ok_or(TransferError::EntryNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{MemoryLedgerStore, StoreOp};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn setup() -> (MemoryLedgerStore, TransferService<MemoryLedgerStore>, Account, Account) {
        let store = MemoryLedgerStore::new();
        let a = store.open_account("alice", "USD", dec("100"));
        let b = store.open_account("bob", "USD", dec("50"));
        let service = TransferService::new(Arc::new(store.clone()));
        (store, service, a, b)
    }

    fn request(from: AccountId, to: AccountId, amount: Decimal, currency: &str) -> CreateTransferRequest {
        CreateTransferRequest {
            from_account_id: from,
            to_account_id: to,
            amount,
            currency: currency.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_transfer_success() {
        let (_, service, a, b) = setup();
        let result = service
            .create_transfer(request(a.id, b.id, dec("30"), "USD"))
            .await
            .unwrap();

        assert_eq!(result.from_account.balance, dec("70"));
        assert_eq!(result.to_account.balance, dec("80"));
        assert_eq!(result.from_entry.amount, dec("-30"));
        assert_eq!(result.to_entry.amount, dec("30"));
    }

    #[tokio::test]
    async fn test_same_account_rejected() {
        let (store, service, a, _) = setup();
        let err = service
            .create_transfer(request(a.id, a.id, dec("1"), "USD"))
            .await
            .unwrap_err();
        assert_eq!(err, TransferError::SameAccount);
        assert_eq!(store.transfer_count(), 0);
    }

    #[tokio::test]
    async fn test_non_positive_amount_rejected() {
        let (_, service, a, b) = setup();
        for amount in [dec("0"), dec("-5")] {
            let err = service
                .create_transfer(request(a.id, b.id, amount, "USD"))
                .await
                .unwrap_err();
            assert_eq!(err, TransferError::InvalidAmount);
        }
    }

    #[tokio::test]
    async fn test_sub_cent_amount_rejected() {
        let (store, service, a, b) = setup();
        for amount in [dec("0.005"), dec("10.001"), Decimal::new(5, 3)] {
            let err = service
                .create_transfer(request(a.id, b.id, amount, "USD"))
                .await
                .unwrap_err();
            assert_eq!(err, TransferError::InvalidAmount);
            assert_eq!(err.http_status(), 400);
        }
        assert_eq!(store.transfer_count(), 0);
        assert_eq!(store.total_balance(), dec("150"));
    }

    #[tokio::test]
    async fn test_trailing_zeros_do_not_count_as_precision() {
        let (_, service, a, b) = setup();
        let result = service
            .create_transfer(request(a.id, b.id, dec("0.0100"), "USD"))
            .await
            .unwrap();
        assert_eq!(result.from_account.balance, dec("99.99"));
        assert_eq!(result.to_account.balance, dec("50.01"));
    }

    #[tokio::test]
    async fn test_unsupported_currency_rejected() {
        let (_, service, a, b) = setup();
        let err = service
            .create_transfer(request(a.id, b.id, dec("1"), "EUR"))
            .await
            .unwrap_err();
        assert_eq!(err, TransferError::UnsupportedCurrency("EUR".to_string()));
    }

    #[tokio::test]
    async fn test_missing_accounts() {
        let (_, service, a, _) = setup();
        let err = service
            .create_transfer(request(999, a.id, dec("1"), "USD"))
            .await
            .unwrap_err();
        assert_eq!(err, TransferError::AccountNotFound(999));

        let err = service
            .create_transfer(request(a.id, 999, dec("1"), "USD"))
            .await
            .unwrap_err();
        assert_eq!(err, TransferError::AccountNotFound(999));
        assert_eq!(err.http_status(), 404);
    }

    #[tokio::test]
    async fn test_currency_mismatch() {
        let (store, service, a, _) = setup();
        let ringgit = store.open_account("carol", "MYR", dec("100"));

        let err = service
            .create_transfer(request(a.id, ringgit.id, dec("1"), "USD"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TransferError::CurrencyMismatch { account_id, .. } if account_id == ringgit.id
        ));

        let err = service
            .create_transfer(request(ringgit.id, a.id, dec("1"), "USD"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TransferError::CurrencyMismatch { account_id, .. } if account_id == ringgit.id
        ));
    }

    #[tokio::test]
    async fn test_insufficient_balance() {
        let (store, service, a, b) = setup();
        let err = service
            .create_transfer(request(a.id, b.id, dec("100.01"), "USD"))
            .await
            .unwrap_err();
        assert_eq!(err, TransferError::InsufficientBalance(a.id));
        assert_eq!(store.transfer_count(), 0);
    }

    #[tokio::test]
    async fn test_exact_balance_allowed() {
        let (_, service, a, b) = setup();
        let result = service
            .create_transfer(request(a.id, b.id, dec("100"), "USD"))
            .await
            .unwrap();
        assert_eq!(result.from_account.balance, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_store_failure_is_server_error() {
        let (store, service, a, b) = setup();
        store.fail_on(StoreOp::Commit, 1);

        let err = service
            .create_transfer(request(a.id, b.id, dec("10"), "USD"))
            .await
            .unwrap_err();
        assert_eq!(err.http_status(), 500);
        assert_eq!(store.transfer_count(), 0);
    }

    #[tokio::test]
    async fn test_read_back() {
        let (_, service, a, b) = setup();
        let result = service
            .create_transfer(request(a.id, b.id, dec("5"), "USD"))
            .await
            .unwrap();

        assert_eq!(service.get_transfer(result.transfer.id).await.unwrap(), result.transfer);
        assert_eq!(service.get_entry(result.from_entry.id).await.unwrap(), result.from_entry);
        assert_eq!(
            service.get_transfer(12345).await.unwrap_err(),
            TransferError::TransferNotFound(12345)
        );
        assert_eq!(
            service.get_entry(12345).await.unwrap_err(),
            TransferError::EntryNotFound(12345)
        );
    }
}
