//! Ledger store error types

use thiserror::Error;

use crate::core_types::AccountId;

/// Kind of integrity constraint the store refused to violate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    Check,
    NotNull,
    Other,
}

/// Failure of a single store operation
///
/// Values travel through the transfer coordinator untouched, so they are
/// `Clone` and carry rendered messages instead of driver error objects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Connection refused, pool exhausted or closed, I/O failure
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Constraint violation ({kind:?}): {message}")]
    ConstraintViolation {
        kind: ConstraintKind,
        message: String,
    },

    /// Debit guard: the delta would take the balance below zero
    #[error("Insufficient funds in account {account_id}")]
    InsufficientFunds { account_id: AccountId },

    /// Failure injected by the in-memory store
    #[error("Injected failure: {0}")]
    Injected(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StoreError::ConstraintViolation {
                kind: ConstraintKind::Unique,
                ..
            }
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StoreError::ConstraintViolation {
                kind: ConstraintKind::ForeignKey,
                ..
            }
        )
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind;

        match e {
            sqlx::Error::Database(ref db_err) => {
                let kind = match db_err.kind() {
                    ErrorKind::UniqueViolation => ConstraintKind::Unique,
                    ErrorKind::ForeignKeyViolation => ConstraintKind::ForeignKey,
                    ErrorKind::CheckViolation => ConstraintKind::Check,
                    ErrorKind::NotNullViolation => ConstraintKind::NotNull,
                    _ => return StoreError::Database(e.to_string()),
                };
                StoreError::ConstraintViolation {
                    kind,
                    message: db_err.message().to_string(),
                }
            }
            sqlx::Error::RowNotFound => StoreError::NotFound("row".to_string()),
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(e.to_string()),
            other => StoreError::Database(other.to_string()),
        }
    }
}

/// Failure of a whole transfer transaction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferTxError {
    /// A step failed and the unit of work was rolled back
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A step failed and rolling back failed too
    #[error("transaction error: {cause}; rollback failed: {rollback}")]
    RollbackFailed {
        cause: StoreError,
        rollback: StoreError,
    },
}

impl TransferTxError {
    /// The failure that aborted the transaction
    pub fn cause(&self) -> &StoreError {
        match self {
            TransferTxError::Store(e) => e,
            TransferTxError::RollbackFailed { cause, .. } => cause,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlx_pool_errors_are_unavailable() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Unavailable(_)));

        let err = StoreError::from(sqlx::Error::PoolClosed);
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn test_row_not_found() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_constraint_helpers() {
        let unique = StoreError::ConstraintViolation {
            kind: ConstraintKind::Unique,
            message: "duplicate key".into(),
        };
        assert!(unique.is_unique_violation());
        assert!(!unique.is_foreign_key_violation());
        assert!(!StoreError::Database("x".into()).is_unique_violation());
    }

    #[test]
    fn test_rollback_failed_keeps_both_causes() {
        let err = TransferTxError::RollbackFailed {
            cause: StoreError::Unavailable("connection reset".into()),
            rollback: StoreError::Unavailable("broken pipe".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("connection reset"));
        assert!(msg.contains("broken pipe"));
        assert_eq!(
            err.cause(),
            &StoreError::Unavailable("connection reset".into())
        );
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err = TransferTxError::from(StoreError::InsufficientFunds { account_id: 7 });
        assert_eq!(err.to_string(), "Insufficient funds in account 7");
    }
}
