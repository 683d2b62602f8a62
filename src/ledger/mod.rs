//! Ledger transaction core
//!
//! Accounts, append-only entries and transfers, plus the coordinator that
//! moves money between two accounts in one atomic unit of work.
//!
//! # Architecture
//!
//! ```text
//! TransferService ──▶ TransferCoordinator ──▶ LedgerStore ──▶ UnitOfWork
//!  (validation)        (orchestration)          │
//!                            │                  ├─ PgLedgerStore     (sqlx)
//!                        LockOrder              └─ MemoryLedgerStore (tests)
//! ```
//!
//! # Safety Invariants
//!
//! 1. **All-or-nothing**: one transfer row, two entries and two balance
//!    updates commit together or not at all
//! 2. **Lock order**: the lower account ID is updated first in every unit
//! 3. **Sign convention**: source entry is `-amount`, destination `+amount`
//! 4. **No overdraw**: debits are guarded inside the unit of work

pub mod coordinator;
pub mod error;
pub mod lock_order;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use coordinator::TransferCoordinator;
pub use error::{ConstraintKind, StoreError, TransferTxError};
pub use lock_order::{Leg, LockOrder};
pub use memory::{MemoryLedgerStore, StoreOp};
pub use models::{Account, Entry, Transfer, TransferTxParams, TransferTxResult};
pub use postgres::PgLedgerStore;
pub use store::{LedgerStore, UnitOfWork};
