//! simple_bank - accounts, users and atomic money transfers
//!
//! # Modules
//!
//! - [`core_types`] - ID type aliases
//! - [`currency`] - Supported currencies
//! - [`ledger`] - Transfer transaction core (store trait, lock order, coordinator)
//! - [`transfer`] - Transfer validation service
//! - [`account`] - Account and user repositories
//! - [`user_auth`] - Password hashing, registration, login
//! - [`token`] - JWT access tokens
//! - [`gateway`] - HTTP API
//! - [`config`], [`logging`], [`db`] - Ambient services

// Core types - must be first!
pub mod core_types;

pub mod currency;
pub mod ledger;
pub mod transfer;

pub mod account;
pub mod token;
pub mod user_auth;

pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;

// Convenient re-exports at crate root
pub use core_types::{AccountId, EntryId, TransferId, UserId};
pub use currency::Currency;
pub use ledger::{
    LedgerStore, MemoryLedgerStore, PgLedgerStore, TransferCoordinator, TransferTxError,
    TransferTxParams, TransferTxResult, UnitOfWork,
};
pub use transfer::{TransferError, TransferService};
