//! Money transfers between accounts
//!
//! Request validation and error taxonomy on top of the ledger's
//! [`TransferCoordinator`](crate::ledger::TransferCoordinator).

pub mod error;
pub mod service;

pub use error::TransferError;
pub use service::{CreateTransferRequest, MONEY_SCALE, TransferService};
