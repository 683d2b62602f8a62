//! Core types used throughout the system
//!
//! Row identifiers are PostgreSQL `BIGSERIAL` values, so they are `i64`.

/// Account ID - primary key of `accounts`.
///
/// # Constraints:
/// - **Immutable**: Once assigned, NEVER changes
/// - **Totally ordered**: The ordering is the global lock order used by
///   every unit of work that touches two accounts
pub type AccountId = i64;

/// Entry ID - primary key of `entries`
pub type EntryId = i64;

/// Transfer ID - primary key of `transfers`
pub type TransferId = i64;

/// User ID - primary key of `users`
pub type UserId = i64;
