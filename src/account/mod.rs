//! Account and user management
//!
//! PostgreSQL-backed row CRUD for accounts and users. Money movement lives
//! in [`crate::ledger`].

pub mod models;
pub mod repository;

pub use models::{NewUser, User, UserResponse};
pub use repository::{AccountRepository, UserRepository};
