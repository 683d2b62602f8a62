//! User registration, login and access-token auth

pub mod handlers;
pub mod middleware;
pub mod password;
pub mod service;

pub use password::{PasswordError, hash_password, verify_password};
pub use service::{AuthError, LoginOutcome, RegisterUser, UserAuthService};
