//! Gateway types module
//!
//! ## Input Types
//! - [`StrictDecimal`]: Format-validated decimal for API input
//! - [`ValidatedJson`]: Axum extractor that validates request bodies
//!
//! ## Output Types
//! - [`ApiResponse<T>`]: Unified API response wrapper
//! - [`ApiError`]: Error half of every handler result

pub mod error;
pub mod money;
pub mod request;
pub mod response;

pub use error::{ApiError, ApiResult, ok};
pub use money::StrictDecimal;
pub use request::{
    CreateAccountRequest, CreateUserRequest, ListAccountsQuery, LoginUserRequest, TransferRequest,
    ValidatedJson,
};
pub use response::{ApiResponse, LoginResponseData, error_codes};
