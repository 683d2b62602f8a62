//! Handler error type
//!
//! Every domain error is turned into a status code plus the standard
//! `{code, msg}` envelope. Server-side failures are logged here and reported
//! to the client without internal detail.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use validator::ValidationErrors;

use super::response::{ApiResponse, error_codes};
use crate::ledger::StoreError;
use crate::transfer::TransferError;
use crate::user_auth::AuthError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            msg,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ApiResponse::<()>::error(self.code, self.msg)),
        )
            .into_response()
    }
}

/// Handler result with the standard envelope on both sides
pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

pub fn ok<T>(status: StatusCode, data: T) -> ApiResult<T> {
    Ok((status, Json(ApiResponse::success(data))))
}

fn status_from(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl From<ValidationErrors> for ApiError {
    fn from(e: ValidationErrors) -> Self {
        ApiError::bad_request(e.to_string())
    }
}

impl From<TransferError> for ApiError {
    fn from(e: TransferError) -> Self {
        let status = status_from(e.http_status());
        if status.is_server_error() {
            tracing::error!(code = e.code(), error = %e, "Transfer request failed");
            return ApiError::internal("Transfer failed");
        }
        let code = match e {
            TransferError::SameAccount => error_codes::SAME_ACCOUNT,
            TransferError::InsufficientBalance(_) => error_codes::INSUFFICIENT_BALANCE,
            TransferError::CurrencyMismatch { .. } => error_codes::CURRENCY_MISMATCH,
            TransferError::TransferNotFound(_) => error_codes::TRANSFER_NOT_FOUND,
            TransferError::EntryNotFound(_) => error_codes::ENTRY_NOT_FOUND,
            _ if status == StatusCode::NOT_FOUND => error_codes::ACCOUNT_NOT_FOUND,
            _ => error_codes::INVALID_PARAMETER,
        };
        ApiError::new(status, code, e.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        let status = status_from(e.http_status());
        if status.is_server_error() {
            tracing::error!(code = e.code(), error = %e, "Auth request failed");
            return ApiError::internal("Internal server error");
        }
        let code = match e {
            AuthError::UserExists => error_codes::FORBIDDEN,
            AuthError::UserNotFound(_) => error_codes::USER_NOT_FOUND,
            AuthError::Token(crate::token::TokenError::Expired) => error_codes::TOKEN_EXPIRED,
            _ => error_codes::AUTH_FAILED,
        };
        ApiError::new(status, code, e.to_string())
    }
}

/// Repository failures outside a transfer (account and user CRUD)
impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(what) => {
                ApiError::new(StatusCode::NOT_FOUND, error_codes::ACCOUNT_NOT_FOUND, what)
            }
            StoreError::ConstraintViolation { .. } if e.is_foreign_key_violation() => {
                ApiError::new(
                    StatusCode::FORBIDDEN,
                    error_codes::FORBIDDEN,
                    "Referenced user does not exist",
                )
            }
            StoreError::ConstraintViolation { .. } if e.is_unique_violation() => ApiError::new(
                StatusCode::FORBIDDEN,
                error_codes::FORBIDDEN,
                "Resource already exists",
            ),
            StoreError::Unavailable(_) => {
                tracing::error!(error = %e, "Store unavailable");
                ApiError::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    error_codes::SERVICE_UNAVAILABLE,
                    "Service unavailable",
                )
            }
            other => {
                tracing::error!(error = %other, "Store request failed");
                ApiError::internal("Internal server error")
            }
        }
    }
}
