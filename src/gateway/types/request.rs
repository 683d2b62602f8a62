//! Request DTOs and the validating JSON extractor

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::error::ApiError;
use super::money::StrictDecimal;
use crate::core_types::AccountId;
use crate::currency::Currency;

fn validate_currency(currency: &str) -> Result<(), ValidationError> {
    if Currency::is_supported(currency) {
        Ok(())
    } else {
        Err(ValidationError::new("currency").with_message("unsupported currency".into()))
    }
}

fn validate_alphanumeric(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::new("alphanum").with_message("must be alphanumeric".into()))
    }
}

// ============================================================================
// Accounts
// ============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAccountRequest {
    #[schema(example = "alice")]
    #[validate(length(min = 1))]
    pub owner: String,
    #[schema(example = "USD")]
    #[validate(custom(function = "validate_currency"))]
    pub currency: String,
}

pub const MAX_PAGE: i64 = i32::MAX as i64;

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListAccountsQuery {
    /// 1-based page number
    #[validate(range(min = 1, max = MAX_PAGE))]
    pub page: i64,
    /// Page size (5 to 50)
    #[validate(range(min = 5, max = 50))]
    pub size: i64,
}

impl ListAccountsQuery {
    pub fn limit(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).max(0).saturating_mul(self.size)
    }
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[schema(example = "alice")]
    #[validate(custom(function = "validate_alphanumeric"))]
    pub username: String,
    #[schema(example = "password123")]
    #[validate(length(min = 8))]
    pub password: String,
    #[schema(example = "Alice Tan")]
    #[validate(length(min = 1))]
    pub full_name: String,
    #[schema(example = "alice@example.com")]
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserRequest {
    #[schema(example = "alice")]
    #[validate(custom(function = "validate_alphanumeric"))]
    pub username: String,
    #[schema(example = "password123")]
    #[validate(length(min = 8))]
    pub password: String,
}

// ============================================================================
// Transfers
// ============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    #[schema(example = 1)]
    #[validate(range(min = 1))]
    pub from_account: AccountId,
    #[schema(example = 2)]
    #[validate(range(min = 1))]
    pub to_account: AccountId,
    /// Decimal string or number, e.g. "10.50"
    #[schema(value_type = String, example = "10.50")]
    pub amount: StrictDecimal,
    #[schema(example = "USD")]
    #[validate(custom(function = "validate_currency"))]
    pub currency: String,
}

// ============================================================================
// ValidatedJson: Axum Framework Integration
// ============================================================================

/// JSON body extractor that runs `Validate` before the handler sees it
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value): Json<T> = Json::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e.body_text())))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_account_currency() {
        let ok: CreateAccountRequest =
            serde_json::from_str(r#"{"owner":"alice","currency":"MYR"}"#).unwrap();
        assert!(ok.validate().is_ok());

        let bad: CreateAccountRequest =
            serde_json::from_str(r#"{"owner":"alice","currency":"EUR"}"#).unwrap();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_create_user_rules() {
        let ok: CreateUserRequest = serde_json::from_str(
            r#"{"username":"alice1","password":"secret123","fullName":"Alice","email":"a@b.com"}"#,
        )
        .unwrap();
        assert!(ok.validate().is_ok());

        let bad: CreateUserRequest = serde_json::from_str(
            r#"{"username":"alice_1","password":"short","fullName":"","email":"nope"}"#,
        )
        .unwrap();
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("full_name"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn test_page_bounds() {
        let q = ListAccountsQuery { page: 3, size: 10 };
        assert!(q.validate().is_ok());
        assert_eq!(q.limit(), 10);
        assert_eq!(q.offset(), 20);

        assert!(ListAccountsQuery { page: 0, size: 10 }.validate().is_err());
        assert!(ListAccountsQuery { page: 1, size: 4 }.validate().is_err());
        assert!(ListAccountsQuery { page: 1, size: 51 }.validate().is_err());
    }

    #[test]
    fn test_huge_page_rejected_without_overflow() {
        let q = ListAccountsQuery { page: i64::MAX, size: 10 };
        assert!(q.validate().is_err());
        assert_eq!(q.offset(), i64::MAX);

        let last = ListAccountsQuery { page: MAX_PAGE, size: 50 };
        assert!(last.validate().is_ok());
        assert_eq!(last.offset(), (MAX_PAGE - 1) * 50);
    }

    #[test]
    fn test_transfer_request_parses_camel_case() {
        let req: TransferRequest = serde_json::from_str(
            r#"{"fromAccount":1,"toAccount":2,"amount":"10.50","currency":"USD"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.from_account, 1);
        assert_eq!(req.amount.inner().to_string(), "10.50");

        let bad: TransferRequest = serde_json::from_str(
            r#"{"fromAccount":0,"toAccount":2,"amount":1,"currency":"USD"}"#,
        )
        .unwrap();
        assert!(bad.validate().is_err());
    }
}
