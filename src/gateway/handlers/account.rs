use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use validator::Validate;

use crate::account::AccountRepository;
use crate::core_types::AccountId;
use crate::currency::Currency;
use crate::gateway::state::AppState;
use crate::gateway::types::{
    ApiError, ApiResponse, ApiResult, CreateAccountRequest, ListAccountsQuery, ValidatedJson,
    error_codes, ok,
};
use crate::ledger::Account;

/// Open an account with a zero balance
///
/// POST /accounts
#[utoipa::path(
    post,
    path = "/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<Account>),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Unknown owner or duplicate currency account"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Account"
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateAccountRequest>,
) -> ApiResult<Account> {
    let currency: Currency = req
        .currency
        .parse()
        .map_err(|e: crate::currency::UnsupportedCurrency| ApiError::bad_request(e.to_string()))?;

    let account = AccountRepository::create(state.db.pool(), &req.owner, currency).await?;
    tracing::info!(account_id = account.id, owner = %account.owner, currency = %currency, "Account created");
    ok(StatusCode::CREATED, account)
}

/// Get account by ID
///
/// GET /accounts/{id}
#[utoipa::path(
    get,
    path = "/accounts/{id}",
    params(("id" = i64, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account", body = ApiResponse<Account>),
        (status = 404, description = "Account not found")
    ),
    tag = "Account"
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<AccountId>,
) -> ApiResult<Account> {
    if id < 1 {
        return Err(ApiError::bad_request("Account ID must be positive"));
    }
    let account = AccountRepository::get(state.db.pool(), id)
        .await?
        .ok_or_else(|| {
            ApiError::new(
                StatusCode::NOT_FOUND,
                error_codes::ACCOUNT_NOT_FOUND,
                format!("Account not found: {}", id),
            )
        })?;
    ok(StatusCode::OK, account)
}

/// List accounts by page
///
/// GET /accounts?page=&size=
#[utoipa::path(
    get,
    path = "/accounts",
    params(ListAccountsQuery),
    responses(
        (status = 200, description = "Accounts ordered by ID", body = ApiResponse<Vec<Account>>),
        (status = 400, description = "Invalid paging parameters")
    ),
    tag = "Account"
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListAccountsQuery>,
) -> ApiResult<Vec<Account>> {
    query.validate()?;
    let accounts =
        AccountRepository::list(state.db.pool(), query.limit(), query.offset()).await?;
    ok(StatusCode::OK, accounts)
}
