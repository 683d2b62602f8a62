use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::core_types::{EntryId, TransferId};
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiResponse, ApiResult, TransferRequest, ValidatedJson, ok};
use crate::ledger::{Entry, Transfer, TransferTxResult};
use crate::transfer::CreateTransferRequest;

/// Move money between two accounts of the same currency
///
/// POST /transfers
#[utoipa::path(
    post,
    path = "/transfers",
    request_body = TransferRequest,
    responses(
        (status = 201, description = "Transfer committed", body = ApiResponse<TransferTxResult>),
        (status = 400, description = "Same account, bad amount, currency mismatch or insufficient balance"),
        (status = 404, description = "Account not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Transfer"
)]
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<TransferRequest>,
) -> ApiResult<TransferTxResult> {
    let result = state
        .transfers
        .create_transfer(CreateTransferRequest {
            from_account_id: req.from_account,
            to_account_id: req.to_account,
            amount: req.amount.inner(),
            currency: req.currency,
        })
        .await?;
    ok(StatusCode::CREATED, result)
}

/// Get transfer by ID
///
/// GET /transfers/{id}
#[utoipa::path(
    get,
    path = "/transfers/{id}",
    params(("id" = i64, Path, description = "Transfer ID")),
    responses(
        (status = 200, description = "Transfer", body = ApiResponse<Transfer>),
        (status = 404, description = "Transfer not found")
    ),
    tag = "Transfer"
)]
pub async fn get_transfer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TransferId>,
) -> ApiResult<Transfer> {
    let transfer = state.transfers.get_transfer(id).await?;
    ok(StatusCode::OK, transfer)
}

/// Get ledger entry by ID
///
/// GET /entries/{id}
#[utoipa::path(
    get,
    path = "/entries/{id}",
    params(("id" = i64, Path, description = "Entry ID")),
    responses(
        (status = 200, description = "Entry", body = ApiResponse<Entry>),
        (status = 404, description = "Entry not found")
    ),
    tag = "Transfer"
)]
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<EntryId>,
) -> ApiResult<Entry> {
    let entry = state.transfers.get_entry(id).await?;
    ok(StatusCode::OK, entry)
}
