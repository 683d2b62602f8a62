use axum::{Extension, extract::State, http::StatusCode};
use std::sync::Arc;

use super::service::RegisterUser;
use crate::account::UserResponse;
use crate::gateway::state::AppState;
use crate::gateway::types::{
    ApiResponse, ApiResult, CreateUserRequest, LoginResponseData, LoginUserRequest, ValidatedJson,
    ok,
};
use crate::token::Payload;

/// Register a new user
///
/// POST /users
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Username or email already exists"),
        (status = 500, description = "Internal server error")
    ),
    tag = "User"
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> ApiResult<UserResponse> {
    let user = state
        .user_auth
        .register(RegisterUser {
            username: req.username,
            password: req.password,
            full_name: req.full_name,
            email: req.email,
        })
        .await?;
    ok(StatusCode::CREATED, user.into())
}

/// Login user
///
/// POST /users/login
#[utoipa::path(
    post,
    path = "/users/login",
    request_body = LoginUserRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponseData>),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "User"
)]
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginUserRequest>,
) -> ApiResult<LoginResponseData> {
    let outcome = state.user_auth.login(&req.username, &req.password).await?;
    ok(
        StatusCode::OK,
        LoginResponseData {
            access_token: outcome.access_token,
            access_token_expires_at: outcome.payload.expires_at,
            user: outcome.user.into(),
        },
    )
}

/// Current user from the access token
///
/// GET /users/me
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Authenticated user", body = ApiResponse<UserResponse>),
        (status = 401, description = "Missing, invalid or expired token")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    Extension(payload): Extension<Payload>,
) -> ApiResult<UserResponse> {
    let user = state.user_auth.get_user(&payload.username).await?;
    ok(StatusCode::OK, user.into())
}
