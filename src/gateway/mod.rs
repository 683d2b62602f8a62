pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::GatewayConfig;
use crate::user_auth;
use state::AppState;

/// Build the HTTP router
pub fn build_router(state: Arc<AppState>) -> Router {
    let account_routes = Router::new()
        .route(
            "/",
            post(handlers::create_account).get(handlers::list_accounts),
        )
        .route("/{id}", get(handlers::get_account));

    // Protected by JWT
    let me_routes = Router::new()
        .route("/me", get(user_auth::handlers::get_current_user))
        .layer(from_fn_with_state(
            state.clone(),
            user_auth::middleware::jwt_auth_middleware,
        ));

    let user_routes = Router::new()
        .route("/", post(user_auth::handlers::create_user))
        .route("/login", post(user_auth::handlers::login_user))
        .merge(me_routes);

    let transfer_routes = Router::new()
        .route("/", post(handlers::create_transfer))
        .route("/{id}", get(handlers::get_transfer));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/accounts", account_routes)
        .nest("/users", user_routes)
        .nest("/transfers", transfer_routes)
        .route("/entries/{id}", get(handlers::get_entry))
        .with_state(state)
        // OpenAPI / Swagger UI (stateless, added after with_state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

/// Start HTTP Gateway server
pub async fn run_server(config: &GatewayConfig, state: Arc<AppState>) -> std::io::Result<()> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await.inspect_err(|e| {
        tracing::error!(
            "Failed to bind to {}: {} (port {} may already be in use)",
            addr,
            e,
            config.port
        );
    })?;

    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("API Docs: http://{}/docs", addr);

    axum::serve(listener, app).await
}
