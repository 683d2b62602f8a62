//! simple_bank HTTP server
//!
//! Usage:
//!   cargo run -- --env dev --port 8080

use std::sync::Arc;

use anyhow::Context;
use chrono::Duration;

use simple_bank::config::AppConfig;
use simple_bank::db::Database;
use simple_bank::gateway::{self, state::AppState};
use simple_bank::logging::init_logging;
use simple_bank::token::{JwtMaker, TokenMaker};
use simple_bank::user_auth::UserAuthService;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let mut app_config = AppConfig::load(&env)?;
    if let Some(port) = get_port_override() {
        app_config.gateway.port = port;
    }
    let _log_guard = init_logging(&app_config)?;

    tracing::info!(
        version = env!("GIT_HASH"),
        "Starting simple_bank in {} mode",
        env
    );

    let token_maker: Arc<dyn TokenMaker> = Arc::new(
        JwtMaker::new(&app_config.token.symmetric_key).context("Invalid token.symmetric_key")?,
    );

    let db = Database::connect(&app_config.database)
        .await
        .context("Failed to connect to PostgreSQL")?;
    db.migrate().await.context("Failed to apply migrations")?;
    let db = Arc::new(db);

    let user_auth = Arc::new(UserAuthService::new(
        db.pool().clone(),
        token_maker,
        Duration::seconds(app_config.token.access_token_duration_secs),
    ));
    let state = Arc::new(AppState::new(db, user_auth));

    gateway::run_server(&app_config.gateway, state)
        .await
        .context("Gateway server error")?;
    Ok(())
}
