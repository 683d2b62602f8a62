use std::sync::Arc;

use crate::db::Database;
use crate::ledger::PgLedgerStore;
use crate::transfer::TransferService;
use crate::user_auth::UserAuthService;

/// Gateway shared state
pub struct AppState {
    /// PostgreSQL pool (account/user CRUD, health)
    pub db: Arc<Database>,
    /// Transfer validation and execution over the Postgres ledger
    pub transfers: TransferService<PgLedgerStore>,
    pub user_auth: Arc<UserAuthService>,
}

impl AppState {
    pub fn new(db: Arc<Database>, user_auth: Arc<UserAuthService>) -> Self {
        let store = Arc::new(PgLedgerStore::new(db.pool().clone()));
        Self {
            db,
            transfers: TransferService::new(store),
            user_auth,
        }
    }
}
