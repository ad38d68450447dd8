use std::sync::Arc;

use configs::{AppConfig, StatusPolicy};
use sea_orm::DatabaseConnection;
use service::auth::repo::SeaOrmAuthRepository;
use service::auth::service::AuthService;

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: Arc<AuthService<SeaOrmAuthRepository>>,
    pub policy: StatusPolicy,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, cfg: &AppConfig) -> Self {
        let repo = Arc::new(SeaOrmAuthRepository { db: db.clone() });
        let auth = Arc::new(AuthService::new(repo, (&cfg.auth).into()));
        Self { db, auth, policy: cfg.crud.status_policy }
    }
}
