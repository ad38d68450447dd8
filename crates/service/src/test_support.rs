#![cfg(test)]
use sea_orm::DatabaseConnection;

use crate::crud::OwnerId;

/// Fresh migrated in-memory database per test; nothing leaks between tests.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    models::db::connect_memory().await
}

/// Bare user row to own resources.
pub async fn seed_user(db: &DatabaseConnection, email: &str) -> Result<OwnerId, anyhow::Error> {
    let user = models::user::create(db, "Test", email).await?;
    Ok(OwnerId(user.id))
}
