//! Demo data: one admin account with five notes. Safe to run repeatedly.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait};
use tracing::info;

use models::{note, user, user_credentials};
use crate::auth::service::{hash_password, PASSWORD_ALGORITHM};
use crate::crud::OwnerId;
use crate::errors::ServiceError;

pub const DEMO_EMAIL: &str = "admin@example";
pub const DEMO_NAME: &str = "admin";
pub const DEMO_PASSWORD: &str = "password";
const DEMO_NOTES: usize = 5;

/// Upsert the demo user (resetting its password), then replace its notes.
pub async fn seed_demo(db: &DatabaseConnection) -> Result<OwnerId, ServiceError> {
    let hash = hash_password(DEMO_PASSWORD).map_err(|e| ServiceError::Malformed(e.to_string()))?;

    let txn = db.begin().await?;
    let owner = match user::find_by_email(&txn, DEMO_EMAIL).await? {
        Some(existing) => {
            let mut am: user::ActiveModel = existing.into();
            am.name = Set(DEMO_NAME.to_string());
            am.updated_at = Set(Utc::now().into());
            am.update(&txn).await?
        }
        None => user::create(&txn, DEMO_NAME, DEMO_EMAIL).await?,
    };
    user_credentials::upsert_password(&txn, owner.id, hash, PASSWORD_ALGORITHM).await?;
    replace_notes(&txn, owner.id).await?;
    txn.commit().await?;

    let owner = OwnerId(owner.id);
    info!(%owner, notes = DEMO_NOTES, "demo data seeded");
    Ok(owner)
}

async fn replace_notes<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<(), ServiceError> {
    note::Entity::delete_many()
        .filter(note::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;
    for i in 1..=DEMO_NOTES {
        note::create(conn, user_id, &format!("Nota {i}"), &format!("Contenido de la nota número {i}")).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::OwnedCollection;
    use crate::notes::SeaOrmNoteCollection;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn seeding_twice_keeps_one_user_and_five_notes() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let first = seed_demo(&db).await?;
        let second = seed_demo(&db).await?;
        assert_eq!(first, second);

        let notes = SeaOrmNoteCollection::new(db.clone()).list(second).await?;
        assert_eq!(notes.len(), 5);
        assert_eq!(notes[0].title, "Nota 1");
        assert_eq!(notes[4].content, "Contenido de la nota número 5");

        let creds = user_credentials::find_for_user(&db, second.0).await?.unwrap();
        assert!(crate::auth::service::verify_password(DEMO_PASSWORD, &creds.password_hash)?);
        Ok(())
    }

    #[tokio::test]
    async fn note_replacement_rolls_back_with_its_transaction() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let owner = seed_demo(&db).await?;
        let notes = SeaOrmNoteCollection::new(db.clone());
        let before: Vec<i32> = notes.list(owner).await?.iter().map(|n| n.id).collect();

        let txn = db.begin().await?;
        replace_notes(&txn, owner.0).await?;
        txn.rollback().await?;

        let after: Vec<i32> = notes.list(owner).await?.iter().map(|n| n.id).collect();
        assert_eq!(before, after);
        Ok(())
    }
}
