use anyhow::Result;
use chrono::NaiveDate;
use sea_orm::{EntityTrait, ModelTrait, PaginatorTrait};

use crate::{birthday, db, note, user, user_credentials};

#[tokio::test]
async fn user_credentials_and_birthday_roundtrip() -> Result<()> {
    let conn = db::connect_memory().await?;

    let u = user::create(&conn, "Ana", "ana@example.com").await?;
    assert!(u.id > 0);
    assert_eq!(user::find_by_email(&conn, "ana@example.com").await?.map(|m| m.id), Some(u.id));

    let first = user_credentials::upsert_password(&conn, u.id, "hash-1".into(), "argon2").await?;
    let second = user_credentials::upsert_password(&conn, u.id, "hash-2".into(), "argon2").await?;
    assert_eq!(first.id, second.id);
    assert_eq!(second.password_hash, "hash-2");

    let birth = NaiveDate::from_ymd_opt(1990, 5, 17).unwrap();
    birthday::create(&conn, u.id, birth).await?;
    let loaded = u.find_related(birthday::Entity).one(&conn).await?.unwrap();
    assert_eq!(loaded.birth, birth);
    Ok(())
}

#[tokio::test]
async fn user_validation_rejects_bad_input() -> Result<()> {
    let conn = db::connect_memory().await?;
    assert!(user::create(&conn, "Ana", "not-an-email").await.is_err());
    assert!(user::create(&conn, "   ", "ana@example.com").await.is_err());
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_rejected_by_schema() -> Result<()> {
    let conn = db::connect_memory().await?;
    user::create(&conn, "Ana", "dup@example.com").await?;
    assert!(user::create(&conn, "Other", "dup@example.com").await.is_err());
    Ok(())
}

#[tokio::test]
async fn owned_by_scopes_notes_to_one_user() -> Result<()> {
    let conn = db::connect_memory().await?;
    let a = user::create(&conn, "A", "a@example.com").await?;
    let b = user::create(&conn, "B", "b@example.com").await?;
    note::create(&conn, a.id, "first", "first body").await?;
    note::create(&conn, a.id, "second", "second body").await?;
    note::create(&conn, b.id, "other", "other body").await?;

    let notes = note::owned_by(a.id).all(&conn).await?;
    assert_eq!(notes.len(), 2);
    assert!(notes.iter().all(|n| n.user_id == a.id));
    assert!(notes[0].id < notes[1].id);
    Ok(())
}

#[tokio::test]
async fn deleting_user_cascades() -> Result<()> {
    let conn = db::connect_memory().await?;
    let u = user::create(&conn, "Gone", "gone@example.com").await?;
    user_credentials::upsert_password(&conn, u.id, "hash".into(), "argon2").await?;
    note::create(&conn, u.id, "bye", "bye body").await?;

    assert!(user::delete(&conn, u.id).await?);
    assert!(!user::delete(&conn, u.id).await?);
    assert_eq!(note::Entity::find().count(&conn).await?, 0);
    assert!(user_credentials::find_for_user(&conn, u.id).await?.is_none());
    Ok(())
}
