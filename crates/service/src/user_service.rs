//! User accounts: signup with credentials and birthday, profile updates, removal.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use models::{birthday, user, user_credentials};
use crate::auth::service::{hash_password, PASSWORD_ALGORITHM};
use crate::errors::ServiceError;
use crate::validation::{RuleSet, ValidationErrors};

pub const SIGNUP_RULES: [(&str, &str); 4] = [
    ("name", "required|string|max:255"),
    ("email", "required|email"),
    ("password", "required|string|min:6"),
    ("birthday", "required|date"),
];

pub const UPDATE_RULES: [(&str, &str); 3] = [
    ("name", "sometimes|string|max:255"),
    ("email", "sometimes|email"),
    ("password", "sometimes|string|min:6"),
];

const EMAIL_TAKEN: &str = "The email has already been taken.";

/// User as returned by signup: the row plus its birthday.
#[derive(Debug, Clone, Serialize)]
pub struct UserWithBirthday {
    #[serde(flatten)]
    pub user: user::Model,
    pub birthday: Option<birthday::Model>,
}

#[derive(Debug, Deserialize)]
struct SignupInput {
    name: String,
    email: String,
    password: String,
    birthday: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UserPatch {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

fn rules(spec: &[(&'static str, &'static str)]) -> Result<RuleSet, ServiceError> {
    RuleSet::parse(spec.iter().copied()).map_err(|e| ServiceError::Malformed(e.to_string()))
}

fn malformed(e: serde_json::Error) -> ServiceError {
    ServiceError::Malformed(e.to_string())
}

/// Calendar date of anything the `date` rule accepts.
fn parse_birth(raw: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| ServiceError::Validation(ValidationErrors::single("birthday", "The birthday field must be a valid date.")))
}

async fn email_taken(db: &DatabaseConnection, email: &str, except: Option<i32>) -> Result<bool, ServiceError> {
    let mut query = user::Entity::find().filter(user::Column::Email.eq(email));
    if let Some(id) = except {
        query = query.filter(user::Column::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

/// All users, oldest first.
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>, ServiceError> {
    let users = user::Entity::find()
        .order_by_asc(user::Column::Id)
        .all(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(users)
}

/// Get a user by id.
pub async fn get_user(db: &DatabaseConnection, id: i32) -> Result<user::Model, ServiceError> {
    user::Entity::find_by_id(id)
        .one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("User"))
}

/// Create a user with hashed credentials and a birthday, all in one transaction.
#[instrument(skip_all)]
pub async fn signup(db: &DatabaseConnection, input: &Value) -> Result<UserWithBirthday, ServiceError> {
    let validated = rules(&SIGNUP_RULES)?.validate(input)?;
    let input: SignupInput = validated.deserialize().map_err(malformed)?;
    if email_taken(db, &input.email, None).await? {
        return Err(ServiceError::Validation(ValidationErrors::single("email", EMAIL_TAKEN)));
    }
    let birth = parse_birth(&input.birthday)?;
    let hash = hash_password(&input.password).map_err(|e| ServiceError::Malformed(e.to_string()))?;

    let txn = db.begin().await?;
    let created = user::create(&txn, &input.name, &input.email).await?;
    user_credentials::upsert_password(&txn, created.id, hash, PASSWORD_ALGORITHM).await?;
    let birthday = birthday::create(&txn, created.id, birth).await?;
    txn.commit().await?;

    info!(user_id = created.id, email = %created.email, "user_registered");
    Ok(UserWithBirthday { user: created, birthday: Some(birthday) })
}

/// Apply the sent fields; the email stays unique across other users and passwords are re-hashed.
#[instrument(skip(db, input))]
pub async fn update_user(db: &DatabaseConnection, id: i32, input: &Value) -> Result<user::Model, ServiceError> {
    let existing = get_user(db, id).await?;
    let validated = rules(&UPDATE_RULES)?.validate(input)?;
    let patch: UserPatch = validated.deserialize().map_err(malformed)?;

    if let Some(email) = &patch.email {
        if email_taken(db, email, Some(id)).await? {
            return Err(ServiceError::Validation(ValidationErrors::single("email", EMAIL_TAKEN)));
        }
    }

    let txn = db.begin().await?;
    let mut am: user::ActiveModel = existing.into();
    if let Some(name) = patch.name {
        am.name = Set(name);
    }
    if let Some(email) = patch.email {
        am.email = Set(email);
    }
    if let Some(password) = patch.password {
        let hash = hash_password(&password).map_err(|e| ServiceError::Malformed(e.to_string()))?;
        user_credentials::upsert_password(&txn, id, hash, PASSWORD_ALGORITHM).await?;
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(&txn).await?;
    txn.commit().await?;

    info!(user_id = id, "user_updated");
    Ok(updated)
}

/// Remove a user; credentials, birthday and notes are removed with it.
#[instrument(skip(db))]
pub async fn delete_user(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    get_user(db, id).await?;
    user::delete(db, id).await?;
    info!(user_id = id, "user_deleted");
    Ok(())
}
