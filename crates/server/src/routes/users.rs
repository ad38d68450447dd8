use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::Value;
use tracing::warn;

use common::types::MessageBody;
use models::user;
use service::auth::domain::AuthUser;
use service::errors::{ErrorKind, ServiceError};
use service::user_service::{self, UserWithBirthday};

use crate::errors::ApiError;
use crate::state::ServerState;

/// Validation failures are 422 with field errors; the rest follow the error kind.
fn user_error(e: ServiceError) -> ApiError {
    let status = match e.kind() {
        ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Malformed => StatusCode::BAD_REQUEST,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Db => StatusCode::INTERNAL_SERVER_ERROR,
    };
    warn!(%status, error = %e, "user request failed");
    let err = ApiError::new(status, e.to_string());
    match e {
        ServiceError::Validation(errors) => err.with_errors(errors),
        _ => err,
    }
}

/// Accounts are only writable by the user they belong to.
fn ensure_self(caller: &AuthUser, id: i32) -> Result<(), ApiError> {
    if caller.id != id {
        warn!(caller = caller.id, target = id, "user write on another account refused");
        return Err(ApiError::new(StatusCode::FORBIDDEN, "This action is unauthorized."));
    }
    Ok(())
}

fn json_body(body: &Bytes) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.to_string()))
}

#[utoipa::path(get, path = "/api/users", tag = "users", responses((status = 200, description = "All users"), (status = 401, description = "Unauthenticated")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<user::Model>>, ApiError> {
    let users = user_service::list_users(&state.db).await.map_err(user_error)?;
    Ok(Json(users))
}

#[utoipa::path(get, path = "/api/users/{id}", tag = "users", params(("id" = i32, Path, description = "User id")), responses((status = 200, description = "User"), (status = 404, description = "Not found")))]
pub async fn show(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<Json<user::Model>, ApiError> {
    let found = user_service::get_user(&state.db, id).await.map_err(user_error)?;
    Ok(Json(found))
}

#[utoipa::path(post, path = "/api/users", tag = "users", request_body = crate::openapi::SignupRequest, responses((status = 201, description = "Created with birthday"), (status = 422, description = "Validation failed")))]
pub async fn signup(State(state): State<ServerState>, body: Bytes) -> Result<(StatusCode, Json<UserWithBirthday>), ApiError> {
    let input = json_body(&body)?;
    let created = user_service::signup(&state.db, &input).await.map_err(user_error)?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(put, path = "/api/users/{id}", tag = "users", params(("id" = i32, Path, description = "User id")), request_body = crate::openapi::UserUpdateRequest, responses((status = 200, description = "Updated user"), (status = 403, description = "Not the caller's account"), (status = 404, description = "Not found"), (status = 422, description = "Validation failed")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
    body: Bytes,
) -> Result<Json<user::Model>, ApiError> {
    ensure_self(&caller, id)?;
    let input = json_body(&body)?;
    let updated = user_service::update_user(&state.db, id, &input).await.map_err(user_error)?;
    Ok(Json(updated))
}

#[utoipa::path(delete, path = "/api/users/{id}", tag = "users", params(("id" = i32, Path, description = "User id")), responses((status = 200, description = "Deleted"), (status = 403, description = "Not the caller's account"), (status = 404, description = "Not found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<MessageBody>, ApiError> {
    ensure_self(&caller, id)?;
    user_service::delete_user(&state.db, id).await.map_err(user_error)?;
    Ok(Json(MessageBody::new("User deleted successfully")))
}
