use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use tracing::{error, warn};

use service::auth::domain::LoginInput;
use service::auth::errors::AuthError;
use service::crud::OwnerId;

use crate::errors::ApiError;
use crate::state::ServerState;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginOutput {
    pub user_id: i32,
    pub email: String,
    pub name: String,
    pub token: String,
}

#[utoipa::path(post, path = "/api/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged in", body = LoginOutput), (status = 400, description = "Malformed body"), (status = 401, description = "Invalid credentials")))]
pub async fn login(State(state): State<ServerState>, jar: CookieJar, body: Bytes) -> Result<(CookieJar, Json<LoginOutput>), ApiError> {
    let input: LoginInput = serde_json::from_slice(&body)
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.to_string()))?;
    let session = state.auth.login(input).await.map_err(|e| match e {
        AuthError::Unauthorized => ApiError::new(StatusCode::UNAUTHORIZED, "Invalid credentials."),
        other => {
            error!(code = other.code(), error = %other, "login failed");
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    })?;

    let mut cookie = Cookie::new(AUTH_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    let user = session.user;
    let out = LoginOutput { user_id: user.id, email: user.email, name: user.name, token: session.token };
    Ok((jar.add(cookie), Json(out)))
}

#[utoipa::path(post, path = "/api/logout", tag = "auth", responses((status = 204, description = "Cookie cleared")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    (jar.remove(cookie), StatusCode::NO_CONTENT)
}

/// `Authorization: Bearer <token>`, falling back to the `auth_token` cookie.
fn request_token(req: &Request) -> Option<String> {
    if let Some(h) = req.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return h.strip_prefix("Bearer ").map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
    }
    CookieJar::from_headers(req.headers())
        .get(AUTH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}

/// Resolve the caller to an existing user and expose it to handlers as [`OwnerId`].
pub async fn require_owner(State(state): State<ServerState>, mut req: Request, next: Next) -> Result<Response, ApiError> {
    let path = req.uri().path().to_string();
    let Some(token) = request_token(&req) else {
        warn!(path = %path, "missing bearer token and auth cookie");
        return Err(ApiError::unauthenticated());
    };
    let user = state.auth.authenticate(&token).await.map_err(|e| {
        warn!(path = %path, code = e.code(), error = %e, "token rejected");
        ApiError::unauthenticated()
    })?;
    req.extensions_mut().insert(OwnerId(user.id));
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
