#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use configs::{AppConfig, StatusPolicy};
use serde_json::{json, Value};
use tower::Service;

pub async fn build_app(policy: StatusPolicy) -> anyhow::Result<Router> {
    let mut cfg = AppConfig::default();
    cfg.database.url = models::db::MEMORY_URL.to_string();
    cfg.auth.jwt_secret = "test-secret".into();
    cfg.crud.status_policy = policy;
    Ok(server::startup::build_app(&cfg).await?)
}

pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
    pub set_cookie: Option<String>,
}

pub async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<Reply> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {t}"));
    }
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&v)?)
        }
        None => Body::empty(),
    };
    call(app, builder.body(body)?).await
}

pub async fn call(app: &Router, req: Request<Body>) -> anyhow::Result<Reply> {
    let resp = app.clone().call(req).await?;
    let status = resp.status();
    let set_cookie = resp
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok(Reply { status, body, set_cookie })
}

/// Sign up and log in; returns `(user_id, token)`.
pub async fn register(app: &Router, email: &str) -> anyhow::Result<(i64, String)> {
    let signup = json!({"name": "Tester", "email": email, "password": "secret1", "birthday": "1990-01-01"});
    let reply = send(app, "POST", "/api/users", None, Some(signup)).await?;
    assert_eq!(reply.status, StatusCode::CREATED, "signup: {}", reply.body);

    let reply = send(app, "POST", "/api/login", None, Some(json!({"email": email, "password": "secret1"}))).await?;
    assert_eq!(reply.status, StatusCode::OK, "login: {}", reply.body);
    let id = reply.body["user_id"].as_i64().unwrap_or_default();
    let token = reply.body["token"].as_str().unwrap_or_default().to_string();
    Ok((id, token))
}
