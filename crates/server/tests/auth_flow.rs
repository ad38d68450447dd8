mod support;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use configs::StatusPolicy;
use serde_json::json;

use support::{build_app, call, register, send};

#[tokio::test]
async fn protected_routes_require_a_token() -> anyhow::Result<()> {
    let app = build_app(StatusPolicy::PerEndpoint).await?;

    let reply = send(&app, "GET", "/api/notes", None, None).await?;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body, json!({"message": "Unauthenticated."}));

    let reply = send(&app, "GET", "/api/users", Some("garbage"), None).await?;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body, json!({"message": "Unauthenticated."}));
    Ok(())
}

#[tokio::test]
async fn login_sets_cookie_that_authenticates() -> anyhow::Result<()> {
    let app = build_app(StatusPolicy::PerEndpoint).await?;
    register(&app, "u@example.com").await?;

    let reply = send(&app, "POST", "/api/login", None, Some(json!({"email": "u@example.com", "password": "secret1"}))).await?;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["email"], "u@example.com");
    let cookie = reply.set_cookie.expect("auth cookie");
    assert!(cookie.starts_with("auth_token="));
    assert!(cookie.contains("HttpOnly"));

    let pair = cookie.split(';').next().unwrap_or_default().to_string();
    let req = Request::builder().method("GET").uri("/api/notes").header("cookie", pair.as_str()).body(Body::empty())?;
    let reply = call(&app, req).await?;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, json!({"notes": []}));

    let req = Request::builder().method("POST").uri("/api/logout").header("cookie", pair.as_str()).body(Body::empty())?;
    let reply = call(&app, req).await?;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);
    assert!(reply.set_cookie.unwrap_or_default().starts_with("auth_token=;"));
    Ok(())
}

#[tokio::test]
async fn login_wrong_password() -> anyhow::Result<()> {
    let app = build_app(StatusPolicy::PerEndpoint).await?;
    register(&app, "u@example.com").await?;

    let reply = send(&app, "POST", "/api/login", None, Some(json!({"email": "u@example.com", "password": "wrong"}))).await?;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = send(&app, "POST", "/api/login", None, Some(json!({"email": "u@example.com"}))).await?;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn signup_validation_is_422_with_field_errors() -> anyhow::Result<()> {
    let app = build_app(StatusPolicy::PerEndpoint).await?;

    let reply = send(&app, "POST", "/api/users", None, Some(json!({"name": "A", "email": "nope", "password": "123"}))).await?;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reply.body["message"], "The email field must be a valid email address. (and 2 more errors)");
    assert_eq!(reply.body["errors"]["password"][0], "The password field must be at least 6 characters.");
    assert_eq!(reply.body["errors"]["birthday"][0], "The birthday field is required.");

    register(&app, "dup@example.com").await?;
    let dup = json!({"name": "B", "email": "dup@example.com", "password": "secret1", "birthday": "1990-01-01"});
    let reply = send(&app, "POST", "/api/users", None, Some(dup)).await?;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reply.body["errors"]["email"][0], "The email has already been taken.");
    Ok(())
}

#[tokio::test]
async fn user_management_round() -> anyhow::Result<()> {
    let app = build_app(StatusPolicy::PerEndpoint).await?;
    let (uid, token) = register(&app, "u@example.com").await?;
    let t = Some(token.as_str());
    let item = format!("/api/users/{uid}");

    let reply = send(&app, "GET", "/api/users", t, None).await?;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body.as_array().map(Vec::len), Some(1));
    assert!(reply.body[0].get("password_hash").is_none());

    let reply = send(&app, "PUT", &item, t, Some(json!({"name": "Renamed"}))).await?;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["name"], "Renamed");
    assert_eq!(reply.body["email"], "u@example.com");

    let reply = send(&app, "GET", "/api/users/999", t, None).await?;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    let reply = send(&app, "DELETE", &item, t, None).await?;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, json!({"message": "User deleted successfully"}));

    // the token outlives its user but no longer authenticates
    let reply = send(&app, "GET", "/api/notes", t, None).await?;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn users_cannot_modify_other_accounts() -> anyhow::Result<()> {
    let app = build_app(StatusPolicy::PerEndpoint).await?;
    let (alice_id, _) = register(&app, "alice@example.com").await?;
    let (_, bob) = register(&app, "bob@example.com").await?;
    let alice_item = format!("/api/users/{alice_id}");

    let reply = send(&app, "PUT", &alice_item, Some(&bob), Some(json!({"password": "taken0ver"}))).await?;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.body, json!({"message": "This action is unauthorized."}));

    let reply = send(&app, "DELETE", &alice_item, Some(&bob), None).await?;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    // alice's password is unchanged and her account still exists
    let reply = send(&app, "POST", "/api/login", None, Some(json!({"email": "alice@example.com", "password": "secret1"}))).await?;
    assert_eq!(reply.status, StatusCode::OK);
    let reply = send(&app, "GET", &alice_item, Some(&bob), None).await?;
    assert_eq!(reply.status, StatusCode::OK);
    Ok(())
}
