//! HTTP-level integration tests for the authentication endpoints.
//!
//! Tests cover login, registration, identity resolution, refresh-token
//! rotation, logout revocation, and the blacklist feature toggle.

mod common;

use axum::http::StatusCode;
use common::{body_json, body_string, get_auth, post_json, post_json_auth};
use sqlx::PgPool;

use kbflow_api::auth::jwt::validate_token;
use kbflow_api::auth::password::hash_password;
use kbflow_db::models::user::{CreateUser, User};
use kbflow_db::repositories::UserRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a test user directly in the database and return the user row plus
/// the plaintext password used.
async fn create_test_user(pool: &PgPool, username: &str, is_admin: bool) -> (User, String) {
    let password = "test_password_123!";
    let hashed = hash_password(password).expect("hashing should succeed");
    let input = CreateUser {
        username: username.to_string(),
        password_hash: hashed,
        full_name: format!("Test {username}"),
        is_admin,
    };
    let user = UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed");
    (user, password.to_string())
}

/// Log in a user via the API and return the JSON response containing
/// `access_token`, `refresh_token`, and `user` info.
async fn login_user(app: axum::Router, username: &str, password: &str) -> serde_json::Value {
    let body = serde_json::json!({ "username": username, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Successful login returns 200 with both tokens and user info.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let (user, password) = create_test_user(&pool, "loginuser", false).await;
    let app = common::build_test_app(pool);

    let json = login_user(app, "loginuser", &password).await;

    assert!(json["access_token"].is_string(), "response must contain access_token");
    assert!(json["refresh_token"].is_string(), "response must contain refresh_token");
    assert_eq!(json["token_type"], "bearer");
    assert!(json["expires_in"].is_number(), "response must contain expires_in");
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["username"], "loginuser");
    assert_eq!(json["user"]["is_admin"], false);
}

/// Wrong-password and unknown-username failures are byte-identical: the
/// response must not reveal which check failed.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_failures_are_indistinguishable(pool: PgPool) {
    let (_user, _password) = create_test_user(&pool, "realuser", false).await;
    let app = common::build_test_app(pool);

    let wrong_password = post_json(
        app.clone(),
        "/api/v1/auth/login",
        serde_json::json!({ "username": "realuser", "password": "wrong_password" }),
    )
    .await;
    let unknown_user = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "username": "ghost", "password": "whatever" }),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    let body_a = body_string(wrong_password).await;
    let body_b = body_string(unknown_user).await;
    assert_eq!(body_a, body_b, "both failures must produce the same body");
}

// ---------------------------------------------------------------------------
// Identity resolution
// ---------------------------------------------------------------------------

/// login -> GET /auth/me resolves to the same user.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_then_me_round_trip(pool: PgPool) {
    let (user, password) = create_test_user(&pool, "roundtrip", false).await;
    let app = common::build_test_app(pool);

    let login = login_user(app.clone(), "roundtrip", &password).await;
    let access_token = login["access_token"].as_str().unwrap();

    let response = get_auth(app, "/api/v1/auth/me", access_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["id"], user.id);
    assert_eq!(json["username"], "roundtrip");
}

/// A request without a token is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_without_token_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::get(app, "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A syntactically invalid token is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_with_garbage_token_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/auth/me", "not.a.jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Refresh rotation
// ---------------------------------------------------------------------------

/// A valid refresh token yields a new pair; the old token is single-use.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_rotation_is_single_use(pool: PgPool) {
    let (_user, password) = create_test_user(&pool, "refresher", false).await;
    let app = common::build_test_app(pool);

    let login = login_user(app.clone(), "refresher", &password).await;
    let old_refresh = login["refresh_token"].as_str().unwrap().to_string();

    // First use succeeds and returns a different token pair.
    let response = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": old_refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let new_refresh = json["refresh_token"].as_str().unwrap();
    assert_ne!(new_refresh, old_refresh, "rotation must mint a new token");

    // The new access token works.
    let new_access = json["access_token"].as_str().unwrap();
    let me = get_auth(app.clone(), "/api/v1/auth/me", new_access).await;
    assert_eq!(me.status(), StatusCode::OK);

    // Second use of the consumed token fails.
    let replay = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": old_refresh }),
    )
    .await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

/// An unknown refresh token is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_with_unknown_token_fails(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": "made-up-token" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Logout & revocation
// ---------------------------------------------------------------------------

/// Logout blacklists the access token and kills the refresh token. The
/// access token still *decodes* fine -- revocation is a second, separate
/// layer on top of signature/expiry validation.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_revokes_both_tokens(pool: PgPool) {
    let (_user, password) = create_test_user(&pool, "leaver", false).await;
    let app = common::build_test_app(pool);

    let login = login_user(app.clone(), "leaver", &password).await;
    let access_token = login["access_token"].as_str().unwrap().to_string();
    let refresh_token = login["refresh_token"].as_str().unwrap().to_string();

    let response = post_json_auth(
        app.clone(),
        "/api/v1/auth/logout",
        serde_json::json!({ "refresh_token": refresh_token }),
        &access_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The token's signature and expiry are still valid...
    let claims = validate_token(&access_token, &common::test_config().jwt);
    assert!(claims.is_ok(), "revoked token must still decode");

    // ...but identity resolution rejects it via the blacklist.
    let me = get_auth(app.clone(), "/api/v1/auth/me", &access_token).await;
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);

    // And the refresh token was deleted.
    let refresh = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": login["refresh_token"] }),
    )
    .await;
    assert_eq!(refresh.status(), StatusCode::UNAUTHORIZED);
}

/// Logout is best-effort: it succeeds even without a decodable access token.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_without_access_token_still_deletes_refresh(pool: PgPool) {
    let (_user, password) = create_test_user(&pool, "quietleaver", false).await;
    let app = common::build_test_app(pool);

    let login = login_user(app.clone(), "quietleaver", &password).await;
    let refresh_token = login["refresh_token"].as_str().unwrap().to_string();

    // No Authorization header at all.
    let response = post_json(
        app.clone(),
        "/api/v1/auth/logout",
        serde_json::json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let refresh = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(refresh.status(), StatusCode::UNAUTHORIZED);
}

/// With the blacklist disabled by configuration, logout no longer kills the
/// access token -- it stays usable until natural expiry.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_disabled_blacklist_skips_revocation(pool: PgPool) {
    let (_user, password) = create_test_user(&pool, "unrevoked", false).await;

    let mut config = common::test_config();
    config.jwt.blacklist_enabled = false;
    let app = common::build_test_app_with(pool, config);

    let login = login_user(app.clone(), "unrevoked", &password).await;
    let access_token = login["access_token"].as_str().unwrap().to_string();
    let refresh_token = login["refresh_token"].as_str().unwrap().to_string();

    let response = post_json_auth(
        app.clone(),
        "/api/v1/auth/logout",
        serde_json::json!({ "refresh_token": refresh_token }),
        &access_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let me = get_auth(app, "/api/v1/auth/me", &access_token).await;
    assert_eq!(
        me.status(),
        StatusCode::OK,
        "with the blacklist off, a logged-out access token keeps working"
    );
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Registration creates a non-admin account and the credentials work.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_then_login(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/auth/register",
        serde_json::json!({
            "username": "newcomer",
            "password": "a-decent-password",
            "full_name": "New Comer"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["username"], "newcomer");
    assert_eq!(json["is_admin"], false, "registration never grants admin");

    let login = login_user(app, "newcomer", "a-decent-password").await;
    assert!(login["access_token"].is_string());
}

/// A taken username is a conflict.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_duplicate_username_conflicts(pool: PgPool) {
    let (_user, _password) = create_test_user(&pool, "taken", false).await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/register",
        serde_json::json!({
            "username": "taken",
            "password": "whatever-password",
            "full_name": "Second Taker"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
