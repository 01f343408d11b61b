//! HTTP-level integration tests for the article endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json, post_json_auth};
use sqlx::PgPool;

use kbflow_api::auth::password::hash_password;
use kbflow_db::models::user::CreateUser;
use kbflow_db::repositories::UserRepo;

const PASSWORD: &str = "article_password_1!";

async fn seed_user(pool: &PgPool, username: &str, is_admin: bool) {
    let input = CreateUser {
        username: username.to_string(),
        password_hash: hash_password(PASSWORD).expect("hashing should succeed"),
        full_name: format!("Test {username}"),
        is_admin,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed");
}

async fn login(app: axum::Router, username: &str) -> String {
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "username": username, "password": PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

fn article_body(number: &str) -> serde_json::Value {
    serde_json::json!({
        "article_uuid": format!("test-uuid-{number}"),
        "article_number": number,
        "title": format!("Reference article {number}"),
        "content": "Some reference text."
    })
}

/// Admins can register articles; the row comes back in the list and by number.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_creates_and_lists_articles(pool: PgPool) {
    seed_user(&pool, "chief", true).await;
    let app = common::build_test_app(pool);
    let token = login(app.clone(), "chief").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/articles",
        article_body("KBA-00001-AA001"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get(app.clone(), "/api/v1/articles").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let response = get(app, "/api/v1/articles/KBA-00001-AA001").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["article_number"], "KBA-00001-AA001");
    assert_eq!(json["data"]["is_active"], true);
}

/// A duplicate article number is a conflict.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_article_number_conflicts(pool: PgPool) {
    seed_user(&pool, "chief", true).await;
    let app = common::build_test_app(pool);
    let token = login(app.clone(), "chief").await;

    let first = post_json_auth(
        app.clone(),
        "/api/v1/articles",
        article_body("KBA-00002-BB002"),
        &token,
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json_auth(
        app,
        "/api/v1/articles",
        article_body("KBA-00002-BB002"),
        &token,
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

/// Regular users cannot register articles.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_non_admin_cannot_create_article(pool: PgPool) {
    seed_user(&pool, "pleb", false).await;
    let app = common::build_test_app(pool);
    let token = login(app.clone(), "pleb").await;

    let response = post_json_auth(
        app,
        "/api/v1/articles",
        article_body("KBA-00003-CC003"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Fetching a nonexistent article number is a 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_article_number_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/articles/KBA-NO-SUCH-0000").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
