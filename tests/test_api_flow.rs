//! End-to-end API flow: registration/login, role gating, category and book
//! CRUD, pagination, and the referential guards.
//!
//! Runs against the database pointed to by `DATABASE_URL` and is skipped when
//! that variable is not set. Image-host endpoints are not exercised here (the
//! external host is faked with an unreachable client; nothing in this flow
//! touches it).

use std::env;
use std::sync::Arc;

use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;

use bookstore_api::infra::config;
use bookstore_api::storage::schema;
use bookstore_api::transport;
use bookstore_api::ImageHostClient;

async fn start_server(database_url: &str) -> anyhow::Result<String> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;
    schema::apply_schema(&pool).await?;

    let app_state = transport::http::AppState {
        pool,
        // Unreachable on purpose: this flow never uploads.
        image_host: Arc::new(ImageHostClient::new("http://127.0.0.1:9", "test-key")),
        jwt_secret: Arc::new(config::jwt_secret()),
    };
    let app = transport::http::create_router(app_state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Wait for the server to accept connections.
    for _ in 0..30 {
        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => break,
            Err(_) => tokio::time::sleep(tokio::time::Duration::from_millis(100)).await,
        }
    }

    Ok(format!("http://{}", addr))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_api_flow() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let Ok(database_url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping test_api_flow");
        return Ok(());
    };
    if env::var("JWT_SECRET_KEY").is_err() {
        env::set_var("JWT_SECRET_KEY", "integration-test-secret");
    }

    let base_url = start_server(&database_url).await?;
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    // Unique suffix so repeated runs do not trip the uniqueness constraints.
    let suffix = chrono::Utc::now().timestamp_millis();
    let admin_name = format!("admin-{suffix}");
    let user_name = format!("reader-{suffix}");

    // --- Registration ---
    let register = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({
            "username": admin_name,
            "email": format!("{admin_name}@example.com"),
            "password": "pass-admin",
            "role": "admin"
        }))
        .send()
        .await?;
    assert_eq!(register.status(), 201);
    let body: Value = register.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["role"], "admin");

    // Duplicate username conflicts.
    let duplicate = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({
            "username": admin_name,
            "email": format!("other-{suffix}@example.com"),
            "password": "pass-admin"
        }))
        .send()
        .await?;
    assert_eq!(duplicate.status(), 400);
    let body: Value = duplicate.json().await?;
    assert_eq!(body["success"], false);

    // Malformed JSON still answers with the error envelope, not plain text.
    let malformed = client
        .post(format!("{base_url}/api/auth/register"))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(malformed.status(), 400);
    let body: Value = malformed.json().await?;
    assert_eq!(body["success"], false);

    // Same for malformed query params.
    let bad_filter = client
        .get(format!("{base_url}/api/books/get-books?categoryId=not-a-uuid"))
        .send()
        .await?;
    assert_eq!(bad_filter.status(), 400);
    let body: Value = bad_filter.json().await?;
    assert_eq!(body["success"], false);

    // --- Login ---
    let bad_login = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "username": admin_name, "password": "wrong" }))
        .send()
        .await?;
    assert_eq!(bad_login.status(), 401);

    let login = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "username": admin_name, "password": "pass-admin" }))
        .send()
        .await?;
    assert_eq!(login.status(), 200);
    let body: Value = login.json().await?;
    let admin_token = body["accessToken"].as_str().unwrap().to_string();

    // --- Access control ---
    let no_token = client
        .get(format!("{base_url}/api/home/welcome"))
        .send()
        .await?;
    assert_eq!(no_token.status(), 401);

    let welcome = client
        .get(format!("{base_url}/api/home/welcome"))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    assert_eq!(welcome.status(), 200);

    // A plain user is rejected from admin routes with 403.
    client
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({
            "username": user_name,
            "email": format!("{user_name}@example.com"),
            "password": "pass-user"
        }))
        .send()
        .await?;
    let login = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "username": user_name, "password": "pass-user" }))
        .send()
        .await?;
    let body: Value = login.json().await?;
    let user_token = body["accessToken"].as_str().unwrap().to_string();

    let forbidden = client
        .get(format!("{base_url}/api/admin/welcome"))
        .bearer_auth(&user_token)
        .send()
        .await?;
    assert_eq!(forbidden.status(), 403);

    // --- Categories ---
    let category_name = format!("Sci-Fi Classics {suffix}!");
    let created = client
        .post(format!("{base_url}/api/categories"))
        .bearer_auth(&admin_token)
        .json(&json!({ "name": category_name, "description": "vintage space opera" }))
        .send()
        .await?;
    assert_eq!(created.status(), 201);
    let body: Value = created.json().await?;
    let category_id = body["category"]["id"].as_str().unwrap().to_string();
    let category_slug = body["category"]["slug"].as_str().unwrap().to_string();
    assert_eq!(category_slug, format!("sci-fi-classics-{suffix}"));

    let duplicate = client
        .post(format!("{base_url}/api/categories"))
        .bearer_auth(&admin_token)
        .json(&json!({ "name": category_name }))
        .send()
        .await?;
    assert_eq!(duplicate.status(), 400);

    // An explicit null clears the description; an absent field keeps it.
    let kept = client
        .put(format!("{base_url}/api/categories/{category_id}"))
        .bearer_auth(&admin_token)
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(kept.status(), 200);
    let body: Value = kept.json().await?;
    assert_eq!(body["category"]["description"], "vintage space opera");

    let cleared = client
        .put(format!("{base_url}/api/categories/{category_id}"))
        .bearer_auth(&admin_token)
        .json(&json!({ "description": null }))
        .send()
        .await?;
    assert_eq!(cleared.status(), 200);
    let body: Value = cleared.json().await?;
    assert!(body["category"]["description"].is_null());

    // --- Books ---
    // Unknown category reference is rejected.
    let invalid_ref = client
        .post(format!("{base_url}/api/books/create-book"))
        .bearer_auth(&admin_token)
        .json(&json!({
            "title": "Ghost Book",
            "author": "Nobody",
            "year": 2000,
            "categoryId": uuid::Uuid::new_v4()
        }))
        .send()
        .await?;
    assert_eq!(invalid_ref.status(), 400);

    let mut book_ids = Vec::new();
    for i in 0..3 {
        let created = client
            .post(format!("{base_url}/api/books/create-book"))
            .bearer_auth(&admin_token)
            .json(&json!({
                "title": format!("Foundation {i}"),
                "author": "Isaac Asimov",
                "year": 1951,
                "categoryId": category_id
            }))
            .send()
            .await?;
        assert_eq!(created.status(), 201);
        let body: Value = created.json().await?;
        book_ids.push(body["book"]["id"].as_str().unwrap().to_string());
    }

    // Pagination over the category filter: 3 books, pages of 2.
    let page1: Value = client
        .get(format!(
            "{base_url}/api/books/get-books?page=1&limit=2&category={category_slug}"
        ))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(page1["success"], true);
    assert_eq!(page1["books"].as_array().unwrap().len(), 2);
    assert_eq!(page1["pagination"]["totalBooks"], 3);
    assert_eq!(page1["pagination"]["hasNextPage"], true);
    assert_eq!(page1["pagination"]["hasPrevPage"], false);

    let page2: Value = client
        .get(format!(
            "{base_url}/api/books/get-books?page=2&limit=2&category={category_slug}"
        ))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(page2["books"].as_array().unwrap().len(), 1);
    assert_eq!(page2["pagination"]["hasNextPage"], false);
    assert_eq!(page2["pagination"]["hasPrevPage"], true);

    // Unknown slug filter yields an empty success page.
    let empty: Value = client
        .get(format!(
            "{base_url}/api/books/get-books?category=no-such-slug-{suffix}"
        ))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(empty["success"], true);
    assert_eq!(empty["books"].as_array().unwrap().len(), 0);

    // Single fetch joins category data.
    let single: Value = client
        .get(format!("{base_url}/api/books/get-book/{}", book_ids[0]))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(single["book"]["categorySlug"], category_slug.as_str());

    // Missing ids are 404s, not 500s.
    let missing = client
        .get(format!("{base_url}/api/books/get-book/{}", uuid::Uuid::new_v4()))
        .send()
        .await?;
    assert_eq!(missing.status(), 404);
    let missing = client
        .delete(format!("{base_url}/api/books/delete-book/{}", uuid::Uuid::new_v4()))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    assert_eq!(missing.status(), 404);

    // Category deletion is blocked while books reference it.
    let blocked = client
        .delete(format!("{base_url}/api/categories/{category_id}"))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    assert_eq!(blocked.status(), 400);
    let body: Value = blocked.json().await?;
    assert_eq!(body["inUseCount"], 3);

    // Update a book, then clear the catalog.
    let updated = client
        .put(format!("{base_url}/api/books/update-book/{}", book_ids[0]))
        .bearer_auth(&admin_token)
        .json(&json!({ "title": "Foundation and Empire" }))
        .send()
        .await?;
    assert_eq!(updated.status(), 200);
    let body: Value = updated.json().await?;
    assert_eq!(body["book"]["title"], "Foundation and Empire");
    assert_eq!(body["book"]["author"], "Isaac Asimov");

    for id in &book_ids {
        let deleted = client
            .delete(format!("{base_url}/api/books/delete-book/{id}"))
            .bearer_auth(&admin_token)
            .send()
            .await?;
        assert_eq!(deleted.status(), 200);
    }
    let deleted = client
        .delete(format!("{base_url}/api/categories/{category_id}"))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    assert_eq!(deleted.status(), 200);

    // --- Self-service account changes ---
    let too_short = client
        .post(format!("{base_url}/api/auth/change-username"))
        .bearer_auth(&user_token)
        .json(&json!({ "newUsername": "ab" }))
        .send()
        .await?;
    assert_eq!(too_short.status(), 400);

    let wrong_old = client
        .post(format!("{base_url}/api/auth/change-password"))
        .bearer_auth(&user_token)
        .json(&json!({ "oldPassword": "nope", "newPassword": "pass-user-2" }))
        .send()
        .await?;
    assert_eq!(wrong_old.status(), 401);

    let changed = client
        .post(format!("{base_url}/api/auth/change-password"))
        .bearer_auth(&user_token)
        .json(&json!({ "oldPassword": "pass-user", "newPassword": "pass-user-2" }))
        .send()
        .await?;
    assert_eq!(changed.status(), 200);

    let relogin = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "username": user_name, "password": "pass-user-2" }))
        .send()
        .await?;
    assert_eq!(relogin.status(), 200);

    Ok(())
}
