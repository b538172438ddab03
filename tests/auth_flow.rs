mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use storefront_api::clock::ManualClock;

use common::{ADMIN_PASSWORD, ADMIN_USERNAME, Call, spawn_app, spawn_app_with_clock};

fn bearer(token: &str) -> Call<'_> {
    Call {
        token: Some(token),
        ..Call::default()
    }
}

fn body(value: serde_json::Value) -> Call<'static> {
    Call {
        body: Some(value),
        ..Call::default()
    }
}

#[tokio::test]
async fn wrong_password_is_rejected_without_creating_a_session() {
    let app = spawn_app().await;

    let (status, resp) = app
        .call(
            Method::POST,
            "/api/auth/login",
            body(json!({ "username": ADMIN_USERNAME, "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp["message"], "Invalid credentials");
    assert!(app.state.sessions.is_empty().await);

    let (status, _) = app
        .call(
            Method::POST,
            "/api/auth/login",
            body(json!({ "username": "ghost", "password": ADMIN_PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(app.state.sessions.is_empty().await);
}

#[tokio::test]
async fn me_requires_a_valid_token() {
    let app = spawn_app().await;

    let (status, resp) = app.get("/api/auth/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp["message"], "Unauthorized");

    let (status, _) = app.call(Method::GET, "/api/auth/me", bearer("made-up")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_login_returns_a_password_free_profile() {
    let app = spawn_app().await;
    let token = app.admin_token().await;

    let (status, resp) = app.call(Method::GET, "/api/auth/me", bearer(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let user = resp["data"].as_object().unwrap();
    assert_eq!(user["role"], "admin");
    assert_eq!(user["username"], ADMIN_USERNAME);
    assert!(!user.contains_key("password"));
    assert!(!user.contains_key("passwordHash"));
}

#[tokio::test]
async fn registration_signs_the_user_in() {
    let app = spawn_app().await;
    let (token, id) = app.register("Jane Doe", "jane@example.com").await;

    let (status, resp) = app.call(Method::GET, "/api/auth/me", bearer(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["data"]["id"], id.as_str());
    assert_eq!(resp["data"]["role"], "user");
    assert_eq!(resp["data"]["isActive"], true);

    let (status, resp) = app
        .call(
            Method::POST,
            "/api/auth/register",
            body(json!({ "name": "Other", "email": "JANE@example.com", "password": "secret-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["message"].as_str().unwrap().contains("Email is already taken"));
}

#[tokio::test]
async fn registration_validates_its_input() {
    let app = spawn_app().await;
    for invalid in [
        json!({ "name": "", "email": "a@example.com", "password": "secret-pass" }),
        json!({ "name": "A", "email": "not-an-email", "password": "secret-pass" }),
        json!({ "name": "A", "email": "a@example.com", "password": "123" }),
        json!({ "name": "A", "email": "a@example.com" }),
    ] {
        let (status, _) = app
            .call(Method::POST, "/api/auth/register", body(invalid))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
    assert!(app.state.sessions.is_empty().await);
}

#[tokio::test]
async fn email_login_is_for_shoppers_only() {
    let app = spawn_app().await;
    app.register("Jane Doe", "jane@example.com").await;

    let (status, resp) = app
        .call(
            Method::POST,
            "/api/auth/user-login",
            body(json!({ "email": "jane@example.com", "password": "secret-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(resp["data"]["sessionId"].is_string());
    assert_eq!(resp["data"]["user"]["email"], "jane@example.com");

    let (status, _) = app
        .call(
            Method::POST,
            "/api/auth/user-login",
            body(json!({ "email": "admin@techstore.local", "password": ADMIN_PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_destroys_the_session() {
    let app = spawn_app().await;
    let token = app.admin_token().await;

    let (status, _) = app.call(Method::POST, "/api/auth/logout", bearer(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.call(Method::GET, "/api/auth/me", bearer(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Logging out twice, or with no token at all, is harmless.
    let (status, _) = app.call(Method::POST, "/api/auth/logout", bearer(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.call(Method::POST, "/api/auth/logout", Call::default()).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn sessions_expire_after_a_day() {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
    ));
    let app = spawn_app_with_clock(clock.clone()).await;
    let token = app.admin_token().await;

    let (status, _) = app.call(Method::GET, "/api/auth/me", bearer(&token)).await;
    assert_eq!(status, StatusCode::OK);

    clock.advance(Duration::hours(23));
    let (status, _) = app.call(Method::GET, "/api/auth/me", bearer(&token)).await;
    assert_eq!(status, StatusCode::OK);

    clock.advance(Duration::hours(1));
    let (status, resp) = app.call(Method::GET, "/api/auth/me", bearer(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp["message"], "Session expired");
    assert!(app.state.sessions.is_empty().await);
}

#[tokio::test]
async fn dashboard_is_admin_only() {
    let app = spawn_app().await;
    let (user_token, _) = app.register("Jane Doe", "jane@example.com").await;

    let (status, _) = app.get("/api/admin/dashboard").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, resp) = app
        .call(Method::GET, "/api/admin/dashboard", bearer(&user_token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(resp["message"], "Forbidden");

    let admin = app.admin_token().await;
    let (status, resp) = app
        .call(Method::GET, "/api/admin/dashboard", bearer(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["data"]["totalUsers"], 2);
    assert_eq!(resp["data"]["totalProducts"], 6);
    assert_eq!(resp["data"]["totalCategories"], 4);
    assert_eq!(resp["data"]["totalCartItems"], 0);
}

#[tokio::test]
async fn profiles_are_editable_by_their_owner_or_an_admin() {
    let app = spawn_app().await;
    let (jane, jane_id) = app.register("Jane Doe", "jane@example.com").await;
    let (_, john_id) = app.register("John Roe", "john@example.com").await;

    let (status, resp) = app
        .call(
            Method::PUT,
            &format!("/api/users/{jane_id}"),
            Call {
                token: Some(&jane),
                body: Some(json!({ "city": "Lisbon", "zipCode": "1100-001" })),
                ..Call::default()
            },
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["data"]["city"], "Lisbon");
    assert_eq!(resp["data"]["zipCode"], "1100-001");
    assert_eq!(resp["data"]["name"], "Jane Doe");

    let (status, _) = app
        .call(
            Method::PUT,
            &format!("/api/users/{john_id}"),
            Call {
                token: Some(&jane),
                body: Some(json!({ "name": "Hijacked" })),
                ..Call::default()
            },
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .call(
            Method::PUT,
            &format!("/api/users/{jane_id}"),
            Call {
                token: Some(&jane),
                body: Some(json!({ "email": "john@example.com" })),
                ..Call::default()
            },
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let admin = app.admin_token().await;
    let (status, resp) = app
        .call(
            Method::PUT,
            &format!("/api/users/{john_id}"),
            Call {
                token: Some(&admin),
                body: Some(json!({ "phone": "+351 555 0100" })),
                ..Call::default()
            },
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["data"]["phone"], "+351 555 0100");

    let (status, _) = app
        .call(
            Method::PUT,
            &format!("/api/users/{jane_id}"),
            Call {
                body: Some(json!({ "city": "Porto" })),
                ..Call::default()
            },
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_catalog_changes_are_reflected_everywhere() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let dell = app.product_id("dell").await;
    let macbook = app.product_id("macbook").await;

    for product in [&dell, &macbook] {
        app.call(
            Method::POST,
            "/api/cart",
            Call {
                session: Some("s1"),
                body: Some(json!({ "productId": product })),
                ..Call::default()
            },
        )
        .await;
    }

    let (status, resp) = app
        .call(
            Method::POST,
            "/api/admin/products",
            Call {
                token: Some(&admin),
                body: Some(json!({
                    "name": "USB-C Cable",
                    "description": "Braided, two meters.",
                    "price": "19.99",
                    "image": "https://example.com/cable.jpg",
                    "category": "Laptops"
                })),
                ..Call::default()
            },
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(resp["data"]["price"], "19.99");
    assert_eq!(resp["data"]["featured"], false);

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/api/admin/products/{dell}"),
            bearer(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/api/admin/products/{dell}"),
            bearer(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The orphaned cart line disappears from reads.
    let (_, cart) = app
        .call(
            Method::GET,
            "/api/cart",
            Call {
                session: Some("s1"),
                ..Call::default()
            },
        )
        .await;
    let lines = cart["data"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["productId"], macbook.as_str());

    // Laptops: MacBook + cable, Dell gone.
    let (_, categories) = app.get("/api/categories").await;
    let laptops = categories["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "Laptops")
        .unwrap()
        .clone();
    assert_eq!(laptops["productCount"], 2);

    let (user, _) = app.register("Jane Doe", "jane@example.com").await;
    let (status, _) = app
        .call(
            Method::POST,
            "/api/admin/categories",
            Call {
                token: Some(&user),
                body: Some(json!({ "name": "Wearables", "icon": "fas fa-clock" })),
                ..Call::default()
            },
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, resp) = app
        .call(
            Method::POST,
            "/api/admin/categories",
            Call {
                token: Some(&admin),
                body: Some(json!({ "name": "Wearables", "icon": "fas fa-clock" })),
                ..Call::default()
            },
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(resp["data"]["productCount"], 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn simultaneous_signups_with_one_email_create_one_account() {
    let app = Arc::new(spawn_app().await);

    let tasks: Vec<_> = (0..4)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                app.call(
                    Method::POST,
                    "/api/auth/register",
                    body(json!({
                        "name": format!("Dup {i}"),
                        "email": "dup@example.com",
                        "password": "secret-pass"
                    })),
                )
                .await
            })
        })
        .collect();

    let mut created = 0;
    for task in tasks {
        let (status, resp) = task.await.unwrap();
        if status == StatusCode::CREATED {
            created += 1;
        } else {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(resp["message"], "Bad Request: Email is already taken");
        }
    }
    assert_eq!(created, 1);
    assert_eq!(app.state.storage.counts().await.users, 2);

    let (status, _) = app
        .call(
            Method::POST,
            "/api/auth/user-login",
            body(json!({ "email": "dup@example.com", "password": "secret-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn duplicate_category_names_are_rejected() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, resp) = app
        .call(
            Method::POST,
            "/api/admin/categories",
            Call {
                token: Some(&admin),
                body: Some(json!({ "name": "laptops", "icon": "fas fa-laptop" })),
                ..Call::default()
            },
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["message"], "Bad Request: Category already exists");
}
