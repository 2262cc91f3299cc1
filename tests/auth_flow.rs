mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use common::TestApp;
use finance_tracker::{auth::jwt::TokenIssuer, db::dao::DaoContext, db::entities::user};

async fn refresh(app: &TestApp, token: &str) -> common::TestResponse {
    app.post("/auth/refresh", None, json!({ "refreshToken": token }))
        .await
}

fn assert_rejected(res: &common::TestResponse) {
    assert_eq!(res.status, StatusCode::UNAUTHORIZED, "body: {}", res.body);
    assert_eq!(res.body["message"], "Unauthorized");
    assert!(res.body["data"].is_null());
}

#[tokio::test]
async fn register_login_refresh_logout_scenario() {
    let app = TestApp::spawn().await;
    let (user_id, _, _) = app.register("alice", "alice@x.com").await;

    let login = app
        .post(
            "/auth/login",
            None,
            json!({ "emailOrUsername": "alice", "password": "password123" }),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.data()["user"]["id"], user_id.as_str());
    assert!(login.data()["user"].get("passwordHash").is_none());
    let first = login.data()["refreshToken"].as_str().unwrap().to_string();

    let rotated = refresh(&app, &first).await;
    assert_eq!(rotated.status, StatusCode::OK);
    let second = rotated.data()["refreshToken"].as_str().unwrap().to_string();
    let access = rotated.data()["accessToken"].as_str().unwrap().to_string();
    assert_ne!(first, second);

    assert_rejected(&refresh(&app, &first).await);

    let again = refresh(&app, &second).await;
    assert_eq!(again.status, StatusCode::OK);
    let third = again.data()["refreshToken"].as_str().unwrap().to_string();

    let logout = app
        .post("/auth/logout", Some(&access), json!({ "refreshToken": third }))
        .await;
    assert_eq!(logout.status, StatusCode::OK);
    assert_eq!(logout.data()["message"], "Logged out successfully");

    assert_rejected(&refresh(&app, &third).await);
}

#[tokio::test]
async fn logout_with_token_keeps_other_sessions() {
    let app = TestApp::spawn().await;
    let (_, access, phone) = app.register("bob", "bob@x.com").await;
    let laptop = app
        .post(
            "/auth/login",
            None,
            json!({ "emailOrUsername": "bob@x.com", "password": "password123" }),
        )
        .await
        .data()["refreshToken"]
        .as_str()
        .unwrap()
        .to_string();

    let res = app
        .post("/auth/logout", Some(&access), json!({ "refreshToken": phone }))
        .await;
    assert_eq!(res.status, StatusCode::OK);

    assert_rejected(&refresh(&app, &phone).await);
    assert_eq!(refresh(&app, &laptop).await.status, StatusCode::OK);
}

#[tokio::test]
async fn logout_without_token_ends_every_session() {
    let app = TestApp::spawn().await;
    let (_, access, phone) = app.register("carol", "carol@x.com").await;
    let laptop = app
        .post(
            "/auth/login",
            None,
            json!({ "emailOrUsername": "carol", "password": "password123" }),
        )
        .await
        .data()["refreshToken"]
        .as_str()
        .unwrap()
        .to_string();

    let res = app.send(Method::POST, "/auth/logout", Some(&access), None).await;
    assert_eq!(res.status, StatusCode::OK);

    assert_rejected(&refresh(&app, &phone).await);
    assert_rejected(&refresh(&app, &laptop).await);
}

#[tokio::test]
async fn logout_with_blank_token_ends_every_session() {
    let app = TestApp::spawn().await;
    let (_, access, phone) = app.register("nina", "nina@x.com").await;
    let laptop = app
        .post(
            "/auth/login",
            None,
            json!({ "emailOrUsername": "nina", "password": "password123" }),
        )
        .await
        .data()["refreshToken"]
        .as_str()
        .unwrap()
        .to_string();

    let res = app
        .post("/auth/logout", Some(&access), json!({ "refreshToken": "  " }))
        .await;
    assert_eq!(res.status, StatusCode::OK);

    assert_rejected(&refresh(&app, &phone).await);
    assert_rejected(&refresh(&app, &laptop).await);
}

#[tokio::test]
async fn logout_with_null_body_ends_every_session() {
    let app = TestApp::spawn().await;
    let (_, access, refresh_token) = app.register("omar", "omar@x.com").await;

    let res = app
        .post("/auth/logout", Some(&access), serde_json::Value::Null)
        .await;
    assert_eq!(res.status, StatusCode::OK, "body: {}", res.body);

    assert_rejected(&refresh(&app, &refresh_token).await);
}

#[tokio::test]
async fn deactivated_user_loses_access_and_refresh() {
    let app = TestApp::spawn().await;
    let (user_id, access, refresh_token) = app.register("dave", "dave@x.com").await;
    assert_eq!(app.get("/auth/profile", &access).await.status, StatusCode::OK);

    DaoContext::new(&app.state.db)
        .user()
        .set_active(&Uuid::parse_str(&user_id).unwrap(), false)
        .await
        .unwrap();

    assert_rejected(&app.get("/auth/profile", &access).await);
    assert_rejected(&refresh(&app, &refresh_token).await);
}

#[tokio::test]
async fn expired_refresh_record_is_rejected() {
    let app = TestApp::spawn().await;
    let (user_id, _, _) = app.register("erin", "erin@x.com").await;
    let daos = DaoContext::new(&app.state.db);
    let user_id = Uuid::parse_str(&user_id).unwrap();
    let user: user::Model = daos.user().find_by_email("erin@x.com").await.unwrap().unwrap();

    let issuer: &TokenIssuer = &app.state.tokens;
    let token = issuer.issue(&user).unwrap().pair.refresh_token;
    daos.refresh_token()
        .create_refresh_token(&user_id, &token, Utc::now().fixed_offset() - Duration::seconds(1))
        .await
        .unwrap();

    assert_rejected(&refresh(&app, &token).await);
}

#[tokio::test]
async fn refresh_rejects_missing_and_misplaced_tokens() {
    let app = TestApp::spawn().await;
    let (_, access, _) = app.register("frank", "frank@x.com").await;

    assert_rejected(&app.post("/auth/refresh", None, json!({})).await);
    assert_rejected(&refresh(&app, "").await);
    assert_rejected(&refresh(&app, &access).await);
    assert_rejected(&refresh(&app, "not-a-jwt").await);
}

#[tokio::test]
async fn access_routes_reject_missing_or_refresh_tokens() {
    let app = TestApp::spawn().await;
    let (_, _, refresh_token) = app.register("gina", "gina@x.com").await;

    assert_rejected(&app.send(Method::GET, "/auth/profile", None, None).await);
    assert_rejected(&app.get("/auth/profile", &refresh_token).await);
}

#[tokio::test]
async fn registration_normalizes_and_rejects_duplicates() {
    let app = TestApp::spawn().await;
    let res = app
        .post(
            "/auth/register",
            None,
            json!({ "username": "  henry ", "email": " Henry@X.com ", "password": "password123" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.data()["user"]["email"], "henry@x.com");
    assert_eq!(res.data()["user"]["username"], "henry");

    let duplicate = app
        .post(
            "/auth/register",
            None,
            json!({ "username": "henry2", "email": "henry@x.com", "password": "password123" }),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let weak = app
        .post(
            "/auth/register",
            None,
            json!({ "username": "ivy", "email": "ivy@x.com", "password": "short" }),
        )
        .await;
    assert_eq!(weak.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let app = TestApp::spawn().await;
    app.register("jack", "jack@x.com").await;

    let res = app
        .post(
            "/auth/login",
            None,
            json!({ "emailOrUsername": "jack", "password": "password999" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn change_password_revokes_sessions() {
    let app = TestApp::spawn().await;
    let (_, access, refresh_token) = app.register("kate", "kate@x.com").await;

    let res = app
        .post(
            "/users/change-password",
            Some(&access),
            json!({ "currentPassword": "password123", "newPassword": "newpassword456" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["message"], "Password changed successfully");
    assert_rejected(&refresh(&app, &refresh_token).await);

    let login = app
        .post(
            "/auth/login",
            None,
            json!({ "emailOrUsername": "kate", "password": "newpassword456" }),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
}
