mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use common::TestApp;

async fn create_category(app: &TestApp, token: &str, name: &str) -> String {
    let res = app
        .post(
            "/categories",
            Some(token),
            json!({ "name": name, "icon": "cart", "color": "#FF6B6B" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "body: {}", res.body);
    res.data()["id"].as_str().unwrap().to_string()
}

async fn create_expense(
    app: &TestApp,
    token: &str,
    category_id: &str,
    amount: f64,
    date: &str,
) -> String {
    let res = app
        .post(
            "/expenses",
            Some(token),
            json!({
                "name": "Lunch",
                "amount": amount,
                "categoryId": category_id,
                "date": date,
                "notes": "Pizza",
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "body: {}", res.body);
    res.data()["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn category_crud_and_conflicts() {
    let app = TestApp::spawn().await;
    let (_, token, _) = app.register("alice", "alice@x.com").await;

    let food = create_category(&app, &token, "Food").await;
    create_category(&app, &token, "Bills").await;

    let duplicate = app
        .post("/categories", Some(&token), json!({ "name": "Food" }))
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let list = app.get("/categories", &token).await;
    let names: Vec<_> = list.data().as_array().unwrap().iter().map(|c| c["name"].clone()).collect();
    assert_eq!(names, vec![json!("Bills"), json!("Food")]);

    let renamed = app
        .patch(&format!("/categories/{food}"), &token, json!({ "name": "Groceries" }))
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.data()["name"], "Groceries");
    assert_eq!(renamed.data()["color"], "#FF6B6B");

    create_expense(&app, &token, &food, 12.5, "2026-01-10").await;
    let in_use = app.delete(&format!("/categories/{food}"), &token).await;
    assert_eq!(in_use.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn resources_are_scoped_to_their_owner() {
    let app = TestApp::spawn().await;
    let (_, alice, _) = app.register("alice", "alice@x.com").await;
    let (_, bob, _) = app.register("bob", "bob@x.com").await;

    let category = create_category(&app, &alice, "Food").await;
    let expense = create_expense(&app, &alice, &category, 9.0, "2026-01-05").await;

    assert_eq!(
        app.get(&format!("/categories/{category}"), &bob).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.get(&format!("/expenses/{expense}"), &bob).await.status,
        StatusCode::NOT_FOUND
    );

    let foreign_category = app
        .post(
            "/expenses",
            Some(&bob),
            json!({ "name": "Snack", "amount": 3.0, "categoryId": category, "date": "2026-01-06" }),
        )
        .await;
    assert_eq!(foreign_category.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn expense_listing_paginates_and_filters() {
    let app = TestApp::spawn().await;
    let (_, token, _) = app.register("carol", "carol@x.com").await;
    let food = create_category(&app, &token, "Food").await;
    let rent = create_category(&app, &token, "Rent").await;

    for day in 1..=12 {
        create_expense(&app, &token, &food, 10.0, &format!("2026-01-{day:02}")).await;
    }
    create_expense(&app, &token, &rent, 800.0, "2026-02-01").await;

    let first = app.get("/expenses", &token).await;
    assert_eq!(first.status, StatusCode::OK);
    let expenses = first.data()["expenses"].as_array().unwrap();
    assert_eq!(expenses.len(), 10);
    assert_eq!(expenses[0]["date"], "2026-02-01");
    assert_eq!(expenses[0]["category"]["name"], "Rent");
    assert_eq!(
        first.data()["pagination"],
        json!({ "total": 13, "page": 1, "limit": 10, "totalPages": 2 })
    );

    let second = app.get("/expenses?page=2&limit=10", &token).await;
    assert_eq!(second.data()["expenses"].as_array().unwrap().len(), 3);

    let january = app
        .get(
            &format!("/expenses?startDate=2026-01-05&endDate=2026-01-31&categoryId={food}"),
            &token,
        )
        .await;
    assert_eq!(january.data()["pagination"]["total"], 8);

    let too_big = app.get("/expenses?limit=101", &token).await;
    assert_eq!(too_big.status, StatusCode::BAD_REQUEST);

    let recent = app.get("/expenses/recent", &token).await;
    assert_eq!(recent.data().as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn expense_update_and_delete() {
    let app = TestApp::spawn().await;
    let (_, token, _) = app.register("dave", "dave@x.com").await;
    let food = create_category(&app, &token, "Food").await;
    let expense = create_expense(&app, &token, &food, 15.5, "2026-03-01").await;

    let updated = app
        .patch(
            &format!("/expenses/{expense}"),
            &token,
            json!({ "name": "Updated Lunch", "amount": 20.0 }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.data()["name"], "Updated Lunch");
    assert_eq!(updated.data()["amount"], 20.0);
    assert_eq!(updated.data()["notes"], "Pizza");

    let invalid = app
        .patch(&format!("/expenses/{expense}"), &token, json!({ "amount": -1.0 }))
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

    let deleted = app.delete(&format!("/expenses/{expense}"), &token).await;
    assert_eq!(deleted.data()["message"], "Expense deleted successfully");
    assert_eq!(
        app.get(&format!("/expenses/{expense}"), &token).await.status,
        StatusCode::NOT_FOUND
    );

    let category_gone = app.delete(&format!("/categories/{food}"), &token).await;
    assert_eq!(category_gone.data()["message"], "Category deleted successfully");
}

#[tokio::test]
async fn budget_status_tracks_spending() {
    let app = TestApp::spawn().await;
    let (_, token, _) = app.register("erin", "erin@x.com").await;
    let food = create_category(&app, &token, "Food").await;

    let today = Utc::now().date_naive();
    let start = today - Duration::days(5);
    let end = today + Duration::days(10);
    create_expense(&app, &token, &food, 300.0, &today.to_string()).await;
    create_expense(&app, &token, &food, 50.0, &(start - Duration::days(1)).to_string()).await;

    let created = app
        .post(
            "/budgets",
            Some(&token),
            json!({
                "amount": 500.0,
                "periodType": "CUSTOM",
                "startDate": start.to_string(),
                "endDate": end.to_string(),
            }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "body: {}", created.body);
    let budget_id = created.data()["id"].as_str().unwrap().to_string();
    assert_eq!(created.data()["isActive"], true);

    let status = app.get(&format!("/budgets/{budget_id}/status"), &token).await;
    assert_eq!(
        status.data(),
        &json!({
            "spentAmount": 300.0,
            "remainingAmount": 200.0,
            "percentage": 60.0,
            "daysRemaining": 10,
            "isOverBudget": false,
        })
    );

    let current = app.get("/budgets/current", &token).await;
    assert_eq!(current.data()["id"], budget_id.as_str());
    assert_eq!(current.data()["spentAmount"], 300.0);

    let deactivated = app
        .patch(&format!("/budgets/{budget_id}"), &token, json!({ "isActive": false }))
        .await;
    assert_eq!(deactivated.data()["isActive"], false);
    assert!(app.get("/budgets/current", &token).await.data().is_null());

    let active_only = app.get("/budgets?isActive=true", &token).await;
    assert!(active_only.data().as_array().unwrap().is_empty());
    let all = app.get("/budgets", &token).await;
    assert_eq!(all.data().as_array().unwrap().len(), 1);

    let deleted = app.delete(&format!("/budgets/{budget_id}"), &token).await;
    assert_eq!(deleted.data()["message"], "Budget deleted successfully");
}

#[tokio::test]
async fn budget_rejects_inverted_period() {
    let app = TestApp::spawn().await;
    let (_, token, _) = app.register("frank", "frank@x.com").await;

    let res = app
        .post(
            "/budgets",
            Some(&token),
            json!({
                "amount": 100.0,
                "periodType": "MONTHLY",
                "startDate": "2026-02-01",
                "endDate": "2026-01-01",
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn profile_update_and_account_deletion() {
    let app = TestApp::spawn().await;
    let (_, token, _) = app.register("gina", "gina@x.com").await;
    app.register("hank", "hank@x.com").await;

    let taken = app
        .patch("/users/profile", &token, json!({ "username": "hank" }))
        .await;
    assert_eq!(taken.status, StatusCode::CONFLICT);

    let updated = app
        .patch("/users/profile", &token, json!({ "email": "Gina@New.com" }))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.data()["email"], "gina@new.com");

    let food = create_category(&app, &token, "Food").await;
    create_expense(&app, &token, &food, 5.0, "2026-01-01").await;

    let wrong = app
        .send(
            axum::http::Method::DELETE,
            "/users/account",
            Some(&token),
            Some(json!({ "password": "nope-nope" })),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let deleted = app
        .send(
            axum::http::Method::DELETE,
            "/users/account",
            Some(&token),
            Some(json!({ "password": "password123" })),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.data()["message"], "Account deleted successfully");

    let after = app.get("/users/profile", &token).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_requests_use_the_json_envelope() {
    let app = TestApp::spawn().await;
    let (_, token, _) = app.register("ivy", "ivy@x.com").await;

    let bad_id = app.get("/expenses/not-a-uuid", &token).await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_id.body["status"], 400);
    assert!(bad_id.body["data"].is_null());

    let missing_field = app
        .post("/budgets", Some(&token), json!({ "amount": 10.0 }))
        .await;
    assert_eq!(missing_field.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(missing_field.body["status"], 422);
}
