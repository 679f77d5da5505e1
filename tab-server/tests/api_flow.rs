//! End-to-end HTTP flows through the fully layered router

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use tab_server::api::build_app;
use tab_server::core::{BootstrapManager, Config};
use tab_server::{ErrorCode, ServerState};

const MANAGER: &str = "admin";
const MANAGER_PASSWORD: &str = "admin-secret";

async fn test_app() -> Router {
    let mut config = Config::in_memory();
    config.bootstrap_manager = Some(BootstrapManager {
        username: MANAGER.to_string(),
        password: MANAGER_PASSWORD.to_string(),
    });

    let state = ServerState::initialize(&config)
        .await
        .expect("state should initialize");
    build_app(&state).with_state(state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/user/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    assert_eq!(body["data"]["token_type"], "bearer");
    body["data"]["access_token"].as_str().unwrap().to_string()
}

async fn register(app: &Router, manager: &str, username: &str, role: &str) {
    let (status, body) = send(
        app,
        Method::POST,
        "/user/register",
        Some(manager),
        Some(json!({
            "name": username,
            "username": username,
            "password": "password123",
            "role": role,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
}

fn item(id: &str, name: &str) -> Value {
    json!({
        "item_id": id,
        "type": "Starter",
        "item_name": name,
        "quantity": 1,
        "cost": 120.0,
        "status": "pending",
        "added_by": "waiter1",
        "date": "2024-05-01T12:00:00Z",
    })
}

#[tokio::test]
async fn test_welcome_and_health_are_public() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Welcome to Tab based Order Management System!"
    );

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], "ok");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/order/all", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], ErrorCode::NotAuthenticated.code());

    let (status, body) = send(&app, Method::GET, "/tabs/list_tabs", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], ErrorCode::TokenInvalid.code());

    let (status, _) = send(&app, Method::GET, "/no/such/route", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_rejects_bad_password() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/user/login",
        None,
        Some(json!({ "username": MANAGER, "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], ErrorCode::InvalidCredentials.code());
}

#[tokio::test]
async fn test_order_and_kitchen_flow() {
    let app = test_app().await;
    let manager = login(&app, MANAGER, MANAGER_PASSWORD).await;
    register(&app, &manager, "cook1", "Cook").await;
    register(&app, &manager, "waiter1", "Waiter").await;
    let cook = login(&app, "cook1", "password123").await;
    let waiter = login(&app, "waiter1", "password123").await;

    // Waiter places an order with two pending items
    let (status, body) = send(
        &app,
        Method::POST,
        "/order/create",
        Some(&waiter),
        Some(json!({
            "order_id": "O1",
            "table": "5",
            "items": [item("i1", "Soup"), item("i2", "Salad")],
            "order_date_time": "2024-05-01T12:00:00Z",
            "bill_amount": 240.0,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["placed_by"]["username"], "waiter1");

    // Same order id again
    let (status, body) = send(
        &app,
        Method::POST,
        "/order/create",
        Some(&waiter),
        Some(json!({
            "order_id": "O1",
            "items": [],
            "order_date_time": "2024-05-01T12:00:00Z",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], ErrorCode::OrderIdExists.code());

    let (_, body) = send(&app, Method::GET, "/order/all", Some(&waiter), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Kitchen queue is cook-only
    let (status, body) = send(&app, Method::GET, "/cook/list_pending_dishes", Some(&waiter), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], ErrorCode::RoleRequired.code());

    let (status, body) = send(&app, Method::GET, "/cook/list_pending_dishes", Some(&cook), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["dish_name"], "Soup");

    // First pending item is the one updated
    let (status, body) = send(
        &app,
        Method::PUT,
        "/cook/update_order_status/O1",
        Some(&cook),
        Some(json!({ "status": "completed", "cook": "cook1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["item_id"], "i1");
    assert_eq!(body["data"]["cook"], "cook1");

    let (_, body) = send(&app, Method::GET, "/cook/list_pending_dishes", Some(&cook), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["dish_name"], "Salad");

    // Billing status
    let (status, body) = send(
        &app,
        Method::PUT,
        "/order/set_billing_status/O1/bogus",
        Some(&waiter),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], ErrorCode::InvalidPaymentStatus.code());

    let (status, body) = send(
        &app,
        Method::PUT,
        "/order/set_billing_status/O1/paid",
        Some(&waiter),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["payment_status"], "paid");

    // Takeaway conversion is one-way
    let (status, _) = send(&app, Method::PUT, "/order/make_takeaway/O1", Some(&waiter), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, Method::PUT, "/order/make_takeaway/O1", Some(&waiter), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], ErrorCode::OrderAlreadyTakeaway.code());

    // Cancel, then status reflects it
    let (status, _) = send(&app, Method::DELETE, "/order/cancel/O1", Some(&waiter), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, Method::GET, "/order/status/O1", Some(&waiter), None).await;
    assert_eq!(body["data"]["order_status"], "cancelled");

    let (status, body) = send(&app, Method::GET, "/order/get/missing", Some(&waiter), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], ErrorCode::OrderNotFound.code());
}

#[tokio::test]
async fn test_dish_catalog_flow() {
    let app = test_app().await;
    let manager = login(&app, MANAGER, MANAGER_PASSWORD).await;
    register(&app, &manager, "cook1", "Cook").await;
    let cook = login(&app, "cook1", "password123").await;

    let dish = json!({
        "id": "d1",
        "name": "Paneer Tikka",
        "type": "Starter",
        "rate": 250.0,
        "takeaway_rate": 270.0,
    });

    let (status, _) = send(&app, Method::POST, "/cook/add_dish", Some(&manager), Some(dish.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, Method::POST, "/cook/add_dish", Some(&cook), Some(dish.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["added_by"], "cook1");

    let (status, body) = send(&app, Method::POST, "/cook/add_dish", Some(&cook), Some(dish)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], ErrorCode::DishNameExists.code());

    let (status, body) = send(
        &app,
        Method::PUT,
        "/cook/modify_dish/d1",
        Some(&cook),
        Some(json!({ "rate": 300.0, "available": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["rate"], 300.0);
    assert_eq!(body["data"]["available"], false);
    assert_eq!(body["data"]["name"], "Paneer Tikka");

    let (_, body) = send(&app, Method::GET, "/cook/list_dishes", Some(&manager), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, "/cook/delete_dish/d1", Some(&cook), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, Method::DELETE, "/cook/delete_dish/d1", Some(&cook), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], ErrorCode::DishNotFound.code());
}

#[tokio::test]
async fn test_tab_flow() {
    let app = test_app().await;
    let manager = login(&app, MANAGER, MANAGER_PASSWORD).await;
    register(&app, &manager, "table7", "Table").await;
    let table = login(&app, "table7", "password123").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/tabs/add_tab",
        Some(&manager),
        Some(json!({ "name": "T1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let (status, body) = send(
        &app,
        Method::POST,
        "/tabs/add_tab",
        Some(&table),
        Some(json!({ "name": "T2" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], ErrorCode::RoleRequired.code());

    let (status, _) = send(&app, Method::PUT, "/tabs/update_table/T1?table=7", Some(&table), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/tabs/call_waiter/T1?waiter_text=water%20please",
        Some(&table),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, "/tabs/list_tabs", Some(&table), None).await;
    let tab = &body["data"][0];
    assert_eq!(tab["table"], 7);
    assert_eq!(tab["bound_user"], "table7");
    assert_eq!(tab["role_of_last_binder"], "Table");
    assert_eq!(tab["waiter_request"], true);
    assert_eq!(tab["waiter_text"], "water please");

    let (status, _) = send(&app, Method::PUT, "/tabs/clear_waiter/T1", Some(&table), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/tabs/update_tab_name/T1?new_name=Patio",
        Some(&manager),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::PUT, "/tabs/clear_support/T1", Some(&table), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], ErrorCode::TabNotFound.code());

    let (status, _) = send(&app, Method::DELETE, "/tabs/delete_tab/Patio", Some(&manager), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, Method::GET, "/tabs/list_tabs", Some(&manager), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_disabled_user_is_locked_out() {
    let app = test_app().await;
    let manager = login(&app, MANAGER, MANAGER_PASSWORD).await;
    register(&app, &manager, "waiter1", "Waiter").await;
    let waiter = login(&app, "waiter1", "password123").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/user/update/waiter1",
        Some(&manager),
        Some(json!({ "enabled": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    // Existing token stops working immediately
    let (status, body) = send(&app, Method::GET, "/user/me", Some(&waiter), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], ErrorCode::AccountDisabled.code());
}
