//! End-to-end flows through the fully composed router.
//!
//! Same route tree and layers as the binary, with in-memory repositories in
//! place of PostgreSQL.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header::AUTHORIZATION};
use axum_helpers::{JwtConfig, TokenService, create_router};
use domain_employees::{Argon2Hasher, EmployeeService, InMemoryEmployeeRepository};
use domain_roles::{InMemoryRoleRepository, RoleService};
use hr_api::{config::SeedAdmin, openapi::ApiDoc, seed::seed_admin};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const SECRET: &str = "hr-api-end-to-end-secret-0123456789abc";
const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "Admin@123";

async fn app_with_ttl(ttl_secs: u64) -> Router {
    let tokens = TokenService::new(&JwtConfig::new(SECRET, ttl_secs).unwrap());
    let role_repository = InMemoryRoleRepository::new();
    let roles = RoleService::new(role_repository.clone());
    let employees = Arc::new(EmployeeService::new(
        InMemoryEmployeeRepository::new(role_repository),
        roles.clone(),
        Argon2Hasher,
        tokens.clone(),
    ));

    let seed = SeedAdmin {
        email: ADMIN_EMAIL.to_string(),
        password: ADMIN_PASSWORD.to_string(),
        name: "Administrator".to_string(),
        role: "Administrator".to_string(),
    };
    seed_admin(&seed, &roles, &employees).await.unwrap();

    let api = hr_api::api::routes(roles, employees, tokens);
    temp_env::with_var("CORS_ALLOWED_ORIGIN", Some("http://localhost:3000"), || {
        create_router::<ApiDoc>(api)
    })
    .unwrap()
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Option<String>, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(bearer) = bearer {
        builder = builder.header(AUTHORIZATION, bearer);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let renewed = response
        .headers()
        .get(AUTHORIZATION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, renewed, json)
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    let (status, _, body) = call(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    (status, body)
}

async fn admin_bearer(app: &Router) -> String {
    let (status, body) = login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    format!("Bearer {}", body["data"]["token"].as_str().unwrap())
}

#[tokio::test]
async fn test_role_create_conflicts_on_duplicate_name() {
    let app = app_with_ttl(3600).await;
    let bearer = admin_bearer(&app).await;

    let (status, renewed, body) = call(
        &app,
        "POST",
        "/api/roles",
        Some(&bearer),
        Some(json!({ "name": "Developer" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "Developer");
    assert!(renewed.unwrap().starts_with("Bearer "));

    let (status, _, body) = call(
        &app,
        "POST",
        "/api/roles",
        Some(&bearer),
        Some(json!({ "name": "Developer" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_employee_registration_and_login() {
    let app = app_with_ttl(3600).await;
    let bearer = admin_bearer(&app).await;

    let (_, _, role) = call(
        &app,
        "POST",
        "/api/roles",
        Some(&bearer),
        Some(json!({ "name": "Developer" })),
    )
    .await;

    let (status, _, body) = call(
        &app,
        "POST",
        "/api/employees",
        Some(&bearer),
        Some(json!({
            "name": "John Smith",
            "email": "john@x.com",
            "password": "Pass@123",
            "commuteAllowance": 1,
            "roleId": role["data"]["id"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"]["name"], "Developer");

    let (status, body) = login(&app, "john@x.com", "Pass@123").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["token"].as_str().is_some());

    let (status, body) = login(&app, "john@x.com", "Wrong@123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["type"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_employee_with_unknown_role_is_rejected() {
    let app = app_with_ttl(3600).await;
    let bearer = admin_bearer(&app).await;

    let (status, _, body) = call(
        &app,
        "POST",
        "/api/employees",
        Some(&bearer),
        Some(json!({
            "name": "Jane Doe",
            "email": "jane@x.com",
            "password": "Pass@123",
            "commuteAllowance": 0,
            "roleId": 999
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "role does not exist");
}

#[tokio::test]
async fn test_role_with_employees_cannot_be_deleted() {
    let app = app_with_ttl(3600).await;
    let bearer = admin_bearer(&app).await;

    let (_, _, role) = call(
        &app,
        "POST",
        "/api/roles",
        Some(&bearer),
        Some(json!({ "name": "Developer" })),
    )
    .await;
    let role_id = role["data"]["id"].as_i64().unwrap();

    let (status, _, employee) = call(
        &app,
        "POST",
        "/api/employees",
        Some(&bearer),
        Some(json!({
            "name": "John Smith",
            "email": "john@x.com",
            "password": "Pass@123",
            "commuteAllowance": 1,
            "roleId": role_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let role_uri = format!("/api/roles/{role_id}");
    let (status, _, body) = call(&app, "DELETE", &role_uri, Some(&bearer), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let (status, _, body) = call(&app, "GET", "/api/employees", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, _) = login(&app, "john@x.com", "Pass@123").await;
    assert_eq!(status, StatusCode::OK);

    let employee_uri = format!("/api/employees/{}", employee["data"]["id"]);
    let (status, _, _) = call(&app, "DELETE", &employee_uri, Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = call(&app, "DELETE", &role_uri, Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_protected_routes_reject_missing_and_expired_tokens() {
    let app = app_with_ttl(1).await;

    let (status, _, body) = call(&app, "GET", "/api/employees", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let bearer = admin_bearer(&app).await;
    tokio::time::sleep(Duration::from_millis(2100)).await;

    let (status, renewed, _) = call(&app, "GET", "/api/employees", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(renewed.is_none());
}

#[tokio::test]
async fn test_unknown_route_uses_error_envelope() {
    let app = app_with_ttl(3600).await;

    let (status, _, body) = call(&app, "GET", "/nothing-here", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}
