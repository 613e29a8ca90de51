use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use sarbaz::clients::mail::RecordingMailer;
use sarbaz::config::Config;
use sarbaz::db::Store;
use sarbaz::entities::confirmation_codes;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, sea_query::Expr};
use std::sync::Arc;
use tower::ServiceExt;

/// Staff account seeded by the initial migration.
const ADMIN_EMAIL: &str = "admin@sarbaz.kz";
const ADMIN_PASSWORD: &str = "password";

async fn spawn_app_with_store() -> (Router, Arc<RecordingMailer>, Store) {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.server.secure_cookies = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    // Single connection so every request sees the same in-memory database.
    let store = Store::with_pool_options(&config.general.database_path, 1, 1)
        .await
        .expect("Failed to set up store");

    let mailer = Arc::new(RecordingMailer::default());
    let state = sarbaz::api::create_app_state(config, store.clone(), mailer.clone(), None);

    (sarbaz::api::router(state), mailer, store)
}

async fn spawn_app() -> (Router, Arc<RecordingMailer>) {
    let (app, mailer, _) = spawn_app_with_store().await;
    (app, mailer)
}

fn request(method: &str, uri: &str, cookies: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookies) = cookies {
        builder = builder.header(header::COOKIE, cookies);
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}

/// Collects the Set-Cookie pairs from a response into a Cookie header value.
fn session_cookies(response: &Response) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .filter(|pair| !pair.ends_with('='))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Pulls the 6-digit confirmation code out of the most recent recorded mail.
fn last_mailed_code(mailer: &RecordingMailer) -> String {
    let sent = mailer.sent.lock().unwrap();
    let (_, _, body) = sent.last().expect("No mail recorded");
    let digits: String = body.chars().filter(char::is_ascii_digit).collect();
    digits[..6].to_string()
}

fn register_payload(username: &str, email: &str, phone: &str) -> serde_json::Value {
    serde_json::json!({
        "username": username,
        "email": email,
        "password": "sekvenco-9",
        "phone": phone,
        "first_name": "Aslan",
        "last_name": "Serikov",
    })
}

/// Registers, confirms and returns the session cookie string.
async fn signup(app: &Router, mailer: &RecordingMailer, username: &str, email: &str, phone: &str) -> String {
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/register",
            None,
            Some(register_payload(username, email, phone)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let code = last_mailed_code(mailer);
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/register/confirm",
            None,
            Some(serde_json::json!({ "code": code })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = session_cookies(&response);
    assert!(cookies.contains("access_token="));
    assert!(cookies.contains("refresh_token="));
    cookies
}

async fn login(app: &Router, email: &str, password: &str) -> Response {
    app.clone()
        .oneshot(request(
            "POST",
            "/api/auth/login",
            None,
            Some(serde_json::json!({ "email": email, "password": password })),
        ))
        .await
        .unwrap()
}

async fn admin_cookies(app: &Router) -> String {
    let response = login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    session_cookies(&response)
}

/// Creates a city through the staff catalog API and returns its id.
async fn create_city(app: &Router, admin: &str, name: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/catalog/cities",
            Some(admin),
            Some(serde_json::json!({ "name": name })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

fn application_payload(iin: &str, city_ids: &[i64]) -> serde_json::Value {
    serde_json::json!({
        "full_name": "Aslan Serikov",
        "date_of_birth": "2003-04-12",
        "email": "aslan@example.kz",
        "phone": "+77001234567",
        "iin": iin,
        "address": "Astana, Mangilik El 55",
        "desired_city_ids": city_ids,
        "attachments": [
            { "file": "uploads/id-card.pdf", "attachment_type": "identity" },
            { "file": "uploads/diploma.pdf", "attachment_type": "education" },
        ],
    })
}

#[tokio::test]
async fn test_register_confirm_login_flow() {
    let (app, mailer) = spawn_app().await;

    let cookies = signup(&app, &mailer, "aslan", "aslan@example.kz", "+77001234567").await;

    {
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "aslan@example.kz");
        assert!(sent[0].1.contains("Confirm"));
    }

    let response = app
        .clone()
        .oneshot(request("GET", "/api/auth/me", Some(&cookies), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["username"], "aslan");
    assert_eq!(body["data"]["is_staff"], false);

    // Password login works once the account is active.
    let response = login(&app, "aslan@example.kz", "sekvenco-9").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = login(&app, "aslan@example.kz", "wrong-password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_requires_session() {
    let (app, _) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(request("GET", "/api/auth/me", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            "/api/auth/me",
            Some("access_token=not-a-jwt"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_validates_fields() {
    let (app, _) = spawn_app().await;

    // Too few digits and a missing plus sign are both rejected.
    for phone in ["+7700123456", "77001234567"] {
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/auth/register",
                None,
                Some(register_payload("aslan", "aslan@example.kz", phone)),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["fields"]["phone"].is_string());
    }

    let mut payload = register_payload("aslan", "aslan@example.kz", "+77001234567");
    payload["password"] = serde_json::json!("short");
    let response = app
        .clone()
        .oneshot(request("POST", "/api/auth/register", None, Some(payload)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["fields"]["password"].is_string());
}

#[tokio::test]
async fn test_register_rejects_duplicates() {
    let (app, mailer) = spawn_app().await;

    signup(&app, &mailer, "aslan", "aslan@example.kz", "+77001234567").await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/register",
            None,
            Some(register_payload("other", "aslan@example.kz", "+77009999999")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["fields"]["email"].is_string());

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/register",
            None,
            Some(register_payload("other", "other@example.kz", "+77001234567")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["fields"]["phone"].is_string());
}

#[tokio::test]
async fn test_confirmation_code_is_single_use() {
    let (app, mailer) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/register",
            None,
            Some(register_payload("aslan", "aslan@example.kz", "+77001234567")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let code = last_mailed_code(&mailer);
    let confirm = serde_json::json!({ "code": code });

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/register/confirm",
            None,
            Some(confirm.clone()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/register/confirm",
            None,
            Some(confirm),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_expired_confirmation_code_rejected() {
    let (app, mailer, store) = spawn_app_with_store().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/register",
            None,
            Some(register_payload("aslan", "aslan@example.kz", "+77001234567")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let code = last_mailed_code(&mailer);

    // Age the code past its validity window.
    confirmation_codes::Entity::update_many()
        .col_expr(
            confirmation_codes::Column::CreatedAt,
            Expr::value(Utc::now() - Duration::minutes(16)),
        )
        .filter(confirmation_codes::Column::Code.eq(code.as_str()))
        .exec(&store.conn)
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/register/confirm",
            None,
            Some(serde_json::json!({ "code": code })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_requires_confirmed_account() {
    let (app, _) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/register",
            None,
            Some(register_payload("aslan", "aslan@example.kz", "+77001234567")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Correct credentials, but the account was never confirmed.
    let response = login(&app, "aslan@example.kz", "sekvenco-9").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_password_reset_flow() {
    let (app, mailer) = spawn_app().await;

    signup(&app, &mailer, "aslan", "aslan@example.kz", "+77001234567").await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/password-reset",
            None,
            Some(serde_json::json!({ "email": "nobody@example.kz" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/password-reset",
            None,
            Some(serde_json::json!({ "email": "aslan@example.kz" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let code = last_mailed_code(&mailer);
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/password-reset/confirm",
            None,
            Some(serde_json::json!({ "code": code, "new_password": "renversita-7" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = login(&app, "aslan@example.kz", "sekvenco-9").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = login(&app, "aslan@example.kz", "renversita-7").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_logout_clears_cookies() {
    let (app, mailer) = spawn_app().await;

    let cookies = signup(&app, &mailer, "aslan", "aslan@example.kz", "+77001234567").await;

    let response = app
        .clone()
        .oneshot(request("POST", "/api/auth/logout", Some(&cookies), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cleared: Vec<&str> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    assert!(cleared.iter().any(|c| c.starts_with("access_token=")));
    assert!(cleared.iter().any(|c| c.starts_with("refresh_token=")));
    assert!(cleared.iter().any(|c| c.starts_with("sessionid=")));
}

#[tokio::test]
async fn test_repeated_logout_succeeds() {
    let (app, mailer) = spawn_app().await;

    let cookies = signup(&app, &mailer, "aslan", "aslan@example.kz", "+77001234567").await;

    // Revocation is idempotent; presenting the same refresh cookie twice
    // must not surface an error.
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(request("POST", "/api/auth/logout", Some(&cookies), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_refresh_rotates_and_logout_revokes() {
    let (app, mailer) = spawn_app().await;

    let cookies = signup(&app, &mailer, "aslan", "aslan@example.kz", "+77001234567").await;

    let response = app
        .clone()
        .oneshot(request("POST", "/api/auth/refresh", Some(&cookies), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = session_cookies(&response);
    assert!(rotated.contains("access_token="));
    assert!(rotated.contains("refresh_token="));

    let response = app
        .clone()
        .oneshot(request("POST", "/api/auth/logout", Some(&cookies), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The refresh token revoked at logout is no longer redeemable.
    let response = app
        .clone()
        .oneshot(request("POST", "/api/auth/refresh", Some(&cookies), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_public_service_types_listing() {
    let (app, _) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(request("GET", "/api/service-types", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let codes: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["code"].as_str())
        .collect();
    assert!(codes.contains(&"contract"));
    assert!(codes.contains(&"conscription"));
}

#[tokio::test]
async fn test_catalog_mutations_require_staff() {
    let (app, mailer) = spawn_app().await;

    let cookies = signup(&app, &mailer, "aslan", "aslan@example.kz", "+77001234567").await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/catalog/cities",
            Some(&cookies),
            Some(serde_json::json!({ "name": "Almaty" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Reads stay open to any authenticated account.
    let response = app
        .clone()
        .oneshot(request("GET", "/api/catalog/cities", Some(&cookies), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_application_lifecycle() {
    let (app, mailer) = spawn_app().await;

    let admin = admin_cookies(&app).await;
    let almaty = create_city(&app, &admin, "Almaty").await;
    let astana = create_city(&app, &admin, "Astana").await;

    let owner = signup(&app, &mailer, "aslan", "aslan@example.kz", "+77001234567").await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/applications/conscription",
            Some(&owner),
            Some(application_payload("030412550123", &[almaty, astana])),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let app_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["status_code"], "new");
    assert_eq!(
        body["data"]["desired_city_ids"],
        serde_json::json!([almaty, astana])
    );
    assert_eq!(body["data"]["attachments"].as_array().unwrap().len(), 2);

    // Same IIN cannot file twice.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/applications/conscription",
            Some(&owner),
            Some(application_payload("030412550123", &[])),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Owner edits while the application is still new.
    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/api/applications/{app_id}"),
            Some(&owner),
            Some(serde_json::json!({ "address": "Almaty, Abay 10" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["address"], "Almaty, Abay 10");

    // Replacing desired cities discards the old set entirely.
    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/api/applications/{app_id}"),
            Some(&owner),
            Some(serde_json::json!({ "desired_city_ids": [astana] })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["desired_city_ids"], serde_json::json!([astana]));

    // Status changes submitted by the owner are silently ignored.
    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/api/applications/{app_id}"),
            Some(&owner),
            Some(serde_json::json!({ "status_id": 3, "admin_comment": "approve me" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status_code"], "new");
    assert_eq!(body["data"]["admin_comment"], "");

    // A stranger can neither read nor edit it.
    let stranger = signup(&app, &mailer, "marat", "marat@example.kz", "+77007654321").await;
    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/applications/{app_id}"),
            Some(&stranger),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Staff move it out of the owner-editable window.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/admin/applications/bulk-update-status",
            Some(&admin),
            Some(serde_json::json!({
                "ids": [app_id, 999],
                "status_code": "in_review",
                "comment": "Taken into processing",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["updated"], 1);

    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/api/applications/{app_id}"),
            Some(&owner),
            Some(serde_json::json!({ "address": "too late" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The owner still sees the reviewer's verdict.
    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/applications/{app_id}"),
            Some(&owner),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status_code"], "in_review");
    assert_eq!(body["data"]["admin_comment"], "Taken into processing");
}

#[tokio::test]
async fn test_bulk_update_counts_only_live_rows() {
    let (app, mailer) = spawn_app().await;

    let admin = admin_cookies(&app).await;
    let owner = signup(&app, &mailer, "aslan", "aslan@example.kz", "+77001234567").await;

    let mut ids = Vec::new();
    for iin in ["030412550123", "040115550321"] {
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/applications/communications",
                Some(&owner),
                Some(application_payload(iin, &[])),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        ids.push(body_json(response).await["data"]["id"].as_i64().unwrap());
    }

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/admin/applications/bulk-update-status",
            Some(&admin),
            Some(serde_json::json!({
                "ids": [ids[0], ids[1], 999],
                "status_code": "approved",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["updated"], 2);

    // Unknown status codes fail before touching anything.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/admin/applications/bulk-update-status",
            Some(&admin),
            Some(serde_json::json!({ "ids": [ids[0]], "status_code": "no_such" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Not a staff endpoint for regular accounts.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/admin/applications/bulk-update-status",
            Some(&owner),
            Some(serde_json::json!({ "ids": [ids[0]], "status_code": "approved" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_soft_delete_hides_application() {
    let (app, mailer) = spawn_app().await;

    let admin = admin_cookies(&app).await;
    let owner = signup(&app, &mailer, "aslan", "aslan@example.kz", "+77001234567").await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/applications/conscription",
            Some(&owner),
            Some(application_payload("030412550123", &[])),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let app_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/api/applications/{app_id}"),
            Some(&owner),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(request("GET", "/api/applications", Some(&owner), None))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/applications/{app_id}"),
            Some(&owner),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Staff can still reach the row for audit purposes.
    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/applications/{app_id}?include_deleted=true"),
            Some(&admin),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["exist"], false);
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(request("GET", "/api/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
