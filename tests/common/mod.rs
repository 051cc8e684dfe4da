use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use garage_admin::{
    config::AppConfig,
    users::{NewUser, User, UserRepository},
    AppState,
};
use std::sync::atomic::{AtomicU64, Ordering};
use tower::ServiceExt;

static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Creates a test app with a fresh database for integration testing
#[allow(dead_code)]
pub async fn create_test_app() -> Router {
    let app_state = create_test_app_state().await;
    garage_admin::create_router(app_state)
}

/// Creates a test app state with a unique temporary database
pub async fn create_test_app_state() -> AppState {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();

    let test_db_path = std::env::temp_dir()
        .join(format!(
            "test_garage_{}_{}_{}.db",
            std::process::id(),
            timestamp,
            DB_COUNTER.fetch_add(1, Ordering::SeqCst)
        ))
        .to_string_lossy()
        .to_string();

    let config = AppConfig {
        database_url: test_db_path,
        environment: "test".to_string(),
        ..AppConfig::default()
    };

    AppState::new(config).await.unwrap()
}

/// Inserts a user straight through the repository
#[allow(dead_code)]
pub async fn create_user(app_state: &AppState, name: &str, email: &str, password: &str) -> User {
    UserRepository::new(app_state.db.clone())
        .create_user(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            phone_number: Some("1234567890".to_string()),
            password: password.to_string(),
        })
        .await
        .unwrap()
}

/// Logs in through the form and returns the `Cookie` header value for the session
#[allow(dead_code)]
pub async fn login(app_state: &AppState, email: &str, password: &str) -> String {
    let body = form_body(&[("email", email), ("password", password)]);
    let response = send(app_state, form_request("POST", "/login", None, &body)).await;

    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(';').next())
        .expect("login should set a session cookie")
        .to_string()
}

/// Creates a staff user and logs them in, like acting as that user
#[allow(dead_code)]
pub async fn acting_as(app_state: &AppState) -> (User, String) {
    let user = create_user(app_state, "Staff Member", "staff@example.com", "staffpass123").await;
    let cookie = login(app_state, "staff@example.com", "staffpass123").await;
    (user, cookie)
}

#[allow(dead_code)]
pub async fn send(app_state: &AppState, request: Request<Body>) -> Response<Body> {
    garage_admin::create_router(app_state.clone())
        .oneshot(request)
        .await
        .unwrap()
}

#[allow(dead_code)]
pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).method("GET");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub fn form_request(method: &str, uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[allow(dead_code)]
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[allow(dead_code)]
pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("")
        .to_string()
}

/// Urlencodes form fields for a request body
#[allow(dead_code)]
pub fn form_body(fields: &[(&str, &str)]) -> String {
    serde_urlencoded::to_string(fields).unwrap()
}
