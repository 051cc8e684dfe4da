use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_rusqlite_store::RusqliteStore;
use tracing::warn;

pub mod admin;
pub mod config;
pub mod database;
pub mod error;
pub mod flash;
pub mod method_override;
pub mod pagination;
pub mod templates;
pub mod users;
pub mod validation;

pub use config::AppConfig;
pub use database::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<AppConfig>,
    pub sessions: RusqliteStore,
}

impl AppState {
    /// Opens and migrates the database, then the session store beside it.
    pub async fn new(config: AppConfig) -> Result<Self, database::DbError> {
        let db = Arc::new(Database::new(&config.database_url).await?);
        db.migrate().await?;
        let sessions = db.session_store().await?;

        Ok(Self {
            db,
            config: Arc::new(config),
            sessions,
        })
    }
}

pub fn create_router(app_state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(app_state.sessions.clone())
        .with_secure(app_state.config.secure_cookies || app_state.config.is_production())
        .with_expiry(Expiry::OnInactivity(time::Duration::days(1)));

    let app = Router::new()
        .route("/", get(templates::home_handler))
        .route("/health", get(health_handler))
        .route("/login", get(users::login_handler).post(users::login_user))
        .route("/logout", post(users::logout_user))
        .route(
            "/register",
            get(users::register_handler).post(users::register_user),
        )
        .nest("/admin", admin::router(app_state.clone()))
        .nest_service("/static", ServeDir::new(&app_state.config.static_dir))
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(session_layer)
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        );

    // Runs ahead of routing so the rewritten method picks the handler.
    Router::new()
        .fallback_service(app)
        .layer(from_fn(method_override::method_override))
}

async fn health_handler(State(state): State<AppState>) -> Result<&'static str, StatusCode> {
    match state.db.health_check().await {
        Ok(_) => Ok("OK"),
        Err(e) => {
            warn!("Health check failed: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
