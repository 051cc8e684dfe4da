use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use garage_admin::{config::AppConfig, create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,tower_http=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    info!(environment = %config.environment, "Configuration loaded successfully");

    let server_address = config.server_address.clone();

    // Database, migrations and session store
    let app_state = AppState::new(config).await?;
    info!("Database initialized successfully");

    let app = create_router(app_state);

    let listener = TcpListener::bind(&server_address).await?;
    info!("Server starting on {}", server_address);

    axum::serve(listener, app).await?;

    Ok(())
}
