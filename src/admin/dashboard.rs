use askama::Template;
use axum::{extract::State, response::Html, Extension};
use tower_sessions::Session;

use crate::admin::cars::CarRepository;
use crate::error::AppError;
use crate::flash::{take_flash, Flash};
use crate::templates::render;
use crate::users::{UserRepository, UserSession};
use crate::AppState;

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub title: String,
    pub actor: UserSession,
    pub flash: Option<Flash>,
    pub user_count: i64,
    pub car_count: i64,
}

pub async fn dashboard_handler(
    session: Session,
    State(state): State<AppState>,
    Extension(actor): Extension<UserSession>,
) -> Result<Html<String>, AppError> {
    let user_count = UserRepository::new(state.db.clone())
        .count()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to count users: {}", e)))?;
    let car_count = CarRepository::new(state.db.clone())
        .count()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to count cars: {}", e)))?;

    let template = DashboardTemplate {
        title: "Dashboard - Garage Admin".to_string(),
        actor,
        flash: take_flash(&session).await?,
        user_count,
        car_count,
    };

    Ok(render(&template))
}
