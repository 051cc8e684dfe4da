use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
    Extension, Form,
};
use tower_sessions::Session;
use tracing::info;

use crate::admin::cars::models::CarForm;
use crate::admin::parse_id;
use crate::admin::cars::repository::CarRepository;
use crate::error::AppError;
use crate::flash::{back, flash, flash_form, found, FlashLevel, FormState};
use crate::users::UserSession;
use crate::AppState;

pub const CAR_INDEX: &str = "/admin/car/management";
pub const CAR_CREATE: &str = "/admin/car/createcar";

/// Create a car owned by the signed-in user. Validation failures go back to
/// the form with the errors and the submitted input.
pub async fn store_car(
    session: Session,
    State(state): State<AppState>,
    Extension(actor): Extension<UserSession>,
    headers: HeaderMap,
    Form(form): Form<CarForm>,
) -> Result<Response, AppError> {
    let fields = match form.validate_create() {
        Ok(fields) => fields,
        Err(errors) => {
            flash_form(&session, form.keep_input(FormState::new(errors))).await?;
            return Ok(back(&headers, CAR_CREATE));
        }
    };

    let repo = CarRepository::new(state.db.clone());
    let car = repo
        .create_car(actor.user_id, fields)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create car: {}", e)))?;

    info!(actor_id = actor.user_id, car_id = car.id, "Car created");
    flash(&session, FlashLevel::Success, "Car created successfully").await?;
    Ok(found(CAR_INDEX))
}

/// Overwrite make, model and year. An unknown id redirects with an error notice.
pub async fn update_car(
    session: Session,
    State(state): State<AppState>,
    Extension(actor): Extension<UserSession>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
    Form(form): Form<CarForm>,
) -> Result<Response, AppError> {
    let fields = match form.validate_update() {
        Ok(fields) => fields,
        Err(errors) => {
            flash_form(&session, form.keep_input(FormState::new(errors))).await?;
            return Ok(back(&headers, &format!("/admin/car/editcar/{}", raw_id)));
        }
    };

    let updated = match parse_id(&raw_id) {
        Some(car_id) => CarRepository::new(state.db.clone())
            .update_car(car_id, fields)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to update car: {}", e)))?,
        None => None,
    };

    match updated {
        Some(car) => {
            info!(actor_id = actor.user_id, car_id = car.id, "Car updated");
            flash(&session, FlashLevel::Success, "Car was updated successfully").await?;
        }
        None => {
            flash(&session, FlashLevel::Error, "Car not found.").await?;
        }
    }

    Ok(found(CAR_INDEX))
}

/// Delete a car. A missing id redirects with an error notice instead of failing.
pub async fn delete_car(
    session: Session,
    State(state): State<AppState>,
    Extension(actor): Extension<UserSession>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let deleted = match parse_id(&raw_id) {
        Some(car_id) => CarRepository::new(state.db.clone())
            .delete_car(car_id)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete car: {}", e)))?
            .then_some(car_id),
        None => None,
    };

    if let Some(car_id) = deleted {
        info!(actor_id = actor.user_id, car_id, "Car deleted");
        flash(&session, FlashLevel::Success, "Car was deleted successfully").await?;
    } else {
        flash(&session, FlashLevel::Error, "Car not found or already deleted").await?;
    }

    Ok(found(CAR_INDEX))
}
