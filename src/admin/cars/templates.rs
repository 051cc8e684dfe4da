use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::Html,
    Extension,
};
use tower_sessions::Session;

use crate::admin::cars::models::{Car, CarListing};
use crate::admin::cars::repository::CarRepository;
use crate::admin::parse_id;
use crate::error::AppError;
use crate::flash::{take_flash, take_form, Flash, FormState};
use crate::pagination::{Page, PageQuery};
use crate::templates::render;
use crate::users::UserSession;
use crate::AppState;

#[derive(Template)]
#[template(path = "admin/cars/list.html")]
pub struct CarListTemplate {
    pub title: String,
    pub actor: UserSession,
    pub flash: Option<Flash>,
    pub cars: Page<CarListing>,
}

pub async fn car_list_handler(
    session: Session,
    State(state): State<AppState>,
    Extension(actor): Extension<UserSession>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let repo = CarRepository::new(state.db.clone());
    let cars = repo
        .paginate_with_owners(query.page())
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list cars: {}", e)))?;

    let template = CarListTemplate {
        title: "Car Management - Garage Admin".to_string(),
        actor,
        flash: take_flash(&session).await?,
        cars,
    };

    Ok(render(&template))
}

#[derive(Template)]
#[template(path = "admin/cars/create.html")]
pub struct CarCreateTemplate {
    pub title: String,
    pub actor: UserSession,
    pub flash: Option<Flash>,
    pub form: FormState,
}

pub async fn car_create_handler(
    session: Session,
    Extension(actor): Extension<UserSession>,
) -> Result<Html<String>, AppError> {
    let template = CarCreateTemplate {
        title: "Add Car - Garage Admin".to_string(),
        actor,
        flash: take_flash(&session).await?,
        form: take_form(&session).await?,
    };

    Ok(render(&template))
}

#[derive(Template)]
#[template(path = "admin/cars/edit.html")]
pub struct CarEditTemplate {
    pub title: String,
    pub actor: UserSession,
    pub flash: Option<Flash>,
    pub form: FormState,
    pub car: Car,
    // Old input if a failed update sent us back, else the stored values
    pub make: String,
    pub model: String,
    pub year: String,
}

/// Edit form. Unlike update and delete, an unknown id is a 404.
pub async fn car_edit_handler(
    session: Session,
    State(state): State<AppState>,
    Extension(actor): Extension<UserSession>,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let car_id = parse_id(&raw_id).ok_or(AppError::NotFound("Car"))?;
    let repo = CarRepository::new(state.db.clone());
    let car = repo
        .find_by_id(car_id)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to find car: {}", e)))?
        .ok_or(AppError::NotFound("Car"))?;

    let form = take_form(&session).await?;

    let template = CarEditTemplate {
        title: format!("Edit {} {} - Garage Admin", car.make, car.model),
        actor,
        flash: take_flash(&session).await?,
        make: form.value_or("make", &car.make),
        model: form.value_or("model", &car.model),
        year: form.value_or("year", &car.year.to_string()),
        form,
        car,
    };

    Ok(render(&template))
}
