use axum::{
    extract::{Path, State},
    response::Response,
    Extension, Form,
};
use tower_sessions::Session;
use tracing::info;

use crate::admin::parse_id;
use crate::error::AppError;
use crate::flash::{flash, found, FlashLevel};
use crate::users::handlers::validate_new_user;
use crate::users::models::trimmed;
use crate::users::{UpdateUserForm, UserForm, UserPatch, UserRepository, UserSession};
use crate::validation::{is_valid_email, Validator};
use crate::AppState;

pub const USER_INDEX: &str = "/admin/usermanagement";

/// Create a new user. Validation failures answer 400 with JSON field errors.
pub async fn store_user(
    session: Session,
    State(state): State<AppState>,
    Extension(actor): Extension<UserSession>,
    Form(form): Form<UserForm>,
) -> Result<Response, AppError> {
    let repo = UserRepository::new(state.db.clone());
    validate_new_user(&repo, &form).await?;

    let user = repo
        .create_user(form.into_new_user())
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create user: {}", e)))?;

    info!(actor_id = actor.user_id, user_id = user.id, "User created");
    flash(&session, FlashLevel::Success, "User was created successfully").await?;
    Ok(found(USER_INDEX))
}

/// Partial update. A missing user is a 404 once the input has validated.
pub async fn update_user(
    session: Session,
    State(state): State<AppState>,
    Extension(actor): Extension<UserSession>,
    Path(raw_id): Path<String>,
    Form(form): Form<UpdateUserForm>,
) -> Result<Response, AppError> {
    let repo = UserRepository::new(state.db.clone());
    let user_id = parse_id(&raw_id);

    let email = trimmed(&form.email);
    let taken = match email {
        Some(email) if is_valid_email(email) => repo
            .email_taken(email, user_id)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to check email: {}", e)))?,
        _ => false,
    };

    let mut v = Validator::new();
    v.field("name", trimmed(&form.name)).required().max(255);
    v.field("email", email).required().email().unique(taken);
    // Only checked when submitted
    if form.phone_number.is_some() {
        v.field("phone_number", trimmed(&form.phone_number))
            .required()
            .max(15);
    }
    v.finish().map_err(AppError::Validation)?;

    let user_id = user_id.ok_or(AppError::NotFound("User"))?;
    let current = repo
        .find_by_id(user_id)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to find user: {}", e)))?
        .ok_or(AppError::NotFound("User"))?;

    let patch = UserPatch::from_update(&current, &form);
    repo.update_user(user_id, patch)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to update user: {}", e)))?
        .ok_or(AppError::NotFound("User"))?;

    info!(actor_id = actor.user_id, user_id, "User updated");
    flash(&session, FlashLevel::Success, "User was updated successfully").await?;
    Ok(found(USER_INDEX))
}

/// Delete a user. A missing id redirects with an error notice instead of failing.
pub async fn delete_user(
    session: Session,
    State(state): State<AppState>,
    Extension(actor): Extension<UserSession>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let deleted = match parse_id(&raw_id) {
        Some(user_id) => UserRepository::new(state.db.clone())
            .delete_user(user_id)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete user: {}", e)))?
            .then_some(user_id),
        None => None,
    };

    if let Some(user_id) = deleted {
        info!(actor_id = actor.user_id, user_id, "User deleted");
        flash(&session, FlashLevel::Success, "User was deleted successfully").await?;
    } else {
        flash(&session, FlashLevel::Error, "User not found or already deleted").await?;
    }

    Ok(found(USER_INDEX))
}
