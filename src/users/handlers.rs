use axum::{
    extract::State,
    http::HeaderMap,
    response::Response,
    Form,
};
use time::Duration;
use tower_sessions::{Expiry, Session};
use tracing::info;

use crate::error::AppError;
use crate::flash::{back, flash, flash_form, found, FlashLevel, FormState};
use crate::users::auth::verify_password;
use crate::users::models::{trimmed, LoginForm, UserForm, UserSession};
use crate::users::repository::UserRepository;
use crate::users::SESSION_USER_KEY;
use crate::validation::{is_valid_email, Validator};
use crate::AppState;

/// Rules shared by the admin create form and signup.
pub(crate) async fn validate_new_user(
    repo: &UserRepository,
    form: &UserForm,
) -> Result<(), AppError> {
    let email = trimmed(&form.email);
    let taken = match email {
        Some(email) if is_valid_email(email) => repo
            .email_taken(email, None)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to check email: {}", e)))?,
        _ => false,
    };

    let mut v = Validator::new();
    v.field("name", trimmed(&form.name)).required().max(255);
    v.field("email", email).required().email().unique(taken);
    v.field("phone_number", trimmed(&form.phone_number))
        .required()
        .max(15);
    v.field("password", form.password.as_deref()).required().min(8);
    v.finish().map_err(AppError::Validation)
}

pub async fn login_user(
    session: Session,
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let user_repo = UserRepository::new(state.db.clone());

    let user = user_repo
        .find_by_email(&form.email)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to find user: {}", e)))?;

    let verified = match &user {
        Some(user) => verify_password(&form.password, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("Failed to verify password: {}", e)))?,
        None => false,
    };

    let user = match user {
        Some(user) if verified => user,
        _ => {
            flash(
                &session,
                FlashLevel::Error,
                "These credentials do not match our records.",
            )
            .await?;
            return Ok(found("/login"));
        }
    };

    // New id on privilege change
    session.cycle_id().await?;

    // Default: 24 hours, remember me: 5 days
    let expiry_duration = if form.remember.is_some() {
        Duration::hours(120)
    } else {
        Duration::hours(24)
    };
    session.set_expiry(Some(Expiry::OnInactivity(expiry_duration)));
    session
        .insert(SESSION_USER_KEY, UserSession::from(&user))
        .await?;

    info!(user_id = user.id, "User logged in");
    Ok(found("/admin/home"))
}

pub async fn logout_user(session: Session) -> Result<Response, AppError> {
    session.flush().await?;
    Ok(found("/login"))
}

pub async fn register_user(
    session: Session,
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<UserForm>,
) -> Result<Response, AppError> {
    let user_repo = UserRepository::new(state.db.clone());

    match validate_new_user(&user_repo, &form).await {
        Ok(()) => {}
        Err(AppError::Validation(errors)) => {
            // Password is never echoed back
            let state = FormState::new(errors)
                .with_input("name", form.name.as_deref())
                .with_input("email", form.email.as_deref())
                .with_input("phone_number", form.phone_number.as_deref());
            flash_form(&session, state).await?;
            return Ok(back(&headers, "/register"));
        }
        Err(e) => return Err(e),
    }

    let user = user_repo
        .create_user(form.into_new_user())
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create user: {}", e)))?;

    session.cycle_id().await?;
    session
        .insert(SESSION_USER_KEY, UserSession::from(&user))
        .await?;

    info!(user_id = user.id, "User registered");
    flash(&session, FlashLevel::Success, "Welcome aboard!").await?;
    Ok(found("/admin/home"))
}
