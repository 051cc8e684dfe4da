use askama::Template;
use axum::response::{Html, IntoResponse, Response};
use tower_sessions::Session;

use crate::error::AppError;
use crate::flash::{found, take_flash, take_form, Flash, FormState};
use crate::templates::render;
use crate::users::models::UserSession;
use crate::users::SESSION_USER_KEY;

#[derive(Template)]
#[template(path = "users/login.html")]
pub struct LoginTemplate {
    pub title: String,
    pub flash: Option<Flash>,
}

pub async fn login_handler(session: Session) -> Result<Response, AppError> {
    // Already signed in
    if session.get::<UserSession>(SESSION_USER_KEY).await?.is_some() {
        return Ok(found("/admin/home"));
    }

    let template = LoginTemplate {
        title: "Login - Garage Admin".to_string(),
        flash: take_flash(&session).await?,
    };

    Ok(render(&template).into_response())
}

#[derive(Template)]
#[template(path = "users/register.html")]
pub struct RegisterTemplate {
    pub title: String,
    pub flash: Option<Flash>,
    pub form: FormState,
}

pub async fn register_handler(session: Session) -> Result<Html<String>, AppError> {
    let template = RegisterTemplate {
        title: "Register - Garage Admin".to_string(),
        flash: take_flash(&session).await?,
        form: take_form(&session).await?,
    };

    Ok(render(&template))
}
