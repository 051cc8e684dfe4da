use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;
use tower_sessions::session;

use crate::validation::ValidationErrors;

#[derive(Debug)]
pub enum AppError {
    /// Field errors answered as `{"errors": {...}}` with 400.
    Validation(ValidationErrors),
    NotFound(&'static str),
    SessionError(String),
    DatabaseError(String),
    InternalError(String),
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    title: String,
    status: u16,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(errors) => {
                return (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors })))
                    .into_response();
            }
            AppError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} not found", what)),
            AppError::SessionError(msg) => {
                tracing::error!("Session error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Session error".to_string())
            }
            AppError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let template = ErrorTemplate {
            title: format!("{} - Garage Admin", status.as_u16()),
            status: status.as_u16(),
            message,
        };

        let body = template.render().unwrap_or_else(|e| {
            tracing::error!("Failed to render error template: {}", e);
            "Error".to_string()
        });

        (status, Html(body)).into_response()
    }
}

impl From<session::Error> for AppError {
    fn from(e: session::Error) -> Self {
        AppError::SessionError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_validation_error_is_json_400() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "The email has already been taken.");

        let response = AppError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["errors"]["email"][0], "The email has already been taken.");
    }

    #[test]
    fn test_not_found_status() {
        let response = AppError::NotFound("Car").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
