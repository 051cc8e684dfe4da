//! One-shot session messages and the redirects that carry them.

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tower_sessions::{session, Session};

use crate::validation::ValidationErrors;

const FLASH_KEY: &str = "_flash";
const FORM_KEY: &str = "_form";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

impl FlashLevel {
    pub fn as_str(&self) -> &str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

/// Errors and prior input carried back to a form after a failed submit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormState {
    pub errors: ValidationErrors,
    pub old: BTreeMap<String, String>,
}

impl FormState {
    pub fn new(errors: ValidationErrors) -> Self {
        Self {
            errors,
            old: BTreeMap::new(),
        }
    }

    pub fn with_input(mut self, field: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.old.insert(field.to_string(), value.to_string());
        }
        self
    }

    /// Old input for `field`, falling back to `current`.
    pub fn value_or(&self, field: &str, current: &str) -> String {
        self.old
            .get(field)
            .cloned()
            .unwrap_or_else(|| current.to_string())
    }

    pub fn value(&self, field: &str) -> String {
        self.value_or(field, "")
    }

    pub fn error(&self, field: &str) -> String {
        self.errors.get(field).join(" ")
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.has(field)
    }
}

pub async fn flash(
    session: &Session,
    level: FlashLevel,
    message: impl Into<String>,
) -> Result<(), session::Error> {
    let flash = Flash {
        level,
        message: message.into(),
    };
    session.insert(FLASH_KEY, flash).await
}

pub async fn take_flash(session: &Session) -> Result<Option<Flash>, session::Error> {
    session.remove::<Flash>(FLASH_KEY).await
}

pub async fn flash_form(session: &Session, state: FormState) -> Result<(), session::Error> {
    session.insert(FORM_KEY, state).await
}

pub async fn take_form(session: &Session) -> Result<FormState, session::Error> {
    Ok(session
        .remove::<FormState>(FORM_KEY)
        .await?
        .unwrap_or_default())
}

/// A `302 Found` redirect.
pub fn found(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(_) => (StatusCode::FOUND, [(header::LOCATION, HeaderValue::from_static("/"))])
            .into_response(),
    }
}

/// Redirects to the path of the `Referer`, or to `fallback` without one.
pub fn back(headers: &HeaderMap, fallback: &str) -> Response {
    let target = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(referer_path)
        .unwrap_or(fallback);
    found(target)
}

/// Only the path and query of the referer are kept so the redirect stays on this host.
fn referer_path(referer: &str) -> Option<&str> {
    if referer.starts_with('/') && !referer.starts_with("//") {
        return Some(referer);
    }
    let (_, rest) = referer.split_once("://")?;
    rest.find('/').map(|idx| &rest[idx..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referer_path() {
        assert_eq!(
            referer_path("http://localhost:3000/admin/car/createcar"),
            Some("/admin/car/createcar")
        );
        assert_eq!(referer_path("/admin/car/editcar/3"), Some("/admin/car/editcar/3"));
        assert_eq!(referer_path("//evil.example/x"), None);
        assert_eq!(referer_path("https://example.com"), None);
    }

    #[test]
    fn test_back_falls_back_without_referer() {
        let response = back(&HeaderMap::new(), "/admin/car/createcar");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/admin/car/createcar"
        );
    }

    #[test]
    fn test_form_state_prefers_old_input() {
        let mut errors = ValidationErrors::new();
        errors.add("year", "The year field must be an integer.");
        let state = FormState::new(errors)
            .with_input("make", Some("Skoda"))
            .with_input("year", Some("soon"));

        assert_eq!(state.value_or("make", "Audi"), "Skoda");
        assert_eq!(state.value_or("model", "A4"), "A4");
        assert!(state.has_error("year"));
        assert_eq!(state.error("year"), "The year field must be an integer.");
        assert_eq!(state.error("make"), "");
    }
}
