use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::flash::FormState;
use crate::users::models::trimmed;
use crate::validation::{parse_integer, ValidationErrors, Validator};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Car {
    pub id: i64,
    pub user_id: i64,
    pub make: String,
    pub model: String,
    pub year: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A list row: the car with its owner loaded alongside.
#[derive(Debug, Clone, Serialize)]
pub struct CarListing {
    pub id: i64,
    pub make: String,
    pub model: String,
    pub year: i64,
    pub owner_id: i64,
    pub owner_name: String,
    pub owner_email: String,
}

/// Validated values written by create and update. Ownership is not part of it.
#[derive(Debug, Clone, PartialEq)]
pub struct CarFields {
    pub make: String,
    pub model: String,
    pub year: i64,
}

/// Raw form input; every field is optional until validated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarForm {
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
}

impl CarForm {
    /// Store rules: make, model and an integer year are required.
    pub fn validate_create(&self) -> Result<CarFields, ValidationErrors> {
        let mut v = Validator::new();
        v.field("make", trimmed(&self.make)).required();
        v.field("model", trimmed(&self.model)).required();
        v.field("year", trimmed(&self.year)).required().integer();
        v.finish()?;
        Ok(self.to_fields())
    }

    /// Update rules: as for store, with make and model capped at 255 characters.
    pub fn validate_update(&self) -> Result<CarFields, ValidationErrors> {
        let mut v = Validator::new();
        v.field("make", trimmed(&self.make)).required().max(255);
        v.field("model", trimmed(&self.model)).required().max(255);
        v.field("year", trimmed(&self.year)).required().integer();
        v.finish()?;
        Ok(self.to_fields())
    }

    fn to_fields(&self) -> CarFields {
        CarFields {
            make: trimmed(&self.make).unwrap_or_default().to_string(),
            model: trimmed(&self.model).unwrap_or_default().to_string(),
            year: trimmed(&self.year).and_then(parse_integer).unwrap_or_default(),
        }
    }

    pub fn keep_input(&self, state: FormState) -> FormState {
        state
            .with_input("make", self.make.as_deref())
            .with_input("model", self.model.as_deref())
            .with_input("year", self.year.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(make: &str, model: &str, year: &str) -> CarForm {
        CarForm {
            make: Some(make.to_string()),
            model: Some(model.to_string()),
            year: Some(year.to_string()),
        }
    }

    #[test]
    fn test_valid_form_yields_fields() {
        let fields = form("Skoda", " Fabia ", "2022").validate_create().unwrap();
        assert_eq!(
            fields,
            CarFields {
                make: "Skoda".to_string(),
                model: "Fabia".to_string(),
                year: 2022,
            }
        );
    }

    #[test]
    fn test_create_reports_each_missing_field() {
        let errors = CarForm::default().validate_create().unwrap_err();
        assert_eq!(errors.get("make"), ["The make field is required."]);
        assert_eq!(errors.get("model"), ["The model field is required."]);
        assert_eq!(errors.get("year"), ["The year field is required."]);
    }

    #[test]
    fn test_only_update_caps_length() {
        let long = "x".repeat(256);
        assert!(form(&long, "Fabia", "2022").validate_create().is_ok());

        let errors = form(&long, "Fabia", "2022").validate_update().unwrap_err();
        assert_eq!(
            errors.get("make"),
            ["The make field must not be greater than 255 characters."]
        );
    }

    #[test]
    fn test_year_must_be_integer() {
        let errors = form("Skoda", "Fabia", "next year").validate_update().unwrap_err();
        assert!(errors.has("year"));
        assert!(!errors.has("make"));
    }

    #[test]
    fn test_keep_input_preserves_raw_values() {
        let state = form("Skoda", "Fabia", "soon").keep_input(FormState::new(ValidationErrors::new()));
        assert_eq!(state.value("year"), "soon");
        assert_eq!(state.value("make"), "Skoda");
    }
}
