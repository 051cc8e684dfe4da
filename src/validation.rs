//! Field-keyed validation rules shared by the admin handlers.
//!
//! Rules are chained per field. A field that is absent or blank only reports
//! `required` (when asked for) and skips every other rule.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Messages keyed by field name, serialized as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field).first().map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field<'a>(&'a mut self, name: &'a str, value: Option<&'a str>) -> FieldRules<'a> {
        let value = value.filter(|v| !v.trim().is_empty());
        FieldRules {
            errors: &mut self.errors,
            name,
            value,
        }
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

pub struct FieldRules<'a> {
    errors: &'a mut ValidationErrors,
    name: &'a str,
    value: Option<&'a str>,
}

impl<'a> FieldRules<'a> {
    fn label(&self) -> String {
        self.name.replace('_', " ")
    }

    fn fail(&mut self, message: String) {
        self.errors.add(self.name, message);
    }

    pub fn required(mut self) -> Self {
        if self.value.is_none() {
            let message = format!("The {} field is required.", self.label());
            self.fail(message);
        }
        self
    }

    pub fn max(mut self, limit: usize) -> Self {
        if let Some(value) = self.value {
            if value.chars().count() > limit {
                let message = format!(
                    "The {} field must not be greater than {} characters.",
                    self.label(),
                    limit
                );
                self.fail(message);
            }
        }
        self
    }

    pub fn min(mut self, limit: usize) -> Self {
        if let Some(value) = self.value {
            if value.chars().count() < limit {
                let message = format!(
                    "The {} field must be at least {} characters.",
                    self.label(),
                    limit
                );
                self.fail(message);
            }
        }
        self
    }

    pub fn email(mut self) -> Self {
        if let Some(value) = self.value {
            if !is_valid_email(value) {
                let message = format!("The {} field must be a valid email address.", self.label());
                self.fail(message);
            }
        }
        self
    }

    pub fn integer(mut self) -> Self {
        if let Some(value) = self.value {
            if parse_integer(value).is_none() {
                let message = format!("The {} field must be an integer.", self.label());
                self.fail(message);
            }
        }
        self
    }

    /// `taken` comes from the caller's uniqueness lookup.
    pub fn unique(mut self, taken: bool) -> Self {
        if self.value.is_some() && taken {
            let message = format!("The {} has already been taken.", self.label());
            self.fail(message);
        }
        self
    }
}

pub fn parse_integer(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

pub fn is_valid_email(email: &str) -> bool {
    // Must have exactly one @ separating local and domain parts
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || !domain.contains('.') || email.chars().any(char::is_whitespace) {
        return false;
    }

    // At least "x.x" in the domain
    let domain_parts: Vec<&str> = domain.split('.').collect();
    domain_parts.len() >= 2 && domain_parts.iter().all(|part| !part.is_empty())
}
