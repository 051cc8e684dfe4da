use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user about to be inserted. The password is plaintext until the repository hashes it.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub password: String,
}

/// Fields an update writes. `None` leaves the stored column untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct UserPatch {
    pub name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub password: Option<String>,
}

impl UserPatch {
    /// Name is always overwritten, email only when it differs ignoring case,
    /// phone only when submitted, password only when non-blank. The password
    /// is kept exactly as typed so it matches what login verifies.
    pub fn from_update(current: &User, form: &UpdateUserForm) -> Self {
        let email = form
            .email
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| *e != current.email.to_lowercase());

        Self {
            name: trimmed(&form.name).unwrap_or_default().to_string(),
            email,
            phone_number: form.phone_number.as_deref().map(|p| p.trim().to_string()),
            password: form
                .password
                .clone()
                .filter(|p| !p.trim().is_empty()),
        }
    }
}

/// Admin create form and signup form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl UserForm {
    pub fn into_new_user(self) -> NewUser {
        NewUser {
            name: trimmed(&self.name).unwrap_or_default().to_string(),
            email: trimmed(&self.email).unwrap_or_default().to_lowercase(),
            phone_number: trimmed(&self.phone_number).map(str::to_string),
            password: self.password.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Checkbox value; any value means "remember me".
    #[serde(default)]
    pub remember: Option<String>,
}

/// Identity kept in the session and handed to every admin handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: i64,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserSession {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

pub(crate) fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current() -> User {
        User {
            id: 1,
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            phone_number: Some("555".to_string()),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_patch_skips_email_differing_only_in_case() {
        let form = UpdateUserForm {
            name: Some("Jane Doe".to_string()),
            email: Some("JANE@Example.com".to_string()),
            ..Default::default()
        };
        let patch = UserPatch::from_update(&current(), &form);

        assert_eq!(patch.name, "Jane Doe");
        assert_eq!(patch.email, None);
        assert_eq!(patch.phone_number, None);
        assert_eq!(patch.password, None);
    }

    #[test]
    fn test_patch_lowercases_changed_email_and_keeps_phone() {
        let form = UpdateUserForm {
            name: Some("Jane".to_string()),
            email: Some("New@Example.com".to_string()),
            phone_number: Some(" 9876543210 ".to_string()),
            password: Some("".to_string()),
        };
        let patch = UserPatch::from_update(&current(), &form);

        assert_eq!(patch.email.as_deref(), Some("new@example.com"));
        assert_eq!(patch.phone_number.as_deref(), Some("9876543210"));
        assert_eq!(patch.password, None);
    }

    #[test]
    fn test_patch_keeps_password_as_typed() {
        let form = UpdateUserForm {
            name: Some("Jane".to_string()),
            email: Some("jane@example.com".to_string()),
            password: Some(" secret123 ".to_string()),
            ..Default::default()
        };
        let patch = UserPatch::from_update(&current(), &form);

        assert_eq!(patch.password.as_deref(), Some(" secret123 "));
    }

    #[test]
    fn test_new_user_normalizes_email() {
        let form = UserForm {
            name: Some(" John Doe ".to_string()),
            email: Some("JohnDoe@Example.com".to_string()),
            phone_number: Some("1234567890".to_string()),
            password: Some("12345678".to_string()),
        };
        let new_user = form.into_new_user();

        assert_eq!(new_user.name, "John Doe");
        assert_eq!(new_user.email, "johndoe@example.com");
        assert_eq!(new_user.password, "12345678");
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let json = serde_json::to_value(current()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "jane@example.com");
    }
}
