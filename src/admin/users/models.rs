use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::users::User;

/// A user as shown in the admin panel; the password hash never leaves the repository layer.
#[derive(Debug, Clone, Serialize)]
pub struct AdminUserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminUserResponse {
    pub fn phone(&self) -> &str {
        self.phone_number.as_deref().unwrap_or("")
    }

    pub fn joined(&self) -> String {
        self.created_at.format("%Y-%m-%d").to_string()
    }
}

impl From<User> for AdminUserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone_number: user.phone_number,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
