use crate::database::{parse_datetime, Database};
use crate::pagination::{Page, PER_PAGE};
use crate::users::auth::hash_password;
use crate::users::models::{NewUser, User, UserPatch};
use rusqlite::{OptionalExtension, Row};
use std::sync::Arc;

const USER_COLUMNS: &str =
    "id, name, email, phone_number, password_hash, created_at, updated_at";

pub struct UserRepository {
    db: Arc<Database>,
}

impl UserRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create_user(
        &self,
        new_user: NewUser,
    ) -> Result<User, Box<dyn std::error::Error + Send + Sync>> {
        let password_hash = hash_password(&new_user.password)?;
        let db = self.db.clone();
        let email = new_user.email.to_lowercase();

        let user_id = tokio::task::spawn_blocking(move || -> Result<i64, Box<dyn std::error::Error + Send + Sync>> {
            let conn = db.connection()?;

            conn.execute(
                "INSERT INTO users (name, email, phone_number, password_hash) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![&new_user.name, &email, &new_user.phone_number, &password_hash],
            )?;

            Ok(conn.last_insert_rowid())
        })
        .await??;

        self.find_by_id(user_id)
            .await?
            .ok_or_else(|| "user vanished after insert".into())
    }

    pub async fn find_by_id(
        &self,
        id: i64,
    ) -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>> {
        let db = self.db.clone();

        tokio::task::spawn_blocking(move || -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>> {
            let conn = db.connection()?;

            let user = conn
                .query_row(
                    &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
                    [id],
                    map_user,
                )
                .optional()?;

            Ok(user)
        })
        .await?
    }

    pub async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>> {
        let db = self.db.clone();
        let email = email.trim().to_lowercase();

        tokio::task::spawn_blocking(move || -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>> {
            let conn = db.connection()?;

            let user = conn
                .query_row(
                    &format!("SELECT {} FROM users WHERE email = ?1 COLLATE NOCASE", USER_COLUMNS),
                    [&email],
                    map_user,
                )
                .optional()?;

            Ok(user)
        })
        .await?
    }

    /// Whether another user already holds `email`, ignoring case and `except_id`.
    pub async fn email_taken(
        &self,
        email: &str,
        except_id: Option<i64>,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let db = self.db.clone();
        let email = email.trim().to_string();

        tokio::task::spawn_blocking(move || -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
            let conn = db.connection()?;

            let found = conn
                .query_row(
                    "SELECT id FROM users WHERE email = ?1 COLLATE NOCASE AND id != ?2",
                    rusqlite::params![&email, except_id.unwrap_or(0)],
                    |row| row.get::<_, i64>(0),
                )
                .optional()?;

            Ok(found.is_some())
        })
        .await?
    }

    /// Newest first.
    pub async fn paginate(
        &self,
        page: i64,
    ) -> Result<Page<User>, Box<dyn std::error::Error + Send + Sync>> {
        let db = self.db.clone();

        tokio::task::spawn_blocking(move || -> Result<Page<User>, Box<dyn std::error::Error + Send + Sync>> {
            let conn = db.connection()?;

            let total: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;

            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM users ORDER BY id DESC LIMIT ?1 OFFSET ?2",
                USER_COLUMNS
            ))?;
            let items = stmt
                .query_map(
                    rusqlite::params![PER_PAGE, Page::<User>::offset(page, PER_PAGE)],
                    map_user,
                )?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Page {
                items,
                current_page: page,
                per_page: PER_PAGE,
                total,
            })
        })
        .await?
    }

    /// Returns `None` when no user has `id`.
    pub async fn update_user(
        &self,
        id: i64,
        patch: UserPatch,
    ) -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>> {
        let password_hash = match patch.password.as_deref() {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };
        let db = self.db.clone();

        let changed = tokio::task::spawn_blocking(move || -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
            let conn = db.connection()?;

            let changed = conn.execute(
                "UPDATE users SET
                    name = ?1,
                    email = COALESCE(?2, email),
                    phone_number = COALESCE(?3, phone_number),
                    password_hash = COALESCE(?4, password_hash),
                    updated_at = CURRENT_TIMESTAMP
                 WHERE id = ?5",
                rusqlite::params![&patch.name, &patch.email, &patch.phone_number, &password_hash, id],
            )?;

            Ok(changed)
        })
        .await??;

        if changed == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    /// Returns whether a row was removed.
    pub async fn delete_user(&self, id: i64) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let db = self.db.clone();

        tokio::task::spawn_blocking(move || -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
            let conn = db.connection()?;
            let deleted = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
        .await?
    }

    pub async fn count(&self) -> Result<i64, Box<dyn std::error::Error + Send + Sync>> {
        let db = self.db.clone();

        tokio::task::spawn_blocking(move || -> Result<i64, Box<dyn std::error::Error + Send + Sync>> {
            let conn = db.connection()?;
            Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?)
        })
        .await?
    }
}

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone_number: row.get(3)?,
        password_hash: row.get(4)?,
        created_at: parse_datetime(row.get::<_, String>(5)?),
        updated_at: parse_datetime(row.get::<_, String>(6)?),
    })
}
