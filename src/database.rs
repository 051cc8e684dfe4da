use chrono::{DateTime, Utc};
use rusqlite::Connection;
use rusqlite_migration::{Migrations, M};
use std::sync::{Mutex, MutexGuard};
use tokio::task;
use tower_sessions_rusqlite_store::{tokio_rusqlite, RusqliteStore};

pub type DbError = Box<dyn std::error::Error + Send + Sync>;

pub struct Database {
    path: String,
    connection: Mutex<Connection>,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self, DbError> {
        let db_path = database_url.strip_prefix("sqlite:").unwrap_or(database_url).to_string();

        // Ensure the data directory exists
        if let Some(parent) = std::path::Path::new(&db_path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let open_path = db_path.clone();
        let connection = task::spawn_blocking(move || -> Result<Connection, DbError> {
            let conn = Connection::open(&open_path)?;
            // Cars cascade with their owner.
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.busy_timeout(std::time::Duration::from_secs(5))?;
            Ok(conn)
        })
        .await??;

        Ok(Database {
            path: db_path,
            connection: Mutex::new(connection),
        })
    }

    pub async fn migrate(&self) -> Result<(), DbError> {
        let migrations = Migrations::new(vec![
            M::up(include_str!("../migrations/001_users.sql")),
            M::up(include_str!("../migrations/002_cars.sql")),
        ]);

        let mut conn = self.connection()?;
        migrations.to_latest(&mut conn)?;

        Ok(())
    }

    /// Opens the session store on the same SQLite file and creates its table.
    pub async fn session_store(&self) -> Result<RusqliteStore, DbError> {
        let conn = tokio_rusqlite::Connection::open(&self.path).await?;
        let store = RusqliteStore::new(conn);
        store.migrate().await?;
        Ok(store)
    }

    pub async fn health_check(&self) -> Result<(), DbError> {
        let conn = self.connection()?;
        let _result: i32 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
        Ok(())
    }

    pub fn connection(&self) -> Result<MutexGuard<'_, Connection>, DbError> {
        self.connection
            .lock()
            .map_err(|_| "database connection lock poisoned".into())
    }
}

/// Timestamps are stored by SQLite as `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn parse_datetime(s: String) -> DateTime<Utc> {
    chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc())
        .unwrap_or_else(Utc::now)
}
