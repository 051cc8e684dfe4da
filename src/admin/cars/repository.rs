use crate::admin::cars::models::{Car, CarFields, CarListing};
use crate::database::{parse_datetime, Database};
use crate::pagination::{Page, PER_PAGE};
use rusqlite::{OptionalExtension, Row};
use std::sync::Arc;

pub struct CarRepository {
    db: Arc<Database>,
}

impl CarRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Inserts a car owned by `owner_id`.
    pub async fn create_car(
        &self,
        owner_id: i64,
        fields: CarFields,
    ) -> Result<Car, Box<dyn std::error::Error + Send + Sync>> {
        let db = self.db.clone();

        let car_id = tokio::task::spawn_blocking(move || -> Result<i64, Box<dyn std::error::Error + Send + Sync>> {
            let conn = db.connection()?;

            conn.execute(
                "INSERT INTO cars (user_id, make, model, year) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![owner_id, &fields.make, &fields.model, fields.year],
            )?;

            Ok(conn.last_insert_rowid())
        })
        .await??;

        self.find_by_id(car_id)
            .await?
            .ok_or_else(|| "car vanished after insert".into())
    }

    pub async fn find_by_id(
        &self,
        id: i64,
    ) -> Result<Option<Car>, Box<dyn std::error::Error + Send + Sync>> {
        let db = self.db.clone();

        tokio::task::spawn_blocking(move || -> Result<Option<Car>, Box<dyn std::error::Error + Send + Sync>> {
            let conn = db.connection()?;

            let car = conn
                .query_row(
                    "SELECT id, user_id, make, model, year, created_at, updated_at
                     FROM cars WHERE id = ?1",
                    [id],
                    map_car,
                )
                .optional()?;

            Ok(car)
        })
        .await?
    }

    /// Newest first, each row joined with its owner.
    pub async fn paginate_with_owners(
        &self,
        page: i64,
    ) -> Result<Page<CarListing>, Box<dyn std::error::Error + Send + Sync>> {
        let db = self.db.clone();

        tokio::task::spawn_blocking(move || -> Result<Page<CarListing>, Box<dyn std::error::Error + Send + Sync>> {
            let conn = db.connection()?;

            let total: i64 = conn.query_row("SELECT COUNT(*) FROM cars", [], |row| row.get(0))?;

            let mut stmt = conn.prepare(
                "SELECT c.id, c.make, c.model, c.year, u.id, u.name, u.email
                 FROM cars c
                 JOIN users u ON u.id = c.user_id
                 ORDER BY c.id DESC
                 LIMIT ?1 OFFSET ?2",
            )?;

            let items = stmt
                .query_map(
                    rusqlite::params![PER_PAGE, Page::<CarListing>::offset(page, PER_PAGE)],
                    |row| {
                        Ok(CarListing {
                            id: row.get(0)?,
                            make: row.get(1)?,
                            model: row.get(2)?,
                            year: row.get(3)?,
                            owner_id: row.get(4)?,
                            owner_name: row.get(5)?,
                            owner_email: row.get(6)?,
                        })
                    },
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

    /// Overwrites make, model and year. Returns `None` when no car has `id`.
    pub async fn update_car(
        &self,
        id: i64,
        fields: CarFields,
    ) -> Result<Option<Car>, Box<dyn std::error::Error + Send + Sync>> {
        let db = self.db.clone();

        let changed = tokio::task::spawn_blocking(move || -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
            let conn = db.connection()?;

            let changed = conn.execute(
                "UPDATE cars SET make = ?1, model = ?2, year = ?3, updated_at = CURRENT_TIMESTAMP
                 WHERE id = ?4",
                rusqlite::params![&fields.make, &fields.model, fields.year, id],
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
    pub async fn delete_car(&self, id: i64) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let db = self.db.clone();

        tokio::task::spawn_blocking(move || -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
            let conn = db.connection()?;
            let deleted = conn.execute("DELETE FROM cars WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
        .await?
    }

    pub async fn count(&self) -> Result<i64, Box<dyn std::error::Error + Send + Sync>> {
        let db = self.db.clone();

        tokio::task::spawn_blocking(move || -> Result<i64, Box<dyn std::error::Error + Send + Sync>> {
            let conn = db.connection()?;
            Ok(conn.query_row("SELECT COUNT(*) FROM cars", [], |row| row.get(0))?)
        })
        .await?
    }
}

fn map_car(row: &Row<'_>) -> rusqlite::Result<Car> {
    Ok(Car {
        id: row.get(0)?,
        user_id: row.get(1)?,
        make: row.get(2)?,
        model: row.get(3)?,
        year: row.get(4)?,
        created_at: parse_datetime(row.get::<_, String>(5)?),
        updated_at: parse_datetime(row.get::<_, String>(6)?),
    })
}
