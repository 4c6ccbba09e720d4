//! Database repository for module persistence.
//!
//! The API writes every store mutation through [`ModuleRepository`] so the
//! module list survives restarts. On startup [`ModuleRepository::list`]
//! rehydrates the in-memory [`ModuleStore`](crate::store::ModuleStore).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use thiserror::Error;

use crate::classification::{Grade, Level};
use crate::store::StoredModule;

/// Errors from a module persistence backend.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt module row {id}: {message}")]
    CorruptRow { id: i64, message: String },
}

/// Persistence seam for the module store.
#[async_trait]
pub trait ModuleRepository {
    async fn insert(&self, module: &StoredModule) -> Result<(), RepositoryError>;

    /// Returns `true` if a row was updated, `false` if the id is unknown.
    async fn update(&self, module: &StoredModule) -> Result<bool, RepositoryError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: i64) -> Result<bool, RepositoryError>;

    /// All modules ordered by id.
    async fn list(&self) -> Result<Vec<StoredModule>, RepositoryError>;
}

/// SQLite-backed [`ModuleRepository`].
pub struct SqliteModuleRepository {
    pool: SqlitePool,
}

impl SqliteModuleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn parse_timestamp(id: i64, raw: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|err| RepositoryError::CorruptRow {
            id,
            message: format!("bad timestamp {raw:?}: {err}"),
        })
}

fn module_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<StoredModule, RepositoryError> {
    let id: i64 = row.try_get("id")?;
    let name: String = row.try_get("name")?;
    let level: i64 = row.try_get("level")?;
    let credits: i64 = row.try_get("credits")?;
    let grade: i64 = row.try_get("grade")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    let corrupt = |message: String| RepositoryError::CorruptRow { id, message };

    let level = u8::try_from(level)
        .ok()
        .and_then(|l| Level::try_from(l).ok())
        .ok_or_else(|| corrupt(format!("bad level {level}")))?;
    let grade = u8::try_from(grade)
        .ok()
        .and_then(|g| Grade::try_from(g).ok())
        .ok_or_else(|| corrupt(format!("bad grade {grade}")))?;
    let credits = u32::try_from(credits).map_err(|_| corrupt(format!("bad credits {credits}")))?;

    Ok(StoredModule {
        id,
        name,
        level,
        credits,
        grade,
        created_at: parse_timestamp(id, &created_at)?,
        updated_at: parse_timestamp(id, &updated_at)?,
    })
}

#[async_trait]
impl ModuleRepository for SqliteModuleRepository {
    async fn insert(&self, module: &StoredModule) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO modules (id, name, level, credits, grade, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(module.id)
        .bind(&module.name)
        .bind(i64::from(u8::from(module.level)))
        .bind(i64::from(module.credits))
        .bind(i64::from(u8::from(module.grade)))
        .bind(module.created_at.to_rfc3339())
        .bind(module.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, module: &StoredModule) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE modules SET name = ?, level = ?, credits = ?, grade = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&module.name)
        .bind(i64::from(u8::from(module.level)))
        .bind(i64::from(module.credits))
        .bind(i64::from(u8::from(module.grade)))
        .bind(module.updated_at.to_rfc3339())
        .bind(module.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM modules WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<StoredModule>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, level, credits, grade, created_at, updated_at
             FROM modules ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(module_from_row).collect()
    }
}
