use anyhow::{Context as _, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use std::{path::Path, str::FromStr};

/// One row of the `tasks` table. Serialized as-is over the HTTP API:
/// `{id, description, is_completed, created_at}` with `created_at` in RFC 3339.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskRow {
    pub id: i64,
    pub description: String,
    pub is_completed: bool,
    pub created_at: String,
}

#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub async fn new(data_dir: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;
        let db_path = data_dir.join("taskd.db");
        let opts =
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", db_path.display()))?
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .create_if_missing(true);

        let pool = SqlitePool::connect_with(opts).await?;
        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    async fn migrate(pool: &SqlitePool) -> Result<()> {
        sqlx::migrate!("src/storage/migrations")
            .run(pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    // ─── Tasks ──────────────────────────────────────────────────────────────

    pub async fn create_task(&self, description: &str) -> Result<TaskRow> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO tasks (description, is_completed, created_at) VALUES (?, 0, ?)",
        )
        .bind(description)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        let id = result.last_insert_rowid();
        self.get_task(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("task not found after insert"))
    }

    pub async fn get_task(&self, id: i64) -> Result<Option<TaskRow>> {
        Ok(sqlx::query_as("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// All tasks, newest first. Ties on `created_at` are broken by id so the
    /// ordering stays stable when several tasks land in the same millisecond.
    pub async fn list_tasks(&self) -> Result<Vec<TaskRow>> {
        Ok(
            sqlx::query_as("SELECT * FROM tasks ORDER BY created_at DESC, id DESC")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    /// Partial update: only the supplied fields change. `COALESCE` keeps the
    /// stored value where the bind is NULL, so this stays a single
    /// parameterized statement regardless of which fields are present.
    ///
    /// Returns the number of rows affected. An unknown id affects zero rows.
    pub async fn update_task(
        &self,
        id: i64,
        is_completed: Option<bool>,
        description: Option<&str>,
    ) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE tasks SET
                 is_completed = COALESCE(?, is_completed),
                 description = COALESCE(?, description)
             WHERE id = ?",
        )
        .bind(is_completed)
        .bind(description)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Returns the number of rows affected. An unknown id affects zero rows.
    pub async fn delete_task(&self, id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
