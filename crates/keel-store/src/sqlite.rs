//! SQLite-backed record store.

use crate::schema;
use crate::traits::{FileStore, ProjectStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use futures::stream::BoxStream;
use keel_core::{FileEntry, FileRecord, KeelError, Project, Result};
use sqlx::{
    Row,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow},
};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Record store over a pooled SQLite database.
///
/// Concurrent writers wait up to the configured busy timeout for the
/// database lock instead of failing immediately.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `path` and apply the schema.
    pub async fn open(path: &Path, busy_timeout: Duration, max_connections: u32) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| KeelError::storage(format!("Failed to open SQLite database: {}", e)))?;

        let store = Self { pool };
        store.init_schema().await?;

        info!(path = %path.display(), "Record store opened");
        Ok(store)
    }

    /// Private in-memory database on a single long-lived connection.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| KeelError::storage(format!("Invalid in-memory options: {}", e)))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| {
                KeelError::storage(format!("Failed to open in-memory database: {}", e))
            })?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        for statement in schema::STATEMENTS {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| KeelError::storage(format!("Failed to create schema: {}", e)))?;
        }
        debug!("Schema initialized");
        Ok(())
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| KeelError::storage(format!("Invalid {} timestamp '{}': {}", column, value, e)))
}

fn column<T>(row: &SqliteRow, name: &str) -> Result<T>
where
    T: for<'r> sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name)
        .map_err(|e| KeelError::storage(format!("Failed to read column {}: {}", name, e)))
}

fn project_from_row(row: &SqliteRow) -> Result<Project> {
    let name: String = column(row, "name")?;
    let base_path: String = column(row, "base_path")?;
    let created_at: String = column(row, "created_at")?;

    Ok(Project {
        name,
        base_path: PathBuf::from(base_path),
        created_at: parse_timestamp(&created_at, "created_at")?,
    })
}

#[async_trait]
impl ProjectStore for SqliteStore {
    async fn upsert_project(&self, name: &str, base_path: &Path) -> Result<Project> {
        let row = sqlx::query(
            r"
            INSERT INTO projects (name, base_path, created_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(name) DO UPDATE SET
                base_path = excluded.base_path
            RETURNING name, base_path, created_at
            ",
        )
        .bind(name)
        .bind(base_path.to_string_lossy().into_owned())
        .bind(Utc::now().to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| KeelError::storage(format!("Failed to save project: {}", e)))?;

        project_from_row(&row)
    }

    async fn get_project(&self, name: &str) -> Result<Option<Project>> {
        let row = sqlx::query("SELECT name, base_path, created_at FROM projects WHERE name = ?1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| KeelError::storage(format!("Failed to load project: {}", e)))?;

        row.as_ref().map(project_from_row).transpose()
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        let rows = sqlx::query("SELECT name, base_path, created_at FROM projects ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| KeelError::storage(format!("Failed to list projects: {}", e)))?;

        rows.iter().map(project_from_row).collect()
    }
}

#[async_trait]
impl FileStore for SqliteStore {
    async fn get_file(&self, project: &str, path: &str) -> Result<Option<FileRecord>> {
        let row = sqlx::query(
            r"
            SELECT content, updated_at
            FROM files
            WHERE project = ?1 AND path = ?2
            ",
        )
        .bind(project)
        .bind(path)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| KeelError::storage(format!("Failed to load file: {}", e)))?;

        match row {
            Some(row) => {
                let content: String = column(&row, "content")?;
                let updated_at: String = column(&row, "updated_at")?;

                Ok(Some(FileRecord {
                    project: project.to_string(),
                    path: path.to_string(),
                    content,
                    updated_at: parse_timestamp(&updated_at, "updated_at")?,
                }))
            }
            None => Ok(None),
        }
    }

    async fn put_file(&self, project: &str, path: &str, content: &str) -> Result<FileRecord> {
        let updated_at = Utc::now();

        sqlx::query(
            r"
            INSERT INTO files (project, path, content, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(project, path) DO UPDATE SET
                content = excluded.content,
                updated_at = excluded.updated_at
            ",
        )
        .bind(project)
        .bind(path)
        .bind(content)
        .bind(updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| KeelError::storage(format!("Failed to save file: {}", e)))?;

        Ok(FileRecord {
            project: project.to_string(),
            path: path.to_string(),
            content: content.to_string(),
            updated_at,
        })
    }

    async fn delete_file(&self, project: &str, path: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE project = ?1 AND path = ?2")
            .bind(project)
            .bind(path)
            .execute(&self.pool)
            .await
            .map_err(|e| KeelError::storage(format!("Failed to delete file: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    fn scan_project<'a>(&'a self, project: &'a str) -> BoxStream<'a, Result<FileEntry>> {
        sqlx::query("SELECT path, content FROM files WHERE project = ?1")
            .bind(project)
            .fetch(&self.pool)
            .map(|row| {
                let row =
                    row.map_err(|e| KeelError::storage(format!("Failed to scan files: {}", e)))?;
                Ok(FileEntry {
                    path: column(&row, "path")?,
                    content: column(&row, "content")?,
                })
            })
            .boxed()
    }
}
