//! `SQLite`-backed key-value store.

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::debug;

use super::keys::StorageKey;
use crate::Result;

/// Local key-value cache with JSON values.
///
/// Cloning is cheap: clones share the connection pool.
#[derive(Debug, Clone)]
pub struct KvStore {
    pool: SqlitePool,
}

impl KvStore {
    /// Open the store at the given database path.
    ///
    /// Creates the database and table if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn new(database_path: &str) -> Result<Self> {
        let url = format!("sqlite:{database_path}?mode=rwc");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let store = Self { pool };
        store.initialize().await?;
        Ok(store)
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.initialize().await?;
        Ok(store)
    }

    /// Initialize database schema.
    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Read a raw string value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_raw(&self, key: StorageKey) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv WHERE key = ?")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get::<String, _>("value")))
    }

    /// Write a raw string value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn set_raw(&self, key: StorageKey, value: &str) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO kv (key, value, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key.as_str())
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!("Stored {key} ({} bytes)", value.len());
        Ok(())
    }

    /// Read and decode a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored value does not decode.
    pub async fn get<T: DeserializeOwned>(&self, key: StorageKey) -> Result<Option<T>> {
        match self.get_raw(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Encode and write a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the query fails.
    pub async fn set<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set_raw(key, &raw).await
    }

    /// Remove a key. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn remove(&self, key: StorageKey) -> Result<()> {
        sqlx::query("DELETE FROM kv WHERE key = ?")
            .bind(key.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Remove several keys.
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub async fn remove_all(&self, keys: &[StorageKey]) -> Result<()> {
        for key in keys {
            self.remove(*key).await?;
        }
        Ok(())
    }

    /// Check whether a key is present.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn contains(&self, key: StorageKey) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM kv WHERE key = ?")
            .bind(key.as_str())
            .fetch_one(&self.pool)
            .await?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }
}
