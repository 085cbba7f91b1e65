use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::repository::{KeyValueStore, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

/// `SQLite`-backed key-value store scoped to a single namespace.
#[derive(Clone)]
pub struct SqliteKeyValueStore {
    pool: SqlitePool,
    namespace: String,
}

impl SqliteKeyValueStore {
    #[must_use]
    pub fn new(pool: SqlitePool, namespace: impl Into<String>) -> Self {
        Self {
            pool,
            namespace: namespace.into(),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT value
            FROM kv_entries
            WHERE namespace = ?1 AND key = ?2
            ",
        )
        .bind(&self.namespace)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.map(|row| {
            row.try_get::<String, _>("value")
                .map_err(|err| StorageError::Serialization(err.to_string()))
        })
        .transpose()
    }

    async fn put_all(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        let updated_at = Utc::now();
        let mut tx = self.pool.begin().await.map_err(conn)?;

        for (key, value) in entries {
            sqlx::query(
                r"
                INSERT INTO kv_entries (namespace, key, value, updated_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(namespace, key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                ",
            )
            .bind(&self.namespace)
            .bind(*key)
            .bind(value)
            .bind(updated_at)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        Ok(())
    }
}
