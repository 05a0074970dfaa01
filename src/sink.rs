//! SQLite destination: database creation, schema application, and
//! transactional batch loads.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{EntryValues, RelationValues};
use crate::schema::{self, SchemaScript};

/// Column order matches the entries table definition.
const INSERT_ENTRY: &str = "\
    INSERT INTO entries (id, guid, content, initial, weight, tokens, lang, \
                         tags, phones, notes, meta, status, created_at, updated_at) \
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

/// Column order matches the relations table definition.
const INSERT_RELATION: &str = "\
    INSERT INTO relations (id, from_id, to_id, types, tags, notes, weight, \
                           status, created_at, updated_at) \
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

/// The SQLite side of the migration. Single connection, single writer.
pub struct SqliteSink {
    pool: SqlitePool,
}

impl SqliteSink {
    /// Create the destination database file and open a connection to it.
    ///
    /// The preflight guard has already verified the file does not exist;
    /// this call creates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or opened.
    pub async fn create(path: &Path) -> Result<Self> {
        let opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .map_err(|e| {
                Error::Loading(format!(
                    "failed to create SQLite database '{}': {}",
                    path.display(),
                    e
                ))
            })?;

        Ok(Self { pool })
    }

    /// Access the underlying pool, e.g. for verification queries.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Apply the parsed schema script to the fresh database.
    ///
    /// # Errors
    ///
    /// Returns an error if any schema block fails to execute.
    pub async fn apply_schema(&self, script: &SchemaScript) -> Result<()> {
        schema::apply(&self.pool, script).await
    }

    /// Insert one page of entries inside a single transaction.
    ///
    /// Any failure rolls the whole batch back; partial pages are never
    /// visible in the destination.
    ///
    /// # Errors
    ///
    /// Returns an error if an insert or the commit fails.
    pub async fn insert_entries(&self, rows: &[EntryValues]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::Loading(format!("failed to begin transaction: {}", e)))?;

        for row in rows {
            sqlx::query(INSERT_ENTRY)
                .bind(row.id)
                .bind(&row.guid)
                .bind(&row.content)
                .bind(&row.initial)
                .bind(row.weight)
                .bind(&row.tokens)
                .bind(&row.lang)
                .bind(&row.tags)
                .bind(&row.phones)
                .bind(&row.notes)
                .bind(&row.meta)
                .bind(&row.status)
                .bind(&row.created_at)
                .bind(&row.updated_at)
                .execute(&mut *tx)
                .await
                .map_err(|e| Error::Loading(format!("failed to insert entry {}: {}", row.id, e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| Error::Loading(format!("failed to commit entries batch: {}", e)))
    }

    /// Insert one page of relations inside a single transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if an insert or the commit fails.
    pub async fn insert_relations(&self, rows: &[RelationValues]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::Loading(format!("failed to begin transaction: {}", e)))?;

        for row in rows {
            sqlx::query(INSERT_RELATION)
                .bind(row.id)
                .bind(row.from_id)
                .bind(row.to_id)
                .bind(&row.types)
                .bind(&row.tags)
                .bind(&row.notes)
                .bind(row.weight)
                .bind(&row.status)
                .bind(&row.created_at)
                .bind(&row.updated_at)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    Error::Loading(format!("failed to insert relation {}: {}", row.id, e))
                })?;
        }

        tx.commit()
            .await
            .map_err(|e| Error::Loading(format!("failed to commit relations batch: {}", e)))
    }

    /// Close the connection.
    pub async fn close(self) {
        self.pool.close().await;
    }
}
