//! PostgreSQL source: connection and keyset-paginated extraction.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::config::DbConfig;
use crate::error::{Error, Result};
use crate::model::{Entry, Relation};

/// Page query for the entries table.
///
/// Keyset pagination: id comparison + order + limit keeps the cost per
/// page flat regardless of how many rows were already consumed. Columns
/// that have no direct Rust mapping (tsvector, enum, numeric) are
/// normalized to text/float in the select list.
const SELECT_ENTRIES: &str = "\
    SELECT id::BIGINT AS id, guid, content, initial, weight::FLOAT8 AS weight, \
           tokens::TEXT AS tokens, lang, tags, phones, notes, meta, \
           status::TEXT AS status, created_at, updated_at \
    FROM entries \
    WHERE id > $1 ORDER BY id LIMIT $2";

/// Page query for the relations table.
const SELECT_RELATIONS: &str = "\
    SELECT id::BIGINT AS id, from_id::BIGINT AS from_id, to_id::BIGINT AS to_id, \
           types, tags, notes, weight::FLOAT8 AS weight, \
           status::TEXT AS status, created_at, updated_at \
    FROM relations \
    WHERE id > $1 ORDER BY id LIMIT $2";

/// The PostgreSQL side of the migration. Holds a single connection for
/// the duration of the job.
pub struct PgSource {
    pool: PgPool,
}

impl PgSource {
    /// Connect to the source database.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or authentication
    /// fails.
    pub async fn connect(cfg: &DbConfig) -> Result<Self> {
        let opts = PgConnectOptions::new()
            .host(&cfg.host)
            .port(cfg.port)
            .database(&cfg.dbname)
            .username(&cfg.user)
            .password(&cfg.password);

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .map_err(|e| {
                Error::SourceConnection(format!(
                    "failed to connect to PostgreSQL at {}:{}/{}: {}",
                    cfg.host, cfg.port, cfg.dbname, e
                ))
            })?;

        Ok(Self { pool })
    }

    /// Fetch one page of entries with ids strictly greater than
    /// `last_id`, ordered ascending. An empty page signals the end of
    /// the table.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or row decoding fails.
    pub async fn fetch_entries(&self, last_id: i64, limit: i64) -> Result<Vec<Entry>> {
        sqlx::query_as::<_, Entry>(SELECT_ENTRIES)
            .bind(last_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                Error::Extraction(format!("failed to fetch entries after id {}: {}", last_id, e))
            })
    }

    /// Fetch one page of relations with ids strictly greater than
    /// `last_id`, ordered ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or row decoding fails.
    pub async fn fetch_relations(&self, last_id: i64, limit: i64) -> Result<Vec<Relation>> {
        sqlx::query_as::<_, Relation>(SELECT_RELATIONS)
            .bind(last_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                Error::Extraction(format!(
                    "failed to fetch relations after id {}: {}",
                    last_id, e
                ))
            })
    }

    /// Close the connection.
    pub async fn close(self) {
        self.pool.close().await;
    }
}
