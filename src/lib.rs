// Migration tool - pedantic lints relaxed for CLI ergonomics
#![allow(clippy::pedantic)]

//! # dictpress-migrate
//!
//! `dictpress-migrate` is a one-shot batch tool that moves a dictpress
//! dictionary database from PostgreSQL into the single-file SQLite
//! format the Rust port uses. Identifiers, relationships, and search
//! tokens are preserved.
//!
//! ## Usage
//!
//! ```bash
//! dictpress-migrate --config config.toml \
//!     --sqlite-db ./dictpress.sqlite \
//!     --sqlite-schema ./schema.sql
//! ```
//!
//! The config file is the Go app's own `config.toml` (its `[db]`
//! section holds the PostgreSQL credentials); the schema script is the
//! Rust app's `static/sql/schema.sql`. The destination file must not
//! exist: re-running a migration means deleting the output and
//! starting over, never resuming.
//!
//! Entries are migrated before relations so that the destination's
//! foreign keys always resolve, page by page with one transaction per
//! page. Any error aborts the job; committed pages stay put.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod preflight;
pub mod schema;
pub mod sink;
pub mod source;
pub mod transform;

pub use config::{Config, DbConfig};
pub use error::{Error, Result};
pub use model::{Entry, EntryValues, Relation, RelationValues};
pub use pipeline::{MigrationStats, Pipeline, Stage, PAGE_SIZE};
pub use schema::{SchemaBlock, SchemaScript};
pub use sink::SqliteSink;
pub use source::PgSource;
