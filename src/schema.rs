//! Destination schema script parsing and application.
//!
//! The app's `schema.sql` uses the yesql convention: statement blocks
//! are delimited by `-- name: <label>` marker lines. The migration
//! executes every block verbatim against the fresh SQLite database
//! before any rows are loaded.

use sqlx::SqlitePool;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};

/// The marker that delimits named statement blocks.
const BLOCK_MARKER: &str = "-- name:";

/// One named group of statements from the schema script.
///
/// A block body may hold several semicolon-separated statements (table
/// creation plus its indexes); it executes as a single unit.
#[derive(Debug, Clone)]
pub struct SchemaBlock {
    /// Block label from the marker line, kept for operator diagnostics.
    pub name: String,
    /// Statement body with the label line removed.
    pub sql: String,
}

/// A schema script parsed into its named statement blocks.
#[derive(Debug, Clone)]
pub struct SchemaScript {
    /// Blocks in file order.
    pub blocks: Vec<SchemaBlock>,
}

impl SchemaScript {
    /// Parse raw script text into named blocks.
    ///
    /// Each chunk between markers drops its first line (the label);
    /// chunks with no remaining body are skipped.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut blocks = Vec::new();

        for chunk in raw.split(BLOCK_MARKER) {
            let chunk = chunk.trim();
            if chunk.is_empty() {
                continue;
            }

            let Some((label, body)) = chunk.split_once('\n') else {
                continue;
            };

            let body = body.trim();
            if body.is_empty() {
                continue;
            }

            blocks.push(SchemaBlock {
                name: label.trim().to_string(),
                sql: body.to_string(),
            });
        }

        Self { blocks }
    }

    /// Read and parse a schema script file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(Self::parse(&raw))
    }
}

/// Execute every block of the script against the destination.
///
/// # Errors
///
/// Returns an error naming the offending block if the destination
/// rejects a statement.
pub async fn apply(db: &SqlitePool, script: &SchemaScript) -> Result<()> {
    for block in &script.blocks {
        debug!("applying schema block '{}'", block.name);
        sqlx::raw_sql(&block.sql).execute(db).await.map_err(|e| {
            Error::Schema(format!("failed to apply schema block '{}': {}", block.name, e))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_blocks() {
        let raw = "-- name: pragma\nPRAGMA journal_mode=WAL;\n\n-- name: schema\nCREATE TABLE entries (id INTEGER);\nCREATE INDEX idx_entries ON entries(id);\n";
        let script = SchemaScript::parse(raw);

        assert_eq!(script.blocks.len(), 2);
        assert_eq!(script.blocks[0].name, "pragma");
        assert_eq!(script.blocks[0].sql, "PRAGMA journal_mode=WAL;");
        assert_eq!(script.blocks[1].name, "schema");
        // Multi-statement body stays one unit.
        assert!(script.blocks[1].sql.contains("CREATE TABLE"));
        assert!(script.blocks[1].sql.contains("CREATE INDEX"));
    }

    #[test]
    fn test_parse_skips_empty_blocks() {
        let raw = "-- name: empty\n\n-- name: real\nCREATE TABLE t (id INTEGER);\n";
        let script = SchemaScript::parse(raw);

        assert_eq!(script.blocks.len(), 1);
        assert_eq!(script.blocks[0].name, "real");
    }

    #[test]
    fn test_parse_label_only_block_is_skipped() {
        let script = SchemaScript::parse("-- name: lonely");
        assert!(script.blocks.is_empty());
    }

    #[test]
    fn test_parse_preamble_loses_first_line() {
        // Text before the first marker is treated like any block: its
        // first line is discarded, the remainder kept.
        let raw = "leading comment\nPRAGMA foreign_keys=ON;\n-- name: schema\nCREATE TABLE t (id INTEGER);\n";
        let script = SchemaScript::parse(raw);

        assert_eq!(script.blocks.len(), 2);
        assert_eq!(script.blocks[0].name, "leading comment");
        assert_eq!(script.blocks[0].sql, "PRAGMA foreign_keys=ON;");
    }

    #[test]
    fn test_parse_empty_script() {
        assert!(SchemaScript::parse("").blocks.is_empty());
        assert!(SchemaScript::parse("   \n  ").blocks.is_empty());
    }
}
