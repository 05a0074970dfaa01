//! Preflight checks run before any destination-mutating action.

use std::path::Path;

use crate::error::{Error, Result};

/// Validate all external paths before the migration starts.
///
/// Three checks, in order: the config file must exist, the destination
/// database must not already exist (a prior run is never silently
/// overwritten), and the schema script must exist. Nothing is touched
/// until all three pass.
///
/// # Errors
///
/// Returns a descriptive error for the first failing check.
pub fn check(config: &Path, sqlite_db: &Path, sqlite_schema: &Path) -> Result<()> {
    if !config.exists() {
        return Err(Error::Preflight(format!(
            "config file not found: {}",
            config.display()
        )));
    }

    if sqlite_db.exists() {
        return Err(Error::Preflight(format!(
            "SQLite database already exists: {}",
            sqlite_db.display()
        )));
    }

    if !sqlite_schema.exists() {
        return Err(Error::Preflight(format!(
            "schema file not found: {}",
            sqlite_schema.display()
        )));
    }

    Ok(())
}
