//! Configuration types for dictpress-migrate.
//!
//! The source connection parameters are read from the dictionary app's own
//! `config.toml`, so an operator points the migration at the file they
//! already have. Only the `[db]` section is read; everything else in the
//! file is ignored.

use serde::Deserialize;
use std::path::Path;

use crate::error::{Error, Result};

/// Settings read from the app's config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// PostgreSQL connection parameters from the `[db]` section.
    #[serde(default)]
    pub db: DbConfig,
}

/// PostgreSQL connection parameters.
///
/// All keys are optional; missing keys take the defaults below without
/// complaint. Credential correctness is not validated here; a bad
/// password surfaces later as a connection error.
#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    /// Server host.
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Database name (the `db` key).
    #[serde(rename = "db", default)]
    pub dbname: String,
    /// Username.
    #[serde(default)]
    pub user: String,
    /// Password.
    #[serde(default)]
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            dbname: String::new(),
            user: String::new(),
            password: String::new(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse '{}': {}", path.display(), e)))?;
        Ok(config)
    }
}
