//! # Configuration File Parser
//!
//! Reads `dbprism.toml`, the optional project file that sets defaults for the
//! CLI without repeating flags:
//!
//! - `[database]`: default connection URL and an explicit backend override
//! - `[schema]`: which catalog objects to read and the per-query timeout
//! - `[dialect]`: force the SQL Server pagination branch instead of detecting it
//!
//! Example `dbprism.toml`:
//!
//! ```toml
//! [database]
//! url = "postgres://localhost/erp"
//!
//! [schema]
//! include_routines = false
//! include_system_data = false
//! timeout_secs = 30
//!
//! [dialect]
//! sqlserver_legacy_pagination = true
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::backend::Backend;
use crate::error::{DbPrismError, Result};
use crate::schema::types::SchemaOptions;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "dbprism.toml";

/// Catalog query timeout when neither flag nor config sets one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Top-level dbprism.toml structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DbPrismConfig {
    pub database: DatabaseConfig,
    pub schema: SchemaConfig,
    pub dialect: DialectConfig,

    /// Directory the file was read from.
    #[serde(skip)]
    pub config_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL (e.g., "postgres://localhost/erp").
    pub url: Option<String>,
    /// Backend name, for connection strings whose scheme does not say it.
    pub backend: Option<String>,
}

/// Overrides for [`SchemaOptions`]; unset keys keep the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub include_tables: Option<bool>,
    pub include_views: Option<bool>,
    pub include_routines: Option<bool>,
    pub include_triggers: Option<bool>,
    pub include_descriptions: Option<bool>,
    pub include_system_data: Option<bool>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DialectConfig {
    /// `Some(true)` always uses ROW_NUMBER() pagination on SQL Server,
    /// `Some(false)` always OFFSET/FETCH. Unset means detect from the server version.
    pub sqlserver_legacy_pagination: Option<bool>,
}

/// Read and parse a dbprism.toml file from the given directory.
///
/// Returns `None` if the file doesn't exist (config is optional).
/// Returns an error if the file exists but can't be parsed or fails validation.
pub fn read_config(dir: &Path) -> Result<Option<DbPrismConfig>> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| DbPrismError::Config {
        message: format!("Failed to read {}: {}", path.display(), e),
    })?;

    let mut config: DbPrismConfig = toml::from_str(&content).map_err(|e| DbPrismError::Config {
        message: format!("Failed to parse {}: {}", path.display(), e),
    })?;

    config.config_dir = Some(std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf()));
    config.validate()?;

    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(Some(config))
}

impl DbPrismConfig {
    /// Reject values serde accepts but the reader cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.schema.timeout_secs == Some(0) {
            return Err(DbPrismError::Config {
                message: "[schema] timeout_secs must be greater than zero".to_string(),
            });
        }
        if let Some(ref name) = self.database.backend {
            Backend::from_str(name).map_err(|_| DbPrismError::Config {
                message: format!(
                    "[database] backend '{}' is not one of: sqlserver, postgres, mysql, sqlite, odbc, duckdb, spark",
                    name
                ),
            })?;
        }
        Ok(())
    }

    /// Defaults with the `[schema]` overrides applied.
    pub fn schema_options(&self) -> SchemaOptions {
        let defaults = SchemaOptions::default();
        let s = &self.schema;
        SchemaOptions {
            include_tables: s.include_tables.unwrap_or(defaults.include_tables),
            include_views: s.include_views.unwrap_or(defaults.include_views),
            include_routines: s.include_routines.unwrap_or(defaults.include_routines),
            include_triggers: s.include_triggers.unwrap_or(defaults.include_triggers),
            include_descriptions: s.include_descriptions.unwrap_or(defaults.include_descriptions),
            include_system_data: s.include_system_data.unwrap_or(defaults.include_system_data),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.schema.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Explicit backend, if configured. Validation has already checked the name.
    pub fn backend(&self) -> Option<Backend> {
        self.database
            .backend
            .as_deref()
            .and_then(|name| Backend::from_str(name).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[database]
url = "mssql://sa@localhost/erp"
backend = "sqlserver"

[schema]
include_routines = false
include_system_data = true
timeout_secs = 30

[dialect]
sqlserver_legacy_pagination = true
"#;

        let config: DbPrismConfig = toml::from_str(toml).unwrap();
        config.validate().unwrap();

        assert_eq!(config.database.url.as_deref(), Some("mssql://sa@localhost/erp"));
        assert_eq!(config.backend(), Some(Backend::SqlServer));
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.dialect.sqlserver_legacy_pagination, Some(true));

        let options = config.schema_options();
        assert!(!options.include_routines);
        assert!(options.include_system_data);
        assert!(options.include_tables && options.include_triggers);
    }

    #[test]
    fn test_parse_empty_config() {
        let config: DbPrismConfig = toml::from_str("").unwrap();
        assert!(config.database.url.is_none());
        assert_eq!(config.backend(), None);
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.schema_options(), SchemaOptions::default());
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let config: DbPrismConfig = toml::from_str("[schema]\ntimeout_secs = 0\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_validate_unknown_backend_fails() {
        let config: DbPrismConfig = toml::from_str("[database]\nbackend = \"oracle\"\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("oracle"));
    }

    #[test]
    fn test_read_config_nonexistent() {
        let result = read_config(Path::new("/nonexistent/dir"));
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_read_config_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[database]\nurl = \"sqlite://app.db\"\n",
        )
        .unwrap();

        let config = read_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.database.url.as_deref(), Some("sqlite://app.db"));
        assert!(config.config_dir.is_some());
    }

    #[test]
    fn test_read_config_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[schema\ntimeout_secs = ").unwrap();
        assert!(read_config(dir.path()).is_err());
    }

    #[test]
    fn test_read_config_runs_validation() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[schema]\ntimeout_secs = 0\n").unwrap();
        assert!(matches!(read_config(dir.path()), Err(DbPrismError::Config { .. })));
    }
}
