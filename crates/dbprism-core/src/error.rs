//! # Error Types
//!
//! Defines `DbPrismError`, the unified error enum for every failure that can
//! leave the core. Schema introspection only lets connection-level failures
//! and a failing main catalog query escape; optional enrichment queries are
//! absorbed by the reader and show up as missing detail in the snapshot.

use thiserror::Error;

use crate::backend::Backend;

/// Boxed driver error carried as the source of connection and query failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// All errors that can occur in dbprism operations.
#[derive(Error, Debug)]
pub enum DbPrismError {
    #[error("Connection to {backend} failed: {message}\n  Connection string: {connection_hint}\n  Cause: {source}")]
    Connection {
        backend: Backend,
        message: String,
        connection_hint: String,
        #[source]
        source: BoxError,
    },

    #[error("Schema introspection on {backend} failed on query '{query}': {source}")]
    Introspection {
        backend: Backend,
        query: String,
        #[source]
        source: Box<DbPrismError>,
    },

    #[error("Catalog query '{query}' on {backend} exceeded the {timeout_secs}s timeout")]
    Timeout {
        backend: Backend,
        query: String,
        timeout_secs: u64,
    },

    #[error("Query failed: {message}: {source}")]
    Query {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("Unsupported parameter '{name}': {reason}")]
    UnsupportedParameter { name: String, reason: String },

    #[error("Unsupported database scheme '{scheme}'. Supported: postgres://, mysql://, sqlite:, mssql://, odbc:, duckdb:, spark://")]
    UnsupportedDatabase { scheme: String },

    #[error("{operation} is not supported by the {backend} provider")]
    Unsupported {
        backend: Backend,
        operation: &'static str,
    },

    #[error("No database URL provided. dbprism looks for a connection in this order:\n  1. --db flag\n  2. DATABASE_URL environment variable\n  3. .env file with DATABASE_URL\n  4. dbprism.toml [database] section\n\nExample: dbprism introspect --db postgres://localhost/myapp")]
    NoDatabaseUrl,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl DbPrismError {
    /// Build a `Connection` error with the password stripped from the hint.
    pub fn connection(
        backend: Backend,
        connection_string: &str,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        DbPrismError::Connection {
            backend,
            message: message.into(),
            connection_hint: sanitize_connection_string(connection_string),
            source: source.into(),
        }
    }

    /// Build a `Query` error from any driver error.
    pub fn query(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        DbPrismError::Query {
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            DbPrismError::Timeout { .. } => true,
            DbPrismError::Introspection { source, .. } => source.is_timeout(),
            _ => false,
        }
    }
}

/// Mask the password in a connection string before it lands in an error or log line.
///
/// URL-shaped strings go through `url`; `key=value;` strings (ODBC and
/// SQL Server style) have their `password`/`pwd` values replaced.
pub fn sanitize_connection_string(connection_string: &str) -> String {
    if let Ok(mut parsed) = url::Url::parse(connection_string) {
        if parsed.password().is_some() {
            let _ = parsed.set_password(Some("****"));
        }
        return parsed.to_string();
    }

    if connection_string.contains('=') {
        return connection_string
            .split(';')
            .map(|pair| match pair.split_once('=') {
                Some((key, _))
                    if key.trim().eq_ignore_ascii_case("password")
                        || key.trim().eq_ignore_ascii_case("pwd") =>
                {
                    format!("{}=****", key)
                }
                _ => pair.to_string(),
            })
            .collect::<Vec<_>>()
            .join(";");
    }

    connection_string.to_string()
}

pub type Result<T> = std::result::Result<T, DbPrismError>;
