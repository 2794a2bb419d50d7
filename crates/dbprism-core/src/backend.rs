use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DbPrismError, Result};

/// Supported database engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    SqlServer,
    PostgreSql,
    MySql,
    Sqlite,
    Odbc,
    DuckDb,
    Spark,
}

impl Backend {
    pub const ALL: [Backend; 7] = [
        Backend::SqlServer,
        Backend::PostgreSql,
        Backend::MySql,
        Backend::Sqlite,
        Backend::Odbc,
        Backend::DuckDb,
        Backend::Spark,
    ];
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::SqlServer => write!(f, "SQL Server"),
            Backend::PostgreSql => write!(f, "PostgreSQL"),
            Backend::MySql => write!(f, "MySQL"),
            Backend::Sqlite => write!(f, "SQLite"),
            Backend::Odbc => write!(f, "ODBC"),
            Backend::DuckDb => write!(f, "DuckDB"),
            Backend::Spark => write!(f, "Spark"),
        }
    }
}

impl FromStr for Backend {
    type Err = DbPrismError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlserver" | "mssql" | "sql server" => Ok(Backend::SqlServer),
            "postgresql" | "postgres" | "pg" => Ok(Backend::PostgreSql),
            "mysql" | "mariadb" => Ok(Backend::MySql),
            "sqlite" => Ok(Backend::Sqlite),
            "odbc" => Ok(Backend::Odbc),
            "duckdb" => Ok(Backend::DuckDb),
            "spark" => Ok(Backend::Spark),
            other => Err(DbPrismError::UnsupportedDatabase {
                scheme: other.to_string(),
            }),
        }
    }
}

/// Determine the backend from a connection URL's scheme.
pub fn backend_from_url(url: &str) -> Result<Backend> {
    let scheme = url.split(':').next().unwrap_or("").to_ascii_lowercase();
    match scheme.as_str() {
        "postgres" | "postgresql" => Ok(Backend::PostgreSql),
        "mysql" | "mariadb" => Ok(Backend::MySql),
        "sqlite" | "file" => Ok(Backend::Sqlite),
        "mssql" | "sqlserver" => Ok(Backend::SqlServer),
        "odbc" => Ok(Backend::Odbc),
        "duckdb" => Ok(Backend::DuckDb),
        "spark" => Ok(Backend::Spark),
        _ => Err(DbPrismError::UnsupportedDatabase { scheme }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_url() {
        assert_eq!(
            backend_from_url("postgres://localhost/app").unwrap(),
            Backend::PostgreSql
        );
        assert_eq!(
            backend_from_url("postgresql://u:p@host/db").unwrap(),
            Backend::PostgreSql
        );
        assert_eq!(backend_from_url("mariadb://host/db").unwrap(), Backend::MySql);
        assert_eq!(backend_from_url("sqlite:dev.db").unwrap(), Backend::Sqlite);
        assert_eq!(
            backend_from_url("sqlite:///tmp/dev.db").unwrap(),
            Backend::Sqlite
        );
        assert_eq!(
            backend_from_url("mssql://sa@host/master").unwrap(),
            Backend::SqlServer
        );
        assert_eq!(backend_from_url("duckdb:analytics.duckdb").unwrap(), Backend::DuckDb);
        assert_eq!(backend_from_url("SPARK://thrift:10000").unwrap(), Backend::Spark);
    }

    #[test]
    fn test_backend_from_url_rejects_unknown_scheme() {
        let err = backend_from_url("oracle://host/db").unwrap_err();
        match err {
            DbPrismError::UnsupportedDatabase { scheme } => assert_eq!(scheme, "oracle"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_backend_from_str_aliases() {
        assert_eq!("MSSQL".parse::<Backend>().unwrap(), Backend::SqlServer);
        assert_eq!("pg".parse::<Backend>().unwrap(), Backend::PostgreSql);
        assert_eq!(" duckdb ".parse::<Backend>().unwrap(), Backend::DuckDb);
        assert!("db2".parse::<Backend>().is_err());
    }

    #[test]
    fn test_backend_serde_lowercase() {
        let json = serde_json::to_string(&Backend::PostgreSql).unwrap();
        assert_eq!(json, "\"postgresql\"");
        let back: Backend = serde_json::from_str("\"sqlserver\"").unwrap();
        assert_eq!(back, Backend::SqlServer);
    }
}
