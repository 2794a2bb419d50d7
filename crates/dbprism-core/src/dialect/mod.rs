//! # SQL Dialects
//!
//! Pure text transformations that turn generic SQL into one backend's
//! concrete syntax: pagination, count wrapping, identifier quoting and
//! parameter placeholder rewriting. Nothing here parses SQL. Malformed input
//! comes back unchanged or as SQL the server itself will reject.

pub mod duckdb;
pub mod mysql;
pub mod odbc;
pub mod params;
pub mod postgres;
pub mod spark;
pub mod sqlite;
pub mod sqlserver;
pub mod text;

pub use params::{Parameter, ParameterDirection, ParameterValue, Parameters, PlaceholderStyle};
pub use sqlserver::SqlServerDialect;

use crate::backend::Backend;

/// Backend-specific SQL rewriting.
///
/// Page numbers are zero-based at this layer; callers showing one-based pages
/// subtract one first.
pub trait SqlDialect: Send + Sync {
    fn backend(&self) -> Backend;

    /// Opening identifier delimiter.
    fn separator_start(&self) -> &'static str;

    /// Closing identifier delimiter.
    fn separator_end(&self) -> &'static str;

    /// Character that introduces a named parameter in SQL text.
    fn parameter_prefix(&self) -> &'static str;

    /// SQL returning only rows of page `page_number` (zero-based) of `page_size` rows.
    fn paginate(&self, sql: &str, page_number: u32, page_size: u32) -> String;

    /// Wrap a query so it returns its row count.
    fn count(&self, sql: &str) -> String {
        format!(
            "SELECT COUNT(*) FROM ({}) AS tmpQuery",
            text::strip_order_by(&text::normalize_whitespace(sql))
        )
    }

    fn format_name(&self, name: &str) -> String {
        format!("{}{}{}", self.separator_start(), name, self.separator_end())
    }

    /// `table.name` with both parts quoted; a blank table yields the one-part form.
    fn format_qualified_name(&self, table: &str, name: &str) -> String {
        if table.trim().is_empty() {
            self.format_name(name)
        } else {
            format!("{}.{}", self.format_name(table), self.format_name(name))
        }
    }

    /// Rewrite named parameters to `?` placeholders for drivers that bind by position.
    fn normalize_sql(&self, sql: &str, parameters: &Parameters) -> (String, Parameters) {
        params::rewrite_placeholders(
            sql,
            parameters,
            self.parameter_prefix(),
            PlaceholderStyle::QuestionMark,
        )
    }

    /// Substitute parameter literals directly into the SQL text.
    fn inline_parameters(&self, sql: &str, parameters: &Parameters) -> String {
        params::inline_literals(sql, parameters, self.parameter_prefix())
    }
}

/// Offset of the first row of a zero-based page.
pub(crate) fn page_offset(page_number: u32, page_size: u32) -> u64 {
    u64::from(page_number) * u64::from(page_size)
}

/// Default dialect for a backend. SQL Server assumes a 2012+ server; use
/// [`SqlServerDialect::detect`] when the server version is unknown.
pub fn dialect_for(backend: Backend) -> Box<dyn SqlDialect> {
    match backend {
        Backend::SqlServer => Box::new(SqlServerDialect::modern()),
        Backend::PostgreSql => Box::new(postgres::PostgresDialect),
        Backend::MySql => Box::new(mysql::MySqlDialect),
        Backend::Sqlite => Box::new(sqlite::SqliteDialect),
        Backend::Odbc => Box::new(odbc::OdbcDialect),
        Backend::DuckDb => Box::new(duckdb::DuckDbDialect),
        Backend::Spark => Box::new(spark::SparkDialect),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDERED: &str = "SELECT * FROM T ORDER BY Id";

    #[test]
    fn test_pagination_per_backend() {
        let cases = [
            (Backend::SqlServer, "OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"),
            (Backend::PostgreSql, "LIMIT 10 OFFSET 20"),
            (Backend::Sqlite, "LIMIT 10 OFFSET 20"),
            (Backend::DuckDb, "LIMIT 10 OFFSET 20"),
            (Backend::MySql, "LIMIT 20, 10"),
            (Backend::Odbc, "LIMIT 20, 10"),
            (Backend::Spark, "LIMIT 10"),
        ];
        for (backend, expected) in cases {
            let sql = dialect_for(backend).paginate(ORDERED, 2, 10);
            assert!(sql.contains(expected), "{backend}: {sql}");
        }
    }

    #[test]
    fn test_spark_drops_offset() {
        let sql = dialect_for(Backend::Spark).paginate(ORDERED, 2, 10);
        assert!(!sql.contains("OFFSET"));
        assert!(!sql.contains("20"));
        assert!(!sql.contains(','));
    }

    #[test]
    fn test_count_strips_order_by_for_every_backend() {
        for backend in Backend::ALL {
            let sql = dialect_for(backend).count("SELECT a FROM T\n  order by a");
            assert_eq!(sql, "SELECT COUNT(*) FROM (SELECT a FROM T) AS tmpQuery");
        }
    }

    #[test]
    fn test_count_keeps_query_without_order_by() {
        let sql = dialect_for(Backend::PostgreSql).count("SELECT a FROM T WHERE a > 1");
        assert_eq!(sql, "SELECT COUNT(*) FROM (SELECT a FROM T WHERE a > 1) AS tmpQuery");
    }

    #[test]
    fn test_identifier_quoting() {
        let cases = [
            (Backend::SqlServer, "[dbo].[Users]"),
            (Backend::PostgreSql, "\"dbo\".\"Users\""),
            (Backend::MySql, "`dbo`.`Users`"),
            (Backend::Sqlite, "[dbo].[Users]"),
            (Backend::DuckDb, "\"dbo\".\"Users\""),
            (Backend::Spark, "`dbo`.`Users`"),
        ];
        for (backend, expected) in cases {
            assert_eq!(
                dialect_for(backend).format_qualified_name("dbo", "Users"),
                expected,
                "{backend}"
            );
        }
    }

    #[test]
    fn test_qualified_name_with_blank_table() {
        let dialect = dialect_for(Backend::PostgreSql);
        assert_eq!(dialect.format_qualified_name("  ", "id"), "\"id\"");
    }

    #[test]
    fn test_normalize_sql_uses_backend_prefix() {
        let mut params = Parameters::new();
        params.add("id", 7);
        let (sql, resolved) =
            dialect_for(Backend::DuckDb).normalize_sql("SELECT * FROM t WHERE id = $id", &params);
        assert_eq!(sql, "SELECT * FROM t WHERE id = ?");
        assert_eq!(resolved.iter().next().unwrap().value(), &ParameterValue::Int(7));
    }
}
