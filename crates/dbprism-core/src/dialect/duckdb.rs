use crate::backend::Backend;
use crate::dialect::postgres::limit_offset;
use crate::dialect::SqlDialect;

/// DuckDB: PostgreSQL-style quoting and pagination, `$name` parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuckDbDialect;

impl SqlDialect for DuckDbDialect {
    fn backend(&self) -> Backend {
        Backend::DuckDb
    }

    fn separator_start(&self) -> &'static str {
        "\""
    }

    fn separator_end(&self) -> &'static str {
        "\""
    }

    fn parameter_prefix(&self) -> &'static str {
        "$"
    }

    fn paginate(&self, sql: &str, page_number: u32, page_size: u32) -> String {
        limit_offset(sql, page_number, page_size)
    }
}
