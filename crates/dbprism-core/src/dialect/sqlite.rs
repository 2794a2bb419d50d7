use crate::backend::Backend;
use crate::dialect::postgres::limit_offset;
use crate::dialect::SqlDialect;

/// SQLite: bracket-quoted identifiers, `LIMIT size OFFSET offset`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqlDialect for SqliteDialect {
    fn backend(&self) -> Backend {
        Backend::Sqlite
    }

    fn separator_start(&self) -> &'static str {
        "["
    }

    fn separator_end(&self) -> &'static str {
        "]"
    }

    fn parameter_prefix(&self) -> &'static str {
        "@"
    }

    fn paginate(&self, sql: &str, page_number: u32, page_size: u32) -> String {
        limit_offset(sql, page_number, page_size)
    }
}
