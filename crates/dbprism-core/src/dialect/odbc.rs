use crate::backend::Backend;
use crate::dialect::mysql::offset_comma_limit;
use crate::dialect::SqlDialect;

/// Generic ODBC: bracket quoting, positional `?` parameters after normalization.
#[derive(Debug, Clone, Copy, Default)]
pub struct OdbcDialect;

impl SqlDialect for OdbcDialect {
    fn backend(&self) -> Backend {
        Backend::Odbc
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
        offset_comma_limit(sql, page_number, page_size)
    }
}
