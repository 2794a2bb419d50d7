use crate::backend::Backend;
use crate::dialect::{page_offset, SqlDialect};

/// MySQL and MariaDB: backtick quoting, `LIMIT offset, size`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl SqlDialect for MySqlDialect {
    fn backend(&self) -> Backend {
        Backend::MySql
    }

    fn separator_start(&self) -> &'static str {
        "`"
    }

    fn separator_end(&self) -> &'static str {
        "`"
    }

    fn parameter_prefix(&self) -> &'static str {
        "@"
    }

    fn paginate(&self, sql: &str, page_number: u32, page_size: u32) -> String {
        offset_comma_limit(sql, page_number, page_size)
    }
}

/// `LIMIT offset, size`, omitting the offset on the first page. Shared with ODBC.
pub(crate) fn offset_comma_limit(sql: &str, page_number: u32, page_size: u32) -> String {
    if page_number == 0 {
        format!("{} LIMIT {}", sql, page_size)
    } else {
        format!(
            "{} LIMIT {}, {}",
            sql,
            page_offset(page_number, page_size),
            page_size
        )
    }
}
