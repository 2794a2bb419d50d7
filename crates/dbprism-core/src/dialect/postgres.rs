use crate::backend::Backend;
use crate::dialect::{page_offset, SqlDialect};

/// PostgreSQL: `LIMIT size OFFSET offset`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn backend(&self) -> Backend {
        Backend::PostgreSql
    }

    fn separator_start(&self) -> &'static str {
        "\""
    }

    fn separator_end(&self) -> &'static str {
        "\""
    }

    fn parameter_prefix(&self) -> &'static str {
        "@"
    }

    fn paginate(&self, sql: &str, page_number: u32, page_size: u32) -> String {
        limit_offset(sql, page_number, page_size)
    }
}

/// `LIMIT size OFFSET offset`, omitting the offset on the first page.
/// Shared with SQLite and DuckDB.
pub(crate) fn limit_offset(sql: &str, page_number: u32, page_size: u32) -> String {
    if page_number == 0 {
        format!("{} LIMIT {}", sql, page_size)
    } else {
        format!(
            "{} LIMIT {} OFFSET {}",
            sql,
            page_size,
            page_offset(page_number, page_size)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_has_no_offset() {
        assert_eq!(
            PostgresDialect.paginate("SELECT * FROM users", 0, 50),
            "SELECT * FROM users LIMIT 50"
        );
    }

    #[test]
    fn test_later_page() {
        assert_eq!(
            PostgresDialect.paginate("SELECT * FROM users ORDER BY id", 3, 50),
            "SELECT * FROM users ORDER BY id LIMIT 50 OFFSET 150"
        );
    }

    #[test]
    fn test_large_page_does_not_overflow() {
        let sql = PostgresDialect.paginate("SELECT 1", u32::MAX, u32::MAX);
        assert!(sql.ends_with(&format!("OFFSET {}", u64::from(u32::MAX) * u64::from(u32::MAX))));
    }
}
