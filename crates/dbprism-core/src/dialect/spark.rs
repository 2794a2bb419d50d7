use crate::backend::Backend;
use crate::dialect::SqlDialect;

/// Spark SQL: backtick quoting, `$name` parameters.
///
/// Spark's `LIMIT` takes no offset, so only the page size survives.
#[derive(Debug, Clone, Copy, Default)]
pub struct SparkDialect;

impl SqlDialect for SparkDialect {
    fn backend(&self) -> Backend {
        Backend::Spark
    }

    fn separator_start(&self) -> &'static str {
        "`"
    }

    fn separator_end(&self) -> &'static str {
        "`"
    }

    fn parameter_prefix(&self) -> &'static str {
        "$"
    }

    fn paginate(&self, sql: &str, _page_number: u32, page_size: u32) -> String {
        format!("{} LIMIT {}", sql, page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_number_is_ignored() {
        assert_eq!(
            SparkDialect.paginate("SELECT * FROM lake.events", 0, 25),
            SparkDialect.paginate("SELECT * FROM lake.events", 9, 25)
        );
    }
}
