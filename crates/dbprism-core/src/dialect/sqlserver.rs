use crate::backend::Backend;
use crate::dialect::text::{cut, find_ignore_case, normalize_whitespace, strip_keyword, strip_order_by};
use crate::dialect::{page_offset, Parameters, SqlDialect};
use crate::provider::CatalogConnection;

/// Query returning the server's product version, e.g. `16.0.1000.6`.
pub const PRODUCT_VERSION_SQL: &str =
    "SELECT CAST(SERVERPROPERTY('ProductVersion') AS nvarchar(128)) AS ProductVersion";

/// First major version with `OFFSET ... FETCH NEXT` (SQL Server 2012).
const OFFSET_FETCH_MAJOR_VERSION: u32 = 11;

/// SQL Server dialect.
///
/// Servers older than 2012 have no `OFFSET ... FETCH`, so pagination is
/// rewritten around `ROW_NUMBER()`. The branch is fixed when the dialect is
/// built, normally once per connection through [`SqlServerDialect::detect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlServerDialect {
    legacy: bool,
}

impl SqlServerDialect {
    pub fn modern() -> Self {
        Self { legacy: false }
    }

    pub fn legacy() -> Self {
        Self { legacy: true }
    }

    pub fn is_legacy(&self) -> bool {
        self.legacy
    }

    /// Pick the pagination branch from a `ProductVersion` string.
    ///
    /// Anything without a parseable major version is treated as a legacy server.
    pub fn from_version(version: &str) -> Self {
        let major = version
            .trim()
            .split('.')
            .next()
            .and_then(|part| part.trim().parse::<u32>().ok());
        match major {
            Some(major) if major >= OFFSET_FETCH_MAJOR_VERSION => Self::modern(),
            _ => Self::legacy(),
        }
    }

    /// Ask the server for its version and pick the matching branch.
    ///
    /// A failed or empty version query falls back to the legacy rewrite,
    /// which every server version accepts.
    pub async fn detect(connection: &mut dyn CatalogConnection) -> Self {
        match connection.scalar(PRODUCT_VERSION_SQL, &Parameters::new()).await {
            Ok(value) => match value.as_text() {
                Some(version) if !version.trim().is_empty() => {
                    let dialect = Self::from_version(&version);
                    tracing::debug!(version = %version, legacy = dialect.legacy, "detected SQL Server version");
                    dialect
                }
                _ => {
                    tracing::warn!("SQL Server returned no ProductVersion; using ROW_NUMBER pagination");
                    Self::legacy()
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Can't read the SQL Server version; using ROW_NUMBER pagination");
                Self::legacy()
            }
        }
    }

    fn paginate_legacy(&self, sql: &str, page_number: u32, page_size: u32) -> String {
        let sql = normalize_whitespace(sql);
        let lower = page_offset(page_number, page_size) + 1;
        let upper = (u64::from(page_number) + 1) * u64::from(page_size);
        format!(
            "SELECT * FROM ({}, {}) AS ResultsQuery WHERE RowNumber BETWEEN {} AND {}",
            row_number_section(&sql),
            body_without_select_and_order_by(&sql),
            lower,
            upper
        )
    }
}

impl Default for SqlServerDialect {
    fn default() -> Self {
        Self::modern()
    }
}

impl SqlDialect for SqlServerDialect {
    fn backend(&self) -> Backend {
        Backend::SqlServer
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
        if self.legacy {
            self.paginate_legacy(sql, page_number, page_size)
        } else {
            format!(
                "{} OFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
                sql,
                page_offset(page_number, page_size),
                page_size
            )
        }
    }
}

fn has_distinct(sql: &str) -> bool {
    strip_keyword(sql, "SELECT DISTINCT").is_some()
}

/// `SELECT ROW_NUMBER() OVER (ORDER BY <order>) AS RowNumber`
fn row_number_section(sql: &str) -> String {
    let (_, order) = cut(sql, "ORDER BY");
    let mut order = order.trim().to_string();
    if order.is_empty() {
        order = first_field(sql);
    }
    if has_distinct(sql) {
        order = remove_table_references(&order);
    }
    format!("SELECT ROW_NUMBER() OVER (ORDER BY {}) AS RowNumber", order)
}

/// Query text with the ORDER BY removed and the leading SELECT dropped.
/// DISTINCT queries are wrapped instead so the row number is computed over
/// distinct rows.
fn body_without_select_and_order_by(sql: &str) -> String {
    let initial = strip_order_by(sql);
    if has_distinct(sql) {
        format!("* FROM ({}) AS tmp1", initial)
    } else {
        strip_keyword(initial, "SELECT")
            .unwrap_or(initial)
            .trim()
            .to_string()
    }
}

/// Alias (or expression) of the first select-list item.
fn first_field(sql: &str) -> String {
    let (first, _) = cut(sql, ",");
    let (first, _) = cut(first, " FROM ");
    let field = strip_keyword(first, "SELECT DISTINCT")
        .or_else(|| strip_keyword(first, "SELECT"))
        .unwrap_or(first);
    alias(field).trim().to_string()
}

fn alias(field: &str) -> &str {
    match find_ignore_case(field, " AS ") {
        Some(index) if index + 4 < field.len() => &field[index + 4..],
        _ => field,
    }
}

/// `t.Name DESC, dbo.Id` becomes `Name DESC, dbo.Id`.
fn remove_table_references(order: &str) -> String {
    order
        .trim()
        .split(',')
        .map(|item| {
            let item = item.trim();
            let (table, column) = cut(item, ".");
            if column.trim().is_empty() || table.eq_ignore_ascii_case("dbo") {
                item
            } else {
                column
            }
        })
        .filter(|item| !item.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modern_offset_fetch() {
        let sql = SqlServerDialect::modern().paginate("SELECT * FROM T ORDER BY Id", 2, 10);
        assert_eq!(
            sql,
            "SELECT * FROM T ORDER BY Id OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"
        );
    }

    #[test]
    fn test_legacy_row_number_with_order_by() {
        let sql = SqlServerDialect::legacy().paginate("SELECT Id, Name FROM Users ORDER BY Name", 2, 10);
        assert_eq!(
            sql,
            "SELECT * FROM (SELECT ROW_NUMBER() OVER (ORDER BY Name) AS RowNumber, Id, Name FROM Users) \
             AS ResultsQuery WHERE RowNumber BETWEEN 21 AND 30"
        );
    }

    #[test]
    fn test_legacy_first_page_bounds() {
        let sql = SqlServerDialect::legacy().paginate("SELECT Id FROM Users ORDER BY Id", 0, 25);
        assert!(sql.ends_with("WHERE RowNumber BETWEEN 1 AND 25"));
    }

    #[test]
    fn test_legacy_without_order_by_uses_first_field_alias() {
        let sql = SqlServerDialect::legacy().paginate("SELECT u.Id AS UserId, u.Name FROM Users u", 0, 5);
        assert!(sql.contains("OVER (ORDER BY UserId)"), "{sql}");
        assert!(sql.contains("AS RowNumber, u.Id AS UserId, u.Name FROM Users u)"));
    }

    #[test]
    fn test_legacy_single_column_without_order_by() {
        let sql = SqlServerDialect::legacy().paginate("SELECT Id FROM Users", 1, 5);
        assert!(sql.contains("OVER (ORDER BY Id)"), "{sql}");
        assert!(sql.ends_with("BETWEEN 6 AND 10"));
    }

    #[test]
    fn test_legacy_distinct_strips_table_references() {
        let sql = SqlServerDialect::legacy().paginate(
            "SELECT DISTINCT c.Name, dbo.Code FROM Customers c\n ORDER BY c.Name DESC, dbo.Code",
            1,
            10,
        );
        assert!(sql.contains("OVER (ORDER BY Name DESC, dbo.Code) AS RowNumber"), "{sql}");
        assert!(sql.contains(
            "* FROM (SELECT DISTINCT c.Name, dbo.Code FROM Customers c) AS tmp1"
        ));
        assert!(sql.ends_with("BETWEEN 11 AND 20"));
    }

    #[test]
    fn test_from_version() {
        assert!(!SqlServerDialect::from_version("16.0.1000.6").is_legacy());
        assert!(!SqlServerDialect::from_version("11.0.2100.60").is_legacy());
        assert!(SqlServerDialect::from_version("10.50.1600.1").is_legacy());
        assert!(SqlServerDialect::from_version("").is_legacy());
        assert!(SqlServerDialect::from_version("unknown").is_legacy());
    }
}
