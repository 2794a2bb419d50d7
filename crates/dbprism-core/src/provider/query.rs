//! Dialect-aware helpers over an open connection.

use crate::dialect::{Parameters, SqlDialect};
use crate::error::Result;
use crate::provider::{CatalogConnection, CatalogRow};

/// Fetch one page of a query. `page` is one-based, as shown to users.
pub async fn fetch_page(
    connection: &mut dyn CatalogConnection,
    dialect: &dyn SqlDialect,
    sql: &str,
    parameters: &Parameters,
    page: u32,
    page_size: u32,
) -> Result<Vec<CatalogRow>> {
    let paged = dialect.paginate(sql, page.saturating_sub(1), page_size);
    tracing::debug!(backend = %dialect.backend(), sql = %paged, "fetching page");
    connection.fetch_all(&paged, parameters).await
}

/// Number of rows a query returns. `None` when the server answers with
/// something that is not a number.
pub async fn count_rows(
    connection: &mut dyn CatalogConnection,
    dialect: &dyn SqlDialect,
    sql: &str,
    parameters: &Parameters,
) -> Result<Option<i64>> {
    let counted = dialect.count(sql);
    let value = connection.scalar(&counted, parameters).await?;
    Ok(value.as_i64())
}
