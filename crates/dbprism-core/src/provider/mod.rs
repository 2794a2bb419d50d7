//! # Provider Contract
//!
//! The core never talks to a driver directly. It asks a [`Provider`] for a
//! fresh [`CatalogConnection`] and reads catalog rows through it as a stream
//! of loosely typed [`CatalogRow`]s. `SqlxProvider` implements the contract
//! for PostgreSQL, MySQL and SQLite; other engines plug in by implementing
//! the two traits.

pub mod query;
pub mod row;
pub mod sqlx_provider;

pub use query::{count_rows, fetch_page};
pub use row::{CatalogRow, RowValue};
pub use sqlx_provider::SqlxProvider;

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};

use crate::backend::Backend;
use crate::dialect::Parameters;
use crate::error::{DbPrismError, Result};

/// Streamed result rows of one query.
pub type RowStream<'a> = BoxStream<'a, Result<CatalogRow>>;

/// ODBC-style reflection collections (`GetSchema("Tables")`, `GetSchema("Columns")`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataKind {
    Tables,
    Columns,
}

/// An open connection used for read-only catalog queries.
#[async_trait]
pub trait CatalogConnection: Send {
    fn backend(&self) -> Backend;

    /// Run a query and stream its rows. Errors surface as stream items.
    fn fetch<'a>(&'a mut self, sql: &'a str, parameters: &'a Parameters) -> RowStream<'a>;

    /// Run a query and collect every row.
    async fn fetch_all(&mut self, sql: &str, parameters: &Parameters) -> Result<Vec<CatalogRow>> {
        self.fetch(sql, parameters).try_collect().await
    }

    /// First column of the first row, `Null` when the query returns nothing.
    async fn scalar(&mut self, sql: &str, parameters: &Parameters) -> Result<RowValue> {
        let mut rows = self.fetch(sql, parameters);
        match rows.next().await {
            Some(row) => Ok(row?.into_first().unwrap_or(RowValue::Null)),
            None => Ok(RowValue::Null),
        }
    }

    /// Driver-level schema reflection, for drivers without queryable catalogs.
    async fn metadata(&mut self, _kind: MetadataKind) -> Result<Vec<CatalogRow>> {
        Err(DbPrismError::Unsupported {
            backend: self.backend(),
            operation: "schema metadata reflection",
        })
    }

    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Source of catalog connections.
#[async_trait]
pub trait Provider: Send + Sync {
    fn backend(&self) -> Backend;

    /// The connection string new connections are opened with.
    fn connection_string(&self) -> &str;

    /// Open a new connection. Never hands out a connection already in use.
    async fn open(&self) -> Result<Box<dyn CatalogConnection>>;
}
