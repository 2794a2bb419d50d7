use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use sqlx::mysql::{MySqlConnection, MySqlRow};
use sqlx::postgres::{PgConnection, PgRow};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::{Column, Connection, Row, ValueRef};

use crate::backend::{backend_from_url, Backend};
use crate::dialect::params::{rewrite_placeholders, ParameterDirection, PlaceholderStyle};
use crate::dialect::{dialect_for, ParameterValue, Parameters};
use crate::error::{DbPrismError, Result};
use crate::provider::{CatalogConnection, CatalogRow, Provider, RowStream, RowValue};

/// [`Provider`] over a single sqlx connection per `open()`.
///
/// Covers the engines sqlx ships drivers for: PostgreSQL, MySQL/MariaDB and SQLite.
#[derive(Debug, Clone)]
pub struct SqlxProvider {
    backend: Backend,
    url: String,
}

impl SqlxProvider {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let backend = backend_from_url(&url)?;
        match backend {
            Backend::PostgreSql | Backend::MySql | Backend::Sqlite => Ok(Self { backend, url }),
            other => Err(DbPrismError::Unsupported {
                backend: other,
                operation: "opening a sqlx connection",
            }),
        }
    }
}

#[async_trait]
impl Provider for SqlxProvider {
    fn backend(&self) -> Backend {
        self.backend
    }

    fn connection_string(&self) -> &str {
        &self.url
    }

    async fn open(&self) -> Result<Box<dyn CatalogConnection>> {
        let connect_error = |e: sqlx::Error| {
            DbPrismError::connection(self.backend, &self.url, "failed to open catalog connection", e)
        };
        let inner = match self.backend {
            Backend::PostgreSql => DriverConnection::Postgres(
                PgConnection::connect(&self.url).await.map_err(connect_error)?,
            ),
            Backend::MySql => DriverConnection::MySql(
                MySqlConnection::connect(&self.url).await.map_err(connect_error)?,
            ),
            Backend::Sqlite => DriverConnection::Sqlite(
                SqliteConnection::connect(&self.url).await.map_err(connect_error)?,
            ),
            other => {
                return Err(DbPrismError::Unsupported {
                    backend: other,
                    operation: "opening a sqlx connection",
                })
            }
        };
        tracing::debug!(backend = %self.backend, "opened catalog connection");
        Ok(Box::new(SqlxConnection {
            backend: self.backend,
            inner: Some(inner),
        }))
    }
}

enum DriverConnection {
    Postgres(PgConnection),
    MySql(MySqlConnection),
    Sqlite(SqliteConnection),
}

/// A connection opened by [`SqlxProvider`].
pub struct SqlxConnection {
    backend: Backend,
    inner: Option<DriverConnection>,
}

fn query_error(e: sqlx::Error) -> DbPrismError {
    DbPrismError::query("catalog query failed", e)
}

#[async_trait]
impl CatalogConnection for SqlxConnection {
    fn backend(&self) -> Backend {
        self.backend
    }

    fn fetch<'a>(&'a mut self, sql: &'a str, parameters: &'a Parameters) -> RowStream<'a> {
        let backend = self.backend;
        let Some(inner) = self.inner.as_mut() else {
            return stream::once(async move {
                Err(DbPrismError::Other(format!("{} connection is already closed", backend)))
            })
            .boxed();
        };

        // Bound queries rewrite the SQL into an owned string, so their rows are
        // collected before being handed out.
        if !parameters.is_empty() {
            return stream::once(fetch_bound(inner, backend, sql, parameters))
                .map_ok(|rows| stream::iter(rows.into_iter().map(Ok::<CatalogRow, DbPrismError>)))
                .try_flatten()
                .boxed();
        }

        match inner {
            DriverConnection::Postgres(conn) => sqlx::query(sql)
                .fetch(conn)
                .map(|row| row.map(|row| decode_pg_row(&row)).map_err(query_error))
                .boxed(),
            DriverConnection::MySql(conn) => sqlx::query(sql)
                .fetch(conn)
                .map(|row| row.map(|row| decode_mysql_row(&row)).map_err(query_error))
                .boxed(),
            DriverConnection::Sqlite(conn) => sqlx::query(sql)
                .fetch(conn)
                .map(|row| row.map(|row| decode_sqlite_row(&row)).map_err(query_error))
                .boxed(),
        }
    }

    async fn close(&mut self) -> Result<()> {
        let Some(inner) = self.inner.take() else {
            return Ok(());
        };
        let closed = match inner {
            DriverConnection::Postgres(conn) => conn.close().await,
            DriverConnection::MySql(conn) => conn.close().await,
            DriverConnection::Sqlite(conn) => conn.close().await,
        };
        closed.map_err(|e| DbPrismError::query("closing catalog connection", e))
    }
}

macro_rules! bind_value {
    ($query:expr, $value:expr) => {
        match $value {
            ParameterValue::Null => $query.bind(None::<String>),
            ParameterValue::Bool(v) => $query.bind(*v),
            ParameterValue::Int(v) => $query.bind(*v),
            ParameterValue::Float(v) => $query.bind(*v),
            ParameterValue::Text(v) => $query.bind(v.clone()),
            ParameterValue::Date(v) => $query.bind(*v),
            ParameterValue::DateTime(v) => $query.bind(*v),
            ParameterValue::Bytes(v) => $query.bind(v.clone()),
        }
    };
}

/// Bind `parameters` positionally and run the query.
///
/// Named tokens in the SQL are rewritten with the backend's prefix. SQL that
/// already uses positional placeholders binds the parameters in their given
/// order.
async fn fetch_bound(
    inner: &mut DriverConnection,
    backend: Backend,
    sql: &str,
    parameters: &Parameters,
) -> Result<Vec<CatalogRow>> {
    for parameter in parameters {
        if parameter.direction() != ParameterDirection::Input {
            return Err(DbPrismError::UnsupportedParameter {
                name: parameter.name().to_string(),
                reason: format!(
                    "{:?} parameters cannot be bound on {} catalog connections",
                    parameter.direction(),
                    backend
                ),
            });
        }
    }

    let style = match backend {
        Backend::PostgreSql => PlaceholderStyle::Numbered,
        _ => PlaceholderStyle::QuestionMark,
    };
    let prefix = dialect_for(backend).parameter_prefix();
    let (sql, resolved) = rewrite_placeholders(sql, parameters, prefix, style);
    let ordered = if resolved.is_empty() {
        parameters.clone()
    } else {
        resolved
    };

    match inner {
        DriverConnection::Postgres(conn) => {
            let mut query = sqlx::query(&sql);
            for parameter in &ordered {
                query = bind_value!(query, parameter.value());
            }
            let rows = query.fetch_all(&mut *conn).await.map_err(query_error)?;
            Ok(rows.iter().map(decode_pg_row).collect())
        }
        DriverConnection::MySql(conn) => {
            let mut query = sqlx::query(&sql);
            for parameter in &ordered {
                query = bind_value!(query, parameter.value());
            }
            let rows = query.fetch_all(&mut *conn).await.map_err(query_error)?;
            Ok(rows.iter().map(decode_mysql_row).collect())
        }
        DriverConnection::Sqlite(conn) => {
            let mut query = sqlx::query(&sql);
            for parameter in &ordered {
                query = bind_value!(query, parameter.value());
            }
            let rows = query.fetch_all(&mut *conn).await.map_err(query_error)?;
            Ok(rows.iter().map(decode_sqlite_row).collect())
        }
    }
}

fn raw_is_null<'r, V: ValueRef<'r>>(raw: std::result::Result<V, sqlx::Error>) -> bool {
    raw.map(|value| value.is_null()).unwrap_or(true)
}

fn midnight(date: NaiveDate) -> RowValue {
    date.and_hms_opt(0, 0, 0)
        .map_or(RowValue::Null, RowValue::Timestamp)
}

fn saturating_int(value: u64) -> RowValue {
    RowValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
}

/// Try each Rust type in order until one decodes; the first hit wins.
macro_rules! probe {
    ($row:expr, $index:expr, $( $ty:ty => $wrap:expr ),+ $(,)?) => {
        $(
            if let Ok(value) = $row.try_get::<$ty, _>($index) {
                return $wrap(value);
            }
        )+
    };
}

fn decode_pg_value(row: &PgRow, index: usize) -> RowValue {
    if raw_is_null(row.try_get_raw(index)) {
        return RowValue::Null;
    }
    probe!(row, index,
        i64 => RowValue::Int,
        i32 => |v: i32| RowValue::Int(v.into()),
        i16 => |v: i16| RowValue::Int(v.into()),
        i8 => |v: i8| RowValue::Int(v.into()),
        f64 => RowValue::Float,
        f32 => |v: f32| RowValue::Float(v.into()),
        bool => RowValue::Bool,
        String => RowValue::Text,
        NaiveDateTime => RowValue::Timestamp,
        DateTime<Utc> => |v: DateTime<Utc>| RowValue::Timestamp(v.naive_utc()),
        NaiveDate => midnight,
        Vec<u8> => RowValue::Bytes,
    );
    RowValue::Null
}

fn decode_mysql_value(row: &MySqlRow, index: usize) -> RowValue {
    if raw_is_null(row.try_get_raw(index)) {
        return RowValue::Null;
    }
    probe!(row, index,
        i64 => RowValue::Int,
        i32 => |v: i32| RowValue::Int(v.into()),
        i16 => |v: i16| RowValue::Int(v.into()),
        i8 => |v: i8| RowValue::Int(v.into()),
        u64 => saturating_int,
        u32 => |v: u32| RowValue::Int(v.into()),
        u16 => |v: u16| RowValue::Int(v.into()),
        u8 => |v: u8| RowValue::Int(v.into()),
        f64 => RowValue::Float,
        f32 => |v: f32| RowValue::Float(v.into()),
        bool => RowValue::Bool,
        String => RowValue::Text,
        NaiveDateTime => RowValue::Timestamp,
        DateTime<Utc> => |v: DateTime<Utc>| RowValue::Timestamp(v.naive_utc()),
        NaiveDate => midnight,
        Vec<u8> => RowValue::Bytes,
    );
    RowValue::Null
}

fn decode_sqlite_value(row: &SqliteRow, index: usize) -> RowValue {
    if raw_is_null(row.try_get_raw(index)) {
        return RowValue::Null;
    }
    probe!(row, index,
        i64 => RowValue::Int,
        f64 => RowValue::Float,
        bool => RowValue::Bool,
        String => RowValue::Text,
        NaiveDateTime => RowValue::Timestamp,
        Vec<u8> => RowValue::Bytes,
    );
    RowValue::Null
}

macro_rules! decode_row {
    ($name:ident, $row:ty, $value:ident) => {
        fn $name(row: &$row) -> CatalogRow {
            let mut decoded = CatalogRow::with_capacity(row.len());
            for (index, column) in row.columns().iter().enumerate() {
                decoded.push(column.name(), $value(row, index));
            }
            decoded
        }
    };
}

decode_row!(decode_pg_row, PgRow, decode_pg_value);
decode_row!(decode_mysql_row, MySqlRow, decode_mysql_value);
decode_row!(decode_sqlite_row, SqliteRow, decode_sqlite_value);
