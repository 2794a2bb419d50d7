//! Native column type tokens to [`FieldType`].

use crate::backend::Backend;
use crate::schema::types::FieldType;

use FieldType::{Binary, Boolean, Date, Decimal, Integer, String};

/// Fixed lookup table of one backend's type names.
#[derive(Debug)]
pub struct TypeMap {
    backend: Backend,
    entries: &'static [(&'static str, FieldType)],
}

impl TypeMap {
    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn entries(&self) -> &'static [(&'static str, FieldType)] {
        self.entries
    }

    /// Map a token as the catalog reports it. Never fails; unmatched tokens are `Unknown`.
    pub fn map(&self, token: &str) -> FieldType {
        let normalized = normalize_token(token);
        self.entries
            .iter()
            .find(|(name, _)| *name == normalized)
            .map(|(_, field_type)| *field_type)
            .unwrap_or(FieldType::Unknown)
    }
}

/// Uppercase, drop a `(size, precision)` suffix and trim: `varchar(200) ` → `VARCHAR`.
pub fn normalize_token(token: &str) -> std::string::String {
    let upper = token.trim().to_uppercase();
    match upper.find('(') {
        Some(index) => upper[..index].trim().to_string(),
        None => upper,
    }
}

static SQL_SERVER: TypeMap = TypeMap {
    backend: Backend::SqlServer,
    entries: &[
        ("INTEGER", Integer),
        ("INT", Integer),
        ("SMALLINT", Integer),
        ("BIGINT", Integer),
        ("TINYINT", Integer),
        ("REAL", Decimal),
        ("FLOAT", Decimal),
        ("MONEY", Decimal),
        ("SMALLMONEY", Decimal),
        ("DECIMAL", Decimal),
        ("NUMERIC", Decimal),
        ("DATETIME", Date),
        ("DATE", Date),
        ("DATETIME2", Date),
        ("SMALLDATETIME", Date),
        ("DATETIMEOFFSET", Date),
        ("TIME", Date),
        ("BINARY", Binary),
        ("VARBINARY", Binary),
        ("IMAGE", Binary),
        ("BIT", Boolean),
        ("CHAR", String),
        ("NCHAR", String),
        ("VARCHAR", String),
        ("NVARCHAR", String),
        ("TEXT", String),
        ("NTEXT", String),
        ("UNIQUEIDENTIFIER", String),
    ],
};

static POSTGRES: TypeMap = TypeMap {
    backend: Backend::PostgreSql,
    entries: &[
        ("INT2", Integer),
        ("_INT2", Integer),
        ("INT4", Integer),
        ("_INT4", Integer),
        ("INT8", Integer),
        ("_INT8", Integer),
        ("FLOAT4", Decimal),
        ("_FLOAT4", Decimal),
        ("FLOAT8", Decimal),
        ("_FLOAT8", Decimal),
        ("NUMERIC", Decimal),
        ("_NUMERIC", Decimal),
        ("MONEY", Decimal),
        ("CHAR", String),
        ("_CHAR", String),
        ("BPCHAR", String),
        ("TEXT", String),
        ("_TEXT", String),
        ("VARCHAR", String),
        ("_VARCHAR", String),
        ("NAME", String),
        ("UUID", String),
        ("DATE", Date),
        ("TIMESTAMP", Date),
        ("TIMESTAMPTZ", Date),
        ("TIME", Date),
        ("TIMETZ", Date),
        ("BOOL", Boolean),
        ("BYTEA", Binary),
    ],
};

static MYSQL: TypeMap = TypeMap {
    backend: Backend::MySql,
    entries: &[
        ("INT", Integer),
        ("BIGINT", Integer),
        ("TINYINT", Integer),
        ("SMALLINT", Integer),
        ("MEDIUMINT", Integer),
        ("FLOAT", Decimal),
        ("DECIMAL", Decimal),
        ("DOUBLE", Decimal),
        ("CHAR", String),
        ("TEXT", String),
        ("VARCHAR", String),
        ("LONGTEXT", String),
        ("MEDIUMTEXT", String),
        ("DATETIME", Date),
        ("DATE", Date),
        ("TIMESTAMP", Date),
        ("TIME", Date),
        ("BOOL", Boolean),
        ("BOOLEAN", Boolean),
        ("BLOB", Binary),
        ("VARBINARY", Binary),
    ],
};

static SQLITE: TypeMap = TypeMap {
    backend: Backend::Sqlite,
    entries: &[
        ("INTEGER", Integer),
        ("INT", Integer),
        ("SMALLINT", Integer),
        ("BIGINT", Integer),
        ("REAL", Decimal),
        ("FLOAT", Decimal),
        ("DOUBLE", Decimal),
        ("MONEY", Decimal),
        ("NUMERIC", Decimal),
        ("DECIMAL", Decimal),
        ("TEXT", String),
        ("STRING", String),
        ("VARCHAR", String),
        ("NVARCHAR", String),
        ("CHAR", String),
        ("NCHAR", String),
        ("NTEXT", String),
        ("CLOB", String),
        ("DATETIME", Date),
        ("DATE", Date),
        ("TIMESTAMP", Date),
        ("IMAGE", Binary),
        ("BLOB", Binary),
        ("BIT", Boolean),
        ("BOOLEAN", Boolean),
    ],
};

static DUCKDB: TypeMap = TypeMap {
    backend: Backend::DuckDb,
    entries: &[
        ("INT2", Integer),
        ("_INT2", Integer),
        ("INT4", Integer),
        ("_INT4", Integer),
        ("INT8", Integer),
        ("_INT8", Integer),
        ("INTEGER", Integer),
        ("BIGINT", Integer),
        ("SMALLINT", Integer),
        ("TINYINT", Integer),
        ("HUGEINT", Integer),
        ("FLOAT4", Decimal),
        ("_FLOAT4", Decimal),
        ("FLOAT8", Decimal),
        ("_FLOAT8", Decimal),
        ("DECIMAL", Decimal),
        ("DOUBLE", Decimal),
        ("FLOAT", Decimal),
        ("CHAR", String),
        ("_CHAR", String),
        ("TEXT", String),
        ("_TEXT", String),
        ("VARCHAR", String),
        ("UUID", String),
        ("DATE", Date),
        ("TIMESTAMP", Date),
        ("TIME", Date),
        ("BOOL", Boolean),
        ("BOOLEAN", Boolean),
        ("BLOB", Binary),
    ],
};

static ODBC: TypeMap = TypeMap {
    backend: Backend::Odbc,
    entries: &[
        ("BIT", Boolean),
        ("DECIMAL", Decimal),
        ("NUMERIC", Decimal),
        ("DOUBLE", Decimal),
        ("REAL", Decimal),
        ("INT", Integer),
        ("SMALLINT", Integer),
        ("TINYINT", Integer),
        ("NCHAR", String),
        ("CHAR", String),
        ("NTEXT", String),
        ("NVARCHAR", String),
        ("UNIQUEIDENTIFIER", String),
        ("TEXT", String),
        ("VARCHAR", String),
        ("SMALLDATETIME", Date),
        ("DATETIME", Date),
        ("DATE", Date),
        ("TIME", Date),
    ],
};

static SPARK: TypeMap = TypeMap {
    backend: Backend::Spark,
    entries: &[
        ("BIT", Boolean),
        ("BOOLEAN", Boolean),
        ("DECIMAL", Decimal),
        ("NUMERIC", Decimal),
        ("DOUBLE", Decimal),
        ("REAL", Decimal),
        ("FLOAT", Decimal),
        ("INT", Integer),
        ("SMALLINT", Integer),
        ("TINYINT", Integer),
        ("BIGINT", Integer),
        ("BINARY", Binary),
        ("NCHAR", String),
        ("CHAR", String),
        ("NTEXT", String),
        ("NVARCHAR", String),
        ("UNIQUEIDENTIFIER", String),
        ("TEXT", String),
        ("VARCHAR", String),
        ("STRING", String),
        ("SMALLDATETIME", Date),
        ("DATETIME", Date),
        ("DATE", Date),
        ("TIME", Date),
        ("TIMESTAMP", Date),
    ],
};

pub fn type_map(backend: Backend) -> &'static TypeMap {
    match backend {
        Backend::SqlServer => &SQL_SERVER,
        Backend::PostgreSql => &POSTGRES,
        Backend::MySql => &MYSQL,
        Backend::Sqlite => &SQLITE,
        Backend::DuckDb => &DUCKDB,
        Backend::Odbc => &ODBC,
        Backend::Spark => &SPARK,
    }
}

pub fn map_native_type(backend: Backend, token: &str) -> FieldType {
    type_map(backend).map(token)
}
