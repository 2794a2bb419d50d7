use super::{BackendProfile, TableSource};
use crate::backend::Backend;

const ODBC: BackendProfile = BackendProfile {
    backend: Backend::Odbc,
    system_schemas: &["INFORMATION_SCHEMA", "sys"],
    system_table_prefixes: &[],
    tables: TableSource::Metadata,
    views_sql: None,
    constraints_sql: None,
    descriptions_sql: None,
    routines_sql: None,
    triggers_sql: None,
    help_text_sql: None,
    database_name_required: false,
};

pub(super) static PROFILE: BackendProfile = ODBC;

/// Spark is reached through its ODBC driver and reflects the same way.
pub(super) static SPARK_PROFILE: BackendProfile = BackendProfile {
    backend: Backend::Spark,
    system_schemas: &["information_schema", "sys"],
    ..ODBC
};
