//! # Backend Profiles
//!
//! Everything that differs between backends when reading a catalog is data:
//! the catalog query text, the reserved schema names and the native type
//! table. [`SchemaReader`](crate::schema::reader::SchemaReader) runs the same
//! fold over every profile.
//!
//! Catalog queries alias their columns to a shared vocabulary so one fold
//! handles all of them:
//!
//! | phase       | columns                                                                 |
//! |-------------|-------------------------------------------------------------------------|
//! | relations   | `table_catalog, table_schema, table_name, table_type`                   |
//! | columns     | `column_name, ordinal_position, column_default, is_nullable, data_type, character_maximum_length, numeric_*, datetime_precision, character_set_name, collation_*, is_primary_key, is_identity, created_at, updated_at` |
//! | views       | `table_schema, table_name, view_definition, check_option, is_updatable` |
//! | constraints | `table_schema, table_name, column_name, constraint_name, constraint_type, ordinal_position` |
//! | descriptions| `table_schema, table_name, column_name, description`                    |
//! | routines    | `routine_catalog, routine_schema, routine_name, routine_type, routine_definition` |
//! | triggers    | `table_schema, table_name, trigger_name, user_name, category, created_at, date_reference, content, event_manipulation, action_timing, flag_*` |

mod duckdb;
mod mysql;
mod odbc;
mod postgres;
mod sqlite;
mod sqlserver;

use crate::backend::Backend;
use crate::dialect::text::same_name;
use crate::schema::fieldtype::{self, TypeMap};

/// How a backend hands out its tables and their columns.
#[derive(Debug, Clone, Copy)]
pub enum TableSource {
    /// One query returning a row per column, table attributes repeated on each.
    Joined { sql: &'static str },
    /// A relation listing, then one column query per relation.
    /// `columns_sql` is a template over `{schema}` and `{table}`.
    ListThenColumns {
        list_sql: &'static str,
        columns_sql: &'static str,
    },
    /// Driver reflection (`MetadataKind::Tables` then `MetadataKind::Columns`).
    Metadata,
}

/// Static catalog description of one backend.
#[derive(Debug)]
pub struct BackendProfile {
    pub backend: Backend,
    /// Reserved schema names, compared case-insensitively.
    pub system_schemas: &'static [&'static str],
    /// Name prefixes of internal tables for engines without schemas.
    pub system_table_prefixes: &'static [&'static str],
    pub tables: TableSource,
    pub views_sql: Option<&'static str>,
    pub constraints_sql: Option<&'static str>,
    pub descriptions_sql: Option<&'static str>,
    pub routines_sql: Option<&'static str>,
    pub triggers_sql: Option<&'static str>,
    /// Per-trigger source query, a template over `{schema}`, `{name}` and
    /// `{qualified_name}` (`schema.name`, or the bare name without a schema).
    pub help_text_sql: Option<&'static str>,
    /// Catalog queries filter on the connection's current database.
    pub database_name_required: bool,
}

impl BackendProfile {
    pub fn for_backend(backend: Backend) -> &'static BackendProfile {
        match backend {
            Backend::SqlServer => &sqlserver::PROFILE,
            Backend::PostgreSql => &postgres::PROFILE,
            Backend::MySql => &mysql::PROFILE,
            Backend::Sqlite => &sqlite::PROFILE,
            Backend::DuckDb => &duckdb::PROFILE,
            Backend::Odbc => &odbc::PROFILE,
            Backend::Spark => &odbc::SPARK_PROFILE,
        }
    }

    pub fn type_map(&self) -> &'static TypeMap {
        fieldtype::type_map(self.backend)
    }

    /// Whether a relation belongs to the engine rather than the user.
    pub fn is_system(&self, schema: Option<&str>, name: &str) -> bool {
        let schema = schema.map(str::trim).unwrap_or("");
        if !schema.is_empty() && self.system_schemas.iter().any(|s| same_name(s, schema)) {
            return true;
        }
        let name = name.to_ascii_lowercase();
        self.system_table_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix))
    }
}

/// Fill `{key}` placeholders with SQL string contents, doubling single quotes.
pub fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |sql, (key, value)| {
        sql.replace(&format!("{{{}}}", key), &value.replace('\'', "''"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_backend_has_a_profile() {
        for backend in Backend::ALL {
            let profile = BackendProfile::for_backend(backend);
            assert_eq!(profile.backend, backend);
            assert_eq!(profile.type_map().backend(), backend);
        }
    }

    #[test]
    fn test_system_schema_classification() {
        let pg = BackendProfile::for_backend(Backend::PostgreSql);
        assert!(pg.is_system(Some("pg_catalog"), "pg_class"));
        assert!(pg.is_system(Some("INFORMATION_SCHEMA"), "columns"));
        assert!(!pg.is_system(Some("public"), "users"));
        assert!(!pg.is_system(None, "users"));

        let sqlite = BackendProfile::for_backend(Backend::Sqlite);
        assert!(sqlite.is_system(None, "sqlite_sequence"));
        assert!(!sqlite.is_system(None, "notes"));
    }

    #[test]
    fn test_render_template_escapes_quotes() {
        let sql = render_template(
            "SELECT * FROM t WHERE s = '{schema}' AND n = '{table}'",
            &[("schema", "main"), ("table", "o'brien")],
        );
        assert_eq!(sql, "SELECT * FROM t WHERE s = 'main' AND n = 'o''brien'");
    }

    #[test]
    fn test_help_text_only_where_triggers_exist() {
        for backend in Backend::ALL {
            let profile = BackendProfile::for_backend(backend);
            if profile.help_text_sql.is_some() {
                assert!(profile.triggers_sql.is_some(), "{backend}");
            }
        }
    }

    #[test]
    fn test_mysql_scopes_to_current_database() {
        let mysql = BackendProfile::for_backend(Backend::MySql);
        assert!(mysql.database_name_required);
        match mysql.tables {
            TableSource::Joined { sql } => assert!(sql.contains("DATABASE()")),
            other => panic!("unexpected table source {other:?}"),
        }
    }
}
