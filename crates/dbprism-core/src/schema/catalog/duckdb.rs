use super::{BackendProfile, TableSource};
use crate::backend::Backend;

const LIST_SQL: &str = r#"
SELECT table_catalog, table_schema, table_name, table_type
  FROM information_schema.tables
"#;

const COLUMNS_SQL: &str = r#"
SELECT column_name, ordinal_position, column_default, is_nullable, data_type,
       character_maximum_length, numeric_precision, numeric_precision_radix, numeric_scale,
       datetime_precision
  FROM information_schema.columns
 WHERE table_schema = '{schema}'
   AND table_name = '{table}'
 ORDER BY ordinal_position
"#;

const VIEWS_SQL: &str = r#"
SELECT schema_name AS table_schema, view_name AS table_name, sql AS view_definition
  FROM duckdb_views()
 WHERE NOT internal
"#;

const CONSTRAINTS_SQL: &str = r#"
SELECT tc.table_schema, tc.table_name, kcu.column_name, tc.constraint_name, tc.constraint_type,
       kcu.ordinal_position
  FROM information_schema.table_constraints AS tc
       INNER JOIN information_schema.key_column_usage AS kcu
          ON tc.constraint_schema = kcu.constraint_schema
         AND tc.constraint_name = kcu.constraint_name
         AND tc.table_name = kcu.table_name
"#;

const DESCRIPTIONS_SQL: &str = r#"
SELECT schema_name AS table_schema, table_name, NULL AS column_name, comment AS description
  FROM duckdb_tables()
 WHERE comment IS NOT NULL
UNION ALL
SELECT schema_name, table_name, column_name, comment
  FROM duckdb_columns()
 WHERE comment IS NOT NULL
"#;

const ROUTINES_SQL: &str = r#"
SELECT database_name AS routine_catalog, schema_name AS routine_schema, function_name AS routine_name,
       function_type AS routine_type, macro_definition AS routine_definition
  FROM duckdb_functions()
 WHERE NOT internal
"#;

pub(super) static PROFILE: BackendProfile = BackendProfile {
    backend: Backend::DuckDb,
    system_schemas: &["information_schema", "pg_catalog"],
    system_table_prefixes: &[],
    tables: TableSource::ListThenColumns {
        list_sql: LIST_SQL,
        columns_sql: COLUMNS_SQL,
    },
    views_sql: Some(VIEWS_SQL),
    constraints_sql: Some(CONSTRAINTS_SQL),
    descriptions_sql: Some(DESCRIPTIONS_SQL),
    routines_sql: Some(ROUTINES_SQL),
    triggers_sql: None,
    help_text_sql: None,
    database_name_required: false,
};
