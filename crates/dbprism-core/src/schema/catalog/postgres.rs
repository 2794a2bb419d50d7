use super::{BackendProfile, TableSource};
use crate::backend::Backend;

// information_schema columns are domain types; everything is cast so the
// driver sees plain text and integers.
const TABLES_SQL: &str = r#"
SELECT c.table_catalog::text AS table_catalog, c.table_schema::text AS table_schema,
       c.table_name::text AS table_name,
       CASE WHEN t.table_type = 'VIEW' THEN 'VIEW' ELSE 'TABLE' END AS table_type,
       c.column_name::text AS column_name, c.ordinal_position::int AS ordinal_position,
       c.column_default::text AS column_default, c.is_nullable::text AS is_nullable,
       c.udt_name::text AS data_type,
       c.character_maximum_length::int AS character_maximum_length,
       c.numeric_precision::int AS numeric_precision,
       c.numeric_precision_radix::int AS numeric_precision_radix,
       c.numeric_scale::int AS numeric_scale,
       c.datetime_precision::int AS datetime_precision,
       c.character_set_name::text AS character_set_name,
       c.collation_catalog::text AS collation_catalog,
       c.collation_schema::text AS collation_schema,
       c.collation_name::text AS collation_name,
       CASE WHEN pk.column_name IS NULL THEN 0 ELSE 1 END AS is_primary_key,
       CASE WHEN c.is_identity = 'YES' OR c.column_default LIKE 'nextval(%' THEN 1 ELSE 0 END AS is_identity
  FROM information_schema.columns AS c
       INNER JOIN information_schema.tables AS t
          ON c.table_schema = t.table_schema
         AND c.table_name = t.table_name
       LEFT JOIN (SELECT tc.table_schema, tc.table_name, kcu.column_name
                    FROM information_schema.table_constraints AS tc
                         INNER JOIN information_schema.key_column_usage AS kcu
                            ON tc.table_schema = kcu.table_schema
                           AND tc.table_name = kcu.table_name
                           AND tc.constraint_name = kcu.constraint_name
                   WHERE tc.constraint_type = 'PRIMARY KEY') AS pk
          ON c.table_schema = pk.table_schema
         AND c.table_name = pk.table_name
         AND c.column_name = pk.column_name
 ORDER BY c.table_schema, c.table_name, c.ordinal_position
"#;

const VIEWS_SQL: &str = r#"
SELECT table_schema::text AS table_schema, table_name::text AS table_name,
       view_definition::text AS view_definition, check_option::text AS check_option,
       is_updatable::text AS is_updatable
  FROM information_schema.views
"#;

const CONSTRAINTS_SQL: &str = r#"
SELECT tc.table_schema::text AS table_schema, tc.table_name::text AS table_name,
       kcu.column_name::text AS column_name, tc.constraint_name::text AS constraint_name,
       tc.constraint_type::text AS constraint_type, kcu.ordinal_position::int AS ordinal_position
  FROM information_schema.table_constraints AS tc
       INNER JOIN information_schema.key_column_usage AS kcu
          ON tc.constraint_schema = kcu.constraint_schema
         AND tc.constraint_name = kcu.constraint_name
         AND tc.table_name = kcu.table_name
 ORDER BY tc.table_name, tc.constraint_type, kcu.ordinal_position
"#;

const DESCRIPTIONS_SQL: &str = r#"
SELECT n.nspname::text AS table_schema, cl.relname::text AS table_name,
       a.attname::text AS column_name, d.description AS description
  FROM pg_catalog.pg_description AS d
       INNER JOIN pg_catalog.pg_class AS cl ON d.objoid = cl.oid
       INNER JOIN pg_catalog.pg_namespace AS n ON cl.relnamespace = n.oid
       LEFT JOIN pg_catalog.pg_attribute AS a ON a.attrelid = cl.oid AND a.attnum = d.objsubid
 WHERE d.classoid = 'pg_catalog.pg_class'::regclass
"#;

const ROUTINES_SQL: &str = r#"
SELECT routine_catalog::text AS routine_catalog, routine_schema::text AS routine_schema,
       routine_name::text AS routine_name, routine_type::text AS routine_type,
       routine_definition::text AS routine_definition
  FROM information_schema.routines
 WHERE routine_schema NOT IN ('pg_catalog', 'information_schema')
 ORDER BY routine_name
"#;

// One row per trigger event.
const TRIGGERS_SQL: &str = r#"
SELECT event_object_schema::text AS table_schema, event_object_table::text AS table_name,
       trigger_name::text AS trigger_name, event_manipulation::text AS event_manipulation,
       action_timing::text AS action_timing, action_statement::text AS content,
       created::timestamp AS created_at
  FROM information_schema.triggers
 ORDER BY event_object_table, trigger_name
"#;

pub(super) static PROFILE: BackendProfile = BackendProfile {
    backend: Backend::PostgreSql,
    system_schemas: &["information_schema", "pg_catalog", "pg_toast"],
    system_table_prefixes: &[],
    tables: TableSource::Joined { sql: TABLES_SQL },
    views_sql: Some(VIEWS_SQL),
    constraints_sql: Some(CONSTRAINTS_SQL),
    descriptions_sql: Some(DESCRIPTIONS_SQL),
    routines_sql: Some(ROUTINES_SQL),
    triggers_sql: Some(TRIGGERS_SQL),
    help_text_sql: None,
    database_name_required: false,
};
