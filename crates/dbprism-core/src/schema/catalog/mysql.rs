use super::{BackendProfile, TableSource};
use crate::backend::Backend;

const TABLES_SQL: &str = r#"
SELECT c.TABLE_CATALOG AS table_catalog, c.TABLE_SCHEMA AS table_schema, c.TABLE_NAME AS table_name,
       CASE WHEN t.TABLE_TYPE = 'VIEW' THEN 'VIEW' ELSE 'TABLE' END AS table_type,
       c.COLUMN_NAME AS column_name, CAST(c.ORDINAL_POSITION AS SIGNED) AS ordinal_position,
       c.COLUMN_DEFAULT AS column_default, c.IS_NULLABLE AS is_nullable, c.DATA_TYPE AS data_type,
       CAST(c.CHARACTER_MAXIMUM_LENGTH AS SIGNED) AS character_maximum_length,
       CAST(c.NUMERIC_PRECISION AS SIGNED) AS numeric_precision,
       CAST(c.NUMERIC_SCALE AS SIGNED) AS numeric_scale,
       CAST(c.DATETIME_PRECISION AS SIGNED) AS datetime_precision,
       c.CHARACTER_SET_NAME AS character_set_name, c.COLLATION_NAME AS collation_name,
       CASE WHEN c.COLUMN_KEY = 'PRI' THEN 1 ELSE 0 END AS is_primary_key,
       CASE WHEN c.EXTRA LIKE '%auto_increment%' THEN 1 ELSE 0 END AS is_identity,
       t.CREATE_TIME AS created_at, t.UPDATE_TIME AS updated_at,
       t.TABLE_COMMENT AS table_description, c.COLUMN_COMMENT AS column_description
  FROM information_schema.COLUMNS AS c
       INNER JOIN information_schema.TABLES AS t
          ON c.TABLE_SCHEMA = t.TABLE_SCHEMA
         AND c.TABLE_NAME = t.TABLE_NAME
 WHERE t.TABLE_SCHEMA = DATABASE()
 ORDER BY c.TABLE_NAME, c.ORDINAL_POSITION
"#;

const VIEWS_SQL: &str = r#"
SELECT TABLE_SCHEMA AS table_schema, TABLE_NAME AS table_name, VIEW_DEFINITION AS view_definition,
       CHECK_OPTION AS check_option, IS_UPDATABLE AS is_updatable
  FROM information_schema.VIEWS
 WHERE TABLE_SCHEMA = DATABASE()
"#;

const CONSTRAINTS_SQL: &str = r#"
SELECT tc.TABLE_SCHEMA AS table_schema, tc.TABLE_NAME AS table_name, kcu.COLUMN_NAME AS column_name,
       tc.CONSTRAINT_NAME AS constraint_name, tc.CONSTRAINT_TYPE AS constraint_type,
       CAST(kcu.ORDINAL_POSITION AS SIGNED) AS ordinal_position
  FROM information_schema.TABLE_CONSTRAINTS AS tc
       INNER JOIN information_schema.KEY_COLUMN_USAGE AS kcu
          ON tc.CONSTRAINT_SCHEMA = kcu.CONSTRAINT_SCHEMA
         AND tc.CONSTRAINT_NAME = kcu.CONSTRAINT_NAME
         AND tc.TABLE_NAME = kcu.TABLE_NAME
 WHERE tc.TABLE_SCHEMA = DATABASE()
 ORDER BY tc.TABLE_NAME, tc.CONSTRAINT_TYPE, kcu.ORDINAL_POSITION
"#;

const ROUTINES_SQL: &str = r#"
SELECT ROUTINE_CATALOG AS routine_catalog, ROUTINE_SCHEMA AS routine_schema, ROUTINE_NAME AS routine_name,
       ROUTINE_TYPE AS routine_type, ROUTINE_DEFINITION AS routine_definition
  FROM information_schema.ROUTINES
 WHERE ROUTINE_SCHEMA = DATABASE()
 ORDER BY ROUTINE_NAME
"#;

const TRIGGERS_SQL: &str = r#"
SELECT EVENT_OBJECT_SCHEMA AS table_schema, EVENT_OBJECT_TABLE AS table_name, TRIGGER_NAME AS trigger_name,
       DEFINER AS user_name, EVENT_MANIPULATION AS event_manipulation, ACTION_TIMING AS action_timing,
       ACTION_STATEMENT AS content, CREATED AS created_at
  FROM information_schema.TRIGGERS
 WHERE TRIGGER_SCHEMA = DATABASE()
 ORDER BY EVENT_OBJECT_TABLE, TRIGGER_NAME
"#;

pub(super) static PROFILE: BackendProfile = BackendProfile {
    backend: Backend::MySql,
    system_schemas: &["information_schema", "mysql", "performance_schema", "sys"],
    system_table_prefixes: &[],
    tables: TableSource::Joined { sql: TABLES_SQL },
    views_sql: Some(VIEWS_SQL),
    constraints_sql: Some(CONSTRAINTS_SQL),
    descriptions_sql: None,
    routines_sql: Some(ROUTINES_SQL),
    triggers_sql: Some(TRIGGERS_SQL),
    help_text_sql: None,
    database_name_required: true,
};
