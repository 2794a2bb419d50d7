use super::{BackendProfile, TableSource};
use crate::backend::Backend;

const LIST_SQL: &str = r#"
SELECT NULL AS table_schema, name AS table_name,
       CASE type WHEN 'view' THEN 'VIEW' ELSE 'TABLE' END AS table_type
  FROM sqlite_master
 WHERE type IN ('table', 'view')
 ORDER BY name
"#;

const COLUMNS_SQL: &str = r#"
SELECT name AS column_name, cid + 1 AS ordinal_position, dflt_value AS column_default,
       CASE WHEN "notnull" = 1 THEN 'NO' ELSE 'YES' END AS is_nullable,
       type AS data_type, pk AS is_primary_key
  FROM pragma_table_info('{table}')
"#;

const VIEWS_SQL: &str = r#"
SELECT NULL AS table_schema, name AS table_name, sql AS view_definition
  FROM sqlite_master
 WHERE type = 'view'
"#;

const CONSTRAINTS_SQL: &str = r#"
SELECT m.name AS table_name, p.name AS column_name, 'pk_' || m.name AS constraint_name,
       'PRIMARY KEY' AS constraint_type, p.pk AS ordinal_position
  FROM sqlite_master AS m, pragma_table_info(m.name) AS p
 WHERE m.type = 'table' AND p.pk > 0
UNION ALL
SELECT m.name, f."from", 'fk_' || m.name || '_' || f.id, 'FOREIGN KEY', f.seq + 1
  FROM sqlite_master AS m, pragma_foreign_key_list(m.name) AS f
 WHERE m.type = 'table'
UNION ALL
SELECT m.name, ii.name, il.name, 'UNIQUE', ii.seqno + 1
  FROM sqlite_master AS m, pragma_index_list(m.name) AS il, pragma_index_info(il.name) AS ii
 WHERE m.type = 'table' AND il."unique" = 1 AND il.origin = 'u'
"#;

// sqlite_master keeps the CREATE TRIGGER text only; timing and event are read from it.
const TRIGGERS_SQL: &str = r#"
SELECT NULL AS table_schema, tbl_name AS table_name, name AS trigger_name, sql AS content,
       CASE WHEN instr(upper(sql), ' INSTEAD OF ') > 0 THEN 'INSTEAD OF'
            WHEN instr(upper(sql), ' BEFORE ') > 0 THEN 'BEFORE'
            ELSE 'AFTER' END AS action_timing,
       CASE WHEN instr(upper(sql), ' INSERT ON ') > 0 THEN 'INSERT'
            WHEN instr(upper(sql), ' DELETE ON ') > 0 THEN 'DELETE'
            WHEN instr(upper(sql), ' UPDATE ') > 0 THEN 'UPDATE' END AS event_manipulation
  FROM sqlite_master
 WHERE type = 'trigger'
 ORDER BY tbl_name, name
"#;

pub(super) static PROFILE: BackendProfile = BackendProfile {
    backend: Backend::Sqlite,
    system_schemas: &[],
    system_table_prefixes: &["sqlite_"],
    tables: TableSource::ListThenColumns {
        list_sql: LIST_SQL,
        columns_sql: COLUMNS_SQL,
    },
    views_sql: Some(VIEWS_SQL),
    constraints_sql: Some(CONSTRAINTS_SQL),
    descriptions_sql: None,
    routines_sql: None,
    triggers_sql: Some(TRIGGERS_SQL),
    help_text_sql: None,
    database_name_required: false,
};
