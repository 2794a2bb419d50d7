use super::{BackendProfile, TableSource};
use crate::backend::Backend;

const TABLES_SQL: &str = r#"
SELECT t.TABLE_CATALOG AS table_catalog, t.TABLE_SCHEMA AS table_schema, t.TABLE_NAME AS table_name,
       CASE WHEN t.TABLE_TYPE = 'VIEW' THEN 'VIEW' ELSE 'TABLE' END AS table_type,
       c.COLUMN_NAME AS column_name, c.ORDINAL_POSITION AS ordinal_position,
       c.COLUMN_DEFAULT AS column_default, c.IS_NULLABLE AS is_nullable, c.DATA_TYPE AS data_type,
       c.CHARACTER_MAXIMUM_LENGTH AS character_maximum_length,
       CAST(c.NUMERIC_PRECISION AS int) AS numeric_precision,
       CAST(c.NUMERIC_PRECISION_RADIX AS int) AS numeric_precision_radix,
       CAST(c.NUMERIC_SCALE AS int) AS numeric_scale,
       CAST(c.DATETIME_PRECISION AS int) AS datetime_precision,
       c.CHARACTER_SET_NAME AS character_set_name, c.COLLATION_CATALOG AS collation_catalog,
       c.COLLATION_SCHEMA AS collation_schema, c.COLLATION_NAME AS collation_name,
       COLUMNPROPERTY(OBJECT_ID(QUOTENAME(t.TABLE_SCHEMA) + '.' + QUOTENAME(t.TABLE_NAME)), c.COLUMN_NAME, 'IsIdentity') AS is_identity,
       o.create_date AS created_at, o.modify_date AS updated_at
  FROM INFORMATION_SCHEMA.TABLES AS t
       INNER JOIN INFORMATION_SCHEMA.COLUMNS AS c
          ON t.TABLE_CATALOG = c.TABLE_CATALOG
         AND t.TABLE_SCHEMA = c.TABLE_SCHEMA
         AND t.TABLE_NAME = c.TABLE_NAME
       LEFT JOIN sys.objects AS o
          ON o.object_id = OBJECT_ID(QUOTENAME(t.TABLE_SCHEMA) + '.' + QUOTENAME(t.TABLE_NAME))
 ORDER BY t.TABLE_SCHEMA, t.TABLE_NAME, c.ORDINAL_POSITION
"#;

const VIEWS_SQL: &str = r#"
SELECT TABLE_CATALOG AS table_catalog, TABLE_SCHEMA AS table_schema, TABLE_NAME AS table_name,
       VIEW_DEFINITION AS view_definition, CHECK_OPTION AS check_option, IS_UPDATABLE AS is_updatable
  FROM INFORMATION_SCHEMA.VIEWS
"#;

const CONSTRAINTS_SQL: &str = r#"
SELECT tc.TABLE_CATALOG AS table_catalog, tc.TABLE_SCHEMA AS table_schema, tc.TABLE_NAME AS table_name,
       ccu.COLUMN_NAME AS column_name, ccu.CONSTRAINT_NAME AS constraint_name,
       tc.CONSTRAINT_TYPE AS constraint_type, kcu.ORDINAL_POSITION AS ordinal_position
  FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS AS tc
       INNER JOIN INFORMATION_SCHEMA.CONSTRAINT_COLUMN_USAGE AS ccu
          ON tc.CONSTRAINT_CATALOG = ccu.CONSTRAINT_CATALOG
         AND tc.CONSTRAINT_SCHEMA = ccu.CONSTRAINT_SCHEMA
         AND tc.CONSTRAINT_NAME = ccu.CONSTRAINT_NAME
       INNER JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE AS kcu
          ON ccu.CONSTRAINT_CATALOG = kcu.CONSTRAINT_CATALOG
         AND ccu.CONSTRAINT_SCHEMA = kcu.CONSTRAINT_SCHEMA
         AND ccu.CONSTRAINT_NAME = kcu.CONSTRAINT_NAME
         AND ccu.COLUMN_NAME = kcu.COLUMN_NAME
 ORDER BY tc.TABLE_NAME, tc.CONSTRAINT_TYPE, kcu.ORDINAL_POSITION
"#;

const DESCRIPTIONS_SQL: &str = r#"
SELECT s.name AS table_schema, o.name AS table_name, c.name AS column_name,
       CAST(ep.value AS nvarchar(4000)) AS description
  FROM sys.extended_properties AS ep
       INNER JOIN sys.objects AS o ON ep.major_id = o.object_id
       INNER JOIN sys.schemas AS s ON o.schema_id = s.schema_id
       LEFT JOIN sys.columns AS c ON ep.major_id = c.object_id AND ep.minor_id = c.column_id
 WHERE ep.class = 1 AND ep.name = 'MS_Description'
"#;

const ROUTINES_SQL: &str = r#"
SELECT ROUTINE_CATALOG AS routine_catalog, ROUTINE_SCHEMA AS routine_schema, ROUTINE_NAME AS routine_name,
       ROUTINE_TYPE AS routine_type, ROUTINE_DEFINITION AS routine_definition
  FROM INFORMATION_SCHEMA.ROUTINES
 ORDER BY ROUTINE_NAME
"#;

const TRIGGERS_SQL: &str = r#"
SELECT OBJECT_SCHEMA_NAME(tr.id) AS table_schema, tb.name AS table_name, tr.name AS trigger_name,
       USER_NAME(tr.uid) AS user_name, tr.category AS category,
       OBJECTPROPERTY(tr.id, N'IsExecuted') AS flag_executed,
       OBJECTPROPERTY(tr.id, N'ExecIsAnsiNullsOn') AS flag_exec_ansi_nulls_on,
       OBJECTPROPERTY(tr.id, N'ExecIsQuotedIdentOn') AS flag_exec_quoted_ident_on,
       OBJECTPROPERTY(tr.id, N'IsAnsiNullsOn') AS flag_ansi_nulls_on,
       OBJECTPROPERTY(tr.id, N'IsQuotedIdentOn') AS flag_quoted_ident_on,
       OBJECTPROPERTY(tr.id, N'ExecIsAfterTrigger') AS flag_after,
       OBJECTPROPERTY(tr.id, N'ExecIsDeleteTrigger') AS flag_delete,
       OBJECTPROPERTY(tr.id, N'ExecIsFirstDeleteTrigger') AS flag_first_delete,
       OBJECTPROPERTY(tr.id, N'ExecIsFirstInsertTrigger') AS flag_first_insert,
       OBJECTPROPERTY(tr.id, N'ExecIsFirstUpdateTrigger') AS flag_first_update,
       OBJECTPROPERTY(tr.id, N'ExecIsInsertTrigger') AS flag_insert,
       OBJECTPROPERTY(tr.id, N'ExecIsInsteadOfTrigger') AS flag_instead_of,
       OBJECTPROPERTY(tr.id, N'ExecIsLastDeleteTrigger') AS flag_last_delete,
       OBJECTPROPERTY(tr.id, N'ExecIsLastInsertTrigger') AS flag_last_insert,
       OBJECTPROPERTY(tr.id, N'ExecIsLastUpdateTrigger') AS flag_last_update,
       OBJECTPROPERTY(tr.id, N'ExecIsTriggerDisabled') AS flag_disabled,
       OBJECTPROPERTY(tr.id, N'ExecIsUpdateTrigger') AS flag_update,
       tr.crdate AS created_at, tr.refdate AS date_reference
  FROM sys.sysobjects AS tr
       INNER JOIN sys.sysobjects AS tb ON tr.parent_obj = tb.id
 WHERE OBJECTPROPERTY(tr.id, N'IsTrigger') = 1
   AND OBJECTPROPERTY(tr.id, N'IsMSShipped') = 0
 ORDER BY tb.name, tr.name
"#;

pub(super) static PROFILE: BackendProfile = BackendProfile {
    backend: Backend::SqlServer,
    system_schemas: &["sys", "INFORMATION_SCHEMA", "guest"],
    system_table_prefixes: &[],
    tables: TableSource::Joined { sql: TABLES_SQL },
    views_sql: Some(VIEWS_SQL),
    constraints_sql: Some(CONSTRAINTS_SQL),
    descriptions_sql: Some(DESCRIPTIONS_SQL),
    routines_sql: Some(ROUTINES_SQL),
    triggers_sql: Some(TRIGGERS_SQL),
    help_text_sql: Some("EXEC sp_helptext '{qualified_name}'"),
    database_name_required: false,
};
