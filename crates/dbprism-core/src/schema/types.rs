use bitflags::bitflags;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dialect::text::same_name;

/// Switches for what a schema read collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaOptions {
    pub include_tables: bool,
    pub include_views: bool,
    pub include_routines: bool,
    pub include_triggers: bool,
    pub include_descriptions: bool,
    /// Keep objects in system schemas (`information_schema`, `pg_catalog`, ...).
    pub include_system_data: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            include_tables: true,
            include_views: true,
            include_routines: true,
            include_triggers: true,
            include_descriptions: true,
            include_system_data: false,
        }
    }
}

/// Backend-independent logical type of a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    #[default]
    Unknown,
    String,
    Date,
    Integer,
    Decimal,
    Boolean,
    Binary,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Unknown => "unknown",
            FieldType::String => "string",
            FieldType::Date => "date",
            FieldType::Integer => "integer",
            FieldType::Decimal => "decimal",
            FieldType::Boolean => "boolean",
            FieldType::Binary => "binary",
        };
        f.write_str(name)
    }
}

/// A column of a table or view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    /// Source table of a view column, when the catalog reports it.
    pub table: Option<String>,
    pub field_type: FieldType,
    /// Native type token as the catalog spells it (`varchar`, `INT4`, ...).
    pub db_type: Option<String>,
    pub length: u32,
    pub is_key: bool,
    pub is_foreign_key: bool,
    /// NOT NULL.
    pub is_required: bool,
    pub is_identity: bool,
    pub ordinal_position: u32,
    pub default: Option<String>,
    pub format: Option<String>,
    pub description: Option<String>,
    pub numeric_precision: Option<u32>,
    pub numeric_precision_radix: Option<u32>,
    pub numeric_scale: Option<u32>,
    pub datetime_precision: Option<u32>,
    pub character_set_name: Option<String>,
    pub collation_catalog: Option<String>,
    pub collation_schema: Option<String>,
    pub collation_name: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType, db_type: Option<String>) -> Self {
        Self {
            name: name.into(),
            field_type,
            db_type,
            ..Self::default()
        }
    }

    /// Fold a second sighting of the same column into this one.
    ///
    /// The core attributes are overwritten; optional metadata only when the
    /// newer sighting carries it.
    pub(crate) fn merge(&mut self, other: Field) {
        self.field_type = other.field_type;
        self.db_type = other.db_type;
        self.length = other.length;
        self.is_key = other.is_key;
        self.is_required = other.is_required;
        self.is_identity |= other.is_identity;
        self.is_foreign_key |= other.is_foreign_key;
        if other.ordinal_position != 0 {
            self.ordinal_position = other.ordinal_position;
        }

        macro_rules! keep_newer {
            ($($field:ident),+) => {
                $(
                    if other.$field.is_some() {
                        self.$field = other.$field;
                    }
                )+
            };
        }
        keep_newer!(
            table,
            default,
            format,
            description,
            numeric_precision,
            numeric_precision_radix,
            numeric_scale,
            datetime_precision,
            character_set_name,
            collation_catalog,
            collation_schema,
            collation_name
        );
    }
}

/// Attributes shared by tables and views.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub is_system: bool,
    fields: Vec<Field>,
}

impl Relation {
    pub fn new(schema: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.filter(|s| !s.is_empty()).map(str::to_string),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| same_name(&f.name, name))
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| same_name(&f.name, name))
    }

    /// Append a field, or merge it into an existing field of the same name.
    pub fn add_field(&mut self, field: Field) -> &mut Field {
        match self.fields.iter().position(|f| same_name(&f.name, &field.name)) {
            Some(index) => {
                let existing = &mut self.fields[index];
                existing.merge(field);
                existing
            }
            None => {
                self.fields.push(field);
                let last = self.fields.len() - 1;
                &mut self.fields[last]
            }
        }
    }

    /// `[catalog].[schema].[name]`, skipping empty parts.
    pub fn full_name(&self) -> String {
        [self.catalog.as_deref(), self.schema.as_deref(), Some(self.name.as_str())]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .map(|part| format!("[{}]", part))
            .collect::<Vec<_>>()
            .join(".")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
    #[serde(flatten)]
    pub relation: Relation,
    pub constraints: Vec<Constraint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewDef {
    #[serde(flatten)]
    pub relation: Relation,
    pub definition: Option<String>,
    pub check_option: Option<String>,
    pub is_updatable: bool,
}

/// Constraint kinds the reader distinguishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintKind {
    #[default]
    Unknown,
    PrimaryKey,
    ForeignKey,
    Unique,
}

impl ConstraintKind {
    /// Map an `INFORMATION_SCHEMA.TABLE_CONSTRAINTS.CONSTRAINT_TYPE` value.
    pub fn from_catalog(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "PRIMARY KEY" | "PK" | "P" => ConstraintKind::PrimaryKey,
            "FOREIGN KEY" | "FK" | "F" | "R" => ConstraintKind::ForeignKey,
            "UNIQUE" | "U" => ConstraintKind::Unique,
            _ => ConstraintKind::Unknown,
        }
    }
}

/// One column of a (possibly composite) constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub table: String,
    pub column: String,
    pub name: String,
    pub kind: ConstraintKind,
    /// Position of the column within the constraint, starting at 1.
    pub position: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutineKind {
    #[default]
    Unknown,
    Procedure,
    Function,
}

impl RoutineKind {
    pub fn from_catalog(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "PROCEDURE" => RoutineKind::Procedure,
            "FUNCTION" | "MACRO" | "TABLE_MACRO" => RoutineKind::Function,
            _ => RoutineKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub name: String,
    pub kind: RoutineKind,
    /// Source text, empty when the catalog hides it.
    pub content: String,
}

bitflags! {
    /// Execution properties of a trigger as a bit set.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct TriggerFlags: u32 {
        const EXECUTED = 1;
        const EXEC_ANSI_NULLS_ON = 1 << 1;
        const EXEC_QUOTED_IDENT_ON = 1 << 2;
        const ANSI_NULLS_ON = 1 << 3;
        const QUOTED_IDENT_ON = 1 << 4;
        const AFTER = 1 << 5;
        const DELETE = 1 << 6;
        const FIRST_DELETE = 1 << 7;
        const FIRST_INSERT = 1 << 8;
        const FIRST_UPDATE = 1 << 9;
        const INSERT = 1 << 10;
        const INSTEAD_OF = 1 << 11;
        const LAST_DELETE = 1 << 12;
        const LAST_INSERT = 1 << 13;
        const LAST_UPDATE = 1 << 14;
        const DISABLED = 1 << 15;
        const UPDATE = 1 << 16;
        const BEFORE = 1 << 17;
    }
}

/// `AFTER | INSERT`, in bit order.
impl fmt::Display for TriggerFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter_names().map(|(name, _)| name).collect();
        f.write_str(&names.join(" | "))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub table: String,
    pub name: String,
    pub user_name: Option<String>,
    pub category: i32,
    pub flags: TriggerFlags,
    pub created_at: Option<NaiveDateTime>,
    pub date_reference: Option<NaiveDateTime>,
    /// Trigger body. Stays empty when the help-text query fails.
    pub content: String,
}

impl Trigger {
    pub(crate) fn same_identity(&self, other: &Trigger) -> bool {
        same_name(self.schema.as_deref().unwrap_or(""), other.schema.as_deref().unwrap_or(""))
            && same_name(&self.table, &other.table)
            && same_name(&self.name, &other.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_field_merges_by_name() {
        let mut relation = Relation::new(Some("dbo"), "Users");
        relation.add_field(Field::new("Id", FieldType::Unknown, None));
        let mut again = Field::new("ID", FieldType::Integer, Some("int".to_string()));
        again.is_required = true;
        again.description = Some("surrogate key".to_string());
        relation.add_field(again);

        assert_eq!(relation.fields().len(), 1);
        let id = relation.field("id").unwrap();
        assert_eq!(id.name, "Id");
        assert_eq!(id.field_type, FieldType::Integer);
        assert!(id.is_required);
        assert_eq!(id.description.as_deref(), Some("surrogate key"));
    }

    #[test]
    fn test_full_name_skips_empty_parts() {
        let mut relation = Relation::new(Some(""), "Users");
        assert_eq!(relation.full_name(), "[Users]");
        relation.schema = Some("dbo".to_string());
        relation.catalog = Some("erp".to_string());
        assert_eq!(relation.full_name(), "[erp].[dbo].[Users]");
    }

    #[test]
    fn test_constraint_kind_from_catalog() {
        assert_eq!(ConstraintKind::from_catalog("PRIMARY KEY"), ConstraintKind::PrimaryKey);
        assert_eq!(ConstraintKind::from_catalog("foreign key"), ConstraintKind::ForeignKey);
        assert_eq!(ConstraintKind::from_catalog("UNIQUE"), ConstraintKind::Unique);
        assert_eq!(ConstraintKind::from_catalog("CHECK"), ConstraintKind::Unknown);
    }

    #[test]
    fn test_trigger_flags() {
        let mut flags = TriggerFlags::AFTER | TriggerFlags::INSERT;
        flags.insert(TriggerFlags::UPDATE);
        assert!(flags.contains(TriggerFlags::AFTER | TriggerFlags::UPDATE));
        assert!(!flags.contains(TriggerFlags::DISABLED));
        flags.set(TriggerFlags::AFTER, false);
        let names: Vec<&str> = flags.iter_names().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["INSERT", "UPDATE"]);
        assert_eq!(flags.to_string(), "INSERT | UPDATE");
    }

    #[test]
    fn test_trigger_flags_are_distinct_bits() {
        assert_eq!(TriggerFlags::all().bits().count_ones(), 18);
        assert_eq!(TriggerFlags::all().iter_names().count(), 18);
        assert_eq!(TriggerFlags::empty().to_string(), "");
    }

    #[test]
    fn test_trigger_flags_serde() {
        let flags = TriggerFlags::BEFORE | TriggerFlags::DELETE;
        let json = serde_json::to_string(&flags).unwrap();
        let back: TriggerFlags = serde_json::from_str(&json).unwrap();
        assert_eq!(back, flags);
    }

    #[test]
    fn test_schema_options_defaults() {
        let options = SchemaOptions::default();
        assert!(options.include_tables && options.include_views && options.include_routines);
        assert!(options.include_triggers && options.include_descriptions);
        assert!(!options.include_system_data);
    }
}
