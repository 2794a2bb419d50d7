//! The schema snapshot and its find-or-create collections.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::backend::Backend;
use crate::dialect::text::same_name;
use crate::schema::types::{
    ConstraintKind, Field, Relation, Routine, TableDef, Trigger, ViewDef,
};

/// Entities addressable by a `(schema, name)` pair.
pub trait Keyed {
    fn create(schema: Option<&str>, name: &str) -> Self;
    fn relation(&self) -> &Relation;
    fn relation_mut(&mut self) -> &mut Relation;
}

impl Keyed for TableDef {
    fn create(schema: Option<&str>, name: &str) -> Self {
        TableDef {
            relation: Relation::new(schema, name),
            constraints: Vec::new(),
        }
    }

    fn relation(&self) -> &Relation {
        &self.relation
    }

    fn relation_mut(&mut self) -> &mut Relation {
        &mut self.relation
    }
}

impl Keyed for ViewDef {
    fn create(schema: Option<&str>, name: &str) -> Self {
        ViewDef {
            relation: Relation::new(schema, name),
            definition: None,
            check_option: None,
            is_updatable: false,
        }
    }

    fn relation(&self) -> &Relation {
        &self.relation
    }

    fn relation_mut(&mut self) -> &mut Relation {
        &mut self.relation
    }
}

/// Case-folded `(schema, name)`. A missing schema and an empty one are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EntityKey(String, String);

impl EntityKey {
    fn new(schema: Option<&str>, name: &str) -> Self {
        EntityKey(
            schema.unwrap_or("").trim().to_lowercase(),
            name.trim().to_lowercase(),
        )
    }
}

/// Insertion-ordered collection with at most one entity per `(schema, name)`.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityList<T> {
    items: IndexMap<EntityKey, T>,
}

impl<T> Default for EntityList<T> {
    fn default() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }
}

impl<T: Keyed> EntityList<T> {
    /// Return the entity for the key, creating it on first sighting.
    pub fn find_or_create(&mut self, schema: Option<&str>, name: &str) -> &mut T {
        self.items
            .entry(EntityKey::new(schema, name))
            .or_insert_with(|| T::create(schema, name.trim()))
    }

    pub fn find(&self, schema: Option<&str>, name: &str) -> Option<&T> {
        self.items.get(&EntityKey::new(schema, name))
    }

    pub fn find_mut(&mut self, schema: Option<&str>, name: &str) -> Option<&mut T> {
        self.items.get_mut(&EntityKey::new(schema, name))
    }

    /// First entity with this name in any schema.
    pub fn find_by_name(&self, name: &str) -> Option<&T> {
        self.items
            .values()
            .find(|item| same_name(&item.relation().name, name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.values_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Serialize> Serialize for EntityList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.values())
    }
}

impl<'de, T: Keyed + Deserialize<'de>> Deserialize<'de> for EntityList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<T>::deserialize(deserializer)?;
        let mut list = EntityList::default();
        for entry in entries {
            let relation = entry.relation();
            let key = EntityKey::new(relation.schema.as_deref(), &relation.name);
            list.items.insert(key, entry);
        }
        Ok(list)
    }
}

/// One point-in-time read of a database catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    backend: Backend,
    tables: EntityList<TableDef>,
    views: EntityList<ViewDef>,
    routines: Vec<Routine>,
    triggers: Vec<Trigger>,
}

impl SchemaSnapshot {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            tables: EntityList::default(),
            views: EntityList::default(),
            routines: Vec::new(),
            triggers: Vec::new(),
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn tables(&self) -> &EntityList<TableDef> {
        &self.tables
    }

    pub fn views(&self) -> &EntityList<ViewDef> {
        &self.views
    }

    pub fn routines(&self) -> &[Routine] {
        &self.routines
    }

    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    pub fn table(&self, schema: Option<&str>, name: &str) -> Option<&TableDef> {
        self.tables.find(schema, name)
    }

    pub fn view(&self, schema: Option<&str>, name: &str) -> Option<&ViewDef> {
        self.views.find(schema, name)
    }

    pub fn add_table(&mut self, schema: Option<&str>, name: &str) -> &mut TableDef {
        self.tables.find_or_create(schema, name)
    }

    pub fn add_view(&mut self, schema: Option<&str>, name: &str) -> &mut ViewDef {
        self.views.find_or_create(schema, name)
    }

    /// Find-or-create the table or view, returning its shared attributes.
    /// A blank name adds nothing.
    pub fn add_relation(
        &mut self,
        is_table: bool,
        schema: Option<&str>,
        name: &str,
    ) -> Option<&mut Relation> {
        if name.trim().is_empty() {
            return None;
        }
        Some(if is_table {
            &mut self.add_table(schema, name).relation
        } else {
            &mut self.add_view(schema, name).relation
        })
    }

    /// Find-or-create the relation and add (or merge) a field into it.
    /// Blank relation or field names add nothing.
    pub fn add_field(
        &mut self,
        is_table: bool,
        schema: Option<&str>,
        name: &str,
        field: Field,
    ) -> Option<&mut Relation> {
        if field.name.trim().is_empty() {
            return None;
        }
        let relation = self.add_relation(is_table, schema, name)?;
        relation.add_field(field);
        Some(relation)
    }

    pub(crate) fn relation_mut(&mut self, schema: Option<&str>, name: &str) -> Option<&mut Relation> {
        if let Some(table) = self.tables.find_mut(schema, name) {
            return Some(&mut table.relation);
        }
        self.views.find_mut(schema, name).map(|view| &mut view.relation)
    }

    pub(crate) fn tables_mut(&mut self) -> &mut EntityList<TableDef> {
        &mut self.tables
    }

    pub(crate) fn views_mut(&mut self) -> &mut EntityList<ViewDef> {
        &mut self.views
    }

    pub fn add_routine(&mut self, routine: Routine) {
        self.routines.push(routine);
    }

    /// Add a trigger, OR-ing its flags into an existing one with the same
    /// `(schema, table, name)`. Catalogs that report one row per event
    /// produce several sightings of the same trigger.
    pub fn add_trigger(&mut self, trigger: Trigger) {
        match self.triggers.iter_mut().find(|t| t.same_identity(&trigger)) {
            Some(existing) => {
                existing.flags |= trigger.flags;
                if existing.content.is_empty() {
                    existing.content = trigger.content;
                }
            }
            None => self.triggers.push(trigger),
        }
    }

    pub(crate) fn triggers_mut(&mut self) -> &mut [Trigger] {
        &mut self.triggers
    }

    /// Flip `is_key`/`is_foreign_key` on the fields named by each table's
    /// constraints. Constraints naming a missing column are ignored.
    pub fn resolve_constraints(&mut self) {
        for table in self.tables.iter_mut() {
            let TableDef {
                relation,
                constraints,
            } = table;
            for constraint in constraints.iter() {
                let Some(field) = relation.field_mut(&constraint.column) else {
                    continue;
                };
                match constraint.kind {
                    ConstraintKind::PrimaryKey => field.is_key = true,
                    ConstraintKind::ForeignKey => field.is_foreign_key = true,
                    ConstraintKind::Unique | ConstraintKind::Unknown => {}
                }
            }
        }
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    pub fn field_count(&self) -> usize {
        self.tables
            .iter()
            .map(|t| t.relation.fields().len())
            .chain(self.views.iter().map(|v| v.relation.fields().len()))
            .sum()
    }

    pub fn constraint_count(&self) -> usize {
        self.tables.iter().map(|t| t.constraints.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
            && self.views.is_empty()
            && self.routines.is_empty()
            && self.triggers.is_empty()
    }

    /// SHA-256 over the JSON form. Equal catalogs give equal fingerprints,
    /// since every collection keeps catalog order.
    pub fn fingerprint(&self) -> crate::error::Result<String> {
        let json = serde_json::to_string(self)?;
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{Constraint, FieldType, TriggerFlags};

    fn field(name: &str) -> Field {
        Field::new(name, FieldType::Integer, Some("int".to_string()))
    }

    #[test]
    fn test_add_is_idempotent_per_key() {
        let mut snapshot = SchemaSnapshot::new(Backend::SqlServer);
        snapshot.add_field(true, Some("dbo"), "Users", field("Id"));
        snapshot.add_field(true, Some("dbo"), "Users", field("Name"));

        assert_eq!(snapshot.table_count(), 1);
        let users = snapshot.table(Some("dbo"), "Users").unwrap();
        let names: Vec<&str> = users.relation.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Id", "Name"]);
    }

    #[test]
    fn test_key_is_case_insensitive() {
        let mut snapshot = SchemaSnapshot::new(Backend::SqlServer);
        snapshot.add_field(true, Some("DBO"), "USERS", field("Id"));
        snapshot.add_field(true, Some("dbo"), "Users", field("Email"));

        assert_eq!(snapshot.table_count(), 1);
        let users = snapshot.table(Some("Dbo"), "users").unwrap();
        assert_eq!(users.relation.name, "USERS");
        assert_eq!(users.relation.fields().len(), 2);
    }

    #[test]
    fn test_table_and_view_with_same_key_coexist() {
        let mut snapshot = SchemaSnapshot::new(Backend::PostgreSql);
        snapshot.add_field(true, Some("public"), "orders", field("id"));
        snapshot.add_field(false, Some("public"), "orders", field("id"));
        assert_eq!(snapshot.table_count(), 1);
        assert_eq!(snapshot.view_count(), 1);
    }

    #[test]
    fn test_missing_and_empty_schema_share_a_key() {
        let mut snapshot = SchemaSnapshot::new(Backend::Sqlite);
        snapshot.add_table(None, "notes");
        snapshot.add_table(Some(""), "Notes");
        assert_eq!(snapshot.table_count(), 1);
    }

    #[test]
    fn test_blank_names_add_nothing() {
        let mut snapshot = SchemaSnapshot::new(Backend::MySql);
        assert!(snapshot.add_field(true, None, "  ", field("id")).is_none());
        assert!(snapshot.add_field(true, None, "t", field("")).is_none());
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_resolve_constraints() {
        let mut snapshot = SchemaSnapshot::new(Backend::SqlServer);
        snapshot.add_field(true, Some("dbo"), "Orders", field("Id"));
        snapshot.add_field(true, Some("dbo"), "Orders", field("CustomerId"));
        let orders = snapshot.add_table(Some("dbo"), "Orders");
        orders.constraints.push(Constraint {
            table: "Orders".into(),
            column: "id".into(),
            name: "PK_Orders".into(),
            kind: ConstraintKind::PrimaryKey,
            position: 1,
            ..Constraint::default()
        });
        orders.constraints.push(Constraint {
            table: "Orders".into(),
            column: "CustomerId".into(),
            name: "FK_Orders_Customers".into(),
            kind: ConstraintKind::ForeignKey,
            position: 1,
            ..Constraint::default()
        });
        orders.constraints.push(Constraint {
            table: "Orders".into(),
            column: "Ghost".into(),
            name: "FK_Orders_Ghost".into(),
            kind: ConstraintKind::ForeignKey,
            position: 1,
            ..Constraint::default()
        });

        snapshot.resolve_constraints();

        let orders = snapshot.table(Some("dbo"), "Orders").unwrap();
        let id = orders.relation.field("Id").unwrap();
        let customer = orders.relation.field("CustomerId").unwrap();
        assert!(id.is_key && !id.is_foreign_key);
        assert!(customer.is_foreign_key && !customer.is_key);
        assert_eq!(orders.relation.fields().len(), 2);
        assert_eq!(snapshot.constraint_count(), 3);
    }

    #[test]
    fn test_add_trigger_merges_event_rows() {
        let mut snapshot = SchemaSnapshot::new(Backend::PostgreSql);
        for flag in [TriggerFlags::INSERT, TriggerFlags::UPDATE] {
            snapshot.add_trigger(Trigger {
                schema: Some("public".into()),
                table: "orders".into(),
                name: "audit_orders".into(),
                flags: flag | TriggerFlags::AFTER,
                ..Trigger::default()
            });
        }
        assert_eq!(snapshot.triggers().len(), 1);
        assert!(snapshot.triggers()[0]
            .flags
            .contains(TriggerFlags::INSERT | TriggerFlags::UPDATE | TriggerFlags::AFTER));
    }

    #[test]
    fn test_fingerprint_is_stable_and_sensitive() {
        let mut a = SchemaSnapshot::new(Backend::MySql);
        a.add_field(true, None, "users", field("id"));
        let b = a.clone();
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        assert_eq!(a.fingerprint().unwrap().len(), 64);

        a.add_field(true, None, "users", field("email"));
        assert_ne!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    }

    #[test]
    fn test_json_roundtrip_keeps_lookup() {
        let mut snapshot = SchemaSnapshot::new(Backend::PostgreSql);
        snapshot.add_field(true, Some("public"), "Users", field("id"));
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: SchemaSnapshot = serde_json::from_str(&json).unwrap();
        assert!(back.table(Some("PUBLIC"), "users").is_some());
        assert_eq!(back, snapshot);
    }
}
