//! # Schema Reader
//!
//! One reader for every backend. It opens a dedicated connection from the
//! provider, runs the profile's catalog queries one after another and folds
//! the streamed rows into a [`SchemaSnapshot`].
//!
//! Only two things fail a read: the connection cannot be opened, or the main
//! relation/column query fails. Every other phase is optional enrichment; a
//! failure there is logged and the snapshot simply lacks that detail.
//! Cancellation stops the read early and returns what was gathered so far.

use std::time::Duration;

use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::backend::Backend;
use crate::dialect::text::{normalize_whitespace, same_name};
use crate::dialect::Parameters;
use crate::error::{DbPrismError, Result};
use crate::provider::{CatalogConnection, CatalogRow, MetadataKind, Provider, RowValue};
use crate::schema::catalog::{render_template, BackendProfile, TableSource};
use crate::schema::snapshot::SchemaSnapshot;
use crate::schema::types::{
    Constraint, ConstraintKind, Field, Routine, RoutineKind, SchemaOptions, Trigger, TriggerFlags,
};

/// Read a schema with the profile matching the provider's backend.
pub async fn get_schema(
    provider: &dyn Provider,
    options: &SchemaOptions,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<SchemaSnapshot> {
    SchemaReader::for_backend(provider.backend())
        .read(provider, options, timeout, cancel)
        .await
}

/// Whether a query ran to the end or stopped on cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Done,
    Cancelled,
}

/// Relation addressed by a later per-relation query.
struct Target {
    is_table: bool,
    schema: Option<String>,
    name: String,
}

/// The open connection plus the limits every query runs under.
struct Session<'a> {
    backend: Backend,
    connection: &'a mut dyn CatalogConnection,
    timeout: Duration,
    cancel: &'a CancellationToken,
}

impl Session<'_> {
    /// Stream one catalog query into `each`, checking the token before every row.
    async fn stream<F>(&mut self, sql: &str, mut each: F) -> Result<Flow>
    where
        F: FnMut(CatalogRow) + Send,
    {
        let parameters = Parameters::new();
        let deadline = tokio::time::Instant::now() + self.timeout;
        let mut rows = self.connection.fetch(sql, &parameters);
        let mut count = 0usize;

        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::debug!(backend = %self.backend, rows = count, "catalog query cancelled");
                    return Ok(Flow::Cancelled);
                }
                next = tokio::time::timeout_at(deadline, rows.next()) => next,
            };

            match next {
                Err(_) => {
                    return Err(DbPrismError::Timeout {
                        backend: self.backend,
                        query: summarize(sql),
                        timeout_secs: self.timeout.as_secs(),
                    })
                }
                Ok(None) => break,
                Ok(Some(row)) => {
                    each(row?);
                    count += 1;
                }
            }
        }

        tracing::trace!(backend = %self.backend, rows = count, "catalog query finished");
        Ok(Flow::Done)
    }

    /// Driver reflection under the same timeout and token.
    async fn metadata(&mut self, kind: MetadataKind) -> Result<Option<Vec<CatalogRow>>> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Ok(None),
            rows = tokio::time::timeout(self.timeout, self.connection.metadata(kind)) => match rows {
                Ok(rows) => rows.map(Some),
                Err(_) => Err(DbPrismError::Timeout {
                    backend: self.backend,
                    query: format!("metadata {:?}", kind),
                    timeout_secs: self.timeout.as_secs(),
                }),
            },
        }
    }

    /// Run an enrichment query, logging and swallowing any failure.
    async fn optional<F>(&mut self, phase: &'static str, sql: &str, each: F) -> Flow
    where
        F: FnMut(CatalogRow) + Send,
    {
        match self.stream(sql, each).await {
            Ok(flow) => flow,
            Err(e) => {
                tracing::warn!(backend = %self.backend, phase, error = %e, "catalog query failed, continuing without it");
                Flow::Done
            }
        }
    }
}

/// Collapsed, shortened SQL for error messages.
fn summarize(sql: &str) -> String {
    let flat = normalize_whitespace(sql.trim());
    match flat.char_indices().nth(160) {
        Some((index, _)) => format!("{}...", &flat[..index]),
        None => flat,
    }
}

fn to_u32(value: Option<i64>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}

/// Reads catalogs described by one [`BackendProfile`].
#[derive(Debug, Clone, Copy)]
pub struct SchemaReader {
    profile: &'static BackendProfile,
}

impl SchemaReader {
    pub fn new(profile: &'static BackendProfile) -> Self {
        Self { profile }
    }

    pub fn for_backend(backend: Backend) -> Self {
        Self::new(BackendProfile::for_backend(backend))
    }

    pub fn profile(&self) -> &'static BackendProfile {
        self.profile
    }

    /// Read a snapshot over a new connection from `provider`.
    ///
    /// Each catalog query is bounded by `timeout`. A cancelled token yields
    /// the partial snapshot, not an error.
    pub async fn read(
        &self,
        provider: &dyn Provider,
        options: &SchemaOptions,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<SchemaSnapshot> {
        let backend = self.profile.backend;
        let mut snapshot = SchemaSnapshot::new(backend);

        if cancel.is_cancelled() {
            tracing::debug!(%backend, "schema read cancelled before connecting");
            return Ok(snapshot);
        }

        tracing::info!(%backend, "reading schema");
        let mut connection = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(snapshot),
            opened = provider.open() => opened.map_err(|e| match e {
                e @ DbPrismError::Connection { .. } => e,
                other => DbPrismError::connection(
                    backend,
                    provider.connection_string(),
                    "could not open a catalog connection",
                    other,
                ),
            })?,
        };

        let mut session = Session {
            backend,
            connection: connection.as_mut(),
            timeout,
            cancel,
        };
        let result = self.read_phases(&mut session, &mut snapshot, options).await;

        if let Err(e) = connection.close().await {
            tracing::warn!(%backend, error = %e, "failed to close catalog connection");
        }
        result?;

        tracing::info!(
            %backend,
            tables = snapshot.table_count(),
            views = snapshot.view_count(),
            fields = snapshot.field_count(),
            routines = snapshot.routines().len(),
            triggers = snapshot.triggers().len(),
            "schema read complete"
        );
        Ok(snapshot)
    }

    async fn read_phases(
        &self,
        session: &mut Session<'_>,
        snapshot: &mut SchemaSnapshot,
        options: &SchemaOptions,
    ) -> Result<()> {
        if options.include_tables || options.include_views {
            if self.read_relations(session, snapshot, options).await? == Flow::Cancelled {
                return Ok(());
            }
            if options.include_views
                && self.read_view_definitions(session, snapshot).await == Flow::Cancelled
            {
                return Ok(());
            }
            if options.include_tables {
                let flow = self.read_constraints(session, snapshot).await;
                snapshot.resolve_constraints();
                if flow == Flow::Cancelled {
                    return Ok(());
                }
            }
            if options.include_descriptions
                && self.read_descriptions(session, snapshot).await == Flow::Cancelled
            {
                return Ok(());
            }
        }
        if options.include_triggers
            && self.read_triggers(session, snapshot, options).await == Flow::Cancelled
        {
            return Ok(());
        }
        if options.include_routines {
            self.read_routines(session, snapshot, options).await;
        }
        Ok(())
    }

    /// Table/view attributes of a row, or `None` when options filter it out.
    fn relation_target(&self, row: &CatalogRow, options: &SchemaOptions) -> Option<Target> {
        let name = row.text("table_name")?;
        let schema = row.text_any(&["table_schema", "table_schem"]);
        let is_table = !row
            .text("table_type")
            .is_some_and(|kind| same_name(&kind, "VIEW"));
        if (is_table && !options.include_tables) || (!is_table && !options.include_views) {
            return None;
        }
        if !options.include_system_data && self.profile.is_system(schema.as_deref(), &name) {
            return None;
        }
        Some(Target {
            is_table,
            schema,
            name,
        })
    }

    /// Find-or-create the target's relation and copy table-level attributes onto it.
    fn fold_relation(
        &self,
        snapshot: &mut SchemaSnapshot,
        target: &Target,
        row: &CatalogRow,
        options: &SchemaOptions,
    ) {
        let is_system = self.profile.is_system(target.schema.as_deref(), &target.name);
        let Some(relation) =
            snapshot.add_relation(target.is_table, target.schema.as_deref(), &target.name)
        else {
            return;
        };
        relation.is_system = is_system;
        if let Some(catalog) = row.text_any(&["table_catalog", "table_cat"]) {
            relation.catalog = Some(catalog);
        }
        if let Some(created) = row.timestamp("created_at") {
            relation.created_at = Some(created);
        }
        if let Some(updated) = row.timestamp("updated_at") {
            relation.updated_at = Some(updated);
        }
        if options.include_descriptions {
            if let Some(description) = row.text_any(&["table_description", "remarks"]) {
                relation.description = Some(description);
            }
        }
    }

    fn field_from_row(&self, row: &CatalogRow, options: &SchemaOptions) -> Option<Field> {
        let name = row.text("column_name")?;
        // ODBC reflection reports DATA_TYPE as a numeric code next to TYPE_NAME.
        let db_type = row.text_any(&["type_name", "data_type"]);
        let field_type = db_type
            .as_deref()
            .map(|token| self.profile.type_map().map(token))
            .unwrap_or_default();

        let mut field = Field::new(name, field_type, db_type);
        field.length = to_u32(row.int_any(&["character_maximum_length", "column_size"])).unwrap_or(0);
        field.is_key = row.flag("is_primary_key");
        field.is_required = row
            .text("is_nullable")
            .is_some_and(|nullable| same_name(&nullable, "NO"));
        field.is_identity = row.flag("is_identity");
        field.ordinal_position = to_u32(row.int("ordinal_position")).unwrap_or(0);
        field.default = row.text_any(&["column_default", "column_def"]);
        field.numeric_precision = to_u32(row.int("numeric_precision"));
        field.numeric_precision_radix = to_u32(row.int("numeric_precision_radix"));
        field.numeric_scale = to_u32(row.int("numeric_scale"));
        field.datetime_precision = to_u32(row.int("datetime_precision"));
        field.character_set_name = row.text("character_set_name");
        field.collation_catalog = row.text("collation_catalog");
        field.collation_schema = row.text("collation_schema");
        field.collation_name = row.text("collation_name");
        if options.include_descriptions {
            field.description = row.text("column_description");
        }
        Some(field)
    }

    async fn read_relations(
        &self,
        session: &mut Session<'_>,
        snapshot: &mut SchemaSnapshot,
        options: &SchemaOptions,
    ) -> Result<Flow> {
        let backend = self.profile.backend;
        let main_query_failed = |sql: &str, e: DbPrismError| match e {
            timeout @ DbPrismError::Timeout { .. } => timeout,
            other => DbPrismError::Introspection {
                backend,
                query: summarize(sql),
                source: Box::new(other),
            },
        };

        match self.profile.tables {
            TableSource::Joined { sql } => {
                tracing::debug!(%backend, "reading tables and columns");
                session
                    .stream(sql, |row| {
                        let Some(target) = self.relation_target(&row, options) else {
                            return;
                        };
                        self.fold_relation(snapshot, &target, &row, options);
                        if let Some(field) = self.field_from_row(&row, options) {
                            snapshot.add_field(
                                target.is_table,
                                target.schema.as_deref(),
                                &target.name,
                                field,
                            );
                        }
                    })
                    .await
                    .map_err(|e| main_query_failed(sql, e))
            }
            TableSource::ListThenColumns {
                list_sql,
                columns_sql,
            } => {
                tracing::debug!(%backend, "listing relations");
                let mut targets = Vec::new();
                let flow = session
                    .stream(list_sql, |row| {
                        if let Some(target) = self.relation_target(&row, options) {
                            self.fold_relation(snapshot, &target, &row, options);
                            targets.push(target);
                        }
                    })
                    .await
                    .map_err(|e| main_query_failed(list_sql, e))?;
                if flow == Flow::Cancelled {
                    return Ok(flow);
                }

                tracing::debug!(%backend, relations = targets.len(), "reading columns per relation");
                for target in &targets {
                    let sql = render_template(
                        columns_sql,
                        &[
                            ("schema", target.schema.as_deref().unwrap_or("")),
                            ("table", &target.name),
                        ],
                    );
                    let flow = session
                        .optional("columns", &sql, |row| {
                            if let Some(field) = self.field_from_row(&row, options) {
                                snapshot.add_field(
                                    target.is_table,
                                    target.schema.as_deref(),
                                    &target.name,
                                    field,
                                );
                            }
                        })
                        .await;
                    if flow == Flow::Cancelled {
                        return Ok(flow);
                    }
                }
                Ok(Flow::Done)
            }
            TableSource::Metadata => {
                tracing::debug!(%backend, "reflecting tables through driver metadata");
                let Some(tables) = session
                    .metadata(MetadataKind::Tables)
                    .await
                    .map_err(|e| main_query_failed("metadata Tables", e))?
                else {
                    return Ok(Flow::Cancelled);
                };
                for row in &tables {
                    if session.cancel.is_cancelled() {
                        return Ok(Flow::Cancelled);
                    }
                    let kind = row.text("table_type").unwrap_or_default().to_ascii_uppercase();
                    if kind != "TABLE" && kind != "VIEW" {
                        continue;
                    }
                    if let Some(target) = self.relation_target(row, options) {
                        self.fold_relation(snapshot, &target, row, options);
                    }
                }

                let Some(columns) = session
                    .metadata(MetadataKind::Columns)
                    .await
                    .map_err(|e| main_query_failed("metadata Columns", e))?
                else {
                    return Ok(Flow::Cancelled);
                };
                for row in &columns {
                    if session.cancel.is_cancelled() {
                        return Ok(Flow::Cancelled);
                    }
                    let (Some(name), Some(field)) =
                        (row.text("table_name"), self.field_from_row(row, options))
                    else {
                        continue;
                    };
                    let schema = row.text_any(&["table_schem", "table_schema"]);
                    if let Some(relation) = snapshot.relation_mut(schema.as_deref(), &name) {
                        relation.add_field(field);
                    }
                }
                Ok(Flow::Done)
            }
        }
    }

    async fn read_view_definitions(
        &self,
        session: &mut Session<'_>,
        snapshot: &mut SchemaSnapshot,
    ) -> Flow {
        let Some(sql) = self.profile.views_sql else {
            return Flow::Done;
        };
        if snapshot.views().is_empty() {
            return Flow::Done;
        }
        tracing::debug!(backend = %self.profile.backend, "reading view definitions");
        session
            .optional("views", sql, |row| {
                let Some(name) = row.text("table_name") else {
                    return;
                };
                let schema = row.text("table_schema");
                if let Some(view) = snapshot.views_mut().find_mut(schema.as_deref(), &name) {
                    view.definition = row.text("view_definition");
                    view.check_option = row.text("check_option");
                    view.is_updatable = row
                        .text("is_updatable")
                        .is_some_and(|updatable| !same_name(&updatable, "NO"));
                }
            })
            .await
    }

    async fn read_constraints(
        &self,
        session: &mut Session<'_>,
        snapshot: &mut SchemaSnapshot,
    ) -> Flow {
        let Some(sql) = self.profile.constraints_sql else {
            return Flow::Done;
        };
        if snapshot.tables().is_empty() {
            return Flow::Done;
        }
        tracing::debug!(backend = %self.profile.backend, "reading constraints");
        session
            .optional("constraints", sql, |row| {
                let (Some(table_name), Some(column)) = (row.text("table_name"), row.text("column_name"))
                else {
                    return;
                };
                let schema = row.text("table_schema");
                let Some(table) = snapshot.tables_mut().find_mut(schema.as_deref(), &table_name)
                else {
                    return;
                };
                table.constraints.push(Constraint {
                    catalog: row.text("table_catalog"),
                    schema,
                    table: table_name,
                    column,
                    name: row.text("constraint_name").unwrap_or_default(),
                    kind: row
                        .text("constraint_type")
                        .map(|kind| ConstraintKind::from_catalog(&kind))
                        .unwrap_or_default(),
                    position: to_u32(row.int("ordinal_position")).unwrap_or(0),
                });
            })
            .await
    }

    async fn read_descriptions(
        &self,
        session: &mut Session<'_>,
        snapshot: &mut SchemaSnapshot,
    ) -> Flow {
        let Some(sql) = self.profile.descriptions_sql else {
            return Flow::Done;
        };
        tracing::debug!(backend = %self.profile.backend, "reading descriptions");
        session
            .optional("descriptions", sql, |row| {
                let (Some(name), Some(description)) = (row.text("table_name"), row.text("description"))
                else {
                    return;
                };
                let schema = row.text("table_schema");
                let Some(relation) = snapshot.relation_mut(schema.as_deref(), &name) else {
                    return;
                };
                match row.text("column_name") {
                    Some(column) => {
                        if let Some(field) = relation.field_mut(&column) {
                            field.description = Some(description);
                        }
                    }
                    None => relation.description = Some(description),
                }
            })
            .await
    }

    fn trigger_flags(row: &CatalogRow) -> TriggerFlags {
        let mut flags = TriggerFlags::empty();
        for (name, flag) in TriggerFlags::all().iter_names() {
            if row.flag(&format!("flag_{}", name.to_ascii_lowercase())) {
                flags.insert(flag);
            }
        }
        if let Some(event) = row.text("event_manipulation") {
            match event.trim().to_ascii_uppercase().as_str() {
                "INSERT" => flags.insert(TriggerFlags::INSERT),
                "UPDATE" => flags.insert(TriggerFlags::UPDATE),
                "DELETE" => flags.insert(TriggerFlags::DELETE),
                _ => {}
            }
        }
        if let Some(timing) = row.text("action_timing") {
            match timing.trim().to_ascii_uppercase().as_str() {
                "AFTER" => flags.insert(TriggerFlags::AFTER),
                "BEFORE" => flags.insert(TriggerFlags::BEFORE),
                "INSTEAD OF" => flags.insert(TriggerFlags::INSTEAD_OF),
                _ => {}
            }
        }
        flags
    }

    async fn read_triggers(
        &self,
        session: &mut Session<'_>,
        snapshot: &mut SchemaSnapshot,
        options: &SchemaOptions,
    ) -> Flow {
        let Some(sql) = self.profile.triggers_sql else {
            return Flow::Done;
        };
        tracing::debug!(backend = %self.profile.backend, "reading triggers");
        let flow = session
            .optional("triggers", sql, |row| {
                let (Some(table), Some(name)) = (row.text("table_name"), row.text("trigger_name"))
                else {
                    return;
                };
                let schema = row.text("table_schema");
                if !options.include_system_data && self.profile.is_system(schema.as_deref(), &table) {
                    return;
                }
                snapshot.add_trigger(Trigger {
                    catalog: row.text("table_catalog"),
                    schema,
                    table,
                    name,
                    user_name: row.text("user_name"),
                    category: row
                        .int("category")
                        .and_then(|c| i32::try_from(c).ok())
                        .unwrap_or(0),
                    flags: Self::trigger_flags(&row),
                    created_at: row.timestamp("created_at"),
                    date_reference: row.timestamp("date_reference"),
                    content: row.text("content").unwrap_or_default(),
                });
            })
            .await;
        if flow == Flow::Cancelled {
            return flow;
        }

        let Some(template) = self.profile.help_text_sql else {
            return Flow::Done;
        };
        // One round-trip per trigger.
        let names: Vec<(Option<String>, String)> = snapshot
            .triggers()
            .iter()
            .map(|t| (t.schema.clone(), t.name.clone()))
            .collect();
        for (index, (schema, name)) in names.iter().enumerate() {
            let schema = schema.as_deref().unwrap_or("");
            let qualified = if schema.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", schema, name)
            };
            let sql = render_template(
                template,
                &[("schema", schema), ("name", name), ("qualified_name", &qualified)],
            );
            let mut text = String::new();
            let result = session
                .stream(&sql, |row| {
                    if let Some(line) = row.first().and_then(RowValue::as_text) {
                        text.push_str(&line);
                        if !line.ends_with('\n') {
                            text.push('\n');
                        }
                    }
                })
                .await;
            match result {
                Ok(Flow::Done) => snapshot.triggers_mut()[index].content = text,
                Ok(Flow::Cancelled) => return Flow::Cancelled,
                Err(e) => {
                    tracing::warn!(
                        backend = %self.profile.backend,
                        trigger = %name,
                        error = %e,
                        "could not read trigger text"
                    );
                }
            }
        }
        Flow::Done
    }

    async fn read_routines(
        &self,
        session: &mut Session<'_>,
        snapshot: &mut SchemaSnapshot,
        options: &SchemaOptions,
    ) -> Flow {
        let Some(sql) = self.profile.routines_sql else {
            return Flow::Done;
        };
        tracing::debug!(backend = %self.profile.backend, "reading routines");
        session
            .optional("routines", sql, |row| {
                let Some(name) = row.text("routine_name") else {
                    return;
                };
                let schema = row.text("routine_schema");
                if !options.include_system_data && self.profile.is_system(schema.as_deref(), &name) {
                    return;
                }
                snapshot.add_routine(Routine {
                    catalog: row.text("routine_catalog"),
                    schema,
                    name,
                    kind: row
                        .text("routine_type")
                        .map(|kind| RoutineKind::from_catalog(&kind))
                        .unwrap_or_default(),
                    content: row.text("routine_definition").unwrap_or_default(),
                });
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_collapses_and_truncates() {
        assert_eq!(summarize("  SELECT *\n\tFROM t  "), "SELECT * FROM t");
        let long = format!("SELECT {} FROM t", "a, ".repeat(100));
        let summary = summarize(&long);
        assert!(summary.ends_with("..."));
        assert_eq!(summary.chars().count(), 163);
    }

    #[test]
    fn test_trigger_flags_from_property_columns() {
        let row = CatalogRow::new()
            .with("flag_after", 1i64)
            .with("flag_insert", true)
            .with("flag_disabled", 0i64);
        let flags = SchemaReader::trigger_flags(&row);
        assert_eq!(flags, TriggerFlags::AFTER | TriggerFlags::INSERT);
    }

    #[test]
    fn test_trigger_flags_from_event_and_timing() {
        let row = CatalogRow::new()
            .with("event_manipulation", "UPDATE")
            .with("action_timing", "BEFORE");
        assert_eq!(
            SchemaReader::trigger_flags(&row),
            TriggerFlags::UPDATE | TriggerFlags::BEFORE
        );

        let row = CatalogRow::new().with("action_timing", "instead of");
        assert_eq!(SchemaReader::trigger_flags(&row), TriggerFlags::INSTEAD_OF);
    }

    #[test]
    fn test_field_from_row_reads_canonical_columns() {
        let reader = SchemaReader::for_backend(Backend::SqlServer);
        let row = CatalogRow::new()
            .with("column_name", "Price")
            .with("data_type", "decimal")
            .with("is_nullable", "NO")
            .with("ordinal_position", 3i64)
            .with("numeric_precision", 18i64)
            .with("numeric_scale", 2i64)
            .with("character_maximum_length", RowValue::Null);
        let field = reader.field_from_row(&row, &SchemaOptions::default()).unwrap();
        assert_eq!(field.name, "Price");
        assert_eq!(field.field_type, crate::schema::types::FieldType::Decimal);
        assert!(field.is_required);
        assert_eq!(field.ordinal_position, 3);
        assert_eq!(field.numeric_precision, Some(18));
        assert_eq!(field.numeric_scale, Some(2));
        assert_eq!(field.length, 0);
    }

    #[test]
    fn test_field_from_row_prefers_odbc_type_name() {
        let reader = SchemaReader::for_backend(Backend::Odbc);
        let row = CatalogRow::new()
            .with("COLUMN_NAME", "Id")
            .with("DATA_TYPE", 4i64)
            .with("TYPE_NAME", "int")
            .with("COLUMN_SIZE", 10i64)
            .with("IS_NULLABLE", "NO");
        let field = reader.field_from_row(&row, &SchemaOptions::default()).unwrap();
        assert_eq!(field.db_type.as_deref(), Some("int"));
        assert_eq!(field.field_type, crate::schema::types::FieldType::Integer);
        assert_eq!(field.length, 10);
        assert!(field.is_required);
    }

    #[test]
    fn test_nullable_length_of_max_is_zero() {
        let reader = SchemaReader::for_backend(Backend::SqlServer);
        let row = CatalogRow::new()
            .with("column_name", "Notes")
            .with("data_type", "nvarchar")
            .with("is_nullable", "YES")
            .with("character_maximum_length", -1i64);
        let field = reader.field_from_row(&row, &SchemaOptions::default()).unwrap();
        assert_eq!(field.length, 0);
        assert!(!field.is_required);
    }

    #[test]
    fn test_relation_target_respects_options() {
        let reader = SchemaReader::for_backend(Backend::PostgreSql);
        let view = CatalogRow::new()
            .with("table_schema", "public")
            .with("table_name", "active_users")
            .with("table_type", "VIEW");
        let system = CatalogRow::new()
            .with("table_schema", "pg_catalog")
            .with("table_name", "pg_class")
            .with("table_type", "TABLE");

        let defaults = SchemaOptions::default();
        assert!(!reader.relation_target(&view, &defaults).unwrap().is_table);
        assert!(reader.relation_target(&system, &defaults).is_none());

        let no_views = SchemaOptions {
            include_views: false,
            ..SchemaOptions::default()
        };
        assert!(reader.relation_target(&view, &no_views).is_none());

        let with_system = SchemaOptions {
            include_system_data: true,
            ..SchemaOptions::default()
        };
        assert!(reader.relation_target(&system, &with_system).is_some());
    }
}
