use std::time::Duration;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table as ComfyTable};
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

use dbprism_core::config::DbPrismConfig;
use dbprism_core::error::DbPrismError;
use dbprism_core::schema::types::{Field, Relation};
use dbprism_core::{Provider, SchemaOptions, SchemaReader, SchemaSnapshot, SqlxProvider};

use crate::args::{IntrospectArgs, IntrospectFormat};

pub async fn run(args: &IntrospectArgs) -> Result<()> {
    let config = super::load_config()?;
    let db_url = resolve_db_url(args.db.as_deref(), &config)?;
    let provider = SqlxProvider::new(db_url.as_str())?;

    // An explicit backend picks the catalog profile even if the URL scheme differs.
    let backend = config.backend().unwrap_or_else(|| provider.backend());
    let options = schema_options(args, &config);
    let timeout = args
        .timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.timeout());

    let cancel = CancellationToken::new();
    let watcher = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            watcher.cancel();
        }
    });

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Reading {} catalog...", backend));
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = SchemaReader::for_backend(backend)
        .read(&provider, &options, timeout, &cancel)
        .await;
    pb.finish_and_clear();
    let snapshot = result.with_context(|| format!("Failed to read the {} schema", backend))?;

    if cancel.is_cancelled() {
        eprintln!("Interrupted: showing the partial schema read so far.");
    }

    match args.format {
        IntrospectFormat::Json => {
            let json = serde_json::to_string_pretty(&snapshot)?;
            println!("{}", json);
        }
        IntrospectFormat::Table => print_snapshot(&snapshot)?,
    }

    Ok(())
}

/// URL precedence: `--db` (or DATABASE_URL, which clap and dotenvy feed into
/// it), then `[database] url` from dbprism.toml.
fn resolve_db_url(explicit: Option<&str>, config: &DbPrismConfig) -> Result<String> {
    if let Some(url) = explicit {
        return Ok(url.to_string());
    }
    if let Ok(url) = std::env::var("DATABASE_URL") {
        return Ok(url);
    }
    if let Some(ref url) = config.database.url {
        return Ok(url.clone());
    }
    Err(DbPrismError::NoDatabaseUrl.into())
}

/// Config defaults with command-line switches applied on top.
fn schema_options(args: &IntrospectArgs, config: &DbPrismConfig) -> SchemaOptions {
    let mut options = config.schema_options();
    if args.no_views {
        options.include_views = false;
    }
    if args.no_routines {
        options.include_routines = false;
    }
    if args.no_triggers {
        options.include_triggers = false;
    }
    if args.no_descriptions {
        options.include_descriptions = false;
    }
    if args.system {
        options.include_system_data = true;
    }
    options
}

fn print_snapshot(snapshot: &SchemaSnapshot) -> Result<()> {
    println!("Backend: {}", snapshot.backend());
    println!(
        "Tables: {}  Views: {}  Columns: {}  Constraints: {}  Routines: {}  Triggers: {}",
        snapshot.table_count(),
        snapshot.view_count(),
        snapshot.field_count(),
        snapshot.constraint_count(),
        snapshot.routines().len(),
        snapshot.triggers().len()
    );
    println!("Fingerprint: {}", snapshot.fingerprint()?);
    println!();

    for table in snapshot.tables().iter() {
        print_relation("TABLE", &table.relation);
        if !table.constraints.is_empty() {
            let mut t = ComfyTable::new();
            t.set_header(vec!["Constraint", "Kind", "Column", "Position"]);
            for constraint in &table.constraints {
                t.add_row(vec![
                    Cell::new(&constraint.name),
                    Cell::new(format!("{:?}", constraint.kind)),
                    Cell::new(&constraint.column),
                    Cell::new(constraint.position),
                ]);
            }
            println!("{}", t);
        }
        println!();
    }

    for view in snapshot.views().iter() {
        print_relation("VIEW", &view.relation);
        if let Some(ref definition) = view.definition {
            println!("{}", definition.trim());
        }
        println!();
    }

    if !snapshot.routines().is_empty() {
        println!("━━━ Routines ━━━");
        let mut t = ComfyTable::new();
        t.set_header(vec!["Schema", "Name", "Kind", "Source"]);
        for routine in snapshot.routines() {
            t.add_row(vec![
                Cell::new(routine.schema.as_deref().unwrap_or("")),
                Cell::new(&routine.name),
                Cell::new(format!("{:?}", routine.kind)),
                Cell::new(if routine.content.is_empty() { "" } else { "yes" }),
            ]);
        }
        println!("{}", t);
        println!();
    }

    if !snapshot.triggers().is_empty() {
        println!("━━━ Triggers ━━━");
        let mut t = ComfyTable::new();
        t.set_header(vec!["Table", "Name", "Flags", "Source"]);
        for trigger in snapshot.triggers() {
            t.add_row(vec![
                Cell::new(&trigger.table),
                Cell::new(&trigger.name),
                Cell::new(trigger.flags.to_string()),
                Cell::new(if trigger.content.is_empty() { "" } else { "yes" }),
            ]);
        }
        println!("{}", t);
    }

    Ok(())
}

fn print_relation(kind: &str, relation: &Relation) {
    let system = if relation.is_system { " (system)" } else { "" };
    println!("━━━ {} {}{} ━━━", kind, relation.full_name(), system);
    if let Some(ref description) = relation.description {
        println!("{}", description);
    }

    let mut t = ComfyTable::new();
    t.set_header(vec!["Column", "Type", "Native", "Nullable", "PK", "FK", "Default"]);
    for field in relation.fields() {
        t.add_row(vec![
            Cell::new(&field.name),
            Cell::new(field.field_type.to_string()),
            Cell::new(native_type(field)),
            Cell::new(if field.is_required { "NO" } else { "YES" }),
            Cell::new(if field.is_key { "PK" } else { "" }),
            Cell::new(if field.is_foreign_key { "FK" } else { "" }),
            Cell::new(field.default.as_deref().unwrap_or("")),
        ]);
    }
    println!("{}", t);
}

/// `nvarchar(200)`, `decimal(18,2)`, `int identity`.
fn native_type(field: &Field) -> String {
    let mut native = field.db_type.clone().unwrap_or_default();
    if field.length > 0 {
        native.push_str(&format!("({})", field.length));
    } else if let (Some(precision), Some(scale)) = (field.numeric_precision, field.numeric_scale) {
        if scale > 0 {
            native.push_str(&format!("({},{})", precision, scale));
        }
    }
    if field.is_identity {
        native.push_str(" identity");
    }
    native
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbprism_core::FieldType;

    fn args() -> IntrospectArgs {
        IntrospectArgs {
            db: None,
            format: IntrospectFormat::Table,
            no_views: false,
            no_routines: false,
            no_triggers: false,
            no_descriptions: false,
            system: false,
            timeout: None,
        }
    }

    #[test]
    fn test_flags_override_config() {
        let config: DbPrismConfig =
            toml::from_str("[schema]\ninclude_views = true\ninclude_system_data = false\n").unwrap();
        let mut args = args();
        args.no_views = true;
        args.system = true;

        let options = schema_options(&args, &config);
        assert!(!options.include_views);
        assert!(options.include_system_data);
        assert!(options.include_tables);
    }

    #[test]
    fn test_config_applies_without_flags() {
        let config: DbPrismConfig = toml::from_str("[schema]\ninclude_routines = false\n").unwrap();
        let options = schema_options(&args(), &config);
        assert!(!options.include_routines);
        assert!(options.include_triggers);
    }

    #[test]
    fn test_explicit_url_wins() {
        let mut config = DbPrismConfig::default();
        config.database.url = Some("postgres://config/db".to_string());
        let url = resolve_db_url(Some("sqlite://flag.db"), &config).unwrap();
        assert_eq!(url, "sqlite://flag.db");
    }

    #[test]
    fn test_native_type_rendering() {
        let mut field = Field::new("Total", FieldType::Decimal, Some("decimal".to_string()));
        field.numeric_precision = Some(18);
        field.numeric_scale = Some(2);
        assert_eq!(native_type(&field), "decimal(18,2)");

        let mut field = Field::new("Name", FieldType::String, Some("nvarchar".to_string()));
        field.length = 200;
        assert_eq!(native_type(&field), "nvarchar(200)");

        let mut field = Field::new("Id", FieldType::Integer, Some("int".to_string()));
        field.is_identity = true;
        assert_eq!(native_type(&field), "int identity");
    }
}
