//! Offline dialect commands: `paginate`, `count` and `inline`.
//!
//! None of these connect to a database; they print the SQL a backend would run.

use anyhow::{bail, Result};
use chrono::NaiveDate;

use dbprism_core::dialect::SqlServerDialect;
use dbprism_core::{dialect_for, Backend, ParameterValue, Parameters, SqlDialect};

use crate::args::{CountArgs, InlineArgs, PaginateArgs};

pub fn paginate(args: &PaginateArgs) -> Result<()> {
    let dialect: Box<dyn SqlDialect> = if args.backend == Backend::SqlServer {
        let legacy = args.legacy
            || super::load_config()?
                .dialect
                .sqlserver_legacy_pagination
                .unwrap_or(false);
        if legacy {
            Box::new(SqlServerDialect::legacy())
        } else {
            Box::new(SqlServerDialect::modern())
        }
    } else {
        if args.legacy {
            tracing::warn!(backend = %args.backend, "--legacy only applies to SQL Server, ignoring");
        }
        dialect_for(args.backend)
    };

    println!("{}", dialect.paginate(&args.sql, args.page - 1, args.size));
    Ok(())
}

pub fn count(args: &CountArgs) -> Result<()> {
    println!("{}", dialect_for(args.backend).count(&args.sql));
    Ok(())
}

pub fn inline(args: &InlineArgs) -> Result<()> {
    let dialect = dialect_for(args.backend);
    let parameters = parse_params(&args.params)?;

    if args.positional {
        let (sql, positional) = dialect.normalize_sql(&args.sql, &parameters);
        println!("{}", sql);
        for (index, parameter) in positional.iter().enumerate() {
            println!("  {}: {} = {}", index + 1, parameter.name(), parameter.value().to_sql_literal());
        }
    } else {
        println!("{}", dialect.inline_parameters(&args.sql, &parameters));
    }
    Ok(())
}

fn parse_params(raw: &[String]) -> Result<Parameters> {
    let mut parameters = Parameters::new();
    for item in raw {
        let Some((name, value)) = item.split_once('=') else {
            bail!("Invalid --param '{}': expected NAME=VALUE", item);
        };
        let name = name.trim();
        if name.is_empty() {
            bail!("Invalid --param '{}': parameter name is empty", item);
        }
        parameters.add(name, infer_value(value));
    }
    Ok(parameters)
}

/// Read a command-line value as the most specific literal it spells.
///
/// Quoting with `'...'` forces text.
fn infer_value(raw: &str) -> ParameterValue {
    let trimmed = raw.trim();
    if let Some(text) = trimmed
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        return ParameterValue::Text(text.to_string());
    }
    if trimmed.eq_ignore_ascii_case("null") {
        return ParameterValue::Null;
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return ParameterValue::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return ParameterValue::Bool(false);
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return ParameterValue::Int(int);
    }
    if let Ok(float) = trimmed.parse::<f64>() {
        if float.is_finite() {
            return ParameterValue::Float(float);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return ParameterValue::Date(date);
    }
    ParameterValue::Text(raw.to_string())
}
