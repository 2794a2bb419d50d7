use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};

use dbprism_core::Backend;

#[derive(Parser, Debug)]
#[command(
    name = "dbprism",
    about = "Read any database's catalog into one schema model and rewrite SQL per dialect",
    version,
    after_help = "Examples:\n  dbprism introspect --db postgres://localhost/erp\n  dbprism introspect --format json --no-routines     # URL from DATABASE_URL or .env\n  dbprism paginate --backend sqlserver --page 3 --size 25 \"SELECT * FROM Orders ORDER BY Id\"\n  dbprism count --backend mysql \"SELECT * FROM orders ORDER BY id\"\n  dbprism inline --backend postgres \"SELECT * FROM t WHERE id = @id\" --param id=42"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read a database's catalog and display its schema
    Introspect(IntrospectArgs),

    /// Rewrite a query to return one page of rows
    Paginate(PaginateArgs),

    /// Wrap a query so it returns its row count
    Count(CountArgs),

    /// Substitute parameter literals into a query
    Inline(InlineArgs),
}

#[derive(Parser, Debug)]
pub struct IntrospectArgs {
    /// Database connection URL (postgres://, mysql://, sqlite://)
    /// Falls back to DATABASE_URL env var, .env file or dbprism.toml
    #[arg(long, env = "DATABASE_URL")]
    pub db: Option<String>,

    /// Output format
    #[arg(long, default_value = "table")]
    pub format: IntrospectFormat,

    /// Skip views
    #[arg(long)]
    pub no_views: bool,

    /// Skip stored procedures and functions
    #[arg(long)]
    pub no_routines: bool,

    /// Skip triggers
    #[arg(long)]
    pub no_triggers: bool,

    /// Skip table and column descriptions
    #[arg(long)]
    pub no_descriptions: bool,

    /// Include system schemas (information_schema, pg_catalog, sys, ...)
    #[arg(long)]
    pub system: bool,

    /// Per-query timeout in seconds (default: dbprism.toml or 120)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

#[derive(Parser, Debug)]
pub struct PaginateArgs {
    /// Target backend (sqlserver, postgres, mysql, sqlite, odbc, duckdb, spark)
    #[arg(long, value_parser = parse_backend)]
    pub backend: Backend,

    /// Page number, starting at 1
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Rows per page
    #[arg(long, default_value = "50", value_parser = clap::value_parser!(u32).range(1..))]
    pub size: u32,

    /// Use ROW_NUMBER() pagination for SQL Server 2008 and older
    #[arg(long)]
    pub legacy: bool,

    /// The query to rewrite
    pub sql: String,
}

#[derive(Parser, Debug)]
pub struct CountArgs {
    /// Target backend
    #[arg(long, value_parser = parse_backend)]
    pub backend: Backend,

    /// The query to count
    pub sql: String,
}

#[derive(Parser, Debug)]
pub struct InlineArgs {
    /// Target backend
    #[arg(long, value_parser = parse_backend)]
    pub backend: Backend,

    /// The query containing named parameters
    pub sql: String,

    /// Parameter values (e.g., --param id=42 --param name='Ada')
    #[arg(long = "param", value_name = "NAME=VALUE")]
    pub params: Vec<String>,

    /// Print the positional form and its parameter list instead of literals
    #[arg(long)]
    pub positional: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum IntrospectFormat {
    Table,
    Json,
}

fn parse_backend(value: &str) -> Result<Backend, String> {
    Backend::from_str(value).map_err(|e| e.to_string())
}
