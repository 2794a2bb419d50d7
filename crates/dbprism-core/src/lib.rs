pub mod backend;
pub mod config;
pub mod dialect;
pub mod error;
pub mod provider;
pub mod schema;

// Re-export key types for convenience
pub use backend::{backend_from_url, Backend};
pub use dialect::{dialect_for, Parameter, ParameterValue, Parameters, SqlDialect};
pub use error::{DbPrismError, Result};
pub use provider::{CatalogConnection, CatalogRow, Provider, RowValue, SqlxProvider};
pub use schema::reader::{get_schema, SchemaReader};
pub use schema::snapshot::SchemaSnapshot;
pub use schema::types::{FieldType, SchemaOptions};
