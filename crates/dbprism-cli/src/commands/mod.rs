pub mod introspect;
pub mod sql;

use std::path::Path;

use anyhow::Result;
use dbprism_core::config::{read_config, DbPrismConfig};

/// `dbprism.toml` from the working directory, or defaults when there is none.
pub fn load_config() -> Result<DbPrismConfig> {
    Ok(read_config(Path::new("."))?.unwrap_or_default())
}
