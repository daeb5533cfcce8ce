//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Build the include table (embedded or from `jsonapi.include_table`)
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - A relative `include_table` path is resolved against the config file's directory

use std::path::{Path, PathBuf};

use crate::config::{load_config, ConfigError, GatewayConfig};
use crate::includes::{IncludeTable, TableError};

/// Load and validate the configuration file, or fall back to defaults.
pub fn load_configuration(config_path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    match config_path {
        Some(path) => load_config(path),
        None => Ok(GatewayConfig::default()),
    }
}

/// Build the include table named by the configuration, or the embedded one.
pub fn build_table(
    config: &GatewayConfig,
    config_path: Option<&Path>,
) -> Result<IncludeTable, TableError> {
    let table = match &config.jsonapi.include_table {
        Some(table_path) => {
            let resolved = resolve_relative(table_path, config_path);
            tracing::info!(path = ?resolved, "Loading include table");
            IncludeTable::load(&resolved)?
        }
        None => IncludeTable::embedded()?,
    };

    tracing::info!(
        path_prefix = %config.jsonapi.path_prefix,
        entries = table.len(),
        "Include table ready"
    );
    if config.jsonapi.path_prefix.is_empty() {
        tracing::warn!("jsonapi.path_prefix is empty, include injection disabled");
    }

    Ok(table)
}

fn resolve_relative(path: &Path, config_path: Option<&Path>) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    config_path
        .and_then(Path::parent)
        .map(|dir| dir.join(path))
        .unwrap_or_else(|| path.to_path_buf())
}
