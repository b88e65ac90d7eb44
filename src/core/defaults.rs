use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::paths;
use crate::translit::{MappingTable, TableConfig};
use crate::utils::io;

/// Where the effective mapping table came from.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableSource {
    Builtin,
    File { path: String },
    /// The override file was present but unusable; built-ins were used instead.
    Fallback { path: String },
}

/// Effective table plus the configuration error that forced a fallback, if any.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: MappingTable,
    pub source: TableSource,
    pub warning: Option<crate::Error>,
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load the mapping table, falling back to built-ins on any configuration error.
///
/// An explicit path that cannot be read or parsed is reported as a warning.
/// Without an explicit path the default config file is used when it exists;
/// a missing default file is not a warning.
pub fn load_table(explicit: Option<&Path>) -> LoadedTable {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match paths::translit_config() {
            Ok(path) if path.exists() => path,
            _ => return builtin(),
        },
    };

    match load_table_from_file(&path) {
        Ok(table) => LoadedTable {
            table,
            source: TableSource::File {
                path: path.display().to_string(),
            },
            warning: None,
        },
        Err(err) => {
            log_status!(
                "table",
                "Ignoring {} ({}); using built-in table",
                path.display(),
                err.summary()
            );
            LoadedTable {
                table: MappingTable::builtin(),
                source: TableSource::Fallback {
                    path: path.display().to_string(),
                },
                warning: Some(err),
            }
        }
    }
}

/// Attempt to load a table override file.
pub fn load_table_from_file(path: &Path) -> crate::Result<MappingTable> {
    let content = io::read_file(path, &format!("read {}", path.display()))?;

    let config: TableConfig = serde_json::from_str(&content)
        .map_err(|e| crate::Error::config_invalid_json(path.display().to_string(), e))?;

    MappingTable::from_config(&config)
}

/// Get the built-in table (ignoring any file config)
pub fn builtin() -> LoadedTable {
    LoadedTable {
        table: MappingTable::builtin(),
        source: TableSource::Builtin,
        warning: None,
    }
}

/// Default override path, for display purposes
pub fn table_path() -> crate::Result<PathBuf> {
    paths::translit_config()
}
