//! Connection and table registry
//!
//! Per VERSIONING.md §3, there is exactly one authoritative version
//! store per table identity. The connection owns that guarantee: it
//! keeps a registry of shared stores keyed by table name and hands out
//! handles holding `Arc`s into it, so every handle on a table commits
//! through the same compare-and-swap point.
//!
//! Layout on disk: `<root>/<table>/_versions/` for snapshot manifests,
//! `<root>/<table>/_data/` for row files.

mod errors;

pub use errors::{ConnectionError, ConnectionResult};

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::observability::Logger;
use crate::storage::{Row, RowBackend};
use crate::table::Table;
use crate::version::VersionStore;

/// Behavior of `create_table` when the table already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateTableMode {
    /// Fail with `TableExists` if the table is already there.
    Create,
    /// Drop any existing table state first, then create fresh.
    Overwrite,
}

/// Shared per-table state handed to every handle.
#[derive(Clone)]
struct TableShared {
    store: Arc<VersionStore>,
    backend: Arc<RowBackend>,
}

/// A connection to a database root directory.
pub struct Connection {
    /// Root directory holding one subdirectory per table
    root: PathBuf,
    /// One shared store per table identity
    tables: Mutex<HashMap<String, TableShared>>,
}

/// Connects to a database directory, creating it if missing.
pub fn connect(path: impl AsRef<Path>) -> ConnectionResult<Connection> {
    let root = path.as_ref().to_path_buf();
    if !root.exists() {
        fs::create_dir_all(&root).map_err(|e| {
            ConnectionError::io(format!("Failed to create database root: {}", root.display()), e)
        })?;
    }
    Logger::info("CONNECTED", &[("root", &root.display().to_string())]);
    Ok(Connection {
        root,
        tables: Mutex::new(HashMap::new()),
    })
}

impl Connection {
    /// Returns the database root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates a table with initial rows; the initial commit is version 1.
    pub fn create_table(
        &self,
        name: &str,
        rows: Vec<Row>,
        mode: CreateTableMode,
    ) -> ConnectionResult<Table> {
        validate_table_name(name)?;
        let table_dir = self.root.join(name);

        let mut tables = self.tables.lock().unwrap();

        if tables.contains_key(name) || table_dir.exists() {
            match mode {
                CreateTableMode::Create => {
                    return Err(ConnectionError::TableExists {
                        name: name.to_string(),
                    });
                }
                CreateTableMode::Overwrite => {
                    tables.remove(name);
                    if table_dir.exists() {
                        fs::remove_dir_all(&table_dir).map_err(|e| {
                            ConnectionError::io(
                                format!("Failed to drop table directory: {}", table_dir.display()),
                                e,
                            )
                        })?;
                    }
                }
            }
        }

        fs::create_dir_all(&table_dir).map_err(|e| {
            ConnectionError::io(
                format!("Failed to create table directory: {}", table_dir.display()),
                e,
            )
        })?;

        let store = Arc::new(VersionStore::open(&table_dir, name)?);
        let backend = Arc::new(RowBackend::open(&table_dir)?);

        let row_count = rows.len() as u64;
        let (data_ref, checksum) = backend.write_rows(&rows)?;
        store.commit(0, data_ref, checksum, row_count)?;

        tables.insert(
            name.to_string(),
            TableShared {
                store: Arc::clone(&store),
                backend: Arc::clone(&backend),
            },
        );

        Logger::info(
            "TABLE_CREATED",
            &[("table", name), ("row_count", &row_count.to_string())],
        );

        Ok(Table::new(name, store, backend))
    }

    /// Opens a new handle onto an existing table.
    ///
    /// Handles share the per-table store: two handles from the same
    /// connection observe each other's commits immediately.
    pub fn open_table(&self, name: &str) -> ConnectionResult<Table> {
        validate_table_name(name)?;

        let mut tables = self.tables.lock().unwrap();
        if let Some(shared) = tables.get(name) {
            return Ok(Table::new(
                name,
                Arc::clone(&shared.store),
                Arc::clone(&shared.backend),
            ));
        }

        let table_dir = self.root.join(name);
        if !table_dir.is_dir() {
            return Err(ConnectionError::TableNotFound {
                name: name.to_string(),
            });
        }

        let store = Arc::new(VersionStore::open(&table_dir, name)?);
        let backend = Arc::new(RowBackend::open(&table_dir)?);
        tables.insert(
            name.to_string(),
            TableShared {
                store: Arc::clone(&store),
                backend: Arc::clone(&backend),
            },
        );

        Ok(Table::new(name, store, backend))
    }

    /// Lists table names under the root, sorted.
    pub fn table_names(&self) -> ConnectionResult<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| {
            ConnectionError::io(
                format!("Failed to read database root: {}", self.root.display()),
                e,
            )
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                ConnectionError::io(
                    format!("Failed to read database root: {}", self.root.display()),
                    e,
                )
            })?;
            if entry.path().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Table names become directory names; keep them unambiguous.
fn validate_table_name(name: &str) -> ConnectionResult<()> {
    if name.is_empty() {
        return Err(ConnectionError::InvalidTableName {
            name: name.to_string(),
            reason: "name is empty",
        });
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ConnectionError::InvalidTableName {
            name: name.to_string(),
            reason: "only ASCII alphanumerics, '_' and '-' are allowed",
        });
    }
    Ok(())
}
