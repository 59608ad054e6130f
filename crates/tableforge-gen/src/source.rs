//! Schema snapshot loading.

use std::fs;
use std::path::Path;

use tracing::debug;

use tableforge_core::record::{SchemaSnapshot, SchemaSource, TableRecord};

use crate::error::{GeneratorError, Result};

/// A schema snapshot loaded from a JSON file.
///
/// The file is the serialized form of [`SchemaSnapshot`], as written
/// by an introspection tool.
#[derive(Debug, Clone)]
pub struct SchemaFile {
    snapshot: SchemaSnapshot,
}

impl SchemaFile {
    /// Reads and parses a snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading schema snapshot from {}", path.display());
        let raw = fs::read_to_string(path)?;
        let snapshot: SchemaSnapshot = serde_json::from_str(&raw)?;
        debug!("Snapshot contains {} table(s)", snapshot.tables.len());
        Ok(Self { snapshot })
    }

    /// Borrows the parsed snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &SchemaSnapshot {
        &self.snapshot
    }

    /// Consumes the file wrapper, returning the snapshot.
    #[must_use]
    pub fn into_snapshot(self) -> SchemaSnapshot {
        self.snapshot
    }
}

impl SchemaSource for SchemaFile {
    type Error = GeneratorError;

    fn table_names(&self) -> Result<Vec<String>> {
        Ok(self
            .snapshot
            .tables
            .iter()
            .map(|table| table.name.clone())
            .collect())
    }

    fn table(&self, name: &str) -> Result<Option<TableRecord>> {
        Ok(self.snapshot.table(name).cloned())
    }
}
