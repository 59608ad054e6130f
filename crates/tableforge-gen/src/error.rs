//! Error types for the generation pipeline.

use std::path::PathBuf;

use tableforge_core::StructureError;

/// Errors that can occur while generating migration files.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// The requested dialect name is not recognized.
    #[error(transparent)]
    UnknownDialect(#[from] tableforge_core::ParseDialectError),

    /// A requested table is missing from the schema snapshot.
    #[error("Table '{0}' not found in the schema snapshot")]
    UnknownTable(String),

    /// The snapshot contained inconsistent records.
    #[error("Invalid schema for table: {0}")]
    Structure(#[from] StructureError),

    /// A migration file with the generated name already exists.
    #[error("Migration file already exists: {0}")]
    MigrationExists(PathBuf),

    /// IO error reading snapshots or writing migration files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot file is not valid JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, GeneratorError>;
