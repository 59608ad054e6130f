//! Error types for structure assembly.

/// Errors raised while assembling a table structure from raw records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    /// The same column name appeared twice in one table.
    #[error("table '{table}' declares column '{column}' more than once")]
    DuplicateColumn {
        /// Table being assembled.
        table: String,
        /// Offending column name.
        column: String,
    },

    /// A constraint referenced a column the table does not have.
    #[error("{kind} '{name}' on table '{table}' references unknown column '{column}'")]
    UnknownColumn {
        /// Table being assembled.
        table: String,
        /// Constraint kind, e.g. "primary key" or "index".
        kind: &'static str,
        /// Constraint name.
        name: String,
        /// Missing column name.
        column: String,
    },
}
