//! Index model.

/// A table index.
///
/// Single-column unique indexes are normally folded into the column's
/// own `unique()` clause during structure assembly and never reach
/// the index list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    /// Index name.
    pub name: String,
    /// Indexed columns, in index order.
    pub columns: Vec<String>,
    /// Whether the index enforces uniqueness.
    pub unique: bool,
}
