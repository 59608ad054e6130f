//! Primary key model.

/// Primary key of a table: the ordered member columns plus the
/// constraint name when the database reports one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKey {
    /// Reported constraint name, if any.
    pub name: Option<String>,
    /// Member columns in key order.
    pub columns: Vec<String>,
}

impl PrimaryKey {
    /// Constraint name used when the database does not report one.
    pub const GENERIC_NAME: &'static str = "PRIMARYKEY";

    /// Creates a primary key over the given columns.
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            name: None,
            columns,
        }
    }

    /// Returns the constraint name, falling back to
    /// [`PrimaryKey::GENERIC_NAME`].
    #[must_use]
    pub fn constraint_name(&self) -> &str {
        self.name.as_deref().unwrap_or(Self::GENERIC_NAME)
    }

    /// Whether the key spans more than one column.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.columns.len() > 1
    }

    /// Whether the named column is part of the key.
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|member| member == column)
    }
}
