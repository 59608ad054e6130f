//! Foreign key model.

/// A foreign key constraint.
///
/// Referential actions are kept as the raw strings the introspection
/// provider reported (`CASCADE`, `SET NULL`, ...) and passed through
/// to the generated statement verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Constraint name.
    pub name: String,
    /// Local columns, in constraint order.
    pub columns: Vec<String>,
    /// Referenced table name.
    pub referenced_table: String,
    /// Referenced columns, matching `columns` positionally.
    pub referenced_columns: Vec<String>,
    /// Action on delete, if reported.
    pub on_delete: Option<String>,
    /// Action on update, if reported.
    pub on_update: Option<String>,
}
