//! Raw schema records produced by an introspection provider.
//!
//! Records are the untyped wire form of a database schema: plain
//! names, raw type declarations and flags. The table factory turns
//! them into the typed structure model.

use serde::{Deserialize, Serialize};

use crate::table::column::DefaultValue;

/// One column as reported by introspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRecord {
    /// Column name.
    pub name: String,
    /// Raw type declaration, e.g. `int(11) unsigned` or `varchar(255)`.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Whether the column accepts NULL, when the provider says.
    #[serde(default)]
    pub nullable: Option<bool>,
    /// Display size or character length.
    #[serde(default)]
    pub size: Option<u32>,
    /// Numeric or fractional-seconds precision.
    #[serde(default)]
    pub precision: Option<u32>,
    /// Numeric scale.
    #[serde(default)]
    pub scale: Option<u32>,
    /// Unsigned flag.
    #[serde(default)]
    pub unsigned: bool,
    /// Auto-increment or identity flag.
    #[serde(default)]
    pub auto_increment: bool,
    /// Whether the provider reported the column as part of the
    /// primary key.
    #[serde(default)]
    pub primary_key: bool,
    /// Default value.
    #[serde(default)]
    pub default: Option<DefaultValue>,
    /// Check constraint expression.
    #[serde(default)]
    pub check: Option<String>,
    /// Raw SQL fragment to append to the rendered definition.
    #[serde(default)]
    pub append: Option<String>,
    /// Column comment.
    #[serde(default)]
    pub comment: Option<String>,
}

impl ColumnRecord {
    /// Creates a record carrying only a name and a raw type.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            nullable: None,
            size: None,
            precision: None,
            scale: None,
            unsigned: false,
            auto_increment: false,
            primary_key: false,
            default: None,
            check: None,
            append: None,
            comment: None,
        }
    }
}

/// Primary key constraint as reported by introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKeyRecord {
    /// Constraint name, if reported.
    #[serde(default)]
    pub name: Option<String>,
    /// Member columns in key order.
    pub columns: Vec<String>,
}

/// Foreign key constraint as reported by introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyRecord {
    /// Constraint name.
    pub name: String,
    /// Local columns.
    pub columns: Vec<String>,
    /// Referenced table.
    pub referenced_table: String,
    /// Referenced columns.
    pub referenced_columns: Vec<String>,
    /// Raw on-delete action.
    #[serde(default)]
    pub on_delete: Option<String>,
    /// Raw on-update action.
    #[serde(default)]
    pub on_update: Option<String>,
}

/// Index as reported by introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Index name.
    pub name: String,
    /// Indexed columns.
    pub columns: Vec<String>,
    /// Uniqueness flag.
    #[serde(default)]
    pub unique: bool,
}

/// One table as reported by introspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRecord {
    /// Table name, without any prefix handling applied.
    pub name: String,
    /// Columns in definition order.
    #[serde(default)]
    pub columns: Vec<ColumnRecord>,
    /// Primary key constraint, if any.
    #[serde(default)]
    pub primary_key: Option<PrimaryKeyRecord>,
    /// Foreign key constraints.
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyRecord>,
    /// Indexes, including the unique ones.
    #[serde(default)]
    pub indexes: Vec<IndexRecord>,
    /// Raw table options passed through to createTable, e.g. engine
    /// and charset clauses.
    #[serde(default)]
    pub options: Option<String>,
}

impl TableRecord {
    /// Creates an empty record for the named table.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: None,
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
            options: None,
        }
    }
}

/// A whole-schema snapshot: every table one introspection pass saw.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    /// Tables in the order the provider listed them.
    #[serde(default)]
    pub tables: Vec<TableRecord>,
}

impl SchemaSnapshot {
    /// Looks up a table by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&TableRecord> {
        self.tables.iter().find(|table| table.name == name)
    }

    /// Returns every table name in snapshot order.
    #[must_use]
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|table| table.name.as_str()).collect()
    }
}

/// Where schema snapshots come from.
///
/// The shipped implementation reads a JSON file; a live database
/// introspector plugs in here without touching the rendering code.
pub trait SchemaSource {
    /// Provider-specific failure type.
    type Error: std::error::Error;

    /// Names of every table available from this source.
    fn table_names(&self) -> Result<Vec<String>, Self::Error>;

    /// Reads one table's raw records, or `None` when the table does
    /// not exist.
    fn table(&self, name: &str) -> Result<Option<TableRecord>, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_record_fills_missing_fields() {
        let record: ColumnRecord =
            serde_json::from_str(r#"{"name": "id", "type": "int(11)"}"#).unwrap();
        assert_eq!(record.name, "id");
        assert_eq!(record.type_name, "int(11)");
        assert_eq!(record.nullable, None);
        assert!(!record.auto_increment);
        assert!(!record.primary_key);
        assert_eq!(record.default, None);
    }

    #[test]
    fn test_column_record_parses_scalar_default() {
        let record: ColumnRecord =
            serde_json::from_str(r#"{"name": "active", "type": "tinyint(1)", "default": true}"#)
                .unwrap();
        assert_eq!(record.default, Some(DefaultValue::Value("1".to_string())));
    }

    #[test]
    fn test_column_record_parses_expression_default() {
        let record: ColumnRecord = serde_json::from_str(
            r#"{"name": "created_at", "type": "timestamp", "default": {"expression": "CURRENT_TIMESTAMP"}}"#,
        )
        .unwrap();
        assert_eq!(
            record.default,
            Some(DefaultValue::Expression("CURRENT_TIMESTAMP".to_string()))
        );
    }

    #[test]
    fn test_table_record_deserializes_constraints() {
        let record: TableRecord = serde_json::from_str(
            r#"{
                "name": "posts",
                "columns": [
                    {"name": "id", "type": "int(11)", "primary_key": true, "auto_increment": true},
                    {"name": "author_id", "type": "int(11)", "nullable": false}
                ],
                "primary_key": {"columns": ["id"]},
                "foreign_keys": [
                    {
                        "name": "fk-posts-author_id",
                        "columns": ["author_id"],
                        "referenced_table": "users",
                        "referenced_columns": ["id"],
                        "on_delete": "CASCADE"
                    }
                ],
                "indexes": [
                    {"name": "idx-posts-author_id", "columns": ["author_id"]}
                ],
                "options": "ENGINE=InnoDB"
            }"#,
        )
        .unwrap();
        assert_eq!(record.columns.len(), 2);
        assert_eq!(
            record.primary_key.as_ref().map(|pk| pk.columns.as_slice()),
            Some(["id".to_string()].as_slice())
        );
        assert_eq!(record.foreign_keys[0].on_delete.as_deref(), Some("CASCADE"));
        assert_eq!(record.foreign_keys[0].on_update, None);
        assert!(!record.indexes[0].unique);
        assert_eq!(record.options.as_deref(), Some("ENGINE=InnoDB"));
    }

    #[test]
    fn test_snapshot_lookup() {
        let snapshot: SchemaSnapshot = serde_json::from_str(
            r#"{"tables": [{"name": "users", "columns": []}, {"name": "posts", "columns": []}]}"#,
        )
        .unwrap();
        assert_eq!(snapshot.table_names(), vec!["users", "posts"]);
        assert!(snapshot.table("users").is_some());
        assert!(snapshot.table("comments").is_none());
    }
}
