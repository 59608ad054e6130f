//! Table structure: the assembled, render-ready model of one table.
//!
//! Assembly validates the raw records against each other (constraint
//! members must exist as columns) and folds single-column unique
//! indexes back into the column they cover.

use crate::dialect::Dialect;
use crate::error::StructureError;
use crate::record::TableRecord;

use super::column::Column;
use super::factory::build_column;
use super::foreign_key::ForeignKey;
use super::index::Index;
use super::primary_key::PrimaryKey;

/// Context shared by every structure built in one generator run.
#[derive(Debug, Clone, Default)]
pub struct StructureSettings {
    /// Target dialect.
    pub dialect: Dialect,
    /// Portable rendering mode: drop sizes and dialect-specific
    /// append clauses.
    pub general_schema: bool,
    /// Wrap table names in the `{{%name}}` prefix syntax.
    pub use_prefix: bool,
    /// Prefix stripped from table names before wrapping.
    pub db_prefix: String,
}

/// One table, assembled and ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct TableStructure {
    /// Table name as reported, prefix included.
    pub name: String,
    /// Target dialect.
    pub dialect: Dialect,
    /// Portable rendering mode.
    pub general_schema: bool,
    /// Whether rendered names use the prefix syntax.
    pub use_prefix: bool,
    /// Prefix stripped when wrapping names.
    pub db_prefix: String,
    /// Raw table options passed through to createTable.
    pub table_options: Option<String>,
    /// Primary key, if the table has one.
    pub primary_key: Option<PrimaryKey>,
    /// Columns in definition order.
    pub columns: Vec<Column>,
    /// Foreign keys in constraint order.
    pub foreign_keys: Vec<ForeignKey>,
    /// Indexes that survived unique-constraint folding.
    pub indexes: Vec<Index>,
}

impl TableStructure {
    /// Assembles a structure from one table's raw records.
    ///
    /// Columns keep record order. The primary key is taken from the
    /// dedicated record when present, otherwise synthesized from the
    /// per-column flags; either way the flags end up matching the
    /// key. Single-column unique indexes become the covered column's
    /// `unique` flag and are dropped from the index list, as is the
    /// index backing the primary key itself.
    pub fn from_record(
        record: &TableRecord,
        settings: &StructureSettings,
    ) -> Result<Self, StructureError> {
        let mut columns: Vec<Column> = Vec::with_capacity(record.columns.len());
        for column_record in &record.columns {
            if columns.iter().any(|column| column.name == column_record.name) {
                return Err(StructureError::DuplicateColumn {
                    table: record.name.clone(),
                    column: column_record.name.clone(),
                });
            }
            columns.push(build_column(column_record));
        }

        let primary_key = match &record.primary_key {
            Some(key_record) => {
                for member in &key_record.columns {
                    if !columns.iter().any(|column| &column.name == member) {
                        return Err(StructureError::UnknownColumn {
                            table: record.name.clone(),
                            kind: "primary key",
                            name: key_record
                                .name
                                .clone()
                                .unwrap_or_else(|| PrimaryKey::GENERIC_NAME.to_string()),
                            column: member.clone(),
                        });
                    }
                }
                Some(PrimaryKey {
                    name: key_record.name.clone(),
                    columns: key_record.columns.clone(),
                })
            }
            None => {
                let flagged: Vec<String> = columns
                    .iter()
                    .filter(|column| column.primary_key)
                    .map(|column| column.name.clone())
                    .collect();
                if flagged.is_empty() {
                    None
                } else {
                    Some(PrimaryKey::new(flagged))
                }
            }
        };
        for column in &mut columns {
            column.primary_key = primary_key
                .as_ref()
                .is_some_and(|key| key.contains(&column.name));
        }

        let mut indexes: Vec<Index> = Vec::new();
        for index_record in &record.indexes {
            for member in &index_record.columns {
                if !columns.iter().any(|column| &column.name == member) {
                    return Err(StructureError::UnknownColumn {
                        table: record.name.clone(),
                        kind: "index",
                        name: index_record.name.clone(),
                        column: member.clone(),
                    });
                }
            }
            if index_record.unique && index_record.columns.len() == 1 {
                let member = &index_record.columns[0];
                let covers_key = primary_key
                    .as_ref()
                    .is_some_and(|key| !key.is_composite() && key.contains(member));
                if !covers_key {
                    if let Some(column) =
                        columns.iter_mut().find(|column| &column.name == member)
                    {
                        column.unique = true;
                    }
                }
                continue;
            }
            indexes.push(Index {
                name: index_record.name.clone(),
                columns: index_record.columns.clone(),
                unique: index_record.unique,
            });
        }

        let mut foreign_keys: Vec<ForeignKey> = Vec::with_capacity(record.foreign_keys.len());
        for key_record in &record.foreign_keys {
            for member in &key_record.columns {
                if !columns.iter().any(|column| &column.name == member) {
                    return Err(StructureError::UnknownColumn {
                        table: record.name.clone(),
                        kind: "foreign key",
                        name: key_record.name.clone(),
                        column: member.clone(),
                    });
                }
            }
            foreign_keys.push(ForeignKey {
                name: key_record.name.clone(),
                columns: key_record.columns.clone(),
                referenced_table: key_record.referenced_table.clone(),
                referenced_columns: key_record.referenced_columns.clone(),
                on_delete: key_record.on_delete.clone(),
                on_update: key_record.on_update.clone(),
            });
        }

        Ok(Self {
            name: record.name.clone(),
            dialect: settings.dialect,
            general_schema: settings.general_schema,
            use_prefix: settings.use_prefix,
            db_prefix: settings.db_prefix.clone(),
            table_options: record.options.clone(),
            primary_key,
            columns,
            foreign_keys,
            indexes,
        })
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Looks up a foreign key by constraint name.
    #[must_use]
    pub fn foreign_key(&self, name: &str) -> Option<&ForeignKey> {
        self.foreign_keys.iter().find(|key| key.name == name)
    }

    /// Looks up an index by name.
    #[must_use]
    pub fn index(&self, name: &str) -> Option<&Index> {
        self.indexes.iter().find(|index| index.name == name)
    }

    /// Whether the named column is the only member of the primary
    /// key.
    #[must_use]
    pub fn is_sole_primary_key(&self, name: &str) -> bool {
        self.primary_key
            .as_ref()
            .is_some_and(|key| !key.is_composite() && key.contains(name))
    }

    /// Whether the primary key spans more than one column.
    #[must_use]
    pub fn has_composite_primary_key(&self) -> bool {
        self.primary_key
            .as_ref()
            .is_some_and(PrimaryKey::is_composite)
    }

    /// Whether some column's own rendering carries the primary key,
    /// making a structure-level addPrimaryKey statement redundant.
    #[must_use]
    pub fn primary_key_handled_by_column(&self) -> bool {
        let Some(primary_key) = &self.primary_key else {
            return false;
        };
        if primary_key.is_composite() {
            return false;
        }
        let Some(column) = primary_key
            .columns
            .first()
            .and_then(|name| self.column(name))
        else {
            return false;
        };
        if self.general_schema {
            column.column_type.primary_key_call().is_some()
                || column.is_primary_key_appended(self.dialect)
        } else {
            true
        }
    }

    /// Applies the prefix syntax to an arbitrary table name.
    #[must_use]
    pub fn render_table_name(&self, name: &str) -> String {
        if !self.use_prefix {
            return name.to_string();
        }
        let rest = if self.db_prefix.is_empty() {
            name
        } else {
            name.strip_prefix(&self.db_prefix).unwrap_or(name)
        };
        format!("{{{{%{rest}}}}}")
    }

    /// Returns this table's name ready for generated code.
    #[must_use]
    pub fn render_name(&self) -> String {
        self.render_table_name(&self.name)
    }
}
