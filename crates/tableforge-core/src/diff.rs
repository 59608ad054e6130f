//! Structure diff: the changes an update migration must apply to move
//! a previously generated structure to the current one.
//!
//! Every change carries the full payload of both sides it needs, so a
//! diff can be reversed for the rollback path without consulting the
//! structures again.

use crate::table::column::Column;
use crate::table::foreign_key::ForeignKey;
use crate::table::index::Index;
use crate::table::primary_key::PrimaryKey;
use crate::table::structure::TableStructure;

/// One schema change detected between two structures.
#[derive(Debug, Clone, PartialEq)]
pub enum TableChange {
    /// A column present only in the new structure.
    AddColumn(Column),
    /// A column whose definition changed.
    AlterColumn {
        /// Definition to apply.
        column: Column,
        /// Definition being replaced.
        previous: Column,
    },
    /// A column present only in the old structure.
    DropColumn(Column),
    /// The new primary key, when membership changed.
    AddPrimaryKey(PrimaryKey),
    /// The old primary key, when membership changed.
    DropPrimaryKey(PrimaryKey),
    /// A foreign key to create.
    AddForeignKey(ForeignKey),
    /// A foreign key to drop.
    DropForeignKey(ForeignKey),
    /// An index to create.
    CreateIndex(Index),
    /// An index to drop.
    DropIndex(Index),
}

impl TableChange {
    /// Returns the inverse change, applied when rolling back.
    #[must_use]
    pub fn reverse(&self) -> Self {
        match self {
            Self::AddColumn(column) => Self::DropColumn(column.clone()),
            Self::DropColumn(column) => Self::AddColumn(column.clone()),
            Self::AlterColumn { column, previous } => Self::AlterColumn {
                column: previous.clone(),
                previous: column.clone(),
            },
            Self::AddPrimaryKey(key) => Self::DropPrimaryKey(key.clone()),
            Self::DropPrimaryKey(key) => Self::AddPrimaryKey(key.clone()),
            Self::AddForeignKey(key) => Self::DropForeignKey(key.clone()),
            Self::DropForeignKey(key) => Self::AddForeignKey(key.clone()),
            Self::CreateIndex(index) => Self::DropIndex(index.clone()),
            Self::DropIndex(index) => Self::CreateIndex(index.clone()),
        }
    }
}

/// The ordered change list for one table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructureDiff {
    /// Changes in application order: dropped constraints first, then
    /// column work, then added constraints.
    pub changes: Vec<TableChange>,
}

impl StructureDiff {
    /// Whether the structures matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Returns the rollback diff: every change inverted, in reverse
    /// order.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            changes: self
                .changes
                .iter()
                .rev()
                .map(TableChange::reverse)
                .collect(),
        }
    }
}

fn primary_key_columns(structure: &TableStructure) -> &[String] {
    structure
        .primary_key
        .as_ref()
        .map_or(&[], |key| key.columns.as_slice())
}

/// Compares two columns for the diff, ignoring the fields that are
/// bookkeeping rather than definition: the primary-key flag travels
/// with the key itself, and append strings are compared with the
/// dialect's key clause stripped so a computed append never counts as
/// drift.
fn columns_differ(
    previous: &Column,
    current: &Column,
    old: &TableStructure,
    new: &TableStructure,
) -> bool {
    previous.column_type != current.column_type
        || previous.not_null != current.not_null
        || previous.size != current.size
        || previous.precision != current.precision
        || previous.scale != current.scale
        || previous.unique != current.unique
        || previous.unsigned != current.unsigned
        || previous.check != current.check
        || previous.default != current.default
        || previous.auto_increment != current.auto_increment
        || previous.comment != current.comment
        || previous.append_without_primary_key(old.dialect)
            != current.append_without_primary_key(new.dialect)
}

/// Computes the changes that turn `old` into `new`.
///
/// Changed constraints appear as a drop followed by a re-create;
/// drops lead the list so column changes never strand a constraint.
#[must_use]
pub fn diff_structures(old: &TableStructure, new: &TableStructure) -> StructureDiff {
    let mut changes = Vec::new();

    for foreign_key in &old.foreign_keys {
        match new.foreign_key(&foreign_key.name) {
            Some(current) if current == foreign_key => {}
            _ => changes.push(TableChange::DropForeignKey(foreign_key.clone())),
        }
    }
    for index in &old.indexes {
        match new.index(&index.name) {
            Some(current) if current == index => {}
            _ => changes.push(TableChange::DropIndex(index.clone())),
        }
    }

    let primary_key_changed = primary_key_columns(old) != primary_key_columns(new);
    if primary_key_changed {
        if let Some(key) = &old.primary_key {
            changes.push(TableChange::DropPrimaryKey(key.clone()));
        }
    }

    for column in &old.columns {
        if new.column(&column.name).is_none() {
            changes.push(TableChange::DropColumn(column.clone()));
        }
    }
    for column in &new.columns {
        match old.column(&column.name) {
            None => changes.push(TableChange::AddColumn(column.clone())),
            Some(previous) => {
                if columns_differ(previous, column, old, new) {
                    changes.push(TableChange::AlterColumn {
                        column: column.clone(),
                        previous: previous.clone(),
                    });
                }
            }
        }
    }

    if primary_key_changed {
        if let Some(key) = &new.primary_key {
            changes.push(TableChange::AddPrimaryKey(key.clone()));
        }
    }
    for index in &new.indexes {
        match old.index(&index.name) {
            Some(previous) if previous == index => {}
            _ => changes.push(TableChange::CreateIndex(index.clone())),
        }
    }
    for foreign_key in &new.foreign_keys {
        match old.foreign_key(&foreign_key.name) {
            Some(previous) if previous == foreign_key => {}
            _ => changes.push(TableChange::AddForeignKey(foreign_key.clone())),
        }
    }

    StructureDiff { changes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::record::{ColumnRecord, IndexRecord, PrimaryKeyRecord, TableRecord};
    use crate::table::structure::StructureSettings;

    fn settings() -> StructureSettings {
        StructureSettings {
            dialect: Dialect::Mysql,
            general_schema: false,
            use_prefix: false,
            db_prefix: String::new(),
        }
    }

    fn base_record() -> TableRecord {
        let mut record = TableRecord::new("posts");
        let mut id = ColumnRecord::new("id", "int(11)");
        id.auto_increment = true;
        record.columns.push(id);
        let mut title = ColumnRecord::new("title", "varchar(255)");
        title.nullable = Some(false);
        record.columns.push(title);
        record.primary_key = Some(PrimaryKeyRecord {
            name: None,
            columns: vec!["id".to_string()],
        });
        record
    }

    fn build(record: &TableRecord) -> TableStructure {
        TableStructure::from_record(record, &settings()).unwrap()
    }

    #[test]
    fn test_identical_structures_produce_empty_diff() {
        let old = build(&base_record());
        let new = build(&base_record());
        assert!(diff_structures(&old, &new).is_empty());
    }

    #[test]
    fn test_added_and_dropped_columns() {
        let old = build(&base_record());
        let mut record = base_record();
        record.columns.retain(|column| column.name != "title");
        record.columns.push(ColumnRecord::new("summary", "text"));
        let new = build(&record);
        let diff = diff_structures(&old, &new);
        assert_eq!(diff.changes.len(), 2);
        assert!(matches!(
            &diff.changes[0],
            TableChange::DropColumn(column) if column.name == "title"
        ));
        assert!(matches!(
            &diff.changes[1],
            TableChange::AddColumn(column) if column.name == "summary"
        ));
    }

    #[test]
    fn test_altered_column_carries_both_sides() {
        let old = build(&base_record());
        let mut record = base_record();
        record.columns[1] = {
            let mut title = ColumnRecord::new("title", "varchar(512)");
            title.nullable = Some(false);
            title
        };
        let new = build(&record);
        let diff = diff_structures(&old, &new);
        assert_eq!(diff.changes.len(), 1);
        match &diff.changes[0] {
            TableChange::AlterColumn { column, previous } => {
                assert_eq!(column.size, Some(512));
                assert_eq!(previous.size, Some(255));
            }
            other => panic!("unexpected change {other:?}"),
        }
    }

    #[test]
    fn test_stored_primary_key_append_does_not_drift() {
        let old_record = {
            let mut record = base_record();
            record.columns[0].append = Some("AUTO_INCREMENT PRIMARY KEY".to_string());
            record
        };
        let old = build(&old_record);
        let new = build(&base_record());
        assert!(diff_structures(&old, &new).is_empty());
    }

    #[test]
    fn test_append_remainder_still_counts() {
        let old_record = {
            let mut record = base_record();
            record.columns[0].append = Some("PRIMARY KEY FIRST".to_string());
            record
        };
        let old = build(&old_record);
        let new = build(&base_record());
        let diff = diff_structures(&old, &new);
        assert_eq!(diff.changes.len(), 1);
        assert!(matches!(
            &diff.changes[0],
            TableChange::AlterColumn { column, .. } if column.name == "id"
        ));
    }

    #[test]
    fn test_primary_key_change_is_dropped_then_added() {
        let old = build(&base_record());
        let mut record = base_record();
        record.primary_key = Some(PrimaryKeyRecord {
            name: None,
            columns: vec!["id".to_string(), "title".to_string()],
        });
        let new = build(&record);
        let diff = diff_structures(&old, &new);
        assert!(matches!(&diff.changes[0], TableChange::DropPrimaryKey(_)));
        assert!(matches!(
            diff.changes.last().unwrap(),
            TableChange::AddPrimaryKey(key) if key.columns.len() == 2
        ));
    }

    #[test]
    fn test_index_uniqueness_flip_recreates_index() {
        let mut old_record = base_record();
        old_record.columns.push(ColumnRecord::new("slug", "varchar(64)"));
        old_record.indexes.push(IndexRecord {
            name: "idx-posts-slug".to_string(),
            columns: vec!["slug".to_string(), "title".to_string()],
            unique: false,
        });
        let mut new_record = old_record.clone();
        new_record.indexes[0].unique = true;
        let old = build(&old_record);
        let new = build(&new_record);
        let diff = diff_structures(&old, &new);
        assert_eq!(diff.changes.len(), 2);
        assert!(matches!(&diff.changes[0], TableChange::DropIndex(_)));
        assert!(matches!(
            &diff.changes[1],
            TableChange::CreateIndex(index) if index.unique
        ));
    }

    #[test]
    fn test_reversed_diff_inverts_pairwise_in_reverse_order() {
        let old = build(&base_record());
        let mut record = base_record();
        record.columns.push(ColumnRecord::new("summary", "text"));
        record.indexes.push(IndexRecord {
            name: "idx-posts-title".to_string(),
            columns: vec!["title".to_string(), "summary".to_string()],
            unique: false,
        });
        let new = build(&record);
        let diff = diff_structures(&old, &new);
        assert_eq!(diff.changes.len(), 2);
        let rollback = diff.reversed();
        assert!(matches!(&rollback.changes[0], TableChange::DropIndex(_)));
        assert!(matches!(
            &rollback.changes[1],
            TableChange::DropColumn(column) if column.name == "summary"
        ));
    }

    #[test]
    fn test_reverse_round_trips() {
        let old = build(&base_record());
        let mut record = base_record();
        record.columns[1].nullable = Some(true);
        record.columns.push(ColumnRecord::new("summary", "text"));
        let new = build(&record);
        let diff = diff_structures(&old, &new);
        assert_eq!(diff.reversed().reversed(), diff);
    }
}
