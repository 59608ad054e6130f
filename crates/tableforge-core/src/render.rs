//! Structure-level rendering: the statements a migration template
//! stitches together.
//!
//! Column chains come from the column model itself; this module
//! renders the statements around them, from the createTable block to
//! the per-change statements of an update migration.

use crate::diff::TableChange;
use crate::table::column::escape_quotes;
use crate::table::structure::TableStructure;
use crate::table::{foreign_key::ForeignKey, index::Index};

fn quoted_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("'{}'", escape_quotes(item)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn optional_action(action: Option<&str>) -> String {
    action.map_or_else(
        || "null".to_string(),
        |action| format!("'{}'", escape_quotes(action)),
    )
}

/// Renders the keyed column lines of the createTable map, one per
/// line, each prefixed with `indent`.
#[must_use]
pub fn render_column_block(table: &TableStructure, indent: &str) -> String {
    let mut block = String::new();
    for column in &table.columns {
        block.push_str(indent);
        block.push_str(&column.render(table));
        block.push('\n');
    }
    block
}

/// Renders the complete createTable statement, every line prefixed
/// with `indent` and the column map one level deeper.
///
/// When the structure carries table options the statement references
/// a `$tableOptions` variable the surrounding template must declare.
#[must_use]
pub fn create_table_statement(table: &TableStructure, indent: &str) -> String {
    let mut statement = format!(
        "{indent}$this->createTable('{}', [\n",
        escape_quotes(&table.render_name())
    );
    let inner = format!("{indent}    ");
    statement.push_str(&render_column_block(table, &inner));
    statement.push_str(indent);
    if table.table_options.is_some() {
        statement.push_str("], $tableOptions);");
    } else {
        statement.push_str("]);");
    }
    statement
}

/// Renders the addPrimaryKey statement, or `None` when the table has
/// no key or a column's own rendering already carries it.
#[must_use]
pub fn primary_key_statement(table: &TableStructure) -> Option<String> {
    let primary_key = table.primary_key.as_ref()?;
    if primary_key.columns.is_empty() || table.primary_key_handled_by_column() {
        return None;
    }
    Some(format!(
        "$this->addPrimaryKey('{}', '{}', [{}]);",
        escape_quotes(primary_key.constraint_name()),
        escape_quotes(&table.render_name()),
        quoted_list(&primary_key.columns)
    ))
}

/// Renders one createIndex statement.
#[must_use]
pub fn index_statement(index: &Index, table: &TableStructure) -> String {
    let mut statement = format!(
        "$this->createIndex('{}', '{}', [{}]",
        escape_quotes(&index.name),
        escape_quotes(&table.render_name()),
        quoted_list(&index.columns)
    );
    if index.unique {
        statement.push_str(", true");
    }
    statement.push_str(");");
    statement
}

/// Renders createIndex statements for every surviving index.
#[must_use]
pub fn index_statements(table: &TableStructure) -> Vec<String> {
    table
        .indexes
        .iter()
        .map(|index| index_statement(index, table))
        .collect()
}

/// Renders one addForeignKey statement. Referenced table names go
/// through the same prefix handling as the table's own name.
#[must_use]
pub fn foreign_key_statement(foreign_key: &ForeignKey, table: &TableStructure) -> String {
    let mut statement = format!(
        "$this->addForeignKey('{}', '{}', [{}], '{}', [{}]",
        escape_quotes(&foreign_key.name),
        escape_quotes(&table.render_name()),
        quoted_list(&foreign_key.columns),
        escape_quotes(&table.render_table_name(&foreign_key.referenced_table)),
        quoted_list(&foreign_key.referenced_columns)
    );
    match (&foreign_key.on_delete, &foreign_key.on_update) {
        (None, None) => {}
        (delete, None) => {
            statement.push_str(", ");
            statement.push_str(&optional_action(delete.as_deref()));
        }
        (delete, Some(update)) => {
            statement.push_str(", ");
            statement.push_str(&optional_action(delete.as_deref()));
            statement.push_str(", ");
            statement.push_str(&optional_action(Some(update)));
        }
    }
    statement.push_str(");");
    statement
}

/// Renders addForeignKey statements for every foreign key.
#[must_use]
pub fn foreign_key_statements(table: &TableStructure) -> Vec<String> {
    table
        .foreign_keys
        .iter()
        .map(|foreign_key| foreign_key_statement(foreign_key, table))
        .collect()
}

/// Renders the dropTable statement for the rollback path.
#[must_use]
pub fn drop_table_statement(table: &TableStructure) -> String {
    format!("$this->dropTable('{}');", escape_quotes(&table.render_name()))
}

/// Renders the statement applying one schema change. Column chains
/// are rendered detached, with primary-key bookkeeping stripped; key
/// changes travel as their own statements.
#[must_use]
pub fn change_statement(change: &TableChange, table: &TableStructure) -> String {
    let name = escape_quotes(&table.render_name());
    match change {
        TableChange::AddColumn(column) => format!(
            "$this->addColumn('{}', '{}', {});",
            name,
            escape_quotes(&column.name),
            column.render_alter_definition(table)
        ),
        TableChange::AlterColumn { column, .. } => format!(
            "$this->alterColumn('{}', '{}', {});",
            name,
            escape_quotes(&column.name),
            column.render_alter_definition(table)
        ),
        TableChange::DropColumn(column) => format!(
            "$this->dropColumn('{}', '{}');",
            name,
            escape_quotes(&column.name)
        ),
        TableChange::AddPrimaryKey(key) => format!(
            "$this->addPrimaryKey('{}', '{}', [{}]);",
            escape_quotes(key.constraint_name()),
            name,
            quoted_list(&key.columns)
        ),
        TableChange::DropPrimaryKey(key) => format!(
            "$this->dropPrimaryKey('{}', '{}');",
            escape_quotes(key.constraint_name()),
            name
        ),
        TableChange::AddForeignKey(foreign_key) => foreign_key_statement(foreign_key, table),
        TableChange::DropForeignKey(foreign_key) => format!(
            "$this->dropForeignKey('{}', '{}');",
            escape_quotes(&foreign_key.name),
            name
        ),
        TableChange::CreateIndex(index) => index_statement(index, table),
        TableChange::DropIndex(index) => format!(
            "$this->dropIndex('{}', '{}');",
            escape_quotes(&index.name),
            name
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::record::{
        ColumnRecord, ForeignKeyRecord, IndexRecord, PrimaryKeyRecord, TableRecord,
    };
    use crate::table::structure::StructureSettings;

    fn settings(general_schema: bool) -> StructureSettings {
        StructureSettings {
            dialect: Dialect::Mysql,
            general_schema,
            use_prefix: true,
            db_prefix: String::new(),
        }
    }

    fn posts_structure(general_schema: bool) -> TableStructure {
        let mut record = TableRecord::new("posts");
        let mut id = ColumnRecord::new("id", "int(11)");
        id.auto_increment = true;
        id.primary_key = true;
        record.columns.push(id);
        let mut title = ColumnRecord::new("title", "varchar(255)");
        title.nullable = Some(false);
        record.columns.push(title);
        record.columns.push(ColumnRecord::new("author_id", "int(11)"));
        record.indexes.push(IndexRecord {
            name: "idx-posts-author_id".to_string(),
            columns: vec!["author_id".to_string()],
            unique: false,
        });
        record.foreign_keys.push(ForeignKeyRecord {
            name: "fk-posts-author_id".to_string(),
            columns: vec!["author_id".to_string()],
            referenced_table: "users".to_string(),
            referenced_columns: vec!["id".to_string()],
            on_delete: Some("CASCADE".to_string()),
            on_update: None,
        });
        TableStructure::from_record(&record, &settings(general_schema)).unwrap()
    }

    #[test]
    fn test_render_column_block() {
        let structure = posts_structure(true);
        let expected = [
            "    'id' => $this->primaryKey(),",
            "    'title' => $this->string()->notNull(),",
            "    'author_id' => $this->integer(),",
            "",
        ]
        .join("\n");
        assert_eq!(render_column_block(&structure, "    "), expected);
    }

    #[test]
    fn test_create_table_statement() {
        let structure = posts_structure(false);
        let statement = create_table_statement(&structure, "        ");
        assert!(statement.starts_with("        $this->createTable('{{%posts}}', [\n"));
        assert!(statement.contains(
            "            'id' => $this->integer(11)->append('AUTO_INCREMENT PRIMARY KEY'),\n"
        ));
        assert!(statement.ends_with("        ]);"));
    }

    #[test]
    fn test_create_table_statement_references_options_variable() {
        let mut structure = posts_structure(false);
        structure.table_options = Some("ENGINE=InnoDB".to_string());
        let statement = create_table_statement(&structure, "");
        assert!(statement.ends_with("], $tableOptions);"));
    }

    #[test]
    fn test_primary_key_statement_skipped_when_column_carries_it() {
        assert_eq!(primary_key_statement(&posts_structure(false)), None);
        assert_eq!(primary_key_statement(&posts_structure(true)), None);
    }

    #[test]
    fn test_primary_key_statement_for_composite_key() {
        let mut record = TableRecord::new("orders_products");
        record.columns.push(ColumnRecord::new("order_id", "int"));
        record.columns.push(ColumnRecord::new("product_id", "int"));
        record.primary_key = Some(PrimaryKeyRecord {
            name: None,
            columns: vec!["order_id".to_string(), "product_id".to_string()],
        });
        let structure = TableStructure::from_record(&record, &settings(false)).unwrap();
        assert_eq!(
            primary_key_statement(&structure).unwrap(),
            "$this->addPrimaryKey('PRIMARYKEY', '{{%orders_products}}', ['order_id', 'product_id']);"
        );
    }

    #[test]
    fn test_primary_key_statement_for_general_mode_string_key() {
        let mut record = TableRecord::new("countries");
        let mut code = ColumnRecord::new("code", "char(2)");
        code.primary_key = true;
        record.columns.push(code);
        let structure = TableStructure::from_record(&record, &settings(true)).unwrap();
        assert_eq!(
            primary_key_statement(&structure).unwrap(),
            "$this->addPrimaryKey('PRIMARYKEY', '{{%countries}}', ['code']);"
        );
    }

    #[test]
    fn test_index_statements() {
        let structure = posts_structure(false);
        assert_eq!(
            index_statements(&structure),
            vec!["$this->createIndex('idx-posts-author_id', '{{%posts}}', ['author_id']);"]
        );
    }

    #[test]
    fn test_unique_index_statement_adds_flag() {
        let structure = posts_structure(false);
        let index = Index {
            name: "idx-posts-slug".to_string(),
            columns: vec!["slug".to_string()],
            unique: true,
        };
        assert_eq!(
            index_statement(&index, &structure),
            "$this->createIndex('idx-posts-slug', '{{%posts}}', ['slug'], true);"
        );
    }

    #[test]
    fn test_foreign_key_statement_prefixes_referenced_table() {
        let structure = posts_structure(false);
        assert_eq!(
            foreign_key_statements(&structure),
            vec![
                "$this->addForeignKey('fk-posts-author_id', '{{%posts}}', ['author_id'], \
                 '{{%users}}', ['id'], 'CASCADE');"
            ]
        );
    }

    #[test]
    fn test_foreign_key_statement_action_placeholders() {
        let structure = posts_structure(false);
        let mut foreign_key = ForeignKey {
            name: "fk-x".to_string(),
            columns: vec!["a".to_string()],
            referenced_table: "other".to_string(),
            referenced_columns: vec!["id".to_string()],
            on_delete: None,
            on_update: Some("SET NULL".to_string()),
        };
        assert_eq!(
            foreign_key_statement(&foreign_key, &structure),
            "$this->addForeignKey('fk-x', '{{%posts}}', ['a'], '{{%other}}', ['id'], null, 'SET NULL');"
        );
        foreign_key.on_update = None;
        assert_eq!(
            foreign_key_statement(&foreign_key, &structure),
            "$this->addForeignKey('fk-x', '{{%posts}}', ['a'], '{{%other}}', ['id']);"
        );
    }

    #[test]
    fn test_drop_table_statement() {
        assert_eq!(
            drop_table_statement(&posts_structure(false)),
            "$this->dropTable('{{%posts}}');"
        );
    }

    #[test]
    fn test_change_statements() {
        let structure = posts_structure(false);
        let column = structure.column("title").unwrap().clone();
        assert_eq!(
            change_statement(&TableChange::AddColumn(column.clone()), &structure),
            "$this->addColumn('{{%posts}}', 'title', $this->string(255)->notNull());"
        );
        assert_eq!(
            change_statement(
                &TableChange::AlterColumn {
                    column: column.clone(),
                    previous: column.clone(),
                },
                &structure
            ),
            "$this->alterColumn('{{%posts}}', 'title', $this->string(255)->notNull());"
        );
        assert_eq!(
            change_statement(&TableChange::DropColumn(column), &structure),
            "$this->dropColumn('{{%posts}}', 'title');"
        );
    }

    #[test]
    fn test_change_statement_strips_primary_key_from_alter() {
        let structure = posts_structure(false);
        let column = structure.column("id").unwrap().clone();
        assert_eq!(
            change_statement(
                &TableChange::AlterColumn {
                    column: column.clone(),
                    previous: column,
                },
                &structure
            ),
            "$this->alterColumn('{{%posts}}', 'id', $this->integer(11));"
        );
    }

    #[test]
    fn test_change_statements_for_constraints() {
        let structure = posts_structure(false);
        let key = structure.primary_key.clone().unwrap();
        assert_eq!(
            change_statement(&TableChange::DropPrimaryKey(key.clone()), &structure),
            "$this->dropPrimaryKey('PRIMARYKEY', '{{%posts}}');"
        );
        assert_eq!(
            change_statement(&TableChange::AddPrimaryKey(key), &structure),
            "$this->addPrimaryKey('PRIMARYKEY', '{{%posts}}', ['id']);"
        );
        let foreign_key = structure.foreign_keys[0].clone();
        assert_eq!(
            change_statement(&TableChange::DropForeignKey(foreign_key), &structure),
            "$this->dropForeignKey('fk-posts-author_id', '{{%posts}}');"
        );
        let index = structure.indexes[0].clone();
        assert_eq!(
            change_statement(&TableChange::DropIndex(index.clone()), &structure),
            "$this->dropIndex('idx-posts-author_id', '{{%posts}}');"
        );
        assert_eq!(
            change_statement(&TableChange::CreateIndex(index), &structure),
            "$this->createIndex('idx-posts-author_id', '{{%posts}}', ['author_id']);"
        );
    }
}
