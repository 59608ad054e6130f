//! Migration source templates.
//!
//! Renders complete migration class files around the statements the
//! core renderer produces. Two naming schemes are supported: the
//! plain `m<yymmdd_HHMMSS>_create_table_<name>` form and the
//! namespaced `M<yymmddHHMMSS>CreateTable<Name>` form.

use chrono::{DateTime, Utc};

use tableforge_core::TableStructure;
use tableforge_core::diff::StructureDiff;
use tableforge_core::render;
use tableforge_core::table::column::escape_quotes;

const PLAIN_TIMESTAMP: &str = "%y%m%d_%H%M%S";
const NAMESPACED_TIMESTAMP: &str = "%y%m%d%H%M%S";

/// Turns an identifier into CamelCase, splitting on anything that is
/// not alphanumeric.
#[must_use]
pub fn camelize(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut upper_next = true;
    for character in name.chars() {
        if character.is_alphanumeric() {
            if upper_next {
                result.extend(character.to_uppercase());
                upper_next = false;
            } else {
                result.push(character);
            }
        } else {
            upper_next = true;
        }
    }
    result
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|character| {
            if character.is_alphanumeric() {
                character
            } else {
                '_'
            }
        })
        .collect()
}

fn migration_class_name(
    action: &str,
    timestamp: &DateTime<Utc>,
    table: &str,
    namespaced: bool,
) -> String {
    if namespaced {
        format!(
            "M{}{}{}",
            timestamp.format(NAMESPACED_TIMESTAMP),
            camelize(action),
            camelize(table)
        )
    } else {
        format!(
            "m{}_{}_{}",
            timestamp.format(PLAIN_TIMESTAMP),
            action,
            sanitize(table)
        )
    }
}

/// Builds the class name of a create migration.
#[must_use]
pub fn create_class_name(timestamp: &DateTime<Utc>, table: &str, namespaced: bool) -> String {
    migration_class_name("create_table", timestamp, table, namespaced)
}

/// Builds the class name of an update migration.
#[must_use]
pub fn update_class_name(timestamp: &DateTime<Utc>, table: &str, namespaced: bool) -> String {
    migration_class_name("update_table", timestamp, table, namespaced)
}

/// Returns the file name for a migration class.
#[must_use]
pub fn file_name(class_name: &str) -> String {
    format!("{class_name}.php")
}

fn header(class_name: &str, namespace: Option<&str>, summary: &str) -> String {
    let mut source = String::from("<?php\n\n");
    if let Some(namespace) = namespace {
        source.push_str(&format!("namespace {namespace};\n\n"));
    }
    source.push_str("use yii\\db\\Migration;\n\n");
    source.push_str(&format!(
        "/**\n * {summary}\n */\nclass {class_name} extends Migration\n{{\n"
    ));
    source
}

fn method(name: &str, body_blocks: &[String]) -> String {
    let mut source = format!("    public function {name}()\n    {{\n");
    source.push_str(&body_blocks.join("\n\n"));
    source.push('\n');
    source.push_str("    }\n");
    source
}

fn statement_block(statements: &[String]) -> String {
    statements
        .iter()
        .map(|statement| format!("        {statement}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn options_block(options: &str) -> String {
    format!(
        "        $tableOptions = null;\n        \
         if ($this->db->driverName === 'mysql') {{\n            \
         $tableOptions = '{}';\n        }}",
        escape_quotes(options)
    )
}

/// Renders the complete source of a create migration.
#[must_use]
pub fn render_create_migration(
    class_name: &str,
    table: &TableStructure,
    namespace: Option<&str>,
) -> String {
    let mut up_blocks: Vec<String> = Vec::new();
    if let Some(options) = &table.table_options {
        up_blocks.push(options_block(options));
    }
    up_blocks.push(render::create_table_statement(table, "        "));
    if let Some(statement) = render::primary_key_statement(table) {
        up_blocks.push(statement_block(&[statement]));
    }
    let indexes = render::index_statements(table);
    if !indexes.is_empty() {
        up_blocks.push(statement_block(&indexes));
    }
    let foreign_keys = render::foreign_key_statements(table);
    if !foreign_keys.is_empty() {
        up_blocks.push(statement_block(&foreign_keys));
    }
    let down_blocks = vec![statement_block(&[render::drop_table_statement(table)])];

    let mut source = header(
        class_name,
        namespace,
        &format!("Handles the creation of table `{}`.", table.name),
    );
    source.push_str(&method("safeUp", &up_blocks));
    source.push('\n');
    source.push_str(&method("safeDown", &down_blocks));
    source.push_str("}\n");
    source
}

/// Renders the complete source of an update migration; the rollback
/// path applies the reversed diff.
#[must_use]
pub fn render_update_migration(
    class_name: &str,
    table: &TableStructure,
    diff: &StructureDiff,
    namespace: Option<&str>,
) -> String {
    let up_statements: Vec<String> = diff
        .changes
        .iter()
        .map(|change| render::change_statement(change, table))
        .collect();
    let down_statements: Vec<String> = diff
        .reversed()
        .changes
        .iter()
        .map(|change| render::change_statement(change, table))
        .collect();

    let mut source = header(
        class_name,
        namespace,
        &format!("Handles the update of table `{}`.", table.name),
    );
    source.push_str(&method("safeUp", &[statement_block(&up_statements)]));
    source.push('\n');
    source.push_str(&method("safeDown", &[statement_block(&down_statements)]));
    source.push_str("}\n");
    source
}
