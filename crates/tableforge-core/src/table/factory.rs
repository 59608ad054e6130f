//! Column factory: raw type declarations to column models.
//!
//! Providers report types the way each database spells them, from
//! `int(11) unsigned` to `character varying` to `NUMBER(10,2)`. The
//! factory normalizes those declarations into the closed
//! [`ColumnType`] set, falling back to [`ColumnType::Unsupported`]
//! instead of failing so one exotic column never aborts a run.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::record::ColumnRecord;

use super::column::{Column, ColumnType};

static LENGTH_RE: OnceLock<Regex> = OnceLock::new();

fn length_pattern() -> &'static Regex {
    LENGTH_RE.get_or_init(|| Regex::new(r"\(\s*(\d+)\s*(?:,\s*(\d+))?\s*\)").unwrap())
}

/// A raw type declaration split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ParsedType {
    /// Lowercased base name with modifiers removed, e.g.
    /// `double precision`.
    base: String,
    /// Parenthesized length or precision, when numeric.
    length: Option<u32>,
    /// Parenthesized scale.
    scale: Option<u32>,
    /// Whether an `unsigned` modifier was present.
    unsigned: bool,
}

fn parse_type(raw: &str) -> ParsedType {
    let pattern = length_pattern();
    let (length, scale) = pattern.captures(raw).map_or((None, None), |captures| {
        let length = captures.get(1).and_then(|m| m.as_str().parse().ok());
        let scale = captures.get(2).and_then(|m| m.as_str().parse().ok());
        (length, scale)
    });
    let stripped = pattern.replace(raw, " ");
    let mut unsigned = false;
    let mut parts: Vec<String> = Vec::new();
    for token in stripped.split_whitespace() {
        let lowered = token.to_lowercase();
        match lowered.as_str() {
            "unsigned" => unsigned = true,
            "zerofill" => {}
            _ => parts.push(lowered),
        }
    }
    ParsedType {
        base: parts.join(" "),
        length,
        scale,
        unsigned,
    }
}

fn map_base(base: &str) -> ColumnType {
    match base {
        "tinyint" => ColumnType::TinyInt,
        "smallint" | "int2" | "smallserial" | "serial2" => ColumnType::SmallInt,
        "int" | "integer" | "int4" | "mediumint" | "serial" | "serial4" => ColumnType::Int,
        "bigint" | "int8" | "bigserial" | "serial8" => ColumnType::BigInt,
        "char" | "character" | "nchar" | "bpchar" => ColumnType::Char,
        "varchar" | "character varying" | "varying character" | "nvarchar" | "varchar2"
        | "nvarchar2" => ColumnType::String,
        "text" | "tinytext" | "mediumtext" | "longtext" | "clob" | "nclob" | "ntext" => {
            ColumnType::Text
        }
        "binary" | "varbinary" | "blob" | "tinyblob" | "mediumblob" | "longblob" | "bytea"
        | "raw" | "long raw" | "image" => ColumnType::Binary,
        "bool" | "boolean" | "bit" => ColumnType::Bool,
        "decimal" | "numeric" | "dec" | "fixed" | "number" => ColumnType::Decimal,
        "float" | "real" | "float4" => ColumnType::Float,
        "double" | "double precision" | "float8" => ColumnType::Double,
        "money" | "smallmoney" => ColumnType::Money,
        "date" => ColumnType::Date,
        "time" | "timetz" | "time without time zone" | "time with time zone" => ColumnType::Time,
        "datetime" | "datetime2" | "smalldatetime" => ColumnType::DateTime,
        "timestamp" | "timestamptz" | "timestamp without time zone"
        | "timestamp with time zone" => ColumnType::Timestamp,
        "json" | "jsonb" => ColumnType::Json,
        _ => ColumnType::Unsupported(base.to_string()),
    }
}

fn implies_auto_increment(base: &str) -> bool {
    matches!(
        base,
        "smallserial" | "serial2" | "serial" | "serial4" | "bigserial" | "serial8"
    )
}

/// Maps a raw type declaration to a logical column type.
///
/// `tinyint(1)` follows the MySQL convention and maps to a boolean.
#[must_use]
pub fn column_type_from_raw(raw: &str) -> ColumnType {
    let parsed = parse_type(raw);
    let column_type = map_base(&parsed.base);
    if column_type == ColumnType::TinyInt && parsed.length == Some(1) {
        return ColumnType::Bool;
    }
    column_type
}

/// Builds a column model from a raw record.
///
/// Explicit record fields win over anything parsed out of the raw
/// type declaration.
#[must_use]
pub fn build_column(record: &ColumnRecord) -> Column {
    let parsed = parse_type(&record.type_name);
    let mut column_type = map_base(&parsed.base);
    if column_type == ColumnType::TinyInt && parsed.length == Some(1) && record.size.is_none() {
        column_type = ColumnType::Bool;
    }
    if let ColumnType::Unsupported(base) = &column_type {
        debug!(
            column = %record.name,
            raw = %record.type_name,
            base = %base,
            "Unmapped column type, rendering as text"
        );
    }

    let mut column = Column::new(record.name.clone(), column_type);
    column.not_null = record.nullable.map(|nullable| !nullable);
    column.unsigned = record.unsigned || parsed.unsigned;
    column.auto_increment = record.auto_increment || implies_auto_increment(&parsed.base);
    column.primary_key = record.primary_key;
    column.check = record.check.clone();
    column.default = record.default.clone();
    column.append = record.append.clone();
    column.comment = record.comment.clone();

    match column.column_type {
        ColumnType::Decimal | ColumnType::Money => {
            let precision = record.precision.or(record.size).or(parsed.length);
            let scale = record.scale.or(parsed.scale);
            if let Some(precision) = precision {
                column.set_precision_scale(precision, scale);
            } else {
                column.scale = scale;
            }
        }
        _ => {
            if let Some(length) = record.size.or(record.precision).or(parsed.length) {
                column.set_length(length);
            }
            if let Some(scale) = record.scale.or(parsed.scale) {
                column.scale = Some(scale);
            }
        }
    }
    column
}
