//! Table column model and fluent definition rendering.
//!
//! A [`Column`] renders itself as a chain of builder calls, e.g.
//! `$this->integer(11)->notNull()->defaultValue('0')`. The chain is
//! rebuilt from scratch on every call, so rendering the same column
//! twice always yields the same text.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;

use super::structure::TableStructure;

/// Escapes single quotes for embedding in a single-quoted PHP string.
#[must_use]
pub fn escape_quotes(text: &str) -> String {
    text.replace('\'', "\\'")
}

/// Default value of a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// Literal value, stringified by the introspection provider.
    Value(String),
    /// Raw SQL expression (e.g. `CURRENT_TIMESTAMP`).
    Expression(String),
}

impl Serialize for DefaultValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Value(value) => serializer.serialize_str(value),
            Self::Expression(expression) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("expression", expression)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for DefaultValue {
    /// Accepts plain scalars as literal defaults and an
    /// `{"expression": ...}` object as a raw SQL expression. Booleans
    /// are stored as the `1`/`0` the databases report.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Expression { expression: String },
            Bool(bool),
            Int(i64),
            Float(f64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Expression { expression } => Self::Expression(expression),
            Raw::Bool(true) => Self::Value("1".to_string()),
            Raw::Bool(false) => Self::Value("0".to_string()),
            Raw::Int(value) => Self::Value(value.to_string()),
            Raw::Float(value) => Self::Value(value.to_string()),
            Raw::Text(value) => Self::Value(value),
        })
    }
}

/// Logical column types known to the renderer.
///
/// The set is closed: anything the factory cannot map lands in
/// [`ColumnType::Unsupported`], which renders a portable best-effort
/// definition instead of failing the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    /// 8-bit integer.
    TinyInt,
    /// 16-bit integer.
    SmallInt,
    /// 32-bit integer.
    Int,
    /// 64-bit integer.
    BigInt,
    /// Fixed-length character string.
    Char,
    /// Variable-length character string.
    String,
    /// Unbounded text.
    Text,
    /// Binary data.
    Binary,
    /// Boolean.
    Bool,
    /// Exact decimal number.
    Decimal,
    /// Single-precision float.
    Float,
    /// Double-precision float.
    Double,
    /// Currency amount.
    Money,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    DateTime,
    /// Timestamp.
    Timestamp,
    /// JSON document.
    Json,
    /// Raw type name the factory could not map.
    Unsupported(String),
}

/// Which length fields a type call renders in specific mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LengthKind {
    /// Single display size, e.g. `integer(11)` or `string(255)`.
    Size,
    /// Fractional-seconds or float precision, e.g. `dateTime(3)`.
    Precision,
    /// Precision and scale pair, e.g. `decimal(10, 2)`.
    PrecisionScale,
    /// No length argument at all.
    Bare,
}

impl ColumnType {
    /// Returns the builder method name for the type call.
    #[must_use]
    pub fn type_call(&self) -> &'static str {
        match self {
            Self::TinyInt => "tinyInteger",
            Self::SmallInt => "smallInteger",
            Self::Int => "integer",
            Self::BigInt => "bigInteger",
            Self::Char => "char",
            Self::String => "string",
            Self::Text | Self::Unsupported(_) => "text",
            Self::Binary => "binary",
            Self::Bool => "boolean",
            Self::Decimal => "decimal",
            Self::Float => "float",
            Self::Double => "double",
            Self::Money => "money",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "dateTime",
            Self::Timestamp => "timestamp",
            Self::Json => "json",
        }
    }

    /// Returns the shortcut call that collapses the type and the
    /// primary-key clause, for the types that have one.
    #[must_use]
    pub fn primary_key_call(&self) -> Option<&'static str> {
        match self {
            Self::Int => Some("primaryKey"),
            Self::BigInt => Some("bigPrimaryKey"),
            _ => None,
        }
    }

    /// Whether `unsigned()` applies to this type.
    #[must_use]
    pub fn supports_unsigned(&self) -> bool {
        matches!(
            self,
            Self::TinyInt
                | Self::SmallInt
                | Self::Int
                | Self::BigInt
                | Self::Decimal
                | Self::Float
                | Self::Double
                | Self::Money
        )
    }

    fn length_kind(&self) -> LengthKind {
        match self {
            Self::TinyInt
            | Self::SmallInt
            | Self::Int
            | Self::BigInt
            | Self::Char
            | Self::String
            | Self::Binary => LengthKind::Size,
            Self::Float | Self::Double | Self::Time | Self::DateTime | Self::Timestamp => {
                LengthKind::Precision
            }
            Self::Decimal | Self::Money => LengthKind::PrecisionScale,
            Self::Text | Self::Bool | Self::Date | Self::Json | Self::Unsupported(_) => {
                LengthKind::Bare
            }
        }
    }
}

/// Per-render scratch state: the ordered call list plus the two
/// capability flags the shortcut path can flip.
#[derive(Debug)]
struct Definition {
    calls: Vec<String>,
    primary_key_possible: bool,
    not_null_possible: bool,
}

impl Definition {
    fn new() -> Self {
        Self {
            calls: Vec::new(),
            primary_key_possible: true,
            not_null_possible: true,
        }
    }

    fn push(&mut self, call: String) {
        self.calls.push(call);
    }

    fn into_chain(self) -> String {
        let mut chain = String::from("$this");
        for call in &self.calls {
            chain.push_str("->");
            chain.push_str(call);
        }
        chain
    }
}

/// A single table column as captured by introspection.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name, unique within its table.
    pub name: String,
    /// Logical column type.
    pub column_type: ColumnType,
    /// Tri-state nullability: `Some(true)` renders `notNull()`,
    /// `Some(false)` is explicitly nullable, `None` means the
    /// provider did not say.
    pub not_null: Option<bool>,
    /// Display size or character length.
    pub size: Option<u32>,
    /// Numeric or fractional-seconds precision; [`Column::set_length`]
    /// keeps it in sync with `size`.
    pub precision: Option<u32>,
    /// Numeric scale.
    pub scale: Option<u32>,
    /// Unique flag, fed back from single-column unique indexes.
    pub unique: bool,
    /// Unsigned flag; rendered for numeric types only.
    pub unsigned: bool,
    /// Check constraint expression, kept for comparison but not
    /// rendered into the chain.
    pub check: Option<String>,
    /// Default value.
    pub default: Option<DefaultValue>,
    /// Whether introspection reported the column as part of the
    /// table primary key.
    pub primary_key: bool,
    /// Auto-increment or identity flag.
    pub auto_increment: bool,
    /// Raw SQL fragment appended verbatim after the rendered clauses.
    pub append: Option<String>,
    /// Column comment.
    pub comment: Option<String>,
}

impl Column {
    /// Creates a column with no constraints set.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            not_null: None,
            size: None,
            precision: None,
            scale: None,
            unique: false,
            unsigned: false,
            check: None,
            default: None,
            primary_key: false,
            auto_increment: false,
            append: None,
            comment: None,
        }
    }

    /// Sets the single length concept over both schema fields.
    pub fn set_length(&mut self, length: u32) {
        self.size = Some(length);
        self.precision = Some(length);
    }

    /// Sets precision and scale for the decimal family; `size`
    /// mirrors the precision.
    pub fn set_precision_scale(&mut self, precision: u32, scale: Option<u32>) {
        self.size = Some(precision);
        self.precision = Some(precision);
        self.scale = scale;
    }

    /// Renders the full fluent definition chain in the context of the
    /// enclosing table.
    #[must_use]
    pub fn render_definition(&self, table: &TableStructure) -> String {
        self.render_parts(
            table.dialect,
            table.general_schema,
            table.is_sole_primary_key(&self.name),
        )
    }

    /// Renders the definition chain with primary-key bookkeeping
    /// stripped, for addColumn/alterColumn statements where the key
    /// is managed separately.
    #[must_use]
    pub fn render_alter_definition(&self, table: &TableStructure) -> String {
        let mut detached = self.clone();
        detached.append = detached.append_without_primary_key(table.dialect);
        detached.render_parts(table.dialect, table.general_schema, false)
    }

    /// Renders the keyed line used inside a createTable column map,
    /// e.g. `'id' => $this->primaryKey(),`.
    #[must_use]
    pub fn render(&self, table: &TableStructure) -> String {
        format!(
            "'{}' => {},",
            escape_quotes(&self.name),
            self.render_definition(table)
        )
    }

    fn render_parts(
        &self,
        dialect: Dialect,
        general_schema: bool,
        sole_primary_key: bool,
    ) -> String {
        let mut definition = Definition::new();
        self.build_type_call(general_schema, sole_primary_key, &mut definition);
        self.build_shared_calls(dialect, general_schema, sole_primary_key, &mut definition);
        definition.into_chain()
    }

    fn build_type_call(
        &self,
        general_schema: bool,
        sole_primary_key: bool,
        definition: &mut Definition,
    ) {
        if general_schema && sole_primary_key {
            if let Some(call) = self.column_type.primary_key_call() {
                definition.primary_key_possible = false;
                definition.not_null_possible = false;
                definition.push(format!("{call}()"));
                return;
            }
        }
        definition.push(format!(
            "{}({})",
            self.column_type.type_call(),
            self.render_length(general_schema)
        ));
    }

    fn render_length(&self, general_schema: bool) -> String {
        if general_schema {
            return String::new();
        }
        match self.column_type.length_kind() {
            LengthKind::Size => self.size.map(|size| size.to_string()).unwrap_or_default(),
            LengthKind::Precision => self
                .precision
                .map(|precision| precision.to_string())
                .unwrap_or_default(),
            LengthKind::PrecisionScale => match (self.precision, self.scale) {
                (Some(precision), Some(scale)) => format!("{precision}, {scale}"),
                (Some(precision), None) => precision.to_string(),
                _ => String::new(),
            },
            LengthKind::Bare => String::new(),
        }
    }

    fn build_shared_calls(
        &self,
        dialect: Dialect,
        general_schema: bool,
        sole_primary_key: bool,
        definition: &mut Definition,
    ) {
        if self.unsigned && self.column_type.supports_unsigned() {
            definition.push("unsigned()".to_string());
        }
        if definition.not_null_possible && self.not_null == Some(true) {
            definition.push("notNull()".to_string());
        }
        if self.unique {
            definition.push("unique()".to_string());
        }
        if let Some(default) = &self.default {
            definition.push(match default {
                DefaultValue::Value(value) => {
                    format!("defaultValue('{}')", escape_quotes(value))
                }
                DefaultValue::Expression(expression) => {
                    format!("defaultExpression('{}')", escape_quotes(expression))
                }
            });
        }
        self.build_append_call(dialect, general_schema, sole_primary_key, definition);
        if let Some(comment) = &self.comment {
            if !comment.is_empty() {
                definition.push(format!("comment('{}')", escape_quotes(comment)));
            }
        }
    }

    fn build_append_call(
        &self,
        dialect: Dialect,
        general_schema: bool,
        sole_primary_key: bool,
        definition: &mut Definition,
    ) {
        let explicit = self
            .append
            .as_deref()
            .map(str::trim)
            .filter(|append| !append.is_empty());
        if definition.primary_key_possible && sole_primary_key {
            let mut append = if general_schema {
                String::new()
            } else {
                dialect.primary_key_append(self.auto_increment).to_string()
            };
            if let Some(extra) = explicit {
                if !append.is_empty() {
                    append.push(' ');
                }
                append.push_str(extra);
            }
            if !append.is_empty() {
                definition.push(format!("append('{}')", escape_quotes(&append)));
            }
        } else if let Some(extra) = explicit {
            definition.push(format!("append('{}')", escape_quotes(extra)));
        }
    }

    /// Whether the stored append text already carries the dialect's
    /// primary-key clause.
    ///
    /// Matching is whitespace-insensitive and case-insensitive. For
    /// MSSQL the clause counts only when the `IDENTITY` keyword is
    /// present as well.
    #[must_use]
    pub fn is_primary_key_appended(&self, dialect: Dialect) -> bool {
        let Some(append) = self.append.as_deref() else {
            return false;
        };
        let normalized = append
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();
        if !normalized.contains("PRIMARY KEY") {
            return false;
        }
        dialect != Dialect::Mssql || normalized.contains("IDENTITY")
    }

    /// Strips the dialect's primary-key and auto-increment keywords
    /// from the append text, token by token and case-insensitively.
    /// Returns `None` when nothing else remains; leftover tokens keep
    /// their original casing, joined by single spaces.
    #[must_use]
    pub fn append_without_primary_key(&self, dialect: Dialect) -> Option<String> {
        let append = self.append.as_deref()?;
        let keywords = dialect.primary_key_keywords();
        let kept: Vec<&str> = append
            .split_whitespace()
            .filter(|token| {
                !keywords
                    .iter()
                    .any(|keyword| token.eq_ignore_ascii_case(keyword))
            })
            .collect();
        if kept.is_empty() {
            None
        } else {
            Some(kept.join(" "))
        }
    }
}
