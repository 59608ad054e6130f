//! Generator configuration.

use std::path::PathBuf;

use tableforge_core::Dialect;
use tableforge_core::table::structure::StructureSettings;

/// Resolved settings shared by every command of one generator run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Target dialect.
    pub dialect: Dialect,
    /// Portable rendering mode: drop sizes and dialect-specific
    /// append clauses.
    pub general_schema: bool,
    /// Wrap table names in the `{{%name}}` prefix syntax.
    pub use_prefix: bool,
    /// Prefix stripped from table names before wrapping.
    pub db_prefix: String,
    /// Directory migration files are written to.
    pub migrations_dir: PathBuf,
    /// PHP namespace for generated classes, if any.
    pub namespace: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            general_schema: true,
            use_prefix: false,
            db_prefix: String::new(),
            migrations_dir: PathBuf::from("migrations"),
            namespace: None,
        }
    }
}

impl GeneratorConfig {
    /// Returns the structure-assembly settings this configuration
    /// implies.
    #[must_use]
    pub fn settings(&self) -> StructureSettings {
        StructureSettings {
            dialect: self.dialect,
            general_schema: self.general_schema,
            use_prefix: self.use_prefix,
            db_prefix: self.db_prefix.clone(),
        }
    }
}
