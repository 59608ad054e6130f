//! Migration file generation around `tableforge-core`.
//!
//! `tableforge-gen` turns schema snapshots into ready-to-run
//! migration class files:
//!
//! - **Source** - Loads JSON schema snapshots written by an
//!   introspection tool
//! - **Generator** - Resolves tables, assembles structures, diffs
//!   snapshots and writes files
//! - **Template** - Renders the migration class around the statements
//!   the core produces
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use tableforge_gen::config::GeneratorConfig;
//! use tableforge_gen::generator::Generator;
//! use tableforge_gen::source::SchemaFile;
//!
//! # fn main() -> tableforge_gen::error::Result<()> {
//! let snapshot = SchemaFile::load(Path::new("schema.json"))?.into_snapshot();
//! let generator = Generator::new(GeneratorConfig::default());
//! let migrations = generator.create_migrations(&snapshot, &[], chrono::Utc::now())?;
//! generator.write(&migrations)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod source;
pub mod template;

pub mod prelude {
    //! Convenience re-exports for generator callers.
    pub use crate::config::GeneratorConfig;
    pub use crate::error::{GeneratorError, Result};
    pub use crate::generator::{GeneratedMigration, Generator};
    pub use crate::source::SchemaFile;
    pub use tableforge_core::{Dialect, SchemaSnapshot, StructureSettings, TableStructure};
}
