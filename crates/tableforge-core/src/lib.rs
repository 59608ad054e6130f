//! # tableforge-core
//!
//! Dialect-aware rendering of database table structures into fluent
//! schema-builder migration code.
//!
//! This crate provides:
//! - A typed table model (columns, primary key, foreign keys,
//!   indexes) assembled from raw introspection records
//! - A column factory normalizing raw type declarations across MySQL,
//!   PostgreSQL, SQLite, MSSQL, Oracle and CUBRID
//! - A renderer producing fluent definition chains and the
//!   surrounding createTable/constraint statements
//! - A structure diff feeding update migrations, reversible for the
//!   rollback path
//!
//! ## Rendering a column definition
//!
//! ```rust
//! use tableforge_core::record::{ColumnRecord, TableRecord};
//! use tableforge_core::table::structure::{StructureSettings, TableStructure};
//!
//! let mut record = TableRecord::new("users");
//! let mut id = ColumnRecord::new("id", "int(11)");
//! id.primary_key = true;
//! id.auto_increment = true;
//! record.columns.push(id);
//!
//! let table = TableStructure::from_record(&record, &StructureSettings::default())?;
//! assert_eq!(
//!     table.column("id").unwrap().render_definition(&table),
//!     "$this->integer(11)->append('AUTO_INCREMENT PRIMARY KEY')"
//! );
//!
//! let portable = StructureSettings {
//!     general_schema: true,
//!     ..StructureSettings::default()
//! };
//! let table = TableStructure::from_record(&record, &portable)?;
//! assert_eq!(
//!     table.column("id").unwrap().render_definition(&table),
//!     "$this->primaryKey()"
//! );
//! # Ok::<(), tableforge_core::StructureError>(())
//! ```

pub mod dialect;
pub mod diff;
pub mod error;
pub mod record;
pub mod render;
pub mod table;

pub use dialect::{Dialect, ParseDialectError};
pub use diff::{StructureDiff, TableChange, diff_structures};
pub use error::StructureError;
pub use record::{SchemaSnapshot, SchemaSource, TableRecord};
pub use table::column::{Column, ColumnType, DefaultValue};
pub use table::structure::{StructureSettings, TableStructure};
