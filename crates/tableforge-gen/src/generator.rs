//! Migration generation pipeline.
//!
//! Resolves the requested tables against a snapshot, assembles the
//! structures, renders migration sources and writes them out. Each
//! migration in one run gets a timestamp one second after the
//! previous one so the files sort in generation order.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use tableforge_core::TableStructure;
use tableforge_core::diff::diff_structures;
use tableforge_core::record::{SchemaSnapshot, TableRecord};

use crate::config::GeneratorConfig;
use crate::error::{GeneratorError, Result};
use crate::template;

/// A rendered migration ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMigration {
    /// Table the migration covers.
    pub table: String,
    /// Migration class name.
    pub class_name: String,
    /// File name derived from the class name.
    pub file_name: String,
    /// Complete source text.
    pub source: String,
}

/// Drives rendering and file writing for one run.
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Creates a generator over the given configuration.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Borrows the configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn resolve_tables<'a>(
        snapshot: &'a SchemaSnapshot,
        tables: &[String],
    ) -> Result<Vec<&'a TableRecord>> {
        if tables.is_empty() {
            return Ok(snapshot.tables.iter().collect());
        }
        tables
            .iter()
            .map(|name| {
                snapshot
                    .table(name)
                    .ok_or_else(|| GeneratorError::UnknownTable(name.clone()))
            })
            .collect()
    }

    fn build_create(
        &self,
        structure: &TableStructure,
        table: &str,
        timestamp: &DateTime<Utc>,
    ) -> GeneratedMigration {
        let class_name =
            template::create_class_name(timestamp, table, self.config.namespace.is_some());
        let source = template::render_create_migration(
            &class_name,
            structure,
            self.config.namespace.as_deref(),
        );
        GeneratedMigration {
            table: table.to_string(),
            file_name: template::file_name(&class_name),
            class_name,
            source,
        }
    }

    /// Renders create migrations for the requested tables, or for the
    /// whole snapshot when `tables` is empty.
    pub fn create_migrations(
        &self,
        snapshot: &SchemaSnapshot,
        tables: &[String],
        start: DateTime<Utc>,
    ) -> Result<Vec<GeneratedMigration>> {
        let settings = self.config.settings();
        let mut migrations = Vec::new();
        for (offset, record) in Self::resolve_tables(snapshot, tables)?.into_iter().enumerate() {
            let structure = TableStructure::from_record(record, &settings)?;
            let timestamp = start + Duration::seconds(offset as i64);
            info!("Generating create migration for table '{}'", record.name);
            migrations.push(self.build_create(&structure, &record.name, &timestamp));
        }
        Ok(migrations)
    }

    /// Renders update migrations by diffing a previously captured
    /// snapshot against the current one.
    ///
    /// Tables new to the current snapshot get a create migration;
    /// unchanged tables are skipped. Tables that vanished are only
    /// reported, never dropped.
    pub fn update_migrations(
        &self,
        old: &SchemaSnapshot,
        new: &SchemaSnapshot,
        tables: &[String],
        start: DateTime<Utc>,
    ) -> Result<Vec<GeneratedMigration>> {
        if tables.is_empty() {
            for record in &old.tables {
                if new.table(&record.name).is_none() {
                    warn!(
                        "Table '{}' is gone from the current snapshot; no migration generated",
                        record.name
                    );
                }
            }
        }

        let settings = self.config.settings();
        let namespace = self.config.namespace.as_deref();
        let mut migrations = Vec::new();
        let mut offset = 0i64;
        for record in Self::resolve_tables(new, tables)? {
            let current = TableStructure::from_record(record, &settings)?;
            let timestamp = start + Duration::seconds(offset);
            let Some(previous_record) = old.table(&record.name) else {
                info!(
                    "Table '{}' is new since the old snapshot; generating a create migration",
                    record.name
                );
                migrations.push(self.build_create(&current, &record.name, &timestamp));
                offset += 1;
                continue;
            };
            let previous = TableStructure::from_record(previous_record, &settings)?;
            let diff = diff_structures(&previous, &current);
            if diff.is_empty() {
                info!("Table '{}' is unchanged", record.name);
                continue;
            }
            info!(
                "Generating update migration for table '{}' ({} change(s))",
                record.name,
                diff.changes.len()
            );
            let class_name = template::update_class_name(
                &timestamp,
                &record.name,
                self.config.namespace.is_some(),
            );
            let source =
                template::render_update_migration(&class_name, &current, &diff, namespace);
            migrations.push(GeneratedMigration {
                table: record.name.clone(),
                file_name: template::file_name(&class_name),
                class_name,
                source,
            });
            offset += 1;
        }
        Ok(migrations)
    }

    /// Writes rendered migrations into the configured directory,
    /// refusing to overwrite existing files.
    pub fn write(&self, migrations: &[GeneratedMigration]) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.config.migrations_dir)?;
        let mut paths = Vec::with_capacity(migrations.len());
        for migration in migrations {
            let path = self.config.migrations_dir.join(&migration.file_name);
            if path.exists() {
                return Err(GeneratorError::MigrationExists(path));
            }
            fs::write(&path, &migration.source)?;
            info!("Created migration: {}", path.display());
            paths.push(path);
        }
        Ok(paths)
    }
}
