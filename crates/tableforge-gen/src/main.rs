//! tableforge CLI
//!
//! Command-line tool generating migration files from schema
//! snapshots.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use tableforge_gen::prelude::*;

/// Schema-snapshot driven migration file generator.
#[derive(Parser)]
#[command(name = "tableforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Schema snapshot file written by the introspection tool.
    #[arg(short, long, env = "TABLEFORGE_SCHEMA", default_value = "schema.json")]
    schema: PathBuf,

    /// Migrations output directory.
    #[arg(
        short,
        long,
        env = "TABLEFORGE_MIGRATIONS_DIR",
        default_value = "migrations"
    )]
    migrations_dir: PathBuf,

    /// Target dialect (mysql, postgres, sqlite, mssql, oracle,
    /// cubrid, generic).
    #[arg(short, long, default_value = "mysql")]
    dialect: String,

    /// Render dialect-specific sizes and clauses instead of portable
    /// definitions.
    #[arg(long)]
    specific: bool,

    /// Wrap table names in the {{%name}} prefix syntax.
    #[arg(long)]
    use_prefix: bool,

    /// Table prefix stripped before wrapping names.
    #[arg(long, default_value = "")]
    table_prefix: String,

    /// PHP namespace for generated migration classes.
    #[arg(short, long)]
    namespace: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate create migrations from the snapshot.
    Create {
        /// Tables to generate (all if not specified).
        tables: Vec<String>,

        /// Print generated sources without writing files.
        #[arg(long)]
        dry_run: bool,
    },

    /// Diff an older snapshot against the current one and generate
    /// update migrations.
    Update {
        /// The previously captured snapshot to diff against.
        #[arg(short, long)]
        from: PathBuf,

        /// Tables to inspect (all if not specified).
        tables: Vec<String>,

        /// Print generated sources without writing files.
        #[arg(long)]
        dry_run: bool,
    },

    /// List the tables available in the snapshot.
    ListTables,
}

impl Cli {
    fn config(&self) -> Result<GeneratorConfig> {
        let dialect = self.dialect.parse::<Dialect>()?;
        Ok(GeneratorConfig {
            dialect,
            general_schema: !self.specific,
            use_prefix: self.use_prefix,
            db_prefix: self.table_prefix.clone(),
            migrations_dir: self.migrations_dir.clone(),
            namespace: self.namespace.clone(),
        })
    }
}

fn emit(generator: &Generator, migrations: &[GeneratedMigration], dry_run: bool) -> Result<()> {
    if migrations.is_empty() {
        info!("Nothing to generate.");
        return Ok(());
    }
    if dry_run {
        for migration in migrations {
            println!("Would create migration: {}", migration.file_name);
            println!("\n{}", migration.source);
        }
        return Ok(());
    }
    generator.write(migrations)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = cli.config()?;
    let generator = Generator::new(config);
    let snapshot = SchemaFile::load(&cli.schema)?.into_snapshot();

    match cli.command {
        Commands::Create { tables, dry_run } => {
            let migrations = generator.create_migrations(&snapshot, &tables, chrono::Utc::now())?;
            emit(&generator, &migrations, dry_run)?;
        }

        Commands::Update {
            from,
            tables,
            dry_run,
        } => {
            let old = SchemaFile::load(&from)?.into_snapshot();
            let migrations =
                generator.update_migrations(&old, &snapshot, &tables, chrono::Utc::now())?;
            emit(&generator, &migrations, dry_run)?;
        }

        Commands::ListTables => {
            if snapshot.tables.is_empty() {
                info!("The snapshot contains no tables.");
            } else {
                println!("\nTables in {}:", cli.schema.display());
                println!("{:-<60}", "");
                for name in snapshot.table_names() {
                    println!(" {name}");
                }
                println!();
            }
        }
    }

    Ok(())
}
