//! Command-line interface for surreal-typegen
//!
//! # Usage Examples
//!
//! ## Generate
//! ```bash
//! # TypeScript declarations from a live database
//! surreal-typegen generate --output src/gen.ts \
//!   --surreal-endpoint http://localhost:8000 \
//!   --namespace test --database test
//!
//! # JSON schema descriptor, leaving out a table
//! surreal-typegen generate --output schema.json --format json --exclude audit_log
//!
//! # Offline, from a snapshot captured earlier
//! surreal-typegen snapshot --output schema.yaml
//! surreal-typegen generate --snapshot schema.yaml --output src/gen.ts
//! ```
//!
//! ## Migrations
//! ```bash
//! surreal-typegen migrate add "create user table"
//! surreal-typegen migrate list
//! surreal-typegen migrate run --migrations-dir migrations
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use surreal_typegen::introspect::{SchemaSnapshot, SnapshotSource, SurrealSource};
use surreal_typegen::migrate::{self, MigrationStore, SurrealMigrationStore};
use surreal_typegen::{
    generate, surreal_connect, GenerateConfig, OutputFormat, RenderOptions, SchemaSource,
    SurrealOpts,
};

#[derive(Parser)]
#[command(name = "surreal-typegen")]
#[command(about = "Generate typed declarations from a SurrealDB schema and manage its migrations")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate type declarations and a typed SurrealX client from the database schema
    Generate {
        /// File to write the generated declarations to
        #[arg(short, long)]
        output: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::TypeScript)]
        format: OutputFormat,

        /// Tables to leave out of the output
        #[arg(long = "exclude", value_name = "TABLE")]
        exclude: Vec<String>,

        /// Do not echo DEFINE statements as doc comments
        #[arg(long)]
        no_comments: bool,

        /// Emit only the type declarations, without the SurrealX client class
        #[arg(long)]
        no_client: bool,

        /// Read the schema from a snapshot file instead of the database
        #[arg(long, value_name = "PATH")]
        snapshot: Option<PathBuf>,

        #[command(flatten)]
        surreal: SurrealOpts,
    },

    /// Capture the database schema into a JSON or YAML snapshot file
    Snapshot {
        /// Snapshot file; `.yaml`/`.yml` writes YAML, anything else JSON
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        surreal: SurrealOpts,
    },

    /// Manage migration files
    Migrate {
        /// Directory holding the migration files
        #[arg(long, default_value = "migrations", global = true)]
        migrations_dir: PathBuf,

        #[command(subcommand)]
        command: MigrateCommand,
    },

    /// Database maintenance
    Database {
        #[command(subcommand)]
        command: DatabaseCommand,
    },
}

#[derive(Subcommand)]
enum MigrateCommand {
    /// Apply all pending migrations
    Run {
        #[command(flatten)]
        surreal: SurrealOpts,
    },

    /// Create a new, empty migration file
    Add {
        /// Short description, used in the file name
        description: String,
    },

    /// List migration files and whether they have been applied
    List {
        #[command(flatten)]
        surreal: SurrealOpts,
    },
}

#[derive(Subcommand)]
enum DatabaseCommand {
    /// Remove and re-create the database
    Reset {
        #[command(flatten)]
        surreal: SurrealOpts,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            output,
            format,
            exclude,
            no_comments,
            no_client,
            snapshot,
            surreal,
        } => {
            let config = GenerateConfig {
                output,
                exclude,
                render: RenderOptions {
                    format,
                    definitions: !no_comments,
                    client: !no_client,
                },
            };

            let source: Box<dyn SchemaSource> = match snapshot {
                Some(path) => Box::new(SnapshotSource::from_file(&path)?),
                None => Box::new(SurrealSource::new(surreal_connect(&surreal).await?)),
            };
            generate(source.as_ref(), &config).await?;
        }
        Commands::Snapshot { output, surreal } => {
            let source = SurrealSource::new(surreal_connect(&surreal).await?);
            let snapshot = SchemaSnapshot::capture(&source).await?;
            snapshot.to_file(&output)?;
        }
        Commands::Migrate {
            migrations_dir,
            command,
        } => match command {
            MigrateCommand::Run { surreal } => {
                let store = SurrealMigrationStore::new(surreal_connect(&surreal).await?);
                let applied = migrate::run_migrations(&store, &migrations_dir).await?;
                println!("Applied {applied} migrations");
            }
            MigrateCommand::Add { description } => {
                let path = migrate::add_migration(&migrations_dir, &description)?;
                println!("Created {}", path.display());
            }
            MigrateCommand::List { surreal } => {
                let store = SurrealMigrationStore::new(surreal_connect(&surreal).await?);
                list_migrations(&store, &migrations_dir).await?;
            }
        },
        Commands::Database { command } => match command {
            DatabaseCommand::Reset { surreal } => reset_database(&surreal).await?,
        },
    }

    Ok(())
}

async fn list_migrations(store: &dyn MigrationStore, dir: &std::path::Path) -> anyhow::Result<()> {
    let all = migrate::list_migrations(dir)?;
    let applied = store
        .applied()
        .await
        .context("Failed to read applied migrations")?;

    if all.is_empty() {
        println!("No migrations in {}", dir.display());
        return Ok(());
    }
    for migration in &all {
        let status = if applied.contains(&migration.filename) {
            "applied"
        } else {
            "pending"
        };
        println!("{status:>8}  {}", migration.filename);
    }
    Ok(())
}

async fn reset_database(opts: &SurrealOpts) -> anyhow::Result<()> {
    let surreal = surreal_connect(opts).await?;
    surreal
        .query(format!(
            "REMOVE DATABASE `{db}`; DEFINE DATABASE `{db}`;",
            db = opts.database
        ))
        .await?
        .check()
        .with_context(|| format!("Failed to reset database '{}'", opts.database))?;

    tracing::info!("Reset database {}/{}", opts.namespace, opts.database);
    Ok(())
}
