//! Migration files and the migration runner.
//!
//! Migrations are SurrealQL files named `<timestamp>_<description>.surql`
//! (the legacy `.sql` extension is accepted too) in a migrations directory.
//! They are applied in timestamp order, and every applied file name is
//! recorded in [`MIGRATIONS_TABLE`] so it is never run twice.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub use typegen_core::MIGRATIONS_TABLE;

mod surreal;

pub use surreal::SurrealMigrationStore;

/// Extension of newly created migration files.
pub const MIGRATION_EXTENSION: &str = "surql";

const ACCEPTED_EXTENSIONS: &[&str] = &[MIGRATION_EXTENSION, "sql"];

const MIGRATION_TEMPLATE: &str = "-- Add migration script here\n";

/// A migration file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// Numeric timestamp prefix of the file name
    pub version: u64,
    /// File name, as recorded in the migrations table
    pub filename: String,
    pub path: PathBuf,
}

impl MigrationFile {
    /// Parse `<version>_<description>.<ext>`; None for anything else.
    fn from_path(path: PathBuf) -> Option<Self> {
        let filename = path.file_name()?.to_str()?.to_string();
        let extension = path.extension()?.to_str()?;
        if !ACCEPTED_EXTENSIONS.contains(&extension) {
            return None;
        }
        let version = filename.split('_').next()?.parse().ok()?;
        Some(Self {
            version,
            filename,
            path,
        })
    }
}

/// Storage of applied-migration bookkeeping.
#[async_trait]
pub trait MigrationStore: Send + Sync {
    /// File names of all migrations applied so far.
    async fn applied(&self) -> Result<Vec<String>>;

    /// Execute a migration and record it as applied.
    async fn apply(&self, migration: &MigrationFile, sql: &str) -> Result<()>;
}

/// List migration files in `dir`, ordered by version.
///
/// Files that do not follow the naming scheme are skipped with a warning.
pub fn list_migrations(dir: &Path) -> Result<Vec<MigrationFile>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read migrations directory {}", dir.display()))?;

    let mut migrations = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        match MigrationFile::from_path(entry.path()) {
            Some(migration) => migrations.push(migration),
            None => tracing::warn!(
                "Ignoring {}: not a <timestamp>_<description>.{} file",
                entry.path().display(),
                MIGRATION_EXTENSION
            ),
        }
    }

    migrations.sort_by(|a, b| {
        a.version
            .cmp(&b.version)
            .then_with(|| a.filename.cmp(&b.filename))
    });
    Ok(migrations)
}

/// Migrations from `all` whose file name is not in `applied`, keeping order.
pub fn pending_migrations<'a>(
    all: &'a [MigrationFile],
    applied: &[String],
) -> Vec<&'a MigrationFile> {
    all.iter()
        .filter(|m| !applied.contains(&m.filename))
        .collect()
}

/// File name for a new migration created at `now`.
pub fn migration_filename(description: &str, now: DateTime<Utc>) -> String {
    let description = description.trim().replace(' ', "_");
    format!(
        "{}_{description}.{MIGRATION_EXTENSION}",
        now.format("%Y%m%d%H%M%S")
    )
}

/// Create a new, empty migration file in `dir`.
pub fn add_migration(dir: &Path, description: &str) -> Result<PathBuf> {
    if description.trim().is_empty() {
        anyhow::bail!("Missing migration description");
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create migrations directory {}", dir.display()))?;

    let path = dir.join(migration_filename(description, Utc::now()));
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .with_context(|| format!("Failed to create migration {}", path.display()))?;
    file.write_all(MIGRATION_TEMPLATE.as_bytes())?;

    tracing::info!("Created migration {}", path.display());
    Ok(path)
}

/// Apply every pending migration in `dir`, stopping at the first failure.
///
/// Returns the number of migrations applied.
pub async fn run_migrations(store: &dyn MigrationStore, dir: &Path) -> Result<usize> {
    let all = list_migrations(dir)?;
    let applied = store
        .applied()
        .await
        .context("Failed to read applied migrations")?;

    let pending = pending_migrations(&all, &applied);
    if pending.is_empty() {
        tracing::info!("No pending migrations");
        return Ok(0);
    }

    for migration in &pending {
        tracing::info!("Running migration: {}", migration.filename);
        let sql = std::fs::read_to_string(&migration.path)
            .with_context(|| format!("Failed to read migration {}", migration.path.display()))?;
        store
            .apply(migration, &sql)
            .await
            .with_context(|| format!("Migration {} failed", migration.filename))?;
    }

    tracing::info!("Applied {} migrations", pending.len());
    Ok(pending.len())
}
