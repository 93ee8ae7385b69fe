//! The `generate` command: introspect, reconstruct, render, write.

use anyhow::{Context, Result};
use std::path::PathBuf;
use typegen_core::DatabaseSchema;

use crate::introspect::{collect_tables, SchemaSource};
use crate::render::{render, RenderOptions};

/// Configuration for a generation run.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// File the rendered output is written to
    pub output: PathBuf,

    /// Tables to leave out in addition to the migrations table
    pub exclude: Vec<String>,

    pub render: RenderOptions,
}

/// Build the [`DatabaseSchema`] of everything `source` describes.
pub async fn build_schema(source: &dyn SchemaSource, exclude: &[String]) -> Result<DatabaseSchema> {
    let tables = collect_tables(source).await?;
    let schema = DatabaseSchema::build_excluding(tables, exclude)
        .context("Failed to reconstruct database schema")?;

    tracing::debug!("Reconstructed tables: {:?}", schema.table_names());
    Ok(schema)
}

/// Generate the output file.
///
/// The output is rendered in memory first, so a failing run never leaves a
/// partially written file behind.
pub async fn generate(source: &dyn SchemaSource, config: &GenerateConfig) -> Result<()> {
    let schema = build_schema(source, &config.exclude).await?;
    let content = render(&schema, &config.render).context("Failed to render schema")?;

    if let Some(parent) = config.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    std::fs::write(&config.output, content)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    tracing::info!(
        "Generated types for {} tables into {}",
        schema.tables.len(),
        config.output.display()
    );
    Ok(())
}
