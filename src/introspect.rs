//! Schema introspection.
//!
//! A [`SchemaSource`] supplies the two inputs the reconstruction engine
//! needs: every table with its `DEFINE TABLE` statement, and for schemaful
//! tables the `path -> DEFINE FIELD` manifest.
//!
//! - [`SurrealSource`] - live database via `INFO FOR DB` / `INFO FOR TABLE`
//! - [`SnapshotSource`] - JSON or YAML snapshot file

use anyhow::{Context, Result};
use async_trait::async_trait;
use typegen_core::{is_schemaful, FieldDefinition, TableInput};

mod snapshot;
mod surreal;

pub use snapshot::{SchemaSnapshot, SnapshotSource, SnapshotTable};
pub use surreal::SurrealSource;

/// Source of table and field definitions.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// All tables as `(name, DEFINE TABLE statement)`, in source order.
    async fn tables(&self) -> Result<Vec<(String, String)>>;

    /// Field manifest of one table.
    ///
    /// Returns None if the source has no table-level information for it.
    async fn fields(&self, table: &str) -> Result<Option<Vec<FieldDefinition>>>;
}

/// Collect engine inputs for every table of `source`.
///
/// Field manifests are only fetched for schemaful tables.
pub async fn collect_tables(source: &dyn SchemaSource) -> Result<Vec<TableInput>> {
    let tables = source
        .tables()
        .await
        .context("Failed to list database tables")?;

    let mut inputs = Vec::with_capacity(tables.len());
    for (name, definition) in tables {
        let fields = if is_schemaful(&definition) {
            source
                .fields(&name)
                .await
                .with_context(|| format!("Failed to read field definitions of table '{name}'"))?
        } else {
            None
        };

        tracing::debug!(
            "Collected table '{}' ({} fields)",
            name,
            fields.as_ref().map_or(0, Vec::len)
        );

        inputs.push(TableInput {
            name,
            definition,
            fields,
        });
    }

    Ok(inputs)
}

/// Extract `(name, definition)` pairs from an `INFO FOR DB` result.
///
/// Accepts both the current `tables` key and the legacy `tb` key.
pub fn parse_db_info(info: &serde_json::Value) -> Result<Vec<(String, String)>> {
    let tables = info
        .get("tables")
        .or_else(|| info.get("tb"))
        .and_then(|t| t.as_object())
        .ok_or_else(|| anyhow::anyhow!("INFO FOR DB result has no table map: {info}"))?;

    tables
        .iter()
        .map(|(name, definition)| {
            let definition = definition
                .as_str()
                .ok_or_else(|| anyhow::anyhow!("Definition of table '{name}' is not a string"))?;
            Ok((name.clone(), definition.to_string()))
        })
        .collect()
}

/// Extract the field manifest from an `INFO FOR TABLE` result.
///
/// Accepts both the current `fields` key and the legacy `fd` key.
pub fn parse_table_info(table: &str, info: &serde_json::Value) -> Result<Vec<FieldDefinition>> {
    let fields = info
        .get("fields")
        .or_else(|| info.get("fd"))
        .and_then(|f| f.as_object())
        .ok_or_else(|| anyhow::anyhow!("INFO FOR TABLE {table} result has no field map"))?;

    fields
        .iter()
        .map(|(path, definition)| {
            let definition = definition.as_str().ok_or_else(|| {
                anyhow::anyhow!("Definition of field '{path}' on '{table}' is not a string")
            })?;
            Ok(FieldDefinition::new(path.clone(), definition))
        })
        .collect()
}
