//! Per-table schema construction.

use serde::Serialize;

use crate::reconstruct::build_shape;
use crate::schema::SchemaError;
use crate::types::TypeDescriptor;
use crate::TableInput;

/// Token in a `DEFINE TABLE` statement marking a table as typed.
pub const SCHEMAFULL_MARKER: &str = "SCHEMAFULL";

/// Shape of a table's records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "shape", rename_all = "snake_case")]
pub enum TableShape {
    /// Schemaful table, always an object descriptor
    Typed(TypeDescriptor),
    /// Schemaless table accepting arbitrary keys
    Open,
}

/// Reconstructed schema of a single table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    /// Table name
    pub name: String,

    /// Raw `DEFINE TABLE` statement
    pub definition: String,

    /// Record shape
    pub shape: TableShape,
}

impl TableSchema {
    pub fn is_schemaful(&self) -> bool {
        matches!(self.shape, TableShape::Typed(_))
    }

    /// The object descriptor of a schemaful table.
    pub fn typed_shape(&self) -> Option<&TypeDescriptor> {
        match &self.shape {
            TableShape::Typed(ty) => Some(ty),
            TableShape::Open => None,
        }
    }
}

/// Whether a `DEFINE TABLE` statement declares a schemaful table.
pub fn is_schemaful(table_definition: &str) -> bool {
    table_definition
        .split_whitespace()
        .any(|token| token.trim_end_matches(';') == SCHEMAFULL_MARKER)
}

/// Build the schema of one table.
///
/// Schemaless tables have no reliable field manifest, so any supplied fields
/// are ignored and the shape is [`TableShape::Open`].
pub fn build_table(input: TableInput) -> Result<TableSchema, SchemaError> {
    let TableInput {
        name,
        definition,
        fields,
    } = input;

    if !is_schemaful(&definition) {
        tracing::debug!("Table '{}' is schemaless, emitting open shape", name);
        return Ok(TableSchema {
            name,
            definition,
            shape: TableShape::Open,
        });
    }

    let fields = fields.ok_or_else(|| SchemaError::MissingTableInfo {
        table: name.clone(),
    })?;

    tracing::debug!(
        "Reconstructing table '{}' from {} field definitions",
        name,
        fields.len()
    );

    Ok(TableSchema {
        shape: TableShape::Typed(build_shape(&fields)),
        name,
        definition,
    })
}
