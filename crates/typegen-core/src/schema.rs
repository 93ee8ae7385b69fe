//! Database-level schema assembly.

use serde::Serialize;
use std::collections::HashMap;

use crate::table::{build_table, TableSchema};
use crate::TableInput;

/// Bookkeeping table the migration runner records applied files in.
///
/// Never part of a generated schema.
pub const MIGRATIONS_TABLE: &str = "_typegen_migrations";

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema assembly.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// No tables left after filtering internal ones
    #[error("The database has no tables. Perhaps you forgot to run migrations")]
    EmptySchema,

    /// Schemaful table without a field manifest
    #[error("No field information available for schemaful table '{table}'")]
    MissingTableInfo { table: String },

    /// Same table name supplied twice
    #[error("Duplicate table: {0}")]
    DuplicateTable(String),
}

// ============================================================================
// Database Schema
// ============================================================================

/// Reconstructed schema of every user table in a database.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseSchema {
    /// Table schemas in introspection order
    pub tables: Vec<TableSchema>,

    /// Cached table lookup (not serialized)
    #[serde(skip)]
    table_map: HashMap<String, usize>,
}

impl DatabaseSchema {
    /// Build the schema of all tables, dropping [`MIGRATIONS_TABLE`].
    pub fn build(tables: Vec<TableInput>) -> Result<Self, SchemaError> {
        Self::build_excluding(tables, &[])
    }

    /// Like [`DatabaseSchema::build`], additionally dropping `excluded` tables.
    pub fn build_excluding(
        tables: Vec<TableInput>,
        excluded: &[String],
    ) -> Result<Self, SchemaError> {
        let mut schema = Self {
            tables: Vec::with_capacity(tables.len()),
            table_map: HashMap::new(),
        };

        for input in tables {
            if input.name == MIGRATIONS_TABLE || excluded.contains(&input.name) {
                tracing::debug!("Skipping excluded table '{}'", input.name);
                continue;
            }
            if schema.table_map.contains_key(&input.name) {
                return Err(SchemaError::DuplicateTable(input.name));
            }
            schema.add_table(build_table(input)?);
        }

        if schema.tables.is_empty() {
            return Err(SchemaError::EmptySchema);
        }

        Ok(schema)
    }

    fn add_table(&mut self, table: TableSchema) {
        let idx = self.tables.len();
        self.table_map.insert(table.name.clone(), idx);
        self.tables.push(table);
    }

    /// Get a table schema by name.
    pub fn get_table(&self, name: &str) -> Option<&TableSchema> {
        self.table_map
            .get(name)
            .and_then(|&idx| self.tables.get(idx))
    }

    /// All table names, in table order.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }
}

impl PartialEq for DatabaseSchema {
    fn eq(&self, other: &Self) -> bool {
        self.tables == other.tables
    }
}
