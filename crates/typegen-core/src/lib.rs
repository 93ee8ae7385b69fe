//! Schema reconstruction engine for surreal-typegen.
//!
//! SurrealDB describes the structure of a `SCHEMAFULL` table as a flat map of
//! field paths (`name`, `name.first`, `comments[*]`, `matrix[*][*]`) to their
//! `DEFINE FIELD` statements. This crate turns those flat manifests back into
//! nested type trees:
//!
//! - [`definition`] - parses a raw `DEFINE FIELD` statement into a [`ParsedDefinition`]
//! - [`types`] - the [`TypeDescriptor`] tree and the kind-name mapper
//! - [`reconstruct`] - rebuilds the nested shape from the flat path list
//! - [`table`] - per-table schemaful/schemaless decision
//! - [`schema`] - assembles every table into a [`DatabaseSchema`]
//!
//! # Architecture
//!
//! ```text
//! TableInput (name, DEFINE TABLE, [path -> DEFINE FIELD])
//!    │
//!    ├─── definition   (kind, not_null, ref_target)
//!    ├─── reconstruct  (calls types::to_descriptor at leaves)
//!    ├─── table        (SCHEMAFULL -> Typed, else Open)
//!    └─── schema       (filters the migrations table, keeps order)
//! ```
//!
//! # Example
//!
//! ```rust
//! use typegen_core::{DatabaseSchema, FieldDefinition, TableInput};
//!
//! let schema = DatabaseSchema::build(vec![TableInput::schemaful(
//!     "user",
//!     "DEFINE TABLE user SCHEMAFULL",
//!     vec![FieldDefinition::new(
//!         "age",
//!         "DEFINE FIELD age ON user TYPE int ASSERT $value != NONE",
//!     )],
//! )])
//! .unwrap();
//!
//! assert_eq!(schema.table_names(), vec!["user"]);
//! ```

pub mod definition;
pub mod reconstruct;
pub mod schema;
pub mod table;
pub mod types;

#[cfg(test)]
mod tests;

pub use definition::{parse_definition, ParsedDefinition};
pub use reconstruct::build_shape;
pub use schema::{DatabaseSchema, SchemaError, MIGRATIONS_TABLE};
pub use table::{build_table, is_schemaful, TableShape, TableSchema, SCHEMAFULL_MARKER};
pub use types::{to_descriptor, NamedField, ScalarKind, TypeDescriptor, UNKNOWN_TABLE};

/// One entry of a table's field manifest, as returned by `INFO FOR TABLE`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FieldDefinition {
    /// Field path, e.g. `comments[*].id`
    pub path: String,
    /// Raw `DEFINE FIELD` statement
    pub definition: String,
}

impl FieldDefinition {
    pub fn new(path: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            definition: definition.into(),
        }
    }
}

/// Everything the engine needs to know about one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInput {
    /// Table name
    pub name: String,
    /// Raw `DEFINE TABLE` statement
    pub definition: String,
    /// Field manifest; `None` when table-level introspection was not obtained
    pub fields: Option<Vec<FieldDefinition>>,
}

impl TableInput {
    /// A table with a field manifest.
    pub fn schemaful(
        name: impl Into<String>,
        definition: impl Into<String>,
        fields: Vec<FieldDefinition>,
    ) -> Self {
        Self {
            name: name.into(),
            definition: definition.into(),
            fields: Some(fields),
        }
    }

    /// A table for which no field manifest was fetched.
    pub fn without_fields(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: definition.into(),
            fields: None,
        }
    }
}
