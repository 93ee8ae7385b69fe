//! surreal-typegen Library
//!
//! Generates typed client declarations from the schema of a SurrealDB database
//! and manages the migration files that define that schema.
//!
//! # Features
//!
//! - Schema introspection: reads `INFO FOR DB` / `INFO FOR TABLE` from a live
//!   database, or from a snapshot file captured earlier
//! - Type reconstruction: rebuilds nested object/array types from flat field
//!   paths (see the `typegen_core` crate)
//! - Rendering: TypeScript declarations or a JSON dump of the schema
//! - Migrations: timestamped SurrealQL files applied in order and recorded in
//!   a bookkeeping table
//!
//! # CLI Usage
//!
//! ```bash
//! # Apply pending migrations
//! surreal-typegen migrate run --migrations-dir migrations
//!
//! # Scaffold a new migration
//! surreal-typegen migrate add "create user table"
//!
//! # Generate TypeScript types
//! surreal-typegen generate --output src/gen.ts --namespace test --database test
//!
//! # Generate from a snapshot, without a running database
//! surreal-typegen generate --snapshot schema.yaml --output src/gen.ts
//! ```

use clap::Parser;

pub mod connect;
pub mod generate;
pub mod introspect;
pub mod migrate;
pub mod render;

pub use connect::surreal_connect;
pub use generate::{generate, GenerateConfig};
pub use introspect::{collect_tables, SchemaSource};
pub use render::{OutputFormat, RenderOptions};

// Re-export the engine for convenience
pub use typegen_core as schema;

#[derive(Parser, Clone, Debug)]
pub struct SurrealOpts {
    /// SurrealDB endpoint URL
    #[arg(
        long,
        default_value = "http://localhost:8000",
        env = "SURREAL_ENDPOINT"
    )]
    pub surreal_endpoint: String,

    /// SurrealDB username
    #[arg(long, default_value = "root", env = "SURREAL_USERNAME")]
    pub surreal_username: String,

    /// SurrealDB password
    #[arg(long, default_value = "root", env = "SURREAL_PASSWORD")]
    pub surreal_password: String,

    /// SurrealDB namespace
    #[arg(long = "namespace", default_value = "test", env = "SURREAL_NAMESPACE")]
    pub namespace: String,

    /// SurrealDB database
    #[arg(long = "database", default_value = "test", env = "SURREAL_DATABASE")]
    pub database: String,
}
