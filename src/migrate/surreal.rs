//! SurrealDB migration bookkeeping.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use super::{MigrationFile, MigrationStore, MIGRATIONS_TABLE};
use crate::connect::SurrealClient;

#[derive(Debug, Deserialize)]
struct AppliedMigration {
    filename: String,
}

/// [`MigrationStore`] that executes migrations against SurrealDB and records
/// them in the migrations table of the same database.
pub struct SurrealMigrationStore {
    client: SurrealClient,
    table_name: String,
}

impl SurrealMigrationStore {
    /// Create a new store using the default migrations table.
    pub fn new(client: SurrealClient) -> Self {
        Self::with_table(client, MIGRATIONS_TABLE.to_string())
    }

    pub fn with_table(client: SurrealClient, table_name: String) -> Self {
        Self { client, table_name }
    }
}

/// Wrap a migration and its bookkeeping record into one transaction.
///
/// The script is closed with a line break and `;` so a trailing comment or a
/// missing final `;` cannot swallow the statements that follow.
fn transaction(sql: &str) -> String {
    let sql = sql.trim_end();
    let terminator = if sql.ends_with(';') { "" } else { "\n;" };
    format!(
        "BEGIN TRANSACTION;\n{sql}{terminator}\n\
         CREATE type::table($table) SET filename = $filename, applied_at = time::now();\n\
         COMMIT TRANSACTION;"
    )
}

#[async_trait]
impl MigrationStore for SurrealMigrationStore {
    async fn applied(&self) -> Result<Vec<String>> {
        let mut response = self
            .client
            .query("SELECT filename FROM type::table($table) ORDER BY filename")
            .bind(("table", self.table_name.clone()))
            .await?
            .check()?;
        let applied: Vec<AppliedMigration> = response.take(0)?;
        Ok(applied.into_iter().map(|m| m.filename).collect())
    }

    async fn apply(&self, migration: &MigrationFile, sql: &str) -> Result<()> {
        self.client
            .query(transaction(sql))
            .bind(("table", self.table_name.clone()))
            .bind(("filename", migration.filename.clone()))
            .await?
            .check()?;

        tracing::debug!(
            "Recorded migration {} in {}",
            migration.filename,
            self.table_name
        );
        Ok(())
    }
}
