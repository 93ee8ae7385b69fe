//! Live introspection through the SurrealDB SDK.

use anyhow::Result;
use async_trait::async_trait;
use typegen_core::FieldDefinition;

use super::{parse_db_info, parse_table_info, SchemaSource};
use crate::connect::SurrealClient;

/// [`SchemaSource`] backed by `INFO FOR DB` / `INFO FOR TABLE`.
pub struct SurrealSource {
    client: SurrealClient,
}

impl SurrealSource {
    /// Create a new source from an existing Surreal connection.
    pub fn new(client: SurrealClient) -> Self {
        Self { client }
    }

    async fn info(&self, sql: String) -> Result<Option<serde_json::Value>> {
        let mut response = self.client.query(sql).await?.check()?;
        let info: Option<serde_json::Value> = response.take(0)?;
        Ok(info)
    }
}

#[async_trait]
impl SchemaSource for SurrealSource {
    async fn tables(&self) -> Result<Vec<(String, String)>> {
        let info = self
            .info("INFO FOR DB;".to_string())
            .await?
            .ok_or_else(|| anyhow::anyhow!("INFO FOR DB returned no result"))?;
        parse_db_info(&info)
    }

    async fn fields(&self, table: &str) -> Result<Option<Vec<FieldDefinition>>> {
        match self.info(format!("INFO FOR TABLE `{table}`;")).await? {
            Some(info) => Ok(Some(parse_table_info(table, &info)?)),
            None => Ok(None),
        }
    }
}
