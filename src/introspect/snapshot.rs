//! Offline introspection from a snapshot file.
//!
//! A snapshot captures the output of introspection so types can be generated
//! without a running database (e.g. in CI):
//!
//! ```yaml
//! tables:
//!   - name: user
//!     definition: DEFINE TABLE user SCHEMAFULL
//!     fields:
//!       - path: age
//!         definition: DEFINE FIELD age ON user TYPE int ASSERT $value != NONE
//!   - name: log
//!     definition: DEFINE TABLE log SCHEMALESS
//! ```

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use typegen_core::{FieldDefinition, TableInput};

use super::{collect_tables, SchemaSource};

/// One table of a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotTable {
    /// Table name
    pub name: String,

    /// Raw `DEFINE TABLE` statement
    pub definition: String,

    /// Field manifest, absent for schemaless tables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldDefinition>>,
}

/// Serialized introspection result.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SchemaSnapshot {
    pub tables: Vec<SnapshotTable>,
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

impl SchemaSnapshot {
    /// Capture a snapshot from any source.
    pub async fn capture(source: &dyn SchemaSource) -> Result<Self> {
        let tables = collect_tables(source)
            .await?
            .into_iter()
            .map(|t| SnapshotTable {
                name: t.name,
                definition: t.definition,
                fields: t.fields,
            })
            .collect();
        Ok(Self { tables })
    }

    /// Load a snapshot; `.yaml`/`.yml` files are read as YAML, anything else as JSON.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot file {}", path.display()))?;

        let snapshot = if is_yaml(path) {
            serde_yaml::from_str(&content).with_context(|| "Failed to parse snapshot YAML")?
        } else {
            serde_json::from_str(&content).with_context(|| "Failed to parse snapshot JSON")?
        };
        Ok(snapshot)
    }

    /// Write the snapshot, choosing the format from the file extension.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml(path) {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write snapshot file {}", path.display()))?;
        tracing::info!("Stored schema snapshot to {}", path.display());
        Ok(())
    }

    /// Engine inputs, without going through a [`SchemaSource`].
    pub fn into_table_inputs(self) -> Vec<TableInput> {
        self.tables
            .into_iter()
            .map(|t| TableInput {
                name: t.name,
                definition: t.definition,
                fields: t.fields,
            })
            .collect()
    }
}

/// [`SchemaSource`] serving a loaded [`SchemaSnapshot`].
pub struct SnapshotSource {
    snapshot: SchemaSnapshot,
}

impl SnapshotSource {
    pub fn new(snapshot: SchemaSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(SchemaSnapshot::from_file(path)?))
    }
}

#[async_trait]
impl SchemaSource for SnapshotSource {
    async fn tables(&self) -> Result<Vec<(String, String)>> {
        Ok(self
            .snapshot
            .tables
            .iter()
            .map(|t| (t.name.clone(), t.definition.clone()))
            .collect())
    }

    async fn fields(&self, table: &str) -> Result<Option<Vec<FieldDefinition>>> {
        Ok(self
            .snapshot
            .tables
            .iter()
            .find(|t| t.name == table)
            .and_then(|t| t.fields.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE_SNAPSHOT: &str = r#"
tables:
  - name: user
    definition: DEFINE TABLE user SCHEMAFULL
    fields:
      - path: age
        definition: DEFINE FIELD age ON user TYPE int ASSERT $value != NONE
      - path: name
        definition: DEFINE FIELD name ON user TYPE string
  - name: log
    definition: DEFINE TABLE log SCHEMALESS
"#;

    #[test]
    fn test_load_yaml_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schema.yaml");
        std::fs::write(&path, SAMPLE_SNAPSHOT).unwrap();

        let snapshot = SchemaSnapshot::from_file(&path).unwrap();
        assert_eq!(snapshot.tables.len(), 2);
        assert_eq!(snapshot.tables[0].fields.as_ref().map(Vec::len), Some(2));
        assert!(snapshot.tables[1].fields.is_none());
    }

    #[test]
    fn test_json_snapshot_roundtrip() {
        let dir = TempDir::new().unwrap();
        let yaml_path = dir.path().join("schema.yml");
        let json_path = dir.path().join("schema.json");
        std::fs::write(&yaml_path, SAMPLE_SNAPSHOT).unwrap();

        let snapshot = SchemaSnapshot::from_file(&yaml_path).unwrap();
        snapshot.to_file(&json_path).unwrap();

        let loaded = SchemaSnapshot::from_file(&json_path).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_missing_snapshot_file() {
        let dir = TempDir::new().unwrap();
        let err = SchemaSnapshot::from_file(dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read snapshot file"));
    }

    #[tokio::test]
    async fn test_snapshot_source_collects_inputs() {
        let snapshot: SchemaSnapshot = serde_yaml::from_str(SAMPLE_SNAPSHOT).unwrap();
        let source = SnapshotSource::new(snapshot.clone());

        let inputs = collect_tables(&source).await.unwrap();
        assert_eq!(inputs, snapshot.into_table_inputs());
    }
}
