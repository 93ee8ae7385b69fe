//! End-to-end generation from snapshot files.

use surreal_typegen::introspect::{SchemaSnapshot, SnapshotSource};
use surreal_typegen::schema::{ScalarKind, TableShape, TypeDescriptor, MIGRATIONS_TABLE};
use surreal_typegen::{generate, GenerateConfig, OutputFormat, RenderOptions};
use tempfile::TempDir;

const BLOG_SNAPSHOT: &str = r#"
tables:
  - name: _typegen_migrations
    definition: DEFINE TABLE _typegen_migrations SCHEMALESS
  - name: user
    definition: DEFINE TABLE user TYPE NORMAL SCHEMAFULL PERMISSIONS NONE
    fields:
      - path: name
        definition: DEFINE FIELD name ON user TYPE object ASSERT $value != NONE
      - path: name.first
        definition: DEFINE FIELD name.first ON user TYPE string ASSERT $value != NONE
      - path: name.last
        definition: DEFINE FIELD name.last ON user TYPE string
      - path: tags
        definition: DEFINE FIELD tags ON user TYPE array<string>
      - path: friends
        definition: DEFINE FIELD friends ON user TYPE array
      - path: friends[*]
        definition: DEFINE FIELD friends[*] ON user TYPE record<user>
  - name: post
    definition: DEFINE TABLE post SCHEMAFULL
    fields:
      - path: author
        definition: DEFINE FIELD author ON post TYPE record(user) ASSERT $value != NONE
      - path: comments
        definition: DEFINE FIELD comments ON post TYPE array
      - path: comments[*]
        definition: DEFINE FIELD comments[*] ON post TYPE object
      - path: comments[*].body
        definition: DEFINE FIELD comments[*].body ON post TYPE string ASSERT $value != NONE
      - path: comments[*].likes
        definition: DEFINE FIELD comments[*].likes ON post TYPE int
  - name: audit_log
    definition: DEFINE TABLE audit_log SCHEMALESS
"#;

fn write_snapshot(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("schema.yaml");
    std::fs::write(&path, BLOG_SNAPSHOT).unwrap();
    path
}

#[tokio::test]
async fn test_generate_typescript_from_snapshot() {
    let dir = TempDir::new().unwrap();
    let source = SnapshotSource::from_file(write_snapshot(&dir)).unwrap();
    let output = dir.path().join("gen").join("types.ts");

    let config = GenerateConfig {
        output: output.clone(),
        exclude: vec![],
        render: RenderOptions {
            format: OutputFormat::TypeScript,
            definitions: false,
            client: true,
        },
    };
    generate(&source, &config).await.unwrap();

    let content = std::fs::read_to_string(&output).unwrap();
    assert!(content.contains(
        "export type User = {\n  name: {\n    first: string;\n    last?: string;\n  };\n  tags?: string[];\n  friends?: Id<\"user\">[];\n};"
    ));
    assert!(content.contains(
        "export type Post = {\n  author: Id<\"user\">;\n  comments?: {\n    body: string;\n    likes?: number;\n  }[];\n};"
    ));
    assert!(content.contains("export type Audit_log = Record<string, unknown>;"));
    assert!(content.contains(r#"export type TableName = "user" | "post" | "audit_log";"#));
    assert!(!content.contains(MIGRATIONS_TABLE));
    assert!(content.contains("export class SurrealX extends Surreal {"));
    assert!(content.contains("  user: User;\n  post: Post;\n  audit_log: Audit_log;\n}"));
}

#[tokio::test]
async fn test_generate_json_with_exclusions() {
    let dir = TempDir::new().unwrap();
    let source = SnapshotSource::from_file(write_snapshot(&dir)).unwrap();
    let output = dir.path().join("schema.json");

    let config = GenerateConfig {
        output: output.clone(),
        exclude: vec!["audit_log".to_string()],
        render: RenderOptions {
            format: OutputFormat::Json,
            ..Default::default()
        },
    };
    generate(&source, &config).await.unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let names: Vec<&str> = json["tables"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["user", "post"]);
}

#[tokio::test]
async fn test_reconstructed_shape_from_snapshot() {
    let dir = TempDir::new().unwrap();
    let source = SnapshotSource::from_file(write_snapshot(&dir)).unwrap();

    let schema = surreal_typegen::generate::build_schema(&source, &[])
        .await
        .unwrap();

    let user = schema.get_table("user").unwrap();
    let TableShape::Typed(shape) = &user.shape else {
        panic!("user should be typed");
    };
    assert_eq!(
        shape.field("tags").map(|f| &f.ty),
        Some(&TypeDescriptor::array(TypeDescriptor::Scalar(
            ScalarKind::String
        )))
    );
    assert!(!schema.get_table("audit_log").unwrap().is_schemaful());
}

#[tokio::test]
async fn test_schemaful_table_without_fields_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(
        &path,
        r#"{"tables":[{"name":"user","definition":"DEFINE TABLE user SCHEMAFULL"}]}"#,
    )
    .unwrap();

    let source = SnapshotSource::from_file(&path).unwrap();
    let output = dir.path().join("types.ts");
    let config = GenerateConfig {
        output: output.clone(),
        exclude: vec![],
        render: RenderOptions::default(),
    };

    let err = generate(&source, &config).await.unwrap_err();
    assert!(format!("{err:#}").contains("user"));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_empty_snapshot_fails() {
    let source = SnapshotSource::new(SchemaSnapshot::default());
    let dir = TempDir::new().unwrap();
    let config = GenerateConfig {
        output: dir.path().join("types.ts"),
        exclude: vec![],
        render: RenderOptions::default(),
    };

    let err = generate(&source, &config).await.unwrap_err();
    assert!(format!("{err:#}").contains("no tables"));
}
