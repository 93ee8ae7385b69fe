//! Rendering of a [`DatabaseSchema`] into source text.
//!
//! Two formats are supported:
//! - `typescript` - a module with one type alias per table, a `TableName`
//!   union, a `TableTypes` interface keyed by table name and the typed
//!   `SurrealX` client class
//! - `json` - the schema descriptor itself

use anyhow::bail;
use std::collections::HashMap;
use std::fmt::Write;
use typegen_core::{DatabaseSchema, NamedField, ScalarKind, TableShape, TypeDescriptor};

mod client;

use client::{CLIENT_CLASS, CLIENT_HELPER_TYPES, CLIENT_IMPORT, DECLARED_NAMES};

/// Output format of `generate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// TypeScript declarations and client
    #[default]
    #[value(name = "ts")]
    TypeScript,
    /// JSON schema descriptor
    #[value(name = "json")]
    Json,
}

/// Options for rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub format: OutputFormat,

    /// Echo `DEFINE` statements as doc comments (TypeScript only)
    pub definitions: bool,

    /// Emit the `SurrealX` client class and its helper types (TypeScript only)
    pub client: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::TypeScript,
            definitions: true,
            client: true,
        }
    }
}

const HEADER: &str = "// Generated by surreal-typegen. Do not edit by hand.\n";

const ID_TYPE: &str = r#"/** Record id of a row in table `T` */
export type Id<T extends string> = `${T}:${string}`;
"#;

const INDENT: &str = "  ";

/// Render `schema` in the requested format.
pub fn render(schema: &DatabaseSchema, options: &RenderOptions) -> anyhow::Result<String> {
    match options.format {
        OutputFormat::TypeScript => render_typescript(schema, options),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(schema)? + "\n"),
    }
}

fn render_typescript(schema: &DatabaseSchema, options: &RenderOptions) -> anyhow::Result<String> {
    let type_names = type_names(schema)?;

    let mut out = String::new();
    writeln!(out, "{HEADER}")?;
    if options.client {
        writeln!(out, "{CLIENT_IMPORT}")?;
    }
    writeln!(out, "{ID_TYPE}")?;

    for (table, type_name) in schema.tables.iter().zip(&type_names) {
        if options.definitions {
            write_definition_comment(&mut out, &table.definition, 0)?;
        }
        match &table.shape {
            TableShape::Open => {
                writeln!(out, "export type {type_name} = Record<string, unknown>;")?;
            }
            TableShape::Typed(shape) => {
                write!(out, "export type {type_name} = ")?;
                write_type(&mut out, shape, 0, options.definitions)?;
                writeln!(out, ";")?;
            }
        }
        writeln!(out)?;
    }

    writeln!(out, "/** Names of tables in the database */")?;
    let union = schema
        .table_names()
        .iter()
        .map(|name| string_literal(name))
        .collect::<Vec<_>>()
        .join(" | ");
    writeln!(out, "export type TableName = {union};")?;
    writeln!(out)?;

    writeln!(
        out,
        "export interface TableTypes extends Record<TableName, Record<string, unknown>> {{"
    )?;
    for (name, type_name) in schema.table_names().into_iter().zip(&type_names) {
        writeln!(out, "{INDENT}{}: {type_name};", property_name(name))?;
    }
    writeln!(out, "}}")?;

    if options.client {
        writeln!(out)?;
        writeln!(out, "{CLIENT_HELPER_TYPES}")?;
        write!(out, "{CLIENT_CLASS}")?;
    }

    Ok(out)
}

fn write_type(
    out: &mut String,
    ty: &TypeDescriptor,
    depth: usize,
    definitions: bool,
) -> std::fmt::Result {
    match ty {
        TypeDescriptor::Scalar(kind) => write!(out, "{}", scalar_name(*kind)),
        TypeDescriptor::Reference(table) => write!(out, "Id<{}>", string_literal(table)),
        TypeDescriptor::Array(element) => {
            write_type(out, element, depth, definitions)?;
            write!(out, "[]")
        }
        TypeDescriptor::Object(fields) if fields.is_empty() => write!(out, "{{}}"),
        TypeDescriptor::Object(fields) => {
            writeln!(out, "{{")?;
            for field in fields {
                write_field(out, field, depth + 1, definitions)?;
            }
            write!(out, "{}}}", INDENT.repeat(depth))
        }
    }
}

fn write_field(
    out: &mut String,
    field: &NamedField,
    depth: usize,
    definitions: bool,
) -> std::fmt::Result {
    if definitions {
        write_definition_comment(out, &field.definition, depth)?;
    }
    let optional = if field.optional { "?" } else { "" };
    write!(
        out,
        "{}{}{optional}: ",
        INDENT.repeat(depth),
        property_name(&field.name)
    )?;
    write_type(out, &field.ty, depth, definitions)?;
    writeln!(out, ";")
}

fn write_definition_comment(out: &mut String, definition: &str, depth: usize) -> std::fmt::Result {
    let indent = INDENT.repeat(depth);
    // A literal `*/` would terminate the comment early
    let definition = definition.replace("*/", "*\\/");
    writeln!(out, "{indent}/**")?;
    writeln!(out, "{indent} * Definition:")?;
    writeln!(out, "{indent} * ```sql")?;
    for line in definition.lines() {
        writeln!(out, "{indent} * {line}")?;
    }
    writeln!(out, "{indent} * ```")?;
    writeln!(out, "{indent} */")
}

fn scalar_name(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::String => "string",
        ScalarKind::Number => "number",
        ScalarKind::Boolean => "boolean",
        ScalarKind::Unknown => "unknown",
    }
}

/// Type alias name for a table.
///
/// The first letter is upper-cased and every character that cannot appear in
/// a TypeScript identifier becomes `_`.
pub fn type_name(table: &str) -> String {
    let mut name = String::with_capacity(table.len() + 1);
    for (idx, c) in table.chars().enumerate() {
        let c = if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
            c
        } else {
            '_'
        };
        match idx {
            0 if c.is_ascii_digit() => {
                name.push('_');
                name.push(c);
            }
            0 => name.push(c.to_ascii_uppercase()),
            _ => name.push(c),
        }
    }
    if name.is_empty() {
        name.push('_');
    }
    name
}

/// Alias names of all tables, in table order.
///
/// Fails when two tables map to the same alias, or when an alias would
/// shadow a declaration of the generated module.
fn type_names(schema: &DatabaseSchema) -> anyhow::Result<Vec<String>> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut names = Vec::with_capacity(schema.tables.len());

    for table in &schema.tables {
        let name = type_name(&table.name);
        if DECLARED_NAMES.contains(&name.as_str()) {
            bail!(
                "Table '{}' maps to the TypeScript type '{name}', which the generated module already declares",
                table.name
            );
        }
        if let Some(other) = seen.insert(name.clone(), &table.name) {
            bail!(
                "Tables '{other}' and '{}' both map to the TypeScript type '{name}'",
                table.name
            );
        }
        names.push(name);
    }

    Ok(names)
}

/// Property key, quoted when it is not a valid identifier.
fn property_name(name: &str) -> String {
    let mut chars = name.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_identifier {
        name.to_string()
    } else {
        string_literal(name)
    }
}

/// Double-quoted string literal, escaped the JSON way.
fn string_literal(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}
