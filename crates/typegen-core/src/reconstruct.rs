//! Reconstruction of nested type trees from flat field paths.
//!
//! `INFO FOR TABLE` lists every field of a schemaful table as a flat path:
//!
//! ```text
//! name                 TYPE object
//! name.first           TYPE string
//! comments             TYPE array
//! comments[*]          TYPE object
//! comments[*].id       TYPE string
//! matrix               TYPE array
//! matrix[*]            TYPE array
//! matrix[*][*]         TYPE int
//! ```
//!
//! `.` descends into an object and a trailing `[*]` denotes the element of an
//! array. The element path (`comments[*]`) is not a field of its own: when it
//! is the only direct child of an array it describes what the array holds, and
//! is unwrapped into the element type instead of becoming a named member.

use crate::definition::{parse_definition, ParsedDefinition};
use crate::types::{to_descriptor, NamedField, ScalarKind, TypeDescriptor};
use crate::FieldDefinition;

/// Marker for "element of the array at this path".
pub const ARRAY_MARKER: &str = "[*]";

/// A field whose definition has been parsed once up front.
struct ParsedField<'a> {
    path: &'a str,
    definition: &'a str,
    parsed: ParsedDefinition,
}

/// Build the object descriptor described by a table's field manifest.
///
/// Fields keep the order in which they are supplied. The result is always a
/// [`TypeDescriptor::Object`]: top-level paths never carry an array marker.
pub fn build_shape(fields: &[FieldDefinition]) -> TypeDescriptor {
    let parsed: Vec<ParsedField<'_>> = fields
        .iter()
        .map(|f| ParsedField {
            path: &f.path,
            definition: &f.definition,
            parsed: parse_definition(&f.definition),
        })
        .collect();
    let all: Vec<&ParsedField<'_>> = parsed.iter().collect();

    build(&all, None)
}

fn build(fields: &[&ParsedField<'_>], parent: Option<&str>) -> TypeDescriptor {
    let base: Vec<&ParsedField<'_>> = fields
        .iter()
        .copied()
        .filter(|f| is_direct_child(f.path, parent))
        .collect();

    // A lone `<parent>[*]` child describes the elements of the parent array.
    // The caller already applied the `Array` wrapper.
    if let [element] = base.as_slice() {
        if element.path.ends_with(ARRAY_MARKER) {
            return field_type(fields, element);
        }
    }

    TypeDescriptor::Object(
        base.iter()
            .map(|f| NamedField {
                name: field_name(f.path),
                ty: field_type(fields, f),
                optional: !f.parsed.not_null,
                definition: f.definition.to_string(),
            })
            .collect(),
    )
}

fn field_type(fields: &[&ParsedField<'_>], field: &ParsedField<'_>) -> TypeDescriptor {
    if field.parsed.is_object() {
        let children = with_prefix(fields, &format!("{}.", field.path));
        build(&children, Some(field.path))
    } else if field.parsed.is_array() {
        TypeDescriptor::array(array_element(fields, field))
    } else {
        to_descriptor(&field.parsed.kind, field.parsed.ref_target.as_deref())
    }
}

/// Element type of an array field.
///
/// Falls back to the inline `array<T>` item kind, or `unknown`, when the
/// manifest has no `<path>[*]` entries.
fn array_element(fields: &[&ParsedField<'_>], field: &ParsedField<'_>) -> TypeDescriptor {
    let elements = with_prefix(fields, &format!("{}{ARRAY_MARKER}", field.path));
    if elements.is_empty() {
        tracing::debug!(
            "Array field '{}' has no element definition, using inline item type",
            field.path
        );
        return match field.parsed.item.as_deref() {
            Some(item) => inline_item(item),
            None => TypeDescriptor::Scalar(ScalarKind::Unknown),
        };
    }

    build(&elements, Some(field.path))
}

fn inline_item(item: &ParsedDefinition) -> TypeDescriptor {
    if item.is_array() {
        let element = match item.item.as_deref() {
            Some(inner) => inline_item(inner),
            None => TypeDescriptor::Scalar(ScalarKind::Unknown),
        };
        return TypeDescriptor::array(element);
    }
    to_descriptor(&item.kind, item.ref_target.as_deref())
}

fn with_prefix<'a, 'b>(fields: &[&'b ParsedField<'a>], prefix: &str) -> Vec<&'b ParsedField<'a>> {
    fields
        .iter()
        .copied()
        .filter(|f| f.path.starts_with(prefix))
        .collect()
}

/// Whether `path` is a direct child of `parent` (or a top-level field).
///
/// Direct children of `p` are `p[*]` (the element descriptor) and `p.name`
/// where `name` is a plain segment. `p[*][*]`, `p.child[*]` and `p.a.b` all
/// belong to deeper levels.
fn is_direct_child(path: &str, parent: Option<&str>) -> bool {
    match parent {
        None => !path.contains('.') && !path.contains(ARRAY_MARKER),
        Some(parent) => match path.strip_prefix(parent) {
            Some(ARRAY_MARKER) => true,
            Some(rest) => rest.strip_prefix('.').is_some_and(|name| {
                !name.is_empty() && !name.contains('.') && !name.contains(ARRAY_MARKER)
            }),
            None => false,
        },
    }
}

fn field_name(path: &str) -> String {
    path.rsplit('.')
        .next()
        .unwrap_or(path)
        .replace(ARRAY_MARKER, "")
}
