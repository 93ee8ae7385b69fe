//! Reconstructed type trees and the kind-name mapper.

use serde::Serialize;

/// Reference target used when a `record` kind names no parseable table.
pub const UNKNOWN_TABLE: &str = "unknown";

/// Primitive value categories a generated client can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    String,
    Number,
    Boolean,
    Unknown,
}

/// Type of a reconstructed field.
///
/// Leaves are [`TypeDescriptor::Scalar`] or [`TypeDescriptor::Reference`];
/// an [`TypeDescriptor::Array`] always wraps exactly one element type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "of", rename_all = "snake_case")]
pub enum TypeDescriptor {
    /// Primitive value
    Scalar(ScalarKind),
    /// Record id pointing into another table
    Reference(String),
    /// Nested object with fields in declaration order
    Object(Vec<NamedField>),
    /// Array of another type
    Array(Box<TypeDescriptor>),
}

impl TypeDescriptor {
    pub fn array(element: TypeDescriptor) -> Self {
        Self::Array(Box::new(element))
    }

    /// Fields of an object descriptor, `None` for every other variant.
    pub fn fields(&self) -> Option<&[NamedField]> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Look up a direct child field of an object descriptor by name.
    pub fn field(&self, name: &str) -> Option<&NamedField> {
        self.fields()?.iter().find(|f| f.name == name)
    }
}

/// A named member of an object descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedField {
    /// Final path segment with the array marker stripped
    pub name: String,

    /// Field type
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,

    /// Whether the field may be absent
    pub optional: bool,

    /// Raw `DEFINE FIELD` statement the field was built from
    pub definition: String,
}

/// Map a leaf kind name to its descriptor.
///
/// `object` and `array` are never resolved here: the reconstructor handles
/// them structurally, so reaching this function with either yields
/// [`ScalarKind::Unknown`].
pub fn to_descriptor(kind: &str, ref_target: Option<&str>) -> TypeDescriptor {
    match kind {
        "string" | "datetime" | "duration" | "uuid" => TypeDescriptor::Scalar(ScalarKind::String),
        "int" | "decimal" | "float" | "number" => TypeDescriptor::Scalar(ScalarKind::Number),
        "bool" => TypeDescriptor::Scalar(ScalarKind::Boolean),
        "record" => TypeDescriptor::Reference(ref_target.unwrap_or(UNKNOWN_TABLE).to_string()),
        _ => TypeDescriptor::Scalar(ScalarKind::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_mapping() {
        for kind in ["string", "datetime"] {
            assert_eq!(
                to_descriptor(kind, None),
                TypeDescriptor::Scalar(ScalarKind::String)
            );
        }
        for kind in ["int", "decimal", "float"] {
            assert_eq!(
                to_descriptor(kind, None),
                TypeDescriptor::Scalar(ScalarKind::Number)
            );
        }
        assert_eq!(
            to_descriptor("bool", None),
            TypeDescriptor::Scalar(ScalarKind::Boolean)
        );
    }

    #[test]
    fn test_structural_and_unknown_kinds() {
        for kind in ["object", "array", "geometry", "any", ""] {
            assert_eq!(
                to_descriptor(kind, None),
                TypeDescriptor::Scalar(ScalarKind::Unknown),
                "kind {kind:?}"
            );
        }
    }

    #[test]
    fn test_record_reference() {
        assert_eq!(
            to_descriptor("record", Some("user")),
            TypeDescriptor::Reference("user".to_string())
        );
        assert_eq!(
            to_descriptor("record", None),
            TypeDescriptor::Reference(UNKNOWN_TABLE.to_string())
        );
    }

    #[test]
    fn test_descriptor_serialization() {
        let ty = TypeDescriptor::array(TypeDescriptor::Reference("user".to_string()));
        let json = serde_json::to_value(&ty).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "array", "of": {"type": "reference", "of": "user"}})
        );
    }
}
