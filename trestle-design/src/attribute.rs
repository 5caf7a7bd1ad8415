//! The attribute tree.
//!
//! Every value shape in a design — parameters, headers, payloads, response
//! bodies, media type and user type contents — is described by an
//! [`AttributeDefinition`]. The kind set is closed: writers match on
//! [`AttributeType`] exhaustively instead of type-switching.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Scalar kinds understood by the generated coercion code.
///
/// Each kind has a fixed raw-string coercion rule in generated contexts:
/// integers and floats parse with the standard numeric parsers, booleans
/// accept `true`/`false`, date-times parse as RFC 3339, and UUIDs parse in
/// their canonical hex form. A failed parse records a validation error
/// instead of aborting the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Primitive {
    String,
    Integer,
    Float,
    Boolean,
    DateTime,
    Uuid,
}

impl Primitive {
    /// The Rust type generated for this primitive.
    pub fn rust_type(&self) -> &'static str {
        match self {
            Primitive::String => "String",
            Primitive::Integer => "i64",
            Primitive::Float => "f64",
            Primitive::Boolean => "bool",
            Primitive::DateTime => "trestle_runtime::types::DateTime",
            Primitive::Uuid => "trestle_runtime::types::Uuid",
        }
    }
}

/// The shape of an attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeType {
    /// A scalar value.
    Primitive(Primitive),
    /// A set of named fields. Field order is the design document order and
    /// is preserved verbatim into generated output.
    Object(IndexMap<String, AttributeDefinition>),
    /// A homogeneous list; holds exactly one element definition.
    Array(Box<AttributeDefinition>),
    /// A string-keyed map; holds exactly one element definition.
    Map(Box<AttributeDefinition>),
    /// A by-name reference to a user type, resolved during linking.
    UserType(String),
}

impl AttributeType {
    /// Returns true for object shapes.
    pub fn is_object(&self) -> bool {
        matches!(self, AttributeType::Object(_))
    }

    /// Returns true for array shapes.
    pub fn is_array(&self) -> bool {
        matches!(self, AttributeType::Array(_))
    }

    /// The object fields, if this is an object shape.
    pub fn as_object(&self) -> Option<&IndexMap<String, AttributeDefinition>> {
        match self {
            AttributeType::Object(fields) => Some(fields),
            _ => None,
        }
    }
}

/// Validation rules attached to an attribute.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Validation {
    /// Names of required fields. Only meaningful on object shapes; every
    /// name must exist in the enclosing object.
    pub required: Vec<String>,
    /// Allowed values.
    pub enum_values: Vec<serde_json::Value>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    /// Regular expression the value must match.
    pub pattern: Option<String>,
    /// Free-form format hint (e.g. "email"); informational only.
    pub format: Option<String>,
}

impl Validation {
    /// Returns true when no rule is set.
    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
            && self.enum_values.is_empty()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.minimum.is_none()
            && self.maximum.is_none()
            && self.pattern.is_none()
            && self.format.is_none()
    }
}

/// A node in the attribute tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub ty: AttributeType,
    #[serde(default)]
    pub description: Option<String>,
    /// Default used when the value is absent from a request.
    #[serde(default)]
    pub default_value: Option<serde_json::Value>,
    #[serde(default)]
    pub validation: Validation,
    /// Free-form generation hints.
    #[serde(default)]
    pub metadata: IndexMap<String, String>,
}

impl AttributeDefinition {
    /// Create an attribute with the given shape and no rules.
    pub fn new(ty: AttributeType) -> Self {
        Self {
            ty,
            description: None,
            default_value: None,
            validation: Validation::default(),
            metadata: IndexMap::new(),
        }
    }

    /// Shorthand for a scalar attribute.
    pub fn primitive(primitive: Primitive) -> Self {
        Self::new(AttributeType::Primitive(primitive))
    }

    /// Shorthand for an object attribute.
    pub fn object(fields: impl IntoIterator<Item = (String, AttributeDefinition)>) -> Self {
        Self::new(AttributeType::Object(fields.into_iter().collect()))
    }

    /// Shorthand for an array attribute.
    pub fn array(element: AttributeDefinition) -> Self {
        Self::new(AttributeType::Array(Box::new(element)))
    }

    /// Whether `field` is listed as required by this attribute's rules.
    pub fn is_required(&self, field: &str) -> bool {
        self.validation.required.iter().any(|f| f == field)
    }
}
