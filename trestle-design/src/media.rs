//! Media type and user type definitions.

use serde::{Deserialize, Serialize};

use crate::attribute::AttributeDefinition;

/// Identifiers of the built-in media types; these are never generated.
pub const BUILTIN_IDENTIFIERS: &[&str] = &["text/plain", "application/json"];

/// A named projection of a media type's fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewDefinition {
    /// View name; "default" is the identity projection.
    pub name: String,
    /// Names of the projected fields; each must exist in the media type's
    /// object shape.
    pub fields: Vec<String>,
}

/// A response body shape identified by a MIME-like string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaTypeDefinition {
    /// MIME-like identifier, globally unique (e.g. "vnd.example.widgets").
    pub identifier: String,
    /// Name of the generated data structure.
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// The underlying attribute shape.
    pub attribute: AttributeDefinition,
    #[serde(default)]
    pub views: Vec<ViewDefinition>,
}

impl MediaTypeDefinition {
    /// Built-in media types are excluded from code generation.
    pub fn is_builtin(&self) -> bool {
        BUILTIN_IDENTIFIERS.contains(&self.identifier.as_str())
    }
}

/// A named, reusable attribute shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserTypeDefinition {
    /// Type name, unique within the API.
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub attribute: AttributeDefinition,
}
